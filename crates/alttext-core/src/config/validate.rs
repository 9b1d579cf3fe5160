//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "input.supported_formats must not be empty".into(),
            ));
        }
        if self.resize.widths.is_empty() {
            return Err(ConfigError::ValidationError(
                "resize.widths must not be empty".into(),
            ));
        }
        if self.resize.widths.contains(&0) {
            return Err(ConfigError::ValidationError(
                "resize.widths must all be > 0".into(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.resize.widths.iter().find(|w| !seen.insert(**w)) {
            return Err(ConfigError::ValidationError(format!(
                "resize.widths contains duplicate width {dup}"
            )));
        }
        if self.api.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.endpoint must not be empty".into(),
            ));
        }
        if self.api.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "api.max_tokens must be > 0".into(),
            ));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_ms must be > 0".into(),
            ));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::ValidationError(
                "retry.attempts must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
