//! Vision-API integration for alt-text generation.
//!
//! Provides the provider abstraction, the Chat Completions client and the
//! fixed-delay retry wrapper that turns every call into a tagged outcome.

pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod retry;

pub use openai::ChatCompletionsProvider;
pub use provider::{
    resolve_env_var, AltTextProvider, AltTextRequest, AltTextResponse, ImageInput,
    ALT_TEXT_PROMPT,
};
pub use retry::{describe_with_retry, AltTextOutcome, FailureKind, RetryPolicy};
