//! Image discovery in the input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::PipelineError;

/// Lists supported image files directly inside a directory.
pub struct FileDiscovery {
    config: InputConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name as listed in the directory
    pub file_name: String,
}

impl DiscoveredFile {
    /// File name without its extension, used to name resized copies.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Discover supported image files in `dir`.
    ///
    /// Only the top level is scanned. Entries come back in directory-listing
    /// order; files with other extensions are skipped silently. A missing or
    /// unreadable directory is an error.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DiscoveredFile>, PipelineError> {
        let discovery_err = |source: std::io::Error| PipelineError::Discovery {
            path: dir.to_path_buf(),
            source,
        };

        let meta = std::fs::metadata(dir).map_err(discovery_err)?;
        if !meta.is_dir() {
            return Err(discovery_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| discovery_err(e.into()))?;
            if !entry.file_type().is_file() || !self.is_supported(entry.path()) {
                tracing::trace!("Skipping {:?}", entry.path());
                continue;
            }
            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
            });
        }

        tracing::debug!("Discovered {} image(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(InputConfig::default())
    }

    #[test]
    fn test_is_supported() {
        let discovery = discovery();

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.webp")));
        assert!(discovery.is_supported(Path::new("test.gif")));
        assert!(discovery.is_supported(Path::new("test.avif")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("test.heic")));
        assert!(!discovery.is_supported(Path::new("png")));
    }

    #[test]
    fn test_discover_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("B.JPEG"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("README"), b"x").unwrap();

        let mut names: Vec<String> = discovery()
            .discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.file_name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["B.JPEG", "a.png"]);
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested.png");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("inner.png"), b"x").unwrap();
        std::fs::write(dir.path().join("top.gif"), b"x").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "top.gif");
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discovery().discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = discovery().discover(&missing).unwrap_err();
        assert!(matches!(err, PipelineError::Discovery { .. }));
    }

    #[test]
    fn test_discover_file_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"x").unwrap();
        assert!(discovery().discover(&file).is_err());
    }

    #[test]
    fn test_stem() {
        let file = DiscoveredFile {
            path: PathBuf::from("/imgs/cat.photo.webp"),
            file_name: "cat.photo.webp".to_string(),
        };
        assert_eq!(file.stem(), "cat.photo");
    }
}
