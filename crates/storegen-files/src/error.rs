//! Error types for file sets and skeleton loading

use std::path::PathBuf;

/// Errors raised while building a file set or loading a skeleton
#[derive(Debug, thiserror::Error)]
pub enum FileSetError {
    /// Skeleton directory does not exist or is not a directory
    #[error("skeleton directory not found: {0}")]
    SkeletonNotFound(PathBuf),

    /// Skeleton lacks a file the merge always customizes
    #[error("skeleton is missing required file: {0}")]
    MissingRequiredFile(&'static str),

    /// File under the skeleton directory is not valid UTF-8 text
    #[error("skeleton file is not utf-8 text: {0}")]
    NotText(PathBuf),

    /// IO error while walking or reading the skeleton
    #[error("io error reading {path}: {source}")]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failed
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl FileSetError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_file_display() {
        let err = FileSetError::MissingRequiredFile("package.json");
        assert_eq!(
            err.to_string(),
            "skeleton is missing required file: package.json"
        );
    }

    #[test]
    fn io_error_keeps_path() {
        let err = FileSetError::io_error(
            "skeleton/app/page.tsx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("skeleton/app/page.tsx"));
    }
}
