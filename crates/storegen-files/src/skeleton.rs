//! Default project skeleton
//!
//! The skeleton is the base [`FileSet`] every deployment starts from. An
//! embedded copy ships inside the binary; operators can point at a directory
//! on disk instead.

use crate::customize::{LAYOUT_PATH, MANIFEST_PATH};
use crate::error::FileSetError;
use crate::file_set::FileSet;
use std::path::Path;
use walkdir::WalkDir;

macro_rules! embedded {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/skeleton/", $path)))),*]
    };
}

const EMBEDDED: &[(&str, &str)] = embedded![
    "package.json",
    "next.config.mjs",
    "tsconfig.json",
    "tailwind.config.ts",
    "postcss.config.mjs",
    "components.json",
    "app/layout.tsx",
    "app/page.tsx",
    "app/globals.css",
    "app/loading.tsx",
    "components/ui/button.tsx",
    "components/ui/card.tsx",
    "lib/utils.ts",
];

/// Paths every skeleton must provide
pub const REQUIRED_PATHS: [&str; 2] = [MANIFEST_PATH, LAYOUT_PATH];

/// Base project files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    files: FileSet,
}

impl Skeleton {
    /// Skeleton compiled into the binary
    #[must_use]
    pub fn embedded() -> Self {
        let files = EMBEDDED
            .iter()
            .map(|(path, content)| ((*path).to_string(), (*content).to_string()))
            .collect();
        Self { files }
    }

    /// Load every regular file under `dir`
    ///
    /// Paths are relative to `dir`, `/` separated, in sorted order.
    ///
    /// # Errors
    /// - `FileSetError::SkeletonNotFound` if `dir` is not a directory
    /// - `FileSetError::NotText` for non UTF-8 files
    /// - `FileSetError::MissingRequiredFile` if the manifest or layout is absent
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FileSetError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(FileSetError::SkeletonNotFound(dir.to_path_buf()));
        }

        let mut files = FileSet::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or_else(|_| entry.path());
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let bytes = std::fs::read(entry.path())
                .map_err(|e| FileSetError::io_error(entry.path(), e))?;
            let content = String::from_utf8(bytes)
                .map_err(|_| FileSetError::NotText(entry.path().to_path_buf()))?;

            files.insert(path, content);
        }

        let skeleton = Self { files };
        skeleton.validate()?;
        tracing::info!(dir = %dir.display(), files = skeleton.files.len(), "loaded skeleton from disk");
        Ok(skeleton)
    }

    /// Load from `dir` when given, else use the embedded skeleton
    ///
    /// # Errors
    /// Propagates [`Skeleton::from_dir`] errors
    pub fn load(dir: Option<&Path>) -> Result<Self, FileSetError> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Ok(Self::embedded()),
        }
    }

    /// Check the skeleton provides the files the merge customizes
    ///
    /// # Errors
    /// `FileSetError::MissingRequiredFile` naming the first absent path
    pub fn validate(&self) -> Result<(), FileSetError> {
        for path in REQUIRED_PATHS {
            if !self.files.contains(path) {
                return Err(FileSetError::MissingRequiredFile(path));
            }
        }
        Ok(())
    }

    /// Skeleton files
    #[inline]
    #[must_use]
    pub fn files(&self) -> &FileSet {
        &self.files
    }

    /// Consume into files
    #[inline]
    #[must_use]
    pub fn into_files(self) -> FileSet {
        self.files
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn embedded_skeleton_is_valid() {
        let skeleton = Skeleton::embedded();
        assert!(skeleton.validate().is_ok());
        assert_eq!(skeleton.files().len(), EMBEDDED.len());
        assert_eq!(skeleton.files().paths().next(), Some("package.json"));
    }

    #[test]
    fn embedded_manifest_is_json() {
        let skeleton = Skeleton::embedded();
        let manifest = skeleton.files().get(MANIFEST_PATH).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(manifest).is_ok());
    }

    #[test]
    fn from_dir_loads_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"x"}"#).unwrap();
        fs::write(dir.path().join("app/layout.tsx"), "title: 'x'").unwrap();
        fs::write(dir.path().join("app/page.tsx"), "page").unwrap();

        let skeleton = Skeleton::from_dir(dir.path()).unwrap();
        let paths: Vec<_> = skeleton.files().paths().collect();
        assert_eq!(paths, vec!["app/layout.tsx", "app/page.tsx", "package.json"]);
    }

    #[test]
    fn from_dir_requires_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/layout.tsx"), "title: 'x'").unwrap();

        let result = Skeleton::from_dir(dir.path());
        assert!(matches!(
            result,
            Err(FileSetError::MissingRequiredFile("package.json"))
        ));
    }

    #[test]
    fn from_dir_missing_directory() {
        let result = Skeleton::from_dir("/definitely/not/here");
        assert!(matches!(result, Err(FileSetError::SkeletonNotFound(_))));
    }

    #[test]
    fn load_without_dir_is_embedded() {
        let skeleton = Skeleton::load(None).unwrap();
        assert_eq!(skeleton, Skeleton::embedded());
    }
}
