//! Named files and insertion-ordered file sets
//!
//! A [`FileSet`] maps a path to text content. Paths are unique: inserting an
//! existing path replaces its content and keeps its original position, so the
//! last write wins while iteration order stays deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One file destined for deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedFile {
    /// Project-relative path, `/` separated
    pub path: String,
    /// Text content
    pub content: String,
}

impl NamedFile {
    /// Create new named file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Whether both path and content are present
    ///
    /// Entries failing this check are dropped by the merge.
    #[inline]
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.path.trim().is_empty() && !self.content.is_empty()
    }
}

/// Normalize a generated path into project-relative form
///
/// Strips surrounding whitespace, leading `./` and `/` segments, and turns
/// `\` separators into `/`.
///
/// # Examples
/// - `./app/page.tsx` → `app/page.tsx`
/// - `/components\\hero.tsx` → `components/hero.tsx`
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let mut path = raw.trim().replace('\\', "/");
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest.to_string();
        } else {
            break;
        }
    }
    path
}

/// Insertion-ordered mapping from path to content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NamedFile>", into = "Vec<NamedFile>")]
pub struct FileSet {
    entries: IndexMap<String, String>,
}

impl FileSet {
    /// Create empty file set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty file set with room for `capacity` entries
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a file
    ///
    /// Returns the previous content when the path was already present.
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.entries.insert(path.into(), content.into())
    }

    /// Get content at path
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Check whether path is present
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(path, content)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Total content size in bytes
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }

    /// Convert into named files, preserving order
    #[must_use]
    pub fn into_files(self) -> Vec<NamedFile> {
        self.entries
            .into_iter()
            .map(|(path, content)| NamedFile { path, content })
            .collect()
    }
}

impl From<Vec<NamedFile>> for FileSet {
    fn from(files: Vec<NamedFile>) -> Self {
        files.into_iter().collect()
    }
}

impl From<FileSet> for Vec<NamedFile> {
    fn from(set: FileSet) -> Self {
        set.into_files()
    }
}

impl FromIterator<NamedFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = NamedFile>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl FromIterator<(String, String)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<NamedFile> for FileSet {
    fn extend<I: IntoIterator<Item = NamedFile>>(&mut self, iter: I) {
        for file in iter {
            self.entries.insert(file.path, file.content);
        }
    }
}

impl IntoIterator for FileSet {
    type Item = NamedFile;
    type IntoIter = std::vec::IntoIter<NamedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_files().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_replaces_in_place() {
        let mut set = FileSet::new();
        set.insert("a.txt", "1");
        set.insert("b.txt", "2");

        let previous = set.insert("a.txt", "3");
        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(set.paths().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
        assert_eq!(set.get("a.txt"), Some("3"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn from_named_files_last_write_wins() {
        let set: FileSet = vec![
            NamedFile::new("app/page.tsx", "first"),
            NamedFile::new("lib/utils.ts", "utils"),
            NamedFile::new("app/page.tsx", "second"),
        ]
        .into();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("app/page.tsx"), Some("second"));
    }

    #[test]
    fn serde_as_file_list() {
        let mut set = FileSet::new();
        set.insert("package.json", "{}");

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "path": "package.json", "content": "{}" }])
        );

        let back: FileSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn well_formed_requires_path_and_content() {
        assert!(NamedFile::new("a", "b").is_well_formed());
        assert!(!NamedFile::new("", "b").is_well_formed());
        assert!(!NamedFile::new("   ", "b").is_well_formed());
        assert!(!NamedFile::new("a", "").is_well_formed());
    }

    #[test]
    fn normalize_path_strips_prefixes() {
        assert_eq!(normalize_path("./app/page.tsx"), "app/page.tsx");
        assert_eq!(normalize_path("/components\\hero.tsx"), "components/hero.tsx");
        assert_eq!(normalize_path(" .//lib/utils.ts "), "lib/utils.ts");
        assert_eq!(normalize_path("page.tsx"), "page.tsx");
    }

    #[test]
    fn total_bytes_sums_content() {
        let set: FileSet = vec![NamedFile::new("a", "abc"), NamedFile::new("b", "de")].into();
        assert_eq!(set.total_bytes(), 5);
    }
}
