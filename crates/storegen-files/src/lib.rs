//! Storegen file sets
//!
//! Path-keyed file collections and the merge that turns a project skeleton
//! plus generated files into a deployable project.
//!
//! # Core Concepts
//!
//! - [`FileSet`]: insertion-ordered, path-unique collection of text files
//! - [`Skeleton`]: base project every deployment starts from
//! - [`MergeResolver`]: skeleton/overlay merge with project customization
//! - [`FileCustomizer`]: rewrites one well-known skeleton file
//!
//! # Example
//!
//! ```rust
//! use storegen_files::{merge, FileSet, NamedFile, Skeleton};
//!
//! let skeleton = Skeleton::embedded();
//! let generated: FileSet = vec![NamedFile::new("app/page.tsx", "export default () => null")].into();
//!
//! let outcome = merge(skeleton.files(), &generated, "Acme Goods");
//! assert_eq!(outcome.files.get("app/page.tsx"), Some("export default () => null"));
//! assert!(!outcome.report.skeleton_only);
//! ```

#![warn(unreachable_pub)]

mod customize;
mod error;
mod file_set;
mod merge;
mod skeleton;

pub use customize::{
    default_customizers, slugify, Customization, FileCustomizer, LayoutCustomizer,
    ManifestCustomizer, LAYOUT_PATH, MANIFEST_PATH,
};
pub use error::FileSetError;
pub use file_set::{normalize_path, FileSet, NamedFile};
pub use merge::{merge, MergeOutcome, MergeReport, MergeResolver};
pub use skeleton::{Skeleton, REQUIRED_PATHS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_skeleton_merge_customizes_project() {
        let skeleton = Skeleton::embedded();
        let outcome = merge(skeleton.files(), &FileSet::new(), "Green Leaf Botanicals");

        assert!(outcome.report.skeleton_only);
        assert_eq!(outcome.files.len(), skeleton.files().len());

        let manifest: serde_json::Value =
            serde_json::from_str(outcome.files.get(MANIFEST_PATH).unwrap()).unwrap();
        assert_eq!(manifest["name"], "green-leaf-botanicals");

        let layout = outcome.files.get(LAYOUT_PATH).unwrap();
        assert!(layout.contains(r#"title: "Green Leaf Botanicals""#));
    }

    #[test]
    fn generated_files_override_skeleton_pages() {
        let skeleton = Skeleton::embedded();
        let generated: FileSet = vec![
            NamedFile::new("app/page.tsx", "generated home"),
            NamedFile::new("components/product-grid.tsx", "grid"),
        ]
        .into();

        let outcome = merge(skeleton.files(), &generated, "Shop");
        assert_eq!(outcome.files.get("app/page.tsx"), Some("generated home"));
        assert_eq!(outcome.files.len(), skeleton.files().len() + 1);
        assert_eq!(outcome.report.merged_count(), 2);
    }
}
