//! Skeleton/overlay merge resolver
//!
//! Combines a base [`FileSet`] (project skeleton) with an overlay of
//! generated files into the set submitted for deployment.
//!
//! # Algorithm
//! 1. Copy base entries in base order.
//! 2. Rewrite customizable base files (manifest, layout) for the project.
//! 3. Overlay every well-formed generated file, last write wins.
//! 4. Drop overlay entries with an empty path or empty content.

use crate::customize::{default_customizers, Customization, FileCustomizer};
use crate::file_set::FileSet;
use serde::Serialize;

/// What the merge did, for callers and operator logs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Overlay paths not present in base
    pub added: Vec<String>,
    /// Base paths replaced by overlay content
    pub overwritten: Vec<String>,
    /// Overlay paths dropped for missing path or content
    pub skipped: Vec<String>,
    /// Base paths rewritten for the project
    pub customized: Vec<String>,
    /// No generated content was merged; deploying the skeleton only
    pub skeleton_only: bool,
}

impl MergeReport {
    /// Number of overlay files that made it into the result
    #[inline]
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.added.len() + self.overwritten.len()
    }
}

/// Merged files plus report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Files to deploy
    pub files: FileSet,
    /// Merge report
    pub report: MergeReport,
}

/// Path-keyed, last-write-wins merge with project customization
#[derive(Debug)]
pub struct MergeResolver {
    customizers: Vec<Box<dyn FileCustomizer>>,
}

impl MergeResolver {
    /// Resolver with the default manifest and layout customizers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            customizers: default_customizers(),
        }
    }

    /// Resolver with an explicit customizer list
    #[inline]
    #[must_use]
    pub fn with_customizers(customizers: Vec<Box<dyn FileCustomizer>>) -> Self {
        Self { customizers }
    }

    /// Merge `overlay` onto `base` for `project_name`
    ///
    /// Never fails: unparseable customizable files are kept as-is and
    /// malformed overlay entries are dropped.
    #[must_use]
    pub fn merge(&self, base: &FileSet, overlay: &FileSet, project_name: &str) -> MergeOutcome {
        let mut report = MergeReport::default();
        let mut files = FileSet::with_capacity(base.len() + overlay.len());

        for (path, content) in base.iter() {
            let content = self.customize(path, content, project_name, &mut report);
            files.insert(path, content);
        }

        for (path, content) in overlay.iter() {
            if path.trim().is_empty() || content.is_empty() {
                tracing::debug!(path, "dropping overlay entry without path or content");
                report.skipped.push(path.to_string());
                continue;
            }

            if files.insert(path, content).is_some() {
                tracing::info!(path, bytes = content.len(), "overlay overwrites skeleton file");
                report.overwritten.push(path.to_string());
            } else {
                tracing::debug!(path, bytes = content.len(), "overlay adds file");
                report.added.push(path.to_string());
            }
        }

        report.skeleton_only = report.merged_count() == 0;
        if report.skeleton_only {
            tracing::warn!(
                project = project_name,
                "no generated content, using skeleton only"
            );
        }

        tracing::info!(
            total = files.len(),
            added = report.added.len(),
            overwritten = report.overwritten.len(),
            skipped = report.skipped.len(),
            "file merge complete"
        );

        MergeOutcome { files, report }
    }

    fn customize(
        &self,
        path: &str,
        content: &str,
        project_name: &str,
        report: &mut MergeReport,
    ) -> String {
        let mut current = content.to_string();
        for customizer in self.customizers.iter().filter(|c| c.path() == path) {
            match customizer.customize(&current, project_name) {
                Customization::Rewritten(next) => {
                    current = next;
                    report.customized.push(path.to_string());
                }
                Customization::Unchanged { reason } => {
                    tracing::warn!(path, customizer = customizer.name(), %reason, "kept file unmodified");
                }
            }
        }
        current
    }
}

impl Default for MergeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge with the default resolver
#[must_use]
pub fn merge(base: &FileSet, overlay: &FileSet, project_name: &str) -> MergeOutcome {
    MergeResolver::new().merge(base, overlay, project_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customize::{LAYOUT_PATH, MANIFEST_PATH};
    use crate::file_set::NamedFile;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn base() -> FileSet {
        vec![
            NamedFile::new(MANIFEST_PATH, r#"{"name":"x","version":"0.1.0"}"#),
            NamedFile::new(LAYOUT_PATH, "export const metadata = { title: 'v0 App' }"),
            NamedFile::new("app/page.tsx", "default page"),
        ]
        .into()
    }

    fn manifest_name(files: &FileSet) -> String {
        let v: serde_json::Value = serde_json::from_str(files.get(MANIFEST_PATH).unwrap()).unwrap();
        v["name"].as_str().unwrap().to_string()
    }

    #[test]
    fn empty_overlay_is_customized_base() {
        let outcome = merge(&base(), &FileSet::new(), "My Cool Store!");

        assert!(outcome.report.skeleton_only);
        assert_eq!(
            outcome.files.paths().collect::<Vec<_>>(),
            vec![MANIFEST_PATH, LAYOUT_PATH, "app/page.tsx"]
        );
        assert_eq!(manifest_name(&outcome.files), "my-cool-store-");
        assert!(outcome
            .files
            .get(LAYOUT_PATH)
            .unwrap()
            .contains(r#"title: "My Cool Store!""#));
        assert_eq!(outcome.report.customized, vec![MANIFEST_PATH, LAYOUT_PATH]);
    }

    #[test]
    fn overlay_overwrites_and_adds() {
        let overlay: FileSet = vec![
            NamedFile::new("app/page.tsx", "generated page"),
            NamedFile::new("components/hero.tsx", "hero"),
        ]
        .into();

        let outcome = merge(&base(), &overlay, "Shop");

        assert!(!outcome.report.skeleton_only);
        assert_eq!(outcome.files.get("app/page.tsx"), Some("generated page"));
        assert_eq!(outcome.files.get("components/hero.tsx"), Some("hero"));
        assert_eq!(outcome.report.overwritten, vec!["app/page.tsx"]);
        assert_eq!(outcome.report.added, vec!["components/hero.tsx"]);
        // overwritten entries keep base position, additions go last
        assert_eq!(
            outcome.files.paths().collect::<Vec<_>>(),
            vec![MANIFEST_PATH, LAYOUT_PATH, "app/page.tsx", "components/hero.tsx"]
        );
    }

    #[test]
    fn malformed_overlay_entries_dropped() {
        let overlay: FileSet = vec![
            NamedFile::new("", "orphan content"),
            NamedFile::new("app/empty.tsx", ""),
            NamedFile::new("app/page.tsx", ""),
        ]
        .into();

        let outcome = merge(&base(), &overlay, "Shop");

        assert!(!outcome.files.contains(""));
        assert!(!outcome.files.contains("app/empty.tsx"));
        assert_eq!(outcome.files.get("app/page.tsx"), Some("default page"));
        assert_eq!(outcome.report.skipped.len(), 3);
        assert!(outcome.report.skeleton_only);
    }

    #[test]
    fn unparseable_manifest_kept() {
        let base: FileSet = vec![
            NamedFile::new(MANIFEST_PATH, "{ broken"),
            NamedFile::new(LAYOUT_PATH, "title: 'x'"),
        ]
        .into();

        let outcome = merge(&base, &FileSet::new(), "Shop");
        assert_eq!(outcome.files.get(MANIFEST_PATH), Some("{ broken"));
        assert_eq!(outcome.report.customized, vec![LAYOUT_PATH]);
    }

    #[test]
    fn overlay_can_replace_manifest() {
        let overlay: FileSet = vec![NamedFile::new(MANIFEST_PATH, r#"{"name":"generated"}"#)].into();
        let outcome = merge(&base(), &overlay, "Shop");
        assert_eq!(outcome.files.get(MANIFEST_PATH), Some(r#"{"name":"generated"}"#));
    }

    #[test]
    fn no_customizers_copies_base() {
        let resolver = MergeResolver::with_customizers(Vec::new());
        let outcome = resolver.merge(&base(), &FileSet::new(), "Shop");
        assert_eq!(outcome.files, base());
        assert!(outcome.report.customized.is_empty());
    }

    fn file_sets() -> impl Strategy<Value = FileSet> {
        proptest::collection::vec(("[a-c]{0,2}(/[a-c]{1,2})?", "[xyz]{0,3}"), 0..8).prop_map(
            |pairs| {
                pairs
                    .into_iter()
                    .map(|(p, c)| NamedFile::new(p, c))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn merged_paths_are_union_of_well_formed(base in file_sets(), overlay in file_sets()) {
            let outcome = merge(&base, &overlay, "Prop Store");

            let mut expected: BTreeSet<String> = base.paths().map(str::to_string).collect();
            for (p, c) in overlay.iter() {
                if !p.trim().is_empty() && !c.is_empty() {
                    expected.insert(p.to_string());
                }
            }
            let actual: BTreeSet<String> = outcome.files.paths().map(str::to_string).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn overlay_content_wins(base in file_sets(), overlay in file_sets()) {
            let outcome = merge(&base, &overlay, "Prop Store");
            for (p, c) in overlay.iter() {
                if !p.trim().is_empty() && !c.is_empty() {
                    prop_assert_eq!(outcome.files.get(p), Some(c));
                }
            }
        }

        #[test]
        fn malformed_overlay_never_leaks(base in file_sets(), overlay in file_sets()) {
            let outcome = merge(&base, &overlay, "Prop Store");
            for (p, c) in overlay.iter() {
                if (p.trim().is_empty() || c.is_empty()) && !base.contains(p) {
                    prop_assert!(!outcome.files.contains(p));
                }
            }
        }
    }
}
