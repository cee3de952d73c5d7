//! Project-name customization of well-known skeleton files
//!
//! The merge rewrites a small fixed set of skeleton files before overlaying
//! generated content:
//! - [`ManifestCustomizer`]: `package.json` name and description
//! - [`LayoutCustomizer`]: `app/layout.tsx` metadata title
//!
//! Customization is soft: content that cannot be understood is returned
//! unchanged with a reason, never an error.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde_json::Value;

/// Path of the package manifest
pub const MANIFEST_PATH: &str = "package.json";

/// Path of the root layout
pub const LAYOUT_PATH: &str = "app/layout.tsx";

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

static LAYOUT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"title:\s*(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#).expect("static regex")
});

/// Turn a free-form project name into a package/deployment slug
///
/// Lower-cases the name and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`.
///
/// # Examples
/// - `My Cool Store!` → `my-cool-store-`
/// - `A//B` → `a-b`
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALNUM_RUN.replace_all(&lowered, "-").into_owned()
}

/// Result of customizing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customization {
    /// Content was rewritten
    Rewritten(String),
    /// Content kept as-is
    Unchanged {
        /// Why nothing was rewritten
        reason: String,
    },
}

impl Customization {
    fn unchanged(reason: impl Into<String>) -> Self {
        Self::Unchanged {
            reason: reason.into(),
        }
    }

    /// Whether content was rewritten
    #[inline]
    #[must_use]
    pub fn is_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten(_))
    }
}

/// Rewrites one well-known skeleton file for a project
pub trait FileCustomizer: Send + Sync + std::fmt::Debug {
    /// Skeleton path this customizer applies to
    fn path(&self) -> &'static str;

    /// Rewrite `content` for `project_name`
    fn customize(&self, content: &str, project_name: &str) -> Customization;

    /// Customizer name (for logging)
    fn name(&self) -> &'static str;
}

/// Injects the project slug into the package manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestCustomizer;

impl FileCustomizer for ManifestCustomizer {
    fn path(&self) -> &'static str {
        MANIFEST_PATH
    }

    fn customize(&self, content: &str, project_name: &str) -> Customization {
        let mut manifest: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => return Customization::unchanged(format!("manifest is not valid json: {e}")),
        };

        let Value::Object(fields) = &mut manifest else {
            return Customization::unchanged("manifest root is not an object");
        };

        fields.insert("name".to_string(), Value::String(slugify(project_name)));
        fields.insert(
            "description".to_string(),
            Value::String(format!("Generated storefront - {project_name}")),
        );

        match serde_json::to_string_pretty(&manifest) {
            Ok(rendered) => Customization::Rewritten(rendered),
            Err(e) => Customization::unchanged(format!("manifest could not be rendered: {e}")),
        }
    }

    fn name(&self) -> &'static str {
        "manifest"
    }
}

/// Injects the project name into the root layout's metadata title
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutCustomizer;

impl FileCustomizer for LayoutCustomizer {
    fn path(&self) -> &'static str {
        LAYOUT_PATH
    }

    fn customize(&self, content: &str, project_name: &str) -> Customization {
        if !LAYOUT_TITLE.is_match(content) {
            return Customization::unchanged("layout has no title field");
        }

        let escaped = project_name.replace('\\', "\\\\").replace('"', "\\\"");
        let replacement = format!("title: \"{escaped}\"");
        let rewritten = LAYOUT_TITLE.replacen(content, 1, NoExpand(&replacement));
        Customization::Rewritten(rewritten.into_owned())
    }

    fn name(&self) -> &'static str {
        "layout"
    }
}

/// Default customizers, in application order
#[must_use]
pub fn default_customizers() -> Vec<Box<dyn FileCustomizer>> {
    vec![Box::new(ManifestCustomizer), Box::new(LayoutCustomizer)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn rewritten(c: Customization) -> String {
        match c {
            Customization::Rewritten(s) => s,
            Customization::Unchanged { reason } => panic!("expected rewrite, got: {reason}"),
        }
    }

    #[test]
    fn slugify_examples() {
        assert_eq!(slugify("My Cool Store!"), "my-cool-store-");
        assert_eq!(slugify("A//B"), "a-b");
        assert_eq!(slugify("already-slugged"), "already-slugged");
        assert_eq!(slugify("Café  Crème 2"), "caf-cr-me-2");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn manifest_name_is_slugged() {
        let out = rewritten(ManifestCustomizer.customize(r#"{"name":"x"}"#, "My Cool Store!"));
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "my-cool-store-");
        assert_eq!(value["description"], "Generated storefront - My Cool Store!");
    }

    #[test]
    fn manifest_keeps_key_order() {
        let input = r#"{"name":"x","version":"0.1.0","private":true}"#;
        let out = rewritten(ManifestCustomizer.customize(input, "Shop"));
        let value: Value = serde_json::from_str(&out).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "version", "private", "description"]);
    }

    #[test]
    fn manifest_parse_failure_is_soft() {
        let result = ManifestCustomizer.customize("{ not json", "Shop");
        assert!(!result.is_rewritten());

        let result = ManifestCustomizer.customize("[1, 2]", "Shop");
        assert!(matches!(result, Customization::Unchanged { .. }));
    }

    #[test]
    fn layout_single_quoted_title() {
        let input = "export const metadata = {\n  title: 'v0 App',\n  description: 'x',\n}";
        let out = rewritten(LayoutCustomizer.customize(input, "Acme Co"));
        assert!(out.contains(r#"title: "Acme Co""#));
        assert!(out.contains("description: 'x'"));
    }

    #[test]
    fn layout_double_quoted_title_escapes() {
        let input = r#"export const metadata = { title: "Old" }"#;
        let out = rewritten(LayoutCustomizer.customize(input, r#"Bob's "Best""#));
        assert_eq!(out, r#"export const metadata = { title: "Bob's \"Best\"" }"#);
    }

    #[test]
    fn layout_only_first_title_replaced() {
        let input = "title: 'a'\ntitle: 'b'";
        let out = rewritten(LayoutCustomizer.customize(input, "New"));
        assert_eq!(out, "title: \"New\"\ntitle: 'b'");
    }

    #[test]
    fn layout_dollar_in_name_is_literal() {
        let input = "title: 'a'";
        let out = rewritten(LayoutCustomizer.customize(input, "$1 Store"));
        assert_eq!(out, "title: \"$1 Store\"");
    }

    #[test]
    fn layout_without_title_unchanged() {
        let result = LayoutCustomizer.customize("export default function X() {}", "Shop");
        assert!(!result.is_rewritten());
    }

    proptest! {
        #[test]
        fn slug_has_no_double_hyphen_or_uppercase(name in ".{0,40}") {
            let slug = slugify(&name);
            prop_assert!(!slug.contains("--"));
            prop_assert!(slug.chars().all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit()));
        }

        #[test]
        fn slug_is_idempotent(name in "[A-Za-z0-9 !/_.-]{0,40}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once.clone());
        }
    }
}
