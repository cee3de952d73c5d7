//! Store questionnaire output and prompt synthesis
//!
//! A [`StoreProfile`] renders to a markdown prompt of `**Label:** value`
//! lines followed by fixed build instructions. The `**Business:**` and
//! `**Call to Action:**` markers are the ones the mock generator reads back.

use crate::error::ProfileError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Call to action used when the profile leaves it empty
pub const DEFAULT_CALL_TO_ACTION: &str = "Shop Now";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("static regex"));

const BUILD_INSTRUCTIONS: &str = "\
Please create a complete e-commerce storefront with:
1. Hero section with the store name, a compelling headline and the call to action
2. Featured products grid with product cards and add-to-cart buttons
3. Product category navigation
4. Styling based on the brand colors and store style provided
5. Payment, shipping and contact information sections
6. Responsive design that works on mobile and desktop
7. A Next.js app router page using Tailwind CSS";

/// Primary/secondary brand colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    /// Primary color, hex
    pub primary: String,
    /// Secondary color, hex
    pub secondary: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#635BFF".to_string(),
            secondary: "#0A2540".to_string(),
        }
    }
}

/// Store questionnaire answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreProfile {
    pub store_name: String,
    pub industry: String,
    pub product_categories: Vec<String>,
    pub target_audience: String,
    pub store_description: String,
    pub payment_methods: Vec<String>,
    pub shipping_info: String,
    pub contact_info: String,
    pub brand_colors: BrandColors,
    pub store_style: String,
    pub featured_products: Vec<String>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            industry: "Fashion & Apparel".to_string(),
            product_categories: vec!["Clothing & Accessories".to_string()],
            target_audience: String::new(),
            store_description: String::new(),
            payment_methods: vec!["Stripe".to_string()],
            shipping_info: String::new(),
            contact_info: String::new(),
            brand_colors: BrandColors::default(),
            store_style: "Modern & Minimalist".to_string(),
            featured_products: Vec::new(),
            currency: "USD ($)".to_string(),
            call_to_action: None,
        }
    }
}

impl StoreProfile {
    /// Profile with the required fields set, questionnaire defaults elsewhere
    #[must_use]
    pub fn new(
        store_name: impl Into<String>,
        target_audience: impl Into<String>,
        store_description: impl Into<String>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            target_audience: target_audience.into(),
            store_description: store_description.into(),
            ..Self::default()
        }
    }

    /// With call to action
    #[inline]
    #[must_use]
    pub fn with_call_to_action(mut self, cta: impl Into<String>) -> Self {
        self.call_to_action = Some(cta.into());
        self
    }

    /// Check required fields and color formats
    ///
    /// # Errors
    /// - `ProfileError::MissingField` for a blank required field
    /// - `ProfileError::InvalidColor` for a non-hex brand color
    pub fn validate(&self) -> Result<(), ProfileError> {
        let required = [
            ("storeName", &self.store_name),
            ("targetAudience", &self.target_audience),
            ("storeDescription", &self.store_description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ProfileError::MissingField(field));
            }
        }

        let colors = [
            ("brandColors.primary", &self.brand_colors.primary),
            ("brandColors.secondary", &self.brand_colors.secondary),
        ];
        for (field, value) in colors {
            if !HEX_COLOR.is_match(value.trim()) {
                return Err(ProfileError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Call to action, defaulted when empty
    #[must_use]
    pub fn call_to_action(&self) -> &str {
        self.call_to_action
            .as_deref()
            .map(str::trim)
            .filter(|cta| !cta.is_empty())
            .unwrap_or(DEFAULT_CALL_TO_ACTION)
    }

    /// Render the customization prompt
    #[must_use]
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "Create a modern, conversion-focused online store for {}. Here are the details:\n\n",
            self.store_name.trim()
        );

        push_line(&mut prompt, "Business", &self.store_name);
        push_line(&mut prompt, "Industry", &self.industry);
        push_line(&mut prompt, "Target Audience", &self.target_audience);
        push_line(&mut prompt, "Description", &self.store_description);
        push_line(&mut prompt, "Product Categories", &self.product_categories.join(", "));
        push_line(&mut prompt, "Featured Products", &self.featured_products.join(", "));
        push_line(&mut prompt, "Payment Methods", &self.payment_methods.join(", "));
        push_line(&mut prompt, "Currency", &self.currency);
        push_line(&mut prompt, "Shipping", &self.shipping_info);
        push_line(&mut prompt, "Contact Info", &self.contact_info);
        push_line(
            &mut prompt,
            "Brand Colors",
            &format!(
                "Primary: {}, Secondary: {}",
                self.brand_colors.primary.trim(),
                self.brand_colors.secondary.trim()
            ),
        );
        push_line(&mut prompt, "Style", &self.store_style);
        push_line(&mut prompt, "Call to Action", self.call_to_action());

        prompt.push('\n');
        prompt.push_str(BUILD_INSTRUCTIONS);
        prompt
    }
}

fn push_line(prompt: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    // writing to a String cannot fail
    let _ = writeln!(prompt, "**{label}:** {value}");
}

/// Wrap a customization prompt for template-inspired creation
#[must_use]
pub fn template_prompt(template_id: &str, customization: &str) -> String {
    format!(
        "Create a new storefront modeled on the existing v0 template `{template_id}`. \
Reproduce the template's page structure, sections and component layout as closely \
as possible, then apply the following customization:\n\n{customization}"
    )
}

/// Wrap user feedback as a refinement message
#[must_use]
pub fn refinement_message(feedback: &str) -> String {
    format!("Please refine the store based on this feedback: {}", feedback.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile() -> StoreProfile {
        StoreProfile::new("Acme Co", "Young professionals", "Minimalist desk goods")
    }

    #[test]
    fn valid_profile_passes() {
        assert_eq!(profile().validate(), Ok(()));
    }

    #[test]
    fn blank_required_fields_rejected() {
        let mut p = profile();
        p.store_name = "   ".into();
        assert_eq!(p.validate(), Err(ProfileError::MissingField("storeName")));

        let mut p = profile();
        p.store_description.clear();
        assert_eq!(p.validate(), Err(ProfileError::MissingField("storeDescription")));
    }

    #[test]
    fn colors_must_be_hex() {
        let mut p = profile();
        p.brand_colors.primary = "#abc".into();
        assert!(p.validate().is_ok());

        p.brand_colors.secondary = "blue".into();
        assert!(matches!(
            p.validate(),
            Err(ProfileError::InvalidColor { field: "brandColors.secondary", .. })
        ));
    }

    #[test]
    fn prompt_contains_markers() {
        let prompt = profile().with_call_to_action("Buy Now").to_prompt();
        assert!(prompt.contains("**Business:** Acme Co\n"));
        assert!(prompt.contains("**Call to Action:** Buy Now\n"));
        assert!(prompt.contains("**Brand Colors:** Primary: #635BFF, Secondary: #0A2540\n"));
        assert!(prompt.ends_with(BUILD_INSTRUCTIONS));
    }

    #[test]
    fn empty_optional_fields_omitted() {
        let prompt = profile().to_prompt();
        assert!(!prompt.contains("**Shipping:**"));
        assert!(!prompt.contains("**Featured Products:**"));
        assert!(prompt.contains("**Call to Action:** Shop Now\n"));
    }

    #[test]
    fn blank_call_to_action_defaults() {
        let p = profile().with_call_to_action("  ");
        assert_eq!(p.call_to_action(), DEFAULT_CALL_TO_ACTION);
    }

    #[test]
    fn profile_json_uses_questionnaire_names() {
        let json = serde_json::json!({
            "storeName": "Shop",
            "targetAudience": "Everyone",
            "storeDescription": "Things",
            "brandColors": { "primary": "#000", "secondary": "#fff" }
        });
        let p: StoreProfile = serde_json::from_value(json).unwrap();
        assert_eq!(p.store_name, "Shop");
        assert_eq!(p.currency, "USD ($)");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn template_prompt_references_template() {
        let wrapped = template_prompt("tmpl_123", "**Business:** Acme Co");
        assert!(wrapped.contains("tmpl_123"));
        assert!(wrapped.ends_with("**Business:** Acme Co"));
    }
}
