//! Deterministic local generation
//!
//! Last rung of the fallback chain. Reads the business name and call to
//! action back out of the prompt markers and renders a minimal storefront as
//! both a page source file and a self-contained `data:` preview.

use crate::types::{GenerationOrigin, GenerationResult};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use storegen_files::FileSet;

/// Business name used when the prompt has no marker
pub const DEFAULT_BUSINESS_NAME: &str = "Your Business";

/// Call to action used when the prompt has no marker
pub const DEFAULT_CALL_TO_ACTION: &str = "Get Started Today";

/// Path of the generated page
pub const MOCK_PAGE_PATH: &str = "app/page.tsx";

const DATA_URL_PREFIX: &str = "data:text/html;charset=utf-8,";

static BUSINESS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?:Business|Store):\*\*[ \t]*([^\r\n]+)").expect("static regex")
});

static CTA_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Call to Action:\*\*[ \t]*([^\r\n]+)").expect("static regex"));

fn marker(re: &Regex, prompt: &str) -> Option<String> {
    re.captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Business name from the `**Business:**` (or `**Store:**`) marker
#[must_use]
pub fn extract_business_name(prompt: &str) -> Option<String> {
    marker(&BUSINESS_MARKER, prompt)
}

/// Call to action from the `**Call to Action:**` marker
#[must_use]
pub fn extract_call_to_action(prompt: &str) -> Option<String> {
    marker(&CTA_MARKER, prompt)
}

/// Conversation id derived from the prompt content
#[must_use]
pub fn mock_conversation_id(prompt: &str) -> String {
    let hash = blake3::hash(prompt.as_bytes());
    format!("mock-{}", &hash.to_hex()[..12])
}

/// Escape text for HTML and JSX text positions
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

fn data_url(html: &str) -> String {
    format!("{DATA_URL_PREFIX}{}", urlencoding::encode(html))
}

fn storefront_page(name: &str, cta: &str) -> String {
    format!(
        r#"export default function Page() {{
  return (
    <main className="min-h-screen bg-gradient-to-br from-slate-50 to-indigo-100">
      <section className="container mx-auto px-4 py-16 text-center">
        <h1 className="text-4xl md:text-6xl font-bold text-gray-900 mb-6">{name}</h1>
        <p className="text-xl text-gray-600 mb-8 max-w-2xl mx-auto">
          Discover products picked for you, delivered to your door.
        </p>
        <button className="bg-indigo-600 text-white px-8 py-4 rounded-lg text-lg font-semibold hover:bg-indigo-700">
          {cta}
        </button>
      </section>
    </main>
  );
}}
"#
    )
}

fn storefront_html(name: &str, cta: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <script src="https://cdn.tailwindcss.com"></script>
  <title>{name}</title>
</head>
<body>
  <main class="min-h-screen bg-gradient-to-br from-slate-50 to-indigo-100">
    <section class="container mx-auto px-4 py-16 text-center">
      <h1 class="text-4xl md:text-6xl font-bold text-gray-900 mb-6">{name}</h1>
      <p class="text-xl text-gray-600 mb-8 max-w-2xl mx-auto">Discover products picked for you, delivered to your door.</p>
      <button class="bg-indigo-600 text-white px-8 py-4 rounded-lg text-lg font-semibold">{cta}</button>
    </section>
  </main>
</body>
</html>
"#
    )
}

fn feedback_page(feedback: &str) -> String {
    format!(
        r#"export default function Page() {{
  return (
    <main className="min-h-screen bg-white">
      <section className="container mx-auto px-4 py-16 text-center">
        <h1 className="text-5xl font-bold mb-8">Updated Store</h1>
        <p className="text-gray-600 mb-8">Updated based on your feedback: &quot;{feedback}&quot;</p>
      </section>
    </main>
  );
}}
"#
    )
}

fn feedback_html(feedback: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <script src="https://cdn.tailwindcss.com"></script>
  <title>Updated Store</title>
</head>
<body>
  <main class="container mx-auto px-4 py-16 text-center">
    <h1 class="text-5xl font-bold mb-8">Updated Store</h1>
    <p class="text-gray-600">Updated based on your feedback: &quot;{feedback}&quot;</p>
  </main>
</body>
</html>
"#
    )
}

fn single_page(source: String) -> Option<FileSet> {
    let mut files = FileSet::with_capacity(1);
    files.insert(MOCK_PAGE_PATH, source);
    Some(files)
}

/// Synthesize a storefront from the prompt alone
///
/// Identical prompts give identical results apart from `generated_at`. The
/// business name and call to action are HTML-escaped in both the page source
/// and the preview, so `Tom & Jerry's` is embedded as `Tom &amp; Jerry&#39;s`.
#[must_use]
pub fn mock_generation(prompt: &str) -> GenerationResult {
    let name = extract_business_name(prompt).unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());
    let cta = extract_call_to_action(prompt).unwrap_or_else(|| DEFAULT_CALL_TO_ACTION.to_string());
    let (name, cta) = (escape_markup(&name), escape_markup(&cta));

    let conversation_id = mock_conversation_id(prompt);
    let source = storefront_page(&name, &cta);

    GenerationResult {
        external_url: format!("https://v0.dev/chat/{conversation_id}"),
        conversation_id,
        preview_url: Some(data_url(&storefront_html(&name, &cta))),
        files: single_page(source.clone()),
        raw_text: source,
        is_mock: true,
        origin: GenerationOrigin::Mock,
        generated_at: Utc::now(),
    }
}

/// Synthesize a refinement reply quoting the feedback
#[must_use]
pub fn mock_refinement(conversation_id: &str, feedback: &str) -> GenerationResult {
    let quoted = escape_markup(feedback.trim());

    GenerationResult {
        conversation_id: conversation_id.to_string(),
        external_url: format!("https://v0.dev/chat/{conversation_id}"),
        preview_url: Some(data_url(&feedback_html(&quoted))),
        files: single_page(feedback_page(&quoted)),
        raw_text: format!("Updated store based on your feedback: {}", feedback.trim()),
        is_mock: true,
        origin: GenerationOrigin::Mock,
        generated_at: Utc::now(),
    }
}
