//! Response normalization
//!
//! The generation service answers with several shapes depending on the
//! endpoint and API version. Everything is mapped into one
//! [`NormalizedResponse`] here so nothing downstream inspects raw JSON.

use crate::error::ServiceError;
use crate::types::{DeploymentResult, GenerationOrigin, GenerationResult};
use chrono::Utc;
use serde_json::Value;
use storegen_files::{normalize_path, FileSet, NamedFile};

/// Get value at path (dot notation)
fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// First non-empty string among `paths`
fn first_str<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a str> {
    paths
        .iter()
        .filter_map(|path| get_path(root, path).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Identifier that may arrive as a string or a number
fn first_id(root: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match get_path(root, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty_array<'a>(root: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    get_path(root, path)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Generation response in normalized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    /// Conversation id
    pub conversation_id: String,
    /// Conversation link, empty when absent
    pub external_url: String,
    /// Embeddable preview
    pub preview_url: Option<String>,
    /// Generated files, `None` when there are none
    pub files: Option<FileSet>,
    /// Assistant text, empty when absent
    pub text: String,
    /// Produced by an upstream mock
    pub is_mock: bool,
}

impl NormalizedResponse {
    /// Stamp into a generation result
    #[must_use]
    pub fn into_result(self, origin: GenerationOrigin) -> GenerationResult {
        let origin = if self.is_mock {
            GenerationOrigin::Mock
        } else {
            origin
        };
        GenerationResult {
            conversation_id: self.conversation_id,
            external_url: self.external_url,
            preview_url: self.preview_url,
            files: self.files,
            raw_text: self.text,
            is_mock: self.is_mock,
            origin,
            generated_at: Utc::now(),
        }
    }
}

/// Normalize a raw generation service response
///
/// # Field resolution
/// - conversation id: `id`, `chatId`, `chat.id`
/// - external url: `url`, `webUrl`, `v0Url`
/// - preview: `demo`, `demoUrl`, `latestVersion.demoUrl`, else the external url
/// - text: `text`, `content`, last message's `content`
/// - files: `files`, `latestVersion.files`, newest message with files
///
/// # Errors
/// `ServiceError::MalformedResponse` when no conversation id is present
pub fn normalize_response(raw: &Value) -> Result<NormalizedResponse, ServiceError> {
    let conversation_id = first_id(raw, &["id", "chatId", "chat.id"])
        .ok_or_else(|| ServiceError::malformed("response carries no conversation id"))?;

    let external_url = first_str(raw, &["url", "webUrl", "v0Url"])
        .unwrap_or_default()
        .to_string();

    let preview_url = first_str(raw, &["demo", "demoUrl", "latestVersion.demoUrl"])
        .map(str::to_string)
        .or_else(|| (!external_url.is_empty()).then(|| external_url.clone()));

    let text = first_str(raw, &["text", "content"])
        .or_else(|| {
            get_path(raw, "messages")
                .and_then(Value::as_array)
                .and_then(|messages| messages.last())
                .and_then(|last| first_str(last, &["content"]))
        })
        .unwrap_or_default()
        .to_string();

    let files = raw_files(raw)
        .map(|files| normalize_files(files))
        .filter(|set| !set.is_empty());

    let is_mock = get_path(raw, "_isMock")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(NormalizedResponse {
        conversation_id,
        external_url,
        preview_url,
        files,
        text,
        is_mock,
    })
}

fn raw_files(raw: &Value) -> Option<&Vec<Value>> {
    non_empty_array(raw, "files")
        .or_else(|| non_empty_array(raw, "latestVersion.files"))
        .or_else(|| {
            get_path(raw, "messages")
                .and_then(Value::as_array)?
                .iter()
                .rev()
                .find_map(|message| non_empty_array(message, "files"))
        })
}

/// Normalize a list of raw service files, dropping unusable entries
#[must_use]
pub fn normalize_files(raw: &[Value]) -> FileSet {
    let mut set = FileSet::with_capacity(raw.len());
    for file in raw {
        match normalize_file(file) {
            Some(named) => {
                set.insert(named.path, named.content);
            }
            None => tracing::debug!("dropping generated file without path or content"),
        }
    }
    set
}

/// Normalize one raw service file
///
/// Path: `meta.file`, `name`, `path`, else kebab-cased `meta.title` plus
/// `.tsx`. Content: `source`, `content`.
#[must_use]
pub fn normalize_file(raw: &Value) -> Option<NamedFile> {
    let path = first_str(raw, &["meta.file", "name", "path"])
        .map(normalize_path)
        .or_else(|| first_str(raw, &["meta.title"]).map(|title| format!("{}.tsx", kebab(title))))
        .filter(|path| !path.is_empty())?;

    let content = ["source", "content"]
        .iter()
        .filter_map(|key| raw.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())?;

    Some(NamedFile::new(path, content))
}

/// Lower-case and join whitespace-separated words with `-`
fn kebab(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Normalize a hosting service deployment response
///
/// `fallback_name` is used for the inspector link when the response does not
/// echo the project name. The raw body is kept unmodified; a response
/// without an id yields an empty `id`.
#[must_use]
pub fn normalize_deployment(raw: Value, fallback_name: &str, team_id: Option<&str>) -> DeploymentResult {
    let id = first_id(&raw, &["id"]).unwrap_or_default();

    let url = ["alias", "url"]
        .iter()
        .find_map(|key| primary_url(raw.get(key)?))
        .unwrap_or_default();

    let deployment_url = if url.is_empty() {
        String::new()
    } else {
        format!("https://{url}")
    };

    let ready_state = first_str(&raw, &["readyState", "status"]).map(str::to_string);

    let name = first_str(&raw, &["name"]).unwrap_or(fallback_name);
    let team = team_id
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("{t}/"))
        .unwrap_or_default();
    let inspector_url = if id.is_empty() {
        format!("https://vercel.com/{team}{name}")
    } else {
        format!("https://vercel.com/{team}{name}/{id}")
    };

    DeploymentResult {
        id,
        url,
        deployment_url,
        ready_state,
        inspector_url,
        raw,
    }
}

/// First host of an array or comma-separated list
fn primary_url(value: &Value) -> Option<String> {
    let candidate = match value {
        Value::Array(items) => items.iter().find_map(Value::as_str)?,
        Value::String(s) => s.split(',').next()?,
        _ => return None,
    };
    let candidate = candidate.trim();
    (!candidate.is_empty()).then(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn create_response_shape() {
        let raw = json!({
            "id": "chat_1",
            "url": "https://v0.dev/chat/chat_1",
            "demo": "https://demo.vusercontent.net/1",
            "text": "Here is your store",
            "files": [
                { "lang": "tsx", "meta": { "file": "app/page.tsx" }, "source": "page" }
            ]
        });

        let n = normalize_response(&raw).unwrap();
        assert_eq!(n.conversation_id, "chat_1");
        assert_eq!(n.external_url, "https://v0.dev/chat/chat_1");
        assert_eq!(n.preview_url.as_deref(), Some("https://demo.vusercontent.net/1"));
        assert_eq!(n.text, "Here is your store");
        assert_eq!(n.files.unwrap().get("app/page.tsx"), Some("page"));
        assert!(!n.is_mock);
    }

    #[test]
    fn platform_api_shape() {
        let raw = json!({
            "chat": { "id": "abc" },
            "webUrl": "https://v0.dev/chat/abc",
            "latestVersion": {
                "demoUrl": "https://preview/abc",
                "files": [{ "name": "components/hero.tsx", "content": "hero" }]
            },
            "messages": [
                { "content": "first" },
                { "content": "latest reply" }
            ]
        });

        let n = normalize_response(&raw).unwrap();
        assert_eq!(n.conversation_id, "abc");
        assert_eq!(n.external_url, "https://v0.dev/chat/abc");
        assert_eq!(n.preview_url.as_deref(), Some("https://preview/abc"));
        assert_eq!(n.text, "latest reply");
        assert_eq!(n.files.unwrap().get("components/hero.tsx"), Some("hero"));
    }

    #[test]
    fn files_from_newest_message_with_files() {
        let raw = json!({
            "chatId": "c",
            "files": [],
            "messages": [
                { "files": [{ "name": "old.tsx", "content": "old" }] },
                { "files": [{ "name": "new.tsx", "content": "new" }] },
                { "content": "no files here" }
            ]
        });

        let files = normalize_response(&raw).unwrap().files.unwrap();
        assert_eq!(files.paths().collect::<Vec<_>>(), vec!["new.tsx"]);
    }

    #[test]
    fn missing_id_is_malformed() {
        let err = normalize_response(&json!({ "url": "x" })).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
    }

    #[test]
    fn mock_flag_honored() {
        let n = normalize_response(&json!({ "id": "m", "_isMock": true })).unwrap();
        assert!(n.is_mock);
        let result = n.into_result(GenerationOrigin::Plain);
        assert_eq!(result.origin, GenerationOrigin::Mock);
        assert!(result.is_mock);
    }

    #[test]
    fn file_path_resolution_order() {
        let file = normalize_file(&json!({
            "meta": { "file": "./app/page.tsx", "title": "Ignored" },
            "name": "also-ignored.tsx",
            "source": "x"
        }))
        .unwrap();
        assert_eq!(file.path, "app/page.tsx");

        let file = normalize_file(&json!({
            "meta": { "title": "Landing Page (Mock)" },
            "source": "x"
        }))
        .unwrap();
        assert_eq!(file.path, "landing-page-(mock).tsx");
    }

    #[test]
    fn unusable_files_dropped() {
        let set = normalize_files(&[
            json!({ "source": "no path" }),
            json!({ "name": "empty.tsx", "source": "" }),
            json!({ "name": "ok.tsx", "content": "ok" }),
        ]);
        assert_eq!(set.paths().collect::<Vec<_>>(), vec!["ok.tsx"]);
    }

    #[test]
    fn empty_file_list_is_absent() {
        let raw = json!({ "id": "c", "files": [{ "source": "orphan" }] });
        assert_eq!(normalize_response(&raw).unwrap().files, None);
    }

    #[test]
    fn deployment_alias_array() {
        let raw = json!({
            "id": "dpl_1",
            "name": "acme",
            "alias": ["acme.vercel.app", "acme-git.vercel.app"],
            "url": "acme-123.vercel.app",
            "readyState": "QUEUED"
        });

        let d = normalize_deployment(raw.clone(), "fallback", Some("team_9"));
        assert_eq!(d.url, "acme.vercel.app");
        assert_eq!(d.deployment_url, "https://acme.vercel.app");
        assert_eq!(d.ready_state.as_deref(), Some("QUEUED"));
        assert_eq!(d.inspector_url, "https://vercel.com/team_9/acme/dpl_1");
        assert_eq!(d.raw, raw);
    }

    #[test]
    fn deployment_comma_separated_url() {
        let raw = json!({ "id": "dpl_2", "url": "a.vercel.app,b.vercel.app", "status": "BUILDING" });

        let d = normalize_deployment(raw, "shop", None);
        assert_eq!(d.url, "a.vercel.app");
        assert_eq!(d.ready_state.as_deref(), Some("BUILDING"));
        assert_eq!(d.inspector_url, "https://vercel.com/shop/dpl_2");
    }

    #[test]
    fn deployment_without_id_keeps_raw() {
        let raw = json!({ "url": "acme.vercel.app", "readyState": "QUEUED" });

        let d = normalize_deployment(raw.clone(), "acme", None);
        assert_eq!(d.id, "");
        assert_eq!(d.deployment_url, "https://acme.vercel.app");
        assert_eq!(d.inspector_url, "https://vercel.com/acme");
        assert_eq!(d.raw, raw);
    }

    #[test]
    fn preview_falls_back_to_conversation_link() {
        let n = normalize_response(&json!({ "id": "c1", "url": "https://v0.dev/chat/c1" })).unwrap();
        assert_eq!(n.preview_url.as_deref(), Some("https://v0.dev/chat/c1"));

        let n = normalize_response(&json!({ "id": "c2" })).unwrap();
        assert_eq!(n.preview_url, None);
    }

    proptest! {
        #[test]
        fn normalized_files_have_paths_and_content(
            entries in proptest::collection::vec(("[a-z./ ]{0,12}", ".{0,8}"), 0..16)
        ) {
            let raw: Vec<Value> = entries
                .iter()
                .map(|(path, content)| json!({ "name": path, "content": content }))
                .collect();

            let set = normalize_files(&raw);
            prop_assert!(set.len() <= raw.len());
            for path in set.paths() {
                prop_assert!(!path.is_empty());
                prop_assert!(!set.get(path).unwrap_or_default().is_empty());
            }
        }
    }
}
