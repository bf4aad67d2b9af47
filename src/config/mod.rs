use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:6689";

/// Runtime configuration injected by the hosting page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // We support BOTH `window.ENV.API_URL` (documented) and
        // `window.ENV.api_url` (legacy) for compatibility.
        let (primary, legacy) = match web_sys::window().and_then(|w| w.get("ENV")) {
            Some(env) if !env.is_undefined() && env.is_object() => (
                read_string(&env, "API_URL"),
                read_string(&env, "api_url"),
            ),
            _ => (None, None),
        };

        Self {
            api_url: resolve_api_url(primary, legacy),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_string(env: &js_sys::Object, key: &str) -> Option<String> {
    js_sys::Reflect::get(env, &key.into())
        .ok()
        .and_then(|v| v.as_string())
}

/// Pick the API base URL: `API_URL`, then `api_url`, then the default. Trailing
/// slashes are dropped so paths can be appended directly.
pub(crate) fn resolve_api_url(primary: Option<String>, legacy: Option<String>) -> String {
    primary
        .filter(|s| !s.trim().is_empty())
        .or_else(|| legacy.filter(|s| !s.trim().is_empty()))
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_url_prefers_documented_key() {
        let url = resolve_api_url(
            Some("https://api.example.com".to_string()),
            Some("https://legacy.example.com".to_string()),
        );
        assert_eq!(url, "https://api.example.com");
    }

    #[test]
    fn test_resolve_api_url_falls_back_to_legacy() {
        let url = resolve_api_url(None, Some("https://legacy.example.com/".to_string()));
        assert_eq!(url, "https://legacy.example.com");
    }

    #[test]
    fn test_resolve_api_url_default() {
        assert_eq!(resolve_api_url(None, None), DEFAULT_API_URL);
        assert_eq!(resolve_api_url(Some("  ".to_string()), None), DEFAULT_API_URL);
    }
}
