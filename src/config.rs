use std::time::Duration;

/// Default Ollama API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// How long the status probe waits before reaching out, so the splash
/// screen doesn't flash by.
pub const DEFAULT_STATUS_DELAY_MS: u64 = 2150;

/// Where the inference server lives and how the status probe behaves.
///
/// Site address, asset paths and the rest of the hosting options come from
/// `[package.metadata.leptos]` through `leptos::get_configuration`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub status_delay: Duration,
}

impl OllamaConfig {
    /// Read `OLLAMA_HOST` and `OCHAT_STATUS_DELAY_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("OLLAMA_HOST").ok(),
            std::env::var("OCHAT_STATUS_DELAY_MS").ok(),
        )
    }

    fn from_vars(host: Option<String>, delay_ms: Option<String>) -> Self {
        let base_url = host
            .map(|h| normalize_host(&h))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let status_delay = match delay_ms {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    log::warn!("ignoring invalid OCHAT_STATUS_DELAY_MS={raw:?}");
                    Duration::from_millis(DEFAULT_STATUS_DELAY_MS)
                }
            },
            None => Duration::from_millis(DEFAULT_STATUS_DELAY_MS),
        };

        Self { base_url, status_delay }
    }

    /// Override the base URL (tests point this at a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_host(&url.into());
        self
    }

    pub fn status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

/// Port Ollama listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 11434;

// `OLLAMA_HOST` is commonly set as a bare `host` or `host:port`. A missing
// port means 11434 over http and 443 over https, as Ollama itself reads it.
fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
        None => ("http".to_string(), trimmed),
    };
    let (authority, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    if authority.is_empty() || has_port(authority) {
        return format!("{scheme}://{authority}{path}");
    }
    let port = if scheme == "https" { 443 } else { DEFAULT_PORT };
    format!("{scheme}://{authority}:{port}{path}")
}

fn has_port(authority: &str) -> bool {
    match authority.rfind(']') {
        // [::1] or [::1]:11434
        Some(end) => authority[end..].contains(':'),
        None => authority.contains(':'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.status_delay, Duration::from_millis(2150));
    }

    #[test]
    fn bare_host_gets_scheme() {
        let config = OllamaConfig::from_vars(Some("10.0.0.5:11434".into()), None);
        assert_eq!(config.base_url, "http://10.0.0.5:11434");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = OllamaConfig::from_vars(Some("https://llm.lan:8443/".into()), None);
        assert_eq!(config.tags_url(), "https://llm.lan:8443/api/tags");
        assert_eq!(config.chat_url(), "https://llm.lan:8443/api/chat");
        assert_eq!(config.root_url(), "https://llm.lan:8443/");
    }

    #[test]
    fn missing_port_defaults_to_ollamas() {
        for (raw, expected) in [
            ("0.0.0.0", "http://0.0.0.0:11434"),
            ("localhost", "http://localhost:11434"),
            ("http://gpu-box", "http://gpu-box:11434"),
            ("https://llm.lan/", "https://llm.lan:443"),
            ("[::1]", "http://[::1]:11434"),
            ("[::1]:8080", "http://[::1]:8080"),
            ("gpu-box/ollama", "http://gpu-box:11434/ollama"),
        ] {
            let config = OllamaConfig::from_vars(Some(raw.into()), None);
            assert_eq!(config.base_url, expected, "OLLAMA_HOST={raw}");
        }
    }

    #[test]
    fn blank_host_falls_back() {
        let config = OllamaConfig::from_vars(Some("   ".into()), None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn delay_parses_and_rejects_garbage() {
        let config = OllamaConfig::from_vars(None, Some("0".into()));
        assert_eq!(config.status_delay, Duration::ZERO);

        let config = OllamaConfig::from_vars(None, Some("soon".into()));
        assert_eq!(config.status_delay, Duration::from_millis(DEFAULT_STATUS_DELAY_MS));
    }

    #[test]
    fn builder_overrides() {
        let config = OllamaConfig::default()
            .base_url("http://127.0.0.1:9999/")
            .status_delay(Duration::from_millis(5));
        assert_eq!(config.chat_url(), "http://127.0.0.1:9999/api/chat");
        assert_eq!(config.status_delay, Duration::from_millis(5));
    }
}
