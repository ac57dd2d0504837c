//! Request configuration and the providers that supply it.
//!
//! # Design
//! The client never caches configuration. It asks its `ConfigProvider` for a
//! fresh `RequestConfig` on every call, so a provider backed by the
//! environment (or anything else mutable) is observed immediately.

use std::fmt;

/// Environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "SSHCLAUDE_API_BASE";
/// Environment variable holding the bearer token.
pub const TOKEN_VAR: &str = "SSHCLAUDE_API_TOKEN";

/// Base URL and bearer token applied to every outbound request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Prefix prepended verbatim to each request path. May be empty.
    pub base_url: String,
    /// Bearer credential. `None` and `Some("")` both mean "no token".
    pub token: Option<String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// The token if one is set and non-empty.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.bearer().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of `RequestConfig`, consulted once per request.
pub trait ConfigProvider {
    fn config(&self) -> RequestConfig;
}

impl ConfigProvider for RequestConfig {
    fn config(&self) -> RequestConfig {
        self.clone()
    }
}

impl<F> ConfigProvider for F
where
    F: Fn() -> RequestConfig,
{
    fn config(&self) -> RequestConfig {
        self()
    }
}

/// Reads the base URL and token from environment variables on every call.
///
/// Unset or non-unicode variables are treated as absent: the base URL falls
/// back to `""` and the token to `None`.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    base_var: String,
    token_var: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::with_vars(BASE_URL_VAR, TOKEN_VAR)
    }

    pub fn with_vars(base_var: &str, token_var: &str) -> Self {
        Self {
            base_var: base_var.to_string(),
            token_var: token_var.to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvConfig {
    fn config(&self) -> RequestConfig {
        RequestConfig {
            base_url: std::env::var(&self.base_var).unwrap_or_default(),
            token: std::env::var(&self.token_var).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn empty_token_counts_as_unset() {
        assert_eq!(RequestConfig::new("", Some(String::new())).bearer(), None);
        assert_eq!(RequestConfig::new("", None).bearer(), None);
        assert_eq!(RequestConfig::new("", Some("t".into())).bearer(), Some("t"));
    }

    #[test]
    fn debug_output_redacts_token() {
        let cfg = RequestConfig::new("http://api", Some("secret".into()));
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn closure_provider_is_consulted_each_call() {
        let token = Mutex::new(None::<String>);
        let provider = || RequestConfig::new("http://api", token.lock().unwrap().clone());

        assert_eq!(provider.config().bearer(), None);
        *token.lock().unwrap() = Some("rotated".into());
        assert_eq!(provider.config().bearer(), Some("rotated"));
    }

    #[test]
    fn env_provider_reads_at_call_time() {
        let base_var = "CONSOLE_CORE_TEST_BASE_A";
        let token_var = "CONSOLE_CORE_TEST_TOKEN_A";
        std::env::remove_var(base_var);
        std::env::remove_var(token_var);
        let provider = EnvConfig::with_vars(base_var, token_var);

        assert_eq!(provider.config(), RequestConfig::default());

        std::env::set_var(base_var, "http://example.test");
        std::env::set_var(token_var, "abc");
        let cfg = provider.config();
        assert_eq!(cfg.base_url, "http://example.test");
        assert_eq!(cfg.bearer(), Some("abc"));

        std::env::remove_var(base_var);
        std::env::remove_var(token_var);
    }
}
