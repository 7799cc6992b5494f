//! Client configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the session cookies (`k=v; k2=v2`).
pub const COOKIE_ENV: &str = "EXAM_COOKIE";
/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "EXAMTOOL_BASE_URL";
/// Cookie whose value is echoed back in the `X-XSRF-TOKEN` header.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Top-level examtool configuration.
///
/// Note: Custom Debug impl masks the cookie to keep session tokens out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExamtoolConfig {
    /// Exam service root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Session cookies copied from a logged-in browser.
    #[serde(default)]
    pub cookie: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Max score for imported questions that don't set `points`.
    #[serde(default = "default_max_score")]
    pub default_max_score: u32,
    /// HTTPS proxy URL, e.g. a local intercepting proxy.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Accept self-signed certificates (only useful with `proxy`).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for ExamtoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamtoolConfig")
            .field("base_url", &self.base_url)
            .field("cookie", &self.cookie.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("default_max_score", &self.default_max_score)
            .field("proxy", &self.proxy)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://exam.aalto.fi".to_string()
}
fn default_timeout() -> u64 {
    60
}
fn default_max_score() -> u32 {
    1
}

impl Default for ExamtoolConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cookie: None,
            timeout_secs: default_timeout(),
            default_max_score: default_max_score(),
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

impl ExamtoolConfig {
    /// Whether a non-blank cookie is configured. An unset `${EXAM_COOKIE}`
    /// resolves to an empty string, which counts as missing.
    pub fn has_cookie(&self) -> bool {
        self.cookie.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// The configured cookies as name/value pairs.
    pub fn cookies(&self) -> Vec<(String, String)> {
        parse_cookies(self.cookie.as_deref().unwrap_or(""))
    }

    /// Value for the `X-XSRF-TOKEN` header, empty when the cookie is missing.
    pub fn xsrf_token(&self) -> String {
        self.cookies()
            .into_iter()
            .find(|(name, _)| name == XSRF_COOKIE)
            .map(|(_, value)| value)
            .unwrap_or_default()
    }
}

/// Parse a `Cookie`-style string. Entries without `=` are ignored.
pub fn parse_cookies(s: &str) -> Vec<(String, String)> {
    s.split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `examtool.toml` in the current directory
/// 2. `~/.config/examtool/config.toml`
///
/// Environment variable overrides: `EXAMTOOL_BASE_URL`, `EXAM_COOKIE`.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamtoolConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examtool.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamtoolConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamtoolConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        config.base_url = url;
    }
    if let Ok(cookie) = std::env::var(COOKIE_ENV) {
        config.cookie = Some(cookie);
    }

    config.base_url = resolve_env_vars(&config.base_url)
        .trim_end_matches('/')
        .to_string();
    config.cookie = config.cookie.as_deref().map(resolve_env_vars);
    config.proxy = config.proxy.as_deref().map(resolve_env_vars);

    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examtool"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMTOOL_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMTOOL_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMTOOL_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EXAMTOOL_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExamtoolConfig::default();
        assert_eq!(config.base_url, "https://exam.aalto.fi");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.default_max_score, 1);
        assert!(config.cookie.is_none());
    }

    #[test]
    fn parse_cookie_string() {
        let cookies = parse_cookies("SESSION=abc; XSRF-TOKEN=tok=en ;broken; =empty");
        assert_eq!(
            cookies,
            vec![
                ("SESSION".to_string(), "abc".to_string()),
                ("XSRF-TOKEN".to_string(), "tok=en".to_string()),
                (String::new(), "empty".to_string()),
            ]
        );
        assert!(parse_cookies("").is_empty());
    }

    #[test]
    fn blank_cookie_is_missing() {
        assert!(!ExamtoolConfig::default().has_cookie());
        for cookie in ["", "  "] {
            let config = ExamtoolConfig {
                cookie: Some(cookie.into()),
                ..Default::default()
            };
            assert!(!config.has_cookie());
        }
        let config = ExamtoolConfig {
            cookie: Some("SESSION=abc".into()),
            ..Default::default()
        };
        assert!(config.has_cookie());
    }

    #[test]
    fn unset_cookie_variable_is_missing() {
        std::env::remove_var("_EXAMTOOL_UNSET_COOKIE");
        let config = ExamtoolConfig {
            cookie: Some(resolve_env_vars("${_EXAMTOOL_UNSET_COOKIE}")),
            ..Default::default()
        };
        assert!(!config.has_cookie());
    }

    #[test]
    fn xsrf_token_from_cookie() {
        let config = ExamtoolConfig {
            cookie: Some("a=1; XSRF-TOKEN=secret".into()),
            ..Default::default()
        };
        assert_eq!(config.xsrf_token(), "secret");
        assert_eq!(ExamtoolConfig::default().xsrf_token(), "");
    }

    #[test]
    fn debug_masks_cookie() {
        let config = ExamtoolConfig {
            cookie: Some("SESSION=very-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn parse_config_file() {
        let toml_str = r#"
base_url = "https://exam.example.org"
timeout_secs = 10
default_max_score = 2
proxy = "https://localhost:8080"
accept_invalid_certs = true
"#;
        let config: ExamtoolConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://exam.example.org");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.default_max_score, 2);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examtool.toml");
        std::fs::write(&path, "timeout_secs = 5\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.base_url.ends_with('/'));
    }

    #[test]
    fn load_missing_explicit_path() {
        let err = load_config_from(Some(Path::new("/nonexistent/examtool.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
