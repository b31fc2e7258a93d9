//! Overlay configuration.
//!
//! The overlay is configured by a flat set of named parameters, the same ones
//! an editor appends to the page URL:
//!
//! - `mode` - reserved. Defaults to `side`.
//! - `bg`, `bgAlpha`, `border`, `borderColor`, `text`, `font`, `fontSize`,
//!   `neon`, `neonColor` - theme options, see [`crate::theme::Theme`].
//! - `tasksZ` - LZ-String compressed task list. Highest priority source.
//! - `tasksUrl` - URL of a JSON task list. Second priority source.
//!
//! Parameters may be given as a whole URL or as a bare query string. When a
//! key repeats, the first value wins.

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

use crate::theme::Theme;

pub const DEFAULT_MODE: &str = "side";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid parameter override {0:?}, expected KEY=VALUE")]
    InvalidOverride(String),
}

/// Named configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    /// Parse a full URL (`https://host/page?bg=...`) or a query string
    /// (`bg=...&neon=1`, optionally starting with `?`).
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let input = input.trim();
        let mut params = Params::default();
        if looks_like_url(input) {
            let url = Url::parse(input)?;
            for (key, value) in url.query_pairs() {
                params.insert_first(&key, &value);
            }
        } else {
            let query = input.strip_prefix('?').unwrap_or(input);
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                params.insert_first(&key, &value);
            }
        }
        Ok(params)
    }

    fn insert_first(&mut self, key: &str, value: &str) {
        self.values.entry(key.to_string()).or_insert_with(|| value.to_string());
    }

    /// Replace a parameter, as a command-line override does.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Look up a parameter. Empty values count as absent so defaults apply.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Look up a parameter, falling back to `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

/// A URL starts with a scheme followed by `://`. A bare query may contain
/// `://` only inside a value, after a `=`.
fn looks_like_url(input: &str) -> bool {
    match input.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Split a `KEY=VALUE` override.
pub fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

/// Everything the overlay reads from its parameters at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub mode: String,
    pub theme: Theme,
    pub tasks_z: Option<String>,
    pub tasks_url: Option<String>,
}

impl OverlayConfig {
    pub fn from_params(params: &Params) -> Self {
        OverlayConfig {
            mode: params.get_or("mode", DEFAULT_MODE).to_string(),
            theme: Theme::from_params(params),
            tasks_z: params.get("tasksZ").map(str::to_string),
            tasks_url: params.get("tasksUrl").map(str::to_string),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig::from_params(&Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_url() {
        let params =
            Params::parse("https://example.com/game/?bg=%23101010&neon=1&tasksUrl=https%3A%2F%2Fcdn.test%2Ft.json")
                .unwrap();
        assert_eq!(params.get("bg"), Some("#101010"));
        assert_eq!(params.get("neon"), Some("1"));
        assert_eq!(params.get("tasksUrl"), Some("https://cdn.test/t.json"));
    }

    #[test]
    fn test_parses_bare_query() {
        let params = Params::parse("?fontSize=18&font=Fira+Code").unwrap();
        assert_eq!(params.get("fontSize"), Some("18"));
        assert_eq!(params.get("font"), Some("Fira Code"));
    }

    #[test]
    fn test_bare_query_may_carry_urls() {
        let params = Params::parse("tasksUrl=https://cdn.test/t.json&neon=1").unwrap();
        assert_eq!(params.get("tasksUrl"), Some("https://cdn.test/t.json"));
        assert_eq!(params.get("neon"), Some("1"));
    }

    #[test]
    fn test_first_value_wins_and_empty_is_absent() {
        let params = Params::parse("mode=a&mode=b&tasksZ=").unwrap();
        assert_eq!(params.get("mode"), Some("a"));
        assert_eq!(params.get("tasksZ"), None);
        assert_eq!(params.get_or("tasksZ", "fallback"), "fallback");
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        assert!(matches!(Params::parse("http://[::1"), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_overrides() {
        assert_eq!(parse_override("neon=1").unwrap(), ("neon".to_string(), "1".to_string()));
        assert_eq!(parse_override("text=a=b").unwrap(), ("text".to_string(), "a=b".to_string()));
        assert!(parse_override("=1").is_err());
        assert!(parse_override("neon").is_err());

        let mut params = Params::parse("neon=0").unwrap();
        params.set("neon", "1");
        assert_eq!(params.get("neon"), Some("1"));
    }

    #[test]
    fn test_config_sources() {
        let config = OverlayConfig::from_params(&Params::parse("tasksZ=BYUwNmD2Q&tasksUrl=t.json").unwrap());
        assert_eq!(config.mode, "side");
        assert_eq!(config.tasks_z.as_deref(), Some("BYUwNmD2Q"));
        assert_eq!(config.tasks_url.as_deref(), Some("t.json"));

        let empty = OverlayConfig::default();
        assert_eq!(empty.tasks_z, None);
        assert_eq!(empty.tasks_url, None);
    }
}
