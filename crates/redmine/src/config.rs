//! Connection settings for a Redmine instance.

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Environment variable holding the tracker base URL.
pub const URL_ENV: &str = "REDMINE_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "REDMINE_API_KEY";

/// Validated connection settings.
#[derive(Clone)]
pub struct Config {
    base_url: Url,
    api_key: String,
}

impl Config {
    /// Build a config from optional raw values.
    ///
    /// Both values are required; an empty string counts as missing. The base
    /// URL must be an absolute `http` or `https` URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a value is missing or the URL scheme is
    /// unsupported, and `Error::InvalidUrl` when the URL does not parse.
    pub fn from_parts(base_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        let base_url = base_url.filter(|s| !s.trim().is_empty());
        let api_key = api_key.filter(|s| !s.trim().is_empty());

        let (Some(base_url), Some(api_key)) = (base_url, api_key) else {
            return Err(Error::Config(format!(
                "{URL_ENV} and {API_KEY_ENV} are both required"
            )));
        };

        let url = Url::parse(base_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported URL scheme '{}' (expected http or https)",
                url.scheme()
            )));
        }

        Ok(Self {
            base_url: url,
            api_key: api_key.trim().to_string(),
        })
    }

    /// Base URL without a trailing slash, suitable for joining paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// The API key sent with every request.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parts(url: Option<&str>, key: Option<&str>) -> Result<Config> {
        Config::from_parts(url.map(str::to_string), key.map(str::to_string))
    }

    #[rstest]
    #[case::no_url(None, Some("key"))]
    #[case::no_key(Some("https://redmine.example.com"), None)]
    #[case::empty_url(Some(""), Some("key"))]
    #[case::blank_key(Some("https://redmine.example.com"), Some("   "))]
    #[case::neither(None, None)]
    fn test_missing_values_rejected(#[case] url: Option<&str>, #[case] key: Option<&str>) {
        match parts(url, key) {
            Err(Error::Config(msg)) => assert!(msg.contains(URL_ENV)),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = parts(Some("https://redmine.example.com/tracker/"), Some("abc")).unwrap();
        assert_eq!(config.base_url(), "https://redmine.example.com/tracker");
        assert_eq!(config.api_key(), "abc");
    }

    #[test]
    fn test_unparseable_url() {
        assert!(matches!(
            parts(Some("not a url"), Some("abc")),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        assert!(matches!(
            parts(Some("ftp://redmine.example.com"), Some("abc")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = parts(Some("https://redmine.example.com"), Some("secret-key")).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("redacted"));
    }
}
