//! Utility functions and helpers

use crate::error::{RequrlError, Result};
use std::path::PathBuf;
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| RequrlError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Directory holding cookie jar files, under the system temp dir.
    pub fn cookie_dir() -> PathBuf {
        std::env::temp_dir().join("requrl-cookie")
    }

    /// Resolve a jar file id to its path, creating the jar directory if
    /// it does not exist yet.
    pub fn cookie_jar_path(file_id: &str) -> Result<PathBuf> {
        let dir = Self::cookie_dir();
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(dir.join(file_id))
    }
}

#[cfg(test)]
mod tests {
    use super::{FileUtils, UrlUtils};
    use crate::error::RequrlError;

    #[test]
    fn validate_url_adds_scheme() {
        let url = UrlUtils::validate_url("example.com").expect("valid url");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn validate_url_rejects_invalid_input() {
        let err = UrlUtils::validate_url("http://").expect_err("invalid url");
        assert!(matches!(err, RequrlError::InvalidUrl(_)));
    }

    #[test]
    fn cookie_jar_path_creates_directory() {
        let path = FileUtils::cookie_jar_path("utils-test.tmp").expect("jar path");
        assert!(FileUtils::cookie_dir().is_dir());
        assert_eq!(path, FileUtils::cookie_dir().join("utils-test.tmp"));
    }
}
