//! Chainable request builder
//!
//! [`RequestUrl`] accumulates request options through chained setters; each
//! of the four verb methods executes exactly one request and restores the
//! configuration to its defaults, so no setting leaks into the next call.
//! Construct one instance per logical caller — the executed request works
//! on an owned snapshot, the builder itself holds no shared state.

use reqwest::Method;

use crate::config::{HeaderLine, Params, ProxyConfig, RequestConfig};
use crate::http::response::RequestResult;
use crate::http::HttpEngine;

/// Reusable HTTP request builder with a reset-after-use lifecycle
#[derive(Debug, Default)]
pub struct RequestUrl {
    config: RequestConfig,
}

impl RequestUrl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current configuration, as it would be applied to the next request
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Enable persistent cookies stored under the given jar file id.
    ///
    /// The jar lives in a `requrl-cookie` directory under the system temp
    /// dir and is both read before and written after each request. An
    /// empty id disables cookies.
    pub fn enable_cookie(&mut self, file_id: impl Into<String>) -> &mut Self {
        let file_id = file_id.into();
        self.config.cookie_file = if file_id.is_empty() { None } else { Some(file_id) };
        self
    }

    /// Ask for gzip/deflate content encoding and decode it transparently
    pub fn enable_gzip(&mut self, gzip: bool) -> &mut Self {
        self.config.gzip = gzip;
        self
    }

    /// Empty input means "do not send"
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        let user_agent = user_agent.into();
        self.config.user_agent = if user_agent.is_empty() { None } else { Some(user_agent) };
        self
    }

    /// Empty input means "do not send"
    pub fn set_referer(&mut self, referer: impl Into<String>) -> &mut Self {
        let referer = referer.into();
        self.config.referer = if referer.is_empty() { None } else { Some(referer) };
        self
    }

    /// Whole-request timeout in seconds; `0` leaves the transport default
    pub fn set_timeout(&mut self, timeout_secs: u64) -> &mut Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Connect timeout in seconds; `0` leaves the transport default
    pub fn set_connect_timeout(&mut self, connect_timeout_secs: u64) -> &mut Self {
        self.config.connect_timeout_secs = connect_timeout_secs;
        self
    }

    /// Replace the accumulated header lines.
    ///
    /// Accepts `(name, value)` pairs, which become `Name: value` lines, as
    /// well as pre-formatted lines passed through unchanged. Duplicates are
    /// kept in order.
    pub fn set_headers<I, L>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: Into<HeaderLine>,
    {
        self.config.headers = headers
            .into_iter()
            .map(|line| line.into().into_inner())
            .collect();
        self
    }

    /// Replace the request parameters
    pub fn set_params(&mut self, params: impl Into<Params>) -> &mut Self {
        self.config.params = params.into();
        self
    }

    /// Replace the proxy configuration
    pub fn set_proxy(&mut self, proxy: ProxyConfig) -> &mut Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Opt out of TLS certificate verification for the next request
    pub fn accept_invalid_certs(&mut self, accept: bool) -> &mut Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Restore all configuration fields to their defaults. Idempotent.
    pub fn reset(&mut self) -> &mut Self {
        self.config = RequestConfig::default();
        self
    }

    /// GET request; form params are appended to the URL as a query string
    pub async fn get(&mut self, url: &str) -> RequestResult {
        self.request(Method::GET, url).await
    }

    /// POST request; params become the request body
    pub async fn post(&mut self, url: &str) -> RequestResult {
        self.request(Method::POST, url).await
    }

    /// PUT request; params become the request body
    pub async fn put(&mut self, url: &str) -> RequestResult {
        self.request(Method::PUT, url).await
    }

    /// DELETE request; params become the request body
    pub async fn delete(&mut self, url: &str) -> RequestResult {
        self.request(Method::DELETE, url).await
    }

    async fn request(&mut self, method: Method, url: &str) -> RequestResult {
        // Snapshot and reset in one step: the engine owns the options for
        // this transfer, the builder is already back at its defaults.
        let config = std::mem::take(&mut self.config);
        HttpEngine::execute(method, url, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::RequestUrl;
    use crate::config::{Params, ProxyConfig, RequestConfig};

    #[test]
    fn setters_accumulate_and_chain() {
        let mut builder = RequestUrl::new();
        builder
            .enable_cookie("jar.tmp")
            .enable_gzip(true)
            .set_user_agent("requrl-test")
            .set_referer("http://example.test/")
            .set_timeout(30)
            .set_connect_timeout(3);

        let config = builder.config();
        assert_eq!(config.cookie_file.as_deref(), Some("jar.tmp"));
        assert!(config.gzip);
        assert_eq!(config.user_agent.as_deref(), Some("requrl-test"));
        assert_eq!(config.referer.as_deref(), Some("http://example.test/"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 3);
    }

    #[test]
    fn empty_strings_disable_optional_settings() {
        let mut builder = RequestUrl::new();
        builder.enable_cookie("jar.tmp").set_user_agent("ua").set_referer("ref");
        builder.enable_cookie("").set_user_agent("").set_referer("");

        let config = builder.config();
        assert!(config.cookie_file.is_none());
        assert!(config.user_agent.is_none());
        assert!(config.referer.is_none());
    }

    #[test]
    fn set_headers_converts_pairs_and_passes_lines_through() {
        let mut builder = RequestUrl::new();
        builder.set_headers(vec![("X-Test", "abc"), ("Accept", "*/*")]);
        assert_eq!(builder.config().headers, vec!["X-Test: abc", "Accept: */*"]);

        builder.set_headers(vec!["X-Test: abc"]);
        assert_eq!(builder.config().headers, vec!["X-Test: abc"]);
    }

    #[test]
    fn set_headers_replaces_previous_set() {
        let mut builder = RequestUrl::new();
        builder.set_headers(vec![("X-One", "1")]);
        builder.set_headers(vec![("X-Two", "2")]);
        assert_eq!(builder.config().headers, vec!["X-Two: 2"]);
    }

    #[test]
    fn set_params_replaces_previous_value() {
        let mut builder = RequestUrl::new();
        builder.set_params(vec![("a", "1")]);
        builder.set_params("raw body");
        assert_eq!(builder.config().params, Params::Raw("raw body".to_string()));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut builder = RequestUrl::new();
        builder
            .set_headers(vec![("X-Test", "abc")])
            .set_proxy(ProxyConfig::new("10.0.0.1", 8080))
            .set_timeout(99);

        builder.reset();
        let once = builder.config().clone();
        builder.reset();
        assert_eq!(once, *builder.config());
        assert_eq!(once, RequestConfig::default());
    }
}
