//! Request configuration for requrl

use std::fmt;

/// A single raw header line in `Name: value` form.
///
/// Conversions cover the two accepted input shapes: a `(name, value)` pair
/// is formatted into a raw line, a plain string is assumed pre-formatted
/// and passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine(pub String);

impl HeaderLine {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<(&str, &str)> for HeaderLine {
    fn from((name, value): (&str, &str)) -> Self {
        HeaderLine(format!("{}: {}", name, value))
    }
}

impl From<(String, String)> for HeaderLine {
    fn from((name, value): (String, String)) -> Self {
        HeaderLine(format!("{}: {}", name, value))
    }
}

impl From<&str> for HeaderLine {
    fn from(line: &str) -> Self {
        HeaderLine(line.to_string())
    }
}

impl From<String> for HeaderLine {
    fn from(line: String) -> Self {
        HeaderLine(line)
    }
}

/// Request parameters.
///
/// `Form` holds an ordered name→value mapping encoded as a query string on
/// GET and as a form body on POST/PUT/DELETE. `Raw` is passed through
/// untouched (JSON, XML or any other pre-encoded payload).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Params {
    #[default]
    None,
    Form(Vec<(String, String)>),
    Raw(String),
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Form(pairs) => pairs.is_empty(),
            Params::Raw(body) => body.is_empty(),
        }
    }
}

impl<K, V> From<Vec<(K, V)>> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Params::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for Params {
    fn from(body: &str) -> Self {
        Params::Raw(body.to_string())
    }
}

impl From<String> for Params {
    fn from(body: String) -> Self {
        Params::Raw(body)
    }
}

impl From<serde_json::Value> for Params {
    fn from(value: serde_json::Value) -> Self {
        Params::Raw(value.to_string())
    }
}

/// Proxy protocol selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyKind {
    #[default]
    Http,
    Socks5,
}

impl ProxyKind {
    /// URL scheme understood by the transport
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Socks5 => "socks5",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Proxy authentication method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyAuth {
    #[default]
    Basic,
}

/// Proxy configuration
///
/// Empty or zero fields are skipped individually when the request is built:
/// an empty host disables the proxy altogether, a zero port yields a
/// host-only proxy URL and empty credentials add no authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub user_password: String,
    pub kind: ProxyKind,
    pub auth: ProxyAuth,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ProxyConfig {
            host: host.into(),
            port,
            user_password: String::new(),
            kind: ProxyKind::default(),
            auth: ProxyAuth::default(),
        }
    }

    /// Credentials in `user:password` form
    pub fn user_password(mut self, user_password: impl Into<String>) -> Self {
        self.user_password = user_password.into();
        self
    }

    pub fn kind(mut self, kind: ProxyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn auth(mut self, auth: ProxyAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Split the stored credentials at the first `:`.
    ///
    /// A missing password is allowed and comes back empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.user_password.is_empty() {
            return None;
        }
        match self.user_password.split_once(':') {
            Some((user, password)) => Some((user, password)),
            None => Some((self.user_password.as_str(), "")),
        }
    }

    /// Proxy URL for the transport, `None` when the host is empty.
    pub fn url(&self) -> Option<String> {
        if self.host.is_empty() {
            return None;
        }
        if self.port == 0 {
            Some(format!("{}://{}", self.kind.scheme(), self.host))
        } else {
            Some(format!("{}://{}:{}", self.kind.scheme(), self.host, self.port))
        }
    }
}

/// Accumulated request configuration.
///
/// Owned by [`crate::RequestUrl`]; restored to these defaults after every
/// executed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Cookie jar file id under the jar directory; `None` disables cookies
    pub cookie_file: Option<String>,
    /// Ask for and transparently decode gzip/deflate content
    pub gzip: bool,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Whole-request timeout in seconds, `0` leaves the transport default
    pub timeout_secs: u64,
    /// Connect timeout in seconds, `0` leaves the transport default
    pub connect_timeout_secs: u64,
    /// Raw header lines applied verbatim, in order, without deduplication
    pub headers: Vec<String>,
    pub params: Params,
    pub proxy: Option<ProxyConfig>,
    /// Skip TLS certificate verification; off unless explicitly opted in
    pub accept_invalid_certs: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig {
            cookie_file: None,
            gzip: false,
            user_agent: None,
            referer: None,
            timeout_secs: 10,
            connect_timeout_secs: 5,
            headers: Vec::new(),
            params: Params::None,
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}
