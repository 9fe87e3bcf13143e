//! Response capture types
//!
//! A request always produces a [`RequestResult`]; transport failures are
//! carried inside [`RequestInfo`] instead of being raised, so callers
//! inspect `info` to decide what to do next.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};

use crate::error::RequrlError;

/// Classification of a failed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The target URL could not be parsed
    Url,
    /// The transport client could not be assembled
    Builder,
    Connect,
    Timeout,
    /// Redirect hop limit exceeded
    Redirect,
    /// The response body could not be decoded
    Decode,
    Io,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Url => "url",
            TransportErrorKind::Builder => "builder",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Decode => "decode",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-level failure surfaced through [`RequestInfo`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            message: message.into(),
        }
    }

    fn classify_http(err: &reqwest::Error) -> TransportErrorKind {
        // A connect timeout reports both predicates; timeout wins.
        if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_builder() {
            TransportErrorKind::Builder
        } else if err.is_decode() || err.is_body() {
            TransportErrorKind::Decode
        } else {
            TransportErrorKind::Other
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<&RequrlError> for TransportError {
    fn from(err: &RequrlError) -> Self {
        let kind = match err {
            RequrlError::Http(e) => Self::classify_http(e),
            RequrlError::InvalidUrl(_) => TransportErrorKind::Url,
            RequrlError::Io(_) => TransportErrorKind::Io,
            RequrlError::Proxy(_) | RequrlError::Config(_) => TransportErrorKind::Builder,
            RequrlError::Json(_) => TransportErrorKind::Other,
        };
        TransportError::new(kind, err.to_string())
    }
}

/// Diagnostic metadata captured alongside the response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Final URL after following redirects
    pub effective_url: String,
    /// HTTP status code, `0` when no response was received
    pub http_code: u16,
    pub content_type: Option<String>,
    /// Declared `Content-Length`, `None` when the server did not report one
    pub content_length: Option<u64>,
    /// Body bytes actually received
    pub size_download: u64,
    /// `None` on success
    pub error: Option<TransportError>,
    /// Whether a proxy was configured for this call
    pub proxy: bool,
}

/// The outcome of one executed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    /// Raw response header block; `None` when no response was obtained
    pub header: Option<String>,
    /// Response body; `None` when no response was obtained
    pub body: Option<String>,
    pub info: RequestInfo,
}

impl RequestResult {
    /// Result for a request that never produced a response.
    pub fn failure(error: TransportError, effective_url: String, proxy: bool) -> Self {
        RequestResult {
            header: None,
            body: None,
            info: RequestInfo {
                effective_url,
                proxy,
                error: Some(error),
                ..RequestInfo::default()
            },
        }
    }
}

/// Reassemble the raw header block of a response: status line, one line per
/// header in transport order, terminated by a blank line.
pub fn raw_header_block(version: Version, status: StatusCode, headers: &HeaderMap) -> String {
    let mut block = match status.canonical_reason() {
        Some(reason) => format!("{:?} {} {}\r\n", version, status.as_u16(), reason),
        None => format!("{:?} {}\r\n", version, status.as_u16()),
    };
    for (name, value) in headers.iter() {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block
}

#[cfg(test)]
mod tests {
    use super::{raw_header_block, TransportError, TransportErrorKind};
    use crate::error::RequrlError;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, SET_COOKIE};
    use reqwest::{StatusCode, Version};

    #[test]
    fn header_block_has_status_line_and_terminator() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let block = raw_header_block(Version::HTTP_11, StatusCode::OK, &headers);
        assert!(block.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(block.contains("content-type: text/html\r\n"));
        assert!(block.contains("set-cookie: a=1\r\n"));
        assert!(block.contains("set-cookie: b=2\r\n"));
        assert!(block.ends_with("\r\n\r\n"));
    }

    #[test]
    fn invalid_url_classifies_as_url_error() {
        let err = RequrlError::InvalidUrl("nope".to_string());
        let transport = TransportError::from(&err);
        assert_eq!(transport.kind, TransportErrorKind::Url);
        assert!(transport.message.contains("nope"));
    }
}
