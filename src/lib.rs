//! requrl - a reusable HTTP request builder
//!
//! This crate provides a chainable request builder that accumulates options
//! (cookies, compression, user agent, referer, timeouts, custom headers,
//! query/body parameters, proxy settings), executes one request per terminal
//! call and resets itself afterward. Transport is delegated to reqwest; the
//! response comes back split into its raw header block and body together
//! with diagnostic metadata.

pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod logging;
pub mod utils;

pub use config::{HeaderLine, Params, ProxyAuth, ProxyConfig, ProxyKind, RequestConfig};
pub use error::{RequrlError, Result};
pub use http::header::parse_header;
pub use http::request::RequestUrl;
pub use http::response::{RequestInfo, RequestResult, TransportError, TransportErrorKind};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
