//! File-backed cookie jar
//!
//! Persists cookies received in responses as a JSON file and replays them
//! on subsequent requests. The jar plugs into the transport through the
//! `reqwest` cookie store trait, so redirect hops inside a single request
//! see fresh cookies as well.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// A stored cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    /// Set from a cookie without a `Domain` attribute; matches the exact
    /// host only
    pub host_only: bool,
    /// Expiry as seconds since the epoch, `None` for session cookies
    pub expires_at: Option<u64>,
}

impl Cookie {
    fn expired(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    fn matches(&self, url: &Url, now: u64) -> bool {
        if self.expired(now) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }
        let host = match url.host_str() {
            Some(host) => host,
            None => return false,
        };
        domain_matches(&self.domain, self.host_only, host) && path_matches(&self.path, url.path())
    }
}

fn domain_matches(cookie_domain: &str, host_only: bool, host: &str) -> bool {
    if host.eq_ignore_ascii_case(cookie_domain) {
        return true;
    }
    if host_only {
        return false;
    }
    host.len() > cookie_domain.len()
        && host.to_ascii_lowercase().ends_with(&cookie_domain.to_ascii_lowercase())
        && host.as_bytes()[host.len() - cookie_domain.len() - 1] == b'.'
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path.as_bytes()[cookie_path.len()] == b'/')
}

/// Default path of a cookie set without a `Path` attribute
fn default_path(url: &Url) -> String {
    let path = url.path();
    if !path.starts_with('/') {
        return "/".to_string();
    }
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Parse one `Set-Cookie` header value.
///
/// A `Max-Age` of zero or less marks the cookie for removal by returning it
/// already expired. Only the attributes the jar stores are interpreted.
fn parse_set_cookie(raw: &str, url: &Url) -> Option<Cookie> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie {
        name: name.to_string(),
        value: value.trim().to_string(),
        domain: url.host_str()?.to_ascii_lowercase(),
        path: default_path(url),
        secure: false,
        host_only: true,
        expires_at: None,
    };

    // TODO: parse `Expires` attribute dates; only `Max-Age` is honored now.
    for attribute in parts {
        let (key, val) = match attribute.split_once('=') {
            Some((key, val)) => (key.trim(), val.trim()),
            None => (attribute.trim(), ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "domain" => {
                let domain = val.trim_start_matches('.').to_ascii_lowercase();
                if !domain.is_empty() {
                    cookie.domain = domain;
                    cookie.host_only = false;
                }
            }
            "path" => {
                if val.starts_with('/') {
                    cookie.path = val.to_string();
                }
            }
            "secure" => cookie.secure = true,
            "max-age" => {
                if let Ok(seconds) = val.parse::<i64>() {
                    cookie.expires_at = if seconds <= 0 {
                        Some(0)
                    } else {
                        Some(now_epoch().saturating_add(seconds as u64))
                    };
                }
            }
            _ => {}
        }
    }
    Some(cookie)
}

/// Cookie store persisted to a single JSON file
pub struct FileCookieJar {
    path: PathBuf,
    cookies: Mutex<Vec<Cookie>>,
}

impl FileCookieJar {
    /// Load the jar at `path`.
    ///
    /// A missing file yields an empty jar; an unreadable or malformed file
    /// is logged and discarded rather than failing the request.
    pub fn load(path: PathBuf) -> Self {
        let cookies = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<Cookie>>(&contents) {
                Ok(cookies) => cookies,
                Err(err) => {
                    warn!("discarding malformed cookie jar {:?}: {}", path, err);
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!("cannot read cookie jar {:?}: {}", path, err);
                Vec::new()
            }
        };
        FileCookieJar {
            path,
            cookies: Mutex::new(cookies),
        }
    }

    /// Write the jar back to its file, dropping expired entries.
    pub fn save(&self) -> Result<()> {
        let cookies = self.snapshot();
        let contents = serde_json::to_string_pretty(&cookies)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Live cookies currently held by the jar
    pub fn snapshot(&self) -> Vec<Cookie> {
        let now = now_epoch();
        let cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        cookies.iter().filter(|c| !c.expired(now)).cloned().collect()
    }

    fn store(&self, cookie: Cookie) {
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        cookies.retain(|existing| {
            !(existing.name == cookie.name
                && existing.domain == cookie.domain
                && existing.path == cookie.path)
        });
        if !cookie.expired(now_epoch()) {
            cookies.push(cookie);
        }
    }
}

impl reqwest::cookie::CookieStore for FileCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            let raw = String::from_utf8_lossy(header.as_bytes());
            if let Some(cookie) = parse_set_cookie(&raw, url) {
                self.store(cookie);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let now = now_epoch();
        let cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        let header = cookies
            .iter()
            .filter(|c| c.matches(url, now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header).ok()
    }
}
