//! HTTP execution module
//!
//! [`HttpEngine`] is a stateless executor: it receives one configuration
//! snapshot plus a verb and target URL, performs exactly one transfer and
//! reports the outcome as a [`RequestResult`]. It never returns an error —
//! failures of any kind are classified into `info.error`.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Proxy};
use url::Url;

use crate::config::{Params, RequestConfig};
use crate::cookie::FileCookieJar;
use crate::error::{RequrlError, Result};
use crate::utils::{FileUtils, UrlUtils};

pub mod header;
pub mod request;
pub mod response;

use response::{raw_header_block, RequestInfo, RequestResult, TransportError};

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Stateless request executor
pub struct HttpEngine;

impl HttpEngine {
    /// Execute one request described by `config`.
    ///
    /// The cookie jar, when enabled, is loaded before the transfer and
    /// written back on every exit path.
    pub async fn execute(method: Method, url: &str, config: RequestConfig) -> RequestResult {
        let proxy = config.proxy.is_some();
        let jar = match Self::cookie_jar(&config) {
            Ok(jar) => jar,
            Err(err) => {
                return RequestResult::failure(TransportError::from(&err), url.to_string(), proxy)
            }
        };

        let result = Self::run(method, url, &config, jar.clone()).await;

        if let Some(jar) = &jar {
            if let Err(err) = jar.save() {
                warn!("cookie jar not saved: {}", err);
            }
        }

        match result {
            Ok(result) => result,
            Err(err) => RequestResult::failure(TransportError::from(&err), url.to_string(), proxy),
        }
    }

    fn cookie_jar(config: &RequestConfig) -> Result<Option<Arc<FileCookieJar>>> {
        let file_id = match &config.cookie_file {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };
        let path = FileUtils::cookie_jar_path(file_id)?;
        Ok(Some(Arc::new(FileCookieJar::load(path))))
    }

    fn build_client(config: &RequestConfig, jar: Option<Arc<FileCookieJar>>) -> Result<Client> {
        let mut builder = ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .referer(true);

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        if config.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        }
        if !config.gzip {
            builder = builder.no_gzip().no_deflate();
        }
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(jar) = jar {
            builder = builder.cookie_provider(jar);
        }

        if let Some(proxy_config) = &config.proxy {
            match proxy_config.url() {
                Some(proxy_url) => {
                    let mut proxy = Proxy::all(&proxy_url)
                        .map_err(|e| RequrlError::Proxy(format!("Invalid proxy: {}", e)))?;
                    if let Some((user, password)) = proxy_config.credentials() {
                        proxy = proxy.basic_auth(user, password);
                    }
                    builder = builder.proxy(proxy);
                }
                None => debug!("proxy with empty host skipped"),
            }
        }

        builder.build().map_err(RequrlError::Http)
    }

    async fn run(
        method: Method,
        url: &str,
        config: &RequestConfig,
        jar: Option<Arc<FileCookieJar>>,
    ) -> Result<RequestResult> {
        let mut target = UrlUtils::validate_url(url)?;
        let client = Self::build_client(config, jar)?;

        if method == Method::GET && !config.params.is_empty() {
            apply_query(&mut target, &config.params);
        }

        let mut request = client.request(method.clone(), target);

        let mut header_lines = config.headers.clone();
        if config.gzip {
            header_lines.push("Accept-Encoding: gzip, deflate".to_string());
        }
        for line in &header_lines {
            match line.split_once(':') {
                Some((name, value)) => request = request.header(name.trim(), value.trim()),
                None => debug!("skipping malformed header line: {:?}", line),
            }
        }

        if let Some(user_agent) = &config.user_agent {
            request = request.header("User-Agent", user_agent);
        }
        if let Some(referer) = &config.referer {
            request = request.header("Referer", referer);
        }

        if method != Method::GET && !config.params.is_empty() {
            request = match &config.params {
                Params::Form(pairs) => request.form(pairs),
                Params::Raw(body) => request.body(body.clone()),
                Params::None => request,
            };
        }

        let response = client.execute(request.build()?).await?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let mut info = RequestInfo {
            effective_url: response.url().to_string(),
            http_code: status.as_u16(),
            content_type: headers
                .get(CONTENT_TYPE)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
            content_length: headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok()),
            size_download: 0,
            error: None,
            proxy: config.proxy.is_some(),
        };
        let header_block = raw_header_block(version, status, &headers);

        match response.bytes().await {
            Ok(bytes) => {
                info.size_download = bytes.len() as u64;
                Ok(RequestResult {
                    header: Some(header_block),
                    body: Some(String::from_utf8_lossy(&bytes).into_owned()),
                    info,
                })
            }
            // The transfer produced headers but the body read failed;
            // report what was captured instead of dropping the response.
            Err(err) => {
                let err = RequrlError::Http(err);
                info.error = Some(TransportError::from(&err));
                Ok(RequestResult {
                    header: Some(header_block),
                    body: None,
                    info,
                })
            }
        }
    }
}

fn apply_query(url: &mut Url, params: &Params) {
    match params {
        Params::Form(pairs) => {
            let mut serializer = url.query_pairs_mut();
            for (name, value) in pairs {
                serializer.append_pair(name, value);
            }
        }
        Params::Raw(query) => url.set_query(Some(query)),
        Params::None => {}
    }
}
