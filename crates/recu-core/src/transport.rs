//! Blocking HTTP transport.
//!
//! The core only depends on the `Transport` trait; `CurlTransport` is the
//! libcurl-backed implementation used by the binary.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::header::HeaderMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }
}

/// Status and body of a completed request. Non-2xx statuses are not errors here.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub trait Transport {
    /// Performs one request. `timeout` bounds the whole transfer.
    fn request(
        &self,
        url: &str,
        timeout: Duration,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        method: Method,
    ) -> Result<HttpResponse>;

    fn get(&self, url: &str, timeout: Duration, headers: &HeaderMap) -> Result<HttpResponse> {
        self.request(url, timeout, headers, None, Method::Get)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(
        &self,
        url: &str,
        timeout: Duration,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        method: Method,
    ) -> Result<HttpResponse> {
        (**self).request(url, timeout, headers, body, method)
    }
}

/// libcurl easy-handle transport. Follows redirects.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
        }
    }
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for CurlTransport {
    fn request(
        &self,
        url: &str,
        timeout: Duration,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        method: Method,
    ) -> Result<HttpResponse> {
        let mut out = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.accept_encoding("")?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(timeout)?;
        match method {
            Method::Get => easy.get(true)?,
            Method::Head => easy.nobody(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(body.unwrap_or_default())?;
            }
        }

        let mut list = curl::easy::List::new();
        for (k, v) in headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                out.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("{} {} failed", method.as_str(), url))?;
        }

        let status = easy.response_code().context("no response code")?;
        tracing::debug!(%url, status, bytes = out.len(), "http {}", method.as_str());
        Ok(HttpResponse { status, body: out })
    }
}
