//! blocking http client capability
//!
//! [`HttpClient`] is what a transport needs from the http layer: default
//! headers to inspect, and a synchronous json post. [`RestClient`] implements
//! it on top of `reqwest::blocking`.

use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// synchronous json-over-http client bound to one endpoint
pub trait HttpClient: Send + Sync + 'static {
    /// headers applied to every request
    fn default_headers(&self) -> &HeaderMap;

    /// endpoint requests are posted to, if known
    fn endpoint(&self) -> Option<&Url> {
        None
    }

    /// post `body` as json and decode the response body as a json object
    ///
    /// `headers` are applied after the defaults and take precedence.
    fn post(&self, headers: HeaderMap, body: &Map<String, Value>) -> Result<Map<String, Value>>;
}

/// [`HttpClient`] backed by `reqwest::blocking::Client`
///
/// must not be created or used directly on an async executor thread; run it
/// through a [`crate::Scheduler`].
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
    default_headers: HeaderMap,
}

impl RestClient {
    /// create a client posting to `endpoint`
    pub fn new(http: reqwest::blocking::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            default_headers: HeaderMap::new(),
        }
    }

    /// set the headers applied to every request
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }
}

impl HttpClient for RestClient {
    fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    fn endpoint(&self) -> Option<&Url> {
        Some(&self.endpoint)
    }

    fn post(&self, headers: HeaderMap, body: &Map<String, Value>) -> Result<Map<String, Value>> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .headers(self.default_headers.clone())
            .headers(headers)
            .json(body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        tracing::trace!(endpoint = %self.endpoint, status = status.as_u16(), "graphql http response");
        parse_response_body(status, text)
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint)
            .field("default_headers", &self.default_headers.len())
            .finish()
    }
}

fn parse_response_body(status: StatusCode, text: String) -> Result<Map<String, Value>> {
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
