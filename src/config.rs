//! client configuration
//!
//! build a [`ClientConfig`] with the endpoint url and optional overrides.
//! pass it to [`crate::Client::new`] to create a client, or call
//! [`ClientConfig::build_rest_client`] to get just the http layer.

use crate::error::{Error, Result};
use crate::http::RestClient;
use crate::scheduler::Scheduler;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// configuration for a graphql http client
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_url: String,

    /// parsed endpoint, `None` if the input did not parse
    pub(crate) url: Option<Url>,

    /// bearer token sent as the authorization header
    pub(crate) bearer_token: Option<String>,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// headers sent with every request
    pub(crate) headers: HeaderMap,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::blocking::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder: Option<
        Arc<dyn Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder + Send + Sync>,
    >,

    /// worker pool for blocking calls
    pub(crate) scheduler: Option<Arc<dyn Scheduler>>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `url` - the graphql endpoint (a missing scheme defaults to https)
    ///
    /// # example
    ///
    /// ```
    /// use graphql_transport::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://api.example.com/graphql");
    /// ```
    pub fn new(url: impl AsRef<str>) -> Self {
        let raw = url.as_ref();
        let url = Url::parse(raw)
            .or_else(|_| Url::parse(&format!("https://{raw}")))
            .ok();

        Self {
            raw_url: raw.to_string(),
            url,
            bearer_token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("graphql-transport-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            headers: HeaderMap::new(),
            http_client: None,
            http_client_builder: None,
            scheduler: None,
        }
    }

    /// send `Authorization: Bearer <token>` with every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// content type for request bodies
    ///
    /// default: `application/json`
    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.headers.insert(CONTENT_TYPE, content_type);
        self
    }

    /// access headers configured on this client
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// inject a prebuilt blocking http client.
    ///
    /// when set, this client is used as-is and takes precedence over
    /// `with_http_client_builder`. tls, timeouts, ssl verification and user
    /// agent come from the prebuilt client; the corresponding `ClientConfig`
    /// fields are ignored. headers and the bearer token still apply.
    ///
    /// a `Content-Type` default on the prebuilt client is not seen by the
    /// transport and is overridden per request; set it with
    /// `with_content_type` or `with_header` instead.
    pub fn with_http_client(mut self, http_client: reqwest::blocking::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder that already has the user agent,
    /// timeout, and ssl settings applied.
    ///
    /// ignored if `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder
            + Send
            + Sync
            + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// run blocking http calls on this scheduler
    ///
    /// default: tokio's blocking pool on the ambient runtime
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<&Url> {
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| Error::Config(format!("invalid url: {}", self.raw_url)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// build the blocking http layer described by this configuration
    ///
    /// call this outside of async code, or from a blocking task.
    pub fn build_rest_client(&self) -> Result<RestClient> {
        let url = self.validate()?.clone();

        let mut headers = self.headers.clone();
        if let Some(token) = &self.bearer_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|err| Error::Config(format!("invalid bearer token header value: {err}")))?,
            );
        }

        let http = match &self.http_client {
            Some(http) => http.clone(),
            None => {
                let mut builder = reqwest::blocking::Client::builder()
                    .user_agent(self.user_agent.clone())
                    .timeout(self.timeout)
                    .danger_accept_invalid_certs(!self.verify_ssl);
                if let Some(customize) = &self.http_client_builder {
                    builder = customize(builder);
                }
                builder.build()?
            }
        };

        Ok(RestClient::new(http, url).with_default_headers(headers))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.raw_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("headers", &self.headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
