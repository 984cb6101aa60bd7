//! graphql over http post
//!
//! [`HttpGraphQlTransport`] posts each request through an [`HttpClient`] on a
//! [`Scheduler`] worker and wraps the decoded body in a [`GraphQlResponse`].
//! only single-response operations are supported; subscriptions need a
//! transport with a persistent connection.

use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::http::HttpClient;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::transport::{GraphQlTransport, ResponseStream};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// standard json media type
pub const APPLICATION_JSON: &str = "application/json";

/// graphql-over-http response media type
pub const APPLICATION_GRAPHQL_RESPONSE: &str = "application/graphql-response+json";

const ACCEPT_GRAPHQL: &str = "application/json, application/graphql-response+json";

/// transport that executes graphql requests as http posts
#[derive(Clone)]
pub struct HttpGraphQlTransport {
    http: Arc<dyn HttpClient>,
    content_type: HeaderValue,
    scheduler: Arc<dyn Scheduler>,
}

impl HttpGraphQlTransport {
    /// create a transport on the default scheduler
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::from_parts(http, None)
    }

    /// start building a transport
    pub fn builder() -> HttpGraphQlTransportBuilder {
        HttpGraphQlTransportBuilder::default()
    }

    fn from_parts(http: Arc<dyn HttpClient>, scheduler: Option<Arc<dyn Scheduler>>) -> Self {
        let content_type = resolve_content_type(http.as_ref());
        let scheduler = scheduler.unwrap_or_else(|| Arc::new(TokioScheduler::default()));
        Self {
            http,
            content_type,
            scheduler,
        }
    }

    /// content type sent with every request
    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, self.content_type.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GRAPHQL));
        headers
    }
}

fn resolve_content_type(http: &dyn HttpClient) -> HeaderValue {
    http.default_headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(APPLICATION_JSON))
}

#[async_trait::async_trait]
impl GraphQlTransport for HttpGraphQlTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        let operation = request.operation_name().map(str::to_string);
        let body = request.to_map();
        let headers = self.request_headers();
        let http = Arc::clone(&self.http);
        let endpoint = http
            .endpoint()
            .map_or_else(|| "unknown".to_string(), |url| url.to_string());
        let (tx, rx) = oneshot::channel();

        tracing::debug!(%endpoint, operation = ?operation, "scheduling graphql request");
        self.scheduler
            .schedule(Box::new(move || {
                // receiver gone means the caller stopped waiting
                if tx.is_closed() {
                    tracing::trace!("graphql request cancelled before start");
                    return;
                }
                tx.send(http.post(headers, &body)).ok();
            }))
            .map_err(|err| {
                tracing::warn!(%endpoint, error = %err, "scheduler rejected graphql request");
                err
            })?;

        let result = rx.await.map_err(|_| {
            Error::Scheduler("graphql request task ended without a result".to_string())
        })?;

        match result {
            Ok(map) => {
                tracing::debug!(
                    %endpoint,
                    operation = ?operation,
                    outcome = "ok",
                    "graphql request completed"
                );
                Ok(GraphQlResponse::from_map(map))
            }
            Err(err) => {
                tracing::debug!(
                    %endpoint,
                    operation = ?operation,
                    outcome = "error",
                    error = %err,
                    "graphql request failed"
                );
                Err(err)
            }
        }
    }

    fn execute_subscription(&self, _request: GraphQlRequest) -> Result<ResponseStream> {
        Err(Error::Unsupported(
            "subscriptions are not supported over http",
        ))
    }
}

impl fmt::Debug for HttpGraphQlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGraphQlTransport")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// builder for [`HttpGraphQlTransport`]
#[derive(Default)]
pub struct HttpGraphQlTransportBuilder {
    http: Option<Arc<dyn HttpClient>>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl HttpGraphQlTransportBuilder {
    /// http client to send requests with (required)
    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// scheduler to run blocking calls on
    ///
    /// default: [`TokioScheduler`] on the ambient runtime
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// build the transport
    pub fn build(self) -> Result<HttpGraphQlTransport> {
        let http = self
            .http
            .ok_or_else(|| Error::Config("http client is required".to_string()))?;
        Ok(HttpGraphQlTransport::from_parts(http, self.scheduler))
    }
}
