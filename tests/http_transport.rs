use graphql_transport::{
    Client, ClientConfig, Error, GraphQlRequest, GraphQlTransport, HttpClient,
    HttpGraphQlTransport, RayonScheduler, Result,
};
use httpmock::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// counts calls made through the wrapped client
struct Counting<C> {
    inner: C,
    calls: AtomicUsize,
}

impl<C: HttpClient> HttpClient for Counting<C> {
    fn default_headers(&self) -> &HeaderMap {
        self.inner.default_headers()
    }

    fn post(&self, headers: HeaderMap, body: &Map<String, Value>) -> Result<Map<String, Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.post(headers, body)
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

#[cfg_attr(miri, ignore)]
#[test]
fn execute_posts_once_with_negotiated_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("content-type", "application/json")
            .header(
                "accept",
                "application/json, application/graphql-response+json",
            )
            .json_body(json!({"query": "{ x }", "variables": {"a": 1}}));
        then.status(200)
            .header("content-type", "application/graphql-response+json")
            .json_body(json!({"data": {"x": 1}}));
    });

    let client = Client::new(ClientConfig::new(server.url("/graphql"))).expect("client");
    let response = runtime()
        .block_on(client.execute_raw("{ x }", Some(json!({"a": 1}))))
        .expect("graphql response");

    mock.assert_hits(1);
    assert_eq!(response.data(), Some(&json!({"x": 1})));
    assert!(response.errors().is_empty());
}

#[cfg_attr(miri, ignore)]
#[test]
fn execute_uses_preconfigured_content_type() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("content-type", "application/graphql+json")
            .header(
                "accept",
                "application/json, application/graphql-response+json",
            );
        then.status(200).json_body(json!({"data": {"ok": true}}));
    });

    let config = ClientConfig::new(server.url("/graphql"))
        .with_content_type(HeaderValue::from_static("application/graphql+json"));
    let client = Client::new(config).expect("client");
    runtime()
        .block_on(client.execute_raw("{ ok }", None))
        .expect("graphql response");

    mock.assert_hits(1);
}

#[cfg_attr(miri, ignore)]
#[test]
fn connection_failure_fails_without_retry() {
    let rest = ClientConfig::new("http://127.0.0.1:1/graphql")
        .build_rest_client()
        .expect("rest client");
    let http = Arc::new(Counting {
        inner: rest,
        calls: AtomicUsize::new(0),
    });
    let transport = HttpGraphQlTransport::new(http.clone());

    let err = runtime()
        .block_on(transport.execute(GraphQlRequest::new("{ x }")))
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert_eq!(http.calls.load(Ordering::SeqCst), 1);
}

#[cfg_attr(miri, ignore)]
#[test]
fn error_status_is_a_transport_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(400)
            .header("content-type", "application/graphql-response+json")
            .json_body(json!({"errors": [{"message": "syntax error"}]}));
    });

    let client = Client::new(ClientConfig::new(server.url("/graphql"))).expect("client");
    let err = runtime()
        .block_on(client.execute_raw("{ x", None))
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 400, ref body } if body.contains("syntax error")));
}

#[cfg_attr(miri, ignore)]
#[test]
fn graphql_errors_on_success_status_are_data() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(200)
            .json_body(json!({"data": null, "errors": [{"message": "not allowed"}]}));
    });

    let client = Client::new(ClientConfig::new(server.url("/graphql"))).expect("client");
    let response = runtime()
        .block_on(client.execute_raw("{ secret }", None))
        .expect("graphql response");

    assert!(!response.is_valid());
    assert_eq!(response.errors()[0].message, "not allowed");
}

#[cfg_attr(miri, ignore)]
#[test]
fn subscription_never_reaches_the_server() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({"data": {}}));
    });

    let client = Client::new(ClientConfig::new(server.url("/graphql"))).expect("client");
    let result = client.subscribe(GraphQlRequest::new("subscription { ticks }"));

    assert!(matches!(result, Err(Error::Unsupported(_))));
    mock.assert_hits(0);
}

#[cfg_attr(miri, ignore)]
#[test]
fn concurrent_requests_on_rayon_pool() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST).json_body(json!({"query": "{ first }"}));
        then.status(200)
            .delay(std::time::Duration::from_millis(100))
            .json_body(json!({"data": {"name": "first"}}));
    });
    let second = server.mock(|when, then| {
        when.method(POST).json_body(json!({"query": "{ second }"}));
        then.status(200).json_body(json!({"data": {"name": "second"}}));
    });

    let scheduler = RayonScheduler::new(2).expect("pool");
    let config = ClientConfig::new(server.url("/graphql")).with_scheduler(Arc::new(scheduler));
    let client = Client::new(config).expect("client");

    let (a, b) = runtime().block_on(async {
        tokio::join!(
            client.execute_raw("{ first }", None),
            client.execute_raw("{ second }", None),
        )
    });

    first.assert_hits(1);
    second.assert_hits(1);
    assert_eq!(a.unwrap().field("name"), Some(&json!("first")));
    assert_eq!(b.unwrap().field("name"), Some(&json!("second")));
}
