//! graphql over http transport
//!
//! this crate executes graphql operations as http posts. the http call itself
//! is blocking and runs on a worker pool, so async callers never block.
//! start with [`Client`] and [`ClientConfig`], or wire an
//! [`HttpGraphQlTransport`] by hand from any [`HttpClient`] and [`Scheduler`].
//!
//! ## quick start
//!
//! ```no_run
//! use graphql_transport::{Client, ClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // the blocking http client must be built outside of async code
//! let client = Client::new(ClientConfig::new("http://localhost:4000/graphql"))?;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let response = runtime.block_on(client.execute_raw("{ __typename }", None))?;
//! println!("{:?}", response.data());
//! # Ok(())
//! # }
//! ```
//!
//! ## subscriptions
//!
//! [`HttpGraphQlTransport`] handles queries and mutations only. calling
//! [`GraphQlTransport::execute_subscription`] on it always fails with
//! [`Error::Unsupported`].

mod client;
mod config;
mod error;
mod graphql;
mod http;
mod http_transport;
mod operation;
mod scheduler;
mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use graphql::{ErrorLocation, GraphQlRequest, GraphQlResponse, ResponseError};
pub use http::{HttpClient, RestClient};
pub use http_transport::{
    HttpGraphQlTransport, HttpGraphQlTransportBuilder, APPLICATION_GRAPHQL_RESPONSE,
    APPLICATION_JSON,
};
pub use operation::Operation;
pub use scheduler::{BlockingTask, RayonScheduler, Scheduler, TokioScheduler};
pub use transport::{GraphQlTransport, ResponseStream};
