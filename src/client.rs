//! main client
//!
//! thin facade over a [`GraphQlTransport`] with helpers for raw and typed
//! execution.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::http_transport::HttpGraphQlTransport;
use crate::operation::Operation;
use crate::transport::{GraphQlTransport, ResponseStream};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// graphql client
#[derive(Debug)]
pub struct Client<T = HttpGraphQlTransport> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Client {
    /// create an http client
    ///
    /// builds a blocking http client, so call this outside of async code.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = config.build_rest_client()?;
        let mut builder = HttpGraphQlTransport::builder().http_client(Arc::new(http));
        if let Some(scheduler) = &config.scheduler {
            builder = builder.scheduler(Arc::clone(scheduler));
        }
        Ok(Self::with_transport(builder.build()?))
    }
}

impl<T: GraphQlTransport> Client<T> {
    /// create a client over any transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// access the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// execute a prepared request
    pub async fn execute_request(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        self.transport.execute(request).await
    }

    /// execute a raw graphql query
    ///
    /// graphql errors in the body are returned as part of the response, not
    /// as an `Err`.
    pub async fn execute_raw(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<GraphQlResponse> {
        let request = GraphQlRequest::new(query).with_variables(variables_map(variables)?);
        self.execute_request(request).await
    }

    /// execute a raw graphql query and deserialize `data` into `D`
    pub async fn execute<D: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<D> {
        let response = self.execute_raw(query, variables).await?;
        decode_data(response)
    }

    /// execute a typed operation
    pub async fn execute_operation<O: Operation>(
        &self,
        variables: Option<Value>,
    ) -> Result<O::Response> {
        let mut request = GraphQlRequest::new(O::QUERY).with_variables(variables_map(variables)?);
        if let Some(name) = O::OPERATION_NAME {
            request = request.with_operation_name(name);
        }
        decode_data(self.execute_request(request).await?)
    }

    /// start a subscription, if the transport supports it
    pub fn subscribe(&self, request: GraphQlRequest) -> Result<ResponseStream> {
        self.transport.execute_subscription(request)
    }
}

fn variables_map(variables: Option<Value>) -> Result<Map<String, Value>> {
    match variables {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(Error::InvalidRequest(format!(
            "variables must be a json object, got {other}"
        ))),
    }
}

fn decode_data<D: DeserializeOwned>(response: GraphQlResponse) -> Result<D> {
    if response.has_errors() {
        let errors = response.errors();
        let message = errors
            .first()
            .map(|err| err.message.clone())
            .unwrap_or_else(|| "graphql error".to_string());
        return Err(Error::GraphQl { errors, message });
    }

    let data = response
        .into_map()
        .remove("data")
        .filter(|data| !data.is_null())
        .ok_or(Error::MissingData)?;
    Ok(serde_json::from_value(data)?)
}
