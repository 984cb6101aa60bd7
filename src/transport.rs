//! transport contract
//!
//! a transport sends one graphql operation and hands back its result. each
//! network protocol gets its own implementation; pick one by operation type.

use crate::error::Result;
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use futures_util::stream::BoxStream;
use std::sync::Arc;

/// stream of responses for a subscription
pub type ResponseStream = BoxStream<'static, Result<GraphQlResponse>>;

/// sends graphql operations over some protocol
#[async_trait::async_trait]
pub trait GraphQlTransport: Send + Sync + 'static {
    /// execute a single-response operation (query or mutation)
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse>;

    /// start a subscription
    fn execute_subscription(&self, request: GraphQlRequest) -> Result<ResponseStream>;
}

#[async_trait::async_trait]
impl<T: GraphQlTransport + ?Sized> GraphQlTransport for Arc<T> {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        self.as_ref().execute(request).await
    }

    fn execute_subscription(&self, request: GraphQlRequest) -> Result<ResponseStream> {
        self.as_ref().execute_subscription(request)
    }
}
