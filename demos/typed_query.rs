use graphql_transport::{Client, ClientConfig, Operation, RayonScheduler};
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Data {
    #[serde(rename = "__schema")]
    schema: Schema,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Schema {
    #[serde(rename = "queryType")]
    query_type: NamedType,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct NamedType {
    name: String,
}

struct QueryTypeName;

impl Operation for QueryTypeName {
    const QUERY: &'static str = "query QueryTypeName { __schema { queryType { name } } }";
    const OPERATION_NAME: Option<&'static str> = Some("QueryTypeName");
    type Response = Data;
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = env::var("GRAPHQL_URL").unwrap_or_else(|_| "http://localhost:4000/graphql".to_string());
    let config = ClientConfig::new(url).with_scheduler(Arc::new(RayonScheduler::new(4)?));
    let client = Client::new(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let data = runtime.block_on(client.execute_operation::<QueryTypeName>(None))?;

    println!("response: {data:?}");
    Ok(())
}
