use graphql_transport::{Client, ClientConfig};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = env::var("GRAPHQL_URL").unwrap_or_else(|_| "http://localhost:4000/graphql".to_string());
    let mut config = ClientConfig::new(url);
    if let Ok(token) = env::var("GRAPHQL_TOKEN") {
        config = config.with_bearer_token(token);
    }

    // the blocking http client is built before the runtime starts
    let client = Client::new(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(client.execute_raw("{ __typename }", None))?;

    println!("data: {:?}", response.data());
    for error in response.errors() {
        println!("error: {error}");
    }

    Ok(())
}
