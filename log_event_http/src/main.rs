use lambda_http::{run, service_fn, Error, Request};
use log_event::{config, Config, DynamoDbRecordStore, EventLogger};
use log_event_http::handle_request;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(config::log_level())
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let config = Config::from_env()?;
    let store = DynamoDbRecordStore::from_env(config.dynamodb_endpoint.as_deref()).await;
    let logger = Arc::new(EventLogger::new(config, store));
    tracing::info!(
        "logging events to {} with {} policy",
        logger.config().table_name,
        logger.config().policy
    );

    run(service_fn(move |event: Request| {
        let logger = Arc::clone(&logger);
        async move { handle_request(logger.as_ref(), event).await }
    }))
    .await
}
