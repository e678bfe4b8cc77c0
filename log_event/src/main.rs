use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log_event::{config, function_handler, Config, DynamoDbRecordStore, EventLogger, LogEventResponse};
use serde_json::Value;
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

    run(service_fn(move |event: LambdaEvent<Value>| {
        let logger = Arc::clone(&logger);
        async move { handler_fn(event, logger).await }
    }))
    .await
}

async fn handler_fn(
    event: LambdaEvent<Value>,
    logger: Arc<EventLogger<DynamoDbRecordStore>>,
) -> Result<LogEventResponse, Error> {
    function_handler(logger.as_ref(), event).await
}
