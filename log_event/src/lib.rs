pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod store;

use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

pub use config::Config;
pub use error::{LogEventError, NormalizationError};
pub use event::{InboundEvent, Payload};
pub use record::{normalize, normalize_at, NormalizePolicy, StoredRecord};
pub use store::{DynamoDbRecordStore, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEventResponse {
    pub success: bool,
}

/// Normalizes inbound events and writes each one as a single row.
#[derive(Debug)]
pub struct EventLogger<S: RecordStore> {
    config: Config,
    store: S,
}

impl<S: RecordStore> EventLogger<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn log_event(&self, event: InboundEvent) -> Result<LogEventResponse, LogEventError> {
        let record = normalize(&event, self.config.policy)?;
        info!("Item: {}", serde_json::to_string(&record).unwrap_or_default());

        match self.store.put_record(&self.config.table_name, &record).await {
            Ok(()) => {
                info!("Dynamo Success: {} at {}", self.config.table_name, record.time());
                Ok(LogEventResponse { success: true })
            }
            Err(reason) => {
                error!("put into {} failed: {}", self.config.table_name, reason);
                Err(LogEventError::StorageWriteFailed {
                    table: self.config.table_name.clone(),
                    reason,
                })
            }
        }
    }
}

/// Entry point for direct invocation. The payload is the inbound event.
pub async fn function_handler<S: RecordStore>(
    logger: &EventLogger<S>,
    event: LambdaEvent<Value>,
) -> Result<LogEventResponse, Error> {
    debug!("Request received: {}, context: {:?}", event.payload, event.context);
    let inbound = match InboundEvent::from_value(event.payload) {
        Ok(inbound) => inbound,
        Err(e) => return Err(Error::from(format!("event must be a JSON object: {}", e))),
    };
    Ok(logger.log_event(inbound).await?)
}
