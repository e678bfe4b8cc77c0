use crate::record::{StoredRecord, TIME};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb as ddb;
use aws_sdk_dynamodb::model::AttributeValue;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

/// Durable table the normalized rows land in.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait RecordStore: Debug + Send + Sync {
    async fn put_record(&self, table_name: &str, record: &StoredRecord) -> Result<(), String>;
}

#[derive(Debug)]
pub struct DynamoDbRecordStore {
    client: ddb::Client,
}

impl DynamoDbRecordStore {
    pub fn new(client: ddb::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS environment, pointing at
    /// `endpoint` instead of the regional service when one is given.
    pub async fn from_env(endpoint: Option<&str>) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let config = aws_config::from_env().region(region_provider).load().await;
        let ddb_config = match endpoint {
            Some(endpoint) => ddb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build(),
            None => ddb::config::Builder::from(&config).build(),
        };
        Self::new(ddb::Client::from_conf(ddb_config))
    }
}

#[async_trait]
impl RecordStore for DynamoDbRecordStore {
    async fn put_record(&self, table_name: &str, record: &StoredRecord) -> Result<(), String> {
        self.client
            .put_item()
            .set_table_name(Some(table_name.to_owned()))
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| format!("Error adding item: {:?}", e))
    }
}

pub fn to_item(record: &StoredRecord) -> HashMap<String, AttributeValue> {
    let mut item: HashMap<String, AttributeValue> = record
        .attributes()
        .iter()
        .map(|(key, value)| (key.clone(), to_attribute_value(value)))
        .collect();
    item.insert(TIME.to_string(), AttributeValue::N(record.time().to_string()));
    item
}

pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}
