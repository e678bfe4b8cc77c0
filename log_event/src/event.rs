use crate::error::NormalizationError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw object delivered to the function, either straight from a device or
/// wrapped by a relay webhook. A JSON `null` counts as not defined.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub device: Option<Value>,
    #[serde(default)]
    pub coreid: Option<Value>,
    #[serde(default)]
    pub event: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub published_at: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Telemetry fields considered for storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

/// A value is kept unless it is `null` or the empty string. `0` and `false`
/// are real readings.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl InboundEvent {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Relay webhooks set `published_at` and wrap the readings in `data`.
    pub fn is_relayed(&self) -> bool {
        self.data.is_some() && self.published_at.is_some()
    }

    /// Decoded `data` for relayed events, the event's own fields otherwise.
    pub fn payload(&self) -> Result<Payload, NormalizationError> {
        match (&self.data, &self.published_at) {
            (Some(data), Some(_)) => decode_data(data),
            _ => Ok(self.telemetry()),
        }
    }

    /// Every field of the event except `data` and `published_at`.
    pub fn telemetry(&self) -> Payload {
        let mut fields = Map::with_capacity(self.other.len() + 3);
        if let Some(device) = &self.device {
            fields.insert("device".to_string(), device.clone());
        }
        if let Some(coreid) = &self.coreid {
            fields.insert("coreid".to_string(), coreid.clone());
        }
        if let Some(event) = &self.event {
            fields.insert("event".to_string(), event.clone());
        }
        for (key, value) in &self.other {
            fields.insert(key.clone(), value.clone());
        }
        Payload(fields)
    }
}

/// Only a `data` string that fails to parse is an error. A decoded value
/// that is not an object carries no fields.
fn decode_data(data: &Value) -> Result<Payload, NormalizationError> {
    let decoded = match data {
        Value::String(s) => serde_json::from_str::<Value>(s).map_err(|e| {
            NormalizationError::InvalidPayloadJson {
                reason: e.to_string(),
            }
        })?,
        other => other.clone(),
    };
    match decoded {
        Value::Object(fields) => Ok(Payload(fields)),
        _ => Ok(Payload::default()),
    }
}

impl Payload {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn retained(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(_, value)| is_present(value))
    }
}
