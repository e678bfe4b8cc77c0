use crate::error::NormalizationError;
use crate::event::{InboundEvent, Payload};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::SystemTime;
use tracing::debug;

pub const TIME: &str = "time";
pub const DEVICE: &str = "device";
pub const DEVICE_ID: &str = "deviceId";
pub const EVENT: &str = "event";

/// How an inbound event is flattened into a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizePolicy {
    /// `coreid` becomes `deviceId`, and relayed `data` is decoded and merged.
    #[default]
    Relay,
    /// Every field except `data` and `published_at` is copied as is.
    Flat,
}

impl FromStr for NormalizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relay" => Ok(NormalizePolicy::Relay),
            "flat" => Ok(NormalizePolicy::Flat),
            other => Err(format!("unknown payload policy '{}', expected relay or flat", other)),
        }
    }
}

impl Display for NormalizePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizePolicy::Relay => write!(f, "relay"),
            NormalizePolicy::Flat => write!(f, "flat"),
        }
    }
}

/// One row of the readings table. `time` is assigned here and never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    time: u64,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl StoredRecord {
    pub fn new(time: u64) -> Self {
        Self {
            time,
            attributes: Map::new(),
        }
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Attributes other than `time`.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    fn insert(&mut self, key: &str, value: Value) {
        if key == TIME {
            debug!("ignoring caller supplied {} attribute", TIME);
            return;
        }
        self.attributes.insert(key.to_string(), value);
    }

    fn merge(&mut self, payload: &Payload) {
        for (key, value) in payload.retained() {
            self.insert(key, value.clone());
        }
    }
}

pub fn now_millis() -> u64 {
    match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => d.as_millis() as u64,
        Err(_) => 0,
    }
}

pub fn normalize(
    event: &InboundEvent,
    policy: NormalizePolicy,
) -> Result<StoredRecord, NormalizationError> {
    normalize_at(event, policy, now_millis())
}

/// Flattens `event` into a record stamped with `time`. Payload fields win
/// over `device`, `deviceId` and `event` when names collide.
pub fn normalize_at(
    event: &InboundEvent,
    policy: NormalizePolicy,
    time: u64,
) -> Result<StoredRecord, NormalizationError> {
    let mut record = StoredRecord::new(time);
    match policy {
        NormalizePolicy::Relay => {
            if let Some(device) = &event.device {
                record.insert(DEVICE, device.clone());
            }
            if let Some(coreid) = &event.coreid {
                record.insert(DEVICE_ID, coreid.clone());
            }
            if let Some(name) = &event.event {
                record.insert(EVENT, name.clone());
            }
            record.merge(&event.payload()?);
        }
        NormalizePolicy::Flat => record.merge(&event.telemetry()),
    }
    Ok(record)
}
