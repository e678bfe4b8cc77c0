use crate::record::NormalizePolicy;
use std::env;

pub const TABLE_NAME: &str = "TABLE_NAME";
pub const PAYLOAD_POLICY: &str = "PAYLOAD_POLICY";
pub const DYNAMODB_ENDPOINT: &str = "DYNAMODB_ENDPOINT";
pub const TRACE_DEBUG: &str = "TRACE_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub policy: NormalizePolicy,
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            policy: NormalizePolicy::default(),
            dynamodb_endpoint: None,
        }
    }

    pub fn with_policy(mut self, policy: NormalizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = match lookup(TABLE_NAME) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(format!("{} is not set", TABLE_NAME)),
        };
        let policy = match lookup(PAYLOAD_POLICY) {
            Some(p) if !p.is_empty() => p.parse()?,
            _ => NormalizePolicy::default(),
        };
        let dynamodb_endpoint = lookup(DYNAMODB_ENDPOINT).filter(|e| !e.is_empty());
        Ok(Self {
            table_name,
            policy,
            dynamodb_endpoint,
        })
    }
}

/// INFO unless `TRACE_DEBUG` is set.
pub fn log_level() -> tracing::Level {
    match env::var(TRACE_DEBUG) {
        Ok(_) => tracing::Level::DEBUG,
        Err(_) => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn table_name_is_required() {
        let env = vars(&[]);
        let err = Config::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err, "TABLE_NAME is not set");
    }

    #[test]
    fn defaults_to_relay_policy() {
        let env = vars(&[("TABLE_NAME", "readings")]);
        let config = Config::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config, Config::new("readings"));
    }

    #[test]
    fn reads_policy_and_endpoint() {
        let env = vars(&[
            ("TABLE_NAME", "readings"),
            ("PAYLOAD_POLICY", "Flat"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]);
        let config = Config::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.policy, NormalizePolicy::Flat);
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let env = vars(&[("TABLE_NAME", "readings"), ("PAYLOAD_POLICY", "nested")]);
        assert!(Config::from_vars(|k| env.get(k).cloned()).is_err());
    }
}
