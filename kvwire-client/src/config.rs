//! Configuration for the RESP transport and its pools.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for [`RespTransport`](crate::RespTransport).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```json
/// { "addr": "10.0.0.5:6379", "read_timeout_ms": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Server address, e.g. "127.0.0.1:6379".
    pub addr: String,
    /// Maximum idle connections kept in the pool.
    pub max_idle: usize,
    /// Maximum total connections (idle + in-use).
    pub max_total: usize,
    /// Optional TCP read timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    /// Optional TCP write timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
    /// Optional TCP connect timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    /// Maximum idle encode buffers kept for reuse.
    pub max_buffers: usize,
    /// Initial capacity of a freshly allocated encode buffer.
    pub buffer_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            addr: "127.0.0.1:6379".to_string(),
            max_idle: 8,
            max_total: 16,
            read_timeout_ms: None,
            write_timeout_ms: None,
            connect_timeout_ms: None,
            max_buffers: 8,
            buffer_capacity: 256,
        }
    }
}

impl TransportConfig {
    /// Default configuration pointed at `addr`.
    pub fn with_addr(addr: impl Into<String>) -> Self {
        TransportConfig {
            addr: addr.into(),
            ..TransportConfig::default()
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: TransportConfig =
            serde_json::from_str(r#"{"addr":"10.0.0.5:6379","read_timeout_ms":500}"#).unwrap();
        assert_eq!(config.addr, "10.0.0.5:6379");
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(500)));
        assert_eq!(config.write_timeout(), None);
        assert_eq!(config.max_total, 16);
        assert_eq!(config.buffer_capacity, 256);
    }

    #[test]
    fn unset_timeouts_are_not_serialized() {
        let json = serde_json::to_string(&TransportConfig::with_addr("h:1")).unwrap();
        assert!(!json.contains("timeout"));
        let back: TransportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransportConfig::with_addr("h:1"));
    }
}
