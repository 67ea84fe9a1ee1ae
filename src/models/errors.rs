// models/errors.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure (DNS, TLS, refused connection, timeout).
    #[error("Failed to reach the Zabbix API: {0}")]
    Network(String),

    /// JSON-RPC `error` object returned by the API.
    #[error("Zabbix API error {code}: {message} {data}")]
    Api {
        code: i64,
        message: String,
        data: String,
    },

    #[error("Unexpected Zabbix API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid last contact timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::InvalidResponse(err.to_string())
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}
