use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::models::errors::DashboardError;
use crate::services::classifier::{classify_raw_last_contact, Severity, NOW_LABEL};

/// Status code the API reports for active proxies.
const ACTIVE_STATUS: &str = "5";

/// Proxy as returned by `proxy.get`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProxy {
    pub host: String,
    pub status: String,
    pub lastaccess: String,
    /// Only the length matters.
    #[serde(default)]
    pub hosts: Vec<IgnoredAny>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    Active,
    Passive,
}

impl ProxyMode {
    pub fn from_status(status: &str) -> Self {
        if status == ACTIVE_STATUS {
            Self::Active
        } else {
            Self::Passive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Passive => "Passive",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyView {
    pub name: String,
    pub mode: ProxyMode,
    pub last_contact: String,
    pub severity: Severity,
    pub hosts_count: usize,
}

impl ProxyView {
    pub fn is_recent(&self) -> bool {
        self.last_contact == NOW_LABEL
    }
}

/// Sorts proxies by name and annotates them for display.
pub fn build_proxy_list(
    mut raw: Vec<RawProxy>,
    now: DateTime<Utc>,
) -> Result<Vec<ProxyView>, DashboardError> {
    raw.sort_by(|a, b| a.host.cmp(&b.host));
    raw.into_iter()
        .map(|p| {
            let contact = classify_raw_last_contact(&p.lastaccess, now)?;
            Ok(ProxyView {
                mode: ProxyMode::from_status(&p.status),
                last_contact: contact.label,
                severity: contact.severity,
                hosts_count: p.hosts.len(),
                name: p.host,
            })
        })
        .collect()
}

/// Proxies not heard from within the last five minutes.
pub fn stale_proxies(proxies: &[ProxyView]) -> Vec<ProxyView> {
    proxies.iter().filter(|p| !p.is_recent()).cloned().collect()
}
