use chrono::{DateTime, Utc};
use log::debug;
use std::fmt;

use crate::models::errors::DashboardError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3600;
const DAY: i64 = 86_400;
/// Anything contacted within this window counts as "Now".
const RECENT_WINDOW: i64 = 5 * MINUTE;

pub const NEVER_LABEL: &str = "Never";
pub const NOW_LABEL: &str = "Now";

/// Coarse status class; its `Display` form is the CSS class used by the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastContact {
    pub label: String,
    pub severity: Severity,
}

impl LastContact {
    fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self {
            label: label.into(),
            severity,
        }
    }
}

/// Classifies a last-contact unix timestamp (0 = never) relative to `now`.
///
/// Negative timestamps are rejected. Timestamps in the future are treated as
/// a contact happening right now.
pub fn classify_last_contact(
    timestamp: i64,
    now: DateTime<Utc>,
) -> Result<LastContact, DashboardError> {
    if timestamp < 0 {
        return Err(DashboardError::InvalidTimestamp(timestamp.to_string()));
    }
    if timestamp == 0 {
        return Ok(LastContact::new(NEVER_LABEL, Severity::Danger));
    }

    let last = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| DashboardError::InvalidTimestamp(timestamp.to_string()))?;
    let mut elapsed = now.signed_duration_since(last).num_seconds();
    if elapsed < 0 {
        debug!("Last contact {} is {}s in the future, clamping", timestamp, -elapsed);
        elapsed = 0;
    }

    let contact = if elapsed >= DAY {
        LastContact::new(format!("{}d ago", elapsed / DAY), Severity::Danger)
    } else if elapsed > HOUR {
        LastContact::new(format!("{}h ago", elapsed / HOUR), Severity::Warning)
    } else if elapsed > RECENT_WINDOW {
        LastContact::new(format!("{}m ago", elapsed / MINUTE), Severity::Warning)
    } else {
        LastContact::new(NOW_LABEL, Severity::Success)
    };
    Ok(contact)
}

/// Parses the string-encoded timestamp the API returns, then classifies it.
pub fn classify_raw_last_contact(
    raw: &str,
    now: DateTime<Utc>,
) -> Result<LastContact, DashboardError> {
    let timestamp = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| DashboardError::InvalidTimestamp(raw.to_string()))?;
    classify_last_contact(timestamp, now)
}
