use crate::models::errors::DashboardError;
use crate::services::classifier::Severity;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSummary {
    pub total_hosts: u64,
    pub total_items: u64,
    pub active_problems: u64,
    pub problems_severity: Severity,
}

impl ServerSummary {
    pub fn new(total_hosts: u64, total_items: u64, active_problems: u64) -> Self {
        let problems_severity = if active_problems > 0 {
            Severity::Danger
        } else {
            Severity::Success
        };
        Self {
            total_hosts,
            total_items,
            active_problems,
            problems_severity,
        }
    }
}

/// `countOutput` results come back as string-encoded integers.
pub fn parse_count(raw: &str) -> Result<u64, DashboardError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| DashboardError::InvalidResponse(format!("expected a count, got {:?}", raw)))
}
