use askama::Template;

use crate::services::proxies::ProxyView;
use crate::services::server_metrics::ServerMetrics;
use crate::services::summary::ServerSummary;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub summary: Option<ServerSummary>,
    pub proxies: Vec<ProxyView>,
    pub stale_count: usize,
    pub error: Option<String>,
    pub last_updated: String,
    pub current_year: u32,
}

#[derive(Template)]
#[template(path = "stale_proxies.html")]
pub struct StaleProxiesTemplate {
    pub proxies: Vec<ProxyView>,
    pub error: Option<String>,
    pub last_updated: String,
    pub current_year: u32,
}

#[derive(Template)]
#[template(path = "server.html")]
pub struct ServerTemplate {
    pub metrics: Option<ServerMetrics>,
    pub error: Option<String>,
    pub last_updated: String,
    pub current_year: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::server_metrics::MetricSnapshot;

    #[test]
    fn server_page_shows_raw_values_processed() {
        let page = ServerTemplate {
            metrics: Some(ServerMetrics::from_snapshot(&MetricSnapshot::default())),
            error: None,
            last_updated: "2024-05-17 12:00:00".to_string(),
            current_year: 2024,
        }
        .render()
        .unwrap();
        assert!(page.contains("Values processed"));
        assert!(!page.contains("per second"));
        assert!(page.contains("0.0%"));
    }
}
