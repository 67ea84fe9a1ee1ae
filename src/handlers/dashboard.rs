use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use chrono::{Datelike, Local, Utc};
use log::{debug, error, info, warn};

use crate::{
    models::{
        errors::DashboardError,
        templates::{DashboardTemplate, ServerTemplate, StaleProxiesTemplate},
    },
    services::{
        proxies::{build_proxy_list, stale_proxies, ProxyView},
        server_metrics::{MetricSnapshot, ServerMetrics},
        summary::ServerSummary,
        zabbix::ZabbixClient,
    },
};

/// Shared API client; `None` when `zabbix.url` is missing from the configuration.
pub type SharedClient = Option<ZabbixClient>;

struct Overview {
    summary: ServerSummary,
    proxies: Vec<ProxyView>,
}

pub async fn dashboard(client: web::Data<SharedClient>) -> impl Responder {
    info!("Dashboard accessed, collecting data");

    let template = match with_session(client.get_ref(), collect_overview).await {
        Ok(overview) => {
            let stale_count = stale_proxies(&overview.proxies).len();
            info!(
                "Collected {} proxies ({} stale), {} active problems",
                overview.proxies.len(),
                stale_count,
                overview.summary.active_problems
            );
            DashboardTemplate {
                summary: Some(overview.summary),
                proxies: overview.proxies,
                stale_count,
                error: None,
                last_updated: now_label(),
                current_year: current_year(),
            }
        }
        Err(e) => DashboardTemplate {
            summary: None,
            proxies: Vec::new(),
            stale_count: 0,
            error: Some(e.to_string()),
            last_updated: String::new(),
            current_year: current_year(),
        },
    };
    render(template)
}

pub async fn stale(client: web::Data<SharedClient>) -> impl Responder {
    info!("Stale proxies page accessed");

    let template = match with_session(client.get_ref(), collect_proxies).await {
        Ok(proxies) => {
            let proxies = stale_proxies(&proxies);
            if !proxies.is_empty() {
                warn!("{} proxies not contacted in the last 5 minutes", proxies.len());
            }
            StaleProxiesTemplate {
                proxies,
                error: None,
                last_updated: now_label(),
                current_year: current_year(),
            }
        }
        Err(e) => StaleProxiesTemplate {
            proxies: Vec::new(),
            error: Some(e.to_string()),
            last_updated: String::new(),
            current_year: current_year(),
        },
    };
    render(template)
}

pub async fn server(client: web::Data<SharedClient>) -> impl Responder {
    info!("Server page accessed");

    let template = match with_session(client.get_ref(), collect_server_metrics).await {
        Ok(metrics) => ServerTemplate {
            metrics: Some(metrics),
            error: None,
            last_updated: now_label(),
            current_year: current_year(),
        },
        Err(e) => ServerTemplate {
            metrics: None,
            error: Some(e.to_string()),
            last_updated: String::new(),
            current_year: current_year(),
        },
    };
    render(template)
}

/// Logs in, runs `fetch`, and always logs out again.
async fn with_session<'a, T, F, Fut>(client: &'a SharedClient, fetch: F) -> Result<T, DashboardError>
where
    F: FnOnce(&'a ZabbixClient, String) -> Fut,
    Fut: std::future::Future<Output = Result<T, DashboardError>>,
{
    let client = client.as_ref().ok_or_else(|| {
        let err = DashboardError::Configuration("zabbix.url is not set".to_string());
        error!("{}", err);
        err
    })?;

    let token = client.login().await.map_err(|e| {
        error!("Failed to connect to the Zabbix API at {}: {}", client.endpoint(), e);
        e
    })?;
    debug!("Zabbix session opened");

    let result = fetch(client, token.clone()).await;
    if let Err(e) = &result {
        error!("Failed to fetch data from Zabbix: {}", e);
    }
    if let Err(e) = client.logout(&token).await {
        warn!("Zabbix logout failed: {}", e);
    }
    result
}

async fn collect_overview(client: &ZabbixClient, token: String) -> Result<Overview, DashboardError> {
    let total_hosts = client.host_count(&token).await?;
    let total_items = client.item_count(&token).await?;
    let problems = client.active_problem_count(&token).await?;
    let proxies = collect_proxies(client, token).await?;
    Ok(Overview {
        summary: ServerSummary::new(total_hosts, total_items, problems),
        proxies,
    })
}

async fn collect_proxies(client: &ZabbixClient, token: String) -> Result<Vec<ProxyView>, DashboardError> {
    let raw = client.proxies(&token).await?;
    debug!("Retrieved {} proxies", raw.len());
    build_proxy_list(raw, Utc::now())
}

async fn collect_server_metrics(
    client: &ZabbixClient,
    token: String,
) -> Result<ServerMetrics, DashboardError> {
    let items = client.server_items(&token).await?;
    debug!("Retrieved {} internal server items", items.len());
    Ok(ServerMetrics::from_snapshot(&MetricSnapshot::from_items(items)))
}

fn render<T: Template>(template: T) -> HttpResponse {
    match template.render() {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Failed to render template: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn now_label() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn current_year() -> u32 {
    Local::now().year() as u32
}
