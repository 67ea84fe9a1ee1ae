mod config;
mod logging;
mod handlers;
mod models;
mod security;
mod services;

use actix_web::{
    middleware::{Logger, NormalizePath, TrailingSlash},
    web, App, HttpServer,
};
use handlers::dashboard::{dashboard, server, stale, SharedClient};
use log::{error, info, warn};
use logging::init_logging;
use security::{auth::AuthMiddleware, htaccess::load_htpasswd};
use services::zabbix::ZabbixClient;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = config::Config::from_file("config")
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    init_logging(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let htpasswd = if config.auth_enabled() {
        Some(load_htpasswd(&config.htpasswd_path)?)
    } else {
        warn!("htpasswd_path is empty, dashboard is served without authentication");
        None
    };

    let client: SharedClient = match ZabbixClient::new(&config.zabbix) {
        Ok(client) => {
            info!("Using Zabbix API at {}", client.endpoint());
            Some(client)
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    };
    let client = web::Data::new(client);

    info!("Listening on {}:{}", config.server_address, config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(client.clone())
            .wrap(AuthMiddleware::new(htpasswd.clone()))
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Logger::default())
            .route("/", web::get().to(dashboard))
            .route("/proxies/stale", web::get().to(stale))
            .route("/server", web::get().to(server))
    })
    .bind((config.server_address.as_str(), config.server_port))?
    .run()
    .await
}
