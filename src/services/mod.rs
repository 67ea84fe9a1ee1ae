pub mod classifier;
pub mod proxies;
pub mod server_metrics;
pub mod summary;
pub mod zabbix;
