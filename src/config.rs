use serde::Deserialize;
use config::{Config as ConfigLoader, ConfigError, Environment, File, Map};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_server_address")]
    pub server_address: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Empty disables Basic authentication.
    #[serde(default)]
    pub htpasswd_path: String,

    #[serde(default)]
    pub zabbix: ZabbixConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZabbixConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Technical host name the server's internal items live on.
    #[serde(default = "default_server_host")]
    pub server_host: String,

    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ZabbixConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            password: String::new(),
            server_host: default_server_host(),
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads the optional TOML file, then `DASHBOARD__*` environment
    /// variables on top (e.g. `DASHBOARD__ZABBIX__PASSWORD`).
    pub fn from_file(file: &str) -> Result<Self, ConfigError> {
        Self::load(file, None)
    }

    /// `env` replaces the process environment when given.
    fn load(file: &str, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let settings = ConfigLoader::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        settings.try_deserialize::<Self>()
    }

    pub fn auth_enabled(&self) -> bool {
        !self.htpasswd_path.trim().is_empty()
    }
}

fn default_server_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "dashboard.log".to_string()
}

fn default_server_host() -> String {
    "Zabbix server".to_string()
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
