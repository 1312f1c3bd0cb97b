use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::bosh::DEFAULT_SPEC_PATH;
use crate::metrics::{DEFAULT_NAMESPACE, MetricsContext};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub bosh: BoshConfig,
    pub monit: MonitConfig,
    pub metrics: MetricsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub listen_address: String,
    pub telemetry_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            listen_address: ":9191".to_string(),
            telemetry_path: "/metrics".to_string(),
        }
    }
}

impl WebConfig {
    /// Parses the listen address; `:port` binds every interface.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        match self.listen_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}").parse(),
            None => self.listen_address.parse(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BoshConfig {
    pub spec_path: PathBuf,
}

impl Default for BoshConfig {
    fn default() -> Self {
        BoshConfig {
            spec_path: PathBuf::from(DEFAULT_SPEC_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitConfig {
    pub path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for MonitConfig {
    fn default() -> Self {
        MonitConfig {
            path: PathBuf::from("/var/vcap/bosh/bin/monit"),
            timeout_secs: 5,
        }
    }
}

impl MonitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub namespace: String,
    pub environment: String,
    pub bosh_name: String,
    pub bosh_uuid: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            environment: String::new(),
            bosh_name: String::new(),
            bosh_uuid: String::new(),
        }
    }
}

impl MetricsConfig {
    pub fn context(&self) -> MetricsContext {
        MetricsContext {
            namespace: self.namespace.clone(),
            environment: self.environment.clone(),
            bosh_name: self.bosh_name.clone(),
            bosh_uuid: self.bosh_uuid.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// debug, info, warn or error.
    pub level: String,
    /// stdout, stderr or a file path.
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            path: "stdout".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("boshi-exporter").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
