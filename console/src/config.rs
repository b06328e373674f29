use calltracking::client::ProviderConfig;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;

#[derive(Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Deserialize)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

fn default_session_file() -> PathBuf {
    PathBuf::from("console-session.json")
}

#[derive(Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub calltracking: ProviderConfig,
    pub metrics: Option<MetricsConfig>,
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
