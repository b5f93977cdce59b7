//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Club identity configuration.
    pub club: ClubConfig,
    /// Football data provider configuration.
    pub football: FootballConfig,
    /// News provider configuration.
    pub news: NewsConfig,
    /// Push notification configuration (optional; fan-out is disabled
    /// when absent).
    #[serde(default)]
    pub push: Option<PushConfig>,
}

/// Club identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClubConfig {
    /// Club name, used to filter fixtures client-side.
    pub name: String,
    /// Competition code for fixtures and standings (e.g. "PL").
    pub competition: String,
}

/// Football data provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FootballConfig {
    /// Base URL of the fixtures/standings API.
    #[serde(default = "default_football_base_url")]
    pub base_url: String,
    /// API token, sent as the `X-Auth-Token` header.
    pub api_token: String,
}

/// News provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Base URL of the news API.
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    /// API key, sent as the `apiKey` query parameter.
    pub api_key: String,
    /// Search query for club news.
    pub query: String,
    /// Request timeout in seconds.
    #[serde(default = "default_news_timeout_secs")]
    pub timeout_secs: u64,
}

/// VAPID configuration for Web Push fan-out.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// VAPID private key (base64 URL-safe encoded).
    pub vapid_private_key: String,
    /// VAPID subject (typically a mailto: or https: URL).
    pub vapid_subject: String,
}

fn default_football_base_url() -> String {
    "https://api.football-data.org/v4".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org".to_string()
}

const fn default_news_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TERRACE_ENV`)
    /// 3. Environment variables with `TERRACE` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TERRACE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TERRACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("TERRACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
