use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub gateway_api_url: String,
    pub upstream_timeout_ms: u64,
    pub front_title: String,
    pub bonus_title: String,
    pub default_offer: String,
}

/// Overrides read from a TOML file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server_port: Option<u16>,
    pub gateway_api_url: Option<String>,
    pub upstream_timeout_ms: Option<u64>,
    pub front_title: Option<String>,
    pub bonus_title: Option<String>,
    pub default_offer: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            gateway_api_url: "http://payment-gateway:8080/api-pix".to_string(),
            upstream_timeout_ms: 10_000,
            front_title: "Depósito".to_string(),
            bonus_title: "Depósito Bônus".to_string(),
            default_offer: "tiktok".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            gateway_api_url: env::var("GATEWAY_API_URL")
                .unwrap_or(defaults.gateway_api_url),
            upstream_timeout_ms: env::var("UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout_ms),
            front_title: env::var("OFFER_FRONT_TITLE").unwrap_or(defaults.front_title),
            bonus_title: env::var("OFFER_BONUS_TITLE").unwrap_or(defaults.bonus_title),
            default_offer: env::var("DEFAULT_OFFER").unwrap_or(defaults.default_offer),
        }
    }

    /// Env/defaults first, then the optional TOML file on top. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::from_env();

        if let Some(path) = path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            let file: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?;
            config.apply(file);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, file: FileConfig) {
        if let Some(port) = file.server_port {
            self.server_port = port;
        }
        if let Some(url) = file.gateway_api_url {
            self.gateway_api_url = url;
        }
        if let Some(timeout) = file.upstream_timeout_ms {
            self.upstream_timeout_ms = timeout;
        }
        if let Some(title) = file.front_title {
            self.front_title = title;
        }
        if let Some(title) = file.bonus_title {
            self.bonus_title = title;
        }
        if let Some(offer) = file.default_offer {
            self.default_offer = offer;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.gateway_api_url)
            .with_context(|| format!("invalid GATEWAY_API_URL {:?}", self.gateway_api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("GATEWAY_API_URL must be http(s), got {}", url.scheme());
        }
        if self.upstream_timeout_ms == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_MS must be greater than zero");
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}
