// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PixConfig {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub default_description: String,
    pub ttl: Duration,
}

impl Default for PixConfig {
    fn default() -> Self {
        Self {
            key: "mateus@doacoes.org".to_string(),
            merchant_name: "Campanha do Mateus".to_string(),
            merchant_city: "São Paulo".to_string(),
            default_description: "Doação para o Mateus".to_string(),
            ttl: doacao_pix::DEFAULT_INSTRUCTION_TTL,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RateLimitConfig {
    pub capacity: f64,
    pub refill_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            refill_per_sec: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub environment: Environment,
    pub catalog_path: Option<PathBuf>,
    pub public_base_url: String,
    pub pix: PixConfig,
    #[serde(skip_serializing)]
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub settlement_status_url: Option<String>,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub rate_limit_per_ip: RateLimitConfig,
    pub ledger_grace: Duration,
    pub shutdown_drain: Duration,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            environment: Environment::Development,
            catalog_path: None,
            public_base_url: "http://localhost:8080".to_string(),
            pix: PixConfig::default(),
            stripe_secret_key: None,
            stripe_api_base: "https://api.stripe.com".to_string(),
            settlement_status_url: None,
            max_body_bytes: 16 * 1024,
            request_timeout: Duration::from_millis(5000),
            rate_limit_per_ip: RateLimitConfig::default(),
            ledger_grace: Duration::from_secs(3600),
            shutdown_drain: Duration::from_millis(2000),
            log_json: true,
        }
    }
}

pub fn validate_startup_config(cfg: &ServerConfig) -> Result<(), String> {
    if cfg.pix.key.trim().is_empty() {
        return Err("pix key must not be empty".to_string());
    }
    if cfg.pix.merchant_name.trim().is_empty() || cfg.pix.merchant_city.trim().is_empty() {
        return Err("pix merchant name and city must not be empty".to_string());
    }
    if cfg.pix.ttl.is_zero() {
        return Err("pix ttl must be > 0".to_string());
    }
    if cfg.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if cfg.request_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    let rl = &cfg.rate_limit_per_ip;
    if !(rl.capacity >= 1.0 && rl.refill_per_sec > 0.0) {
        return Err("rate limit requires capacity >= 1 and refill > 0".to_string());
    }
    if !cfg.public_base_url.starts_with("http://") && !cfg.public_base_url.starts_with("https://")
    {
        return Err(format!(
            "public base url must be absolute http(s): {}",
            cfg.public_base_url
        ));
    }
    if cfg
        .stripe_secret_key
        .as_deref()
        .is_some_and(|k| k.trim().is_empty())
    {
        return Err("stripe secret key is set but empty".to_string());
    }
    Ok(())
}
