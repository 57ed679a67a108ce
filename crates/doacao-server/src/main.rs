// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use doacao_server::{
    build_router, validate_startup_config, AppState, Environment, PixConfig, RateLimitConfig,
    ServerConfig, StripeCheckout,
};
use doacao_settlement::HttpStatusSource;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("signal handlers unavailable, falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn config_from_env() -> ServerConfig {
    let defaults = ServerConfig::default();
    let pix_defaults = PixConfig::default();
    ServerConfig {
        bind_addr: env_string("DOACAO_BIND", &defaults.bind_addr),
        environment: Environment::parse(&env_string("DOACAO_ENV", "development")),
        catalog_path: env_opt("DOACAO_CATALOG_PATH").map(PathBuf::from),
        public_base_url: env_string("DOACAO_PUBLIC_BASE_URL", &defaults.public_base_url),
        pix: PixConfig {
            key: env::var("DOACAO_PIX_KEY").unwrap_or(pix_defaults.key),
            merchant_name: env_string("DOACAO_PIX_MERCHANT_NAME", &pix_defaults.merchant_name),
            merchant_city: env_string("DOACAO_PIX_MERCHANT_CITY", &pix_defaults.merchant_city),
            default_description: env_string(
                "DOACAO_PIX_DEFAULT_DESCRIPTION",
                &pix_defaults.default_description,
            ),
            ttl: env_duration_ms("DOACAO_PIX_TTL_MS", pix_defaults.ttl.as_millis() as u64),
        },
        stripe_secret_key: env_opt("DOACAO_STRIPE_SECRET_KEY"),
        stripe_api_base: env_string("DOACAO_STRIPE_API_BASE", &defaults.stripe_api_base),
        settlement_status_url: env_opt("DOACAO_SETTLEMENT_STATUS_URL"),
        max_body_bytes: env_usize("DOACAO_MAX_BODY_BYTES", defaults.max_body_bytes),
        request_timeout: env_duration_ms("DOACAO_REQUEST_TIMEOUT_MS", 5000),
        rate_limit_per_ip: RateLimitConfig {
            capacity: env_f64("DOACAO_RATE_LIMIT_CAPACITY", 10.0),
            refill_per_sec: env_f64("DOACAO_RATE_LIMIT_REFILL_PER_SEC", 0.5),
        },
        ledger_grace: env_duration_ms("DOACAO_LEDGER_GRACE_MS", 3_600_000),
        shutdown_drain: env_duration_ms("DOACAO_SHUTDOWN_DRAIN_MS", 2000),
        log_json: env_bool("DOACAO_LOG_JSON", true),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cfg = config_from_env();
    init_tracing(cfg.log_json);
    validate_startup_config(&cfg).map_err(|e| format!("invalid configuration: {e}"))?;

    let catalog = match &cfg.catalog_path {
        Some(path) => doacao_catalog::load_from_path(path),
        None => doacao_catalog::load_builtin(),
    }
    .map_err(|e| format!("catalog load failed: {e}"))?;

    let checkout = Arc::new(StripeCheckout::new(
        &cfg.stripe_api_base,
        cfg.stripe_secret_key.clone(),
        cfg.request_timeout,
    ));
    if cfg.stripe_secret_key.is_none() {
        warn!("DOACAO_STRIPE_SECRET_KEY unset; card checkout will fail");
    }
    let upstream = cfg
        .settlement_status_url
        .as_deref()
        .map(|url| HttpStatusSource::new(url, cfg.request_timeout));
    let bind_addr = cfg.bind_addr.clone();
    let drain = cfg.shutdown_drain;
    info!(
        config = %serde_json::to_string(&cfg).unwrap_or_default(),
        "startup configuration"
    );

    let mut state = AppState::new(catalog, cfg, checkout)
        .map_err(|e| format!("state initialisation failed: {e}"))?;
    if let Some(source) = upstream {
        state = state.with_upstream_status(Arc::new(source));
    }
    info!(
        campaigns = state.directory.catalog().len(),
        catalog_digest = %state.catalog_digest,
        "catalog ready"
    );

    let maintenance = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            maintenance.prune_idle().await;
        }
    });

    let app = build_router(state.clone());
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind failed: {e}"))?;
    info!("doacao-server listening on {bind_addr}");

    let ready = state.ready.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        wait_for_shutdown_signal().await;
        ready.store(false, Ordering::Relaxed);
        info!(drain_ms = drain.as_millis() as u64, "shutdown requested, draining");
        tokio::time::sleep(drain).await;
    })
    .await
    .map_err(|e| {
        error!("server failed: {e}");
        format!("server failed: {e}")
    })
}
