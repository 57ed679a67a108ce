// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! HTTP surface of the donation service.

use doacao_catalog::{catalog_digest, CampaignDirectory};
use doacao_core::{Clock, Error, OsRandom, RandomSource, SystemClock};
use doacao_model::{Catalog, Payee};
use doacao_pix::PixIssuer;
use doacao_settlement::StatusSource;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

mod assignment;
pub mod checkout;
mod config;
mod http;
mod ledger;
mod middleware;
mod rate_limiter;
mod router;

pub use assignment::{
    assignment_cookie, decide, visitor_identifier, AssignmentDecision, ASSIGNMENT_COOKIE,
    ASSIGNMENT_COOKIE_MAX_AGE_DAYS,
};
pub use checkout::{
    CheckoutError, CheckoutProvider, CheckoutSession, FakeCheckout, StripeCheckout,
};
pub use config::{
    validate_startup_config, Environment, PixConfig, RateLimitConfig, ServerConfig,
};
pub use ledger::PaymentLedger;
pub use router::build_router;

pub const CRATE_NAME: &str = "doacao-server";

#[derive(Clone)]
pub struct AppState {
    pub directory: CampaignDirectory,
    pub config: Arc<ServerConfig>,
    pub issuer: PixIssuer,
    pub ledger: Arc<PaymentLedger>,
    pub checkout: Arc<dyn CheckoutProvider>,
    pub upstream_status: Option<Arc<dyn StatusSource>>,
    pub clock: Arc<dyn Clock>,
    pub catalog_digest: Arc<String>,
    pub ready: Arc<AtomicBool>,
    pub(crate) rate_limiter: Arc<rate_limiter::RateLimiter>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        config: ServerConfig,
        checkout: Arc<dyn CheckoutProvider>,
    ) -> Result<Self, Error> {
        Self::with_effects(
            catalog,
            config,
            checkout,
            Arc::new(SystemClock),
            Arc::new(OsRandom),
        )
    }

    /// Same as [`AppState::new`] with the clock and randomness supplied.
    pub fn with_effects(
        catalog: Catalog,
        config: ServerConfig,
        checkout: Arc<dyn CheckoutProvider>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, Error> {
        let digest = catalog_digest(&catalog)?;
        let payee = Payee::new(
            config.pix.key.clone(),
            config.pix.merchant_name.clone(),
            config.pix.merchant_city.clone(),
        );
        let issuer = PixIssuer::new(payee, config.pix.ttl, clock.clone(), random.clone());
        Ok(Self {
            directory: CampaignDirectory::new(Arc::new(catalog), random),
            ledger: Arc::new(PaymentLedger::new(config.ledger_grace)),
            config: Arc::new(config),
            issuer,
            checkout,
            upstream_status: None,
            clock,
            catalog_digest: Arc::new(digest),
            ready: Arc::new(AtomicBool::new(true)),
            rate_limiter: Arc::new(rate_limiter::RateLimiter::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Drops expired ledger entries and idle rate-limit buckets.
    pub async fn prune_idle(&self) {
        let removed = self
            .rate_limiter
            .prune_idle(&self.config.rate_limit_per_ip)
            .await;
        if removed > 0 {
            tracing::debug!(removed, "rate limit buckets pruned");
        }
        self.ledger.prune(self.clock.now()).await;
    }

    #[must_use]
    pub fn with_upstream_status(mut self, source: Arc<dyn StatusSource>) -> Self {
        self.upstream_status = Some(source);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("directory", &self.directory)
            .field("checkout", &self.checkout.provider_tag())
            .field("catalog_digest", &self.catalog_digest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    let catalog = doacao_catalog::load_builtin().expect("builtin catalog");
    AppState::new(
        catalog,
        ServerConfig::default(),
        Arc::new(FakeCheckout::default()),
    )
    .expect("state")
}
