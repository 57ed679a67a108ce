// SPDX-License-Identifier: Apache-2.0

use crate::assign::assign;
use doacao_core::{Error, RandomSource};
use doacao_model::{CampaignId, CampaignRecord, Catalog, Slug};
use std::sync::Arc;

/// Read-only view over the process catalog handed to request handlers.
#[derive(Clone)]
pub struct CampaignDirectory {
    catalog: Arc<Catalog>,
    random: Arc<dyn RandomSource>,
}

impl CampaignDirectory {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, random: Arc<dyn RandomSource>) -> Self {
        Self { catalog, random }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Exact slug match after normalisation. Malformed slugs match nothing.
    #[must_use]
    pub fn fetch_by_slug(&self, slug: &str) -> Option<&CampaignRecord> {
        let slug = Slug::parse(slug).ok()?;
        self.catalog.by_slug(&slug)
    }

    #[must_use]
    pub fn fetch_by_id(&self, id: &str) -> Option<&CampaignRecord> {
        let id = CampaignId::parse(id).ok()?;
        self.catalog.by_id(&id)
    }

    #[must_use]
    pub fn fetch_all(&self) -> &[CampaignRecord] {
        self.catalog.campaigns()
    }

    pub fn fetch_random(&self) -> Result<&CampaignRecord, Error> {
        let campaigns = self.catalog.campaigns();
        if campaigns.is_empty() {
            return Err(Error::configuration("campaign catalog is empty"));
        }
        let idx = self.random.index_below(campaigns.len());
        campaigns
            .get(idx)
            .ok_or_else(|| Error::internal("random index out of range"))
    }

    pub fn fetch_by_hash(&self, identifier: &str) -> Result<&CampaignRecord, Error> {
        assign(identifier, self.catalog.campaigns())
    }
}

impl std::fmt::Debug for CampaignDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignDirectory")
            .field("campaigns", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
