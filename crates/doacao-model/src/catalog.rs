// SPDX-License-Identifier: Apache-2.0

use crate::{CampaignId, CampaignRecord, Slug, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, validated, read-only set of campaigns.
///
/// The only constructor is [`Catalog::new`], so every value of this type is
/// non-empty with unique ids and unique slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CampaignRecord>", into = "Vec<CampaignRecord>")]
pub struct Catalog {
    campaigns: Vec<CampaignRecord>,
}

impl Catalog {
    pub fn new(campaigns: Vec<CampaignRecord>) -> Result<Self, ValidationError> {
        if campaigns.is_empty() {
            return Err(ValidationError(
                "catalog must contain at least one campaign".to_string(),
            ));
        }
        let mut ids = HashSet::with_capacity(campaigns.len());
        let mut slugs = HashSet::with_capacity(campaigns.len());
        for campaign in &campaigns {
            campaign.validate()?;
            if !ids.insert(campaign.id.clone()) {
                return Err(ValidationError(format!(
                    "duplicate campaign id `{}`",
                    campaign.id
                )));
            }
            if !slugs.insert(campaign.slug.clone()) {
                return Err(ValidationError(format!(
                    "duplicate campaign slug `{}`",
                    campaign.slug
                )));
            }
        }
        Ok(Self { campaigns })
    }

    #[must_use]
    pub fn campaigns(&self) -> &[CampaignRecord] {
        &self.campaigns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CampaignRecord> {
        self.campaigns.get(index)
    }

    #[must_use]
    pub fn by_slug(&self, slug: &Slug) -> Option<&CampaignRecord> {
        self.campaigns.iter().find(|c| &c.slug == slug)
    }

    #[must_use]
    pub fn by_id(&self, id: &CampaignId) -> Option<&CampaignRecord> {
        self.campaigns.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn root(&self) -> Option<&CampaignRecord> {
        self.campaigns.iter().find(|c| c.slug.is_root())
    }
}

impl TryFrom<Vec<CampaignRecord>> for Catalog {
    type Error = ValidationError;

    fn try_from(value: Vec<CampaignRecord>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Catalog> for Vec<CampaignRecord> {
    fn from(value: Catalog) -> Self {
        value.campaigns
    }
}
