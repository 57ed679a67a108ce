// SPDX-License-Identifier: Apache-2.0

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const CAMPAIGN_ID_MAX_LEN: usize = 64;
pub const ROOT_SLUG: &str = "/";

/// Campaign identifier. Also the value of the assignment cookie, so it is
/// restricted to cookie-safe characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CampaignId(String);

impl CampaignId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("campaign id must not be empty".to_string()));
        }
        if s.len() > CAMPAIGN_ID_MAX_LEN {
            return Err(ValidationError(format!(
                "campaign id exceeds max length {CAMPAIGN_ID_MAX_LEN}"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError(format!(
                "campaign id `{s}` must be ascii alphanumeric, '-' or '_'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CampaignId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CampaignId> for String {
    fn from(value: CampaignId) -> Self {
        value.0
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Routing slug of a campaign.
///
/// Leading and trailing `/` are not significant: `ana-cancer`,
/// `/ana-cancer` and `/ana-cancer/` are the same slug, and an empty slug is
/// the root slug `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim().trim_matches('/');
        if s.is_empty() {
            return Ok(Self::root());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError(format!(
                "slug `{s}` must be a single path segment of ascii alphanumeric, '-' or '_'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_SLUG.to_string())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_SLUG
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute path the campaign is served under.
    #[must_use]
    pub fn path(&self) -> String {
        if self.is_root() {
            ROOT_SLUG.to_string()
        } else {
            format!("/{}", self.0)
        }
    }
}

impl TryFrom<String> for Slug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CampaignRecord {
    pub id: CampaignId,
    pub slug: Slug,
    pub title: String,
    pub banner_image: String,
    pub content_image: String,
    pub description: String,
    pub patient_name: String,
    /// Whole years; infants are recorded as 0.
    pub patient_age: u32,
    pub condition: String,
    pub location: String,
    pub raised: u64,
    pub goal: u64,
    pub donors_count: u64,
    pub days_remaining: u32,
    pub story: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
    pub destination_list: Vec<String>,
}

impl CampaignRecord {
    #[must_use]
    pub fn percent_raised(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (self.raised as f64 / self.goal as f64) * 100.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError(format!(
                "campaign `{}` has an empty title",
                self.id
            )));
        }
        if self.story.is_empty() {
            return Err(ValidationError(format!(
                "campaign `{}` has no story paragraphs",
                self.id
            )));
        }
        Ok(())
    }
}
