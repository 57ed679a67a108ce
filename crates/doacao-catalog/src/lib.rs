// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Campaign catalog loading, lookups and visitor bucketing.

mod assign;
mod directory;
mod load;

pub use assign::{assign, bucket_index, bucket_sum, sanitize_identifier, FALLBACK_IDENTIFIER};
pub use directory::CampaignDirectory;
pub use load::{catalog_digest, load_builtin, load_from_path, parse_catalog, BUILTIN_CATALOG_JSON};

pub const CRATE_NAME: &str = "doacao-catalog";
