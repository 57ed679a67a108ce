// SPDX-License-Identifier: Apache-2.0

use crate::{CliError, OutputMode};
use doacao_catalog::{assign as assign_campaign, bucket_index, load_builtin, load_from_path};
use doacao_core::Error;
use doacao_model::{CampaignRecord, Catalog, Slug};
use serde_json::json;
use std::path::Path;

pub(crate) fn load(path: Option<&Path>) -> Result<Catalog, CliError> {
    let catalog = match path {
        Some(path) => load_from_path(path)?,
        None => load_builtin()?,
    };
    Ok(catalog)
}

fn summary_line(record: &CampaignRecord) -> String {
    format!(
        "{:<20} {:<20} {:>6.1}%  {}",
        record.id.as_str(),
        record.slug.path(),
        record.percent_raised(),
        record.title
    )
}

pub(crate) fn list(catalog: &Catalog, output: OutputMode) -> Result<(), CliError> {
    let human = catalog
        .campaigns()
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n");
    let rows = catalog
        .campaigns()
        .iter()
        .map(|record| {
            json!({
                "id": record.id.as_str(),
                "slug": record.slug.path(),
                "title": record.title,
                "raised": record.raised,
                "goal": record.goal,
            })
        })
        .collect::<Vec<_>>();
    output.emit(&json!({ "campaigns": rows }), &human)
}

pub(crate) fn show(catalog: &Catalog, slug: &str, output: OutputMode) -> Result<(), CliError> {
    let parsed = Slug::parse(slug).map_err(|e| Error::validation(e.0).with_detail("slug", slug))?;
    let record = catalog
        .by_slug(&parsed)
        .ok_or_else(|| Error::not_found("campaign not found").with_detail("slug", slug))?;
    let payload =
        serde_json::to_value(record).map_err(|e| CliError::internal(e.to_string()))?;
    let human = serde_json::to_string_pretty(record)
        .map_err(|e| CliError::internal(e.to_string()))?;
    output.emit(&payload, &human)
}

pub(crate) fn assign(catalog: &Catalog, identifier: &str, output: OutputMode) -> Result<(), CliError> {
    let record = assign_campaign(identifier, catalog.campaigns())?;
    let bucket = bucket_index(identifier, catalog.len()).unwrap_or_default();
    output.emit(
        &json!({
            "identifier": identifier,
            "bucket": bucket,
            "campaignId": record.id.as_str(),
            "path": record.slug.path(),
        }),
        &format!("{} -> {} ({})", identifier, record.id.as_str(), record.slug.path()),
    )
}
