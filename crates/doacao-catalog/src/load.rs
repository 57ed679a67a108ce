// SPDX-License-Identifier: Apache-2.0

use doacao_core::{sha256_hex, Error};
use doacao_model::Catalog;
use std::path::Path;
use tracing::info;

/// Campaigns shipped with the binary.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/builtin_catalog.json");

pub fn parse_catalog(bytes: &[u8], source: &str) -> Result<Catalog, Error> {
    serde_json::from_slice::<Catalog>(bytes).map_err(|e| {
        Error::configuration(format!("catalog parse failed: {e}")).with_detail("source", source)
    })
}

pub fn load_builtin() -> Result<Catalog, Error> {
    let catalog = parse_catalog(BUILTIN_CATALOG_JSON.as_bytes(), "builtin")?;
    info!(source = "builtin", campaigns = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn load_from_path(path: &Path) -> Result<Catalog, Error> {
    let source = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| {
        Error::configuration(format!("catalog read failed: {e}")).with_detail("source", &source)
    })?;
    let catalog = parse_catalog(&bytes, &source)?;
    info!(source = %source, campaigns = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Content hash of the catalog, stable for identical campaign lists.
pub fn catalog_digest(catalog: &Catalog) -> Result<String, Error> {
    let bytes = serde_json::to_vec(catalog)
        .map_err(|e| Error::internal(format!("catalog serialization failed: {e}")))?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_root_and_two_variants() {
        let catalog = load_builtin().expect("builtin catalog");
        assert_eq!(catalog.len(), 3);
        let root = catalog.root().expect("root campaign");
        assert_eq!(root.id.as_str(), "mateus-campaign");
        let slugs: Vec<_> = catalog.campaigns().iter().map(|c| c.slug.path()).collect();
        assert_eq!(slugs, vec!["/", "/ana-cancer", "/pedro-cardiaco"]);
    }

    #[test]
    fn digest_is_stable() {
        let a = load_builtin().expect("catalog");
        let b = load_builtin().expect("catalog");
        assert_eq!(
            catalog_digest(&a).expect("digest"),
            catalog_digest(&b).expect("digest")
        );
    }

    #[test]
    fn empty_catalog_is_a_configuration_error() {
        let err = parse_catalog(b"[]", "inline").expect_err("empty catalog");
        assert_eq!(err.kind(), doacao_core::ErrorKind::Configuration);
        assert_eq!(err.details().get("source").map(String::as_str), Some("inline"));
    }
}
