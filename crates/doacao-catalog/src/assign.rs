// SPDX-License-Identifier: Apache-2.0

//! Deterministic visitor → campaign bucketing.
//!
//! The mapping is a plain character sum modulo the catalog size. It is stable
//! and cheap, and it is also trivially predictable: use it for picking a
//! marketing variant, never for anything an adversary gains from steering.

use doacao_core::Error;
use doacao_model::CampaignRecord;

/// Identifier used when the visitor address is missing or blank.
pub const FALLBACK_IDENTIFIER: &str = "localhost";

/// Keeps ASCII letters, digits and `_`; everything else is dropped.
#[must_use]
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[must_use]
pub fn bucket_sum(sanitized: &str) -> u32 {
    sanitized
        .chars()
        .fold(0_u32, |acc, c| acc.wrapping_add(c as u32))
}

/// Bucket for `identifier` among `buckets`, or `None` when there are none.
#[must_use]
pub fn bucket_index(identifier: &str, buckets: usize) -> Option<usize> {
    if buckets == 0 {
        return None;
    }
    let identifier = if identifier.trim().is_empty() {
        FALLBACK_IDENTIFIER
    } else {
        identifier
    };
    let sum = bucket_sum(&sanitize_identifier(identifier));
    Some(sum as usize % buckets)
}

pub fn assign<'a>(
    identifier: &str,
    campaigns: &'a [CampaignRecord],
) -> Result<&'a CampaignRecord, Error> {
    bucket_index(identifier, campaigns.len())
        .and_then(|idx| campaigns.get(idx))
        .ok_or_else(|| Error::configuration("campaign catalog is empty"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_separators() {
        assert_eq!(sanitize_identifier("203.0.113.7"), "20301137");
        assert_eq!(sanitize_identifier("::ffff:10.0.0.1"), "ffff10001");
        assert_eq!(sanitize_identifier("a_b-c"), "a_bc");
        assert_eq!(sanitize_identifier("ção"), "o");
    }

    #[test]
    fn sum_is_code_point_total() {
        assert_eq!(bucket_sum("127001"), 299);
        assert_eq!(bucket_sum("localhost"), 969);
        assert_eq!(bucket_sum(""), 0);
    }

    #[test]
    fn blank_identifier_uses_fallback() {
        assert_eq!(bucket_index("", 3), bucket_index(FALLBACK_IDENTIFIER, 3));
        assert_eq!(bucket_index("   ", 3), Some(0));
    }

    #[test]
    fn zero_buckets_is_none() {
        assert_eq!(bucket_index("127.0.0.1", 0), None);
        let err = assign("127.0.0.1", &[]).expect_err("empty catalog");
        assert_eq!(err.kind(), doacao_core::ErrorKind::Configuration);
    }

    #[test]
    fn identifier_with_no_kept_characters_lands_in_first_bucket() {
        assert_eq!(bucket_index("...", 3), Some(0));
    }
}
