// SPDX-License-Identifier: Apache-2.0

use doacao_model::{Amount, CampaignRecord, Catalog, SettlementStatus, Slug, TxId};
use serde_json::json;

fn record(id: &str, slug: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": slug,
        "title": format!("Campanha {id}"),
        "bannerImage": "https://img.example/banner.png",
        "contentImage": "https://img.example/content.png",
        "description": "descricao",
        "patientName": "Paciente",
        "patientAge": 9,
        "condition": "condicao",
        "location": "São Paulo, SP",
        "raised": 18750,
        "goal": 50000,
        "donorsCount": 234,
        "daysRemaining": 45,
        "story": ["p1", "p2"],
        "destinationList": ["d1"]
    })
}

#[test]
fn campaign_record_uses_camel_case_wire_names() {
    let parsed: CampaignRecord =
        serde_json::from_value(record("mateus-campaign", "/")).expect("parse record");
    assert!(parsed.slug.is_root());
    assert_eq!(parsed.donors_count, 234);
    assert!(parsed.testimonial.is_none());

    let back = serde_json::to_value(&parsed).expect("serialize record");
    assert_eq!(back["patientName"], "Paciente");
    assert!(back.get("testimonial").is_none());
    assert!((parsed.percent_raised() - 37.5).abs() < f64::EPSILON);
}

#[test]
fn campaign_record_rejects_unknown_fields() {
    let mut raw = record("x", "x");
    raw["unexpected"] = json!(true);
    assert!(serde_json::from_value::<CampaignRecord>(raw).is_err());
}

#[test]
fn catalog_deserialization_enforces_invariants() {
    let ok = json!([record("a", "/"), record("b", "b-slug")]);
    let catalog: Catalog = serde_json::from_value(ok).expect("valid catalog");
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog
            .by_slug(&Slug::parse("/b-slug").expect("slug"))
            .map(|c| c.id.as_str()),
        Some("b")
    );

    let dup_slug = json!([record("a", "same"), record("b", "/same")]);
    let err = serde_json::from_value::<Catalog>(dup_slug).expect_err("duplicate slug");
    assert!(err.to_string().contains("duplicate campaign slug"));

    let dup_id = json!([record("a", "x"), record("a", "y")]);
    assert!(serde_json::from_value::<Catalog>(dup_id).is_err());

    assert!(serde_json::from_value::<Catalog>(json!([])).is_err());
}

#[test]
fn amount_accepts_numbers_and_strings() {
    let a: Amount = serde_json::from_value(json!(50)).expect("number amount");
    let b: Amount = serde_json::from_value(json!("50.00")).expect("string amount");
    assert_eq!(a, b);
    assert_eq!(serde_json::to_value(a).expect("serialize"), json!("50.00"));
    assert!(serde_json::from_value::<Amount>(json!(0)).is_err());
    assert!(serde_json::from_value::<Amount>(json!("dez")).is_err());
}

#[test]
fn settlement_status_wire_names() {
    let s: SettlementStatus = serde_json::from_value(json!("completed")).expect("status");
    assert_eq!(s, SettlementStatus::Completed);
    assert!(serde_json::from_value::<SettlementStatus>(json!("settled")).is_err());
    let id: TxId =
        serde_json::from_value(json!("abcdef0123456789abcdef0123456789")).expect("txid");
    assert_eq!(id.as_str().len(), 32);
}
