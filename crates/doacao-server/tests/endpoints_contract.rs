use std::collections::BTreeSet;

#[test]
fn server_routes_match_openapi_paths() {
    let crate_root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let server_src = std::fs::read_to_string(crate_root.join("src/router.rs"))
        .expect("read server routing source");

    let mut route_set = BTreeSet::new();
    let param_re = regex::Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("param regex");
    for cap in regex::Regex::new(r#"\.route\(\s*"([^"]+)""#)
        .expect("regex")
        .captures_iter(&server_src)
    {
        let path = param_re.replace_all(&cap[1], "{$1}").to_string();
        route_set.insert(path);
    }

    let document = doacao_api::openapi_v1_spec();
    let documented_paths: BTreeSet<String> = document
        .get("paths")
        .and_then(serde_json::Value::as_object)
        .expect("paths object")
        .keys()
        .cloned()
        .collect();

    assert_eq!(
        route_set, documented_paths,
        "router and OpenAPI document disagree"
    );
}
