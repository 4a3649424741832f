use worksource_core::{AttributionChain, AttributionSet};

#[test]
fn set_json_roundtrip() {
    let mut ws = AttributionSet::with_named(50, "foo");
    ws.add(51);
    ws.create_chain().add_node(52, Some("bar")).add_node(53, None);

    let json = serde_json::to_string(&ws).expect("serialize set");
    let de: AttributionSet = serde_json::from_str(&json).expect("deserialize set");
    assert_eq!(de, ws);
    assert_eq!(de.get(1), Some(51));
}

#[test]
fn chain_json_roundtrip() {
    let mut wc = AttributionChain::new();
    wc.add_node(1, Some("")).add_node(2, None);

    let json = serde_json::to_string(&wc).expect("serialize chain");
    let de: AttributionChain = serde_json::from_str(&json).expect("deserialize chain");
    assert_eq!(de, wc);
    assert_eq!(de.tags(), vec![Some(""), None]);
}

#[test]
fn json_with_duplicate_ids_is_rejected() {
    let json = r#"{"entries":[{"id":1,"name":null},{"id":1,"name":"x"}],"chains":[]}"#;
    let res: Result<AttributionSet, _> = serde_json::from_str(json);
    let err = res.expect_err("duplicate ids");
    assert!(err.to_string().contains("duplicate entry id 1"));
}

#[test]
fn json_without_chains_defaults_to_none() {
    let json = r#"{"entries":[{"id":4,"name":"four"}]}"#;
    let de: AttributionSet = serde_json::from_str(json).expect("deserialize set");
    assert_eq!(de, AttributionSet::with_named(4, "four"));
}
