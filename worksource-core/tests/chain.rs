use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use worksource_core::AttributionChain;

fn hash_of<T: Hash>(v: &T) -> u64 {
    let mut h = DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

#[test]
fn add_node_appends_in_order() {
    let mut wc = AttributionChain::new();
    wc.add_node(56, None);

    assert_eq!(wc.ids()[0], 56);
    assert_eq!(wc.tags()[0], None);
    assert_eq!(wc.size(), 1);

    wc.add_node(57, Some("foo"));
    assert_eq!(wc.ids(), vec![56, 57]);
    assert_eq!(wc.tags(), vec![None, Some("foo")]);
    assert_eq!(wc.size(), 2);
}

#[test]
fn equality_and_hash_follow_nodes() {
    let mut a = AttributionChain::new();
    let mut b = AttributionChain::new();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    a.add_node(1, None);
    b.add_node(1, None);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    a.add_node(2, Some("tag"));
    b.add_node(2, Some("tag"));
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let mut a = AttributionChain::new();
    let mut b = AttributionChain::new();
    a.add_node(5, None);
    b.add_node(6, None);
    assert_ne!(a, b);
    assert_ne!(hash_of(&a), hash_of(&b));

    let mut a = AttributionChain::new();
    let mut b = AttributionChain::new();
    a.add_node(5, Some("tag1"));
    b.add_node(5, Some("tag2"));
    assert_ne!(a, b);
    assert_ne!(hash_of(&a), hash_of(&b));
}

#[test]
fn absent_tag_differs_from_empty_tag() {
    let mut a = AttributionChain::new();
    let mut b = AttributionChain::new();
    a.add_node(5, None);
    b.add_node(5, Some(""));
    assert_ne!(a, b);
}

#[test]
fn prefix_chain_is_not_equal() {
    let mut a = AttributionChain::new();
    a.add_node(1, None).add_node(2, None);
    let mut b = AttributionChain::new();
    b.add_node(1, None);
    assert_ne!(a, b);
}

#[test]
fn clone_is_independent() {
    let mut wc1 = AttributionChain::new();
    wc1.add_node(1, Some("foo"))
        .add_node(2, None)
        .add_node(3, Some("baz"));

    let wc2 = wc1.clone();
    assert_eq!(wc1, wc2);

    wc1.add_node(4, Some("baz"));
    assert_ne!(wc1, wc2);
    assert_eq!(wc2.size(), 3);
}

#[test]
fn attribution_node_is_first_hop() {
    let mut wc = AttributionChain::new();
    assert_eq!(wc.attribution_id(), None);
    assert_eq!(wc.attribution_tag(), None);

    wc.add_node(10, Some("origin")).add_node(20, Some("proxy"));
    assert_eq!(wc.attribution_id(), Some(10));
    assert_eq!(wc.attribution_tag(), Some("origin"));
}

#[test]
fn display_lists_nodes() {
    let mut wc = AttributionChain::new();
    wc.add_node(1, Some("foo")).add_node(2, None);
    assert_eq!(wc.to_string(), "Chain{(1, foo), (2, -)}");
}
