use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;
use worksource_core::{AttributionChain, AttributionSet};

fn hash_of<T: Hash>(v: &T) -> u64 {
    let mut h = DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

fn arb_label() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z]{0,6}")
}

fn arb_chain() -> impl Strategy<Value = AttributionChain> {
    prop::collection::vec((any::<i32>(), arb_label()), 0..5).prop_map(|nodes| {
        let mut wc = AttributionChain::new();
        for (id, tag) in &nodes {
            wc.add_node(*id, tag.as_deref());
        }
        wc
    })
}

fn arb_set() -> impl Strategy<Value = AttributionSet> {
    (
        prop::collection::vec((-50i32..50, arb_label()), 0..12),
        prop::collection::vec(arb_chain(), 0..4),
    )
        .prop_map(|(entries, chains)| {
            let mut ws = AttributionSet::new();
            for (id, name) in &entries {
                match name {
                    Some(n) => ws.add_named(*id, n),
                    None => ws.add(*id),
                };
            }
            for c in chains {
                let mut one = AttributionSet::new();
                *one.create_chain() = c;
                ws.add_set(&one);
            }
            ws
        })
}

proptest! {
    #[test]
    fn parcel_roundtrip_preserves_structure(ws in arb_set()) {
        let bytes = ws.to_bytes().unwrap();
        let de = AttributionSet::from_bytes(&bytes).unwrap();
        prop_assert_eq!(&de, &ws);
        prop_assert_eq!(de.entries(), ws.entries());
    }

    #[test]
    fn equal_sets_hash_equal(ws in arb_set()) {
        let copy = ws.clone();
        prop_assert_eq!(&copy, &ws);
        prop_assert_eq!(hash_of(&copy), hash_of(&ws));
    }

    #[test]
    fn equal_sets_never_diff(a in arb_set(), b in arb_set()) {
        if a == b {
            prop_assert!(!a.diff(&b));
        }
        prop_assert_eq!(a.diff(&b), b.diff(&a));
    }

    #[test]
    fn diff_agrees_with_diff_entries(a in arb_set(), b in arb_set()) {
        let d = a.diff_entries(&b);
        prop_assert_eq!(a.diff(&b), !d.is_empty());
        for e in d.added.entries() {
            prop_assert!(!a.entries().contains(e));
            prop_assert!(b.entries().contains(e));
        }
        for e in d.removed.entries() {
            prop_assert!(a.entries().contains(e));
            prop_assert!(!b.entries().contains(e));
        }
    }

    #[test]
    fn add_set_is_idempotent(a in arb_set(), b in arb_set()) {
        let mut once = a.clone();
        once.add_set(&b);
        let mut twice = once.clone();
        prop_assert!(!twice.add_set(&b));
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(twice.chains().len(), once.chains().len());
    }

    #[test]
    fn set_from_copy_is_independent(a in arb_set(), id in any::<i32>()) {
        let mut src = a.clone();
        let mut dst = AttributionSet::new();
        dst.set_from(Some(&src));
        prop_assert_eq!(&dst, &a);

        src.create_chain().add_node(id, None);
        if let Some(first) = src.chain_mut(0) {
            first.add_node(id, Some("later"));
        }
        prop_assert_eq!(&dst, &a);
    }

    #[test]
    fn chain_clone_is_independent(c in arb_chain(), id in any::<i32>()) {
        let mut original = c.clone();
        prop_assert_eq!(&original, &c);
        original.add_node(id, None);
        prop_assert_eq!(c.size() + 1, original.size());
        prop_assert_ne!(&original, &c);
    }
}
