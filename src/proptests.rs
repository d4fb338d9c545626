use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::SgTree;

/// Operations exercised against both the tree and the model. Keys are `u8`
/// so that overwrites, removals of present keys, and rebuild-heavy clusters
/// all occur often.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(u8, u16),
    Remove(u8),
    Get(u8),
    GetOrDefault(u8),
}

/// Executes actions on the tree and a `BTreeMap` model in lockstep.
#[derive(Default)]
struct Harness {
    tree: SgTree<u8, u16>,
    model: BTreeMap<u8, u16>,
}

impl Harness {
    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(k, v) => {
                assert_eq!(
                    self.tree.insert(k, v),
                    self.model.insert(k, v),
                    "insert mismatch at key {k}"
                );
            }
            Action::Remove(k) => {
                assert_eq!(
                    self.tree.remove(&k),
                    self.model.remove(&k),
                    "remove mismatch at key {k}"
                );
            }
            Action::Get(k) => {
                assert_eq!(
                    self.tree.get(&k),
                    self.model.get(&k),
                    "get mismatch at key {k}"
                );
            }
            Action::GetOrDefault(k) => {
                assert_eq!(
                    *self.tree.get_or_default(k),
                    *self.model.entry(k).or_default(),
                    "get_or_default mismatch at key {k}"
                );
            }
        }
        assert_eq!(self.tree.len(), self.model.len());
        assert_eq!(self.tree.is_empty(), self.model.is_empty());
    }

    fn finish(self) {
        self.tree.validate();
        let got: Vec<(u8, u16)> = self.tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u8, u16)> = self.model.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(got, expected, "ordered contents diverged from model");
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_vs_btreemap(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut harness = Harness::default();
        for action in actions {
            harness.execute(action);
        }
        harness.finish();
    }

    #[test]
    fn proptest_any_insertion_order_round_trips(keys in prop::collection::vec(any::<u16>(), 0..128)) {
        let mut tree: SgTree<u16, u16> = SgTree::new();
        let mut model: BTreeMap<u16, u16> = BTreeMap::new();
        for &k in &keys {
            tree.insert(k, k);
            model.insert(k, k);
        }
        tree.validate();
        let got: Vec<u16> = tree.iter().map(|(k, _)| *k).collect();
        let expected: Vec<u16> = model.keys().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn proptest_dense_fill_depth_bound(n in 1usize..200) {
        let mut tree: SgTree<u32, u32> = SgTree::new();
        for i in 0..n as u32 {
            tree.insert(i, i);
        }
        tree.validate();
        let bound = n.next_power_of_two().trailing_zeros() as usize + 2;
        prop_assert!(tree.max_depth() <= bound, "depth {} over bound {}", tree.max_depth(), bound);
    }

    #[test]
    fn proptest_erase_then_reinsert_is_clean(keys in prop::collection::btree_set(any::<u8>(), 1..48), victim_index in any::<prop::sample::Index>()) {
        let keys: Vec<u8> = keys.into_iter().collect();
        let victim = keys[victim_index.index(keys.len())];

        let mut erased: SgTree<u8, u8> = keys.iter().map(|&k| (k, k)).collect();
        erased.remove(&victim);
        erased.insert(victim, victim);

        let untouched: SgTree<u8, u8> = keys.iter().map(|&k| (k, k)).collect();

        erased.validate();
        let got: Vec<(u8, u8)> = erased.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u8, u8)> = untouched.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(erased.len(), untouched.len());
    }
}
