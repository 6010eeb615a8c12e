#[cfg(test)]
mod tests {
    use crate::{
        Accumulator, AccumulatorError, FieldElement, HashOracle, MimcSponge, PathDefect,
    };
    use std::sync::Arc;

    fn leaves(values: &[u64]) -> Vec<FieldElement> {
        values.iter().copied().map(FieldElement::from).collect()
    }

    fn accumulator(depth: usize) -> Accumulator<MimcSponge> {
        Accumulator::new(depth, Arc::new(MimcSponge::new())).unwrap()
    }

    #[test]
    fn test_accumulator_creation() {
        let acc = accumulator(5);
        assert_eq!(acc.depth(), 5);
        assert_eq!(acc.capacity(), 32);
        assert_eq!(acc.zeros().depth(), 5);
    }

    #[test]
    fn test_invalid_depth_rejected() {
        let sponge = Arc::new(MimcSponge::new());
        assert!(matches!(
            Accumulator::new(0, Arc::clone(&sponge)),
            Err(AccumulatorError::InvalidDepth { depth: 0, .. })
        ));
        assert!(matches!(
            Accumulator::new(33, sponge),
            Err(AccumulatorError::InvalidDepth { depth: 33, .. })
        ));
    }

    #[test]
    fn test_empty_tree_root_is_zero_below_top() {
        let acc = accumulator(6);
        let root = acc.root(&[]).unwrap();
        assert_eq!(Some(&root), acc.zeros().get(5));
        assert_eq!(acc.root(&[]).unwrap(), root);
    }

    #[test]
    fn test_single_leaf_depth_one() {
        let acc = accumulator(1);
        let leaf = FieldElement::from(7);
        let expected = acc
            .oracle()
            .hash2(&leaf, acc.zeros().get(0).unwrap())
            .unwrap();
        assert_eq!(acc.root(&[leaf]).unwrap(), expected);
    }

    #[test]
    fn test_odd_layer_padded_with_level_zero() {
        let acc = accumulator(2);
        let sponge = MimcSponge::new();
        let set = leaves(&[1, 2, 3]);
        let z0 = *acc.zeros().get(0).unwrap();

        let left = sponge.hash2(&set[0], &set[1]).unwrap();
        let right = sponge.hash2(&set[2], &z0).unwrap();
        let expected = sponge.hash2(&left, &right).unwrap();
        assert_eq!(acc.root(&set).unwrap(), expected);

        let path = acc.path_for(&set, &set[2]).unwrap();
        assert_eq!(path.siblings[0], z0);
        assert_ne!(path.siblings[0], set[2]);
        assert_eq!(path.siblings[1], left);
        assert_eq!(path.directions, vec![0, 1]);
    }

    #[test]
    fn test_missing_subtree_uses_higher_zero() {
        // Two leaves at depth 3: level 1 has one node, so its sibling is Z[1].
        let acc = accumulator(3);
        let set = leaves(&[10, 20]);
        let path = acc.path_for(&set, &set[1]).unwrap();
        assert_eq!(path.siblings[0], set[0]);
        assert_eq!(&path.siblings[1], acc.zeros().get(1).unwrap());
        assert_eq!(&path.siblings[2], acc.zeros().get(2).unwrap());
        assert_eq!(path.directions, vec![1, 0, 0]);
    }

    #[test]
    fn test_capacity_boundary() {
        let acc = accumulator(3);
        let full: Vec<FieldElement> = (0..8u64).map(FieldElement::from).collect();
        assert!(acc.root(&full).is_ok());

        let over: Vec<FieldElement> = (0..9u64).map(FieldElement::from).collect();
        assert!(matches!(
            acc.root(&over),
            Err(AccumulatorError::CapacityExceeded {
                len: 9,
                capacity: 8
            })
        ));
        assert!(matches!(
            acc.path_for(&over, &FieldElement::from(0)),
            Err(AccumulatorError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_full_tree_path_round_trip() {
        let acc = accumulator(3);
        let full: Vec<FieldElement> = (100..108u64).map(FieldElement::from).collect();
        let root = acc.root(&full).unwrap();
        let verifier = acc.verifier();
        for leaf in &full {
            let path = acc.path_for(&full, leaf).unwrap();
            assert_eq!(verifier.recompute(leaf, &path).unwrap(), root);
        }
    }

    #[test]
    fn test_path_round_trip_every_leaf() {
        let acc = accumulator(4);
        let set = leaves(&[3, 1, 4, 1_000, 5, 9, 2]);
        let root = acc.root(&set).unwrap();
        for (i, leaf) in set.iter().enumerate() {
            let witness = acc.root_and_path(&set, leaf).unwrap();
            assert_eq!(witness.root, root);
            assert_eq!(witness.leaf_index, i);
            assert_eq!(witness.path.len(), 4);
            assert_eq!(witness.path.leaf_index().unwrap(), i as u64);
            assert!(acc.verifier().verify(leaf, &witness.path, &root).unwrap());
        }
    }

    #[test]
    fn test_first_match_duplicate_semantics() {
        let acc = accumulator(3);
        let set = leaves(&[42, 7, 42]);
        let witness = acc.root_and_path(&set, &FieldElement::from(42)).unwrap();
        assert_eq!(witness.leaf_index, 0);
        assert_eq!(witness.path.directions, vec![0, 0, 0]);
        assert_eq!(witness.path.siblings[0], FieldElement::from(7));
    }

    #[test]
    fn test_element_not_found() {
        let acc = accumulator(3);
        let set = leaves(&[1, 2, 3]);
        assert!(matches!(
            acc.path_for(&set, &FieldElement::from(4)),
            Err(AccumulatorError::ElementNotFound(v)) if v == FieldElement::from(4)
        ));
    }

    #[test]
    fn test_lookup_normalizes_text_forms() {
        let acc = accumulator(2);
        let set = vec![
            "0x0f".parse::<FieldElement>().unwrap(),
            "16".parse::<FieldElement>().unwrap(),
        ];
        let target: FieldElement = "15".parse().unwrap();
        assert_eq!(acc.root_and_path(&set, &target).unwrap().leaf_index, 0);
    }

    #[test]
    fn test_tampered_sibling_changes_root() {
        let acc = accumulator(3);
        let set = leaves(&[1, 2, 3, 4]);
        let root = acc.root(&set).unwrap();
        let mut path = acc.path_for(&set, &set[1]).unwrap();
        path.siblings[0] = FieldElement::from(999);
        assert!(!acc.verifier().verify(&set[1], &path, &root).unwrap());
    }

    #[test]
    fn test_flipped_direction_changes_root() {
        let acc = accumulator(3);
        let set = leaves(&[1, 2, 3, 4]);
        let root = acc.root(&set).unwrap();
        let mut path = acc.path_for(&set, &set[1]).unwrap();
        path.directions[0] ^= 1;
        assert!(!acc.verifier().verify(&set[1], &path, &root).unwrap());
    }

    #[test]
    fn test_path_from_other_depth_rejected() {
        let shallow = accumulator(2);
        let deep = accumulator(3);
        let set = leaves(&[1, 2]);
        let path = shallow.path_for(&set, &set[0]).unwrap();
        assert!(matches!(
            deep.verifier().recompute(&set[0], &path),
            Err(AccumulatorError::MalformedPath(PathDefect::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_appending_changes_root() {
        let acc = accumulator(4);
        let before = acc.root(&leaves(&[1, 2, 3])).unwrap();
        let after = acc.root(&leaves(&[1, 2, 3, 4])).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_shared_across_threads() {
        let acc = accumulator(4);
        let set = leaves(&[11, 22, 33, 44, 55]);
        let expected = acc.root(&set).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = set
                .iter()
                .map(|leaf| {
                    let acc = acc.clone();
                    let set = &set;
                    scope.spawn(move || {
                        let witness = acc.root_and_path(set, leaf).unwrap();
                        acc.verifier().recompute(leaf, &witness.path).unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
