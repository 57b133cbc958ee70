//! # Property-Based Tests
//!
//! Randomized verification of the mining engine against a brute-force
//! oracle on small domains, plus determinism and support-monotonicity
//! invariants.

use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;
use trias_core::progress::NoopProgress;
use trias_core::writer::VecWriter;
use trias_core::{Relation, TriConcept, TriasMiner};

// =============================================================================
// HELPERS
// =============================================================================

fn mine(
    triples: &[[u32; 3]],
    cardinalities: [u32; 3],
    min_support: [u32; 3],
) -> BTreeSet<TriConcept> {
    let rel = Relation::new(triples.to_vec(), cardinalities).expect("relation");
    let miner = TriasMiner::new(rel, min_support).expect("miner");
    let mut writer = VecWriter::new();
    miner.run(&mut writer, &mut NoopProgress).expect("run");
    writer.concepts.into_iter().collect()
}

/// Naive derivation of one dimension from the other two: the values related
/// to every pair of the cross product. An empty product derives vacuously to
/// the full domain.
fn derive(
    triples: &BTreeSet<[u32; 3]>,
    cardinality: u32,
    target: usize,
    left: (&[u32], usize),
    right: (&[u32], usize),
) -> Vec<u32> {
    (1..=cardinality)
        .filter(|&v| {
            left.0.iter().all(|&l| {
                right.0.iter().all(|&r| {
                    let mut triple = [0u32; 3];
                    triple[target] = v;
                    triple[left.1] = l;
                    triple[right.1] = r;
                    triples.contains(&triple)
                })
            })
        })
        .collect()
}

/// All mutually closed (A, B, C) triples, by exhaustive subset search.
/// Feasible only for tiny domains.
fn brute_force_concepts(triples: &[[u32; 3]], cards: [u32; 3]) -> BTreeSet<TriConcept> {
    let set: BTreeSet<[u32; 3]> = triples.iter().copied().collect();
    let subsets = |card: u32| -> Vec<Vec<u32>> {
        (0u32..(1 << card))
            .map(|mask| (1..=card).filter(|&v| mask & (1 << (v - 1)) != 0).collect())
            .collect()
    };
    let mut concepts = BTreeSet::new();
    for a in subsets(cards[0]) {
        for b in subsets(cards[1]) {
            for c in subsets(cards[2]) {
                let closed_a = derive(&set, cards[0], 0, (&b, 1), (&c, 2));
                let closed_b = derive(&set, cards[1], 1, (&a, 0), (&c, 2));
                let closed_c = derive(&set, cards[2], 2, (&a, 0), (&b, 1));
                if a == closed_a && b == closed_b && c == closed_c {
                    concepts.insert(TriConcept::new(a.clone(), b.clone(), c.clone()));
                }
            }
        }
    }
    concepts
}

fn arb_triples(card: u32, max_len: usize) -> impl Strategy<Value = Vec<[u32; 3]>> {
    vec((1..=card, 1..=card, 1..=card), 0..max_len).prop_map(|v| {
        let mut seen = BTreeSet::new();
        v.into_iter()
            .map(|(u, t, r)| [u, t, r])
            .filter(|t| seen.insert(*t))
            .collect()
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// On tiny domains the miner finds exactly the mutually closed triples.
    #[test]
    fn matches_brute_force_oracle(triples in arb_triples(3, 16)) {
        let cards = [3, 3, 3];
        let found = mine(&triples, cards, [0, 0, 0]);
        let expected = brute_force_concepts(&triples, cards);
        prop_assert_eq!(found, expected);
    }

    /// Every emitted concept is mutually closed under the naive derivations.
    #[test]
    fn emitted_concepts_are_mutually_closed(triples in arb_triples(4, 24)) {
        let cards = [4, 4, 4];
        let set: BTreeSet<[u32; 3]> = triples.iter().copied().collect();
        for concept in mine(&triples, cards, [0, 0, 0]) {
            let a = derive(&set, cards[0], 0, (&concept.intent, 1), (&concept.modus, 2));
            let b = derive(&set, cards[1], 1, (&concept.extent, 0), (&concept.modus, 2));
            let c = derive(&set, cards[2], 2, (&concept.extent, 0), (&concept.intent, 1));
            prop_assert_eq!(&concept.extent, &a);
            prop_assert_eq!(&concept.intent, &b);
            prop_assert_eq!(&concept.modus, &c);
        }
    }

    /// Raising a support threshold filters the zero-support concept set and
    /// never invents new concepts.
    #[test]
    fn support_thresholds_filter_monotonically(
        triples in arb_triples(4, 24),
        min_u in 0u32..3,
        min_t in 0u32..3,
        min_r in 0u32..3,
    ) {
        let cards = [4, 4, 4];
        let unfiltered = mine(&triples, cards, [0, 0, 0]);
        let thresholded = mine(&triples, cards, [min_u, min_t, min_r]);
        let filtered: BTreeSet<TriConcept> = unfiltered
            .into_iter()
            .filter(|c| {
                c.extent.len() as u32 >= min_u
                    && c.intent.len() as u32 >= min_t
                    && c.modus.len() as u32 >= min_r
            })
            .collect();
        prop_assert_eq!(thresholded, filtered);
    }

    /// The emitted concept set does not depend on input row order.
    #[test]
    fn row_order_invariance(triples in arb_triples(4, 24), seed in any::<u64>()) {
        let cards = [4, 4, 4];
        let baseline = mine(&triples, cards, [1, 1, 1]);

        // cheap deterministic shuffle
        let mut permuted = triples;
        let mut state = seed | 1;
        for i in (1..permuted.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            permuted.swap(i, j);
        }
        prop_assert_eq!(mine(&permuted, cards, [1, 1, 1]), baseline);
    }

    /// Two runs of the same miner produce identical output sequences.
    #[test]
    fn repeated_runs_are_identical(triples in arb_triples(4, 24)) {
        let rel = Relation::new(triples, [4, 4, 4]).expect("relation");
        let miner = TriasMiner::new(rel, [1, 1, 1]).expect("miner");

        let mut first = VecWriter::new();
        miner.run(&mut first, &mut NoopProgress).expect("run");
        let mut second = VecWriter::new();
        miner.run(&mut second, &mut NoopProgress).expect("run");

        prop_assert_eq!(first.concepts, second.concepts);
    }
}
