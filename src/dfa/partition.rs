//! Table-filling computation of distinguishable state pairs.
//!
//! Two states are distinguishable if some word leads exactly one of them into an accepting
//! state. The algorithm first marks every pair disagreeing on acceptance of the empty word
//! and then repeatedly marks pairs with some symbol leading them into an already marked
//! pair, until a full sweep adds no mark. Marks only grow, and there are at most
//! `|Q|^2 / 2` of them, so the fixpoint is reached after at most that many sweeps.
//! Unmarked pairs of the fixpoint are exactly the Myhill-Nerode equivalent state pairs.

use bit_set::BitSet;
use log::debug;

use super::{Dfa, StateId};

/// A symmetric, irreflexive relation on states, stored as a strictly lower triangular bit
/// matrix. Pairs are unordered and a state is never related to itself.
pub(crate) struct PairTable {
    marked: BitSet,
}

impl PairTable {
    fn new(num_states: usize) -> Self {
        let pairs = num_states * num_states.saturating_sub(1) / 2;
        PairTable {
            marked: BitSet::with_capacity(pairs),
        }
    }

    /// Index of the unordered pair `{p, q}` in the triangular matrix.
    fn index(p: StateId, q: StateId) -> usize {
        debug_assert_ne!(p, q);
        let (lo, hi) = if p < q { (p, q) } else { (q, p) };
        hi * (hi - 1) / 2 + lo
    }

    fn mark(&mut self, p: StateId, q: StateId) {
        self.marked.insert(Self::index(p, q));
    }

    /// Whether the pair `{p, q}` is marked. Self pairs are never marked.
    pub(crate) fn is_marked(&self, p: StateId, q: StateId) -> bool {
        p != q && self.marked.contains(Self::index(p, q))
    }
}

/// Computes the distinguishable pairs among the states in `domain`.
///
/// The domain must be closed under transitions; callers pass either all states or the
/// reachable set, both of which are closed. Pairs outside the domain are never examined
/// and stay unmarked.
pub(crate) fn distinguishable_pairs(dfa: &Dfa, domain: &BitSet) -> PairTable {
    let mut table = PairTable::new(dfa.num_states());
    let states: Vec<StateId> = domain.iter().collect();

    // Base case: exactly one of the two states accepts the empty word.
    for (i, &q) in states.iter().enumerate() {
        for &p in &states[..i] {
            if dfa.is_accepting(p) != dfa.is_accepting(q) {
                table.mark(p, q);
            }
        }
    }

    // Propagate until a sweep adds no mark. A pair becomes marked as soon as one symbol
    // leads it into a marked pair; the remaining symbols need not be checked.
    let mut sweeps = 0;
    let mut changed = true;
    while changed {
        changed = false;
        sweeps += 1;
        for (i, &q) in states.iter().enumerate() {
            for &p in &states[..i] {
                if table.is_marked(p, q) {
                    continue;
                }
                for a in 0..dfa.alphabet().len() {
                    let (p1, q1) = (dfa.step(p, a), dfa.step(q, a));
                    if p1 != q1 && table.is_marked(p1, q1) {
                        table.mark(p, q);
                        changed = true;
                        break;
                    }
                }
            }
        }
    }
    debug!(
        "distinguishability fixpoint over {} states after {} sweep(s)",
        states.len(),
        sweeps
    );

    table
}

#[cfg(test)]
mod tests {

    use quickcheck_macros::quickcheck;

    use crate::alphabet::Alphabet;
    use crate::dfa::DfaBuilder;

    use super::*;

    fn counting_dfa() -> Dfa {
        // 0 -a-> 1 -a-> 2, accepting {2}; 2 is a sink.
        let mut builder = DfaBuilder::new(3, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(1, 'a', 2).unwrap();
        builder.add_transition(2, 'a', 2).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(2).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_pair_table_symmetric_and_irreflexive() {
        let mut table = PairTable::new(4);
        table.mark(3, 1);
        assert!(table.is_marked(1, 3));
        assert!(table.is_marked(3, 1));
        assert!(!table.is_marked(1, 2));
        assert!(!table.is_marked(2, 2));
    }

    #[test]
    fn test_base_case_marks_acceptance_disagreement() {
        let dfa = counting_dfa();
        let domain = dfa.states().collect();
        let table = distinguishable_pairs(&dfa, &domain);
        assert!(table.is_marked(0, 2));
        assert!(table.is_marked(1, 2));
    }

    #[test]
    fn test_propagation_marks_pair_with_distinguishing_word() {
        // "aa" leads 0 into the accepting sink but 1 out of it after "a" already.
        let dfa = counting_dfa();
        let domain = dfa.states().collect();
        let table = distinguishable_pairs(&dfa, &domain);
        assert!(table.is_marked(0, 1));
    }

    #[test]
    fn test_states_with_identical_rows_stay_unmarked() {
        // 0 and 1 have the same successor row and the same acceptance.
        let mut builder = DfaBuilder::new(4, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 2).unwrap();
        builder.add_transition(1, 'a', 2).unwrap();
        builder.add_transition(2, 'a', 3).unwrap();
        builder.add_transition(3, 'a', 3).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(2).unwrap();
        let dfa = builder.build().unwrap();

        let domain = dfa.states().collect();
        let table = distinguishable_pairs(&dfa, &domain);
        assert!(!table.is_marked(0, 1));
        assert!(table.is_marked(0, 2));
        assert!(table.is_marked(0, 3));
    }

    #[test]
    fn test_all_accepting_nothing_marked() {
        let mut builder = DfaBuilder::new(2, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(1, 'a', 0).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(0).unwrap();
        builder.add_accepting(1).unwrap();
        let dfa = builder.build().unwrap();

        let domain = dfa.states().collect();
        let table = distinguishable_pairs(&dfa, &domain);
        assert!(!table.is_marked(0, 1));
    }

    #[quickcheck]
    fn unmarked_pairs_are_closed_under_steps(dfa: Dfa) -> bool {
        let domain = dfa.states().collect();
        let table = distinguishable_pairs(&dfa, &domain);
        for q in dfa.states() {
            for p in 0..q {
                if table.is_marked(p, q) {
                    continue;
                }
                // Unmarked pairs agree on acceptance and step into unmarked pairs.
                if dfa.is_accepting(p) != dfa.is_accepting(q) {
                    return false;
                }
                for a in 0..dfa.alphabet().len() {
                    let (p1, q1) = (dfa.step(p, a), dfa.step(q, a));
                    if p1 != q1 && table.is_marked(p1, q1) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
