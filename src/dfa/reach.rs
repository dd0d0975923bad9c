//! Reachability analysis.
//!
//! A state is reachable if some word, including the empty word, leads the automaton from
//! the start state to it. Unreachable states never influence the accepted language, so
//! minimization usually drops them before comparing states.

use std::collections::VecDeque;

use bit_set::BitSet;

use super::Dfa;

/// Returns the set of states reachable from the start state.
///
/// The start state is always reachable. Runs a breadth-first search over the transition
/// table in **O(|Q| * |Σ|)** time; every state is enqueued at most once.
pub fn reachable(dfa: &Dfa) -> BitSet {
    let mut visited = BitSet::with_capacity(dfa.num_states());
    if dfa.num_states() == 0 {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.insert(dfa.start());
    queue.push_back(dfa.start());

    while let Some(q) = queue.pop_front() {
        for a in 0..dfa.alphabet().len() {
            let dest = dfa.step(q, a);
            if visited.insert(dest) {
                // Insert returns true if newly inserted
                queue.push_back(dest);
            }
        }
    }

    visited
}
