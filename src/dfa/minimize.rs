//! Minimization of complete deterministic finite automata.
//!
//! The minimal automaton is the quotient of the input under Myhill-Nerode equivalence:
//! pairwise indistinguishable states form a class, and every class becomes one state of
//! the result. Distinguishability is computed by table filling, reachability pruning is
//! governed by [MinimizeConfig]. The result is again complete, accepts the same language,
//! and no two of its states are equivalent.

use bit_set::BitSet;
use log::debug;

use super::partition::{distinguishable_pairs, PairTable};
use super::reach::reachable;
use super::{Dfa, StateId};

/// Options controlling [minimize_with].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimizeConfig {
    /// Drop states that are unreachable from the start state before comparing states.
    /// With pruning, no unreachable state appears in the result. Without it, unreachable
    /// states take part in the equivalence like any other state: they end up in the
    /// result, merged with equivalent states where possible. The accepted language is the
    /// same either way.
    pub prune_unreachable: bool,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        MinimizeConfig {
            prune_unreachable: true,
        }
    }
}

/// Computes the minimal complete automaton accepting the same language.
///
/// Equivalent to [minimize_with] with the default configuration, which prunes unreachable
/// states. The result has the least number of states among all complete automata for the
/// language, and minimizing it again yields an identical automaton.
///
/// # Example
/// ```
/// use dfa_min::{minimize, Alphabet, DfaBuilder};
///
/// // States 1 and 2 both accept exactly the nonempty words, so they are merged.
/// let mut builder = DfaBuilder::new(4, Alphabet::new(['a', 'b']).unwrap());
/// builder.add_transition(0, 'a', 1).unwrap();
/// builder.add_transition(0, 'b', 2).unwrap();
/// for q in [1, 2, 3] {
///     builder.add_transition(q, 'a', 3).unwrap();
///     builder.add_transition(q, 'b', 3).unwrap();
/// }
/// builder.set_start(0).unwrap();
/// builder.add_accepting(3).unwrap();
/// let dfa = builder.build().unwrap();
///
/// let min = minimize(&dfa);
/// assert_eq!(min.num_states(), 3);
/// assert!(min.accepts("ab"));
/// assert!(!min.accepts("a"));
/// ```
pub fn minimize(dfa: &Dfa) -> Dfa {
    minimize_with(dfa, MinimizeConfig::default())
}

/// Computes the quotient automaton under Myhill-Nerode equivalence with the given
/// configuration.
///
/// Runs in three stages: determine the states to keep, mark all distinguishable pairs
/// among them, and collapse the unmarked classes into single states. State ids of the
/// result are dense and ordered by the lowest original id in each class; the class of the
/// original start state becomes the new start state.
///
/// # Example
/// ```
/// use dfa_min::{minimize_with, Alphabet, DfaBuilder, MinimizeConfig};
///
/// // State 2 cannot be reached from the start state.
/// let mut builder = DfaBuilder::new(3, Alphabet::new(['a']).unwrap());
/// builder.add_transition(0, 'a', 1).unwrap();
/// builder.add_transition(1, 'a', 0).unwrap();
/// builder.add_transition(2, 'a', 0).unwrap();
/// builder.set_start(0).unwrap();
/// builder.add_accepting(1).unwrap();
/// let dfa = builder.build().unwrap();
///
/// let pruned = minimize_with(&dfa, MinimizeConfig::default());
/// assert_eq!(pruned.num_states(), 2);
///
/// let kept = minimize_with(&dfa, MinimizeConfig { prune_unreachable: false });
/// assert_eq!(kept.num_states(), 3);
/// ```
pub fn minimize_with(dfa: &Dfa, config: MinimizeConfig) -> Dfa {
    let domain = if config.prune_unreachable {
        reachable(dfa)
    } else {
        dfa.states().collect()
    };
    let table = distinguishable_pairs(dfa, &domain);
    quotient(dfa, &domain, &table)
}

/// Collapses every class of mutually unmarked states into a single state.
fn quotient(dfa: &Dfa, domain: &BitSet, table: &PairTable) -> Dfa {
    let states: Vec<StateId> = domain.iter().collect();

    // The lowest state of each class claims it and serves as its representative.
    // Classes are numbered in claiming order, so the new ids are dense and follow the
    // order of the original ids.
    let mut class_of: Vec<Option<usize>> = vec![None; dfa.num_states()];
    let mut reps: Vec<StateId> = Vec::new();
    for (i, &p) in states.iter().enumerate() {
        if class_of[p].is_some() {
            continue;
        }
        let class = reps.len();
        reps.push(p);
        class_of[p] = Some(class);
        for &q in &states[i + 1..] {
            if class_of[q].is_none() && !table.is_marked(p, q) {
                class_of[q] = Some(class);
            }
        }
    }
    debug!(
        "quotient collapses {} states into {} classes",
        states.len(),
        reps.len()
    );

    let stride = dfa.alphabet().len();
    let mut trans = Vec::with_capacity(reps.len() * stride);
    for &rep in &reps {
        for a in 0..stride {
            // Safe to unwrap because the domain is closed under transitions, so every
            // successor of a representative has a class.
            trans.push(class_of[dfa.step(rep, a)].unwrap());
        }
    }

    let mut accepting = BitSet::with_capacity(reps.len());
    for (class, &rep) in reps.iter().enumerate() {
        // All members of a class agree on acceptance, so the representative decides.
        if dfa.is_accepting(rep) {
            accepting.insert(class);
        }
    }

    // Safe to unwrap because the start state is in the domain under either configuration.
    let start = class_of[dfa.start()].unwrap();

    Dfa {
        num_states: reps.len(),
        alphabet: dfa.alphabet().clone(),
        trans,
        start,
        accepting,
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck_macros::quickcheck;
    use rand::Rng;

    use crate::alphabet::Alphabet;
    use crate::dfa::DfaBuilder;

    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// All words over the alphabet up to the given length, including the empty word.
    fn words_up_to(alphabet: &Alphabet, max_len: usize) -> Vec<String> {
        let symbols: Vec<char> = alphabet.iter().collect();
        let mut words = vec![String::new()];
        for len in 1..=max_len {
            words.extend(
                itertools::repeat_n(symbols.iter().copied(), len)
                    .multi_cartesian_product()
                    .map(|chars| chars.into_iter().collect::<String>()),
            );
        }
        words
    }

    #[test]
    fn test_merges_states_with_identical_behavior() {
        init_logger();
        // States 0 and 1 behave identically; 2 is an accepting sink, 3 a dead state.
        let mut builder = DfaBuilder::new(4, Alphabet::new(['0', '1']).unwrap());
        builder.add_transition(0, '0', 3).unwrap();
        builder.add_transition(0, '1', 2).unwrap();
        builder.add_transition(1, '0', 3).unwrap();
        builder.add_transition(1, '1', 2).unwrap();
        builder.add_transition(2, '0', 2).unwrap();
        builder.add_transition(2, '1', 2).unwrap();
        builder.add_transition(3, '0', 3).unwrap();
        builder.add_transition(3, '1', 3).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(2).unwrap();
        let dfa = builder.build().unwrap();

        let min = minimize_with(
            &dfa,
            MinimizeConfig {
                prune_unreachable: false,
            },
        );
        // Classes numbered by their lowest member: {0, 1} -> 0, {2} -> 1, {3} -> 2.
        assert_eq!(min.num_states(), 3);
        assert_eq!(min.start(), 0);
        assert_eq!(min.accepting().collect::<Vec<_>>(), vec![1]);
        assert_eq!(min.successor(0, '0'), Ok(2));
        assert_eq!(min.successor(0, '1'), Ok(1));
        assert_eq!(min.successor(1, '0'), Ok(1));
        assert_eq!(min.successor(1, '1'), Ok(1));
        assert_eq!(min.successor(2, '0'), Ok(2));
    }

    #[test]
    fn test_all_accepting_collapses_to_universal_acceptor() {
        let mut builder = DfaBuilder::new(3, Alphabet::new(['a', 'b']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(0, 'b', 2).unwrap();
        builder.add_transition(1, 'a', 2).unwrap();
        builder.add_transition(1, 'b', 0).unwrap();
        builder.add_transition(2, 'a', 0).unwrap();
        builder.add_transition(2, 'b', 1).unwrap();
        builder.set_start(0).unwrap();
        for q in 0..3 {
            builder.add_accepting(q).unwrap();
        }
        let dfa = builder.build().unwrap();

        let min = minimize(&dfa);
        assert_eq!(min.num_states(), 1);
        assert_eq!(min.start(), 0);
        assert!(min.is_accepting(0));
        assert_eq!(min.successor(0, 'a'), Ok(0));
        assert_eq!(min.successor(0, 'b'), Ok(0));
        assert!(min.accepts(""));
        assert!(min.accepts("abba"));
    }

    #[test]
    fn test_single_state_already_minimal() {
        let mut builder = DfaBuilder::new(1, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 0).unwrap();
        builder.set_start(0).unwrap();
        let dfa = builder.build().unwrap();

        assert_eq!(minimize(&dfa), dfa);
    }

    #[test]
    fn test_distinct_states_is_a_fixpoint() {
        // 0 -a-> 1 -a-> 2, with 2 an accepting sink. No two states are equivalent.
        let mut builder = DfaBuilder::new(3, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(1, 'a', 2).unwrap();
        builder.add_transition(2, 'a', 2).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(2).unwrap();
        let dfa = builder.build().unwrap();

        assert_eq!(minimize(&dfa), dfa);
    }

    #[test]
    fn test_unreachable_state_pruned_or_kept() {
        init_logger();
        // State 2 is unreachable and not equivalent to any reachable state.
        let mut builder = DfaBuilder::new(3, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(1, 'a', 0).unwrap();
        builder.add_transition(2, 'a', 0).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(1).unwrap();
        let dfa = builder.build().unwrap();

        let pruned = minimize(&dfa);
        assert_eq!(pruned.num_states(), 2);
        assert!(!pruned.accepts(""));
        assert!(pruned.accepts("a"));
        assert!(!pruned.accepts("aa"));

        let kept = minimize_with(
            &dfa,
            MinimizeConfig {
                prune_unreachable: false,
            },
        );
        assert_eq!(kept.num_states(), 3);
        assert!(kept.accepts("a"));
        assert!(!kept.accepts("aa"));
    }

    #[test]
    fn test_unreachable_state_merges_when_equivalent() {
        // State 2 is unreachable but behaves exactly like state 1.
        let mut builder = DfaBuilder::new(3, Alphabet::new(['a']).unwrap());
        builder.add_transition(0, 'a', 1).unwrap();
        builder.add_transition(1, 'a', 0).unwrap();
        builder.add_transition(2, 'a', 0).unwrap();
        builder.set_start(0).unwrap();
        builder.add_accepting(1).unwrap();
        builder.add_accepting(2).unwrap();
        let dfa = builder.build().unwrap();

        let kept = minimize_with(
            &dfa,
            MinimizeConfig {
                prune_unreachable: false,
            },
        );
        assert_eq!(kept.num_states(), 2);
        assert_eq!(kept.accepting().collect::<Vec<_>>(), vec![1]);
    }

    #[quickcheck]
    fn minimization_is_idempotent(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        minimize(&min) == min
    }

    #[quickcheck]
    fn minimization_preserves_language_on_short_words(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        words_up_to(dfa.alphabet(), 4)
            .iter()
            .all(|w| dfa.accepts(w) == min.accepts(w))
    }

    #[quickcheck]
    fn minimization_preserves_language_on_random_words(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        let symbols: Vec<char> = dfa.alphabet().iter().collect();
        let mut rng = rand::rng();
        for _ in 0..32 {
            let len = rng.random_range(0..64);
            let word: String = (0..len)
                .map(|_| symbols[rng.random_range(0..symbols.len())])
                .collect();
            if dfa.accepts(&word) != min.accepts(&word) {
                return false;
            }
        }
        true
    }

    #[quickcheck]
    fn keeping_unreachable_states_preserves_language(dfa: Dfa) -> bool {
        let kept = minimize_with(
            &dfa,
            MinimizeConfig {
                prune_unreachable: false,
            },
        );
        words_up_to(dfa.alphabet(), 4)
            .iter()
            .all(|w| dfa.accepts(w) == kept.accepts(w))
    }

    #[quickcheck]
    fn minimized_automaton_has_no_equivalent_pair(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        let domain = min.states().collect();
        let table = distinguishable_pairs(&min, &domain);
        min.states().all(|q| (0..q).all(|p| table.is_marked(p, q)))
    }

    #[quickcheck]
    fn pruned_result_has_only_reachable_states(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        reachable(&min).len() == min.num_states()
    }

    #[quickcheck]
    fn minimized_automaton_is_complete(dfa: Dfa) -> bool {
        let min = minimize(&dfa);
        min.alphabet() == dfa.alphabet()
            && min
                .states()
                .all(|q| min.alphabet().iter().all(|sym| min.successor(q, sym).is_ok()))
    }

    #[quickcheck]
    fn keeping_unreachable_states_never_shrinks_below_pruned(dfa: Dfa) -> bool {
        let kept = minimize_with(
            &dfa,
            MinimizeConfig {
                prune_unreachable: false,
            },
        );
        let pruned = minimize(&dfa);
        pruned.num_states() <= kept.num_states() && kept.num_states() <= dfa.num_states()
    }
}
