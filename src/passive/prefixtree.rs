use std::collections::BTreeMap;

use bit_set::BitSet;
use tracing::{trace, warn};

use super::Sample;
use crate::acceptor::{Acceptor, StateIndex};

/// Builds the prefix tree acceptor of `sample`. Its states are the distinct prefixes
/// of the sample words, numbered in the order in which they are created while
/// inserting the words in ascending order, with the root (the empty prefix) being
/// state `0` and initial. A state is accepting if and only if it is reached by a
/// complete sample word.
///
/// For an empty sample this returns the acceptor with a single, non-accepting state
/// and emits a warning, as its language is empty.
pub fn prefix_tree(sample: &Sample) -> Acceptor {
    if sample.is_empty() {
        warn!("sample is empty, the prefix tree accepts no word");
    }

    let mut transitions = vec![BTreeMap::new()];
    let mut accepting = BitSet::new();
    for word in sample.words() {
        let mut current: StateIndex = 0;
        for token in word {
            current = match transitions[current].get(token).copied() {
                Some(next) => next,
                None => {
                    let next = transitions.len();
                    trace!("adding state {next} for {:?}", token);
                    transitions.push(BTreeMap::new());
                    transitions[current].insert(token.clone(), next);
                    next
                }
            };
        }
        accepting.insert(current);
    }

    Acceptor::from_parts(transitions, accepting, 0)
}
