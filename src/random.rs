use std::collections::BTreeMap;

use bit_set::BitSet;
use fastrand::Rng;
use itertools::Itertools;
use tracing::debug;

use crate::acceptor::{Acceptor, StateIndex};

/// Probability with which [`random_acceptor`] inserts a transition for a pair of state and token.
pub const TRANSITION_PROBABILITY: f64 = 0.8;

/// Generates a random acceptor with `size` states over `tokens`, where state `0` is initial.
/// The algorithm is as follows:
/// 1. Start with `size` states and no transitions.
/// 2. For each state and token, with probability [`TRANSITION_PROBABILITY`] draw a target
///    uniformly and add the corresponding transition.
/// 3. Make every state accepting with probability one half.
///
/// The same `seed` always gives the same acceptor. Depending on the drawn transitions,
/// some states may be unreachable.
pub fn random_acceptor(tokens: &[&str], size: usize, seed: u64) -> Acceptor {
    let size = size.max(1);
    let mut rng = Rng::with_seed(seed);
    let mut transitions = vec![BTreeMap::<_, StateIndex>::new(); size];
    for map in &mut transitions {
        for token in tokens {
            if rng.f64() < TRANSITION_PROBABILITY {
                map.insert(token.to_string(), rng.usize(..size));
            }
        }
    }
    let accepting: BitSet = (0..size).filter(|_| rng.bool()).collect();
    debug!(
        "drew random acceptor with {size} states and {} accepting states",
        accepting.len()
    );
    Acceptor::from_parts(transitions, accepting, 0)
}

/// Draws `words` strings, each consisting of between one and `max_len` tokens that are
/// picked uniformly from `tokens` and separated by a single space. Gives back an empty
/// vector if there are no tokens or `max_len` is zero.
pub fn random_sample(tokens: &[&str], words: usize, max_len: usize, seed: u64) -> Vec<String> {
    if tokens.is_empty() || max_len == 0 {
        return vec![];
    }
    let mut rng = Rng::with_seed(seed);
    (0..words)
        .map(|_| {
            let len = rng.usize(1..=max_len);
            (0..len)
                .map(|_| tokens[rng.usize(..tokens.len())])
                .join(" ")
        })
        .collect()
}
