use std::hash::Hash;

use itertools::Itertools;
use tracing::trace;

use crate::{
    acceptor::Acceptor,
    alphabet::Alphabet,
    math::{Map, Partition},
};

/// Numbers the distinct values in order of their first occurrence. Returns the number
/// assigned to every position together with the number of distinct values.
fn number_by_first_occurrence<T: Eq + Hash>(values: &[T]) -> (Vec<usize>, usize) {
    let mut seen: Map<&T, usize> = Map::default();
    let numbers = values
        .iter()
        .map(|value| {
            let next = seen.len();
            *seen.entry(value).or_insert(next)
        })
        .collect_vec();
    (numbers, seen.len())
}

/// Computes the coarsest partition of the states of `acceptor` that separates accepting
/// from rejecting states and is compatible with the transitions on every token of
/// `alphabet`, a missing transition being distinct from all present ones.
///
/// Starting from the split into accepting and rejecting states, each round assigns to
/// every state the signature made up of its current class and the classes of its
/// successors. States with the same signature stay together. As signatures contain the
/// current class, classes are only ever split, and the refinement is stable once a round
/// does not increase the number of classes.
pub fn moore_partition_refinement(acceptor: &Acceptor, alphabet: &Alphabet) -> Partition {
    let colors = acceptor
        .states()
        .map(|q| acceptor.is_accepting(q))
        .collect_vec();
    let (mut classes, mut count) = number_by_first_occurrence(&colors);

    let mut rounds = 0;
    loop {
        let signatures = acceptor
            .states()
            .map(|q| {
                let successors = alphabet
                    .universe()
                    .map(|token| acceptor.successor(q, token).map(|p| classes[p]))
                    .collect_vec();
                (classes[q], successors)
            })
            .collect_vec();
        let (refined, refined_count) = number_by_first_occurrence(&signatures);
        rounds += 1;
        if refined_count == count {
            break;
        }
        classes = refined;
        count = refined_count;
    }

    trace!("partition refinement stabilized with {count} classes after {rounds} rounds");
    Partition::from_classes(&classes)
}
