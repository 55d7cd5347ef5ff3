use std::collections::{BTreeMap, BTreeSet};

use bit_set::BitSet;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    acceptor::{Acceptor, StateIndex},
    alphabet::Token,
    math::Partition,
};

/// Errors raised while projecting an acceptor through a [`Partition`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum QuotientError {
    /// The partition does not cover exactly the states of the acceptor.
    #[error("partition over {universe} states cannot be applied to an acceptor with {size} states")]
    UniverseMismatch {
        /// Number of states the partition covers.
        universe: usize,
        /// Number of states of the acceptor.
        size: usize,
    },
    /// After merging, some class has more than one successor on a token.
    #[error("class {class} has {} successors on token {token:?}", .targets.len())]
    Nondeterministic {
        /// The class with multiple successors.
        class: StateIndex,
        /// The token on which the successors are reached.
        token: Token,
        /// All successor classes.
        targets: Vec<StateIndex>,
    },
}

/// A quotient takes an acceptor and merges states that lie in the same block of some
/// [`Partition`]. The states of the quotient are the block indices as given by
/// [`Partition::block_indices`], so class `0` always contains state `0` of the
/// underlying acceptor.
///
/// There is an edge from class `X` to class `Y` on a token if some state in `X` has
/// such an edge to some state in `Y`. As the partition need not be a congruence, a
/// class may have several successors on the same token. A [`Quotient`] keeps all of
/// them, which is what inference uses to detect nondeterminism that merging
/// introduced. [`Quotient::into_acceptor`] turns a deterministic quotient into an
/// [`Acceptor`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Quotient {
    edges: Vec<BTreeMap<Token, BTreeSet<StateIndex>>>,
    accepting: BTreeSet<StateIndex>,
    initial: StateIndex,
    representatives: Vec<StateIndex>,
}

impl Quotient {
    /// Projects `acceptor` through `partition`. Fails if the partition is not over the
    /// states of `acceptor`.
    pub fn new(acceptor: &Acceptor, partition: &Partition) -> Result<Self, QuotientError> {
        if partition.universe() != acceptor.size() {
            return Err(QuotientError::UniverseMismatch {
                universe: partition.universe(),
                size: acceptor.size(),
            });
        }

        let class_of = partition.block_indices();
        let mut representatives = vec![StateIndex::MAX; partition.len()];
        for (q, &class) in class_of.iter().enumerate().rev() {
            representatives[class] = q;
        }

        let mut edges = vec![BTreeMap::<Token, BTreeSet<StateIndex>>::new(); partition.len()];
        for t in acceptor.transitions() {
            edges[class_of[t.source]]
                .entry(t.token.to_string())
                .or_default()
                .insert(class_of[t.target]);
        }

        Ok(Self {
            edges,
            accepting: acceptor.accepting_states().map(|q| class_of[q]).collect(),
            initial: class_of[acceptor.initial()],
            representatives,
        })
    }

    /// The number of classes.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// The class containing the initial state of the underlying acceptor.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns true if `class` contains an accepting state of the underlying acceptor.
    pub fn is_accepting(&self, class: StateIndex) -> bool {
        self.accepting.contains(&class)
    }

    /// The smallest state of the underlying acceptor that lies in `class`. Panics if
    /// the class does not exist.
    pub fn representative(&self, class: StateIndex) -> StateIndex {
        self.representatives[class]
    }

    /// Iterates over all edges as `(source, token, target)`, ordered by source, token and
    /// target. Parallel edges that arise from merging are only reported once.
    pub fn edges(&self) -> impl Iterator<Item = (StateIndex, &str, StateIndex)> + '_ {
        self.edges.iter().enumerate().flat_map(|(source, map)| {
            map.iter().flat_map(move |(token, targets)| {
                targets
                    .iter()
                    .map(move |&target| (source, token.as_str(), target))
            })
        })
    }

    /// Returns the successors of `class` on `token`.
    pub fn successors(&self, class: StateIndex, token: &str) -> Option<&BTreeSet<StateIndex>> {
        self.edges.get(class)?.get(token)
    }

    /// Finds the first pair of state and token (in ascending order) for which more than one
    /// successor exists.
    pub fn first_nondeterminism(&self) -> Option<(StateIndex, &str, &BTreeSet<StateIndex>)> {
        self.edges.iter().enumerate().find_map(|(class, map)| {
            map.iter()
                .find(|(_, targets)| targets.len() > 1)
                .map(|(token, targets)| (class, token.as_str(), targets))
        })
    }

    /// Returns true if every class has at most one successor on every token.
    pub fn is_deterministic(&self) -> bool {
        self.first_nondeterminism().is_none()
    }

    /// Collects `self` into an [`Acceptor`], which fails if the quotient is not deterministic.
    pub fn into_acceptor(self) -> Result<Acceptor, QuotientError> {
        if let Some((class, token, targets)) = self.first_nondeterminism() {
            return Err(QuotientError::Nondeterministic {
                class,
                token: token.to_string(),
                targets: targets.iter().copied().collect_vec(),
            });
        }
        let transitions = self
            .edges
            .into_iter()
            .map(|map| {
                map.into_iter()
                    .filter_map(|(token, targets)| targets.first().map(|&q| (token, q)))
                    .collect()
            })
            .collect();
        Ok(Acceptor::from_parts(
            transitions,
            self.accepting.iter().copied().collect::<BitSet>(),
            self.initial,
        ))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{Quotient, QuotientError};
    use crate::{math::Partition, prelude::*, tests::wiki_acceptor};

    #[test]
    fn quotient_of_congruence() {
        let dfa = wiki_acceptor();
        let p = Partition::from_blocks(6, [vec![0, 1], vec![5], vec![2, 3, 4]]).unwrap();
        let q = Quotient::new(&dfa, &p).unwrap();
        assert!(q.is_deterministic());
        assert_eq!(q.size(), 3);
        let a = q.into_acceptor().unwrap();

        // blocks are numbered by their smallest element: {0, 1} -> 0, {2, 3, 4} -> 1, {5} -> 2
        for (class, token, target) in [
            (0, "a", 0),
            (0, "b", 1),
            (1, "a", 1),
            (1, "b", 2),
            (2, "a", 2),
            (2, "b", 2),
        ] {
            assert_eq!(a.successor(class, token), Some(target));
        }
        assert_eq!(a.accepting_states().collect_vec(), vec![1]);
        assert_eq!(a.initial(), 0);
        assert!(a.accepts("b a a"));
    }

    #[test]
    fn merging_can_introduce_nondeterminism() {
        let acceptor = Acceptor::builder()
            .with_edges([(0, "a", 1), (2, "a", 3)])
            .with_accepting([1, 3])
            .into_acceptor(0)
            .unwrap();
        let p = Partition::from_blocks(4, [vec![0, 2], vec![1], vec![3]]).unwrap();
        let q = Quotient::new(&acceptor, &p).unwrap();
        assert_eq!(q.edges().collect_vec(), vec![(0, "a", 1), (0, "a", 2)]);
        assert_eq!(q.representative(2), 3);
        assert_eq!(
            q.into_acceptor(),
            Err(QuotientError::Nondeterministic {
                class: 0,
                token: "a".into(),
                targets: vec![1, 2]
            })
        );
    }

    #[test]
    fn parallel_edges_collapse() {
        let acceptor = Acceptor::builder()
            .with_edges([(0, "a", 1), (0, "b", 2), (1, "c", 3), (2, "c", 3)])
            .with_accepting([3])
            .into_acceptor(0)
            .unwrap();
        let p = Partition::from_blocks(4, [vec![0], vec![1, 2], vec![3]]).unwrap();
        let q = Quotient::new(&acceptor, &p).unwrap();
        assert_eq!(
            q.edges().collect_vec(),
            vec![(0, "a", 1), (0, "b", 1), (1, "c", 2)]
        );
        assert!(q.is_accepting(2));
        assert!(!q.is_accepting(1));
    }

    #[test]
    fn partition_must_match_acceptor() {
        let p = Partition::trivial(3);
        assert_eq!(
            Quotient::new(&wiki_acceptor(), &p),
            Err(QuotientError::UniverseMismatch {
                universe: 3,
                size: 6
            })
        );
    }
}
