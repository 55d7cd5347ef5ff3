use std::collections::{BTreeMap, VecDeque};

use bit_set::BitSet;

use super::{Acceptor, StateIndex};
use crate::math::Bijection;

/// Type alias for a minimal representative of a state, which is its length-lexicographically
/// minimal access sequence of tokens together with the state index.
pub type MinimalRepresentative<'a> = (Vec<&'a str>, StateIndex);

/// Iterator over the minimal representatives of the states of an [`Acceptor`] that are
/// reachable from some origin. States are produced in breadth-first order, where the
/// successors of a state are explored in the order of their tokens.
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a> {
    acceptor: &'a Acceptor,
    seen: BitSet,
    queue: VecDeque<MinimalRepresentative<'a>>,
}

impl<'a> MinimalRepresentatives<'a> {
    /// Starts the exploration in `origin`.
    pub fn new(acceptor: &'a Acceptor, origin: StateIndex) -> Self {
        let mut seen = BitSet::with_capacity(acceptor.size());
        seen.insert(origin);
        Self {
            acceptor,
            seen,
            queue: VecDeque::from([(vec![], origin)]),
        }
    }
}

impl<'a> Iterator for MinimalRepresentatives<'a> {
    type Item = MinimalRepresentative<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (access, q) = self.queue.pop_front()?;
        let acceptor = self.acceptor;
        for (token, &p) in &acceptor.transitions[q] {
            if self.seen.insert(p) {
                let mut extended = access.clone();
                extended.push(token.as_str());
                self.queue.push_back((extended, p));
            }
        }
        Some((access, q))
    }
}

impl Acceptor {
    /// Returns the minimal representatives of all states reachable from the initial state.
    pub fn minimal_representatives(&self) -> MinimalRepresentatives<'_> {
        MinimalRepresentatives::new(self, self.initial)
    }

    /// Iterates over the states that are reachable from the initial state, in the order
    /// in which a breadth-first search that explores tokens in ascending order finds them.
    pub fn reachable_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.minimal_representatives().map(|(_, q)| q)
    }

    /// Computes the set of states from which some accepting state can be reached.
    pub fn productive_states(&self) -> BitSet {
        let mut predecessors = vec![vec![]; self.size()];
        for t in self.transitions() {
            predecessors[t.target].push(t.source);
        }
        let mut productive: BitSet = self.accepting.clone();
        let mut queue: VecDeque<_> = self.accepting.iter().collect();
        while let Some(q) = queue.pop_front() {
            for &p in &predecessors[q] {
                if productive.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        productive
    }

    /// Restricts `self` to the states that are reachable from the initial state and from
    /// which an accepting state can be reached. The initial state is always kept, even if
    /// the accepted language is empty. The remaining states are renumbered in breadth-first
    /// order, see [`Acceptor::canonical`].
    pub fn trim(&self) -> Acceptor {
        let productive = self.productive_states();
        self.restrict_renumbered(|q| productive.contains(q))
    }

    /// Returns an acceptor for the same language in which the states reachable from the
    /// initial state are numbered in the order of a breadth-first search that explores
    /// tokens in ascending order. Unreachable states are dropped. Two acceptors that are
    /// isomorphic on their reachable part yield equal results.
    pub fn canonical(&self) -> Acceptor {
        self.restrict_renumbered(|_| true)
    }

    /// Keeps the initial state and every reachable state satisfying `keep`, along with the
    /// transitions between them. A transition into the initial state is only kept if
    /// `keep` holds for it.
    fn restrict_renumbered<F: Fn(StateIndex) -> bool>(&self, keep: F) -> Acceptor {
        let mut renumbering: Bijection<StateIndex, StateIndex> = Bijection::new();
        let mut queue = VecDeque::from([self.initial]);
        renumbering.insert(self.initial, 0);
        while let Some(q) = queue.pop_front() {
            for (_, &p) in &self.transitions[q] {
                if keep(p) && !renumbering.contains_left(&p) {
                    renumbering.insert(p, renumbering.len());
                    queue.push_back(p);
                }
            }
        }

        let transitions = (0..renumbering.len())
            .map(|new| {
                let old = *renumbering
                    .get_by_right(&new)
                    .expect("renumbering is a bijection onto 0..len");
                self.transitions[old]
                    .iter()
                    .filter(|(_, p)| keep(**p))
                    .filter_map(|(token, p)| {
                        renumbering
                            .get_by_left(p)
                            .map(|target| (token.clone(), *target))
                    })
                    .collect::<BTreeMap<_, _>>()
            })
            .collect();
        let accepting = self
            .accepting
            .iter()
            .filter_map(|q| renumbering.get_by_left(&q).copied())
            .collect();
        Acceptor::from_parts(transitions, accepting, 0)
    }
}
