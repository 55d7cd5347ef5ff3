use std::collections::BTreeMap;

use bit_set::BitSet;
use itertools::Itertools;
use owo_colors::OwoColorize;
use thiserror::Error;

use crate::alphabet::{tokenize, Alphabet, Token};

/// Contains [`AcceptorBuilder`], which allows assembling an [`Acceptor`] from a list of edges.
pub mod builder;
pub use builder::AcceptorBuilder;

/// Reachability, trimming and canonical renumbering of acceptors.
pub mod reachable;

/// Export of acceptors to the graphviz DOT format.
pub mod dot;

/// States of an [`Acceptor`] are identified by indices `0..size`. Beyond identity, an
/// index carries no meaning.
pub type StateIndex = usize;

/// Errors that are raised when the components of an [`Acceptor`] are inconsistent.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AcceptorError {
    /// Some referenced state does not exist.
    #[error("state {state} does not exist in an acceptor with {size} states")]
    UnknownState {
        /// The referenced state.
        state: StateIndex,
        /// Number of states of the acceptor.
        size: usize,
    },
    /// Two edges leave the same state on the same token but lead to different targets.
    #[error("state {state} has transitions to both {first} and {second} on token {token:?}")]
    Nondeterministic {
        /// Origin of the conflicting edges.
        state: StateIndex,
        /// The token on which both edges are taken.
        token: Token,
        /// The first target.
        first: StateIndex,
        /// The second target.
        second: StateIndex,
    },
}

/// A deterministic finite acceptor over tokens.
///
/// For every state we store an ordered map from tokens to successors, so there is at
/// most one transition for every pair of state and token. Transitions may be missing,
/// in which case a run that attempts to take it fails and the word is rejected.
/// An acceptor is never modified in place, operations such as quotients and
/// minimization produce new values.
#[derive(Debug, Clone)]
pub struct Acceptor {
    transitions: Vec<BTreeMap<Token, StateIndex>>,
    accepting: BitSet,
    initial: StateIndex,
}

/// A transition of an [`Acceptor`], the token is borrowed from the acceptor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Transition<'a> {
    /// The state in which the transition originates.
    pub source: StateIndex,
    /// The token labelling the transition.
    pub token: &'a str,
    /// The state that is reached.
    pub target: StateIndex,
}

impl Acceptor {
    /// Creates a new acceptor with `size` states from the given edges, accepting states and
    /// initial state. Fails if a state is out of range or if the edges are not
    /// deterministic. Duplicate edges (with equal target) are collapsed.
    pub fn new<T, E, F>(
        size: usize,
        edges: E,
        accepting: F,
        initial: StateIndex,
    ) -> Result<Self, AcceptorError>
    where
        T: Into<Token>,
        E: IntoIterator<Item = (StateIndex, T, StateIndex)>,
        F: IntoIterator<Item = StateIndex>,
    {
        let check = |state: StateIndex| {
            if state < size {
                Ok(state)
            } else {
                Err(AcceptorError::UnknownState { state, size })
            }
        };

        let mut transitions = vec![BTreeMap::new(); size];
        for (source, token, target) in edges {
            let (source, target) = (check(source)?, check(target)?);
            let token = token.into();
            match transitions[source].get(&token) {
                Some(&existing) if existing != target => {
                    return Err(AcceptorError::Nondeterministic {
                        state: source,
                        token,
                        first: existing,
                        second: target,
                    })
                }
                Some(_) => {}
                None => {
                    transitions[source].insert(token, target);
                }
            }
        }

        let accepting = accepting
            .into_iter()
            .map(check)
            .collect::<Result<BitSet, _>>()?;

        Ok(Self {
            transitions,
            accepting,
            initial: check(initial)?,
        })
    }

    /// Assembles an acceptor from parts that are already known to be consistent.
    pub(crate) fn from_parts(
        transitions: Vec<BTreeMap<Token, StateIndex>>,
        accepting: BitSet,
        initial: StateIndex,
    ) -> Self {
        debug_assert!(initial < transitions.len());
        debug_assert!(accepting.iter().all(|q| q < transitions.len()));
        debug_assert!(transitions
            .iter()
            .all(|map| map.values().all(|q| *q < transitions.len())));
        Self {
            transitions,
            accepting,
            initial,
        }
    }

    /// Gives an instance of [`AcceptorBuilder`].
    pub fn builder() -> AcceptorBuilder {
        AcceptorBuilder::default()
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.transitions.len()
    }

    /// Iterates over all state indices.
    pub fn states(&self) -> std::ops::Range<StateIndex> {
        0..self.size()
    }

    /// The designated initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns true if `state` is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(state)
    }

    /// Iterates over the accepting states in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter()
    }

    /// Returns the successor of `state` on `token`, if such a transition exists.
    pub fn successor(&self, state: StateIndex, token: &str) -> Option<StateIndex> {
        self.transitions.get(state)?.get(token).copied()
    }

    /// Iterates over the transitions leaving `state`, ordered by their token. Returns
    /// `None` if the state does not exist.
    pub fn edges_from(&self, state: StateIndex) -> Option<impl Iterator<Item = Transition<'_>>> {
        self.transitions.get(state).map(move |map| {
            map.iter().map(move |(token, &target)| Transition {
                source: state,
                token,
                target,
            })
        })
    }

    /// Iterates over all transitions, ordered by source state and then by token.
    pub fn transitions(&self) -> impl Iterator<Item = Transition<'_>> + '_ {
        self.transitions
            .iter()
            .enumerate()
            .flat_map(|(source, map)| {
                map.iter().map(move |(token, &target)| Transition {
                    source,
                    token,
                    target,
                })
            })
    }

    /// Returns the number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.iter().map(BTreeMap::len).sum()
    }

    /// The tokens that label at least one transition.
    pub fn tokens(&self) -> Alphabet {
        Alphabet::new(self.transitions().map(|t| t.token.to_string()))
    }

    /// Runs the given sequence of tokens from the initial state and returns the state that
    /// is reached, or `None` if some transition along the way is missing.
    pub fn run<'w, I: IntoIterator<Item = &'w str>>(&self, tokens: I) -> Option<StateIndex> {
        tokens
            .into_iter()
            .try_fold(self.initial, |state, token| self.successor(state, token))
    }

    /// Decides whether `word`, given as a whitespace separated string of tokens, is accepted.
    /// The empty word is accepted if and only if the initial state is accepting.
    pub fn accepts(&self, word: &str) -> bool {
        self.run(tokenize(word))
            .map(|q| self.is_accepting(q))
            .unwrap_or(false)
    }

    /// Returns true if the accepted language is empty.
    pub fn is_empty_language(&self) -> bool {
        self.reachable_states().all(|q| !self.is_accepting(q))
    }

    /// Builds a table of the transitions, with one row per state and one column per token.
    /// Accepting states are highlighted and the initial state is marked with an arrow.
    pub fn transition_table(&self) -> String {
        let tokens = self.tokens();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(tokens.universe().map(str::to_string)),
        );
        for q in self.states() {
            let marker = if q == self.initial { "→" } else { "" };
            let name = if self.is_accepting(q) {
                format!("{marker}{}", q.bold().green())
            } else {
                format!("{marker}{q}")
            };
            let row = std::iter::once(name).chain(tokens.universe().map(|token| {
                self.successor(q, token)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            }));
            builder.push_record(row.collect_vec());
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl PartialEq for Acceptor {
    fn eq(&self, other: &Self) -> bool {
        self.initial == other.initial
            && self.transitions == other.transitions
            && self.accepting.iter().eq(other.accepting.iter())
    }
}
impl Eq for Acceptor {}

impl std::fmt::Display for Acceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}
