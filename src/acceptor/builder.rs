use crate::alphabet::Token;

use super::{Acceptor, AcceptorError, StateIndex};

/// Helper struct for the construction of acceptors from a list of edges.
///
/// The number of states is derived from the largest state index that is mentioned
/// anywhere (in an edge, as accepting state or as initial state), unless it is raised
/// explicitly with [`AcceptorBuilder::with_size`].
///
/// # Example
///
/// An acceptor for the words `a b` and `a c`, where state 0 is initial and state 2
/// accepting:
/// ```
/// use reversible::prelude::*;
///
/// let acceptor = Acceptor::builder()
///     .with_edges([(0, "a", 1), (1, "b", 2), (1, "c", 2)])
///     .with_accepting([2])
///     .into_acceptor(0)
///     .unwrap();
/// assert!(acceptor.accepts("a c"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AcceptorBuilder {
    edges: Vec<(StateIndex, Token, StateIndex)>,
    accepting: Vec<StateIndex>,
    size: usize,
}

impl AcceptorBuilder {
    /// Adds the given edges, each given as `(source, token, target)`.
    pub fn with_edges<T, I>(mut self, edges: I) -> Self
    where
        T: Into<Token>,
        I: IntoIterator<Item = (StateIndex, T, StateIndex)>,
    {
        self.edges.extend(
            edges
                .into_iter()
                .map(|(source, token, target)| (source, token.into(), target)),
        );
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Ensures that the built acceptor has at least `size` states, which is needed when
    /// some states are not mentioned otherwise.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = self.size.max(size);
        self
    }

    /// Builds the acceptor with the given initial state.
    pub fn into_acceptor(self, initial: StateIndex) -> Result<Acceptor, AcceptorError> {
        let size = self
            .edges
            .iter()
            .flat_map(|(p, _, q)| [*p, *q])
            .chain(self.accepting.iter().copied())
            .chain(std::iter::once(initial))
            .map(|q| q + 1)
            .fold(self.size, usize::max);
        Acceptor::new(size, self.edges, self.accepting, initial)
    }
}
