use thiserror::Error;
use tracing::debug;

use crate::{
    acceptor::{Acceptor, StateIndex},
    alphabet::{Alphabet, Token},
    quotient::{Quotient, QuotientError},
};

/// Moore's partition refinement, which computes the Myhill/Nerode equivalence of an acceptor.
pub mod partition_refinement;
pub use partition_refinement::moore_partition_refinement;

/// Errors that can occur during minimization.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MinimizationError {
    /// The acceptor has a transition on a token that is not part of the given alphabet.
    #[error("state {state} has a transition on {token:?}, which is not in the alphabet")]
    TokenOutsideAlphabet {
        /// Origin of the offending transition.
        state: StateIndex,
        /// The token that is missing from the alphabet.
        token: Token,
    },
    /// Projecting through the equivalence did not give a deterministic acceptor.
    #[error(transparent)]
    Quotient(#[from] QuotientError),
}

/// Computes the minimal acceptor for the language of `acceptor`. Every token that labels a
/// transition must be part of `alphabet`.
///
/// States that are unreachable or from which no accepting state can be reached are removed
/// first, then equivalent states are merged. Missing transitions stay missing, so the result
/// is the unique minimal trim acceptor of the language. Its states are numbered in
/// breadth-first order (see [`Acceptor::canonical`]), so acceptors of the same language
/// minimize to equal values.
///
/// ```
/// use reversible::prelude::*;
///
/// let acceptor = Acceptor::builder()
///     .with_edges([(0, "a", 1), (0, "b", 2), (1, "c", 3), (2, "c", 4)])
///     .with_accepting([3, 4])
///     .into_acceptor(0)
///     .unwrap();
/// let minimal = minimize(&acceptor, &Alphabet::new(["a", "b", "c"])).unwrap();
/// assert_eq!(minimal.size(), 3);
/// assert!(minimal.accepts("b c"));
/// ```
pub fn minimize(acceptor: &Acceptor, alphabet: &Alphabet) -> Result<Acceptor, MinimizationError> {
    if let Some(t) = acceptor.transitions().find(|t| !alphabet.contains(t.token)) {
        return Err(MinimizationError::TokenOutsideAlphabet {
            state: t.source,
            token: t.token.to_string(),
        });
    }

    let trimmed = acceptor.trim();
    let partition = moore_partition_refinement(&trimmed, alphabet);
    let minimal = Quotient::new(&trimmed, &partition)?
        .into_acceptor()?
        .canonical();
    debug!(
        "minimized acceptor with {} states ({} after trimming) to {} states",
        acceptor.size(),
        trimmed.size(),
        minimal.size()
    );
    Ok(minimal)
}

impl Acceptor {
    /// Minimizes `self` over the tokens that occur on its transitions, see [`minimize`].
    pub fn minimize(&self) -> Result<Acceptor, MinimizationError> {
        minimize(self, &self.tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::{minimize, MinimizationError};
    use crate::{prelude::*, tests::wiki_acceptor};

    #[test_log::test]
    fn minimize_wiki_acceptor() {
        let dfa = wiki_acceptor();
        let minimal = dfa.minimize().unwrap();
        // the sink 5 is removed, 0 and 1 as well as 2, 3 and 4 are equivalent
        assert_eq!(minimal.size(), 2);
        assert_eq!(minimal.transition_count(), 3);
        for word in ["b", "a b", "a a b a", "b a a"] {
            assert_eq!(dfa.accepts(word), minimal.accepts(word));
            assert!(minimal.accepts(word));
        }
        for word in ["", "a", "b b", "a b a b"] {
            assert!(!minimal.accepts(word));
        }
    }

    #[test]
    fn minimization_is_idempotent() {
        let minimal = wiki_acceptor().minimize().unwrap();
        let alphabet = Alphabet::new(["a", "b"]);
        assert_eq!(minimize(&minimal, &alphabet).unwrap(), minimal);
    }

    #[test]
    fn equivalent_acceptors_minimize_to_equal_values() {
        // both accept (a a)*, with differently numbered states
        let two = Acceptor::new(2, [(0, "a", 1), (1, "a", 0)], [0], 0).unwrap();
        let four = Acceptor::new(
            4,
            [(3, "a", 1), (1, "a", 2), (2, "a", 1), (0, "a", 1)],
            [3, 2],
            3,
        )
        .unwrap();
        assert_eq!(two.minimize().unwrap(), four.minimize().unwrap());
        assert_eq!(four.minimize().unwrap().size(), 2);
    }

    #[test]
    fn unreachable_and_dead_states_are_removed() {
        let acceptor = Acceptor::new(
            5,
            [(0, "a", 1), (0, "b", 2), (3, "a", 1), (2, "a", 2)],
            [1, 4],
            0,
        )
        .unwrap();
        let minimal = acceptor.minimize().unwrap();
        assert_eq!(minimal.size(), 2);
        assert!(minimal.accepts("a"));
        assert!(minimal.successor(minimal.initial(), "b").is_none());
    }

    #[test]
    fn empty_language_keeps_initial_state() {
        let acceptor = Acceptor::new(3, [(0, "a", 1), (1, "b", 2)], [], 0).unwrap();
        let minimal = acceptor.minimize().unwrap();
        assert_eq!(minimal.size(), 1);
        assert_eq!(minimal.transition_count(), 0);
        assert!(minimal.is_empty_language());
    }

    #[test]
    fn empty_languages_minimize_to_equal_values() {
        let looping = Acceptor::new(2, [(0, "a", 0), (0, "b", 1)], [], 0).unwrap();
        let bare = Acceptor::new(1, Vec::<(usize, &str, usize)>::new(), [], 0).unwrap();
        let alphabet = Alphabet::new(["a", "b"]);
        let minimal = minimize(&looping, &alphabet).unwrap();
        assert_eq!(minimal.transition_count(), 0);
        assert_eq!(minimal, minimize(&bare, &alphabet).unwrap());
    }

    #[test]
    fn tokens_must_be_in_alphabet() {
        assert_eq!(
            minimize(&wiki_acceptor(), &Alphabet::new(["a"])),
            Err(MinimizationError::TokenOutsideAlphabet {
                state: 0,
                token: "b".into()
            })
        );
        // additional tokens in the alphabet are fine
        let wide = minimize(&wiki_acceptor(), &Alphabet::new(["a", "b", "c"])).unwrap();
        assert_eq!(wide, wiki_acceptor().minimize().unwrap());
    }
}
