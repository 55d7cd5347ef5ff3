//! Inference of k-reversible regular languages from positive examples, together with
//! minimization of deterministic finite acceptors.
//!
//! A sample is a finite collection of strings, each of which is split on whitespace into a
//! word of tokens. From a sample, the [prefix tree](passive::prefix_tree) is built, whose
//! states are then merged until the language it accepts is k-reversible. A language is
//! k-reversible if reading its minimal acceptor backwards is deterministic, provided that
//! one knows the last `k` tokens. The result is the smallest k-reversible language that
//! contains every word of the sample, represented by its minimal [`Acceptor`].
//!
//! For `k = 0` a dedicated worklist algorithm is used ([`passive::zero_reversible`]), for
//! larger `k` the states are merged one at a time, guided by
//! [compatibility matrices](passive::compatibility) that record which states can be
//! reached by equally labelled paths of length `k` ([`passive::k_reversible`]).
//!
//! ```
//! use reversible::prelude::*;
//!
//! let acceptor = infer(["the cat sleeps", "the dog sleeps", "a cat sleeps"], 0).unwrap();
//! assert!(acceptor.accepts("a dog sleeps"));
//! assert!(!acceptor.accepts("the cat"));
//! ```
//!
//! The most important types are
//! - [`Acceptor`], a deterministic finite acceptor with token labelled transitions, which
//!   may be partial. It is what inference produces and what [`minimize`] consumes.
//! - [`math::Partition`], a union-find structure over states, which is used to collect
//!   merges, and [`quotient::Quotient`], which projects an acceptor through a partition.
//! - [`passive::Inference`], which configures the look-ahead `k` and runs the inference.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use reversible::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        acceptor::{Acceptor, AcceptorBuilder, AcceptorError, StateIndex, Transition},
        alphabet::{tokenize, Alphabet, Token},
        math::{Partition, PartitionError},
        minimization::{minimize, MinimizationError},
        passive::{infer, prefix_tree, Inference, InferenceError, Sample},
        quotient::{Quotient, QuotientError},
    };
}

/// Mathematical helpers, most importantly the [`math::Partition`] of a set of states.
pub mod math;

/// Tokens and alphabets.
pub mod alphabet;

/// Deterministic finite acceptors over tokens.
pub mod acceptor;
pub use acceptor::Acceptor;

/// Projection of an acceptor through a partition of its states.
pub mod quotient;

/// Passive learning from a finite sample of positive words.
pub mod passive;
pub use passive::{infer, Inference};

/// Minimization of acceptors.
pub mod minimization;
pub use minimization::minimize;

/// Seeded generation of random acceptors and samples.
#[cfg(feature = "random")]
pub mod random;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The example from the wikipedia article on DFA minimization, with `a` for `0` and `b`
    /// for `1`. It accepts the words with exactly one `b`.
    pub fn wiki_acceptor() -> Acceptor {
        Acceptor::builder()
            .with_edges([
                (0, "a", 1),
                (0, "b", 2),
                (1, "a", 0),
                (1, "b", 3),
                (2, "a", 4),
                (2, "b", 5),
                (3, "a", 4),
                (3, "b", 5),
                (4, "a", 4),
                (4, "b", 5),
                (5, "a", 5),
                (5, "b", 5),
            ])
            .with_accepting([2, 3, 4])
            .into_acceptor(0)
            .unwrap()
    }
}
