use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::{
    acceptor::Acceptor,
    math::Partition,
    minimization::{minimize, MinimizationError},
    quotient::QuotientError,
};

/// Contains the definition of [`Sample`], a finite collection of positive example words.
pub mod sample;
pub use sample::Sample;

/// Construction of the prefix tree acceptor of a sample.
pub mod prefixtree;
pub use prefixtree::prefix_tree;

/// Compatibility matrices which decide which classes the k-reversible refinement merges.
pub mod compatibility;

/// Module containing the refinement for k-reversible languages with `k >= 1`.
pub mod reversible;
pub use reversible::{k_reversible, k_reversible_partition};

/// Module containing the worklist based refinement for zero-reversible languages.
pub mod zero_reversible;
pub use zero_reversible::{zero_reversible, zero_reversible_partition};

/// The look-ahead that [`Inference::default`] uses.
pub const DEFAULT_LOOKAHEAD: usize = 2;

/// The outcome of refining the states of a prefix tree: the partition at the fixed point
/// and the number of merges that were needed to reach it. Every merge joins two distinct
/// blocks, so `partition.len() + merges` equals the number of states of the prefix tree.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Refinement {
    /// The partition of the prefix tree states.
    pub partition: Partition,
    /// Number of merges that were performed.
    pub merges: usize,
}

/// Errors that can occur during inference.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InferenceError {
    /// Zero-reversible refinement unifies all accepting states, so there has to be one.
    #[error("prefix tree has no accepting states to unify")]
    NoAcceptingStates,
    /// [`k_reversible_partition`] was called with `k = 0`, which is handled by
    /// [`zero_reversible_partition`] instead.
    #[error("k-reversible refinement requires a look-ahead of at least one")]
    ZeroLookahead,
    /// Projecting through the computed partition failed.
    #[error(transparent)]
    Quotient(#[from] QuotientError),
    /// Minimizing the result failed.
    #[error(transparent)]
    Minimization(#[from] MinimizationError),
}

/// Configures and runs inference of a k-reversible language from a sample. The only
/// parameter is the look-ahead `k`, where `k = 0` selects the zero-reversible refinement.
///
/// ```
/// use reversible::prelude::*;
///
/// let acceptor = Inference::default().with_k(1).run(["a", "a a"]).unwrap();
/// assert!(acceptor.accepts("a a a"));
/// assert!(!acceptor.accepts(""));
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Inference {
    k: usize,
}

impl Default for Inference {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD)
    }
}

impl Inference {
    /// Creates an inference with look-ahead `k`.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Replaces the look-ahead.
    pub fn with_k(self, k: usize) -> Self {
        Self { k }
    }

    /// The look-ahead.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Tokenizes the given strings and infers from the resulting [`Sample`].
    pub fn run<S: AsRef<str>, I: IntoIterator<Item = S>>(
        &self,
        strings: I,
    ) -> Result<Acceptor, InferenceError> {
        self.infer(&Sample::new(strings))
    }

    /// Infers the minimal acceptor of the smallest k-reversible language that contains
    /// every word of `sample`. An empty sample yields the single state acceptor of the
    /// empty language, for which a warning is emitted.
    pub fn infer(&self, sample: &Sample) -> Result<Acceptor, InferenceError> {
        if sample.is_empty() {
            return Ok(prefix_tree(sample));
        }

        let start = Instant::now();
        let acceptor = if self.k == 0 {
            minimize(&zero_reversible(sample)?, &sample.alphabet())?
        } else {
            k_reversible(sample, self.k)?
        };
        debug!(
            "inferred {}-reversible acceptor with {} states from {} words in {}ms",
            self.k,
            acceptor.size(),
            sample.len(),
            start.elapsed().as_millis()
        );
        Ok(acceptor)
    }
}

/// Infers the minimal acceptor of the smallest k-reversible language containing all of
/// `strings`, see [`Inference`].
pub fn infer<S: AsRef<str>, I: IntoIterator<Item = S>>(
    strings: I,
    k: usize,
) -> Result<Acceptor, InferenceError> {
    Inference::new(k).run(strings)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{infer, Inference, InferenceError, Sample, DEFAULT_LOOKAHEAD};
    use crate::{minimization::minimize, passive::zero_reversible};

    #[test]
    fn single_word_without_lookahead() {
        let acceptor = infer(["a"], 0).unwrap();
        assert_eq!(acceptor.size(), 2);
        assert!(!acceptor.is_accepting(acceptor.initial()));
        let target = acceptor.successor(acceptor.initial(), "a").unwrap();
        assert!(acceptor.is_accepting(target));
        assert!(acceptor.accepts("a"));
        assert!(!acceptor.accepts("a a"));
        assert!(!acceptor.accepts(""));
    }

    #[test_log::test]
    fn empty_sample_accepts_nothing() {
        for k in 0..3 {
            let acceptor = infer(Vec::<&str>::new(), k).unwrap();
            assert_eq!(acceptor.size(), 1);
            assert_eq!(acceptor.accepting_states().count(), 0);
            assert!(acceptor.is_empty_language());
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_sample_emits_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let acceptor = tracing::subscriber::with_default(subscriber, || {
            infer(Vec::<&str>::new(), 1).unwrap()
        });
        assert!(acceptor.is_empty_language());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "no warning in {output:?}");
        assert!(output.contains("sample is empty"));
    }

    #[test]
    fn terminal_states_are_merged() {
        let acceptor = infer(["a b", "a c"], 1).unwrap();
        assert!(acceptor.size() <= 3);
        assert!(acceptor.accepts("a b"));
        assert!(acceptor.accepts("a c"));
        assert_eq!(acceptor.accepting_states().count(), 1);
        let accepting = acceptor.accepting_states().next().unwrap();
        assert_eq!(acceptor.edges_from(accepting).unwrap().count(), 0);
    }

    #[test]
    fn blank_samples_cannot_be_unified() {
        assert_eq!(
            infer(["", "   "], 0).unwrap_err(),
            InferenceError::NoAcceptingStates
        );
        assert!(infer(["", "   "], 1).unwrap().is_empty_language());
    }

    #[test]
    fn builder_defaults() {
        let inference = Inference::default();
        assert_eq!(inference.k(), DEFAULT_LOOKAHEAD);
        assert_eq!(inference.with_k(0).k(), 0);
        let strings = ["He bakes pie .", "She bakes pie .", "He eats pie ."];
        assert_eq!(
            inference.run(strings).unwrap(),
            infer(strings, DEFAULT_LOOKAHEAD).unwrap()
        );
    }

    #[test]
    fn zero_lookahead_dispatches_to_zero_reversible() {
        let strings = ["a b", "b", "a a c", "c c"];
        let sample = Sample::new(strings);
        let direct = minimize(&zero_reversible(&sample).unwrap(), &sample.alphabet()).unwrap();
        assert_eq!(infer(strings, 0).unwrap(), direct);
    }

    #[test]
    fn errors_are_displayed() {
        assert_eq!(
            InferenceError::NoAcceptingStates.to_string(),
            "prefix tree has no accepting states to unify"
        );
    }

    #[cfg(feature = "random")]
    mod randomized {
        use crate::{minimization::minimize, passive::infer, random::random_sample};

        const TOKENS: [&str; 3] = ["a", "b", "c"];

        #[test]
        fn inferred_acceptors_contain_sample() {
            for seed in 0..20 {
                let strings = random_sample(&TOKENS, 8, 5, seed);
                for k in 0..=3 {
                    let acceptor = match infer(&strings, k) {
                        Ok(acceptor) => acceptor,
                        Err(e) => panic!("inference failed for seed {seed} and k = {k}: {e}"),
                    };
                    for word in &strings {
                        assert!(
                            acceptor.accepts(word),
                            "{word:?} rejected for seed {seed} and k = {k}"
                        );
                    }
                    let mut seen = std::collections::BTreeSet::new();
                    for t in acceptor.transitions() {
                        assert!(seen.insert((t.source, t.token)));
                    }
                }
            }
        }

        #[test]
        fn inferred_acceptors_are_minimal() {
            for seed in 0..20 {
                let strings = random_sample(&TOKENS, 6, 4, seed);
                for k in 0..=2 {
                    let acceptor = infer(&strings, k).unwrap();
                    let alphabet = acceptor.tokens();
                    assert_eq!(minimize(&acceptor, &alphabet).unwrap(), acceptor);
                }
            }
        }
    }
}
