use itertools::Itertools;
use tracing::trace;

use crate::alphabet::{tokenize, Alphabet, Token};

/// A finite sample of positive example words. Each word is given as a string whose
/// whitespace separated pieces are its tokens.
///
/// Strings that contain no token at all (empty or whitespace only) are skipped, they
/// are still counted in [`Sample::len`] so that an empty sample can be told apart from
/// a sample whose strings are all blank. The words are kept in sorted order, which makes
/// every construction on top of a sample independent of the input order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Sample {
    words: Vec<Vec<Token>>,
    provided: usize,
}

impl Sample {
    /// Tokenizes the given strings and collects them into a sample.
    pub fn new<S: AsRef<str>, I: IntoIterator<Item = S>>(strings: I) -> Self {
        let mut provided = 0;
        let words = strings
            .into_iter()
            .inspect(|_| provided += 1)
            .filter_map(|s| {
                let word = tokenize(s.as_ref()).map(str::to_string).collect_vec();
                if word.is_empty() {
                    trace!("skipping blank sample string {:?}", s.as_ref());
                    None
                } else {
                    Some(word)
                }
            })
            .sorted()
            .collect_vec();
        Self { words, provided }
    }

    /// Iterates over the (non-empty) words in ascending order.
    pub fn words(&self) -> impl Iterator<Item = &[Token]> + '_ {
        self.words.iter().map(Vec::as_slice)
    }

    /// The number of strings the sample was created from, including blank ones.
    pub fn len(&self) -> usize {
        self.provided
    }

    /// Returns true if the sample was created from no strings at all.
    pub fn is_empty(&self) -> bool {
        self.provided == 0
    }

    /// The number of strings that were skipped because they contain no token.
    pub fn skipped(&self) -> usize {
        self.provided - self.words.len()
    }

    /// Returns the maximum length of any word in the sample. Gives back `0` if no word exists.
    pub fn max_word_len(&self) -> usize {
        self.words.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Computes the alphabet, that is the sorted set of all tokens occurring in some word.
    pub fn alphabet(&self) -> Alphabet {
        Alphabet::new(self.words.iter().flatten().cloned())
    }
}

impl<S: AsRef<str>> FromIterator<S> for Sample {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::Sample;

    #[test]
    fn blank_strings_are_skipped() {
        let sample = Sample::new(["a c", "  ", "a  b", ""]);
        assert_eq!(sample.len(), 4);
        assert_eq!(sample.skipped(), 2);
        assert!(!sample.is_empty());
        assert_eq!(
            sample.words().collect_vec(),
            vec![
                &["a".to_string(), "b".to_string()][..],
                &["a".to_string(), "c".to_string()][..]
            ]
        );
        assert_eq!(sample.max_word_len(), 2);
        assert_eq!(sample.alphabet().universe().collect_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_sample() {
        let sample: Sample = Vec::<String>::new().into_iter().collect();
        assert!(sample.is_empty());
        assert_eq!(sample.max_word_len(), 0);
        assert!(sample.alphabet().is_empty());
    }
}
