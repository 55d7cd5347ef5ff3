use itertools::Itertools;

/// A token is a single symbol of the alphabet. Sample strings are split on whitespace
/// and every resulting piece is one token, so `"the cake"` consists of the two tokens
/// `"the"` and `"cake"`.
pub type Token = String;

/// Splits `input` on whitespace into its tokens. Leading, trailing and repeated
/// whitespace does not produce empty tokens.
pub fn tokenize(input: &str) -> impl Iterator<Item = &str> + '_ {
    input.split_whitespace()
}

/// A finite alphabet of tokens, which is kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Alphabet(Vec<Token>);

impl Alphabet {
    /// Creates an alphabet from the given tokens, sorting them and removing duplicates.
    pub fn new<T: Into<Token>, I: IntoIterator<Item = T>>(tokens: I) -> Self {
        Self(
            tokens
                .into_iter()
                .map(Into::into)
                .sorted()
                .dedup()
                .collect(),
        )
    }

    /// Extracts the alphabet of a sample, i.e. all distinct tokens that occur in any of
    /// the given strings.
    pub fn from_sample<S: AsRef<str>, I: IntoIterator<Item = S>>(sample: I) -> Self {
        Self::new(
            sample
                .into_iter()
                .flat_map(|s| tokenize(s.as_ref()).map(str::to_string).collect_vec()),
        )
    }

    /// Returns true if `token` is part of the alphabet.
    pub fn contains(&self, token: &str) -> bool {
        self.index_of(token).is_some()
    }

    /// Returns the position of `token` in the sorted alphabet.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.0.binary_search_by(|t| t.as_str().cmp(token)).ok()
    }

    /// Iterates over the tokens in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// The number of distinct tokens.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<usize> for Alphabet {
    type Output = str;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T: Into<Token>> FromIterator<T> for Alphabet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}
