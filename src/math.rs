use std::collections::BTreeSet;

use itertools::Itertools;
use thiserror::Error;

use crate::acceptor::StateIndex;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// Errors that can occur when a [`Partition`] is built from explicitly given blocks.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PartitionError {
    /// A block mentions a state that lies outside of the universe.
    #[error("state {state} is not part of the universe 0..{universe}")]
    OutOfRange {
        /// The offending state.
        state: StateIndex,
        /// Size of the universe.
        universe: usize,
    },
    /// A state is contained in more than one block.
    #[error("state {0} occurs in more than one block")]
    Overlap(StateIndex),
    /// A state of the universe is not contained in any block.
    #[error("state {0} is not covered by any block")]
    Uncovered(StateIndex),
    /// One of the given blocks has no elements.
    #[error("blocks of a partition must not be empty")]
    EmptyBlock,
}

/// A partition of the states `0..universe` into disjoint, non-empty blocks.
///
/// Internally this is a union-find structure, so a block is identified by its root
/// (see [`Partition::find`]). Roots stay valid until the block is merged with another
/// one. Merging is done by size, which keeps the trees shallow enough that lookups
/// on a shared reference do not need path compression. Mutating lookups
/// ([`Partition::find_compress`]) do compress.
///
/// Two partitions are equal if and only if they induce the same blocks, regardless of
/// the order in which merges happened.
#[derive(Debug, Clone)]
pub struct Partition {
    parent: Vec<StateIndex>,
    size: Vec<usize>,
    blocks: usize,
}

impl Partition {
    /// The finest partition of `0..universe`, where every state forms its own block.
    pub fn trivial(universe: usize) -> Self {
        Self {
            parent: (0..universe).collect(),
            size: vec![1; universe],
            blocks: universe,
        }
    }

    /// Builds a partition from the given blocks, verifying that they are non-empty,
    /// pairwise disjoint and cover `0..universe`.
    pub fn from_blocks<X, Y>(universe: usize, blocks: Y) -> Result<Self, PartitionError>
    where
        X: IntoIterator<Item = StateIndex>,
        Y: IntoIterator<Item = X>,
    {
        let mut seen = vec![false; universe];
        let mut partition = Self::trivial(universe);
        for block in blocks {
            let mut block = block.into_iter();
            let first = block.next().ok_or(PartitionError::EmptyBlock)?;
            for q in std::iter::once(first).chain(block) {
                if q >= universe {
                    return Err(PartitionError::OutOfRange { state: q, universe });
                }
                if std::mem::replace(&mut seen[q], true) {
                    return Err(PartitionError::Overlap(q));
                }
                partition.merge(first, q);
            }
        }
        match seen.iter().position(|covered| !covered) {
            Some(q) => Err(PartitionError::Uncovered(q)),
            None => Ok(partition),
        }
    }

    /// Builds a partition from a class assignment, where `classes[q]` is some identifier
    /// of the block that `q` belongs to.
    pub fn from_classes<C: Eq + std::hash::Hash>(classes: &[C]) -> Self {
        let mut partition = Self::trivial(classes.len());
        let mut first: Map<&C, StateIndex> = Map::default();
        for (q, class) in classes.iter().enumerate() {
            let representative = *first.entry(class).or_insert(q);
            partition.merge(representative, q);
        }
        partition
    }

    /// The number of states that are partitioned.
    pub fn universe(&self) -> usize {
        self.parent.len()
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks
    }

    /// Returns true if the universe is empty, in which case there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }

    /// Returns the root of the block containing `q`. Panics if `q` is not in the universe.
    pub fn find(&self, mut q: StateIndex) -> StateIndex {
        while self.parent[q] != q {
            q = self.parent[q];
        }
        q
    }

    /// Same as [`Partition::find`], but compresses the path from `q` to its root.
    pub fn find_compress(&mut self, q: StateIndex) -> StateIndex {
        let root = self.find(q);
        let mut current = q;
        while self.parent[current] != root {
            current = std::mem::replace(&mut self.parent[current], root);
        }
        root
    }

    /// Returns true if `p` and `q` lie in the same block.
    pub fn same_block(&self, p: StateIndex, q: StateIndex) -> bool {
        self.find(p) == self.find(q)
    }

    /// Merges the blocks containing `p` and `q`. Returns the root of the merged block if
    /// the two were distinct, in which case the number of blocks decreased by exactly one,
    /// and `None` if they already coincided.
    pub fn merge(&mut self, p: StateIndex, q: StateIndex) -> Option<StateIndex> {
        let (mut p, mut q) = (self.find_compress(p), self.find_compress(q));
        if p == q {
            return None;
        }
        if self.size[p] < self.size[q] {
            std::mem::swap(&mut p, &mut q);
        }
        self.parent[q] = p;
        self.size[p] += self.size[q];
        self.blocks -= 1;
        Some(p)
    }

    /// Assigns to every state the index of its block, where blocks are numbered
    /// in the order of their smallest element. This numbering only depends on the
    /// blocks themselves and is what quotients use as state indices.
    pub fn block_indices(&self) -> Vec<usize> {
        let mut index_of_root: Map<StateIndex, usize> = Map::default();
        (0..self.universe())
            .map(|q| {
                let next = index_of_root.len();
                *index_of_root.entry(self.find(q)).or_insert(next)
            })
            .collect()
    }

    /// Returns the blocks ordered by their smallest element, see [`Partition::block_indices`].
    pub fn blocks(&self) -> Vec<BTreeSet<StateIndex>> {
        let mut blocks = vec![BTreeSet::new(); self.blocks];
        for (q, idx) in self.block_indices().into_iter().enumerate() {
            blocks[idx].insert(q);
        }
        blocks
    }

    /// Returns the block containing `q`.
    pub fn block_of(&self, q: StateIndex) -> BTreeSet<StateIndex> {
        let root = self.find(q);
        (0..self.universe())
            .filter(|p| self.find(*p) == root)
            .collect()
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks && self.block_indices() == other.block_indices()
    }
}
impl Eq for Partition {}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.blocks()
                .iter()
                .map(|block| format!("[{}]", block.iter().join(", ")))
                .join(", ")
        )
    }
}
