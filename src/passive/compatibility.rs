use bit_set::BitSet;
use itertools::Itertools;

use crate::{acceptor::StateIndex, quotient::Quotient};

/// A square boolean matrix over the classes of a [`Quotient`], where an entry `(x, y)`
/// being set means that `x` and `y` are considered compatible.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    size: usize,
    entries: BitSet,
}

impl CompatibilityMatrix {
    /// The matrix in which every pair is compatible.
    pub fn full(size: usize) -> Self {
        Self {
            size,
            entries: (0..size * size).collect(),
        }
    }

    /// The matrix in which no pair is compatible.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            entries: BitSet::with_capacity(size * size),
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if `x` and `y` are marked as compatible.
    pub fn get(&self, x: StateIndex, y: StateIndex) -> bool {
        debug_assert!(x < self.size && y < self.size);
        self.entries.contains(x * self.size + y)
    }

    /// Marks `x` and `y` as compatible.
    pub fn set(&mut self, x: StateIndex, y: StateIndex) {
        debug_assert!(x < self.size && y < self.size);
        self.entries.insert(x * self.size + y);
    }

    /// Iterates over all compatible pairs in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (StateIndex, StateIndex)> + '_ {
        self.entries.iter().map(|i| (i / self.size, i % self.size))
    }
}

/// The family of compatibility matrices `C_0, ..., C_{k+1}` of a quotient. `C_0` marks
/// every pair, and `(y0, y1)` is marked in `C_{j+1}` if there are edges `x0 -a-> y0` and
/// `x1 -a-> y1` on the same token `a` such that `(x0, x1)` is marked in `C_j`.
///
/// Thus `(y0, y1)` is marked in `C_j` if and only if `y0` and `y1` can be reached by
/// two paths of length `j` that are labelled with the same word.
#[derive(Debug, Clone)]
pub struct CompatibilityFamily(Vec<CompatibilityMatrix>);

impl CompatibilityFamily {
    /// Computes the family up to and including `C_{k+1}` for the given quotient.
    pub fn new(quotient: &Quotient, k: usize) -> Self {
        let size = quotient.size();
        let by_token = quotient
            .edges()
            .map(|(source, token, target)| (token, (source, target)))
            .into_group_map();

        let mut matrices = Vec::with_capacity(k + 2);
        matrices.push(CompatibilityMatrix::full(size));
        for j in 0..=k {
            let previous = &matrices[j];
            let mut next = CompatibilityMatrix::empty(size);
            for edges in by_token.values() {
                for (&(x0, y0), &(x1, y1)) in edges.iter().cartesian_product(edges.iter()) {
                    if previous.get(x0, x1) {
                        next.set(y0, y1);
                    }
                }
            }
            matrices.push(next);
        }
        Self(matrices)
    }

    /// Returns `C_j`. Panics if `j` exceeds `k + 1`.
    pub fn matrix(&self, j: usize) -> &CompatibilityMatrix {
        &self.0[j]
    }

    /// The number of matrices, which is `k + 2`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A family always contains at least `C_0` and `C_1`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::CompatibilityFamily;
    use crate::{math::Partition, prelude::*, quotient::Quotient};

    fn trivial_quotient(acceptor: &Acceptor) -> Quotient {
        Quotient::new(acceptor, &Partition::trivial(acceptor.size())).unwrap()
    }

    #[test]
    fn pairs_reached_by_equally_labelled_paths() {
        // 0 -a-> 1 -c-> 2 and 0 -b-> 3 -c-> 4
        let acceptor = Acceptor::builder()
            .with_edges([(0, "a", 1), (1, "c", 2), (0, "b", 3), (3, "c", 4)])
            .with_accepting([2, 4])
            .into_acceptor(0)
            .unwrap();
        let family = CompatibilityFamily::new(&trivial_quotient(&acceptor), 1);
        assert_eq!(family.len(), 3);
        assert_eq!(family.matrix(0).pairs().count(), 25);
        assert_eq!(
            family.matrix(1).pairs().collect_vec(),
            vec![(1, 1), (2, 2), (2, 4), (3, 3), (4, 2), (4, 4)]
        );
        assert_eq!(
            family.matrix(2).pairs().collect_vec(),
            vec![(2, 2), (4, 4)]
        );
    }

    #[test]
    fn matrices_are_symmetric() {
        let acceptor = Acceptor::builder()
            .with_edges([(0, "a", 1), (1, "a", 2), (2, "b", 3), (1, "b", 4)])
            .with_accepting([3, 4])
            .into_acceptor(0)
            .unwrap();
        let family = CompatibilityFamily::new(&trivial_quotient(&acceptor), 3);
        for j in 0..family.len() {
            let m = family.matrix(j);
            for (x, y) in m.pairs() {
                assert!(m.get(y, x), "C_{j} is not symmetric in ({x}, {y})");
            }
        }
        assert!(family.matrix(1).get(1, 2));
        assert!(family.matrix(2).get(3, 4));
        assert!(!family.matrix(3).get(3, 4));
    }
}
