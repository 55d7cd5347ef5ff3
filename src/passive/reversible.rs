use std::collections::BTreeMap;

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::{debug, trace};

use super::{
    compatibility::{CompatibilityFamily, CompatibilityMatrix},
    prefix_tree, InferenceError, Refinement, Sample,
};
use crate::{
    acceptor::{Acceptor, StateIndex},
    math::Partition,
    minimization::minimize,
    quotient::Quotient,
};

/// The reason for merging two classes during k-reversible refinement, in order of priority.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum MergeRule {
    /// Two edges leave the same class on the same token, their targets are merged.
    Determinism,
    /// Two edges on the same token enter the same class from compatible sources, the
    /// sources are merged.
    ReverseCompatibility,
    /// Two distinct classes are compatible.
    Compatibility,
}

fn select_merge(
    quotient: &Quotient,
    compatible: &CompatibilityMatrix,
) -> Option<(StateIndex, StateIndex, MergeRule)> {
    if let Some((_, _, targets)) = quotient.first_nondeterminism() {
        if let Some((&y0, &y1)) = targets.iter().next_tuple() {
            return Some((y0, y1, MergeRule::Determinism));
        }
    }

    let mut sources: BTreeMap<(StateIndex, &str), Vec<StateIndex>> = BTreeMap::new();
    for (x, token, y) in quotient.edges() {
        sources.entry((y, token)).or_default().push(x);
    }
    for entering in sources.values() {
        if let Some((&x0, &x1)) = entering
            .iter()
            .tuple_combinations()
            .find(|(x0, x1)| compatible.get(**x0, **x1))
        {
            return Some((x0, x1, MergeRule::ReverseCompatibility));
        }
    }

    (0..quotient.size())
        .tuple_combinations()
        .find(|&(x, y)| compatible.get(x, y))
        .map(|(x, y)| (x, y, MergeRule::Compatibility))
}

/// Computes the partition of the states of `pta` whose quotient is k-reversible, starting
/// from the trivial partition and merging one pair of classes at a time until no rule
/// applies anymore. Each round projects the current partition, recomputes the
/// [`CompatibilityFamily`] up to `k + 1` and consults `C_k`.
///
/// Requires `k >= 1`, zero-reversible refinement is done by
/// [`super::zero_reversible_partition`].
pub fn k_reversible_partition(pta: &Acceptor, k: usize) -> Result<Refinement, InferenceError> {
    if k == 0 {
        return Err(InferenceError::ZeroLookahead);
    }

    let mut partition = Partition::trivial(pta.size());
    let mut merges = 0;
    loop {
        let quotient = Quotient::new(pta, &partition)?;
        let family = CompatibilityFamily::new(&quotient, k);
        let Some((x, y, rule)) = select_merge(&quotient, family.matrix(k)) else {
            break;
        };

        let (p, q) = (quotient.representative(x), quotient.representative(y));
        trace!(
            "{} classes {x} and {y} (containing {p} and {q}) by {:?}",
            "merging".bold(),
            rule.blue()
        );
        let mut next = partition.clone();
        let merged = next.merge(p, q);
        debug_assert!(merged.is_some(), "distinct classes lie in distinct blocks");
        partition = next;
        merges += 1;
    }

    debug!(
        "{k}-reversible refinement of {} states reached its fixed point with {} classes after {merges} merges",
        pta.size(),
        partition.len()
    );
    Ok(Refinement { partition, merges })
}

/// Infers the canonical acceptor of the smallest k-reversible language containing
/// the words of `sample`, for `k >= 1`. The result is minimized.
pub fn k_reversible(sample: &Sample, k: usize) -> Result<Acceptor, InferenceError> {
    let pta = prefix_tree(sample);
    let refinement = k_reversible_partition(&pta, k)?;
    let quotient = Quotient::new(&pta, &refinement.partition)?.into_acceptor()?;
    Ok(minimize(&quotient, &sample.alphabet())?)
}
