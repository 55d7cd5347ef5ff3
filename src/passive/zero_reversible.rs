use std::collections::{btree_map::Entry, BTreeMap, VecDeque};

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::{debug, trace};

use super::{prefix_tree, InferenceError, Refinement, Sample};
use crate::{
    acceptor::{Acceptor, StateIndex},
    math::Partition,
    quotient::Quotient,
};

/// For every block (identified by its root in the union-find [`Partition`]) and token,
/// the unique state that is reached from (respectively leads into) the block on that token.
type Neighbours<'a> = Vec<BTreeMap<&'a str, StateIndex>>;

/// Moves the entries of block `absorbed` into block `root`. Where both blocks have an
/// entry for the same token with different states, those states have to end up in the
/// same block, so the pair is put on `pending`.
fn absorb<'a>(
    neighbours: &mut Neighbours<'a>,
    root: StateIndex,
    absorbed: StateIndex,
    pending: &mut VecDeque<(StateIndex, StateIndex)>,
) {
    for (token, state) in std::mem::take(&mut neighbours[absorbed]) {
        match neighbours[root].entry(token) {
            Entry::Occupied(existing) => {
                if *existing.get() != state {
                    pending.push_back((*existing.get(), state));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(state);
            }
        }
    }
}

/// Computes the finest partition of the states of `pta` whose quotient is zero-reversible.
///
/// All accepting states are put into one block, then blocks are merged until the quotient
/// is deterministic both forwards and backwards. For this, the successor and predecessor
/// of every block on every token is tracked; when two blocks are merged and both have a
/// successor (or predecessor) on the same token, these have to be merged as well.
///
/// Fails with [`InferenceError::NoAcceptingStates`] if `pta` has no accepting state.
pub fn zero_reversible_partition(pta: &Acceptor) -> Result<Refinement, InferenceError> {
    let accepting = pta.accepting_states().collect_vec();
    let (&first, rest) = accepting
        .split_first()
        .ok_or(InferenceError::NoAcceptingStates)?;
    let mut pending: VecDeque<_> = rest.iter().map(|&q| (first, q)).collect();

    let mut successors: Neighbours<'_> = pta
        .states()
        .map(|q| {
            pta.edges_from(q)
                .into_iter()
                .flatten()
                .map(|t| (t.token, t.target))
                .collect()
        })
        .collect();
    let mut predecessors: Neighbours<'_> = vec![BTreeMap::new(); pta.size()];
    for t in pta.transitions() {
        // in a prefix tree every state has at most one predecessor, for other acceptors
        // the predecessors have to be merged right away
        if let Some(other) = predecessors[t.target].insert(t.token, t.source) {
            pending.push_back((other, t.source));
        }
    }

    let mut partition = Partition::trivial(pta.size());
    let mut merges = 0;
    while let Some((p, q)) = pending.pop_front() {
        let (left, right) = (partition.find(p), partition.find(q));
        let Some(root) = partition.merge(left, right) else {
            continue;
        };
        let absorbed = if root == left { right } else { left };
        trace!("{} blocks of {p} and {q}", "merging".bold());

        absorb(&mut successors, root, absorbed, &mut pending);
        absorb(&mut predecessors, root, absorbed, &mut pending);
        merges += 1;
    }

    debug!(
        "zero-reversible refinement of {} states gave {} classes after {merges} merges",
        pta.size(),
        partition.len()
    );
    Ok(Refinement { partition, merges })
}

/// Infers an acceptor for the smallest zero-reversible language containing the words of
/// `sample`. The result is the quotient of the prefix tree and is not minimized.
pub fn zero_reversible(sample: &Sample) -> Result<Acceptor, InferenceError> {
    let pta = prefix_tree(sample);
    let refinement = zero_reversible_partition(&pta)?;
    Ok(Quotient::new(&pta, &refinement.partition)?.into_acceptor()?)
}
