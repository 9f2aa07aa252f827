//! Batch dataflow primitives used by the pipeline stages.
//!
//! Every primitive is a barrier: it consumes its whole input before
//! returning. Work is spread over the current `rayon` pool. Values that share
//! a key stay in input order, so per-key combination is deterministic even
//! for non-exact arithmetic such as float sums.

use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Collect all values sharing a key.
pub fn group_by_key<K, V, I>(items: I) -> HashMap<K, Vec<V>>
where
    I: IntoParallelIterator<Item = (K, V)>,
    K: Eq + Hash + Send,
    V: Send,
{
    items
        .into_par_iter()
        .fold(HashMap::new, |mut acc: HashMap<K, Vec<V>>, (key, value)| {
            acc.entry(key).or_default().push(value);
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (key, values) in right {
                left.entry(key).or_default().extend(values);
            }
            left
        })
}

/// Reduce the values of each key with `combine`, starting from `identity`.
///
/// Keys are processed in parallel; the values of a single key are folded in
/// input order.
pub fn combine_per_key<K, V, I, F>(items: I, identity: V, combine: F) -> HashMap<K, V>
where
    I: IntoParallelIterator<Item = (K, V)>,
    K: Eq + Hash + Send,
    V: Clone + Send + Sync,
    F: Fn(V, V) -> V + Send + Sync,
{
    group_by_key(items)
        .into_par_iter()
        .map(|(key, values)| {
            let total = values.into_iter().fold(identity.clone(), &combine);
            (key, total)
        })
        .collect()
}

/// Values from both sources for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct CoGrouped<L, R> {
    pub left: Vec<L>,
    pub right: Vec<R>,
}

impl<L, R> Default for CoGrouped<L, R> {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }
}

/// Full outer grouping of two keyed sources. Every key seen on either side
/// appears once; a side that never produced the key has an empty list.
pub fn co_group_by_key<K, L, R>(
    left: impl IntoIterator<Item = (K, L)>,
    right: impl IntoIterator<Item = (K, R)>,
) -> BTreeMap<K, CoGrouped<L, R>>
where
    K: Ord,
{
    let mut groups: BTreeMap<K, CoGrouped<L, R>> = BTreeMap::new();
    for (key, value) in left {
        groups.entry(key).or_default().left.push(value);
    }
    for (key, value) in right {
        groups.entry(key).or_default().right.push(value);
    }
    groups
}
