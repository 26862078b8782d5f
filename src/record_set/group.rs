//! Ordered grouping
//!
//! Groups are kept in the order their key was first seen; members keep
//! their relative order from the source set.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use super::set::RecordSet;
use crate::config::EngineConfig;

/// Result of [`RecordSet::group_by`]
#[derive(Debug, Clone)]
pub struct Groups<K, T> {
    entries: Vec<(K, RecordSet<T>)>,
    index: HashMap<K, usize>,
}

impl<K, T> Groups<K, T>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn build<'a, F>(
        records: impl Iterator<Item = &'a Arc<T>>,
        config: EngineConfig,
        mut key_fn: F,
    ) -> Self
    where
        T: 'a,
        F: FnMut(&T) -> K,
    {
        let mut keys: Vec<K> = Vec::new();
        let mut members: Vec<Vec<Arc<T>>> = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            let key = key_fn(&**record);
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    index.insert(key.clone(), keys.len());
                    keys.push(key);
                    members.push(Vec::new());
                    members.len() - 1
                }
            };
            members[slot].push(Arc::clone(record));
        }

        let entries = keys
            .into_iter()
            .zip(members)
            .map(|(key, records)| (key, RecordSet::from_shared(records, config)))
            .collect();

        Self { entries, index }
    }

    /// Members of the group with `key`.
    pub fn get(&self, key: &K) -> Option<&RecordSet<T>> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Groups in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &RecordSet<T>)> + '_ {
        self.entries.iter().map(|(key, set)| (key, set))
    }

    /// Concatenates every group in key order.
    pub fn flatten(&self) -> RecordSet<T> {
        let config = self
            .entries
            .first()
            .map(|(_, set)| set.config())
            .unwrap_or_default();
        let records = self
            .entries
            .iter()
            .flat_map(|(_, set)| set.shared().iter().cloned())
            .collect();
        RecordSet::from_shared(records, config)
    }
}

impl<K, T> IntoIterator for Groups<K, T> {
    type Item = (K, RecordSet<T>);
    type IntoIter = std::vec::IntoIter<(K, RecordSet<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
