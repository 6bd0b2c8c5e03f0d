/* Two-key memoization table.
 *
 * Keys are identity-like values (type ids, node ids). Entries may be
 * written before the value they name is fully built, which is what lets a
 * recursive walk find its own in-progress result. */

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Memo<K1, K2, V> {
    entries: HashMap<(K1, K2), V>,
}

impl<K1, K2, V> Memo<K1, K2, V>
where
    K1: Copy + Eq + Hash,
    K2: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key1: K1, key2: K2) -> Option<&V> {
        self.entries.get(&(key1, key2))
    }

    pub fn contains(&self, key1: K1, key2: K2) -> bool {
        self.entries.contains_key(&(key1, key2))
    }

    /* Inserts or overwrites */
    pub fn set(&mut self, key1: K1, key2: K2, value: V) {
        self.entries.insert((key1, key2), value);
    }

    pub fn delete(&mut self, key1: K1, key2: K2) -> Option<V> {
        self.entries.remove(&(key1, key2))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K1, K2, V> Default for Memo<K1, K2, V>
where
    K1: Copy + Eq + Hash,
    K2: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
