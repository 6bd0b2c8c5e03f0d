/* String-keyed map built on a raw array plus a key index. Element i is the
 * i-th distinct key inserted; indices never move. */

use crate::array::RawArray;
use crate::errors::{DataError, DataResult};
use indexmap::IndexSet;
use std::mem;

pub struct RawMap<T> {
    elements: RawArray<T>,
    keys: IndexSet<String>,
}

impl<T> RawMap<T> {
    pub fn new() -> Self {
        Self {
            elements: RawArray::new(),
            keys: IndexSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.elements.size()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ensure_size(&mut self, desired: usize) -> DataResult<()> {
        self.elements.ensure_size(desired)?;
        let additional = desired.saturating_sub(self.keys.len());
        self.keys.try_reserve(additional).map_err(|_| DataError::OutOfMemory {
            requested: additional.saturating_mul(mem::size_of::<String>()),
        })
    }

    /* Element and index for `key` */
    pub fn get(&self, key: &str) -> Option<(&T, usize)> {
        let index = self.keys.get_index_of(key)?;
        self.elements.get(index).map(|elem| (elem, index))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<(&mut T, usize)> {
        let index = self.keys.get_index_of(key)?;
        self.elements.get_mut(index).map(|elem| (elem, index))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn get_by_index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.elements.get_mut(index)
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get_index(index).map(String::as_str)
    }

    /* Entries in insertion order */
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys.iter().map(String::as_str).zip(self.elements.iter())
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.keys.clear();
    }

    pub fn done(&mut self) {
        self.elements.done();
        self.keys = IndexSet::new();
    }
}

impl<T: Default> RawMap<T> {
    /* Existing element for `key`, or a new default element appended at the
     * next index. The flag is true only when the element was created. */
    pub fn get_or_create(&mut self, key: &str) -> DataResult<(&mut T, usize, bool)> {
        if let Some(index) = self.keys.get_index_of(key) {
            return Ok((&mut self.elements[index], index, false));
        }

        let index = self.elements.size();
        self.elements.append()?;
        self.keys.insert(key.to_string());
        Ok((&mut self.elements[index], index, true))
    }
}

impl<T> Default for RawMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RawMap<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            keys: self.keys.clone(),
        }
    }
}

/* Insertion order is part of map identity, as indices are */
impl<T: PartialEq> PartialEq for RawMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.keys.iter().eq(other.keys.iter()) && self.elements == other.elements
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RawMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
