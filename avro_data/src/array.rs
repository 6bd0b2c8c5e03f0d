/* Resizable array of fixed-size elements */

use crate::errors::{DataError, DataResult};
use std::mem;
use std::ops::{Index, IndexMut};

/* Storage grows geometrically: the first allocation is exactly what was
 * asked for, later ones double until the request fits. `clear` keeps the
 * allocation around for reuse. */
pub struct RawArray<T> {
    elements: Vec<T>,
}

impl<T> RawArray<T> {
    /* Empty array; nothing is allocated until the first append */
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /* Number of elements the current allocation can hold */
    pub fn allocated_size(&self) -> usize {
        self.elements.capacity()
    }

    pub fn ensure_size(&mut self, desired: usize) -> DataResult<()> {
        let allocated = self.elements.capacity();
        if allocated >= desired {
            return Ok(());
        }

        let mut target = if allocated == 0 { desired } else { allocated * 2 };
        while target < desired {
            target = target.saturating_mul(2);
        }

        self.elements
            .try_reserve_exact(target - self.elements.len())
            .map_err(|_| DataError::OutOfMemory {
                requested: target.saturating_mul(mem::size_of::<T>()),
            })
    }

    /* Appends `value`, growing storage if needed */
    pub fn append_with(&mut self, value: T) -> DataResult<&mut T> {
        let index = self.elements.len();
        self.ensure_size(index + 1)?;
        self.elements.push(value);
        Ok(&mut self.elements[index])
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.elements.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /* Drops every element but keeps the allocation */
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /* Drops every element and releases the allocation */
    pub fn done(&mut self) {
        self.elements = Vec::new();
    }
}

impl<T: Default> RawArray<T> {
    /* Appends a default-initialized element and returns it for filling in */
    pub fn append(&mut self) -> DataResult<&mut T> {
        self.append_with(T::default())
    }
}

impl<T> Default for RawArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RawArray<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for RawArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RawArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<T> Index<usize> for RawArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.elements[index]
    }
}

impl<T> IndexMut<usize> for RawArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.elements[index]
    }
}

impl<'a, T> IntoIterator for &'a RawArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
