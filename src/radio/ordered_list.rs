//! Ordered sequence shared by every profile list.
//!
//! Indices are validated before anything is touched, so a rejected
//! operation leaves the list exactly as it was.

use serde::{Deserialize, Serialize};

use super::error::{RadioError, RadioResult};

/// Entries that carry their own 1-based position.
pub trait Positioned {
    fn set_position(&mut self, position: usize);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> OrderedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> RadioResult<&T> {
        self.check_index(index)?;
        Ok(&self.items[index])
    }

    pub fn get_mut(&mut self, index: usize) -> RadioResult<&mut T> {
        self.check_index(index)?;
        Ok(&mut self.items[index])
    }

    pub fn check_index(&self, index: usize) -> RadioResult<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(RadioError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn remove_at(&mut self, index: usize) -> RadioResult<T> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Takes the entry at `from` out and reinserts it at `to`; entries in
    /// between shift by one.
    pub fn move_to(&mut self, from: usize, to: usize) -> RadioResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items = Vec::new();
    }
}

impl<T: Positioned> OrderedList<T> {
    /// Appends and stamps the entry with position `len + 1`.
    pub fn push_positioned(&mut self, mut item: T) -> &T {
        item.set_position(self.items.len() + 1);
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_position(index + 1);
        }
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
