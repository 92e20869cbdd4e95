//! # Dynamic Array
//!
//! Growable, bounds-checked sequence with an explicit doubling policy and a
//! fail-fast detached cursor.

use crate::config::{ARRAY_INITIAL_CAPACITY, ARRAY_MAX_CAPACITY};
use crate::{MinotaurError, MinotaurResult};
use std::fmt;

/// Growable indexable sequence.
///
/// Capacity starts at 16 slots and doubles whenever an insertion finds the
/// array full. Every indexed access is bounds-checked and reports
/// [`MinotaurError::IndexOutOfBounds`] instead of panicking.
///
/// # Examples
///
/// ```
/// use minotaur::DynamicArray;
///
/// let mut array = DynamicArray::new();
/// array.add(10).unwrap();
/// array.add(20).unwrap();
/// assert_eq!(array.len(), 2);
/// assert_eq!(*array.get(1).unwrap(), 20);
/// assert!(array.get(2).is_err());
/// ```
#[derive(Clone)]
pub struct DynamicArray<T> {
    data: Vec<T>,
    capacity: usize,
    max_capacity: usize,
    mods: u64,
}

impl<T> DynamicArray<T> {
    /// Creates an empty array with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(ARRAY_INITIAL_CAPACITY)
    }

    /// Creates an empty array able to hold `capacity` elements before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_max_capacity(capacity, ARRAY_MAX_CAPACITY)
    }

    /// Creates an empty array that refuses to grow past `max_capacity` slots.
    pub(crate) fn with_max_capacity(capacity: usize, max_capacity: usize) -> Self {
        let max_capacity = max_capacity.clamp(1, ARRAY_MAX_CAPACITY);
        let capacity = capacity.clamp(1, max_capacity);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            max_capacity,
            mods: 0,
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> MinotaurResult<&T> {
        self.check_bounds(index)?;
        Ok(&self.data[index])
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> MinotaurResult<&mut T> {
        self.check_bounds(index)?;
        Ok(&mut self.data[index])
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// Replacing an element is not a structural modification.
    pub fn set(&mut self, index: usize, value: T) -> MinotaurResult<T> {
        self.check_bounds(index)?;
        Ok(std::mem::replace(&mut self.data[index], value))
    }

    /// Appends an element, growing the capacity if needed.
    pub fn add(&mut self, value: T) -> MinotaurResult<()> {
        self.ensure_capacity(self.data.len() + 1)?;
        self.data.push(value);
        self.mods += 1;
        Ok(())
    }

    /// Inserts an element at `index`, shifting later elements right.
    ///
    /// `index == len()` is allowed and appends.
    pub fn insert(&mut self, index: usize, value: T) -> MinotaurResult<()> {
        if index > self.data.len() {
            return Err(MinotaurError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            });
        }
        self.ensure_capacity(self.data.len() + 1)?;
        self.data.insert(index, value);
        self.mods += 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements left.
    pub fn remove(&mut self, index: usize) -> MinotaurResult<T> {
        self.check_bounds(index)?;
        self.mods += 1;
        Ok(self.data.remove(index))
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        let value = self.data.pop()?;
        self.mods += 1;
        Some(value)
    }

    /// Swaps two elements in place.
    pub fn swap(&mut self, a: usize, b: usize) -> MinotaurResult<()> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        self.data.swap(a, b);
        Ok(())
    }

    /// Removes every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.mods += 1;
    }

    /// Borrows the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Borrows the elements as a mutable slice. The length cannot change
    /// through a slice, so this is not a structural modification.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Creates a detached cursor positioned before the first element.
    ///
    /// Unlike [`iter`](Self::iter) the cursor does not borrow the array, so
    /// the array can be mutated between steps. Any structural change not made
    /// through the cursor itself makes the next cursor call fail with
    /// [`MinotaurError::ConcurrentModification`].
    pub fn cursor(&self) -> ArrayCursor {
        ArrayCursor {
            next: 0,
            last: None,
            expected_mods: self.mods,
        }
    }

    /// Keeps only the elements for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.data.len();
        self.data.retain(keep);
        if self.data.len() != before {
            self.mods += 1;
        }
    }

    /// Consumes the array, returning its elements as a `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn check_bounds(&self, index: usize) -> MinotaurResult<()> {
        if index >= self.data.len() {
            return Err(MinotaurError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    fn ensure_capacity(&mut self, required: usize) -> MinotaurResult<()> {
        if required <= self.capacity {
            return Ok(());
        }
        if self.capacity >= self.max_capacity {
            log::warn!("dynamic array saturated at {} slots", self.capacity);
            return Err(MinotaurError::CapacitySaturated {
                capacity: self.capacity,
            });
        }

        let new_capacity = self.capacity.saturating_mul(2).min(self.max_capacity);
        self.data.reserve_exact(new_capacity - self.data.len());
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<T: PartialEq> DynamicArray<T> {
    /// Index of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|item| item == value)
    }

    /// Whether any element equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes the first element equal to `value`, returning it.
    pub fn remove_item(&mut self, value: &T) -> Option<T> {
        let index = self.index_of(value)?;
        self.mods += 1;
        Some(self.data.remove(index))
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Copies the elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Detached, fail-fast position within a [`DynamicArray`].
#[derive(Debug, Clone)]
pub struct ArrayCursor {
    next: usize,
    last: Option<usize>,
    expected_mods: u64,
}

impl ArrayCursor {
    /// Advances and returns the next element, or `None` at the end.
    pub fn next<'a, T>(&mut self, array: &'a DynamicArray<T>) -> MinotaurResult<Option<&'a T>> {
        self.check_mods(array)?;
        match array.data.get(self.next) {
            Some(value) => {
                self.last = Some(self.next);
                self.next += 1;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Whether another element follows.
    pub fn has_next<T>(&self, array: &DynamicArray<T>) -> bool {
        self.next < array.len()
    }

    /// Removes the element most recently returned by [`next`](Self::next).
    pub fn remove<T>(&mut self, array: &mut DynamicArray<T>) -> MinotaurResult<T> {
        self.check_mods(array)?;
        let index = self.last.take().ok_or(MinotaurError::NoCurrentElement)?;
        let value = array.remove(index)?;
        self.next = index;
        self.expected_mods = array.mods;
        Ok(value)
    }

    /// Replaces the element most recently returned by [`next`](Self::next).
    pub fn set<T>(&mut self, array: &mut DynamicArray<T>, value: T) -> MinotaurResult<T> {
        self.check_mods(array)?;
        let index = self.last.ok_or(MinotaurError::NoCurrentElement)?;
        array.set(index, value)
    }

    fn check_mods<T>(&self, array: &DynamicArray<T>) -> MinotaurResult<()> {
        if self.expected_mods != array.mods {
            return Err(MinotaurError::ConcurrentModification);
        }
        Ok(())
    }
}
