//! # Binary Heap
//!
//! Array-backed min-heap priority queue. Besides the usual add/extract it
//! supports removing an arbitrary element, which the A* engine uses to emulate
//! decrease-key when it finds a cheaper route to an open node.

use super::dynamic_array::DynamicArray;
use crate::MinotaurResult;
use std::cmp::Ordering;
use std::fmt;

/// Orders heap elements. Smaller elements are extracted first.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering through [`Ord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Min-heap priority queue.
///
/// # Examples
///
/// ```
/// use minotaur::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// for value in [5, 1, 4, 2, 3] {
///     heap.add(value).unwrap();
/// }
/// assert!(heap.remove(&4));
/// assert_eq!(heap.extract_min(), Some(1));
/// assert_eq!(heap.min(), Some(&2));
/// ```
///
/// A custom comparator turns it into a max-heap:
///
/// ```
/// use minotaur::BinaryHeap;
///
/// let mut heap = BinaryHeap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// heap.add(1).unwrap();
/// heap.add(9).unwrap();
/// assert_eq!(heap.extract_min(), Some(9));
/// ```
#[derive(Clone)]
pub struct BinaryHeap<T, C = NaturalOrder> {
    data: DynamicArray<T>,
    comparator: C,
}

impl<T: Ord> BinaryHeap<T, NaturalOrder> {
    /// Creates an empty heap using natural ordering.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Ord> Default for BinaryHeap<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> BinaryHeap<T, C> {
    /// Creates an empty heap ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            data: DynamicArray::new(),
            comparator,
        }
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns the smallest element without removing it.
    pub fn min(&self) -> Option<&T> {
        self.data.as_slice().first()
    }

    /// Inserts an element: append, then sift up.
    pub fn add(&mut self, value: T) -> MinotaurResult<()> {
        self.data.add(value)?;
        self.sift_up(self.data.len() - 1);
        Ok(())
    }

    /// Removes and returns the smallest element: swap root with last,
    /// truncate, sift down.
    pub fn extract_min(&mut self) -> Option<T> {
        self.take_at(0)
    }

    /// Iterates over the elements in heap (not sorted) order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Drains the heap into ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(value) = self.extract_min() {
            sorted.push(value);
        }
        sorted
    }

    /// Checks that every node compares ≤ both of its children.
    pub fn is_valid_heap(&self) -> bool {
        let items = self.data.as_slice();
        (1..items.len()).all(|child| {
            let parent = (child - 1) / 2;
            self.comparator.compare(&items[parent], &items[child]) != Ordering::Greater
        })
    }

    fn take_at(&mut self, index: usize) -> Option<T> {
        let last = self.data.len().checked_sub(1)?;
        if index > last {
            return None;
        }
        self.data.as_mut_slice().swap(index, last);
        let removed = self.data.pop()?;
        if index < self.data.len() {
            // The element moved into `index` may violate the invariant in
            // either direction.
            let settled = self.sift_up(index);
            if settled == index {
                self.sift_down(index);
            }
        }
        Some(removed)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let items = self.data.as_slice();
        self.comparator.compare(&items[a], &items[b]) == Ordering::Less
    }

    /// Returns the index the element finally rests at.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.data.as_mut_slice().swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.data.as_mut_slice().swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: PartialEq, C: Comparator<T>> BinaryHeap<T, C> {
    /// Whether an element equal to `value` is queued. Linear scan.
    pub fn contains(&self, value: &T) -> bool {
        self.data.contains(value)
    }

    /// Removes one element equal to `value`. Linear scan to find it, then
    /// O(log n) to restore the invariant. Returns whether anything was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.data.index_of(value) {
            Some(index) => self.take_at(index).is_some(),
            None => false,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinaryHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap").field("data", &self.data).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_heap() {
        let mut heap: BinaryHeap<i32> = BinaryHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.min(), None);
        assert_eq!(heap.extract_min(), None);
        assert!(!heap.remove(&1));
    }

    #[test]
    fn test_extract_yields_sorted_sequence() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut input: Vec<i32> = (0..500).map(|_| rng.gen_range(-1000..1000)).collect();

        let mut heap = BinaryHeap::new();
        for value in &input {
            heap.add(*value).unwrap();
            assert!(heap.is_valid_heap());
        }

        input.sort_unstable();
        assert_eq!(heap.into_sorted_vec(), input);
    }

    #[test]
    fn test_remove_arbitrary_keeps_invariant() {
        let mut heap = BinaryHeap::new();
        for value in [10, 4, 15, 20, 0, 30, 2, 4, 11, 13, 7] {
            heap.add(value).unwrap();
        }

        for value in [15, 0, 4, 30, 13] {
            assert!(heap.remove(&value));
            assert!(heap.is_valid_heap());
        }
        assert_eq!(heap.len(), 6);
        assert!(heap.contains(&4));
        assert!(!heap.contains(&0));
        assert_eq!(heap.into_sorted_vec(), vec![2, 4, 7, 10, 11, 20]);
    }

    #[test]
    fn test_remove_needing_sift_up() {
        // Removing 11 moves the last element (4) under a larger parent (10).
        let mut heap = BinaryHeap::new();
        for value in [1, 10, 2, 11, 12, 3, 4] {
            heap.add(value).unwrap();
        }
        assert!(heap.remove(&11));
        assert!(heap.is_valid_heap());
        assert_eq!(heap.min(), Some(&1));
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 4, 10, 12]);
    }

    #[test]
    fn test_remove_last_element() {
        let mut heap = BinaryHeap::new();
        heap.add(1).unwrap();
        heap.add(2).unwrap();
        assert!(heap.remove(&2));
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.min(), Some(&1));
    }

    #[test]
    fn test_custom_comparator() {
        let mut heap = BinaryHeap::with_comparator(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0));
        heap.add((3, 'c')).unwrap();
        heap.add((1, 'a')).unwrap();
        heap.add((2, 'b')).unwrap();
        assert_eq!(heap.extract_min(), Some((1, 'a')));
        assert_eq!(heap.extract_min(), Some((2, 'b')));
    }
}
