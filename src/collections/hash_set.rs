//! # Hash Set
//!
//! Presence set mapping each element to `()` in a [`HashTable`].

use super::hash_table::{HashTable, MapCursor};
use crate::MinotaurResult;
use rustc_hash::FxBuildHasher;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// Set of unique elements.
///
/// # Examples
///
/// ```
/// use minotaur::HashSet;
///
/// let mut visited = HashSet::new();
/// assert!(visited.add(3));
/// assert!(!visited.add(3));
/// assert!(visited.contains(&3));
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = FxBuildHasher> {
    table: HashTable<T, (), S>,
}

impl<T> HashSet<T, FxBuildHasher> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Creates an empty set with `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set hashing with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashTable::with_hasher(hasher),
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Removes every element. The bucket count is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Iterates over the elements in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.table.keys()
    }

    /// Creates a detached fail-fast cursor over the elements.
    pub fn cursor(&self) -> SetCursor {
        SetCursor {
            inner: self.table.cursor(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds `value`, returning whether it was not already present.
    pub fn add(&mut self, value: T) -> bool {
        if self.table.contains_key(&value) {
            return false;
        }
        self.table.put(value, ());
        true
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(value).is_some()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(value)
    }

    /// Union: adds every element of `values`. Returns whether the set changed.
    pub fn add_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut modified = false;
        for value in values {
            modified |= self.add(value);
        }
        modified
    }

    /// Difference: removes every element of `values`. Returns whether the
    /// set changed.
    pub fn remove_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut modified = false;
        for value in values {
            modified |= self.remove(value);
        }
        modified
    }

    /// Intersection: keeps only elements also present in `other`. Returns
    /// whether the set changed.
    pub fn retain_all<S2>(&mut self, other: &HashSet<T, S2>) -> MinotaurResult<bool>
    where
        S2: BuildHasher,
    {
        let mut modified = false;
        let mut cursor = self.cursor();
        while let Some(value) = cursor.next(self)? {
            if !other.contains(value) {
                cursor.remove(self)?;
                modified = true;
            }
        }
        Ok(modified)
    }
}

impl<T> Default for HashSet<T, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.add_all(iter);
        set
    }
}

/// Detached fail-fast cursor over a [`HashSet`].
#[derive(Debug, Clone)]
pub struct SetCursor {
    inner: MapCursor,
}

impl SetCursor {
    /// Advances and returns the next element, or `None` at the end.
    pub fn next<'a, T, S>(&mut self, set: &'a HashSet<T, S>) -> MinotaurResult<Option<&'a T>> {
        Ok(self.inner.next(&set.table)?.map(|(value, _)| value))
    }

    /// Removes the element most recently returned by [`next`](Self::next).
    pub fn remove<T, S>(&mut self, set: &mut HashSet<T, S>) -> MinotaurResult<T> {
        self.inner.remove(&mut set.table).map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MinotaurError;

    fn set_of(values: &[i32]) -> HashSet<i32> {
        values.iter().copied().collect()
    }

    fn sorted(set: &HashSet<i32>) -> Vec<i32> {
        let mut values: Vec<i32> = set.iter().copied().collect();
        values.sort_unstable();
        values
    }

    #[test]
    fn test_set_starts_empty() {
        let set: HashSet<i32> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut set = HashSet::new();
        for i in 0..1000 {
            assert!(set.add(i));
            assert!(!set.add(i));
        }
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut set = set_of(&[1, 2, 3]);
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert!(!set.contains(&2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_add_all_is_union() {
        let mut set = set_of(&[1, 2]);
        assert!(set.add_all(vec![2, 3, 4]));
        assert!(!set.add_all(vec![1, 4]));
        assert_eq!(sorted(&set), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_retain_all_is_intersection() {
        let mut set = set_of(&[1, 2, 3, 4, 5]);
        let other = set_of(&[2, 4, 6]);
        assert!(set.retain_all(&other).unwrap());
        assert_eq!(sorted(&set), vec![2, 4]);
        assert!(!set.retain_all(&other).unwrap());
    }

    #[test]
    fn test_remove_all_is_difference() {
        let mut set = set_of(&[1, 2, 3, 4]);
        let other = set_of(&[3, 4, 5]);
        assert!(set.remove_all(other.iter()));
        assert_eq!(sorted(&set), vec![1, 2]);
    }

    #[test]
    fn test_cursor_fails_after_foreign_add() {
        let mut set = set_of(&[1, 2, 3]);
        let mut cursor = set.cursor();
        cursor.next(&set).unwrap();
        set.add(10);
        assert!(matches!(
            cursor.next(&set),
            Err(MinotaurError::ConcurrentModification)
        ));
    }

    #[test]
    fn test_duplicate_add_is_not_a_modification() {
        let mut set = set_of(&[1, 2, 3]);
        let mut cursor = set.cursor();
        set.add(1);
        assert!(cursor.next(&set).is_ok());
    }
}
