//! # Hash Table
//!
//! Separate-chaining key→value map. Each bucket owns a singly linked chain
//! of entries; every entry caches the hash of its key so rehashing and chain
//! walks never recompute it.

use crate::config::{TABLE_INITIAL_CAPACITY, TABLE_LOAD_FACTOR, TABLE_MAX_CAPACITY};
use crate::{MinotaurError, MinotaurResult};
use rustc_hash::FxBuildHasher;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

type Link<K, V> = Option<Box<Entry<K, V>>>;

struct Entry<K, V> {
    key: K,
    value: V,
    hash: i64,
    next: Link<K, V>,
}

/// Maps a signed hash onto a bucket: `abs(hash) mod capacity`.
///
/// `unsigned_abs` keeps `i64::MIN` well defined.
pub(crate) fn bucket_index(hash: i64, capacity: usize) -> usize {
    (hash.unsigned_abs() % capacity as u64) as usize
}

/// Resizable hash table with separate chaining.
///
/// The table doubles and fully rehashes whenever its size exceeds
/// three quarters of its bucket count. Once the bucket count reaches
/// [`TABLE_MAX_CAPACITY`](crate::config::TABLE_MAX_CAPACITY) it stops growing
/// and chains simply lengthen; no entry is ever dropped.
///
/// # Examples
///
/// ```
/// use minotaur::HashTable;
///
/// let mut table = HashTable::new();
/// assert_eq!(table.put("runner", 1), None);
/// assert_eq!(table.put("runner", 2), Some(1));
/// assert_eq!(table.get("runner"), Some(&2));
/// assert_eq!(table.remove("runner"), Some(2));
/// assert!(!table.contains_key("runner"));
/// ```
pub struct HashTable<K, V, S = FxBuildHasher> {
    buckets: Vec<Link<K, V>>,
    len: usize,
    mods: u64,
    saturated: bool,
    max_capacity: usize,
    hasher: S,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Link<K, V>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<K, V> HashTable<K, V, FxBuildHasher> {
    /// Creates an empty table with 16 buckets.
    pub fn new() -> Self {
        Self::with_capacity(TABLE_INITIAL_CAPACITY)
    }

    /// Creates an empty table with `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

impl<K, V, S> HashTable<K, V, S> {
    /// Creates an empty table using `hasher` to hash keys.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(TABLE_INITIAL_CAPACITY, hasher)
    }

    /// Creates an empty table with `capacity` buckets using `hasher`.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::with_max_capacity_and_hasher(capacity, TABLE_MAX_CAPACITY, hasher)
    }

    /// Creates an empty table that stops doubling at `max_capacity` buckets.
    pub(crate) fn with_max_capacity_and_hasher(
        capacity: usize,
        max_capacity: usize,
        hasher: S,
    ) -> Self {
        let max_capacity = max_capacity.clamp(1, TABLE_MAX_CAPACITY);
        let capacity = capacity.clamp(1, max_capacity);
        Self {
            buckets: empty_buckets(capacity),
            len: 0,
            mods: 0,
            saturated: false,
            max_capacity,
            hasher,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        for slot in self.buckets.iter_mut() {
            drop_chain(slot.take());
        }
        self.len = 0;
        self.mods += 1;
    }

    /// Iterates over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Creates a detached fail-fast cursor over the entries.
    ///
    /// See [`MapCursor`] for the modification rules.
    pub fn cursor(&self) -> MapCursor {
        MapCursor {
            bucket: 0,
            depth: 0,
            last: None,
            expected_mods: self.mods,
        }
    }

    fn entry_at(&self, bucket: usize, depth: usize) -> Option<&Entry<K, V>> {
        let mut entry = self.buckets.get(bucket)?.as_deref();
        for _ in 0..depth {
            entry = entry?.next.as_deref();
        }
        entry
    }

    fn unlink_at(&mut self, bucket: usize, depth: usize) -> Option<(K, V)> {
        let mut link = self.buckets.get_mut(bucket)?;
        for _ in 0..depth {
            link = &mut link.as_mut()?.next;
        }
        let mut removed = link.take()?;
        *link = removed.next.take();
        self.len -= 1;
        self.mods += 1;
        Some((removed.key, removed.value))
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn hash<Q>(&self, key: &Q) -> i64
    where
        Q: Hash + ?Sized,
    {
        self.hasher.hash_one(key) as i64
    }

    fn locate<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        let bucket = bucket_index(hash, self.buckets.len());
        let mut entry = self.buckets[bucket].as_deref();
        let mut depth = 0;
        while let Some(current) = entry {
            if current.hash == hash && current.key.borrow() == key {
                return Some((bucket, depth));
            }
            entry = current.next.as_deref();
            depth += 1;
        }
        None
    }

    /// Returns the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, depth) = self.locate(key)?;
        self.entry_at(bucket, depth).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        let bucket = bucket_index(hash, self.buckets.len());
        let mut entry = self.buckets[bucket].as_deref_mut();
        while let Some(current) = entry {
            if current.hash == hash && current.key.borrow() == key {
                return Some(&mut current.value);
            }
            entry = current.next.as_deref_mut();
        }
        None
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Inserts or updates the value for `key`, returning the previous value.
    ///
    /// Updating an existing key is not a structural modification; inserting a
    /// new one is, and may trigger a resize.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        let bucket = bucket_index(hash, self.buckets.len());

        let mut entry = self.buckets[bucket].as_deref_mut();
        while let Some(current) = entry {
            if current.hash == hash && current.key == key {
                return Some(std::mem::replace(&mut current.value, value));
            }
            entry = current.next.as_deref_mut();
        }

        let next = self.buckets[bucket].take();
        self.buckets[bucket] = Some(Box::new(Entry {
            key,
            value,
            hash,
            next,
        }));
        self.len += 1;
        self.mods += 1;

        if self.should_resize() {
            self.resize(self.buckets.len() * 2);
        }
        None
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the entry for `key`, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, depth) = self.locate(key)?;
        self.unlink_at(bucket, depth)
    }

    fn should_resize(&self) -> bool {
        self.len as f64 > TABLE_LOAD_FACTOR * self.buckets.len() as f64
    }

    fn resize(&mut self, new_capacity: usize) {
        if self.buckets.len() >= self.max_capacity {
            if !self.saturated {
                self.saturated = true;
                log::warn!(
                    "hash table saturated at {} buckets; chains will lengthen",
                    self.buckets.len()
                );
            }
            return;
        }

        let new_capacity = new_capacity.min(self.max_capacity);
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for mut chain in old {
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let bucket = bucket_index(entry.hash, new_capacity);
                entry.next = self.buckets[bucket].take();
                self.buckets[bucket] = Some(entry);
            }
        }
        log::trace!("hash table rehashed into {} buckets", new_capacity);
    }
}

impl<K, V: PartialEq, S> HashTable<K, V, S> {
    /// Whether any entry holds `value`. Linear in the table size.
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter().any(|(_, candidate)| candidate == value)
    }
}

fn drop_chain<K, V>(mut chain: Link<K, V>) {
    while let Some(mut entry) = chain {
        chain = entry.next.take();
    }
}

impl<K, V, S> Drop for HashTable<K, V, S> {
    fn drop(&mut self) {
        for slot in self.buckets.iter_mut() {
            drop_chain(slot.take());
        }
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashTable<K, V, S> {
    /// Copies every chain link by link, keeping chain order.
    fn clone(&self) -> Self {
        let mut buckets = Vec::with_capacity(self.buckets.len());
        let mut links: Vec<&Entry<K, V>> = Vec::new();
        for chain in &self.buckets {
            let mut entry = chain.as_deref();
            while let Some(current) = entry {
                links.push(current);
                entry = current.next.as_deref();
            }

            let mut copy: Link<K, V> = None;
            for current in links.drain(..).rev() {
                copy = Some(Box::new(Entry {
                    key: current.key.clone(),
                    value: current.value.clone(),
                    hash: current.hash,
                    next: copy,
                }));
            }
            buckets.push(copy);
        }

        Self {
            buckets,
            len: self.len,
            mods: self.mods,
            saturated: self.saturated,
            max_capacity: self.max_capacity,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V> Default for HashTable<K, V, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`HashTable`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Link<K, V>>,
    current: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current {
                self.current = entry.next.as_deref();
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.current = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Detached, fail-fast position within a [`HashTable`].
///
/// The cursor holds no borrow, so the table may be touched between steps.
/// Any structural change not made through [`remove`](Self::remove) makes the
/// next call fail with [`MinotaurError::ConcurrentModification`]. Updating the
/// value of an existing key is allowed.
#[derive(Debug, Clone)]
pub struct MapCursor {
    bucket: usize,
    depth: usize,
    last: Option<(usize, usize)>,
    expected_mods: u64,
}

impl MapCursor {
    /// Advances and returns the next entry, or `None` at the end.
    pub fn next<'a, K, V, S>(
        &mut self,
        table: &'a HashTable<K, V, S>,
    ) -> MinotaurResult<Option<(&'a K, &'a V)>> {
        self.check_mods(table)?;
        while self.bucket < table.buckets.len() {
            if let Some(entry) = table.entry_at(self.bucket, self.depth) {
                self.last = Some((self.bucket, self.depth));
                self.depth += 1;
                return Ok(Some((&entry.key, &entry.value)));
            }
            self.bucket += 1;
            self.depth = 0;
        }
        Ok(None)
    }

    /// Removes the entry most recently returned by [`next`](Self::next).
    pub fn remove<K, V, S>(&mut self, table: &mut HashTable<K, V, S>) -> MinotaurResult<(K, V)> {
        self.check_mods(table)?;
        let (bucket, depth) = self.last.take().ok_or(MinotaurError::NoCurrentElement)?;
        let removed = table
            .unlink_at(bucket, depth)
            .ok_or(MinotaurError::NoCurrentElement)?;
        self.bucket = bucket;
        self.depth = depth;
        self.expected_mods = table.mods;
        Ok(removed)
    }

    fn check_mods<K, V, S>(&self, table: &HashTable<K, V, S>) -> MinotaurResult<()> {
        if self.expected_mods != table.mods {
            return Err(MinotaurError::ConcurrentModification);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Hashes integer keys to themselves so tests control the sign.
    #[derive(Default, Clone)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for byte in bytes {
                self.0 = self.0.rotate_left(8) ^ u64::from(*byte);
            }
        }

        fn write_i64(&mut self, value: i64) {
            self.0 = value as u64;
        }
    }

    #[derive(Default, Clone)]
    struct IdentityBuild;

    impl BuildHasher for IdentityBuild {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> IdentityHasher {
            IdentityHasher::default()
        }
    }

    #[test]
    fn test_bucket_index_normalises_negative_hashes() {
        assert_eq!(bucket_index(-5, 16), 5);
        assert_eq!(bucket_index(5, 16), 5);
        assert_eq!(bucket_index(i64::MIN, 16), 0);
        assert!(bucket_index(i64::MIN + 1, 7) < 7);
    }

    #[test]
    fn test_negative_hash_round_trip() {
        let mut table = HashTable::with_hasher(IdentityBuild);
        let keys = [i64::MIN, -1, -17, -16, 0, 16, i64::MAX];
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.put(*key, i), None);
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.get(key), Some(&i));
        }
        assert_eq!(table.remove(&-16), Some(3));
        assert!(!table.contains_key(&-16));
        assert!(table.contains_key(&16));
    }

    #[test]
    fn test_put_returns_previous_value() {
        let mut table = HashTable::new();
        assert_eq!(table.put(1, "a"), None);
        assert_eq!(table.put(1, "b"), Some("a"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&1), Some(&"b"));
    }

    #[test]
    fn test_resize_triggers_single_doubling() {
        let mut table = HashTable::new();
        for key in 0..12 {
            table.put(key, key);
        }
        assert_eq!(table.capacity(), 16);

        table.put(12, 12);
        assert_eq!(table.capacity(), 32);

        for key in 0..13 {
            assert_eq!(table.get(&key), Some(&key));
        }
    }

    #[test]
    fn test_colliding_keys_share_a_chain() {
        let mut table = HashTable::with_capacity_and_hasher(4, IdentityBuild);
        table.put(1i64, 'a');
        table.put(5i64, 'b');
        table.put(-9i64, 'c');
        assert_eq!(table.capacity(), 4);

        assert_eq!(table.remove(&5), Some('b'));
        assert_eq!(table.get(&1), Some(&'a'));
        assert_eq!(table.get(&-9), Some(&'c'));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_saturated_table_keeps_every_entry() {
        let mut table = HashTable::with_max_capacity_and_hasher(4, 8, IdentityBuild);
        for key in 0..40i64 {
            assert_eq!(table.put(key, key * 10), None);
        }
        assert_eq!(table.capacity(), 8);
        assert!(table.saturated);
        assert_eq!(table.len(), 40);
        for key in 0..40i64 {
            assert_eq!(table.get(&key), Some(&(key * 10)));
        }

        assert_eq!(table.remove(&17), Some(170));
        table.put(100, 1000);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.get(&100), Some(&1000));
        assert_eq!(table.iter().count(), 40);
    }

    #[test]
    fn test_clone_copies_long_chains() {
        let mut table = HashTable::with_max_capacity_and_hasher(1, 1, IdentityBuild);
        for key in 0..10_000i64 {
            table.put(key, key);
        }
        assert_eq!(table.capacity(), 1);

        let mut copy = table.clone();
        assert_eq!(copy.len(), 10_000);
        assert!(copy.iter().eq(table.iter()));

        copy.put(-1, -1);
        copy.remove(&0);
        assert!(table.contains_key(&0));
        assert!(!table.contains_key(&-1));
        assert_eq!(copy.len(), 10_000);

        copy.put(10_000, 10_000);
        assert!(copy.saturated);
        assert_eq!(copy.capacity(), 1);
    }

    #[test]
    fn test_contains_value_and_clear() {
        let mut table = HashTable::new();
        table.put("x", 10);
        table.put("y", 20);
        assert!(table.contains_value(&20));
        assert!(!table.contains_value(&30));

        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains_key("x"));
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table: HashTable<&str, Vec<u32>> = HashTable::new();
        table.put("a", vec![1]);
        if let Some(values) = table.get_mut("a") {
            values.push(2);
        }
        assert_eq!(table.get("a"), Some(&vec![1, 2]));
        assert!(table.get_mut("b").is_none());
    }

    #[test]
    fn test_iteration_visits_every_entry() {
        let table: HashTable<u32, u32> = (0..100).map(|i| (i, i * 2)).collect();
        assert_eq!(table.iter().len(), 100);

        let mut keys: Vec<u32> = table.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..100).collect::<Vec<_>>());
        assert_eq!(table.values().map(|v| *v as u64).sum::<u64>(), 9900);
    }

    #[test]
    fn test_cursor_remove_during_traversal() {
        let mut table: HashTable<u32, u32> = (0..50).map(|i| (i, i)).collect();

        let mut cursor = table.cursor();
        while let Some((key, _)) = cursor.next(&table).unwrap() {
            if key % 3 == 0 {
                cursor.remove(&mut table).unwrap();
            }
        }

        assert_eq!(table.len(), 33);
        for key in 0..50 {
            assert_eq!(table.contains_key(&key), key % 3 != 0);
        }
    }

    #[test]
    fn test_cursor_detects_foreign_insert() {
        let mut table = HashTable::new();
        table.put(1, 1);
        table.put(2, 2);

        let mut cursor = table.cursor();
        cursor.next(&table).unwrap();
        table.put(3, 3);

        assert!(matches!(
            cursor.next(&table),
            Err(MinotaurError::ConcurrentModification)
        ));
        assert!(matches!(
            cursor.remove(&mut table),
            Err(MinotaurError::ConcurrentModification)
        ));
    }

    #[test]
    fn test_cursor_tolerates_value_update() {
        let mut table = HashTable::new();
        table.put(1, 1);

        let mut cursor = table.cursor();
        table.put(1, 100);
        assert_eq!(cursor.next(&table).unwrap(), Some((&1, &100)));
    }
}
