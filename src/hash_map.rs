use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::error::Error;
use crate::error::Result;
use crate::hash_table::HashTable;

/// A hash map with separate chaining, stored in a [`HashTable`] of `(K, V)`
/// pairs.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys.
///
/// # Capacity policy
///
/// - The bucket count starts at 16 and is always a power of two.
/// - An insert that would push `len / capacity` above 0.75 doubles the bucket
///   count *before* the new entry is placed.
/// - [`erase`](Self::erase) halves the bucket count whenever `len / capacity`
///   is below 0.25. It checks once before looking for the key and once more
///   after a successful removal, so a single call can halve twice. There is
///   no floor at 16.
///
/// References returned by lookups, and cursors from [`begin`](Self::begin),
/// borrow the map and therefore cannot outlive a mutation.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current number of buckets.
    ///
    /// Unlike most maps this is not the number of elements the map can hold
    /// before resizing; it is the bucket count, which is always a power of
    /// two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(map.capacity(), 16);
    ///
    /// for i in 0..100 {
    ///     map.insert(i, i);
    /// }
    /// assert_eq!(map.capacity(), 256);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the map.
    ///
    /// The bucket count is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// for i in 0..20 {
    ///     map.insert(i, i);
    /// }
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Swaps the contents of two maps, including their hasher builders.
    pub fn swap(&mut self, other: &mut Self) {
        self.table.swap(&mut other.table);
        core::mem::swap(&mut self.hash_builder, &mut other.hash_builder);
    }

    /// Returns a cursor at the first entry, or at [`end`](Self::end) if the
    /// map is empty.
    ///
    /// Entries are visited in ascending bucket order and, within a bucket,
    /// in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert('a', 1);
    ///
    /// let mut cursor = map.begin();
    /// assert_eq!(cursor.get(), Some((&'a', &1)));
    /// cursor.advance();
    /// assert_eq!(cursor, map.end());
    /// ```
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.begin(),
        }
    }

    /// Returns the end sentinel cursor.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.end(),
        }
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// The iterator yields `(&K, &V)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns chain statistics for the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a histogram of chain lengths for the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> crate::hash_table::ChainHistogram {
        self.table.chain_histogram()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new, empty map with 16 buckets and the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Builds a map from parallel key and value sequences.
    ///
    /// The `i`-th key is paired with the `i`-th value. When a key appears
    /// more than once, the later value replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the sequences differ in length.
    /// Nothing is hashed in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::Error;
    /// # use chain_hash::HashMap;
    /// #
    /// let map = HashMap::from_parallel_with_hasher(['a', 'b', 'a'], [1, 2, 3], RandomState::new())?;
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&'a'), Ok(&3));
    ///
    /// let err = HashMap::from_parallel_with_hasher(['a'], [1, 2], RandomState::new()).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 1, values: 2 });
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_parallel_with_hasher<IK, IV>(keys: IK, values: IV, hash_builder: S) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        let keys = keys.into_iter();
        let values = values.into_iter();
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut map = Self::with_hasher(hash_builder);
        for (key, value) in keys.zip(values) {
            map.upsert(key, value);
        }
        Ok(map)
    }

    /// Inserts a key-value pair if the key is not already present.
    ///
    /// Returns `false`, leaving the stored value untouched, if the key was
    /// present. Otherwise grows the bucket array first if the new entry would
    /// push the load factor above 0.75, appends the entry to the tail of its
    /// bucket, and returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Ok(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        if self.table.position(hash, |(k, _)| k == &key).is_some() {
            return false;
        }

        self.table.grow_for_insert();
        self.table.push(hash, (key, value));
        true
    }

    /// Inserts a key-value pair, replacing the value if the key is present.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(map.upsert(37, "a"), None);
    /// assert_eq!(map.upsert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Ok(&"b"));
    /// ```
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        if let Some(position) = self.table.position(hash, |(k, _)| k == &key) {
            let (_, slot) = self.table.at_mut(position);
            return Some(core::mem::replace(slot, value));
        }

        self.table.grow_for_insert();
        self.table.push(hash, (key, value));
        None
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::Error;
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Ok(&"a"));
    /// assert_eq!(map.get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.position(key).ok_or(Error::KeyNotFound)?;
        Ok(&self.table.at(position).1)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent; nothing is
    /// inserted.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.position(key).ok_or(Error::KeyNotFound)?;
        Ok(&mut self.table.at_mut(position).1)
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// The insert follows the same growth policy as [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map: HashMap<&str, Vec<i32>, _> = HashMap::with_hasher(RandomState::new());
    /// map.index("odd").push(1);
    /// map.index("odd").push(3);
    /// assert_eq!(map.get("odd"), Ok(&vec![1, 3]));
    /// ```
    pub fn index(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let hash = self.hash_builder.hash_one(&key);
        if let Some(position) = self.table.position(hash, |(k, _)| k == &key) {
            return &mut self.table.at_mut(position).1;
        }

        self.table.grow_for_insert();
        &mut self.table.push(hash, (key, V::default())).1
    }

    /// Removes a key from the map, returning `true` if it was present.
    ///
    /// Shrinks the bucket array when the load factor is below 0.25, both
    /// before the key is looked up and again after it is removed. A miss can
    /// therefore still shrink the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::hash::RandomState;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert!(map.erase(&1));
    /// assert!(!map.erase(&1));
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// Applies the same shrink checks as [`erase`](Self::erase).
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.shrink_if_underloaded();

        let position = self.position(key)?;
        let (_, value) = self.table.remove_at(position);

        self.table.shrink_if_underloaded();
        Some(value)
    }

    /// Returns the index of the bucket holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_index<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key)
            .map(|(bucket, _)| bucket)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns the number of entries sharing the bucket that holds `key`,
    /// `key` included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_size<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_index(key)?;
        Ok(self.table.chain_len(bucket))
    }

    fn position<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.position(hash, |(k, _)| k.borrow() == key)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new, empty map with 16 buckets using the default hasher
    /// builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Builds a map from parallel key and value sequences using the default
    /// hasher builder.
    ///
    /// See [`from_parallel_with_hasher`](Self::from_parallel_with_hasher).
    pub fn from_parallel<IK, IV>(keys: IK, values: IV) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        Self::from_parallel_with_hasher(keys, values, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Two maps are equal when they hold the same keys mapped to equal values.
/// Bucket layout, capacity and insertion order are irrelevant.
impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).is_ok_and(|other_v| v == other_v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Upserts every pair; later pairs win.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.upsert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only position inside a [`HashMap`].
///
/// See [`hash_table::Cursor`](crate::hash_table::Cursor) for the traversal
/// and equality rules.
pub struct Cursor<'a, K, V> {
    inner: crate::hash_table::Cursor<'a, (K, V)>,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns the `(bucket, offset)` pair this cursor points at.
    pub fn position(&self) -> (usize, usize) {
        self.inner.position()
    }

    /// Returns `true` if the cursor is at the end sentinel.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.inner.get().map(|(k, v)| (k, v))
    }

    /// Moves to the next entry.
    pub fn advance(&mut self) {
        self.inner.advance();
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
