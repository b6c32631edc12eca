use alloc::vec::Vec;
use core::fmt::Debug;

/// Number of buckets a freshly created table starts with.
pub const INITIAL_CAPACITY: usize = 1 << INITIAL_EXPONENT;

/// Load factor above which an insert doubles the bucket count.
pub const UPPER_LOAD_FACTOR: f64 = 0.75;

/// Load factor below which an erase halves the bucket count.
pub const LOWER_LOAD_FACTOR: f64 = 0.25;

const INITIAL_EXPONENT: u32 = 4;

#[inline(always)]
fn load_factor(populated: usize, capacity: usize) -> f64 {
    populated as f64 / capacity as f64
}

/// Direction of a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resize {
    Grow,
    Shrink,
}

/// A stored value together with the hash it was filed under.
///
/// The hash is cached so that resizing only has to re-mask it instead of
/// hashing the key again.
#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

/// Chain-length statistics for a table.
///
/// Only available with the `stats` feature or in tests.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets with no entries
    pub empty_buckets: usize,
    /// Length of the longest collision chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Empty buckets: {}/{} ({:.2}%)",
            self.empty_buckets,
            self.capacity,
            if self.capacity == 0 {
                0.0
            } else {
                (self.empty_buckets as f64 / self.capacity as f64) * 100.0
            }
        );
        println!("Longest chain: {}", self.longest_chain);
    }
}

/// Separately-chained bucket storage.
///
/// `HashTable<V>` owns an array of collision chains whose length is always a
/// power of two. It knows nothing about keys: every lookup takes a
/// precomputed hash and an equality predicate. The keyed
/// [`HashMap`](crate::HashMap) built on top of it is what hashes keys and
/// supplies those predicates.
///
/// A value lives in bucket `hash & (capacity - 1)`. Within a bucket values
/// keep the order they were pushed in.
///
/// The table only applies the load-factor policy when asked to through
/// [`grow_for_insert`](Self::grow_for_insert) and
/// [`shrink_if_underloaded`](Self::shrink_if_underloaded); callers decide
/// when those checks happen.
///
/// ## Example
///
/// ```rust
/// # use core::hash::BuildHasher;
/// # use std::hash::RandomState;
/// #
/// # use chain_hash::hash_table::HashTable;
/// #
/// let state = RandomState::new();
/// let mut table = HashTable::new();
///
/// let hash = state.hash_one("alice");
/// table.grow_for_insert();
/// table.push(hash, ("alice", 31));
///
/// assert_eq!(table.find(hash, |(name, _)| *name == "alice"), Some(&("alice", 31)));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Vec<Slot<V>>>,
    populated: usize,
    exponent: u32,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`INITIAL_CAPACITY`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.capacity(), 16);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_exponent(INITIAL_EXPONENT)
    }

    fn with_exponent(exponent: u32) -> Self {
        Self {
            buckets: Self::empty_buckets(1 << exponent),
            populated: 0,
            exponent,
        }
    }

    fn empty_buckets(capacity: usize) -> Vec<Vec<Slot<V>>> {
        (0..capacity).map(|_| Vec::new()).collect()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        load_factor(self.populated, self.capacity())
    }

    /// Maps a hash onto its bucket under the current capacity.
    #[inline(always)]
    pub fn bucket_of(&self, hash: u64) -> usize {
        hash as usize & (self.capacity() - 1)
    }

    /// Returns the length of the chain stored at `bucket`.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= capacity()`.
    pub fn chain_len(&self, bucket: usize) -> usize {
        self.buckets[bucket].len()
    }

    /// Locates the value matching `eq` in the chain selected by `hash`.
    ///
    /// Returns its `(bucket, offset)` position, which stays valid until the
    /// next push, removal, resize or clear.
    pub fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let bucket = self.bucket_of(hash);
        self.buckets[bucket]
            .iter()
            .position(|slot| slot.hash == hash && eq(&slot.value))
            .map(|offset| (bucket, offset))
    }

    /// Returns a reference to the value matching `eq`, if any.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (bucket, offset) = self.position(hash, eq)?;
        Some(&self.buckets[bucket][offset].value)
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (bucket, offset) = self.position(hash, eq)?;
        Some(&mut self.buckets[bucket][offset].value)
    }

    /// Returns the value at a position obtained from [`position`](Self::position).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn at(&self, (bucket, offset): (usize, usize)) -> &V {
        &self.buckets[bucket][offset].value
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut(&mut self, (bucket, offset): (usize, usize)) -> &mut V {
        &mut self.buckets[bucket][offset].value
    }

    /// Appends `value` to the tail of the chain selected by `hash`.
    ///
    /// No duplicate check and no resize happens here. Callers that need the
    /// load-factor guarantee call [`grow_for_insert`](Self::grow_for_insert)
    /// first.
    pub fn push(&mut self, hash: u64, value: V) -> &mut V {
        let bucket = self.bucket_of(hash);
        let chain = &mut self.buckets[bucket];
        chain.push(Slot { hash, value });
        self.populated += 1;

        let last = chain.len() - 1;
        &mut chain[last].value
    }

    /// Removes the value at `position`, keeping the order of the rest of its
    /// chain.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn remove_at(&mut self, (bucket, offset): (usize, usize)) -> V {
        let slot = self.buckets[bucket].remove(offset);
        self.populated -= 1;
        slot.value
    }

    /// Doubles the bucket count if one more value would push the load factor
    /// above [`UPPER_LOAD_FACTOR`].
    ///
    /// Returns `true` if the table grew.
    pub fn grow_for_insert(&mut self) -> bool {
        if load_factor(self.populated + 1, self.capacity()) > UPPER_LOAD_FACTOR {
            self.resize(Resize::Grow);
            return true;
        }
        false
    }

    /// Halves the bucket count if the load factor is below
    /// [`LOWER_LOAD_FACTOR`].
    ///
    /// There is no floor at [`INITIAL_CAPACITY`]: a sparse table keeps
    /// halving on every check down to a single bucket.
    ///
    /// Returns `true` if the table shrank.
    pub fn shrink_if_underloaded(&mut self) -> bool {
        if self.load_factor() < LOWER_LOAD_FACTOR {
            return self.resize(Resize::Shrink);
        }
        false
    }

    /// Rebuilds the bucket array at twice or half the current capacity and
    /// re-files every value under the new mask.
    ///
    /// Values are moved bucket by bucket in index order, so two values that
    /// end up sharing a chain keep their relative order.
    pub(crate) fn resize(&mut self, direction: Resize) -> bool {
        let exponent = match direction {
            Resize::Grow => self.exponent + 1,
            Resize::Shrink => self.exponent.saturating_sub(1),
        };
        if exponent == self.exponent {
            return false;
        }

        let old_capacity = self.capacity();
        let capacity = 1usize << exponent;
        let mask = capacity - 1;

        let mut buckets = Self::empty_buckets(capacity);
        for slot in self.buckets.drain(..).flatten() {
            buckets[slot.hash as usize & mask].push(slot);
        }

        self.buckets = buckets;
        self.exponent = exponent;

        log::debug!(
            "resized chained table ({direction:?}): {old_capacity} -> {capacity} buckets, {} entries",
            self.populated
        );
        true
    }

    /// Removes every value. The bucket count is left unchanged.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.populated = 0;
        log::trace!("cleared chained table of {} buckets", self.capacity());
    }

    /// Exchanges the contents of two tables without moving any values.
    ///
    /// [`HashMap::swap`](crate::HashMap::swap) uses this for its storage and
    /// swaps the hasher builders alongside it.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Returns a cursor at the first value, or at the end if the table is
    /// empty.
    pub fn begin(&self) -> Cursor<'_, V> {
        Cursor::begin(self)
    }

    /// Returns the end sentinel cursor, positioned at `(capacity, 0)`.
    pub fn end(&self) -> Cursor<'_, V> {
        Cursor::end(self)
    }

    /// Returns an iterator over all values in bucket order.
    ///
    /// Within a bucket values are yielded in the order they were pushed.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cursor: self.begin(),
            remaining: self.populated,
        }
    }

    /// Computes a histogram of chain lengths.
    ///
    /// Index `n` holds the number of buckets whose chain has exactly `n`
    /// values.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut bins = alloc::vec![0usize; longest + 1];
        for chain in &self.buckets {
            bins[chain.len()] += 1;
        }
        ChainHistogram { bins }
    }

    /// Returns chain statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            empty_buckets: self.buckets.iter().filter(|c| c.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.load_factor(),
        }
    }
}

/// Histogram of chain lengths, produced by [`HashTable::chain_histogram`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    /// `bins[n]` is the number of buckets holding exactly `n` values.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("chain histogram ({} buckets):", self.bins.iter().sum::<usize>());
        for (len, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// A resumable read-only position inside a [`HashTable`].
///
/// A cursor is a `(bucket, offset)` pair plus a shared borrow of its table.
/// The borrow keeps the table from being mutated for as long as the cursor
/// lives, so a cursor can never observe a resize or clear.
///
/// Two cursors compare equal only if they point into the same table instance
/// at the same position; cursors into equal-but-distinct tables are never
/// equal.
///
/// # Examples
///
/// ```rust
/// # use core::hash::BuildHasher;
/// # use std::hash::RandomState;
/// #
/// # use chain_hash::hash_table::HashTable;
/// #
/// let state = RandomState::new();
/// let mut table = HashTable::new();
/// for n in 0..3u32 {
///     table.push(state.hash_one(n), n);
/// }
///
/// let mut cursor = table.begin();
/// let mut seen = 0;
/// while cursor != table.end() {
///     assert!(cursor.get().is_some());
///     cursor.advance();
///     seen += 1;
/// }
/// assert_eq!(seen, 3);
/// ```
pub struct Cursor<'a, V> {
    table: &'a HashTable<V>,
    bucket: usize,
    offset: usize,
}

impl<V> Clone for Cursor<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Cursor<'_, V> {}

impl<V> Debug for Cursor<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("bucket", &self.bucket)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<V> PartialEq for Cursor<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table)
            && self.bucket == other.bucket
            && self.offset == other.offset
    }
}

impl<V> Eq for Cursor<'_, V> {}

impl<'a, V> Cursor<'a, V> {
    fn begin(table: &'a HashTable<V>) -> Self {
        let mut cursor = Self {
            table,
            bucket: 0,
            offset: 0,
        };
        cursor.skip_empty_buckets();
        cursor
    }

    fn end(table: &'a HashTable<V>) -> Self {
        Self {
            table,
            bucket: table.capacity(),
            offset: 0,
        }
    }

    fn skip_empty_buckets(&mut self) {
        while self.bucket < self.table.capacity() && self.table.buckets[self.bucket].is_empty() {
            self.bucket += 1;
        }
    }

    /// Returns the `(bucket, offset)` pair this cursor points at.
    pub fn position(&self) -> (usize, usize) {
        (self.bucket, self.offset)
    }

    /// Returns `true` if the cursor is at the end sentinel.
    pub fn is_end(&self) -> bool {
        self.bucket >= self.table.capacity()
    }

    /// Returns the value under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a V> {
        self.table
            .buckets
            .get(self.bucket)
            .and_then(|chain| chain.get(self.offset))
            .map(|slot| &slot.value)
    }

    /// Moves to the next value, crossing into the next non-empty bucket when
    /// the current chain is exhausted. Advancing the end cursor does nothing.
    pub fn advance(&mut self) {
        if self.is_end() {
            return;
        }

        self.offset += 1;
        if self.offset >= self.table.buckets[self.bucket].len() {
            self.offset = 0;
            self.bucket += 1;
            self.skip_empty_buckets();
        }
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.cursor.get()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> core::iter::FusedIterator for Iter<'_, V> {}
