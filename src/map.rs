//! Capability traits shared by [`HashMap`] and [`Dictionary`].
//!
//! [`Map`] is the permissive contract: erasing a missing key reports `false`.
//! [`StrictMap`] narrows that into an error, built on top of [`Map::erase`]
//! rather than replacing it.

use alloc::string::String;
use core::borrow::Borrow;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::dictionary::Dictionary;
use crate::error::Error;
use crate::error::Result;
use crate::hash_map::HashMap;

/// A key-value container whose erase reports a miss with `false`.
pub trait Map<K, V> {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is present.
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Inserts `key` if absent. Returns `false` if it was already present.
    fn insert(&mut self, key: K, value: V) -> bool;

    /// Removes `key`. Returns `false` if it was absent.
    fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

/// A [`Map`] whose erase fails loudly on a miss.
pub trait StrictMap<K, V>: Map<K, V> {
    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is absent. The container is
    /// not touched in that case, so no shrink happens either.
    fn erase_strict<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.contains_key(key) {
            return Err(Error::KeyNotFound);
        }
        let erased = self.erase(key);
        debug_assert!(erased);
        Ok(())
    }
}

impl<K, V, S> Map<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        HashMap::contains_key(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        HashMap::insert(self, key, value)
    }

    fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        HashMap::erase(self, key)
    }
}

impl<S> Map<String, String> for Dictionary<S>
where
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.as_map().len()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.as_map().contains_key(key)
    }

    fn insert(&mut self, key: String, value: String) -> bool {
        Dictionary::insert(self, key, value)
    }

    fn erase<Q>(&mut self, key: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.as_map_mut().erase(key)
    }
}

impl<S> StrictMap<String, String> for Dictionary<S> where S: BuildHasher {}
