use alloc::string::String;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::ops::Deref;

use crate::error::Result;
use crate::hash_map::HashMap;
use crate::map::StrictMap;

/// A `String`-to-`String` [`HashMap`] with stricter erase semantics and bulk
/// updates.
///
/// All read-only operations are available through `Deref`. Mutation goes
/// through the methods on `Dictionary` itself so that [`erase`](Self::erase)
/// cannot be bypassed by accident; [`as_map_mut`](Self::as_map_mut) hands out
/// the underlying map when the permissive contract is wanted.
///
/// # Examples
///
/// ```rust
/// # use std::hash::RandomState;
/// #
/// # use chain_hash::Dictionary;
/// # use chain_hash::Error;
/// #
/// let mut dict: Dictionary<RandomState> = Dictionary::new();
/// dict.update([("lang", "C++"), ("lang", "Rust")]);
/// assert_eq!(dict.get("lang").map(String::as_str), Ok("Rust"));
///
/// assert_eq!(dict.erase("missing"), Err(Error::KeyNotFound));
/// assert_eq!(dict.erase("lang"), Ok(()));
/// assert!(dict.is_empty());
/// ```
#[derive(Clone)]
pub struct Dictionary<S> {
    map: HashMap<String, String, S>,
}

impl<S> Debug for Dictionary<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.map.fmt(f)
    }
}

impl<S> Deref for Dictionary<S> {
    type Target = HashMap<String, String, S>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<S> Dictionary<S> {
    /// Returns the underlying map.
    pub fn as_map(&self) -> &HashMap<String, String, S> {
        &self.map
    }

    /// Returns the underlying map mutably, with its boolean
    /// [`erase`](HashMap::erase).
    pub fn as_map_mut(&mut self) -> &mut HashMap<String, String, S> {
        &mut self.map
    }

    /// Unwraps the dictionary into its underlying map.
    pub fn into_inner(self) -> HashMap<String, String, S> {
        self.map
    }

    /// Removes all entries, keeping the bucket count.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<S> Dictionary<S>
where
    S: BuildHasher,
{
    /// Creates an empty dictionary with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Builds a dictionary from parallel key and value sequences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`](crate::Error::LengthMismatch) if the
    /// sequences differ in length.
    pub fn from_parallel_with_hasher<IK, IV>(keys: IK, values: IV, hash_builder: S) -> Result<Self>
    where
        IK: IntoIterator,
        IK::Item: Into<String>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator,
        IV::Item: Into<String>,
        IV::IntoIter: ExactSizeIterator,
    {
        Ok(Self {
            map: HashMap::from_parallel_with_hasher(
                keys.into_iter().map(Into::<String>::into),
                values.into_iter().map(Into::<String>::into),
                hash_builder,
            )?,
        })
    }

    /// Inserts `key` if absent. Returns `false` if it was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.map.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, inserting an empty string first if the
    /// key is absent.
    pub fn index(&mut self, key: impl Into<String>) -> &mut String {
        self.map.index(key.into())
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key
    /// is absent.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut String> {
        self.map.get_mut(key)
    }

    /// Removes `key`.
    ///
    /// Unlike [`HashMap::erase`], a missing key is an error rather than a
    /// `false` return, and the dictionary is left untouched. A successful
    /// erase applies the same shrink checks as the underlying map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key
    /// is absent.
    pub fn erase(&mut self, key: &str) -> Result<()> {
        StrictMap::erase_strict(self, key)
    }

    /// Sets `dict[key] = value` for every pair, in order.
    ///
    /// Existing keys are overwritten and new keys are inserted, so when a key
    /// repeats the last value wins. An empty input does nothing.
    pub fn update<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            *self.map.index(key.into()) = value.into();
        }
    }
}

impl<S> Dictionary<S>
where
    S: BuildHasher + Default,
{
    /// Creates an empty dictionary using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Builds a dictionary from parallel key and value sequences using the
    /// default hasher builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`](crate::Error::LengthMismatch) if the
    /// sequences differ in length.
    pub fn from_parallel<IK, IV>(keys: IK, values: IV) -> Result<Self>
    where
        IK: IntoIterator,
        IK::Item: Into<String>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator,
        IV::Item: Into<String>,
        IV::IntoIter: ExactSizeIterator,
    {
        Self::from_parallel_with_hasher(keys, values, S::default())
    }
}

impl<S> Default for Dictionary<S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> PartialEq for Dictionary<S>
where
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<S> Eq for Dictionary<S> where S: BuildHasher {}

impl<S> From<HashMap<String, String, S>> for Dictionary<S> {
    fn from(map: HashMap<String, String, S>) -> Self {
        Self { map }
    }
}
