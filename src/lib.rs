#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A separately-chained HashMap.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value interface with configurable hashers, boolean insert/erase and
/// fallible lookups.
pub mod hash_map;

/// Chained bucket storage, its resize policy, and cursors over it.
pub mod hash_table;

/// The strict `String`-to-`String` dictionary.
pub mod dictionary;

pub mod map;

mod error;

pub use dictionary::Dictionary;
pub use error::Error;
pub use error::Result;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use hash_table::INITIAL_CAPACITY;
pub use hash_table::LOWER_LOAD_FACTOR;
pub use hash_table::UPPER_LOAD_FACTOR;
pub use map::Map;
pub use map::StrictMap;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
