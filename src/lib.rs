//! A lock-free, fixed-capacity, open-addressing hash map with bulk
//! data-parallel operations.
//!
//! `dtab` provides [`StaticMap`], a hash map whose capacity is chosen once at
//! construction and never changes. It is built for workloads that insert and
//! look up large batches of keys at once: every bulk operation maps one
//! logical operation onto each input and runs them all in parallel.
//!
//! # Overview
//!
//! Keys and values are word-sized plain data (see [`Packed`]), stored side by
//! side in a flat array of slots. Two caller-chosen *sentinels* mark empty
//! slots: an empty-key sentinel and an empty-value sentinel. Neither may ever
//! be used as a real key or value.
//!
//! Collisions are resolved by open addressing. Each key has a fixed
//! [probe sequence](ProbeSequence) derived from its hash; inserts claim the
//! first empty slot on it with a single compare-and-swap, and lookups walk
//! the same sequence until they reach the key or an empty slot.
//!
//! Entries cannot be removed or updated. Once a key is stored, its value is
//! fixed until the map is [cleared](StaticMap::clear) or dropped.
//!
//! # Usage
//!
//! ```
//! use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
//!
//! // Create a map with 200 slots; -1 marks empty keys and values.
//! let map: StaticMap<i32, i32> = StaticMap::new(200, -1, -1)?;
//!
//! // Insert a batch of pairs.
//! let pairs: Vec<Pair<i32, i32>> = (0..100).map(|i| Pair::new(i, i * 10)).collect();
//! map.insert(&pairs, MurmurHash3::default(), DefaultKeyEqual);
//!
//! // Look up a batch of keys; absent keys report the empty-value sentinel.
//! let mut values: Vec<i32> = vec![0; 3];
//! map.find(&[7, 42, 500], &mut values, MurmurHash3::default(), DefaultKeyEqual)?;
//!
//! assert_eq!(values, [70, 420, -1]);
//! # Ok::<(), dtab::Error>(())
//! ```
//!
//! # Hashing and Equality
//!
//! The map never picks a hash function or an equality predicate on its own.
//! Both are passed to each operation, as a [`KeyHash`] and a [`KeyEqual`]:
//!
//! ```
//! use dtab::{Pair, StaticMap};
//!
//! let map: StaticMap<u64, u64> = StaticMap::new(64, u64::MAX, u64::MAX)?;
//!
//! let hash = |key: &u64| key.wrapping_mul(0x9e37_79b9_7f4a_7c15);
//! let equal = |lhs: &u64, rhs: &u64| lhs == rhs;
//!
//! map.insert(&[Pair::new(5, 50)], hash, equal);
//!
//! let mut found: [bool; 2] = [false; 2];
//! map.contains(&[5, 6], &mut found, hash, equal)?;
//!
//! assert_eq!(found, [true, false]);
//! # Ok::<(), dtab::Error>(())
//! ```
//!
//! All calls on the same map must use hash and equality functions that agree
//! with each other: keys that compare equal must hash equal.
//!
//! # Views
//!
//! For per-key access from your own parallel code, the map hands out two
//! lightweight, `Copy` handles: a [`DeviceView`] for lookups and a
//! [`DeviceMutableView`] that can also insert. Both borrow the map.
//!
//! ```
//! use dtab::{DefaultKeyEqual, IdentityHash, Pair, StaticMap};
//! use std::thread;
//!
//! let map: StaticMap<u32, u32> = StaticMap::new(1024, u32::MAX, u32::MAX)?;
//! let view = map.get_device_mutable_view();
//!
//! thread::scope(|scope| {
//!   for thread_id in 0..4 {
//!     scope.spawn(move || {
//!       for i in 0..100 {
//!         let key: u32 = thread_id * 100 + i;
//!         view.insert(Pair::new(key, key), &IdentityHash, &DefaultKeyEqual);
//!       }
//!     });
//!   }
//! });
//!
//! assert_eq!(map.get_size(), 400);
//! assert!(map.get_device_view().contains(&399, &IdentityHash, &DefaultKeyEqual));
//! # Ok::<(), dtab::Error>(())
//! ```
//!
//! # Concurrency
//!
//! Any number of threads may insert and look up at the same time. Inserts of
//! distinct keys never block each other; a lookup that races with the insert
//! of the same key may briefly wait for the value to be published.
//!
//! Lookups observe every insert that *happened before* them. A lookup racing
//! with an insert of its key may or may not see it.
//!
//! # Memory Layout
//!
//! Slots are 16 bytes and the backing array is aligned to
//! [`CACHE_LINE`], so each cache line holds [`CACHE_LINE_SLOTS`] slots. The
//! size counter is padded onto a line of its own.
//!
//! # Capacity Limits
//!
//! Capacity is bounded by [`Capacity::MIN`] and [`Capacity::MAX`] and used
//! exactly as given. When every slot on a key's probe sequence is taken, the
//! insert of that key fails; [`DeviceMutableView::try_insert`] reports this as
//! [`InsertError::Full`].
//!
//! [`CACHE_LINE`]: crate::config::CACHE_LINE
//! [`CACHE_LINE_SLOTS`]: crate::config::CACHE_LINE_SLOTS
//! [`Capacity::MAX`]: crate::config::Capacity::MAX
//! [`Capacity::MIN`]: crate::config::Capacity::MIN
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod array;
mod equal;
mod error;
mod hash;
mod packed;
mod padded;
mod params;
mod probing;
mod public;
mod slot;
mod table;
mod utils;
mod view;

#[cfg(test)]
mod tests;

pub mod dispatch;

pub(crate) use crate::utils::alloc;
pub(crate) use crate::utils::sync;

pub mod implementation {
  #![doc = include_str!("../IMPLEMENTATION.md")]
}

pub mod config {
  //! Configuration parameters which control table sizing and probing.

  pub use crate::params::CACHE_LINE;
  pub use crate::params::CACHE_LINE_SLOTS;
  pub use crate::params::Capacity;
  pub use crate::params::LoadFactor;
  pub use crate::probing::DoubleHashing;
  pub use crate::probing::LinearProbing;
  pub use crate::probing::ProbeSequence;
  pub use crate::probing::ProbingScheme;
}

#[doc(inline)]
pub use self::config::Capacity;

#[doc(inline)]
pub use self::config::LoadFactor;

#[doc(inline)]
pub use self::config::DoubleHashing;

#[doc(inline)]
pub use self::config::LinearProbing;

#[doc(inline)]
pub use self::config::ProbeSequence;

#[doc(inline)]
pub use self::config::ProbingScheme;

pub use self::equal::BitwiseEqual;
pub use self::equal::DefaultKeyEqual;
pub use self::equal::KeyEqual;

pub use self::error::Error;
pub use self::error::InsertError;

pub use self::hash::HashOutput;
pub use self::hash::IdentityHash;
pub use self::hash::KeyHash;
pub use self::hash::MurmurHash3;

pub use self::packed::Packed;
pub use self::packed::Pair;

pub use self::public::StaticMap;

pub use self::view::DeviceMutableView;
pub use self::view::DeviceView;
