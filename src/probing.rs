//! Probe sequences for collision resolution.
//!
//! A probing scheme turns a hash value into the ordered list of slots that
//! insert and lookup both walk. Because both paths derive the sequence from
//! the same `(hash, capacity)` pair, a concurrent insert and a later lookup of
//! the same key always agree on where the key can live.

use core::iter::FusedIterator;

use crate::hash::MurmurHash3;
use crate::params::Capacity;

/// A bounded walk over slot indices.
///
/// Yields exactly `capacity` indices, each index of `[0, capacity)` once,
/// then stops. Insert and lookup therefore never spin on a full table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeSequence {
  /// Next index to yield.
  current: usize,
  /// Distance between consecutive indices, coprime with `capacity`.
  step: usize,
  /// Upper bound; indices wrap around at this value.
  capacity: usize,
  /// Indices left to yield.
  remaining: usize,
}

impl ProbeSequence {
  /// Creates a sequence starting at `start` and advancing by `step`.
  ///
  /// Full coverage requires `gcd(step, capacity) == 1`; schemes in this
  /// module guarantee it.
  ///
  /// # Panics
  ///
  /// Panics if `start >= capacity`, or if `step` is zero or not below
  /// `capacity` (any non-zero step is accepted when `capacity` is 1).
  #[inline]
  pub const fn new(start: usize, step: usize, capacity: Capacity) -> Self {
    let capacity: usize = capacity.as_usize();

    assert!(start < capacity, "probe start out of bounds");
    assert!(step != 0 && (step < capacity || capacity == 1), "probe step out of bounds");

    Self {
      current: start,
      step,
      capacity,
      remaining: capacity,
    }
  }

  /// Returns the index the sequence starts from, before any advance.
  #[inline]
  pub const fn current(&self) -> usize {
    self.current
  }

  /// Returns the distance between consecutive indices.
  #[inline]
  pub const fn step(&self) -> usize {
    self.step
  }

  /// Returns the bound every yielded index stays below.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }
}

impl Iterator for ProbeSequence {
  type Item = usize;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }

    let index: usize = self.current;

    self.remaining -= 1;
    // `current < capacity` and `step < capacity` (or `capacity == 1`), and
    // `Capacity::MAX` leaves room for the sum.
    self.current = (self.current + self.step) % self.capacity;

    Some(index)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl ExactSizeIterator for ProbeSequence {}

impl FusedIterator for ProbeSequence {}

/// A collision resolution strategy.
///
/// Implementations must be deterministic: the same `(hash, capacity)` must
/// always produce the same sequence, built for the `capacity` passed in.
/// Tables reject a sequence built for any other capacity with a panic.
pub trait ProbingScheme: Copy + Send + Sync {
  /// Creates the probe sequence for a key with the given hash.
  fn probe(&self, hash: u64, capacity: Capacity) -> ProbeSequence;
}

#[inline]
fn start_index(hash: u64, capacity: Capacity) -> usize {
  // The remainder is below `capacity`, which fits in `usize`.
  (hash % capacity.as_usize() as u64) as usize
}

// -----------------------------------------------------------------------------
// Linear Probing
// -----------------------------------------------------------------------------

/// Visits `hash % capacity`, then every following slot in order.
///
/// Best cache behaviour at low load; clusters badly as the table fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinearProbing;

impl ProbingScheme for LinearProbing {
  #[inline]
  fn probe(&self, hash: u64, capacity: Capacity) -> ProbeSequence {
    ProbeSequence::new(start_index(hash, capacity), 1, capacity)
  }
}

// -----------------------------------------------------------------------------
// Double Hashing
// -----------------------------------------------------------------------------

/// Visits `hash % capacity`, then advances by a key-dependent step.
///
/// The step is derived from a second mix of the hash and lowered until it is
/// coprime with the capacity, so every capacity (not only primes) gets a
/// full-coverage sequence. Reduces clustering at high occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DoubleHashing;

impl DoubleHashing {
  const SALT: u64 = 0x9e37_79b9_7f4a_7c15;

  #[inline]
  fn step(hash: u64, capacity: usize) -> usize {
    if capacity <= 2 {
      return 1;
    }

    let mixed: u64 = MurmurHash3::fmix64(hash.rotate_left(32) ^ Self::SALT);
    let mut step: usize = (mixed % (capacity as u64 - 1)) as usize + 1;

    while gcd(step, capacity) != 1 {
      step -= 1;
    }

    step
  }
}

impl ProbingScheme for DoubleHashing {
  #[inline]
  fn probe(&self, hash: u64, capacity: Capacity) -> ProbeSequence {
    let step: usize = Self::step(hash, capacity.as_usize());

    ProbeSequence::new(start_index(hash, capacity), step, capacity)
  }
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
  while b != 0 {
    let t: usize = b;
    b = a % b;
    a = t;
  }

  a
}

