//! Slot layout and the sentinel rules that give a slot its state.

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;

use crate::equal::KeyEqual;
use crate::packed::Packed;
use crate::packed::Pair;
use crate::sync::atomic::AtomicU64;
use crate::sync::atomic::Ordering::AcqRel;
use crate::sync::atomic::Ordering::Acquire;
use crate::sync::atomic::Ordering::Relaxed;
use crate::sync::atomic::Ordering::Release;
use crate::sync::relax;

// -----------------------------------------------------------------------------
// Slot
// -----------------------------------------------------------------------------

/// One key-value cell of the backing array.
///
/// The key word decides the slot state. The value word is written exactly
/// once, by the thread whose compare-and-swap claimed the key word.
#[repr(C, align(16))]
pub(crate) struct Slot {
  key: AtomicU64,
  value: AtomicU64,
}

impl Slot {
  #[inline]
  pub(crate) fn new(key: u64, value: u64) -> Self {
    Self {
      key: AtomicU64::new(key),
      value: AtomicU64::new(value),
    }
  }

  /// Loads the key word.
  ///
  /// Pairs with the successful compare-and-swap in [`Slot::claim`].
  #[inline]
  pub(crate) fn key(&self) -> u64 {
    self.key.load(Acquire)
  }

  /// Attempts to move the slot from EMPTY to OCCUPIED by `key`.
  ///
  /// On failure returns the key word that occupies the slot instead.
  #[inline]
  pub(crate) fn claim(&self, empty: u64, key: u64) -> Result<(), u64> {
    match self.key.compare_exchange(empty, key, AcqRel, Acquire) {
      Ok(_) => Ok(()),
      Err(current) => Err(current),
    }
  }

  /// Publishes the value word of a slot claimed by this thread.
  #[inline]
  pub(crate) fn publish(&self, value: u64) {
    self.value.store(value, Release);
  }

  /// Loads the value word once it differs from `empty`.
  ///
  /// A reader may observe a claimed key before the claiming thread has
  /// published the value; the wait ends with that thread's next store.
  #[inline]
  pub(crate) fn value(&self, empty: u64) -> u64 {
    loop {
      let value: u64 = self.value.load(Acquire);

      if value != empty {
        return value;
      }

      relax();
    }
  }

  /// Resets the slot to EMPTY. Requires exclusive access to the table.
  #[inline]
  pub(crate) fn reset(&self, key: u64, value: u64) {
    self.key.store(key, Relaxed);
    self.value.store(value, Relaxed);
  }
}

// -----------------------------------------------------------------------------
// Sentinels
// -----------------------------------------------------------------------------

/// Outcome of comparing a probe key against a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EqualResult {
  /// The slot holds the empty-key sentinel.
  Empty,
  /// The slot holds a key equal to the probe key.
  Equal,
  /// The slot holds a different key.
  Unequal,
}

/// The caller-chosen empty-key and empty-value sentinels.
///
/// Emptiness is decided by comparing bit patterns, never through the
/// caller's [`KeyEqual`], so a user predicate is only ever invoked on real
/// keys.
pub(crate) struct Sentinel<K, V> {
  key: u64,
  value: u64,
  marker: PhantomData<fn() -> Pair<K, V>>,
}

impl<K, V> Sentinel<K, V>
where
  K: Packed,
  V: Packed,
{
  #[inline]
  pub(crate) fn new(key: K, value: V) -> Self {
    Self {
      key: key.to_word(),
      value: value.to_word(),
      marker: PhantomData,
    }
  }

  #[inline]
  pub(crate) const fn key_word(&self) -> u64 {
    self.key
  }

  #[inline]
  pub(crate) const fn value_word(&self) -> u64 {
    self.value
  }

  #[inline]
  pub(crate) fn key(&self) -> K {
    K::from_word(self.key)
  }

  #[inline]
  pub(crate) fn value(&self) -> V {
    V::from_word(self.value)
  }

  #[inline]
  pub(crate) const fn is_empty(&self, word: u64) -> bool {
    word == self.key
  }

  /// Classifies `slot_word` relative to `probe`.
  ///
  /// The probe key is always the left-hand side of `equal`.
  #[inline]
  pub(crate) fn compare<E>(&self, probe: &K, slot_word: u64, equal: &E) -> EqualResult
  where
    E: KeyEqual<K> + ?Sized,
  {
    if self.is_empty(slot_word) {
      EqualResult::Empty
    } else if equal.equal(probe, &K::from_word(slot_word)) {
      EqualResult::Equal
    } else {
      EqualResult::Unequal
    }
  }
}

impl<K, V> Clone for Sentinel<K, V> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V> Copy for Sentinel<K, V> {}

impl<K, V> Debug for Sentinel<K, V>
where
  K: Packed + Debug,
  V: Packed + Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Sentinel")
      .field("key", &self.key())
      .field("value", &self.value())
      .finish()
  }
}
