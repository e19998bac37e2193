//! Non-owning handles over the backing array.
//!
//! A [`DeviceView`] can only query the table, a [`DeviceMutableView`] can
//! also insert. Both are `Copy`, cheap to pass into a parallel closure, and
//! borrow the owning [`StaticMap`], so the borrow checker ends their validity
//! together with the table.
//!
//! [`StaticMap`]: crate::StaticMap

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::ops::Deref;

use crate::equal::KeyEqual;
use crate::error::InsertError;
use crate::hash::HashOutput;
use crate::hash::KeyHash;
use crate::packed::Packed;
use crate::packed::Pair;
use crate::params::Capacity;
use crate::probing::ProbeSequence;
use crate::probing::ProbingScheme;
use crate::slot::EqualResult;
use crate::slot::Sentinel;
use crate::slot::Slot;
use crate::sync::atomic::AtomicUsize;
use crate::sync::atomic::Ordering::Relaxed;

// -----------------------------------------------------------------------------
// Device View
// -----------------------------------------------------------------------------

/// A read-only handle for per-key lookups.
///
/// Any number of threads may call [`find`] and [`contains`] on copies of the
/// same view at the same time, including while other threads insert.
///
/// # Visibility
///
/// A lookup observes every key whose insert *happened before* it, e.g. an
/// insert made by an earlier bulk operation, or by a thread that was joined.
/// A lookup that races with the insert of the same key may or may not see
/// it; callers needing a definite answer must finish inserting first.
///
/// [`find`]: DeviceView::find
/// [`contains`]: DeviceView::contains
pub struct DeviceView<'table, K, V, S> {
  slots: &'table [Slot],
  capacity: Capacity,
  sentinel: Sentinel<K, V>,
  scheme: S,
}

impl<'table, K, V, S> DeviceView<'table, K, V, S>
where
  K: Packed,
  V: Packed,
  S: ProbingScheme,
{
  #[inline]
  pub(crate) const fn new(
    slots: &'table [Slot],
    capacity: Capacity,
    sentinel: Sentinel<K, V>,
    scheme: S,
  ) -> Self {
    debug_assert!(slots.len() == capacity.as_usize(), "capacity mismatch");

    Self {
      slots,
      capacity,
      sentinel,
      scheme,
    }
  }

  /// Returns the number of slots in the backing array.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity.as_usize()
  }

  /// Returns the key that marks a slot as empty.
  #[inline]
  pub fn empty_key_sentinel(&self) -> K {
    self.sentinel.key()
  }

  /// Returns the value stored alongside the empty-key sentinel.
  #[inline]
  pub fn empty_value_sentinel(&self) -> V {
    self.sentinel.value()
  }

  /// Returns the probing scheme.
  #[inline]
  pub const fn probing_scheme(&self) -> &S {
    &self.scheme
  }

  /// Finds the pair stored under `key`.
  ///
  /// Walks the probe sequence of `key` and stops at the first empty slot or
  /// at the first key for which `equal(key, slot_key)` holds. Returns
  /// [`None`] if the key is absent.
  ///
  /// A key becomes visible before its value. If the matching slot was just
  /// claimed by a concurrent insert, `find` spins until that insert stores
  /// the value, so it waits on the inserting thread's progress.
  #[inline]
  pub fn find<H, E>(&self, key: &K, hash: &H, equal: &E) -> Option<Pair<K, V>>
  where
    H: KeyHash<K> + ?Sized,
    E: KeyEqual<K> + ?Sized,
  {
    for index in self.probe(key, hash) {
      let slot: &Slot = self.slot(index);
      let word: u64 = slot.key();

      match self.sentinel.compare(key, word, equal) {
        EqualResult::Empty => return None,
        EqualResult::Equal => {
          let value: u64 = slot.value(self.sentinel.value_word());
          return Some(Pair::new(K::from_word(word), V::from_word(value)));
        }
        EqualResult::Unequal => {}
      }
    }

    None
  }

  /// Returns `true` if `key` is present.
  ///
  /// Same walk as [`find`](Self::find), without reading the value.
  #[inline]
  pub fn contains<H, E>(&self, key: &K, hash: &H, equal: &E) -> bool
  where
    H: KeyHash<K> + ?Sized,
    E: KeyEqual<K> + ?Sized,
  {
    for index in self.probe(key, hash) {
      match self.sentinel.compare(key, self.slot(index).key(), equal) {
        EqualResult::Empty => return false,
        EqualResult::Equal => return true,
        EqualResult::Unequal => {}
      }
    }

    false
  }

  #[inline]
  fn probe<H>(&self, key: &K, hash: &H) -> ProbeSequence
  where
    H: KeyHash<K> + ?Sized,
  {
    let sequence: ProbeSequence = self.scheme.probe(hash.hash(key).to_u64(), self.capacity);

    assert_eq!(
      sequence.capacity(),
      self.capacity.as_usize(),
      "probe sequence built for a different capacity",
    );

    sequence
  }

  #[inline]
  fn slot(&self, index: usize) -> &'table Slot {
    debug_assert!(index < self.slots.len(), "probe index out of bounds");

    // SAFETY: `probe` rejects sequences built for any capacity but ours, and
    // a sequence only yields indices below its capacity, which is the length
    // of `slots`.
    unsafe { self.slots.get_unchecked(index) }
  }
}

impl<K, V, S> Clone for DeviceView<'_, K, V, S>
where
  S: Copy,
{
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V, S> Copy for DeviceView<'_, K, V, S> where S: Copy {}

impl<K, V, S> Debug for DeviceView<'_, K, V, S>
where
  K: Packed + Debug,
  V: Packed + Debug,
  S: Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("DeviceView")
      .field("capacity", &self.capacity)
      .field("sentinel", &self.sentinel)
      .field("scheme", &self.scheme)
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Device Mutable View
// -----------------------------------------------------------------------------

/// A read-write handle for per-key inserts and lookups.
///
/// Derefs to [`DeviceView`] for [`find`] and [`contains`].
///
/// [`find`]: DeviceView::find
/// [`contains`]: DeviceView::contains
pub struct DeviceMutableView<'table, K, V, S> {
  view: DeviceView<'table, K, V, S>,
  size: &'table AtomicUsize,
}

impl<'table, K, V, S> DeviceMutableView<'table, K, V, S>
where
  K: Packed,
  V: Packed,
  S: ProbingScheme,
{
  #[inline]
  pub(crate) const fn new(view: DeviceView<'table, K, V, S>, size: &'table AtomicUsize) -> Self {
    Self { view, size }
  }

  /// Returns the read-only view over the same storage.
  #[inline]
  pub const fn as_view(&self) -> DeviceView<'table, K, V, S> {
    self.view
  }

  /// Inserts `pair` unless its key is already present.
  ///
  /// Returns `true` if this call claimed a slot. Returns `false` if an equal
  /// key was found (the stored value is left untouched) *or* if every slot on
  /// the probe sequence is taken; use [`try_insert`](Self::try_insert) to
  /// tell the two apart.
  ///
  /// The key and value must not equal the table's sentinels.
  #[inline]
  pub fn insert<H, E>(&self, pair: Pair<K, V>, hash: &H, equal: &E) -> bool
  where
    H: KeyHash<K> + ?Sized,
    E: KeyEqual<K> + ?Sized,
  {
    self.try_insert(pair, hash, equal).is_ok()
  }

  /// Inserts `pair` unless its key is already present, reporting why an
  /// insert did not happen.
  ///
  /// Walks the probe sequence of the key. Each empty slot is claimed with a
  /// compare-and-swap of its key word; the winner then publishes the value
  /// and bumps the table size. A slot lost to a racing insert is re-examined
  /// like any occupied slot: an equal key ends the walk as a duplicate, a
  /// different key moves on to the next index.
  ///
  /// # Errors
  ///
  /// - [`InsertError::Duplicate`] if an equal key is present.
  /// - [`InsertError::Full`] if all `capacity` probed slots hold other keys.
  pub fn try_insert<H, E>(&self, pair: Pair<K, V>, hash: &H, equal: &E) -> Result<(), InsertError>
  where
    H: KeyHash<K> + ?Sized,
    E: KeyEqual<K> + ?Sized,
  {
    let empty: u64 = self.view.sentinel.key_word();
    let desired: u64 = pair.first.to_word();

    for index in self.view.probe(&pair.first, hash) {
      let slot: &Slot = self.view.slot(index);
      let mut current: u64 = slot.key();

      if self.view.sentinel.is_empty(current) {
        match slot.claim(empty, desired) {
          Ok(()) => {
            slot.publish(pair.second.to_word());
            self.size.fetch_add(1, Relaxed);
            return Ok(());
          }
          Err(occupant) => {
            current = occupant;
          }
        }
      }

      // Occupied slots never become empty again.
      if equal.equal(&pair.first, &K::from_word(current)) {
        return Err(InsertError::Duplicate);
      }
    }

    Err(InsertError::Full)
  }
}

impl<'table, K, V, S> Deref for DeviceMutableView<'table, K, V, S> {
  type Target = DeviceView<'table, K, V, S>;

  #[inline]
  fn deref(&self) -> &Self::Target {
    &self.view
  }
}

impl<K, V, S> Clone for DeviceMutableView<'_, K, V, S>
where
  S: Copy,
{
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K, V, S> Copy for DeviceMutableView<'_, K, V, S> where S: Copy {}

impl<K, V, S> Debug for DeviceMutableView<'_, K, V, S>
where
  K: Packed + Debug,
  V: Packed + Debug,
  S: Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("DeviceMutableView")
      .field("view", &self.view)
      .field("size", &self.size.load(Relaxed))
      .finish()
  }
}
