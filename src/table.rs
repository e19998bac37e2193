//! Core table implementation.
//!
//! Owns the backing array and the size counter and maps every bulk
//! operation onto per-key view calls through [`dispatch`].

use core::fmt::Debug;
use core::fmt::DebugMap;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;

use tracing::debug;

use crate::array::Array;
use crate::dispatch;
use crate::equal::KeyEqual;
use crate::error::Error;
use crate::error::check_len;
use crate::hash::KeyHash;
use crate::packed::Packed;
use crate::packed::Pair;
use crate::padded::CachePadded;
use crate::params::Capacity;
use crate::probing::ProbingScheme;
use crate::slot::Sentinel;
use crate::slot::Slot;
use crate::sync::atomic::AtomicUsize;
use crate::sync::atomic::Ordering::Relaxed;
use crate::view::DeviceMutableView;
use crate::view::DeviceView;

// -----------------------------------------------------------------------------
// Table State
// -----------------------------------------------------------------------------

#[repr(C)]
pub(crate) struct Table<K, V, S> {
  volatile: CachePadded<Volatile>,
  readonly: CachePadded<ReadOnly<K, V, S>>,
}

impl<K, V, S> Table<K, V, S>
where
  K: Packed,
  V: Packed,
  S: ProbingScheme,
{
  #[track_caller]
  #[inline]
  pub(crate) fn new(capacity: Capacity, empty_key: K, empty_value: V, scheme: S) -> Result<Self, Error> {
    let this: Self = Self {
      volatile: CachePadded::new(Volatile::new()),
      readonly: CachePadded::new(ReadOnly::new(capacity, Sentinel::new(empty_key, empty_value), scheme)?),
    };

    debug!(
      capacity = capacity.as_usize(),
      bytes = this.readonly.slots.bytes(),
      "allocated table"
    );

    Ok(this)
  }

  #[track_caller]
  #[inline]
  pub(crate) fn cap(&self) -> usize {
    self.readonly.slots.len().as_usize()
  }

  #[track_caller]
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.volatile.entries.load(Relaxed)
  }

  #[track_caller]
  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[track_caller]
  #[inline]
  pub(crate) fn sentinel(&self) -> Sentinel<K, V> {
    self.readonly.sentinel
  }

  #[track_caller]
  #[inline]
  pub(crate) fn scheme(&self) -> &S {
    &self.readonly.scheme
  }

  #[track_caller]
  #[inline]
  pub(crate) fn view(&self) -> DeviceView<'_, K, V, S> {
    DeviceView::new(
      self.readonly.slots.as_slice(),
      self.readonly.slots.len(),
      self.readonly.sentinel,
      self.readonly.scheme,
    )
  }

  #[track_caller]
  #[inline]
  pub(crate) fn view_mut(&self) -> DeviceMutableView<'_, K, V, S> {
    DeviceMutableView::new(self.view(), &self.volatile.entries)
  }

  // ---------------------------------------------------------------------------
  // Bulk Operations
  // ---------------------------------------------------------------------------

  #[track_caller]
  #[inline]
  pub(crate) fn insert<H, E>(&self, pairs: &[Pair<K, V>], hash: &H, equal: &E) -> usize
  where
    H: KeyHash<K> + Sync + ?Sized,
    E: KeyEqual<K> + Sync + ?Sized,
  {
    let view: DeviceMutableView<'_, K, V, S> = self.view_mut();
    let inserted: usize = dispatch::count(pairs.len(), |index| view.insert(pairs[index], hash, equal));

    debug!(attempted = pairs.len(), inserted, "bulk insert");

    inserted
  }

  #[track_caller]
  #[inline]
  pub(crate) fn insert_if<T, P, H, E>(
    &self,
    pairs: &[Pair<K, V>],
    stencil: &[T],
    pred: &P,
    hash: &H,
    equal: &E,
  ) -> Result<usize, Error>
  where
    T: Sync,
    P: Fn(&T) -> bool + Sync + ?Sized,
    H: KeyHash<K> + Sync + ?Sized,
    E: KeyEqual<K> + Sync + ?Sized,
  {
    check_len(pairs.len(), stencil.len())?;

    let view: DeviceMutableView<'_, K, V, S> = self.view_mut();
    let inserted: usize = dispatch::count(pairs.len(), |index| {
      pred(&stencil[index]) && view.insert(pairs[index], hash, equal)
    });

    debug!(attempted = pairs.len(), inserted, "bulk conditional insert");

    Ok(inserted)
  }

  #[track_caller]
  #[inline]
  pub(crate) fn find<H, E>(&self, keys: &[K], output: &mut [V], hash: &H, equal: &E) -> Result<(), Error>
  where
    H: KeyHash<K> + Sync + ?Sized,
    E: KeyEqual<K> + Sync + ?Sized,
  {
    let view: DeviceView<'_, K, V, S> = self.view();
    let empty: V = self.readonly.sentinel.value();

    dispatch::map_into(keys, output, |key| {
      view.find(key, hash, equal).map_or(empty, |pair| pair.second)
    })?;

    debug!(keys = keys.len(), "bulk find");

    Ok(())
  }

  #[track_caller]
  #[inline]
  pub(crate) fn contains<H, E>(&self, keys: &[K], output: &mut [bool], hash: &H, equal: &E) -> Result<(), Error>
  where
    H: KeyHash<K> + Sync + ?Sized,
    E: KeyEqual<K> + Sync + ?Sized,
  {
    let view: DeviceView<'_, K, V, S> = self.view();

    dispatch::map_into(keys, output, |key| view.contains(key, hash, equal))?;

    debug!(keys = keys.len(), "bulk contains");

    Ok(())
  }

  // ---------------------------------------------------------------------------
  // Maintenance
  // ---------------------------------------------------------------------------

  /// Returns every occupied pair in slot order.
  ///
  /// Concurrent inserts may or may not be reflected.
  #[track_caller]
  pub(crate) fn retrieve_all(&self) -> Vec<Pair<K, V>> {
    let sentinel: Sentinel<K, V> = self.readonly.sentinel;
    let mut pairs: Vec<Pair<K, V>> = Vec::with_capacity(self.len());

    for slot in self.readonly.slots.as_slice() {
      let key: u64 = slot.key();

      if !sentinel.is_empty(key) {
        let value: u64 = slot.value(sentinel.value_word());
        pairs.push(Pair::new(K::from_word(key), V::from_word(value)));
      }
    }

    pairs
  }

  /// Resets every slot to empty. Requires exclusive access.
  #[track_caller]
  pub(crate) fn clear(&mut self) {
    let cleared: usize = self.len();
    let key: u64 = self.readonly.sentinel.key_word();
    let value: u64 = self.readonly.sentinel.value_word();
    let slots: &[Slot] = self.readonly.slots.as_slice();

    dispatch::for_each(slots.len(), |index| slots[index].reset(key, value));

    self.volatile.entries.store(0, Relaxed);

    debug!(cleared, "cleared table");
  }
}

impl<K, V, S> Debug for Table<K, V, S>
where
  K: Packed + Debug,
  V: Packed + Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let mut debug: DebugMap<'_, '_> = f.debug_map();
    let sentinel: Sentinel<K, V> = self.readonly.sentinel;

    for slot in self.readonly.slots.as_slice() {
      let key: u64 = slot.key();

      if !sentinel.is_empty(key) {
        debug.entry(
          &K::from_word(key),
          &V::from_word(slot.value(sentinel.value_word())),
        );
      }
    }

    debug.finish()
  }
}

// -----------------------------------------------------------------------------
// Volatile State
// -----------------------------------------------------------------------------

/// Mutable table state modified during operations.
///
/// Isolated from [`ReadOnly`] via cache padding to avoid false sharing.
#[repr(C)]
struct Volatile {
  /// Number of successful inserts since construction or the last clear.
  entries: AtomicUsize,
}

impl Volatile {
  #[inline]
  fn new() -> Self {
    Self {
      entries: AtomicUsize::new(0),
    }
  }
}

// -----------------------------------------------------------------------------
// Read-only State
// -----------------------------------------------------------------------------

/// Table state fixed at construction.
///
/// Individual slots are modified atomically, but the array never resizes.
#[repr(C)]
struct ReadOnly<K, V, S> {
  slots: Array<Slot>,
  sentinel: Sentinel<K, V>,
  scheme: S,
}

impl<K, V, S> ReadOnly<K, V, S>
where
  K: Packed,
  V: Packed,
{
  #[inline]
  fn new(capacity: Capacity, sentinel: Sentinel<K, V>, scheme: S) -> Result<Self, Error> {
    let key: u64 = sentinel.key_word();
    let value: u64 = sentinel.value_word();

    let slots: Array<Slot> = Array::new(capacity, |_, slot| {
      slot.write(Slot::new(key, value));
    })?;

    Ok(Self {
      slots,
      sentinel,
      scheme,
    })
  }
}
