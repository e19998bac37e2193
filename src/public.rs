use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;

use crate::equal::KeyEqual;
use crate::error::Error;
use crate::hash::KeyHash;
use crate::packed::Packed;
use crate::packed::Pair;
use crate::params::Capacity;
use crate::params::LoadFactor;
use crate::probing::LinearProbing;
use crate::probing::ProbingScheme;
use crate::table::Table;
use crate::view::DeviceMutableView;
use crate::view::DeviceView;

/// A fixed-capacity, lock-free, open-addressing hash map.
///
/// `StaticMap` stores up to `capacity` pairs of word-sized keys and values
/// and offers bulk operations that run data-parallel over their inputs.
/// Entries can be inserted but never removed individually, and the table
/// never grows.
///
/// See the [crate-level documentation][crate] for an overview and examples.
///
/// # Type Parameters
///
/// - `K`: The key type; see [`Packed`].
/// - `V`: The value type; see [`Packed`].
/// - `S`: The [`ProbingScheme`]. Defaults to [`LinearProbing`].
///
/// # Sentinels
///
/// Two caller-chosen values mark empty slots: the *empty-key sentinel* and
/// the *empty-value sentinel*. Neither may ever be inserted as a real key or
/// value. Inserting the empty-key sentinel is a silent no-op at best;
/// inserting the empty-value sentinel makes lookups of that key wait forever.
/// The table does not check for either.
///
/// # Examples
///
/// ```
/// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
///
/// let map: StaticMap<i32, i32> = StaticMap::new(200, -1, -1)?;
///
/// let pairs: Vec<Pair<i32, i32>> = (0..100).map(|i| Pair::new(i, i)).collect();
/// let inserted = map.insert(&pairs, MurmurHash3::default(), DefaultKeyEqual);
///
/// assert_eq!(inserted, 100);
/// assert_eq!(map.get_size(), 100);
/// # Ok::<(), dtab::Error>(())
/// ```
///
/// Custom probing with [`DoubleHashing`]:
///
/// ```
/// use dtab::{DoubleHashing, StaticMap};
///
/// let map: StaticMap<u64, u64, DoubleHashing> =
///   StaticMap::with_scheme(97, u64::MAX, u64::MAX, DoubleHashing)?;
///
/// assert_eq!(map.capacity(), 97);
/// # Ok::<(), dtab::Error>(())
/// ```
///
/// [`DoubleHashing`]: crate::DoubleHashing
#[repr(transparent)]
pub struct StaticMap<K, V, S = LinearProbing> {
  inner: Table<K, V, S>,
}

#[allow(clippy::needless_pass_by_value, reason = "functors are passed by value, like closures")]
impl<K, V, S> StaticMap<K, V, S>
where
  K: Packed,
  V: Packed,
  S: ProbingScheme,
{
  /// Creates a new map with exactly `capacity` slots.
  ///
  /// All slots start out empty. The capacity is used as given; it is not
  /// rounded to a power of two.
  ///
  /// # Errors
  ///
  /// - [`Error::InvalidCapacity`] if `capacity` is zero.
  /// - [`Error::CapacityOverflow`] if the backing array would not fit in the
  ///   address space.
  /// - [`Error::AllocFailed`] if the allocator cannot provide it.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{Error, StaticMap};
  ///
  /// let map: StaticMap<u32, u32> = StaticMap::new(1000, u32::MAX, u32::MAX)?;
  /// assert!(map.is_empty());
  ///
  /// let fail: Result<StaticMap<u32, u32>, Error> = StaticMap::new(0, u32::MAX, u32::MAX);
  /// assert_eq!(fail.err(), Some(Error::InvalidCapacity));
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn new(capacity: usize, empty_key: K, empty_value: V) -> Result<Self, Error>
  where
    S: Default,
  {
    Self::with_scheme(capacity, empty_key, empty_value, S::default())
  }

  /// Creates a new map with exactly `capacity` slots and the given probing
  /// scheme.
  ///
  /// # Errors
  ///
  /// See [`StaticMap::new`].
  #[inline]
  pub fn with_scheme(capacity: usize, empty_key: K, empty_value: V, scheme: S) -> Result<Self, Error> {
    Ok(Self {
      inner: Table::new(Capacity::try_new(capacity)?, empty_key, empty_value, scheme)?,
    })
  }

  /// Creates a new map sized to hold `elements` entries at `load_factor`.
  ///
  /// # Errors
  ///
  /// See [`Capacity::for_elements`] and [`StaticMap::new`].
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{LoadFactor, StaticMap};
  ///
  /// let map: StaticMap<u32, u32> =
  ///   StaticMap::with_load_factor(100, LoadFactor::HALF, u32::MAX, u32::MAX)?;
  ///
  /// assert_eq!(map.capacity(), 200);
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn with_load_factor(
    elements: usize,
    load_factor: LoadFactor,
    empty_key: K,
    empty_value: V,
  ) -> Result<Self, Error>
  where
    S: Default,
  {
    let capacity: Capacity = Capacity::for_elements(elements, load_factor)?;

    Ok(Self {
      inner: Table::new(capacity, empty_key, empty_value, S::default())?,
    })
  }

  /// Returns the number of slots in the map.
  ///
  /// This value is fixed for the lifetime of the map.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.inner.cap()
  }

  /// Returns the number of successful inserts since construction.
  ///
  /// Only exact once all concurrent inserts have finished; every bulk
  /// operation has finished by the time it returns.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
  ///
  /// let map: StaticMap<u32, u32> = StaticMap::new(16, u32::MAX, u32::MAX)?;
  /// assert_eq!(map.get_size(), 0);
  ///
  /// map.insert(&[Pair::new(1, 10), Pair::new(1, 11)], MurmurHash3::default(), DefaultKeyEqual);
  /// assert_eq!(map.get_size(), 1);
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn get_size(&self) -> usize {
    self.inner.len()
  }

  /// Returns `true` if no insert has succeeded yet.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  /// Returns the fraction of occupied slots.
  #[inline]
  #[expect(clippy::cast_precision_loss, reason = "approximate by nature")]
  pub fn load_factor(&self) -> f64 {
    self.get_size() as f64 / self.capacity() as f64
  }

  /// Returns the key that marks a slot as empty.
  #[inline]
  pub fn empty_key_sentinel(&self) -> K {
    self.inner.sentinel().key()
  }

  /// Returns the value [`find`](Self::find) reports for absent keys.
  #[inline]
  pub fn empty_value_sentinel(&self) -> V {
    self.inner.sentinel().value()
  }

  /// Returns the probing scheme.
  #[inline]
  pub fn probing_scheme(&self) -> &S {
    self.inner.scheme()
  }

  /// Inserts every pair of `pairs` whose key is not yet present.
  ///
  /// Pairs are processed in parallel and in no particular order. When
  /// several pairs share a key, exactly one of them is stored, and which
  /// one is unspecified. A pair is dropped without error if its probe
  /// sequence holds no empty slot.
  ///
  /// Returns the number of pairs that were stored.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
  ///
  /// let map: StaticMap<u32, u32> = StaticMap::new(4, u32::MAX, u32::MAX)?;
  /// let pairs: Vec<Pair<u32, u32>> = (0..8).map(|i| Pair::new(i, i)).collect();
  ///
  /// // Only four slots exist.
  /// assert_eq!(map.insert(&pairs, MurmurHash3::default(), DefaultKeyEqual), 4);
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn insert<H, E>(&self, pairs: &[Pair<K, V>], hash: H, equal: E) -> usize
  where
    H: KeyHash<K> + Sync,
    E: KeyEqual<K> + Sync,
  {
    self.inner.insert(pairs, &hash, &equal)
  }

  /// Inserts `pairs[i]` for every `i` where `pred(&stencil[i])` holds.
  ///
  /// Behaves like [`insert`](Self::insert) for the selected pairs; the
  /// others are skipped. Returns the number of pairs that were stored.
  ///
  /// # Errors
  ///
  /// Returns [`Error::LengthMismatch`] without inserting anything if
  /// `stencil` and `pairs` differ in length.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
  ///
  /// let map: StaticMap<u32, u32> = StaticMap::new(64, u32::MAX, u32::MAX)?;
  /// let pairs: Vec<Pair<u32, u32>> = (0..10).map(|i| Pair::new(i, i)).collect();
  /// let stencil: Vec<u32> = (0..10).collect();
  ///
  /// let inserted = map.insert_if(
  ///   &pairs,
  ///   &stencil,
  ///   |index: &u32| index % 2 == 0,
  ///   MurmurHash3::default(),
  ///   DefaultKeyEqual,
  /// )?;
  ///
  /// assert_eq!(inserted, 5);
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn insert_if<T, P, H, E>(
    &self,
    pairs: &[Pair<K, V>],
    stencil: &[T],
    pred: P,
    hash: H,
    equal: E,
  ) -> Result<usize, Error>
  where
    T: Sync,
    P: Fn(&T) -> bool + Sync,
    H: KeyHash<K> + Sync,
    E: KeyEqual<K> + Sync,
  {
    self.inner.insert_if(pairs, stencil, &pred, &hash, &equal)
  }

  /// Looks up every key of `keys` and writes the result to `output`.
  ///
  /// `output[i]` receives the value stored under `keys[i]`, or the
  /// [empty-value sentinel](Self::empty_value_sentinel) if the key is absent.
  ///
  /// # Errors
  ///
  /// Returns [`Error::LengthMismatch`] without writing anything if `keys`
  /// and `output` differ in length.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
  ///
  /// let map: StaticMap<i32, i32> = StaticMap::new(8, -1, -1)?;
  /// map.insert(&[Pair::new(3, 30)], MurmurHash3::default(), DefaultKeyEqual);
  ///
  /// let mut output: [i32; 2] = [0; 2];
  /// map.find(&[3, 4], &mut output, MurmurHash3::default(), DefaultKeyEqual)?;
  ///
  /// assert_eq!(output, [30, -1]);
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn find<H, E>(&self, keys: &[K], output: &mut [V], hash: H, equal: E) -> Result<(), Error>
  where
    H: KeyHash<K> + Sync,
    E: KeyEqual<K> + Sync,
  {
    self.inner.find(keys, output, &hash, &equal)
  }

  /// Tests every key of `keys` for presence and writes the result to
  /// `output`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::LengthMismatch`] without writing anything if `keys`
  /// and `output` differ in length.
  #[inline]
  pub fn contains<H, E>(&self, keys: &[K], output: &mut [bool], hash: H, equal: E) -> Result<(), Error>
  where
    H: KeyHash<K> + Sync,
    E: KeyEqual<K> + Sync,
  {
    self.inner.contains(keys, output, &hash, &equal)
  }

  /// Returns a copy of every stored pair, in slot order.
  ///
  /// Pairs inserted concurrently with this call may or may not appear.
  #[inline]
  pub fn retrieve_all(&self) -> Vec<Pair<K, V>> {
    self.inner.retrieve_all()
  }

  /// Removes every entry, keeping the allocation and the sentinels.
  ///
  /// # Examples
  ///
  /// ```
  /// use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap};
  ///
  /// let mut map: StaticMap<u32, u32> = StaticMap::new(8, u32::MAX, u32::MAX)?;
  /// map.insert(&[Pair::new(1, 1)], MurmurHash3::default(), DefaultKeyEqual);
  ///
  /// map.clear();
  /// assert!(map.is_empty());
  /// assert!(map.retrieve_all().is_empty());
  /// # Ok::<(), dtab::Error>(())
  /// ```
  #[inline]
  pub fn clear(&mut self) {
    self.inner.clear();
  }

  /// Returns a read-only handle for per-key lookups.
  #[inline]
  pub fn get_device_view(&self) -> DeviceView<'_, K, V, S> {
    self.inner.view()
  }

  /// Returns a handle for per-key inserts and lookups.
  ///
  /// The handle is `Copy`, so it can be moved into any number of parallel
  /// tasks. Inserts through it update [`get_size`](Self::get_size).
  #[inline]
  pub fn get_device_mutable_view(&self) -> DeviceMutableView<'_, K, V, S> {
    self.inner.view_mut()
  }
}

impl<K, V, S> Debug for StaticMap<K, V, S>
where
  K: Packed + Debug,
  V: Packed + Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&self.inner, f)
  }
}
