use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::num::NonZeroUsize;

use crate::error::Error;
use crate::padded::CachePadded;
use crate::slot::Slot;

// -----------------------------------------------------------------------------
// Cache-line Properties
// -----------------------------------------------------------------------------

/// The size of a cache line in bytes.
///
/// The backing array is aligned to this boundary and the size counter is
/// padded to it, so slot traffic and counter traffic never share a line.
pub const CACHE_LINE: usize = size_of::<CachePadded<u8>>();

/// The number of slots that fit in a single cache line.
pub const CACHE_LINE_SLOTS: usize = CACHE_LINE / size_of::<Slot>();

const _: () = assert!(
  CACHE_LINE.is_power_of_two(),
  "invalid params: `CACHE_LINE` must be a power of two",
);

const _: () = assert!(
  CACHE_LINE.is_multiple_of(align_of::<Slot>()),
  "invalid params: `CACHE_LINE` must be a multiple of slot alignment",
);

// -----------------------------------------------------------------------------
// Capacity
// -----------------------------------------------------------------------------

/// A validated table capacity: the exact number of slots in the backing
/// array.
///
/// Unlike many hash tables, the capacity is used as given. It is never
/// rounded up, so a table built with a capacity of `200` probes modulo `200`.
///
/// ```
/// use dtab::Capacity;
///
/// assert_eq!(Capacity::new(200).map(Capacity::as_usize), Some(200));
/// assert_eq!(Capacity::new(0), None);
/// ```
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Capacity {
  inner: NonZeroUsize,
}

impl Capacity {
  /// The smallest valid capacity.
  pub const MIN: Self = Self {
    inner: NonZeroUsize::MIN,
  };

  /// The largest capacity whose backing array is still a valid allocation
  /// layout.
  pub const MAX: Self = {
    let bytes: usize = isize::MAX as usize - (CACHE_LINE - 1);

    let Some(inner) = NonZeroUsize::new(bytes / size_of::<Slot>()) else {
      panic!("invalid params: slot size exceeds address space");
    };

    Self { inner }
  };

  /// Creates a new capacity.
  ///
  /// Returns [`None`] if `value` is zero or larger than [`Capacity::MAX`].
  #[inline]
  pub const fn new(value: usize) -> Option<Self> {
    if value > Self::MAX.as_usize() {
      return None;
    }

    match NonZeroUsize::new(value) {
      Some(inner) => Some(Self { inner }),
      None => None,
    }
  }

  /// Creates a new capacity, reporting why `value` was rejected.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvalidCapacity`] for zero and
  /// [`Error::CapacityOverflow`] for values above [`Capacity::MAX`].
  #[inline]
  pub const fn try_new(value: usize) -> Result<Self, Error> {
    match Self::new(value) {
      Some(this) => Ok(this),
      None if value == 0 => Err(Error::InvalidCapacity),
      None => Err(Error::CapacityOverflow),
    }
  }

  /// Computes the capacity needed to hold `elements` entries at the given
  /// load factor, i.e. `ceil(elements / load_factor)`.
  ///
  /// ```
  /// use dtab::{Capacity, LoadFactor};
  ///
  /// let half = LoadFactor::new(0.5).unwrap();
  /// let capacity = Capacity::for_elements(100, half).unwrap();
  ///
  /// assert_eq!(capacity.as_usize(), 200);
  /// ```
  ///
  /// # Errors
  ///
  /// Returns [`Error::CapacityOverflow`] if the result exceeds
  /// [`Capacity::MAX`].
  #[expect(clippy::cast_precision_loss, reason = "rounding is absorbed by `ceil`")]
  pub fn for_elements(elements: usize, load_factor: LoadFactor) -> Result<Self, Error> {
    let required: f64 = (elements as f64 / load_factor.get()).ceil();

    if required >= Self::MAX.as_usize() as f64 {
      return Err(Error::CapacityOverflow);
    }

    #[expect(clippy::cast_sign_loss, reason = "quotient of non-negative values")]
    let required: usize = required as usize;

    Self::try_new(required.max(1))
  }

  /// Returns the capacity as a primitive type.
  #[inline]
  pub const fn as_usize(self) -> usize {
    self.inner.get()
  }

  /// Returns the capacity as a [`NonZeroUsize`].
  #[inline]
  pub const fn as_nonzero(self) -> NonZeroUsize {
    self.inner
  }
}

impl Debug for Capacity {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(&self.inner, f)
  }
}

impl Display for Capacity {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(&self.inner, f)
  }
}

impl From<Capacity> for NonZeroUsize {
  #[inline]
  fn from(other: Capacity) -> Self {
    other.as_nonzero()
  }
}

impl From<Capacity> for usize {
  #[inline]
  fn from(other: Capacity) -> Self {
    other.as_usize()
  }
}

impl TryFrom<usize> for Capacity {
  type Error = Error;

  #[inline]
  fn try_from(other: usize) -> Result<Self, Self::Error> {
    Self::try_new(other)
  }
}

// -----------------------------------------------------------------------------
// Load Factor
// -----------------------------------------------------------------------------

/// Ratio of expected entries to slots, in `(0, 1]`.
///
/// Open addressing degrades quickly as the table fills; `0.5` is a good
/// default for insert-heavy workloads.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct LoadFactor {
  inner: f64,
}

impl LoadFactor {
  /// Half of the slots occupied.
  pub const HALF: Self = Self { inner: 0.5 };

  /// Creates a new load factor.
  ///
  /// Returns [`None`] unless `value` is finite and within `(0, 1]`.
  #[inline]
  pub fn new(value: f64) -> Option<Self> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
      Some(Self { inner: value })
    } else {
      None
    }
  }

  /// Returns the ratio as a primitive type.
  #[inline]
  pub const fn get(self) -> f64 {
    self.inner
  }
}

impl Default for LoadFactor {
  #[inline]
  fn default() -> Self {
    Self::HALF
  }
}

impl TryFrom<f64> for LoadFactor {
  type Error = Error;

  #[inline]
  fn try_from(other: f64) -> Result<Self, Self::Error> {
    Self::new(other).ok_or(Error::InvalidLoadFactor)
  }
}
