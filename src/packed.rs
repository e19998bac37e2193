//! Key and value representation.
//!
//! Every key and value is stored as the raw bit pattern of a 64-bit atomic
//! word. [`Packed`] marks the types for which that round trip is sound.

use core::mem::MaybeUninit;
use core::ptr;

/// A trivially copyable type whose bit pattern fits in one atomic word.
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// - `size_of::<Self>()` is between `1` and `8` bytes.
/// - The type contains no padding bytes, so every byte of a value is
///   initialized.
/// - Any bit pattern previously produced by [`Packed::to_word`] is a valid
///   value of the type.
///
/// The size requirement is also checked at compile time.
///
/// # Examples
///
/// ```
/// use dtab::Packed;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// #[repr(C)]
/// struct KeyPair {
///   a: i32,
///   b: i32,
/// }
///
/// // SAFETY: Two `i32` fields, 8 bytes, no padding.
/// unsafe impl Packed for KeyPair {}
///
/// let key: KeyPair = KeyPair { a: 1, b: 2 };
/// assert_eq!(KeyPair::from_word(key.to_word()), key);
/// ```
pub unsafe trait Packed: Copy + Send + Sync + 'static {
  #[doc(hidden)]
  const ASSERT_WORD: () = assert!(
    size_of::<Self>() != 0 && size_of::<Self>() <= size_of::<u64>(),
    "invalid key/value: type must be between 1 and 8 bytes",
  );

  /// Returns the bit pattern of `self`, zero-extended to a word.
  #[inline]
  fn to_word(self) -> u64 {
    let () = Self::ASSERT_WORD;

    let mut word: u64 = 0;

    // SAFETY: `Self` has no padding and is at most 8 bytes (`ASSERT_WORD`),
    // so the copy reads initialized bytes and stays within `word`.
    unsafe {
      ptr::copy_nonoverlapping(
        ptr::from_ref(&self).cast::<u8>(),
        ptr::from_mut(&mut word).cast::<u8>(),
        size_of::<Self>(),
      );
    }

    word
  }

  /// Reconstructs a value from a word produced by [`Packed::to_word`].
  #[inline]
  fn from_word(word: u64) -> Self {
    let () = Self::ASSERT_WORD;

    let mut value: MaybeUninit<Self> = MaybeUninit::uninit();

    // SAFETY: The copy length is `size_of::<Self>() <= 8`, within both the
    // source word and the destination.
    unsafe {
      ptr::copy_nonoverlapping(
        ptr::from_ref(&word).cast::<u8>(),
        value.as_mut_ptr().cast::<u8>(),
        size_of::<Self>(),
      );
    }

    // SAFETY: Implementors guarantee every pattern from `to_word` is valid
    // and all bytes were written above.
    unsafe { value.assume_init() }
  }
}

macro_rules! impl_packed {
  ($($ty:ty),+ $(,)?) => {
    $(
      // SAFETY: Primitive with no padding, 1 to 8 bytes, all bit patterns valid.
      unsafe impl Packed for $ty {}
    )+
  };
}

impl_packed!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

macro_rules! impl_packed_array {
  ($ty:ty; $($len:literal),+ $(,)?) => {
    $(
      // SAFETY: Arrays of padding-free primitives have no padding.
      unsafe impl Packed for [$ty; $len] {}
    )+
  };
}

impl_packed_array!(u8; 1, 2, 3, 4, 5, 6, 7, 8);
impl_packed_array!(u16; 1, 2, 3, 4);
impl_packed_array!(u32; 1, 2);
impl_packed_array!(i32; 1, 2);

// -----------------------------------------------------------------------------
// Pair
// -----------------------------------------------------------------------------

/// A key-value pair, the unit of insertion and the result of a lookup.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Pair<K, V> {
  pub first: K,
  pub second: V,
}

impl<K, V> Pair<K, V> {
  /// Creates a new pair.
  #[inline]
  pub const fn new(first: K, second: V) -> Self {
    Self { first, second }
  }

  /// Returns the pair as a tuple.
  #[inline]
  pub fn into_tuple(self) -> (K, V) {
    (self.first, self.second)
  }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
  #[inline]
  fn from((first, second): (K, V)) -> Self {
    Self { first, second }
  }
}
