//! Hash functors.
//!
//! The table never hashes on its own: every operation that touches the
//! backing array takes a [`KeyHash`] explicitly. Any `Fn(&K) -> u64`
//! qualifies; the types here are ready-made alternatives.

use crate::packed::Packed;

/// Marker trait for valid hash outputs.
///
/// Only `u32` and `u64` implement this trait.
pub trait HashOutput: Copy + private::Sealed {
  /// Widens the hash value for use in probe arithmetic.
  fn to_u64(self) -> u64;
}

impl HashOutput for u32 {
  #[inline]
  fn to_u64(self) -> u64 {
    u64::from(self)
  }
}

impl HashOutput for u64 {
  #[inline]
  fn to_u64(self) -> u64 {
    self
  }
}

mod private {
  pub trait Sealed {}

  impl Sealed for u32 {}
  impl Sealed for u64 {}
}

/// A hash function over keys of type `K`.
///
/// Implementations must be pure and consistent with the equality predicate
/// used alongside them: keys that compare equal must hash equal.
pub trait KeyHash<K: ?Sized> {
  type Output: HashOutput;

  /// Hashes `key`.
  fn hash(&self, key: &K) -> Self::Output;
}

impl<K, F> KeyHash<K> for F
where
  K: ?Sized,
  F: Fn(&K) -> u64,
{
  type Output = u64;

  #[inline]
  fn hash(&self, key: &K) -> Self::Output {
    self(key)
  }
}

// -----------------------------------------------------------------------------
// Identity
// -----------------------------------------------------------------------------

/// Returns integer keys unchanged.
///
/// A perfect hash when the keys are dense in `[0, capacity)`, and a terrible
/// one otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityHash;

macro_rules! impl_identity_hash {
  ($output:ty => $($ty:ty),+ $(,)?) => {
    $(
      impl KeyHash<$ty> for IdentityHash {
        type Output = $output;

        #[inline]
        #[allow(clippy::cast_sign_loss, clippy::cast_lossless, clippy::unnecessary_cast)]
        fn hash(&self, key: &$ty) -> Self::Output {
          *key as $output
        }
      }
    )+
  };
}

impl_identity_hash!(u32 => u8, u16, u32, i8, i16, i32);
impl_identity_hash!(u64 => u64, i64, usize, isize);

// -----------------------------------------------------------------------------
// MurmurHash3
// -----------------------------------------------------------------------------

/// The 64-bit finalizer of MurmurHash3, applied to the key's bit pattern.
///
/// Cheap and well mixed for keys that fit in a single word, which is every
/// key the table can store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MurmurHash3 {
  seed: u64,
}

impl MurmurHash3 {
  /// Creates a hasher whose output is perturbed by `seed`.
  #[inline]
  pub const fn new(seed: u64) -> Self {
    Self { seed }
  }

  /// Finalization mix; forces all bits of `value` to avalanche.
  #[inline]
  pub const fn fmix64(mut value: u64) -> u64 {
    value ^= value >> 33;
    value = value.wrapping_mul(0xff51_afd7_ed55_8ccd);
    value ^= value >> 33;
    value = value.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    value ^= value >> 33;
    value
  }
}

impl<K> KeyHash<K> for MurmurHash3
where
  K: Packed,
{
  type Output = u64;

  #[inline]
  fn hash(&self, key: &K) -> Self::Output {
    Self::fmix64(key.to_word() ^ self.seed)
  }
}
