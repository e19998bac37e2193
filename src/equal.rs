//! Key equality functors.

use crate::packed::Packed;

/// An equality predicate over keys of type `K`.
///
/// The table calls `equal(probe_key, slot_key)`: the key being searched for
/// is always on the left. The predicate is never invoked on a sentinel.
pub trait KeyEqual<K: ?Sized> {
  /// Returns `true` if `lhs` and `rhs` denote the same key.
  fn equal(&self, lhs: &K, rhs: &K) -> bool;
}

impl<K, F> KeyEqual<K> for F
where
  K: ?Sized,
  F: Fn(&K, &K) -> bool,
{
  #[inline]
  fn equal(&self, lhs: &K, rhs: &K) -> bool {
    self(lhs, rhs)
  }
}

/// Compares keys with [`PartialEq`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultKeyEqual;

impl<K> KeyEqual<K> for DefaultKeyEqual
where
  K: PartialEq + ?Sized,
{
  #[inline]
  fn equal(&self, lhs: &K, rhs: &K) -> bool {
    lhs == rhs
  }
}

/// Compares the raw bit patterns of two keys.
///
/// Useful for floating point keys, where `NaN != NaN` would otherwise make
/// a stored key unreachable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitwiseEqual;

impl<K> KeyEqual<K> for BitwiseEqual
where
  K: Packed,
{
  #[inline]
  fn equal(&self, lhs: &K, rhs: &K) -> bool {
    lhs.to_word() == rhs.to_word()
  }
}
