//! Cache-line padding to keep the hot counter away from the slot metadata.

use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result;
use core::ops::Deref;

/// Pads and aligns a value to the length of a cache line.
///
/// Alignment choices follow [`crossbeam-utils`]. Architectures with
/// adjacent-line prefetchers get two lines worth of padding.
///
/// [`crossbeam-utils`]: https://crates.io/crates/crossbeam-utils
#[cfg_attr(
  any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64"),
  repr(align(128))
)]
#[cfg_attr(
  any(target_arch = "arm", target_arch = "mips", target_arch = "mips64", target_arch = "sparc"),
  repr(align(32))
)]
#[cfg_attr(target_arch = "s390x", repr(align(256)))]
#[cfg_attr(
  not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "powerpc64",
    target_arch = "arm",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc",
    target_arch = "s390x",
  )),
  repr(align(64))
)]
pub(crate) struct CachePadded<T> {
  value: T,
}

impl<T> CachePadded<T> {
  #[inline]
  pub(crate) const fn new(value: T) -> Self {
    Self { value }
  }
}

impl<T> Deref for CachePadded<T> {
  type Target = T;

  #[inline]
  fn deref(&self) -> &T {
    &self.value
  }
}

impl<T> Debug for CachePadded<T>
where
  T: Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&self.value, f)
  }
}
