//! Data-parallel dispatch.
//!
//! Every bulk operation of the table maps one logical operation onto each
//! input index through the functions in this module. Invocations run
//! concurrently on the [`rayon`] thread pool, in no particular order, and
//! every side effect is visible to the caller once the function returns.
//!
//! The functions are public so that callers can drive a [`DeviceView`] or
//! [`DeviceMutableView`] from the same substrate:
//!
//! ```
//! use dtab::{DefaultKeyEqual, MurmurHash3, Pair, StaticMap, dispatch};
//!
//! let map: StaticMap<u32, u32> = StaticMap::new(64, u32::MAX, u32::MAX)?;
//! let view = map.get_device_mutable_view();
//!
//! dispatch::for_each(16, |index| {
//!   let key: u32 = index as u32;
//!   view.insert(Pair::new(key, key * 2), &MurmurHash3::default(), &DefaultKeyEqual);
//! });
//!
//! assert_eq!(map.get_size(), 16);
//! # Ok::<(), dtab::Error>(())
//! ```
//!
//! Under `cfg(loom)` and `cfg(shuttle)` the dispatch runs sequentially on the
//! calling thread, so model checkers only explore the threads a test spawns.
//!
//! [`DeviceView`]: crate::DeviceView
//! [`DeviceMutableView`]: crate::DeviceMutableView

#[cfg(not(any(loom, shuttle)))]
use rayon::prelude::*;

use crate::error::Error;
use crate::error::check_len;

/// Invokes `f` once for every index in `[0, n)`.
#[inline]
pub fn for_each<F>(n: usize, f: F)
where
  F: Fn(usize) + Send + Sync,
{
  #[cfg(not(any(loom, shuttle)))]
  (0..n).into_par_iter().for_each(f);

  #[cfg(any(loom, shuttle))]
  (0..n).for_each(f);
}

/// Invokes `f` once for every index in `[0, n)` and counts the `true`
/// results.
#[inline]
pub fn count<F>(n: usize, f: F) -> usize
where
  F: Fn(usize) -> bool + Send + Sync,
{
  #[cfg(not(any(loom, shuttle)))]
  let count: usize = (0..n).into_par_iter().filter(|&index| f(index)).count();

  #[cfg(any(loom, shuttle))]
  let count: usize = (0..n).filter(|&index| f(index)).count();

  count
}

/// Writes `f(&inputs[i])` to `outputs[i]` for every position.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] without invoking `f` if the buffers
/// differ in length.
#[inline]
pub fn map_into<I, O, F>(inputs: &[I], outputs: &mut [O], f: F) -> Result<(), Error>
where
  I: Sync,
  O: Send,
  F: Fn(&I) -> O + Send + Sync,
{
  check_len(inputs.len(), outputs.len())?;

  #[cfg(not(any(loom, shuttle)))]
  outputs
    .par_iter_mut()
    .zip(inputs.par_iter())
    .for_each(|(output, input)| *output = f(input));

  #[cfg(any(loom, shuttle))]
  for (output, input) in outputs.iter_mut().zip(inputs) {
    *output = f(input);
  }

  Ok(())
}

/// Invokes `f` once for every element with exclusive access to it.
#[inline]
pub(crate) fn for_each_mut<T, F>(items: &mut [T], f: F)
where
  T: Send,
  F: Fn(usize, &mut T) + Send + Sync,
{
  #[cfg(not(any(loom, shuttle)))]
  items
    .par_iter_mut()
    .enumerate()
    .for_each(|(index, item)| f(index, item));

  #[cfg(any(loom, shuttle))]
  for (index, item) in items.iter_mut().enumerate() {
    f(index, item);
  }
}
