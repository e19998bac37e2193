//! Error types.

/// Errors reported by table construction and bulk operations.
///
/// Per-element insert failures are not errors at this level; see
/// [`InsertError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
  /// The requested capacity was zero.
  #[error("capacity must be non-zero")]
  InvalidCapacity,
  /// The backing array would not fit in the address space.
  #[error("capacity overflows the maximum allocation size")]
  CapacityOverflow,
  /// The allocator could not provide the backing array.
  #[error("failed to allocate {bytes} bytes for the backing array")]
  AllocFailed { bytes: usize },
  /// A load factor outside of `(0, 1]` was supplied.
  #[error("load factor must be within (0, 1]")]
  InvalidLoadFactor,
  /// Two buffers that must be processed in lockstep have different lengths.
  #[error("length mismatch: expected {expected}, received {received}")]
  LengthMismatch { expected: usize, received: usize },
}

/// Why a single-key insert did not claim a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InsertError {
  /// An equal key already occupies a slot on the probe sequence.
  #[error("key is already present")]
  Duplicate,
  /// Every slot on the probe sequence is occupied by a different key.
  #[error("no empty slot on the probe sequence")]
  Full,
}

/// Checks that two buffers processed in lockstep have equal lengths.
#[inline]
pub(crate) const fn check_len(expected: usize, received: usize) -> Result<(), Error> {
  if expected == received {
    Ok(())
  } else {
    Err(Error::LengthMismatch { expected, received })
  }
}
