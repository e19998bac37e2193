//! Cache-aligned array allocation.
//!
//! Provides [`Array`], the backing storage for table slots.

use core::mem;
use core::mem::ManuallyDrop;
use core::mem::MaybeUninit;
use core::ptr;
use core::ptr::NonNull;
use core::slice;

use crate::alloc::Layout;
use crate::alloc::alloc;
use crate::alloc::dealloc;
use crate::dispatch;
use crate::error::Error;
use crate::params::CACHE_LINE;
use crate::params::Capacity;

/// A fixed-size heap array with cache-line-aligned allocation.
///
/// The length is chosen at runtime and never changes.
pub(crate) struct Array<T> {
  nonnull: NonNull<T>,
  length: Capacity,
  layout: Layout,
}

// SAFETY: `Array<T>` uniquely owns its elements, like `Box<[T]>`.
unsafe impl<T> Send for Array<T> where T: Send {}

// SAFETY: Shared access only hands out `&T`.
unsafe impl<T> Sync for Array<T> where T: Sync {}

impl<T> Array<T> {
  /// Creates a new array, initializing each element with the given function.
  ///
  /// Elements are initialized in parallel; every write is complete when this
  /// function returns.
  ///
  /// # Errors
  ///
  /// Returns [`Error::CapacityOverflow`] if the layout is not representable
  /// and [`Error::AllocFailed`] if the allocator returns null.
  #[inline]
  pub(crate) fn new<F>(length: Capacity, init: F) -> Result<Self, Error>
  where
    T: Send,
    F: Fn(usize, &mut MaybeUninit<T>) + Send + Sync,
  {
    let mut this: Array<MaybeUninit<T>> = Self::new_uninit(length)?;

    dispatch::for_each_mut(this.as_mut_slice(), init);

    // SAFETY: `for_each_mut` visited every element exactly once and `init`
    // fully initializes the element it is given.
    Ok(unsafe { this.assume_init() })
  }

  /// Creates a new array without initializing its contents.
  ///
  /// # Errors
  ///
  /// See [`Array::new`].
  #[inline]
  pub(crate) fn new_uninit(length: Capacity) -> Result<Array<MaybeUninit<T>>, Error> {
    let layout: Layout = Self::layout(length)?;

    assert_ne!(layout.size(), 0, "invalid array: layout size is `0`");

    // SAFETY: The layout has non-zero size.
    let raw: *mut u8 = unsafe { alloc(layout) };

    let Some(nonnull) = NonNull::new(raw.cast::<MaybeUninit<T>>()) else {
      return Err(Error::AllocFailed {
        bytes: layout.size(),
      });
    };

    Ok(Array {
      nonnull,
      length,
      layout,
    })
  }

  /// Computes the allocation layout for `length` elements.
  #[inline]
  pub(crate) fn layout(length: Capacity) -> Result<Layout, Error> {
    Layout::array::<T>(length.as_usize())
      .and_then(|layout| layout.align_to(CACHE_LINE))
      .map_err(|_| Error::CapacityOverflow)
  }

  /// Returns the number of elements.
  #[inline]
  pub(crate) const fn len(&self) -> Capacity {
    self.length
  }

  /// Returns the number of bytes backing the array.
  #[inline]
  pub(crate) const fn bytes(&self) -> usize {
    self.layout.size()
  }

  /// Returns a raw pointer to the array.
  #[inline]
  pub(crate) const fn as_ptr(&self) -> *const T {
    self.nonnull.as_ptr()
  }

  #[inline]
  pub(crate) const fn as_slice(&self) -> &[T] {
    // SAFETY: Contiguous allocation of `length` initialized elements.
    unsafe { slice::from_raw_parts(self.as_ptr(), self.length.as_usize()) }
  }

  #[inline]
  pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
    // SAFETY: Contiguous allocation of `length` initialized elements, and
    // `&mut self` guarantees exclusive access.
    unsafe { slice::from_raw_parts_mut(self.nonnull.as_ptr(), self.length.as_usize()) }
  }
}

impl<T> Array<MaybeUninit<T>> {
  /// Converts to an initialized array.
  ///
  /// # Safety
  ///
  /// All `length` elements must be initialized.
  #[inline]
  pub(crate) unsafe fn assume_init(self) -> Array<T> {
    // Prevent drop from running on `self` (would deallocate).
    let this: ManuallyDrop<Self> = ManuallyDrop::new(self);

    Array {
      nonnull: this.nonnull.cast(),
      length: this.length,
      layout: this.layout,
    }
  }
}

impl<T> Drop for Array<T> {
  fn drop(&mut self) {
    if mem::needs_drop::<T>() {
      // SAFETY: All elements are initialized and never touched again.
      unsafe {
        ptr::drop_in_place(self.as_mut_slice());
      }
    }

    // SAFETY: Allocated with `self.layout` in `new_uninit`.
    unsafe {
      dealloc(self.nonnull.cast().as_ptr(), self.layout);
    }
  }
}
