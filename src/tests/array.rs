use core::alloc::Layout;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::array::Array;
use crate::error::Error;
use crate::params::CACHE_LINE;
use crate::params::Capacity;
use crate::slot::Slot;
use crate::utils::each_capacity;

#[test]
fn alignment() {
  each_capacity!(capacity => {
    let length: Capacity = Capacity::new(capacity).unwrap();
    let array: Array<usize> = Array::new(length, |index, uninit| {
      uninit.write(index);
    })
    .unwrap();

    assert_eq!(array.as_ptr().addr() & (CACHE_LINE - 1), 0);
    assert_eq!(array.len(), length);
  });
}

#[test]
fn slice_representation() {
  let mut array: Array<usize> = Array::new(Capacity::new(200).unwrap(), |index, uninit| {
    uninit.write(index);
  })
  .unwrap();

  assert_eq!(array.as_slice().len(), 200);
  assert_eq!(array.as_mut_slice().len(), 200);

  for (index, value) in array.as_slice().iter().enumerate() {
    assert_eq!(*value, index);
  }

  for value in array.as_mut_slice() {
    *value += 1;
  }

  for (index, value) in array.as_slice().iter().enumerate() {
    assert_eq!(*value, index + 1);
  }
}

#[test]
fn layout_covers_elements() {
  each_capacity!(capacity => {
    let layout: Layout = Array::<Slot>::layout(Capacity::new(capacity).unwrap()).unwrap();

    assert!(layout.size() >= capacity * size_of::<Slot>());
    assert_eq!(layout.align(), CACHE_LINE);
  });
}

#[test]
fn layout_overflow() {
  assert!(Array::<Slot>::layout(Capacity::MAX).is_ok());
  assert_eq!(
    Array::<[u64; 8]>::layout(Capacity::MAX).err(),
    Some(Error::CapacityOverflow),
  );
}

#[test]
fn drop_elements() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  // Not zero-sized; the array allocates real storage.
  struct Counted(u8);

  impl Drop for Counted {
    fn drop(&mut self) {
      DROPS.fetch_add(usize::from(self.0), Ordering::Relaxed);
    }
  }

  let array: Array<Counted> = Array::new(Capacity::new(97).unwrap(), |_, uninit| {
    uninit.write(Counted(1));
  })
  .unwrap();

  assert_eq!(DROPS.load(Ordering::Relaxed), 0);

  drop(array);

  assert_eq!(DROPS.load(Ordering::Relaxed), 97);
}
