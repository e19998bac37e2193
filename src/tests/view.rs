use crate::equal::DefaultKeyEqual;
use crate::error::InsertError;
use crate::hash::IdentityHash;
use crate::packed::Pair;
use crate::params::Capacity;
use crate::probing::LinearProbing;
use crate::probing::ProbeSequence;
use crate::probing::ProbingScheme;
use crate::table::Table;
use crate::view::DeviceMutableView;
use crate::view::DeviceView;

fn table(capacity: usize) -> Table<u32, u32, LinearProbing> {
  Table::new(Capacity::new(capacity).unwrap(), u32::MAX, u32::MAX, LinearProbing).unwrap()
}

#[test]
fn test_accessors() {
  let table: Table<u32, u32, LinearProbing> = table(97);
  let view: DeviceView<'_, u32, u32, LinearProbing> = table.view();

  assert_eq!(view.capacity(), 97);
  assert_eq!(view.empty_key_sentinel(), u32::MAX);
  assert_eq!(view.empty_value_sentinel(), u32::MAX);
  assert_eq!(*view.probing_scheme(), LinearProbing);
}

#[test]
fn test_insert_then_find() {
  let table: Table<u32, u32, LinearProbing> = table(16);
  let view: DeviceMutableView<'_, u32, u32, LinearProbing> = table.view_mut();

  assert!(view.insert(Pair::new(5, 50), &IdentityHash, &DefaultKeyEqual));
  assert!(!view.insert(Pair::new(5, 51), &IdentityHash, &DefaultKeyEqual));

  assert_eq!(
    view.find(&5, &IdentityHash, &DefaultKeyEqual),
    Some(Pair::new(5, 50)),
  );
  assert_eq!(view.find(&6, &IdentityHash, &DefaultKeyEqual), None);
  assert!(view.contains(&5, &IdentityHash, &DefaultKeyEqual));
  assert!(!view.contains(&6, &IdentityHash, &DefaultKeyEqual));

  // Reads through the immutable view see the same storage.
  let read: DeviceView<'_, u32, u32, LinearProbing> = view.as_view();

  assert!(read.contains(&5, &IdentityHash, &DefaultKeyEqual));
  assert_eq!(table.len(), 1);
}

#[test]
fn test_try_insert_reasons() {
  let table: Table<u32, u32, LinearProbing> = table(2);
  let view: DeviceMutableView<'_, u32, u32, LinearProbing> = table.view_mut();

  assert_eq!(view.try_insert(Pair::new(0, 0), &IdentityHash, &DefaultKeyEqual), Ok(()));
  assert_eq!(view.try_insert(Pair::new(1, 1), &IdentityHash, &DefaultKeyEqual), Ok(()));

  assert_eq!(
    view.try_insert(Pair::new(1, 2), &IdentityHash, &DefaultKeyEqual),
    Err(InsertError::Duplicate),
  );
  assert_eq!(
    view.try_insert(Pair::new(2, 2), &IdentityHash, &DefaultKeyEqual),
    Err(InsertError::Full),
  );
  assert_eq!(table.len(), 2);
}

#[test]
fn test_collision_chain() {
  let table: Table<u32, u32, LinearProbing> = table(10);
  let view: DeviceMutableView<'_, u32, u32, LinearProbing> = table.view_mut();

  for key in [3, 13, 23] {
    assert!(view.insert(Pair::new(key, key), &IdentityHash, &DefaultKeyEqual));
  }

  let slots: Vec<Pair<u32, u32>> = table.retrieve_all();

  assert_eq!(slots, [Pair::new(3, 3), Pair::new(13, 13), Pair::new(23, 23)]);
  assert_eq!(view.find(&23, &IdentityHash, &DefaultKeyEqual), Some(Pair::new(23, 23)));

  // The walk for 33 ends at the first empty slot after the chain.
  assert_eq!(view.find(&33, &IdentityHash, &DefaultKeyEqual), None);
}

#[test]
fn test_equal_argument_order() {
  let table: Table<u32, u32, LinearProbing> = table(10);
  let view: DeviceMutableView<'_, u32, u32, LinearProbing> = table.view_mut();

  for key in [3, 13, 23] {
    view.insert(Pair::new(key, key), &IdentityHash, &DefaultKeyEqual);
  }

  let equal = |probe: &u32, slot: &u32| {
    assert_eq!(*probe, 33, "probe key must be on the left");
    assert_ne!(*slot, u32::MAX, "compared against the empty-key sentinel");
    probe == slot
  };

  assert!(!view.contains(&33, &IdentityHash, &equal));
}

#[test]
fn test_view_copies_share_storage() {
  let table: Table<u32, u32, LinearProbing> = table(8);
  let lhs: DeviceMutableView<'_, u32, u32, LinearProbing> = table.view_mut();
  let rhs: DeviceMutableView<'_, u32, u32, LinearProbing> = lhs;

  assert!(lhs.insert(Pair::new(1, 1), &IdentityHash, &DefaultKeyEqual));
  assert!(!rhs.insert(Pair::new(1, 2), &IdentityHash, &DefaultKeyEqual));
  assert!(rhs.contains(&1, &IdentityHash, &DefaultKeyEqual));
  assert_eq!(table.len(), 1);
}

/// Ignores the table and probes a much larger index space.
#[derive(Clone, Copy, Debug)]
struct Oversized;

impl ProbingScheme for Oversized {
  fn probe(&self, _hash: u64, _capacity: Capacity) -> ProbeSequence {
    ProbeSequence::new(1_000_000, 1, Capacity::new(2_000_000).unwrap())
  }
}

#[test]
#[should_panic(expected = "probe sequence built for a different capacity")]
fn test_foreign_capacity_insert() {
  let table: Table<u32, u32, Oversized> =
    Table::new(Capacity::new(4).unwrap(), u32::MAX, u32::MAX, Oversized).unwrap();

  table.view_mut().insert(Pair::new(7, 7), &IdentityHash, &DefaultKeyEqual);
}

#[test]
#[should_panic(expected = "probe sequence built for a different capacity")]
fn test_foreign_capacity_find() {
  let table: Table<u32, u32, Oversized> =
    Table::new(Capacity::new(4).unwrap(), u32::MAX, u32::MAX, Oversized).unwrap();

  table.view().find(&7, &IdentityHash, &DefaultKeyEqual);
}
