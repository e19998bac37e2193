#![cfg(loom)]

use loom::sync::Arc;
use loom::thread;
use loom::thread::JoinHandle;
use std::ops::Deref;

use dtab::DefaultKeyEqual;
use dtab::IdentityHash;
use dtab::InsertError;
use dtab::Pair;
use dtab::StaticMap;

type Insert = JoinHandle<Result<(), InsertError>>;
type Lookup = JoinHandle<Option<Pair<u32, u32>>>;
type Exists = JoinHandle<bool>;

type ArcMap = Arc<StaticMap<u32, u32>>;

struct LoomMap {
  inner: ArcMap,
}

impl LoomMap {
  fn new(capacity: usize) -> Self {
    Self {
      inner: Arc::new(StaticMap::new(capacity, u32::MAX, u32::MAX).unwrap()),
    }
  }

  fn spawn_insert(&self, key: u32, value: u32) -> Insert {
    let map: ArcMap = ArcMap::clone(&self.inner);

    thread::spawn(move || {
      map
        .get_device_mutable_view()
        .try_insert(Pair::new(key, value), &IdentityHash, &DefaultKeyEqual)
    })
  }

  fn spawn_lookup(&self, key: u32) -> Lookup {
    let map: ArcMap = ArcMap::clone(&self.inner);

    thread::spawn(move || {
      map
        .get_device_view()
        .find(&key, &IdentityHash, &DefaultKeyEqual)
    })
  }

  fn spawn_exists(&self, key: u32) -> Exists {
    let map: ArcMap = ArcMap::clone(&self.inner);

    thread::spawn(move || {
      map
        .get_device_view()
        .contains(&key, &IdentityHash, &DefaultKeyEqual)
    })
  }

  fn find(&self, key: u32) -> Option<Pair<u32, u32>> {
    self
      .inner
      .get_device_view()
      .find(&key, &IdentityHash, &DefaultKeyEqual)
  }
}

impl Deref for LoomMap {
  type Target = ArcMap;

  #[inline]
  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

#[test]
fn test_insert_distinct() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(4);

    let thread_a: Insert = map.spawn_insert(1, 10);
    let thread_b: Insert = map.spawn_insert(2, 20);

    assert_eq!(thread_a.join().unwrap(), Ok(()));
    assert_eq!(thread_b.join().unwrap(), Ok(()));

    assert_eq!(map.get_size(), 2);
    assert_eq!(map.find(1), Some(Pair::new(1, 10)));
    assert_eq!(map.find(2), Some(Pair::new(2, 20)));
  });
}

#[test]
fn test_insert_colliding() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(4);

    // Both keys start probing at slot 1.
    let thread_a: Insert = map.spawn_insert(1, 10);
    let thread_b: Insert = map.spawn_insert(5, 50);

    assert_eq!(thread_a.join().unwrap(), Ok(()));
    assert_eq!(thread_b.join().unwrap(), Ok(()));

    assert_eq!(map.get_size(), 2);
    assert_eq!(map.find(1), Some(Pair::new(1, 10)));
    assert_eq!(map.find(5), Some(Pair::new(5, 50)));
  });
}

#[test]
fn test_insert_same_key() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(4);

    let thread_a: Insert = map.spawn_insert(3, 1);
    let thread_b: Insert = map.spawn_insert(3, 2);

    let result_a: Result<(), InsertError> = thread_a.join().unwrap();
    let result_b: Result<(), InsertError> = thread_b.join().unwrap();

    let winner: u32 = match (result_a, result_b) {
      (Ok(()), Err(InsertError::Duplicate)) => 1,
      (Err(InsertError::Duplicate), Ok(())) => 2,
      other => panic!("expected exactly one winner: {other:?}"),
    };

    assert_eq!(map.get_size(), 1);
    assert_eq!(map.find(3), Some(Pair::new(3, winner)));
  });
}

#[test]
fn test_insert_full() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(1);

    let thread_a: Insert = map.spawn_insert(1, 10);
    let thread_b: Insert = map.spawn_insert(2, 20);

    let result_a: Result<(), InsertError> = thread_a.join().unwrap();
    let result_b: Result<(), InsertError> = thread_b.join().unwrap();

    match (result_a, result_b) {
      (Ok(()), Err(InsertError::Full)) => assert_eq!(map.find(1), Some(Pair::new(1, 10))),
      (Err(InsertError::Full), Ok(())) => assert_eq!(map.find(2), Some(Pair::new(2, 20))),
      other => panic!("expected exactly one winner: {other:?}"),
    }

    assert_eq!(map.get_size(), 1);
  });
}

#[test]
fn test_insert_find() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(4);

    let insert: Insert = map.spawn_insert(2, 20);
    let lookup: Lookup = map.spawn_lookup(2);

    assert_eq!(insert.join().unwrap(), Ok(()));

    // Either the insert is not visible yet, or its value is.
    if let Some(pair) = lookup.join().unwrap() {
      assert_eq!(pair, Pair::new(2, 20));
    }

    assert_eq!(map.find(2), Some(Pair::new(2, 20)));
  });
}

#[test]
fn test_insert_find_behind_collision() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(4);

    map
      .get_device_mutable_view()
      .insert(Pair::new(1, 10), &IdentityHash, &DefaultKeyEqual);

    let insert: Insert = map.spawn_insert(5, 50);
    let lookup: Lookup = map.spawn_lookup(5);

    assert_eq!(insert.join().unwrap(), Ok(()));

    if let Some(pair) = lookup.join().unwrap() {
      assert_eq!(pair, Pair::new(5, 50));
    }
  });
}

#[test]
fn test_insert_exists() {
  loom::model(|| {
    let map: LoomMap = LoomMap::new(2);

    let insert: Insert = map.spawn_insert(0, 7);
    let exists: Exists = map.spawn_exists(1);

    assert_eq!(insert.join().unwrap(), Ok(()));
    assert!(!exists.join().unwrap());
  });
}
