use crate::equal::BitwiseEqual;
use crate::equal::DefaultKeyEqual;
use crate::equal::KeyEqual;
use crate::hash::HashOutput;
use crate::hash::IdentityHash;
use crate::hash::KeyHash;
use crate::hash::MurmurHash3;

#[test]
fn test_identity() {
  assert_eq!(KeyHash::<u32>::hash(&IdentityHash, &77), 77_u32);
  assert_eq!(KeyHash::<u64>::hash(&IdentityHash, &u64::MAX), u64::MAX);
  assert_eq!(KeyHash::<i32>::hash(&IdentityHash, &-1).to_u64(), u64::from(u32::MAX));
}

#[test]
fn test_murmur_fmix64() {
  assert_eq!(MurmurHash3::fmix64(0), 0);
  assert_ne!(MurmurHash3::fmix64(1), 1);
  assert_ne!(MurmurHash3::fmix64(1), MurmurHash3::fmix64(2));
}

#[test]
fn test_murmur_seed() {
  let lhs: MurmurHash3 = MurmurHash3::new(0);
  let rhs: MurmurHash3 = MurmurHash3::new(42);

  assert_eq!(KeyHash::<u32>::hash(&lhs, &7), KeyHash::<u32>::hash(&lhs, &7));
  assert_ne!(KeyHash::<u32>::hash(&lhs, &7), KeyHash::<u32>::hash(&rhs, &7));
  assert_eq!(lhs, MurmurHash3::default());
}

#[test]
fn test_closure_hash() {
  let hash = |key: &u16| u64::from(*key) * 3;

  assert_eq!(hash.hash(&5).to_u64(), 15);
}

#[test]
fn test_equal() {
  assert!(DefaultKeyEqual.equal(&1_u32, &1));
  assert!(!DefaultKeyEqual.equal(&1_u32, &2));

  // `NaN` is only reachable through its bit pattern.
  assert!(!DefaultKeyEqual.equal(&f64::NAN, &f64::NAN));
  assert!(BitwiseEqual.equal(&f64::NAN, &f64::NAN));
  assert!(!BitwiseEqual.equal(&0.0_f64, &-0.0));

  let modulo = |lhs: &u32, rhs: &u32| lhs % 10 == rhs % 10;

  assert!(modulo.equal(&3, &13));
}
