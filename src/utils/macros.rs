/// Runs `$body` once for a spread of capacities, binding each to `$name`.
///
/// Covers powers of two, primes, and awkward composites so that probing and
/// allocation are exercised on shapes that do not line up with cache lines.
macro_rules! each_capacity {
  ($name:ident => $body:block) => {
    #[cfg(any(coverage, coverage_nightly, miri))]
    {
      $crate::utils::each_capacity!(
        @impl $name, $body,
        1, 2, 7, 64, 200,
      );
    }

    #[cfg(not(any(coverage, coverage_nightly, miri)))]
    {
      $crate::utils::each_capacity!(
        @impl $name, $body,
        1, 2, 3, 4, 5, 7, 8, 9, 12, 16, 31, 64, 97, 100, 128, 200, 255, 256, 1000, 1024, 4099,
      );
    }
  };
  (@impl $name:ident, $body:block, $($capacity:expr),+ $(,)?) => {
    $(
      $crate::utils::each_capacity!(@run $name, $body, $capacity);
    )+
  };
  (@run $name:ident, $body:block, $capacity:expr) => {{
    let $name: usize = $capacity;
    $body
  }};
}

pub(crate) use each_capacity;
