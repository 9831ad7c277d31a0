//! Deterministic trial-division primality testing.

/// Returns true if `n` is prime.
///
/// `1` is explicitly not prime. Zero is outside the domain and is never
/// passed by the candidate generator, whose smallest candidate is 11.
///
/// Trial division stops once `i * i > n`. The bound is evaluated as
/// `i <= n / i` so it cannot overflow for any `u64`.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    debug_assert!(n > 0, "primality is undefined for zero");

    if n == 1 {
        return false;
    }

    let mut i: u64 = 2;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Returns true if both `p` and `p + 2` are prime.
///
/// Returns false if `p + 2` does not fit in a `u64`.
#[must_use]
pub fn is_twin_prime(p: u64) -> bool {
    match p.checked_add(2) {
        Some(upper) => is_prime(p) && is_prime(upper),
        None => false,
    }
}
