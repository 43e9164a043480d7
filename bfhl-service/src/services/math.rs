//! Number-theory helpers behind the `fibonacci`, `prime`, `lcm` and `hcf`
//! operations. Everything here is pure and total: invalid input degrades to
//! an empty or zero result rather than an error.

/// Largest series a single request may ask for. Past F(1476) every term is
/// infinite, so the cap only bounds the size of the response.
pub const MAX_FIBONACCI_TERMS: usize = 1_000_000;

/// First `n` Fibonacci numbers, starting `0, 1, 1, 2, ...`.
///
/// Terms are doubles: exact up to F(78), rounded after that, and infinite once
/// they exceed `f64::MAX`. `n <= 0` yields an empty sequence. Counts above
/// [`MAX_FIBONACCI_TERMS`] are clamped.
pub fn fibonacci(n: i64) -> Vec<f64> {
    let count = match usize::try_from(n) {
        Ok(count) => count.min(MAX_FIBONACCI_TERMS),
        Err(_) => return Vec::new(),
    };

    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut series = Vec::with_capacity(count);
            series.extend([0.0, 1.0]);
            for i in 2..count {
                series.push(series[i - 1] + series[i - 2]);
            }
            series
        }
    }
}

/// Trial division up to `floor(sqrt(num))`.
pub fn is_prime(num: i64) -> bool {
    if num <= 1 {
        return false;
    }

    let n = num as u64;
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3u64;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Euclid's algorithm. The remainder takes the sign of the dividend, so mixed
/// signs can produce a negative divisor (`gcd(4, -6) == -2`).
pub fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a.wrapping_rem(b))
    }
}

/// `abs(a * b) / gcd(a, b)`, or `0` when either side is zero.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn lcm(a: i64, b: i64) -> Option<i64> {
    if a == 0 || b == 0 {
        return Some(0);
    }

    let product = (i128::from(a) * i128::from(b)).abs();
    i64::try_from(product / i128::from(gcd(a, b))).ok()
}

/// Left fold of [`lcm`] seeded with the first element; `0` for an empty slice.
pub fn reduce_lcm(values: &[i64]) -> Option<i64> {
    match values.split_first() {
        Some((&first, rest)) => rest.iter().try_fold(first, |acc, &value| lcm(acc, value)),
        None => Some(0),
    }
}

/// Left fold of [`gcd`] seeded with the first element; `0` for an empty slice.
pub fn reduce_hcf(values: &[i64]) -> i64 {
    match values.split_first() {
        Some((&first, rest)) => rest.iter().fold(first, |acc, &value| gcd(acc, value)),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_small_inputs() {
        assert!(fibonacci(0).is_empty());
        assert!(fibonacci(-3).is_empty());
        assert_eq!(fibonacci(1), vec![0.0]);
        assert_eq!(fibonacci(2), vec![0.0, 1.0]);
        assert_eq!(fibonacci(5), vec![0.0, 1.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            fibonacci(10),
            vec![0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0]
        );
    }

    #[test]
    fn fibonacci_past_u64_range() {
        let series = fibonacci(100);
        assert_eq!(series.len(), 100);
        assert_eq!(series[78], 8_944_394_323_791_464.0);
        assert!(series.iter().all(|term| term.is_finite()));
        assert!((series[99] / 2.189_229_958_345_552e20 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fibonacci_terms_overflow_to_infinity() {
        let series = fibonacci(1500);
        assert_eq!(series.len(), 1500);
        assert!(series[1476].is_finite());
        assert!(series[1499].is_infinite());

        assert_eq!(fibonacci(i64::MAX).len(), MAX_FIBONACCI_TERMS);
    }

    #[test]
    fn primality() {
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(17));
        assert!(!is_prime(18));
        assert!(!is_prime(25));
        assert!(is_prime(7919));
        assert!(!is_prime(0));
        assert!(!is_prime(-7));
    }

    #[test]
    fn primes_below_fifty() {
        let primes: Vec<i64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(-4, 6), 2);
        assert_eq!(gcd(4, -6), -2);
        assert_eq!(gcd(i64::MIN, -1), -1);
    }

    #[test]
    fn lcm_basics() {
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(0, 6), Some(0));
        assert_eq!(lcm(6, 0), Some(0));
        assert_eq!(lcm(4, -6), Some(-12));
        assert_eq!(lcm(i64::MAX, i64::MAX - 1), None);
    }

    #[test]
    fn reductions() {
        assert_eq!(reduce_lcm(&[4, 6]), Some(12));
        assert_eq!(reduce_lcm(&[2, 3, 4, 5]), Some(60));
        assert_eq!(reduce_lcm(&[9]), Some(9));
        assert_eq!(reduce_lcm(&[]), Some(0));

        assert_eq!(reduce_hcf(&[12, 18]), 6);
        assert_eq!(reduce_hcf(&[24, 36, 60]), 12);
        assert_eq!(reduce_hcf(&[9]), 9);
        assert_eq!(reduce_hcf(&[]), 0);
    }

    #[test]
    fn lcm_times_gcd_is_product() {
        for a in 1..=40i64 {
            for b in 1..=40i64 {
                assert_eq!(lcm(a, b).unwrap() * gcd(a, b), a * b, "a={a} b={b}");
            }
        }
    }
}
