// src/sentiment/normalize.rs
//! Maps an unbounded raw score into [-1, 1].

/// `raw / (|raw| + alpha)`, clamped. Non-finite input never leaks out:
/// NaN maps to 0 and ±∞ to ±1.
pub fn normalize_score(raw: f64, alpha: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    if raw.is_infinite() {
        return raw.signum();
    }
    if raw == 0.0 {
        return 0.0;
    }
    let n = raw / (raw.abs() + alpha);
    if n.is_finite() {
        n.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stays_zero() {
        assert_eq!(normalize_score(0.0, 3.0), 0.0);
        assert_eq!(normalize_score(-0.0, 3.0), 0.0);
    }

    #[test]
    fn sign_preserved_and_bounded() {
        assert!((normalize_score(1.0, 3.0) - 0.25).abs() < 1e-12);
        assert!((normalize_score(-3.0, 3.0) + 0.5).abs() < 1e-12);
        let big = normalize_score(1e12, 3.0);
        assert!(big > 0.99 && big <= 1.0);
    }

    #[test]
    fn monotonic_in_magnitude() {
        let xs = [0.1, 0.5, 1.0, 2.0, 10.0];
        for w in xs.windows(2) {
            assert!(normalize_score(w[0], 3.0) < normalize_score(w[1], 3.0));
            assert!(normalize_score(-w[0], 3.0) > normalize_score(-w[1], 3.0));
        }
    }

    #[test]
    fn non_finite_inputs() {
        assert_eq!(normalize_score(f64::NAN, 3.0), 0.0);
        assert_eq!(normalize_score(f64::INFINITY, 3.0), 1.0);
        assert_eq!(normalize_score(f64::NEG_INFINITY, 3.0), -1.0);
    }
}
