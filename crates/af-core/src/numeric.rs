use crate::AfError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AfError::NonFinite { what, value: v })
    }
}

/// Accept finite values that are `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, AfError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(AfError::OutOfRange { what, value: v });
    }
    Ok(v)
}

/// Accept finite values strictly inside the open interval `(lo, hi)`.
pub fn ensure_open_interval(
    v: Real,
    lo: Real,
    hi: Real,
    what: &'static str,
) -> Result<Real, AfError> {
    let v = ensure_finite(v, what)?;
    if v <= lo || v >= hi {
        return Err(AfError::OutOfRange { what, value: v });
    }
    Ok(v)
}

/// Evenly spaced samples over `[start, end]`, endpoints included.
///
/// Returns an empty vector for `n == 0` and `[start]` for `n == 1`.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn non_negative_accepts_zero_rejects_negative() {
        assert_eq!(ensure_non_negative(0.0, "t").unwrap(), 0.0);
        assert!(matches!(
            ensure_non_negative(-0.1, "t"),
            Err(AfError::OutOfRange { what: "t", .. })
        ));
    }

    #[test]
    fn open_interval_excludes_bounds() {
        assert!(ensure_open_interval(0.0, 0.0, 1.0, "p").is_err());
        assert!(ensure_open_interval(1.0, 0.0, 1.0, "p").is_err());
        assert_eq!(ensure_open_interval(0.4, 0.0, 1.0, "p").unwrap(), 0.4);
    }

    #[test]
    fn linspace_hits_endpoints_exactly() {
        let xs = linspace(0.0, 1.0, 100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[99], 1.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }
}
