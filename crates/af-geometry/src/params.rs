//! Shape parameters of the NACA 4-digit family.

use af_core::{Real, ensure_non_negative, ensure_open_interval};
use serde::{Deserialize, Serialize};

use crate::error::GeometryResult;

/// NACA 4-digit parameters in solver-native units.
///
/// `camber` and `thickness` are hundredths of chord, `camber_pos` is tenths of
/// chord, so NACA 2415 is `{ camber: 2, camber_pos: 4, thickness: 15 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    pub camber: Real,
    pub camber_pos: Real,
    pub thickness: Real,
}

/// Chord-fraction form of [`ShapeParameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedShape {
    pub m: Real,
    pub p: Real,
    pub t: Real,
}

impl ShapeParameters {
    pub fn new(camber: Real, camber_pos: Real, thickness: Real) -> Self {
        Self {
            camber,
            camber_pos,
            thickness,
        }
    }

    pub fn normalized(&self) -> NormalizedShape {
        NormalizedShape {
            m: self.camber / 100.0,
            p: self.camber_pos / 10.0,
            t: self.thickness / 100.0,
        }
    }

    /// Check the parameter invariants and return the normalized form.
    ///
    /// Camber position is only constrained when the section is cambered.
    /// Extreme but valid combinations are not clamped; the solver is left to
    /// reject them.
    pub fn validate(&self) -> GeometryResult<NormalizedShape> {
        let n = self.normalized();
        ensure_non_negative(n.m, "camber")?;
        ensure_non_negative(n.t, "thickness")?;
        if n.m > 0.0 {
            ensure_open_interval(n.p, 0.0, 1.0, "camber position")?;
        } else {
            af_core::ensure_finite(n.p, "camber position")?;
        }
        Ok(n)
    }

    pub fn is_symmetric(&self) -> bool {
        self.camber == 0.0
    }

    /// Four-digit designation, e.g. `NACA 2415`. Fractional digits are rounded.
    pub fn designation(&self) -> String {
        format!(
            "NACA {}{}{:02}",
            self.camber.round() as i64,
            self.camber_pos.round() as i64,
            self.thickness.round() as i64
        )
    }
}
