//! Viscous analysis settings passed to XFOIL.

use af_core::{AfError, Real, ensure_finite};
use serde::{Deserialize, Serialize};

/// Angle-of-attack sweep in degrees, `start` to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaSweep {
    pub start: Real,
    pub end: Real,
    pub step: Real,
}

impl Default for AlphaSweep {
    fn default() -> Self {
        Self {
            start: -5.0,
            end: 15.0,
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub reynolds: Real,
    /// Boundary-layer iteration limit per operating point.
    pub iterations: u32,
    pub alpha: AlphaSweep,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            reynolds: 3_000_000.0,
            iterations: 100,
            alpha: AlphaSweep::default(),
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), AfError> {
        let re = ensure_finite(self.reynolds, "reynolds")?;
        if re <= 0.0 {
            return Err(AfError::OutOfRange {
                what: "reynolds",
                value: re,
            });
        }
        if self.iterations == 0 {
            return Err(AfError::OutOfRange {
                what: "iterations",
                value: 0.0,
            });
        }
        ensure_finite(self.alpha.start, "alpha start")?;
        ensure_finite(self.alpha.end, "alpha end")?;
        let step = ensure_finite(self.alpha.step, "alpha step")?;
        if step == 0.0 {
            return Err(AfError::OutOfRange {
                what: "alpha step",
                value: step,
            });
        }
        Ok(())
    }
}
