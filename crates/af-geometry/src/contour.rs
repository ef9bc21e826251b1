//! Closed airfoil contour and its coordinate-file form.

use std::fmt::Write as _;
use std::io::{self, Write};

use af_core::Real;
use serde::{Deserialize, Serialize};

/// Ordered boundary points, trailing edge → upper surface → leading edge →
/// lower surface → trailing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilContour {
    name: String,
    points: Vec<(Real, Real)>,
}

impl AirfoilContour {
    pub fn new(name: impl Into<String>, points: Vec<(Real, Real)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[(Real, Real)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Middle point of the contour, where the two surfaces meet.
    pub fn leading_edge(&self) -> (Real, Real) {
        self.points[self.points.len() / 2]
    }

    pub fn xs(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.0).collect()
    }

    pub fn ys(&self) -> Vec<Real> {
        self.points.iter().map(|p| p.1).collect()
    }

    /// Upper surface from leading edge to trailing edge.
    pub fn upper(&self) -> impl Iterator<Item = &(Real, Real)> {
        let le = self.points.len() / 2;
        self.points[..=le].iter().rev()
    }

    /// Lower surface from leading edge to trailing edge.
    pub fn lower(&self) -> impl Iterator<Item = &(Real, Real)> {
        let le = self.points.len() / 2;
        self.points[le..].iter()
    }

    /// Coordinate file: one header line, then `x y` rows at 8 decimals.
    pub fn to_dat_string(&self) -> String {
        let mut out = String::with_capacity(24 * (self.points.len() + 1));
        out.push_str("Airfoil\n");
        for (x, y) in &self.points {
            let _ = writeln!(out, "{:.8} {:.8}", x, y);
        }
        out
    }

    pub fn write_dat<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_dat_string().as_bytes())
    }
}
