//! NACA 4-digit section synthesis.

use af_core::{Real, linspace};

use crate::contour::AirfoilContour;
use crate::error::{GeometryError, GeometryResult};
use crate::params::{NormalizedShape, ShapeParameters};

/// Chordwise stations per surface used by [`generate`].
pub const DEFAULT_STATIONS: usize = 100;

const MIN_STATIONS: usize = 2;

/// Generate the contour with [`DEFAULT_STATIONS`] stations per surface.
pub fn generate(params: &ShapeParameters) -> GeometryResult<AirfoilContour> {
    generate_with_stations(params, DEFAULT_STATIONS)
}

/// Generate the closed contour with `stations` points per surface.
///
/// The result has `2 * stations - 1` points: the reversed upper surface
/// followed by the lower surface without its leading-edge point.
pub fn generate_with_stations(
    params: &ShapeParameters,
    stations: usize,
) -> GeometryResult<AirfoilContour> {
    if stations < MIN_STATIONS {
        return Err(GeometryError::TooFewStations {
            min: MIN_STATIONS,
            got: stations,
        });
    }
    let shape = params.validate()?;
    let xs = linspace(0.0, 1.0, stations);

    let mut upper = Vec::with_capacity(stations);
    let mut lower = Vec::with_capacity(stations);
    for &x in &xs {
        let yt = half_thickness(shape.t, x);
        let (yc, slope) = camber_line(&shape, x);
        let theta = slope.atan();
        let (sin_t, cos_t) = theta.sin_cos();
        upper.push((x - yt * sin_t, yc + yt * cos_t));
        lower.push((x + yt * sin_t, yc - yt * cos_t));
    }

    // sqrt(x) at the nose leaves a near-zero residue; pin it.
    upper[0] = (0.0, 0.0);
    lower[0] = (0.0, 0.0);

    let points = upper
        .into_iter()
        .rev()
        .chain(lower.into_iter().skip(1))
        .collect();
    Ok(AirfoilContour::new(params.designation(), points))
}

/// Symmetric half-thickness distribution for thickness ratio `t`.
fn half_thickness(t: Real, x: Real) -> Real {
    (t / 0.2)
        * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
            - 0.1015 * x.powi(4))
}

/// Mean-line ordinate and slope at `x`.
///
/// Both are identically zero for an uncambered section, without touching `p`.
fn camber_line(shape: &NormalizedShape, x: Real) -> (Real, Real) {
    let NormalizedShape { m, p, .. } = *shape;
    if m == 0.0 {
        return (0.0, 0.0);
    }
    if x <= p {
        let k = m / (p * p);
        (k * (2.0 * p * x - x * x), 2.0 * k * (p - x))
    } else {
        let q = 1.0 - p;
        let k = m / (q * q);
        (k * (1.0 - 2.0 * p + 2.0 * p * x - x * x), 2.0 * k * (p - x))
    }
}
