//! NACA 4-digit airfoil geometry.
//!
//! Turns three shape parameters into a closed contour ordered the way panel
//! codes expect: trailing edge, along the upper surface to the leading edge,
//! then back along the lower surface to the trailing edge.

pub mod contour;
pub mod error;
pub mod naca;
pub mod params;

pub use contour::AirfoilContour;
pub use error::{GeometryError, GeometryResult};
pub use naca::{DEFAULT_STATIONS, generate, generate_with_stations};
pub use params::{NormalizedShape, ShapeParameters};
