//! af-core: shared foundation for the airfoil evaluation crates.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{AfError, AfResult};
pub use numeric::*;
