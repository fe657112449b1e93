//! # Geometry
//!
//! Geometric machinery shared by the analysis engine and the animation controller:
//!
//! - [`transform`] - Exact 3×3 operation matrices and the interpolated 4×4 transforms used
//!   for animation
//! - [`alignment`] - Atom matching under an operation and the search for the orientation in
//!   which a molecule realizes a point group

pub mod alignment;
pub mod transform;
