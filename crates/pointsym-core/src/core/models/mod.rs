//! # Core Models Module
//!
//! Data structures describing a molecule and the symmetry operations acting on it.
//!
//! ## Key Components
//!
//! - [`atom`] - An atom with element, position and optional isotope mass
//! - [`molecule`] - An immutable, validated collection of atoms with derived properties
//! - [`operation`] - Symmetry operations as a closed tagged variant, and operation classes
//!
//! ## Usage
//!
//! ```ignore
//! use pointsym::core::models::{atom::Atom, molecule::Molecule};
//! use nalgebra::Point3;
//!
//! let molecule = Molecule::builder("Hydrogen Fluoride")
//!     .atom(Atom::new("H", Point3::new(0.0, 0.0, 0.0)))
//!     .atom(Atom::new("F", Point3::new(0.917, 0.0, 0.0)))
//!     .build()?;
//! assert!(molecule.is_linear());
//! ```

pub mod atom;
pub mod molecule;
pub mod operation;
