//! # pointsym Core Library
//!
//! A library for molecular point-group symmetry analysis: character tables, symmetry
//! operations, the 3N-dimensional Cartesian representation and the infrared/Raman
//! selection rules of vibrational normal modes.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture to keep concerns separated:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Molecule`, `SymmetryOperation`),
//!   the static character table catalog, the transformation-matrix generator and the
//!   built-in molecule library.
//!
//! - **[`engine`]: The Logic Core.** The numeric pipeline: reducible representation,
//!   reduction into irreducible components, selection-rule classification, plus the
//!   single stateful component, the operation animation controller.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into complete
//!   procedures such as analyzing one molecule or surveying a batch of molecules.

pub mod core;
pub mod engine;
pub mod workflows;
