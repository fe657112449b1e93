//! # Core Module
//!
//! This module provides the fundamental building blocks for molecular symmetry analysis.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, molecules and symmetry operations
//! - **Group Theory Data** ([`chartab`]) - The read-only character table catalog
//! - **Spatial Transforms** ([`geometry`]) - Operation matrices, animation interpolation and
//!   alignment of a molecule onto the standard orientation of its point group
//! - **Reference Data** ([`library`]) - Element masses, built-in molecules and curated
//!   point-group assignments
//!
//! Everything in this module is free of mutable state: the catalog is parsed once on first
//! use and shared by reference afterwards.

pub mod chartab;
pub mod geometry;
pub mod library;
pub mod models;
