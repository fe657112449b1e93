//! # Reference Data
//!
//! Static, compile-time reference data used by the rest of the library:
//!
//! - [`elements`] - Standard atomic weights keyed by element symbol
//! - [`molecules`] - A curated library of molecules with idealized geometries
//! - [`assignments`] - The curated molecule-name to point-group mapping

pub mod assignments;
pub mod elements;
pub mod molecules;
