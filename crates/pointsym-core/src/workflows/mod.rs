//! # Workflows Module
//!
//! High-level entry points that run the whole symmetry pipeline.
//!
//! - **Analysis** ([`analyze`]) - Resolve the point group of one molecule, align it onto the
//!   standard orientation, and derive Γ3N, its decomposition and the selection rules.
//! - **Survey** ([`survey`]) - Analyze a batch of molecules independently, in parallel when
//!   the `parallel` feature is enabled, collecting per-molecule failures instead of stopping.

pub mod analyze;
pub mod survey;
