//! # Engine Module
//!
//! The numeric pipeline that turns an aligned molecule and a character table into
//! vibrational selection rules, plus the animation controller that replays operations.
//!
//! ## Architecture
//!
//! - **Reducible Representation** ([`reducible`]) - Γ3N characters from unmoved atoms, and
//!   the full 3N×3N Cartesian matrices
//! - **Decomposition** ([`decomposition`]) - Reduction formula, complex-pair folding,
//!   linear-group correlation and removal of rigid-body motion
//! - **Selection Rules** ([`selection`]) - IR/Raman/silent classification of each species
//! - **Animation** ([`animation`]) - Time-driven play/reverse state machine over one operation
//! - **Configuration** ([`config`]) - Geometry and numeric tolerances, animation timing
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Analysis error types
//!
//! Every stage except the animation controller is a pure function over read-only data.

pub mod animation;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod progress;
pub mod reducible;
pub mod selection;
