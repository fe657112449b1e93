//! # Character Tables
//!
//! The catalog of supported point groups. Each [`table::CharacterTable`] lists the group's
//! operation classes in a standard orientation (principal axis along `z`), one character per
//! class for every irreducible representation, and the basis functions that decide infrared
//! and Raman activity.
//!
//! The tables are stored in `data/character_tables.toml`, embedded into the library at
//! compile time and parsed on first use by [`catalog::catalog`].

pub mod catalog;
pub mod character;
pub mod notation;
pub mod table;
