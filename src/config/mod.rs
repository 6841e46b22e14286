//! # Engine Configuration
//!
//! This module centralizes the fixed names and numeric seeds the rest of the
//! engine relies on. Import constants from here rather than redefining them
//! locally so the bootstrap schema names and sequence behavior stay in one
//! place.
//!
//! ## Module Organization
//!
//! - [`constants`]: schema names, catalog names, sequence seed

pub mod constants;
pub use constants::*;
