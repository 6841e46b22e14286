//! # Literal Parsing
//!
//! Textual literal parsing shared by the value layer and the executor.
//!
//! - [`literal`]: date and timestamp parsing/formatting on top of
//!   days-since-epoch / microseconds-since-epoch arithmetic

pub mod literal;
