//! Data model for the tdiff structural diff engine.
//!
//! The engine compares untyped trees of records, sequences, and scalars.
//! This crate defines that tree and the addressing used to point into it.
//!
//! # Key Types
//!
//! - [`Value`] / [`ValueKind`] -- The untyped value tree and its structural kinds
//! - [`Key`] -- A record field name or a sequence index
//! - [`Path`] -- The chain of keys from a root to a nested node

pub mod error;
pub mod key;
pub mod value;

pub use error::TypeError;
pub use key::{Key, Path};
pub use value::{Value, ValueKind};
