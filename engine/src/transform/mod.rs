//! Transformation module.
//!
//! - Compose: source row to target record
//! - Pipeline: read, compose, validate, write

pub mod compose;
pub mod pipeline;

pub use compose::compose;
pub use pipeline::*;
