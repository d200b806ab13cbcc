//! Blob payload materialization.

pub mod item;

pub use item::{inflate, BlockItem};
