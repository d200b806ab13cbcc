//! Length-framed blob reading.

pub mod item;
pub mod iterator;

pub use item::{BlobItem, BlobPayload};
pub use iterator::BlobIterator;
