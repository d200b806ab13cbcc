//! Reads OpenStreetMap PBF extracts into an in-memory [`Map`] and answers
//! structured queries over its nodes, ways and bounding box.

pub use codec::error::CodecError;
pub use map::{read_map, BBox, Map};

pub mod codec;
pub mod map;
