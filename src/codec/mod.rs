//! The OSM PBF decoding pipeline, one module per layer of the format:
//! a generic protobuf wire codec, length-framed blob reading, block
//! materialization (with zlib inflation), and the domain decoders that
//! turn blocks into map entities.

// Exposed modules
pub mod blob;
pub mod block;
pub mod element;
pub mod wire;

// Hidden modules
#[doc(hidden)]
pub mod error;

#[doc(inline)]
pub use blob::iterator::BlobIterator;
#[doc(inline)]
pub use block::item::BlockItem;

#[doc(hidden)]
pub use blob::item::BlobItem;
pub use error::CodecError;
