//! A block item: decodes a `BlobItem` payload into the header or primitive
//! block message it carries, inflating zlib payloads along the way.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::warn;

use crate::codec::blob::item::{BlobItem, BlobPayload};
use crate::codec::error::CodecError;
use crate::codec::wire::Message;

/// The two block kinds a map file carries.
pub enum BlockItem {
    Header(Message),
    Primitive(Message),
}

impl BlockItem {
    /// Materializes the block a blob carries. Unknown kinds are logged and
    /// produce `None`.
    #[inline]
    pub fn from_blob(blob: &BlobItem) -> Result<Option<BlockItem>, CodecError> {
        let message = match &blob.payload {
            BlobPayload::Raw(data) => Message::read_embedded(data)?,
            BlobPayload::Zlib { data, raw_size } => {
                let inflated = inflate(data, *raw_size)?;
                Message::read_embedded(&inflated)?
            }
        };

        match blob.kind.as_str() {
            "OSMData" => Ok(Some(BlockItem::Primitive(message))),
            "OSMHeader" => Ok(Some(BlockItem::Header(message))),
            kind => {
                warn!("blob kind {kind:?} not supported, skipping");
                Ok(None)
            }
        }
    }
}

/// Inflates a zlib stream into a buffer pre-sized to `size_hint`, growing
/// as needed. Anything short of a clean stream end is a decompression
/// failure.
pub fn inflate(data: &[u8], size_hint: usize) -> Result<Vec<u8>, CodecError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut inflated = Vec::with_capacity(size_hint);
    decoder
        .read_to_end(&mut inflated)
        .map_err(CodecError::Decompress)?;
    Ok(inflated)
}
