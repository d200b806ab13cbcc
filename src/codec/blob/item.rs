//! Describes the `BlobItem`: one length-framed blob, split into its kind
//! string and (possibly compressed) payload.

use crate::codec::error::CodecError;
use crate::codec::wire::{FieldValue, Message};

/// Payload of a blob, as declared by the fields of its Blob message.
#[derive(Debug, Clone)]
pub enum BlobPayload {
    Raw(Vec<u8>),
    Zlib { data: Vec<u8>, raw_size: usize },
}

/// One frame of the file: the BlobHeader `type` string and the payload the
/// Blob message carried.
#[derive(Debug, Clone)]
pub struct BlobItem {
    pub kind: String,
    pub payload: BlobPayload,
}

impl BlobItem {
    /// Builds a `BlobItem` from the decoded BlobHeader kind and the raw
    /// bytes of the Blob message that followed it. Compression variants
    /// other than zlib are rejected; a blob with neither raw nor zlib data
    /// is malformed.
    pub(crate) fn from_parts(kind: String, body: &[u8]) -> Result<BlobItem, CodecError> {
        let mut raw = None;
        let mut raw_size = None;
        let mut zlib = None;

        for field in Message::read_embedded(body)? {
            match (field.number, field.value) {
                (1, FieldValue::Len(buf)) => raw = Some(buf),
                (2, FieldValue::Varint(size)) => raw_size = Some(size as usize),
                (3, FieldValue::Len(buf)) => zlib = Some(buf),
                (4..=6, _) => {
                    return Err(CodecError::Malformed("unsupported blob compression"));
                }
                _ => {}
            }
        }

        let payload = match (zlib, raw) {
            (Some(data), _) => BlobPayload::Zlib {
                data,
                raw_size: raw_size.unwrap_or(0),
            },
            (None, Some(data)) => BlobPayload::Raw(data),
            (None, None) => {
                return Err(CodecError::Malformed(
                    "blob carries neither raw nor zlib data",
                ));
            }
        };

        Ok(BlobItem { kind, payload })
    }
}
