use thiserror::Error;

/// Errors surfaced by the decoding pipeline.
///
/// Any of these aborts the decode in progress. Conditions the reader
/// tolerates (unknown blob kinds, unimplemented entity kinds, incomplete
/// bounding boxes, out-of-range string indices) are logged instead.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input: {0}")]
    Malformed(&'static str),

    #[error("zlib inflation failed: {0}")]
    Decompress(std::io::Error),
}
