//! The framed-blob iterator: walks `(u32 length, BlobHeader, Blob)` triples
//! off any byte source.

use std::io::{ErrorKind, Read};

use log::{debug, trace};

use crate::codec::blob::item::BlobItem;
use crate::codec::error::CodecError;
use crate::codec::wire::{Expect, Message, WireType};

const HEADER_LEN_SIZE: usize = 4;

/// Yields one `BlobItem` per frame. A clean end of input ends iteration;
/// anything else that cuts a frame short is an error item.
pub struct BlobIterator<R: Read> {
    reader: R,
    index: u64,
}

impl<R: Read> BlobIterator<R> {
    pub fn new(reader: R) -> BlobIterator<R> {
        BlobIterator { reader, index: 0 }
    }

    /// Reads the next frame, or `Ok(None)` on clean end of input. Frames
    /// with a zero `datasize` are skipped.
    fn read_frame(&mut self) -> Result<Option<BlobItem>, CodecError> {
        loop {
            let header_len = match self.read_header_len()? {
                Some(len) => len as usize,
                None => return Ok(None),
            };

            let mut header_buf = vec![0u8; header_len];
            read_framed(&mut self.reader, &mut header_buf, "input ended inside a blob header")?;
            let header = Message::read_embedded(&header_buf)?;

            let kind = header
                .get(1, Expect::Is(WireType::Len))
                .and_then(|f| f.as_len())
                .ok_or(CodecError::Malformed("blob header missing its type"))?;
            let kind = String::from_utf8_lossy(kind).into_owned();

            let datasize = header
                .get(3, Expect::Is(WireType::Varint))
                .and_then(|f| f.as_varint())
                .ok_or(CodecError::Malformed("blob header missing its datasize"))?
                as usize;

            trace!("frame {}: kind {kind:?}, datasize {datasize}", self.index);
            self.index += 1;

            if datasize == 0 {
                debug!("skipping empty blob");
                continue;
            }

            let mut body = vec![0u8; datasize];
            read_framed(&mut self.reader, &mut body, "input ended inside a blob body")?;

            return BlobItem::from_parts(kind, &body).map(Some);
        }
    }

    /// Reads the 4-byte big-endian frame length. Zero bytes available is a
    /// clean end of input; one to three is malformed.
    fn read_header_len(&mut self) -> Result<Option<u32>, CodecError> {
        let mut buf = [0u8; HEADER_LEN_SIZE];
        let mut filled = 0usize;

        while filled < HEADER_LEN_SIZE {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(CodecError::Malformed("input ended inside a frame length"));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::Io(e)),
            }
        }
        Ok(Some(u32::from_be_bytes(buf)))
    }
}

fn read_framed<R: Read>(r: &mut R, buf: &mut [u8], short: &'static str) -> Result<(), CodecError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => CodecError::Malformed(short),
        _ => CodecError::Io(e),
    })
}

impl<R: Read> Iterator for BlobIterator<R> {
    type Item = Result<BlobItem, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}
