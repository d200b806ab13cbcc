//! Wire-level primitives: tags, field values, and the integer encodings
//! they are built from.

use std::io::{ErrorKind, Read};

use crate::codec::error::CodecError;

/// Longest legal encoding of a 64-bit varint.
const MAX_VARINT_BYTES: usize = 10;

/// Tags are 32-bit varints: five bytes at most.
const MAX_TAG_BYTES: usize = 5;

/// The six wire types of the protobuf encoding, numbered 0..=5 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    I64,
    Len,
    SGroup,
    EGroup,
    I32,
}

impl WireType {
    /// Maps the low three bits of a tag to a wire type.
    pub fn from_tag(bits: u8) -> Option<WireType> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::I64),
            2 => Some(WireType::Len),
            3 => Some(WireType::SGroup),
            4 => Some(WireType::EGroup),
            5 => Some(WireType::I32),
            _ => None,
        }
    }

    /// The numeric tag of this wire type.
    pub fn tag(&self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::I64 => 1,
            WireType::Len => 2,
            WireType::SGroup => 3,
            WireType::EGroup => 4,
            WireType::I32 => 5,
        }
    }
}

/// A decoded field value. The variant carries the wire type, so a field can
/// never hold a value of the wrong shape, and `Len` owns its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Varint(u64),
    I64(u64),
    Len(Vec<u8>),
    SGroup,
    EGroup,
    I32(u32),
}

impl FieldValue {
    #[inline]
    pub fn wire_type(&self) -> WireType {
        match self {
            FieldValue::Varint(_) => WireType::Varint,
            FieldValue::I64(_) => WireType::I64,
            FieldValue::Len(_) => WireType::Len,
            FieldValue::SGroup => WireType::SGroup,
            FieldValue::EGroup => WireType::EGroup,
            FieldValue::I32(_) => WireType::I32,
        }
    }
}

/// One `(field number, value)` pair of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub number: u32,
    pub value: FieldValue,
}

impl Field {
    pub fn wire_type(&self) -> WireType {
        self.value.wire_type()
    }

    /// The unsigned integer a varint field carries.
    #[inline]
    pub fn as_varint(&self) -> Option<u64> {
        match self.value {
            FieldValue::Varint(v) => Some(v),
            _ => None,
        }
    }

    /// The byte buffer a length-delimited field carries.
    #[inline]
    pub fn as_len(&self) -> Option<&[u8]> {
        match &self.value {
            FieldValue::Len(buf) => Some(buf.as_slice()),
            _ => None,
        }
    }
}

/// Reads one byte, or `None` on end of input.
fn read_byte<R: Read>(r: &mut R) -> Result<Option<u8>, CodecError> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CodecError::Io(e)),
        }
    }
}

/// Decodes a base-128 little-endian varint, returning the value and the
/// number of bytes consumed. `Ok(None)` means the stream ended before the
/// first byte; ending mid-varint, exceeding ten bytes, or overflowing 64
/// bits is malformed. Non-canonical encodings with trailing zero bytes are
/// accepted.
pub fn read_varint<R: Read>(r: &mut R) -> Result<Option<(u64, usize)>, CodecError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = match read_byte(r)? {
            Some(b) => b,
            None if consumed == 0 => return Ok(None),
            None => return Err(CodecError::Malformed("input ended inside a varint")),
        };
        consumed += 1;

        let bits = (byte & 0x7f) as u64;
        if shift >= 64 || (shift == 63 && bits > 1) {
            return Err(CodecError::Malformed("varint overflows 64 bits"));
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok(Some((value, consumed)));
        }
        if consumed == MAX_VARINT_BYTES {
            return Err(CodecError::Malformed("varint longer than ten bytes"));
        }
        shift += 7;
    }
}

/// Decodes a field tag: wire type in the low three bits, field number in the
/// rest. Five bytes at most; a wire type above five is malformed. `Ok(None)`
/// is a clean end of input before the first tag byte.
pub fn read_tag<R: Read>(r: &mut R) -> Result<Option<(u32, WireType, usize)>, CodecError> {
    let mut raw = 0u64;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = match read_byte(r)? {
            Some(b) => b,
            None if consumed == 0 => return Ok(None),
            None => return Err(CodecError::Malformed("input ended inside a field tag")),
        };
        consumed += 1;
        raw |= ((byte & 0x7f) as u64) << shift;

        if byte & 0x80 == 0 {
            break;
        }
        if consumed == MAX_TAG_BYTES {
            return Err(CodecError::Malformed("field tag longer than five bytes"));
        }
        shift += 7;
    }

    let wire = WireType::from_tag((raw & 0x07) as u8)
        .ok_or(CodecError::Malformed("wire type out of range"))?;
    Ok(Some(((raw >> 3) as u32, wire, consumed)))
}

/// Decodes one value of the given wire type, returning it with the number
/// of bytes consumed. Group markers carry no payload.
pub fn read_value<R: Read>(r: &mut R, wire: WireType) -> Result<(FieldValue, usize), CodecError> {
    match wire {
        WireType::Varint => {
            let (value, n) = read_varint(r)?
                .ok_or(CodecError::Malformed("input ended before a varint value"))?;
            Ok((FieldValue::Varint(value), n))
        }
        WireType::I64 => {
            let mut buf = [0u8; 8];
            read_fixed(r, &mut buf)?;
            Ok((FieldValue::I64(u64::from_le_bytes(buf)), 8))
        }
        WireType::I32 => {
            let mut buf = [0u8; 4];
            read_fixed(r, &mut buf)?;
            Ok((FieldValue::I32(u32::from_le_bytes(buf)), 4))
        }
        WireType::Len => {
            let (len, len_bytes) = read_varint(r)?
                .ok_or(CodecError::Malformed("input ended before a length prefix"))?;
            let len = len as usize;
            // Bound the up-front allocation; a lying length fails below.
            let mut buf = Vec::with_capacity(len.min(64 * 1024));
            r.take(len as u64)
                .read_to_end(&mut buf)
                .map_err(CodecError::Io)?;
            if buf.len() != len {
                return Err(CodecError::Malformed(
                    "length-delimited field overruns its container",
                ));
            }
            Ok((FieldValue::Len(buf), len_bytes + len))
        }
        WireType::SGroup => Ok((FieldValue::SGroup, 0)),
        WireType::EGroup => Ok((FieldValue::EGroup, 0)),
    }
}

fn read_fixed<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), CodecError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => CodecError::Malformed("input ended inside a fixed-width value"),
        _ => CodecError::Io(e),
    })
}

/// Reverses the zigzag mapping of signed integers onto unsigned ones.
#[inline]
pub fn zigzag_decode(raw: u64) -> i64 {
    ((raw >> 1) ^ (raw & 1).wrapping_neg()) as i64
}

/// The zigzag mapping itself: small magnitudes of either sign encode small.
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value as u64) << 1) ^ ((value >> 63) as u64)
}
