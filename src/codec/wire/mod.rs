//! A generic Protocol Buffers wire-format reader: tag and value decoding,
//! owned messages with cursor navigation, and packed-field expansion.

pub mod field;
pub mod message;


pub use field::{
    read_tag, read_value, read_varint, zigzag_decode, zigzag_encode, Field, FieldValue, WireType,
};
pub use message::{Cursor, Direction, Expect, FieldNum, Message};
