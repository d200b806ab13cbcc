//! The `Message`: an owned, ordered field sequence with cursor navigation
//! and packed-field expansion.

use std::io::{Cursor as IoCursor, Read};

use crate::codec::error::CodecError;
use crate::codec::wire::field::{read_tag, read_value, Field, FieldValue, WireType};

/// Which field numbers a navigation call stops on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNum {
    Any,
    Is(u32),
}

/// Which wire type a matching field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Any,
    Is(WireType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A stable handle to a position in a message: either a concrete field, or
/// the head marker that traversal starts from and terminates on. The head
/// takes the place of the sentinel node in a circular field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(Option<usize>);

impl Cursor {
    pub const HEAD: Cursor = Cursor(None);
}

/// An ordered collection of fields, preserving source order and duplicates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Message {
    fields: Vec<Field>,
}

impl Message {
    /// Reads exactly `len` bytes of consecutive fields. Fields that overrun
    /// the length, or input that ends before it, are malformed. `len == 0`
    /// is the empty message.
    pub fn read<R: Read>(r: &mut R, len: usize) -> Result<Message, CodecError> {
        let mut limited = r.by_ref().take(len as u64);
        let mut fields = Vec::new();
        let mut consumed = 0usize;

        while consumed < len {
            let (number, wire, tag_bytes) = read_tag(&mut limited)?.ok_or(
                CodecError::Malformed("message ended before its declared length"),
            )?;
            let (value, value_bytes) = read_value(&mut limited, wire)?;
            consumed += tag_bytes + value_bytes;
            fields.push(Field { number, value });
        }

        Ok(Message { fields })
    }

    /// Parses an in-memory buffer as one whole message.
    pub fn read_embedded(buf: &[u8]) -> Result<Message, CodecError> {
        Message::read(&mut IoCursor::new(buf), buf.len())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// The last field with the given number, per protobuf last-value-wins.
    /// Under `Expect::Is`, a matching number with the wrong wire type reads
    /// as absent.
    pub fn get(&self, fnum: u32, expect: Expect) -> Option<&Field> {
        let found = self.fields.iter().rev().find(|f| f.number == fnum)?;
        match expect {
            Expect::Any => Some(found),
            Expect::Is(wire) if found.wire_type() == wire => Some(found),
            Expect::Is(_) => None,
        }
    }

    /// Steps from `cursor` to the next field matching `fnum` and `expect`
    /// in the given direction. Returns `None` once the head marker is
    /// reached again; traversal never wraps past it.
    pub fn next_field(
        &self,
        cursor: Cursor,
        fnum: FieldNum,
        expect: Expect,
        dir: Direction,
    ) -> Option<Cursor> {
        let mut idx = match (dir, cursor.0) {
            (Direction::Forward, None) => 0,
            (Direction::Forward, Some(i)) => i + 1,
            (Direction::Backward, None) => self.fields.len().checked_sub(1)?,
            (Direction::Backward, Some(i)) => i.checked_sub(1)?,
        };

        loop {
            let field = self.fields.get(idx)?;
            let num_ok = match fnum {
                FieldNum::Any => true,
                FieldNum::Is(n) => field.number == n,
            };
            let type_ok = match expect {
                Expect::Any => true,
                Expect::Is(wire) => field.wire_type() == wire,
            };
            if num_ok && type_ok {
                return Some(Cursor(Some(idx)));
            }
            match dir {
                Direction::Forward => idx += 1,
                Direction::Backward => idx = idx.checked_sub(1)?,
            }
        }
    }

    /// The field a cursor points at. The head marker holds no field.
    pub fn field(&self, cursor: Cursor) -> Option<&Field> {
        self.fields.get(cursor.0?)
    }

    /// Replaces every packed LEN field numbered `fnum` with the run of
    /// `wire`-typed fields its payload encodes, spliced in place. Every
    /// matching payload is decoded before the field list is touched, so a
    /// malformed occurrence anywhere leaves the whole message unchanged.
    /// Succeeds silently when no field matches.
    pub fn expand_packed(&mut self, fnum: u32, wire: WireType) -> Result<(), CodecError> {
        if matches!(wire, WireType::Len | WireType::SGroup | WireType::EGroup) {
            return Err(CodecError::Malformed(
                "packed expansion requires a primitive wire type",
            ));
        }

        let mut planned = Vec::new();
        for (idx, field) in self.fields.iter().enumerate() {
            if field.number != fnum {
                continue;
            }
            if let FieldValue::Len(buf) = &field.value {
                planned.push((idx, expand_payload(buf, fnum, wire)?));
            }
        }

        // Splice back-to-front so the recorded indices stay valid.
        for (idx, expanded) in planned.into_iter().rev() {
            self.fields.splice(idx..=idx, expanded);
        }
        Ok(())
    }
}

/// Decodes a packed payload as a concatenation of `wire`-typed values.
fn expand_payload(buf: &[u8], fnum: u32, wire: WireType) -> Result<Vec<Field>, CodecError> {
    let mut r = IoCursor::new(buf);
    let mut fields = Vec::new();
    let mut consumed = 0usize;

    while consumed < buf.len() {
        let (value, n) = read_value(&mut r, wire)?;
        consumed += n;
        fields.push(Field {
            number: fnum,
            value,
        });
    }
    Ok(fields)
}

impl IntoIterator for Message {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
