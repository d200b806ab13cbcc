//! Domain decoders for the entities a PrimitiveBlock carries.

pub mod node;
pub mod way;

#[cfg(test)]
mod test;

pub use node::Node;
pub use way::Way;

use log::debug;

use crate::codec::error::CodecError;
use crate::codec::wire::{Cursor, Direction, Expect, Field, FieldNum, Message, WireType};

/// Gathers every varint field numbered `fnum`, in order. Callers expand
/// packed runs first, so this sees both packed and unpacked encodings.
pub(crate) fn collect_varints(msg: &Message, fnum: u32) -> Vec<u64> {
    msg.iter()
        .filter(|f| f.number == fnum)
        .filter_map(Field::as_varint)
        .collect()
}

/// The PrimitiveBlock string table, expanded to owned strings. It lives
/// only for the duration of one block decode; entities copy out what they
/// keep.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    /// Expands field #1 of a PrimitiveBlock, a sub-message holding one
    /// repeated LEN field of raw bytes. A block without one yields an
    /// empty table.
    pub fn from_block(block: &Message) -> Result<StringTable, CodecError> {
        let bytes = match block.get(1, Expect::Is(WireType::Len)) {
            Some(field) => field.as_len().unwrap_or_default(),
            None => {
                debug!("primitive block carries no string table");
                return Ok(StringTable::default());
            }
        };

        let table = Message::read_embedded(bytes)?;
        let mut strings = Vec::with_capacity(table.len());
        let mut cursor = Cursor::HEAD;
        while let Some(next) =
            table.next_field(cursor, FieldNum::Is(1), Expect::Is(WireType::Len), Direction::Forward)
        {
            if let Some(raw) = table.field(next).and_then(|f| f.as_len()) {
                strings.push(String::from_utf8_lossy(raw).into_owned());
            }
            cursor = next;
        }

        debug!("expanded string table of {} entries", strings.len());
        Ok(StringTable { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Resolves an index; out-of-range indices read as the empty string.
    pub fn get(&self, index: usize) -> &str {
        match self.strings.get(index) {
            Some(s) => s.as_str(),
            None => {
                debug!("string table index {index} out of range");
                ""
            }
        }
    }
}
