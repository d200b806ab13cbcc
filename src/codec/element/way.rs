//! Describes a `Way`: an ordered run of node references with tags.

use log::{trace, warn};

use crate::codec::element::{collect_varints, StringTable};
use crate::codec::error::CodecError;
use crate::codec::wire::{zigzag_decode, Expect, Field, Message, WireType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    id: i64,
    refs: Vec<i64>,
    tags: Vec<(String, String)>,
}

impl Way {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn num_refs(&self) -> usize {
        self.refs.len()
    }

    /// The node id referenced at `index`.
    pub fn reference(&self, index: usize) -> Option<i64> {
        self.refs.get(index).copied()
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.tags.get(index).map(|(k, _)| k.as_str())
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.tags.get(index).map(|(_, v)| v.as_str())
    }

    /// Decodes one Way sub-message against the block string table. Key and
    /// value indices (#2/#3) resolve through the table, pairing `keys[i]`
    /// with `vals[i]`; refs (#8) are zigzag- and delta-coded back to
    /// absolute node ids. Strings are copied out of the table, so the `Way`
    /// outlives it. A way without an id (#1) yields `None`.
    pub fn from_message(mut way: Message, strings: &StringTable) -> Result<Option<Way>, CodecError> {
        let id = match way.get(1, Expect::Is(WireType::Varint)).and_then(Field::as_varint) {
            Some(id) => id as i64,
            None => {
                warn!("way without an id, skipping");
                return Ok(None);
            }
        };

        way.expand_packed(2, WireType::Varint)?;
        way.expand_packed(3, WireType::Varint)?;
        way.expand_packed(8, WireType::Varint)?;

        let keys = collect_varints(&way, 2);
        let vals = collect_varints(&way, 3);
        let tags = keys
            .iter()
            .zip(vals.iter())
            .map(|(&k, &v)| {
                (
                    strings.get(k as usize).to_owned(),
                    strings.get(v as usize).to_owned(),
                )
            })
            .collect();

        let mut running = 0i64;
        let refs = collect_varints(&way, 8)
            .into_iter()
            .map(|raw| {
                running = running.wrapping_add(zigzag_decode(raw));
                running
            })
            .collect::<Vec<_>>();

        trace!("decoded way {id}: {} refs, {} tags", refs.len(), keys.len());
        Ok(Some(Way { id, refs, tags }))
    }
}
