//! The in-memory map model and the entry point that builds it.

use std::io::Read;

use log::{debug, trace};

use crate::codec::blob::BlobIterator;
use crate::codec::block::BlockItem;
use crate::codec::element::{Node, StringTable, Way};
use crate::codec::error::CodecError;
use crate::codec::wire::{
    zigzag_decode, Cursor, Direction, Expect, Field, FieldNum, Message, WireType,
};


/// Map extents in nanodegrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    min_lon: i64,
    max_lon: i64,
    max_lat: i64,
    min_lat: i64,
}

impl BBox {
    pub fn min_lon(&self) -> i64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> i64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> i64 {
        self.max_lat
    }

    pub fn min_lat(&self) -> i64 {
        self.min_lat
    }

    /// Extracts the bounding box of a HeaderBlock: sub-message #1 with four
    /// zigzag-coded corners. Any corner missing means no box, which is not
    /// an error.
    fn from_header_block(header: &Message) -> Result<Option<BBox>, CodecError> {
        let bytes = match header.get(1, Expect::Is(WireType::Len)) {
            Some(field) => field.as_len().unwrap_or_default(),
            None => {
                debug!("header block carries no bounding box");
                return Ok(None);
            }
        };

        let bbox = Message::read_embedded(bytes)?;
        let corner = |fnum| {
            bbox.get(fnum, Expect::Is(WireType::Varint))
                .and_then(Field::as_varint)
                .map(zigzag_decode)
        };

        match (corner(1), corner(2), corner(3), corner(4)) {
            (Some(min_lon), Some(max_lon), Some(max_lat), Some(min_lat)) => Ok(Some(BBox {
                min_lon,
                max_lon,
                max_lat,
                min_lat,
            })),
            _ => {
                debug!("header bounding box incomplete, ignoring");
                Ok(None)
            }
        }
    }
}

/// Everything a file decodes to: an optional bounding box plus nodes and
/// ways in the order the stream delivered them. Dropping the map releases
/// the whole graph.
#[derive(Debug, Default)]
pub struct Map {
    bbox: Option<BBox>,
    nodes: Vec<Node>,
    ways: Vec<Way>,
}

/// Reads a whole PBF byte stream into a `Map`. Any decode error aborts and
/// propagates; intermediate buffers are released as each frame completes.
pub fn read_map<R: Read>(source: R) -> Result<Map, CodecError> {
    let mut map = Map::default();

    for blob in BlobIterator::new(source) {
        match BlockItem::from_blob(&blob?)? {
            Some(BlockItem::Header(header)) => map.apply_header(&header)?,
            Some(BlockItem::Primitive(block)) => map.apply_primitive(&block)?,
            None => {}
        }
    }

    debug!("map loaded: {} nodes, {} ways", map.num_nodes(), map.num_ways());
    Ok(map)
}

impl Map {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_ways(&self) -> usize {
        self.ways.len()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn way(&self, index: usize) -> Option<&Way> {
        self.ways.get(index)
    }

    pub fn bbox(&self) -> Option<&BBox> {
        self.bbox.as_ref()
    }

    /// Linear lookup of a node by its id.
    pub fn node_by_id(&self, id: i64) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Linear lookup of a way by its id.
    pub fn way_by_id(&self, id: i64) -> Option<&Way> {
        self.ways.iter().find(|w| w.id() == id)
    }

    fn apply_header(&mut self, header: &Message) -> Result<(), CodecError> {
        if let Some(bbox) = BBox::from_header_block(header)? {
            if self.bbox.replace(bbox).is_some() {
                debug!("later header block overwrites the bounding box");
            }
        }
        Ok(())
    }

    /// Decodes one PrimitiveBlock: expand its string table, then walk the
    /// repeated PrimitiveGroups (#2). The table is dropped when this
    /// returns; ways copy their strings out of it.
    fn apply_primitive(&mut self, block: &Message) -> Result<(), CodecError> {
        let strings = StringTable::from_block(block)?;

        let mut cursor = Cursor::HEAD;
        while let Some(next) =
            block.next_field(cursor, FieldNum::Is(2), Expect::Is(WireType::Len), Direction::Forward)
        {
            cursor = next;
            let bytes = block.field(next).and_then(|f| f.as_len()).unwrap_or_default();
            let group = Message::read_embedded(bytes)?;
            self.apply_group(&group, &strings)?;
        }
        Ok(())
    }

    fn apply_group(&mut self, group: &Message, strings: &StringTable) -> Result<(), CodecError> {
        // Plain nodes (#1), relations (#6) and changesets (#7) are not
        // implemented; their fields are skipped.
        for field in group.iter() {
            if matches!(field.number, 1 | 6 | 7) {
                trace!("skipping primitive group field #{}", field.number);
            }
        }

        if let Some(dense) = group.get(2, Expect::Is(WireType::Len)) {
            let bytes = dense.as_len().unwrap_or_default();
            let nodes = Node::from_dense(Message::read_embedded(bytes)?)?;
            self.nodes.extend(nodes);
        }

        let mut cursor = Cursor::HEAD;
        while let Some(next) =
            group.next_field(cursor, FieldNum::Is(3), Expect::Is(WireType::Len), Direction::Forward)
        {
            cursor = next;
            let bytes = group.field(next).and_then(|f| f.as_len()).unwrap_or_default();
            let way = Message::read_embedded(bytes)?;
            if let Some(way) = Way::from_message(way, strings)? {
                self.ways.push(way);
            }
        }
        Ok(())
    }
}
