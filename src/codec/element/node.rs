//! Describes a `Node` and the DenseNodes decoding that produces most of
//! them.

use log::trace;

use crate::codec::element::collect_varints;
use crate::codec::error::CodecError;
use crate::codec::wire::{zigzag_decode, Message, WireType};

/// Nanodegrees per coordinate unit at the default granularity.
const DEFAULT_GRANULARITY: i64 = 100;

/// A geographic point with its identifier and tags. Coordinates are in
/// nanodegrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: i64,
    lat: i64,
    lon: i64,
    tags: Vec<(String, String)>,
}

impl Node {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Latitude in nanodegrees.
    pub fn lat(&self) -> i64 {
        self.lat
    }

    /// Longitude in nanodegrees.
    pub fn lon(&self) -> i64 {
        self.lon
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

    /// Decodes a DenseNodes sub-message: packed ids (#1), latitudes (#8)
    /// and longitudes (#9), each zigzag- and delta-coded. The three arrays
    /// must agree in length. Dense tag arrays are not decoded; every node
    /// comes out untagged.
    pub fn from_dense(mut dense: Message) -> Result<Vec<Node>, CodecError> {
        dense.expand_packed(1, WireType::Varint)?;
        dense.expand_packed(8, WireType::Varint)?;
        dense.expand_packed(9, WireType::Varint)?;

        let ids = collect_varints(&dense, 1);
        let lats = collect_varints(&dense, 8);
        let lons = collect_varints(&dense, 9);
        if ids.len() != lats.len() || ids.len() != lons.len() {
            return Err(CodecError::Malformed("dense node arrays differ in length"));
        }

        let mut nodes = Vec::with_capacity(ids.len());
        let (mut id, mut lat, mut lon) = (0i64, 0i64, 0i64);
        for i in 0..ids.len() {
            id = id.wrapping_add(zigzag_decode(ids[i]));
            lat = lat.wrapping_add(zigzag_decode(lats[i]));
            lon = lon.wrapping_add(zigzag_decode(lons[i]));
            nodes.push(Node {
                id,
                lat: lat.wrapping_mul(DEFAULT_GRANULARITY),
                lon: lon.wrapping_mul(DEFAULT_GRANULARITY),
                tags: Vec::new(),
            });
        }

        trace!("decoded {} dense nodes", nodes.len());
        Ok(nodes)
    }
}
