//! Domain-decoder tests: string tables, dense nodes, and ways.

use crate::codec::element::{Node, StringTable, Way};
use crate::codec::error::CodecError;
use crate::codec::test::{
    packed_varints, packed_zigzag_deltas, primitive_block, put_len_field, put_varint_field, way,
};
use crate::codec::wire::Message;

fn table_for(strings: &[&str]) -> StringTable {
    let block = Message::read_embedded(&primitive_block(strings, &[])).unwrap();
    StringTable::from_block(&block).unwrap()
}

#[test]
fn expands_the_string_table() {
    let table = table_for(&["", "highway", "service"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(0), "");
    assert_eq!(table.get(1), "highway");
    assert_eq!(table.get(2), "service");
}

#[test]
fn out_of_range_string_indices_read_as_empty() {
    let table = table_for(&[""]);
    assert_eq!(table.get(7), "");

    let block = Message::read_embedded(&[]).unwrap();
    let empty = StringTable::from_block(&block).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.get(0), "");
}

#[test]
fn decodes_dense_nodes_with_deltas() {
    let mut dense = Vec::new();
    put_len_field(&mut dense, 1, &packed_zigzag_deltas(&[100, 101, 50]));
    put_len_field(&mut dense, 8, &packed_zigzag_deltas(&[10, -10, 0]));
    put_len_field(&mut dense, 9, &packed_zigzag_deltas(&[-20, 20, -1]));

    let nodes = Node::from_dense(Message::read_embedded(&dense).unwrap()).unwrap();
    assert_eq!(nodes.len(), 3);

    assert_eq!(nodes[0].id(), 100);
    assert_eq!(nodes[1].id(), 101);
    assert_eq!(nodes[2].id(), 50);

    // Coordinate units scale to nanodegrees at the default granularity.
    assert_eq!(nodes[0].lat(), 1_000);
    assert_eq!(nodes[0].lon(), -2_000);
    assert_eq!(nodes[1].lat(), -1_000);
    assert_eq!(nodes[1].lon(), 2_000);
    assert_eq!(nodes[2].lat(), 0);
    assert_eq!(nodes[2].lon(), -100);

    // Dense tags are not decoded.
    assert_eq!(nodes[0].num_tags(), 0);
    assert!(nodes[0].key(0).is_none());
    assert!(nodes[0].value(0).is_none());
}

#[test]
fn empty_dense_message_yields_no_nodes() {
    let nodes = Node::from_dense(Message::read_embedded(&[]).unwrap()).unwrap();
    assert!(nodes.is_empty());
}

#[test]
fn mismatched_dense_arrays_are_malformed() {
    let mut dense = Vec::new();
    put_len_field(&mut dense, 1, &packed_zigzag_deltas(&[1, 2]));
    put_len_field(&mut dense, 8, &packed_zigzag_deltas(&[10, 20]));
    put_len_field(&mut dense, 9, &packed_zigzag_deltas(&[30]));

    let result = Node::from_dense(Message::read_embedded(&dense).unwrap());
    assert!(matches!(result, Err(CodecError::Malformed(_))));
}

#[test]
fn decodes_a_way_against_the_string_table() {
    let table = table_for(&["", "highway", "service"]);
    let bytes = way(42, &[1], &[2], &[100, 90, 110]);
    let decoded = Way::from_message(Message::read_embedded(&bytes).unwrap(), &table)
        .unwrap()
        .expect("way has an id");

    assert_eq!(decoded.id(), 42);
    assert_eq!(decoded.num_refs(), 3);
    assert_eq!(decoded.reference(0), Some(100));
    assert_eq!(decoded.reference(1), Some(90));
    assert_eq!(decoded.reference(2), Some(110));
    assert_eq!(decoded.reference(3), None);
    assert_eq!(decoded.num_tags(), 1);
    assert_eq!(decoded.key(0), Some("highway"));
    assert_eq!(decoded.value(0), Some("service"));
}

#[test]
fn way_tag_indices_out_of_range_read_as_empty() {
    let table = table_for(&["", "highway"]);
    let bytes = way(7, &[1, 40], &[41, 1], &[]);
    let decoded = Way::from_message(Message::read_embedded(&bytes).unwrap(), &table)
        .unwrap()
        .expect("way has an id");

    assert_eq!(decoded.num_tags(), 2);
    assert_eq!(decoded.key(0), Some("highway"));
    assert_eq!(decoded.value(0), Some(""));
    assert_eq!(decoded.key(1), Some(""));
    assert_eq!(decoded.value(1), Some("highway"));
}

#[test]
fn way_without_an_id_is_skipped() {
    let mut bytes = Vec::new();
    put_len_field(&mut bytes, 8, &packed_zigzag_deltas(&[1, 2]));

    let table = table_for(&[""]);
    let decoded = Way::from_message(Message::read_embedded(&bytes).unwrap(), &table).unwrap();
    assert!(decoded.is_none());
}

#[test]
fn unpacked_repeated_fields_decode_too() {
    // Repeated varints may also arrive unpacked; the decoders accept both.
    let mut bytes = Vec::new();
    put_varint_field(&mut bytes, 1, 9);
    put_varint_field(&mut bytes, 2, 1);
    put_varint_field(&mut bytes, 3, 1);
    put_len_field(&mut bytes, 8, &packed_varints(&[2])); // zigzag(1)

    let table = table_for(&["", "name"]);
    let decoded = Way::from_message(Message::read_embedded(&bytes).unwrap(), &table)
        .unwrap()
        .expect("way has an id");

    assert_eq!(decoded.id(), 9);
    assert_eq!(decoded.key(0), Some("name"));
    assert_eq!(decoded.value(0), Some("name"));
    assert_eq!(decoded.reference(0), Some(1));
}
