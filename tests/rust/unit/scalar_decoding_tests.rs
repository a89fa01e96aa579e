//! Unit tests for scalar, node and edge decoding

use graphwire::protocol::{TypeTag, EDGE_PROPERTIES_OFFSET, NODE_PROPERTIES_OFFSET};
use graphwire::result::ScalarDecoder;
use graphwire::{GraphError, MetadataCache, Property, RawValue, StaticSchema, Value};
use serde_json::json;

fn raw(value: serde_json::Value) -> RawValue {
    RawValue::try_from(value).unwrap()
}

#[test]
fn test_scalar_decoding_is_pure() {
    let cache = MetadataCache::new();
    let schema = StaticSchema::default();
    let mut decoder = ScalarDecoder::new(&cache, &schema);

    let inputs = vec![
        (TypeTag::Null, json!(null)),
        (TypeTag::String, json!("Valentino Rossi")),
        (TypeTag::Integer, json!(46)),
        (TypeTag::Boolean, json!("true")),
        (TypeTag::Double, json!("12.5")),
    ];

    for (tag, input) in inputs {
        let value = raw(input);
        let first = decoder.decode_scalar(tag, &value).unwrap();
        let second = decoder.decode_scalar(tag, &value).unwrap();
        assert_eq!(first, second, "Failed for tag: {:?}", tag);
    }

    // scalars never touch the schema cache
    assert_eq!(cache.metrics().fetches, 0);
}

#[test]
fn test_node_property_order_is_stable() {
    let cache = MetadataCache::new();
    let schema = StaticSchema::with_property_keys(["name", "color", "age"]);
    let mut decoder = ScalarDecoder::new(&cache, &schema);

    let node = raw(json!([7, [0], [[2, 3, 30], [0, 2, "dest1"], [1, 2, "magenta"]]]));
    let first = decoder.decode_node(&node).unwrap();
    let second = decoder.decode_node(&node).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        Value::Node(vec![
            Property::new("name", "dest1"),
            Property::new("color", "magenta"),
            Property::new("age", 30_i64),
        ])
    );
}

#[test]
fn test_duplicate_property_entries_are_kept() {
    let cache = MetadataCache::new();
    let schema = StaticSchema::with_property_keys(["tag"]);
    let mut decoder = ScalarDecoder::new(&cache, &schema);

    let node = raw(json!([1, [], [[0, 2, "a"], [0, 2, "b"]]]));
    let props = decoder.decode_node(&node).unwrap();
    assert_eq!(props.properties().map(|p| p.len()), Some(2));
}

#[test]
fn test_property_offsets() {
    assert_eq!(NODE_PROPERTIES_OFFSET, 2);
    assert_eq!(EDGE_PROPERTIES_OFFSET, 4);
}

#[test]
fn test_node_tuple_too_short() {
    let cache = MetadataCache::new();
    let schema = StaticSchema::default();
    let mut decoder = ScalarDecoder::new(&cache, &schema);

    let err = decoder.decode_edge(&raw(json!([1, 0, 0]))).unwrap_err();
    assert!(matches!(err, GraphError::MalformedReply { .. }));
}

#[test]
fn test_path_is_unsupported_inside_arrays() {
    let cache = MetadataCache::new();
    let schema = StaticSchema::default();
    let mut decoder = ScalarDecoder::new(&cache, &schema);

    let err = decoder
        .decode_scalar(TypeTag::Array, &raw(json!([[3, 1], [9, []]])))
        .unwrap_err();
    assert!(matches!(err, GraphError::UnsupportedType { tag: TypeTag::Path }));
}
