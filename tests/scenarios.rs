//! End-to-end behavior through the public API only.
use schemamap::arrow_schema::{DataType, Field};
use schemamap::model::{Format, JsonType};
use schemamap::{Error, flatten, parse, to_columnar, to_descriptive};
use serde_json::json;

fn round_trip(ty: &JsonType) -> JsonType {
    to_descriptive(&to_columnar(ty).unwrap()).unwrap()
}

#[test]
fn primitives_round_trip_without_loss() {
    for ty in [
        JsonType::null(),
        JsonType::boolean(),
        JsonType::integer(),
        JsonType::number(),
        JsonType::string(),
    ] {
        assert_eq!(round_trip(&ty), ty, "{}", ty.type_name());
    }
}

#[test]
fn simple_nullable_union_round_trips() {
    let ty = JsonType::union(vec![JsonType::string(), JsonType::null()]).unwrap();
    assert_eq!(round_trip(&ty), ty);
}

#[test]
fn union_member_order_survives() {
    let ty = JsonType::union(vec![JsonType::string(), JsonType::integer()]).unwrap();
    let back = round_trip(&ty);
    assert_eq!(back, ty);
    let JsonType::Union(u) = back else { panic!("expected a union") };
    assert_eq!(u.type_names(), ["string", "integer"]);
}

#[test]
fn null_document_maps_to_single_root_field() {
    let schema = to_columnar(&parse(&json!({"type": "null"})).unwrap()).unwrap();
    assert_eq!(schema.fields().len(), 1);
    assert_eq!(schema.field(0).name(), "root");
    assert_eq!(schema.field(0).data_type(), &DataType::Null);
}

#[test]
fn object_document_maps_to_ordered_fields() {
    let doc = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
    });
    let schema = to_columnar(&parse(&doc).unwrap()).unwrap();
    let fields: Vec<(&str, &DataType)> = schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type()))
        .collect();
    assert_eq!(fields, [("name", &DataType::Utf8), ("age", &DataType::Int64)]);
}

#[test]
fn array_of_strings_round_trips() {
    let ty = parse(&json!({"type": "array", "items": {"type": "string"}})).unwrap();
    assert_eq!(round_trip(&ty), JsonType::array(JsonType::string()));
}

#[test]
fn nested_address_flattens_into_compound_key() {
    let doc = json!({
        "type": "object",
        "properties": {
            "address": {"type": "object", "properties": {"city": {"type": "string"}}}
        }
    });
    let expected = json!({"type": "object", "properties": {"address__city": {"type": "string"}}});
    let flat = flatten(&parse(&doc).unwrap(), 10, "__").unwrap();
    assert_eq!(flat, parse(&expected).unwrap());
}

#[test]
fn flatten_is_idempotent_and_zero_depth_is_identity() {
    let doc = json!({
        "type": "object",
        "properties": {
            "a": {"type": "object", "properties": {
                "b": {"type": "object", "properties": {"c": {"type": "boolean"}}},
                "d": {"type": "array", "items": {"type": "object", "properties": {"e": {"type": "string"}}}}
            }}
        }
    });
    let ty = parse(&doc).unwrap();
    let once = flatten(&ty, 10, "__").unwrap();
    assert_eq!(flatten(&once, 10, "__").unwrap(), once);
    assert_eq!(flatten(&ty, 0, "__").unwrap(), ty);
    assert_eq!(flatten(&JsonType::string(), 0, "__").unwrap(), JsonType::string());
}

#[test]
fn unknown_format_is_kept_as_data() {
    let ty = parse(&json!({"type": "string", "format": "x-custom"})).unwrap();
    let JsonType::String(s) = &ty else { panic!("expected a string") };
    assert_eq!(s.format, Some(Format::Custom("x-custom".into())));
    assert!(s.specialization().is_none());
}

#[test]
fn required_properties_drive_field_nullability() {
    let doc = json!({
        "type": "object",
        "properties": {"id": {"type": "integer"}, "note": {"type": "string"}},
        "required": ["id"]
    });
    let schema = to_columnar(&parse(&doc).unwrap()).unwrap();
    assert_eq!(schema.field(0), &Field::new("id", DataType::Int64, false));
    assert_eq!(schema.field(1), &Field::new("note", DataType::Utf8, true));
}

#[test]
fn colliding_flattened_keys_are_an_error() {
    let doc = json!({
        "type": "object",
        "properties": {
            "x_y": {"type": "string"},
            "x": {"type": "object", "properties": {"y": {"type": "string"}}}
        }
    });
    let err = flatten(&parse(&doc).unwrap(), 10, "_").unwrap_err();
    assert!(matches!(err, Error::KeyCollision { ref key } if key == "x_y"));
}

#[test]
fn malformed_keyword_reports_its_location() {
    let doc = json!({"type": "object", "properties": {"age": {"type": "integer", "minimum": "zero"}}});
    match parse(&doc).unwrap_err() {
        Error::MalformedSchema { path, keyword, .. } => {
            assert_eq!(path, "/properties/age");
            assert_eq!(keyword, "minimum");
        }
        other => panic!("unexpected error: {other}"),
    }
}
