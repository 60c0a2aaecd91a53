//! Descriptive model ⇄ Arrow schema.
//!
//! The two directions are not inverses. Known losses:
//! - property nullability comes from `required` and type-level nullability
//!   only, so a non-required property comes back as `[T, null]`;
//! - dense union members come back as bare types (annotations dropped);
//! - a simple nullable union comes back null-last: `[null, T]` reads back
//!   as `[T, null]`;
//! - list element nullability is dropped on the way back, so
//!   `Array([T, null])` reads back as `Array(T)`;
//! - every keyword that is not structural (bounds, formats, titles, ...) is
//!   dropped on the way to Arrow.
//!
//! Nullability policy: a field is nullable iff its type is `null`, a union
//! with a `null` member, or an object property missing from `required`.
//! The `root` wrapper, list elements and union members are never "optional",
//! so only the first two rules apply to them.
use std::sync::Arc;

use arrow_schema::{DataType, Field, Fields, Schema, UnionFields, UnionMode};
use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::{Annotations, JsonType, ObjectType, Properties, UnionType};

/// Field name used to wrap a root that does not map to top-level fields.
pub const ROOT_FIELD: &str = "root";

/// Element field name for list types.
pub const LIST_ITEM_FIELD: &str = "item";

// ———————————————————————————————————————————————————————————————————————————
// DESCRIPTIVE → COLUMNAR
// ———————————————————————————————————————————————————————————————————————————

/// Convert a whole schema. An object with declared properties becomes the
/// top-level fields; anything else is wrapped in one `root` field. An object
/// whose only property is itself called `root` is wrapped too, so
/// [`to_descriptive`] can tell the two shapes apart.
pub fn to_columnar(ty: &JsonType) -> Result<Schema> {
    debug!(root = ty.type_name(), "converting to columnar schema");
    if let JsonType::Object(obj) = ty {
        if let Some(props) = &obj.properties {
            if !is_root_shaped(props) {
                return Ok(Schema::new(struct_fields(obj)?));
            }
        }
    }
    Ok(Schema::new(vec![field(ROOT_FIELD, ty, true)?]))
}

pub fn to_arrow_type(ty: &JsonType) -> Result<DataType> {
    match ty {
        JsonType::Untyped(_) => Err(Error::unsupported("untyped schema (no `type` keyword)")),
        JsonType::Null(_) => Ok(DataType::Null),
        JsonType::Boolean(_) => Ok(DataType::Boolean),
        JsonType::Integer(_) => Ok(DataType::Int64),
        JsonType::Number(_) => Ok(DataType::Float64),
        JsonType::String(_) => Ok(DataType::Utf8),
        JsonType::Array(arr) => match arr.item_schema() {
            Some(item) => Ok(DataType::List(Arc::new(field(LIST_ITEM_FIELD, item, true)?))),
            None => Err(Error::unsupported("array without an `items` schema")),
        },
        JsonType::Object(obj) => Ok(DataType::Struct(struct_fields(obj)?)),
        JsonType::Union(u) => match u.simple_nullable() {
            // the enclosing field carries the null
            Some(inner) => to_arrow_type(inner),
            None => dense_union(u),
        },
    }
}

/// `required` here means "not optional"; type-level nullability still wins.
fn field(name: &str, ty: &JsonType, required: bool) -> Result<Field> {
    let nullable = !required || ty.is_nullable();
    Ok(Field::new(name, to_arrow_type(ty)?, nullable))
}

fn struct_fields(obj: &ObjectType) -> Result<Fields> {
    let Some(props) = &obj.properties else {
        return Ok(Fields::empty());
    };
    props
        .iter()
        .map(|(name, ty)| field(name, ty, obj.is_required(name)))
        .collect::<Result<Vec<_>>>()
        .map(Fields::from)
}

fn dense_union(u: &UnionType) -> Result<DataType> {
    let mut type_ids = Vec::with_capacity(u.members().len());
    let mut fields = Vec::with_capacity(u.members().len());
    for (ordinal, member) in u.members().iter().enumerate() {
        let type_id = i8::try_from(ordinal)
            .map_err(|_| Error::unsupported(format!("union with {} members", u.members().len())))?;
        type_ids.push(type_id);
        fields.push(field(member.type_name(), member, true)?);
    }
    Ok(DataType::Union(UnionFields::new(type_ids, fields), UnionMode::Dense))
}

fn is_root_shaped(props: &Properties) -> bool {
    props.len() == 1 && props.contains_key(ROOT_FIELD)
}

// ———————————————————————————————————————————————————————————————————————————
// COLUMNAR → DESCRIPTIVE
// ———————————————————————————————————————————————————————————————————————————

/// Convert a whole schema. A single field named `root` unwraps to its type;
/// any other shape becomes an object with one property per field.
pub fn to_descriptive(schema: &Schema) -> Result<JsonType> {
    let fields = schema.fields();
    debug!(fields = fields.len(), "converting to descriptive schema");
    if fields.len() == 1 && fields[0].name().as_str() == ROOT_FIELD {
        trace!("unwrapping `root` field");
        return from_field(&fields[0]);
    }
    Ok(JsonType::Object(object_from_fields(fields)?))
}

/// Integer and float widths and every string encoding collapse onto the one
/// descriptive kind; only dense unions are accepted.
pub fn from_arrow_type(data_type: &DataType) -> Result<JsonType> {
    match data_type {
        DataType::Null => Ok(JsonType::null()),
        DataType::Boolean => Ok(JsonType::boolean()),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Ok(JsonType::integer()),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => Ok(JsonType::number()),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(JsonType::string()),
        // element nullability is not folded
        DataType::List(item) | DataType::LargeList(item) => {
            Ok(JsonType::array(from_arrow_type(item.data_type())?))
        }
        DataType::Struct(fields) => Ok(JsonType::Object(object_from_fields(fields)?)),
        DataType::Union(fields, UnionMode::Dense) => union_from_fields(fields),
        other => Err(Error::unsupported(format!("arrow type {other}"))),
    }
}

fn from_field(field: &Field) -> Result<JsonType> {
    let base = from_arrow_type(field.data_type())?;
    fold_nullable(base, field.is_nullable())
}

/// `T` on a nullable field → `[T, null]`; a union gains a `null` member
/// instead of being nested.
fn fold_nullable(base: JsonType, nullable: bool) -> Result<JsonType> {
    if !nullable || base.is_nullable() {
        return Ok(base);
    }
    trace!(base = base.type_name(), "folding field nullability into union");
    match base {
        JsonType::Union(u) => {
            let common = u.common.clone();
            let mut members = u.into_members();
            members.push(JsonType::null());
            Ok(JsonType::Union(UnionType::new(members, common)?))
        }
        other => JsonType::union(vec![other, JsonType::null()]),
    }
}

fn object_from_fields(fields: &Fields) -> Result<ObjectType> {
    if fields.is_empty() {
        return Ok(ObjectType::default());
    }
    let mut properties = Properties::with_capacity(fields.len());
    let mut required = IndexSet::new();
    for f in fields.iter() {
        let name = f.name();
        if properties.contains_key(name) {
            return Err(Error::InvalidSchema(format!("duplicate field name `{name}`")));
        }
        if !f.is_nullable() {
            required.insert(name.clone());
        }
        properties.insert(name.clone(), from_field(f)?);
    }
    Ok(ObjectType {
        properties: Some(properties),
        required: (!required.is_empty()).then_some(required),
        ..ObjectType::default()
    })
}

/// Members ordered by type id; member field nullability is not folded.
fn union_from_fields(fields: &UnionFields) -> Result<JsonType> {
    let mut tagged: Vec<_> = fields.iter().collect();
    tagged.sort_by_key(|(type_id, _)| *type_id);
    let members = tagged
        .into_iter()
        .map(|(_, f)| from_arrow_type(f.data_type()))
        .collect::<Result<Vec<_>>>()?;
    Ok(JsonType::Union(UnionType::new(members, Annotations::default())?))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::StringFormat;
    use crate::parse::parse;
    use serde_json::json;

    fn round_trip(ty: &JsonType) -> JsonType {
        to_descriptive(&to_columnar(ty).unwrap()).unwrap()
    }

    #[test]
    fn null_root_is_wrapped() {
        let ty = parse(&json!({"type": "null"})).unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(schema, Schema::new(vec![Field::new("root", DataType::Null, true)]));
    }

    #[test]
    fn object_properties_become_top_level_fields() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
        }))
        .unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(
            schema,
            Schema::new(vec![
                Field::new("name", DataType::Utf8, true),
                Field::new("age", DataType::Int64, true),
            ])
        );
    }

    #[test]
    fn required_properties_are_not_nullable() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "nick": {"type": "string"},
                "email": {"type": ["string", "null"]}
            },
            "required": ["id", "email"]
        }))
        .unwrap();
        let schema = to_columnar(&ty).unwrap();
        let nullability: Vec<(&str, bool)> = schema
            .fields()
            .iter()
            .map(|f| (f.name().as_str(), f.is_nullable()))
            .collect();
        assert_eq!(nullability, [("id", false), ("nick", true), ("email", true)]);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
    }

    #[test]
    fn required_round_trips_through_field_nullability() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}},
            "required": ["id", "name"]
        }))
        .unwrap();
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn optional_properties_come_back_nullable() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
        }))
        .unwrap();
        let expected = JsonType::object([
            ("name", JsonType::union(vec![JsonType::string(), JsonType::null()]).unwrap()),
            ("age", JsonType::union(vec![JsonType::integer(), JsonType::null()]).unwrap()),
        ]);
        assert_eq!(round_trip(&ty), expected);
    }

    #[test]
    fn primitives_round_trip() {
        for ty in [
            JsonType::null(),
            JsonType::boolean(),
            JsonType::integer(),
            JsonType::number(),
            JsonType::string(),
        ] {
            assert_eq!(round_trip(&ty), ty);
        }
    }

    #[test]
    fn formatted_strings_map_to_utf8_and_lose_format() {
        let ty = JsonType::formatted(StringFormat::DateTime);
        assert_eq!(to_arrow_type(&ty).unwrap(), DataType::Utf8);
        assert_eq!(round_trip(&ty), JsonType::string());
    }

    #[test]
    fn simple_nullable_union_unwraps_to_nullable_field() {
        let ty = JsonType::union(vec![JsonType::string(), JsonType::null()]).unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(schema, Schema::new(vec![Field::new("root", DataType::Utf8, true)]));
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn other_unions_become_dense_unions_tagged_by_position() {
        let ty = JsonType::union(vec![JsonType::string(), JsonType::integer()]).unwrap();
        let DataType::Union(fields, mode) = to_arrow_type(&ty).unwrap() else {
            panic!("expected union");
        };
        assert_eq!(mode, UnionMode::Dense);
        let tagged: Vec<(i8, DataType)> = fields.iter().map(|(id, f)| (id, f.data_type().clone())).collect();
        assert_eq!(tagged, [(0, DataType::Utf8), (1, DataType::Int64)]);
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn nullable_multi_union_keeps_null_member() {
        let ty = parse(&json!({"type": ["string", "integer", "null"]})).unwrap();
        let schema = to_columnar(&ty).unwrap();
        let root = schema.field(0);
        assert!(root.is_nullable());
        let DataType::Union(fields, _) = root.data_type() else { panic!("expected union") };
        assert_eq!(fields.len(), 3);
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn union_members_are_read_in_type_id_order() {
        let fields = UnionFields::new(
            vec![5, 1],
            vec![Field::new("b", DataType::Int32, true), Field::new("a", DataType::Utf8, true)],
        );
        let schema = Schema::new(vec![Field::new("root", DataType::Union(fields, UnionMode::Dense), false)]);
        let expected = JsonType::union(vec![JsonType::string(), JsonType::integer()]).unwrap();
        assert_eq!(to_descriptive(&schema).unwrap(), expected);
    }

    #[test]
    fn array_of_strings_round_trips() {
        let ty = parse(&json!({"type": "array", "items": {"type": "string"}})).unwrap();
        let schema = to_columnar(&ty).unwrap();
        let expected_item = Arc::new(Field::new("item", DataType::Utf8, false));
        assert_eq!(schema, Schema::new(vec![Field::new("root", DataType::List(expected_item), false)]));
        assert_eq!(round_trip(&ty), JsonType::array(JsonType::string()));
    }

    #[test]
    fn list_of_union_reads_back_as_array_of_union() {
        let union = DataType::Union(
            UnionFields::new(
                vec![0, 1],
                vec![Field::new("a", DataType::Utf8, true), Field::new("b", DataType::Int32, true)],
            ),
            UnionMode::Dense,
        );
        let schema = Schema::new(vec![Field::new("root", DataType::new_list(union, true), false)]);
        let expected = JsonType::array(JsonType::union(vec![JsonType::string(), JsonType::integer()]).unwrap());
        assert_eq!(to_descriptive(&schema).unwrap(), expected);
    }

    #[test]
    fn nullable_list_elements_read_back_as_bare_items() {
        let schema = Schema::new(vec![Field::new("root", DataType::new_list(DataType::Utf8, true), false)]);
        assert_eq!(to_descriptive(&schema).unwrap(), JsonType::array(JsonType::string()));

        let large = DataType::LargeList(Arc::new(Field::new("item", DataType::Int32, true)));
        assert_eq!(from_arrow_type(&large).unwrap(), JsonType::array(JsonType::integer()));

        let nullable_items = parse(&json!({"type": "array", "items": {"type": ["string", "null"]}})).unwrap();
        let DataType::List(item) = to_arrow_type(&nullable_items).unwrap() else { panic!("expected list") };
        assert!(item.is_nullable());
        assert_eq!(round_trip(&nullable_items), JsonType::array(JsonType::string()));
    }

    #[test]
    fn null_first_simple_union_reads_back_null_last() {
        let ty = JsonType::union(vec![JsonType::null(), JsonType::string()]).unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(schema, Schema::new(vec![Field::new("root", DataType::Utf8, true)]));
        let expected = JsonType::union(vec![JsonType::string(), JsonType::null()]).unwrap();
        assert_eq!(round_trip(&ty), expected);
    }

    #[test]
    fn nullable_root_field_folds_into_union() {
        let schema = Schema::new(vec![Field::new("root", DataType::Utf8, true)]);
        let expected = parse(&json!({"type": ["string", "null"]})).unwrap();
        assert_eq!(to_descriptive(&schema).unwrap(), expected);
    }

    #[test]
    fn nested_objects_become_structs() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}},
                    "required": ["city"]
                },
                "meta": {"type": "object"}
            },
            "required": ["address", "meta"]
        }))
        .unwrap();
        let schema = to_columnar(&ty).unwrap();
        let city = Field::new("city", DataType::Utf8, false);
        assert_eq!(
            schema,
            Schema::new(vec![
                Field::new("address", DataType::Struct(Fields::from(vec![city])), false),
                Field::new("meta", DataType::Struct(Fields::empty()), false),
            ])
        );
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn object_with_single_root_property_stays_unambiguous() {
        let ty = parse(&json!({
            "type": "object",
            "properties": {"root": {"type": "string"}},
            "required": ["root"]
        }))
        .unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(schema.fields().len(), 1);
        assert!(matches!(schema.field(0).data_type(), DataType::Struct(_)));
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn object_without_properties_is_empty_struct() {
        let ty = parse(&json!({"type": "object"})).unwrap();
        let schema = to_columnar(&ty).unwrap();
        assert_eq!(schema, Schema::new(vec![Field::new("root", DataType::Struct(Fields::empty()), false)]));
        assert_eq!(round_trip(&ty), ty);
    }

    #[test]
    fn multi_field_schema_becomes_object() {
        let schema = Schema::new(vec![
            Field::new("root", DataType::Int64, false),
            Field::new("other", DataType::Boolean, false),
        ]);
        let expected = parse(&json!({
            "type": "object",
            "properties": {"root": {"type": "integer"}, "other": {"type": "boolean"}},
            "required": ["root", "other"]
        }))
        .unwrap();
        assert_eq!(to_descriptive(&schema).unwrap(), expected);

        let single = Schema::new(vec![Field::new("value", DataType::Float32, false)]);
        assert_eq!(
            to_descriptive(&single).unwrap(),
            parse(&json!({"type": "object", "properties": {"value": {"type": "number"}}, "required": ["value"]})).unwrap()
        );
    }

    #[test]
    fn unmapped_descriptive_types_are_unsupported() {
        let untyped = parse(&json!({"title": "x"})).unwrap();
        assert!(matches!(to_columnar(&untyped), Err(Error::UnsupportedType(_))));

        let any_items = parse(&json!({"type": "array", "items": true})).unwrap();
        assert!(matches!(to_columnar(&any_items), Err(Error::UnsupportedType(_))));

        let tuple = parse(&json!({"type": "array", "prefixItems": [{"type": "string"}]})).unwrap();
        assert!(matches!(to_columnar(&tuple), Err(Error::UnsupportedType(_))));

        let nested = parse(&json!({
            "type": "object",
            "properties": {"anything": {}}
        }))
        .unwrap();
        assert!(matches!(to_columnar(&nested), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn unmapped_arrow_types_are_unsupported() {
        let binary = Schema::new(vec![Field::new("root", DataType::Binary, false)]);
        let err = to_descriptive(&binary).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(ref kind) if kind.contains("Binary")));

        let sparse = DataType::Union(
            UnionFields::new(
                vec![0, 1],
                vec![Field::new("a", DataType::Utf8, false), Field::new("b", DataType::Int64, false)],
            ),
            UnionMode::Sparse,
        );
        assert!(matches!(from_arrow_type(&sparse), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn duplicate_struct_fields_are_rejected() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("a", DataType::Utf8, false),
        ]);
        assert!(matches!(to_descriptive(&schema), Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn narrow_arrow_types_widen_to_descriptive_kinds() {
        assert_eq!(from_arrow_type(&DataType::UInt16).unwrap(), JsonType::integer());
        assert_eq!(from_arrow_type(&DataType::Float32).unwrap(), JsonType::number());
        assert_eq!(from_arrow_type(&DataType::LargeUtf8).unwrap(), JsonType::string());
    }
}
