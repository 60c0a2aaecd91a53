//! [`JsonType`] → JSON Schema document.
//!
//! Inverse of [`crate::parse`] for parsed trees: `parse(&to_json(&t)) == t`.
//! Union members are written back as one `type` array with their variant
//! keywords merged into the union's own object; member annotations have no
//! slot in that shape and are not written.
use serde_json::{Map, Value};

use crate::model::{
    Annotations, ArrayType, JsonType, NumericType, ObjectType, Properties, SchemaOrBool,
    StringType,
};

pub fn to_json(ty: &JsonType) -> Value {
    let mut out = Map::new();
    match ty {
        JsonType::Union(u) => {
            out.insert(
                "type".into(),
                Value::Array(u.type_names().into_iter().map(Value::from).collect()),
            );
            annotations(&u.common, &mut out);
            for member in u.members() {
                keywords(member, &mut out);
            }
        }
        JsonType::Untyped(a) => annotations(a, &mut out),
        other => {
            out.insert("type".into(), Value::from(other.type_name()));
            annotations(other.annotations(), &mut out);
            keywords(other, &mut out);
        }
    }
    Value::Object(out)
}

// ------------------------------- Sections --------------------------------- //

fn annotations(a: &Annotations, out: &mut Map<String, Value>) {
    put(out, "$id", a.id.clone().map(Value::from));
    put(out, "$schema", a.schema.clone().map(Value::from));
    put(out, "$comment", a.comment.clone().map(Value::from));
    put(out, "title", a.title.clone().map(Value::from));
    put(out, "description", a.description.clone().map(Value::from));
    put(out, "default", a.default.clone());
    put(out, "examples", a.examples.clone().map(Value::Array));
    put(out, "readOnly", a.read_only.map(Value::from));
    put(out, "writeOnly", a.write_only.map(Value::from));
    put(out, "deprecated", a.deprecated.map(Value::from));
    put(out, "enum", a.enum_.clone().map(Value::Array));
    put(out, "const", a.const_.clone());
}

/// Variant-specific keywords only (no `type`, no annotations).
fn keywords(ty: &JsonType, out: &mut Map<String, Value>) {
    match ty {
        JsonType::Untyped(_) | JsonType::Null(_) | JsonType::Boolean(_) => {}
        JsonType::Integer(n) | JsonType::Number(n) => numeric(n, out),
        JsonType::String(s) => string(s, out),
        JsonType::Array(a) => array(a, out),
        JsonType::Object(o) => object(o, out),
        // Nested unions cannot be spelled with a flat `type` array.
        JsonType::Union(u) => {
            for member in u.members() {
                keywords(member, out);
            }
        }
    }
}

fn numeric(n: &NumericType, out: &mut Map<String, Value>) {
    put(out, "minimum", n.minimum.clone().map(Value::Number));
    put(out, "maximum", n.maximum.clone().map(Value::Number));
    put(out, "exclusiveMinimum", n.exclusive_minimum.map(Value::from));
    put(out, "exclusiveMaximum", n.exclusive_maximum.map(Value::from));
    put(out, "multipleOf", n.multiple_of.clone().map(Value::Number));
}

fn string(s: &StringType, out: &mut Map<String, Value>) {
    put(out, "format", s.format.as_ref().map(|f| Value::from(f.as_str())));
    put(out, "minLength", s.min_length.map(Value::from));
    put(out, "maxLength", s.max_length.map(Value::from));
    put(out, "pattern", s.pattern.clone().map(Value::from));
}

fn array(a: &ArrayType, out: &mut Map<String, Value>) {
    put(out, "items", a.items.as_ref().map(schema_or_bool));
    put(out, "prefixItems", a.prefix_items.as_deref().map(list));
    put(out, "additionalItems", a.additional_items.as_ref().map(schema_or_bool));
    put(out, "unevaluatedItems", a.unevaluated_items.as_ref().map(schema_or_bool));
    put(out, "contains", a.contains.as_deref().map(to_json));
    put(out, "minContains", a.min_contains.map(Value::from));
    put(out, "maxContains", a.max_contains.map(Value::from));
    put(out, "minItems", a.min_items.map(Value::from));
    put(out, "maxItems", a.max_items.map(Value::from));
    put(out, "uniqueItems", a.unique_items.map(Value::from));
}

fn object(o: &ObjectType, out: &mut Map<String, Value>) {
    put(out, "properties", o.properties.as_ref().map(map));
    put(out, "additionalProperties", o.additional_properties.as_ref().map(schema_or_bool));
    put(out, "patternProperties", o.pattern_properties.as_ref().map(map));
    put(out, "unevaluatedProperties", o.unevaluated_properties.as_ref().map(schema_or_bool));
    put(out, "required", o.required.as_ref().map(|r| r.iter().cloned().map(Value::from).collect()));
    put(out, "minProperties", o.min_properties.map(Value::from));
    put(out, "maxProperties", o.max_properties.map(Value::from));
    put(out, "allOf", o.all_of.as_deref().map(list));
    put(out, "anyOf", o.any_of.as_deref().map(list));
    put(out, "oneOf", o.one_of.as_deref().map(list));
    put(out, "not", o.not.as_deref().map(to_json));
    put(out, "if", o.if_.as_deref().map(to_json));
    put(out, "then", o.then.as_deref().map(to_json));
    put(out, "else", o.else_.as_deref().map(to_json));
    put(out, "propertyNames", o.property_names.as_deref().map(to_json));
    put(
        out,
        "dependentRequired",
        o.dependent_required.as_ref().map(|deps| {
            Value::Object(
                deps.iter()
                    .map(|(k, names)| (k.clone(), names.iter().cloned().map(Value::from).collect()))
                    .collect(),
            )
        }),
    );
    put(out, "dependentSchemas", o.dependent_schemas.as_ref().map(map));
}

// ------------------------------- Helpers ---------------------------------- //

fn put(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(v) = value {
        out.insert(key.to_string(), v);
    }
}

fn schema_or_bool(s: &SchemaOrBool) -> Value {
    match s {
        SchemaOrBool::Bool(b) => Value::Bool(*b),
        SchemaOrBool::Schema(ty) => to_json(ty),
    }
}

fn list(xs: &[JsonType]) -> Value {
    Value::Array(xs.iter().map(to_json).collect())
}

fn map(props: &Properties) -> Value {
    Value::Object(props.iter().map(|(k, v)| (k.clone(), to_json(v))).collect())
}
