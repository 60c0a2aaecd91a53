//! Raw JSON Schema document → [`JsonType`] tree.
//!
//! - `type` absent → `Untyped`; a name → that variant; a list → `Union`.
//! - Unknown keywords are ignored. A known keyword holding the wrong JSON
//!   kind fails the whole parse with `MalformedSchema`, naming the keyword,
//!   the expected shape and the JSON pointer of the schema node.
//! - A JSON `null` on a typed keyword reads as "unspecified". `default`,
//!   `const`, `enum` and `examples` keep `null` as a value.
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::{
    Annotations, ArrayType, Format, JsonType, Kind, NumericType, ObjectType, Properties,
    SchemaOrBool, StringType, UnionType,
};

// ------------------------------- Front API -------------------------------- //

pub fn parse(document: &Value) -> Result<JsonType> {
    let node = Node::new(document, String::new())?;
    node.parse()
}

pub fn parse_str(src: &str) -> Result<JsonType> {
    let document: Value = serde_json::from_str(src)?;
    parse(&document)
}

// --------------------------------- Node ----------------------------------- //

/// One schema object and its JSON pointer inside the source document.
struct Node<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

const TYPE_SHAPE: &str = "a type name or an array of type names";

impl<'a> Node<'a> {
    fn new(value: &'a Value, path: String) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(Error::malformed(&path, "(schema)", "a JSON object")),
        }
    }

    fn parse(&self) -> Result<JsonType> {
        let common = self.annotations()?;
        match self.map.get("type") {
            None | Some(Value::Null) => Ok(JsonType::Untyped(common)),
            Some(Value::String(name)) => {
                let kind = self.kind(name)?;
                self.build(kind, common)
            }
            Some(Value::Array(names)) => {
                let mut kinds: Vec<Kind> = Vec::with_capacity(names.len());
                for name in names {
                    let Value::String(name) = name else {
                        return Err(self.malformed("type", TYPE_SHAPE));
                    };
                    let kind = self.kind(name)?;
                    if kinds.contains(&kind) {
                        return Err(self.malformed("type", "an array of unique type names"));
                    }
                    kinds.push(kind);
                }
                trace!(path = %self.path, ?kinds, "union schema");
                let members = kinds
                    .into_iter()
                    .map(|kind| self.build(kind, Annotations::default()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(JsonType::Union(UnionType::new(members, common)?))
            }
            Some(_) => Err(self.malformed("type", TYPE_SHAPE)),
        }
    }

    fn kind(&self, name: &str) -> Result<Kind> {
        Kind::from_name(name).ok_or_else(|| {
            self.malformed("type", &format!("one of: {}", Kind::NAMES))
        })
    }

    /// Variant constructor for one kind; reads only that kind's keywords.
    fn build(&self, kind: Kind, common: Annotations) -> Result<JsonType> {
        Ok(match kind {
            Kind::Null => JsonType::Null(common),
            Kind::Boolean => JsonType::Boolean(common),
            Kind::Integer => JsonType::Integer(self.numeric(common)?),
            Kind::Number => JsonType::Number(self.numeric(common)?),
            Kind::String => JsonType::String(self.string_type(common)?),
            Kind::Array => JsonType::Array(self.array_type(common)?),
            Kind::Object => JsonType::Object(self.object_type(common)?),
        })
    }

    // ------------------------------ Variants ------------------------------ //

    fn annotations(&self) -> Result<Annotations> {
        Ok(Annotations {
            id: self.string("$id")?,
            schema: self.string("$schema")?,
            comment: self.string("$comment")?,
            title: self.string("title")?,
            description: self.string("description")?,
            default: self.value("default"),
            examples: self.values("examples")?,
            read_only: self.boolean("readOnly")?,
            write_only: self.boolean("writeOnly")?,
            deprecated: self.boolean("deprecated")?,
            enum_: self.values("enum")?,
            const_: self.value("const"),
        })
    }

    fn numeric(&self, common: Annotations) -> Result<NumericType> {
        Ok(NumericType {
            common,
            minimum: self.number("minimum")?,
            maximum: self.number("maximum")?,
            exclusive_minimum: self.boolean("exclusiveMinimum")?,
            exclusive_maximum: self.boolean("exclusiveMaximum")?,
            multiple_of: self.number("multipleOf")?,
        })
    }

    fn string_type(&self, common: Annotations) -> Result<StringType> {
        let format = self.string("format")?.map(|name| Format::from_name(&name));
        if let Some(Format::Custom(name)) = &format {
            debug!(path = %self.path, format = %name, "unregistered string format, keeping generic string");
        }
        Ok(StringType {
            common,
            format,
            min_length: self.count("minLength")?,
            max_length: self.count("maxLength")?,
            pattern: self.string("pattern")?,
        })
    }

    fn array_type(&self, common: Annotations) -> Result<ArrayType> {
        Ok(ArrayType {
            common,
            items: self.schema_or_bool("items")?,
            prefix_items: self.schemas("prefixItems")?,
            additional_items: self.schema_or_bool("additionalItems")?,
            unevaluated_items: self.schema_or_bool("unevaluatedItems")?,
            contains: self.schema("contains")?,
            min_contains: self.count("minContains")?,
            max_contains: self.count("maxContains")?,
            min_items: self.count("minItems")?,
            max_items: self.count("maxItems")?,
            unique_items: self.boolean("uniqueItems")?,
        })
    }

    fn object_type(&self, common: Annotations) -> Result<ObjectType> {
        let required = self
            .strings("required")?
            .map(|names| names.into_iter().collect::<IndexSet<_>>());
        Ok(ObjectType {
            common,
            properties: self.schema_map("properties")?,
            additional_properties: self.schema_or_bool("additionalProperties")?,
            pattern_properties: self.schema_map("patternProperties")?,
            unevaluated_properties: self.schema_or_bool("unevaluatedProperties")?,
            required,
            min_properties: self.count("minProperties")?,
            max_properties: self.count("maxProperties")?,
            all_of: self.schemas("allOf")?,
            any_of: self.schemas("anyOf")?,
            one_of: self.schemas("oneOf")?,
            not: self.schema("not")?,
            if_: self.schema("if")?,
            then: self.schema("then")?,
            else_: self.schema("else")?,
            property_names: self.schema("propertyNames")?,
            dependent_required: self.string_lists("dependentRequired")?,
            dependent_schemas: self.schema_map("dependentSchemas")?,
        })
    }

    // ------------------------------ Keywords ------------------------------ //

    fn malformed(&self, keyword: &str, expected: &str) -> Error {
        Error::malformed(&self.path, keyword, expected)
    }

    fn child_path(&self, segments: &[&str]) -> String {
        let mut path = self.path.clone();
        for seg in segments {
            path.push('/');
            path.push_str(&seg.replace('~', "~0").replace('/', "~1"));
        }
        path
    }

    /// Present and not `null`.
    fn get(&self, keyword: &str) -> Option<&'a Value> {
        self.map.get(keyword).filter(|v| !v.is_null())
    }

    fn value(&self, keyword: &str) -> Option<Value> {
        self.map.get(keyword).cloned()
    }

    fn values(&self, keyword: &str) -> Result<Option<Vec<Value>>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Array(xs)) => Ok(Some(xs.clone())),
            Some(_) => Err(self.malformed(keyword, "an array")),
        }
    }

    fn string(&self, keyword: &str) -> Result<Option<String>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.malformed(keyword, "a string")),
        }
    }

    fn boolean(&self, keyword: &str) -> Result<Option<bool>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.malformed(keyword, "a boolean")),
        }
    }

    fn number(&self, keyword: &str) -> Result<Option<Number>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(_) => Err(self.malformed(keyword, "a number")),
        }
    }

    fn count(&self, keyword: &str) -> Result<Option<u64>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.malformed(keyword, "a non-negative integer")),
        }
    }

    fn strings(&self, keyword: &str) -> Result<Option<Vec<String>>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Array(xs)) => xs
                .iter()
                .map(|x| match x {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(self.malformed(keyword, "an array of strings")),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(self.malformed(keyword, "an array of strings")),
        }
    }

    fn schema(&self, keyword: &str) -> Result<Option<Box<JsonType>>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(v) if v.is_object() => {
                let node = Node::new(v, self.child_path(&[keyword]))?;
                Ok(Some(Box::new(node.parse()?)))
            }
            Some(_) => Err(self.malformed(keyword, "a schema object")),
        }
    }

    fn schema_or_bool(&self, keyword: &str) -> Result<Option<SchemaOrBool>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(SchemaOrBool::Bool(*b))),
            Some(v) if v.is_object() => {
                let node = Node::new(v, self.child_path(&[keyword]))?;
                Ok(Some(SchemaOrBool::Schema(Box::new(node.parse()?))))
            }
            Some(_) => Err(self.malformed(keyword, "a boolean or a schema object")),
        }
    }

    fn schemas(&self, keyword: &str) -> Result<Option<Vec<JsonType>>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Array(xs)) => xs
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    if !x.is_object() {
                        return Err(self.malformed(keyword, "an array of schema objects"));
                    }
                    let index = i.to_string();
                    Node::new(x, self.child_path(&[keyword, index.as_str()]))?.parse()
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(self.malformed(keyword, "an array of schema objects")),
        }
    }

    fn schema_map(&self, keyword: &str) -> Result<Option<Properties>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Object(entries)) => {
                let mut out = Properties::with_capacity(entries.len());
                for (name, x) in entries {
                    if !x.is_object() {
                        return Err(self.malformed(keyword, "a mapping of names to schema objects"));
                    }
                    let node = Node::new(x, self.child_path(&[keyword, name.as_str()]))?;
                    out.insert(name.clone(), node.parse()?);
                }
                Ok(Some(out))
            }
            Some(_) => Err(self.malformed(keyword, "a mapping of names to schema objects")),
        }
    }

    fn string_lists(&self, keyword: &str) -> Result<Option<IndexMap<String, Vec<String>>>> {
        const SHAPE: &str = "a mapping of names to arrays of strings";
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Object(entries)) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (name, x) in entries {
                    let Value::Array(xs) = x else {
                        return Err(self.malformed(keyword, SHAPE));
                    };
                    let list = xs
                        .iter()
                        .map(|s| s.as_str().map(str::to_string).ok_or_else(|| self.malformed(keyword, SHAPE)))
                        .collect::<Result<Vec<_>>>()?;
                    out.insert(name.clone(), list);
                }
                Ok(Some(out))
            }
            Some(_) => Err(self.malformed(keyword, SHAPE)),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
