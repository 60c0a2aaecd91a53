//! Descriptive type model: the JSON Schema side of the mapping.
//!
//! A closed set of variants. Every variant embeds the shared [`Annotations`]
//! and adds only the keywords that belong to its kind. Trees own their
//! children; equality is structural.
//!
//! - `Untyped` is a schema without a `type` keyword (annotations only).
//! - String formats are not separate types: a [`StringType`] whose format
//!   resolved through [`crate::formats`] is the specialized sub-variant.
//! - A `type` array becomes one [`UnionType`] with ordered members.
pub mod string;
pub mod numeric;
pub mod array;
pub mod object;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::formats::StringFormat;

pub use array::ArrayType;
pub use numeric::NumericType;
pub use object::ObjectType;
pub use string::{Format, StringType};

// ------------------------------ Annotations ------------------------------- //

/// Keywords shared by every variant. `None` means "unspecified".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    pub id: Option<String>,      // $id
    pub schema: Option<String>,  // $schema
    pub comment: Option<String>, // $comment
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub examples: Option<Vec<Value>>,
    pub read_only: Option<bool>,
    pub write_only: Option<bool>,
    pub deprecated: Option<bool>,
    pub enum_: Option<Vec<Value>>,
    pub const_: Option<Value>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        *self == Annotations::default()
    }
}

/// Slots that accept either a boolean or a nested schema
/// (`items`, `additionalProperties`, ...).
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<JsonType>),
}

impl SchemaOrBool {
    pub fn schema(&self) -> Option<&JsonType> {
        match self {
            SchemaOrBool::Bool(_) => None,
            SchemaOrBool::Schema(s) => Some(s),
        }
    }
}

impl From<JsonType> for SchemaOrBool {
    fn from(ty: JsonType) -> Self {
        SchemaOrBool::Schema(Box::new(ty))
    }
}

// --------------------------------- Kinds ---------------------------------- //

/// The primitive and composite names accepted by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub const NAMES: &'static str = "null, boolean, integer, number, string, array, object";

    pub fn from_name(name: &str) -> Option<Kind> {
        match name {
            "null" => Some(Kind::Null),
            "boolean" => Some(Kind::Boolean),
            "integer" => Some(Kind::Integer),
            "number" => Some(Kind::Number),
            "string" => Some(Kind::String),
            "array" => Some(Kind::Array),
            "object" => Some(Kind::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

// --------------------------------- Types ---------------------------------- //

#[derive(Clone, Debug, PartialEq)]
pub enum JsonType {
    Untyped(Annotations),
    Null(Annotations),
    Boolean(Annotations),
    Integer(NumericType),
    Number(NumericType),
    String(StringType),
    Array(ArrayType),
    Object(ObjectType),
    Union(UnionType),
}

impl JsonType {
    pub fn null() -> Self { JsonType::Null(Annotations::default()) }
    pub fn boolean() -> Self { JsonType::Boolean(Annotations::default()) }
    pub fn integer() -> Self { JsonType::Integer(NumericType::default()) }
    pub fn number() -> Self { JsonType::Number(NumericType::default()) }
    pub fn string() -> Self { JsonType::String(StringType::default()) }

    /// A specialized string variant (`date-time`, `uuid`, ...).
    pub fn formatted(format: StringFormat) -> Self {
        JsonType::String(StringType::specialized(format))
    }

    pub fn array(items: JsonType) -> Self {
        JsonType::Array(ArrayType {
            items: Some(items.into()),
            ..ArrayType::default()
        })
    }

    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, JsonType)>,
    {
        JsonType::Object(ObjectType {
            properties: Some(properties.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            ..ObjectType::default()
        })
    }

    pub fn union(members: Vec<JsonType>) -> Result<Self> {
        Ok(JsonType::Union(UnionType::new(members, Annotations::default())?))
    }

    /// Name of the variant, as the `type` keyword spells it
    /// (`"untyped"` and `"union"` for the two synthetic variants).
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonType::Untyped(_) => "untyped",
            JsonType::Null(_) => "null",
            JsonType::Boolean(_) => "boolean",
            JsonType::Integer(_) => "integer",
            JsonType::Number(_) => "number",
            JsonType::String(_) => "string",
            JsonType::Array(_) => "array",
            JsonType::Object(_) => "object",
            JsonType::Union(_) => "union",
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            JsonType::Untyped(a) | JsonType::Null(a) | JsonType::Boolean(a) => a,
            JsonType::Integer(n) | JsonType::Number(n) => &n.common,
            JsonType::String(s) => &s.common,
            JsonType::Array(a) => &a.common,
            JsonType::Object(o) => &o.common,
            JsonType::Union(u) => &u.common,
        }
    }

    /// Type-level nullability: `Null` itself, or a union with a `Null` member.
    pub fn is_nullable(&self) -> bool {
        match self {
            JsonType::Null(_) => true,
            JsonType::Union(u) => u.is_nullable(),
            _ => false,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            JsonType::Object(o) => Some(o),
            _ => None,
        }
    }
}

// --------------------------------- Union ---------------------------------- //

/// A schema whose `type` keyword lists several names.
///
/// Members keep their declared order. The member list is private so a union
/// with fewer than two members cannot exist.
#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub common: Annotations,
    members: Vec<JsonType>,
}

impl UnionType {
    pub fn new(members: Vec<JsonType>, common: Annotations) -> Result<Self> {
        if members.len() < 2 {
            return Err(Error::InvalidSchema(format!(
                "a union needs at least two member types, got {}",
                members.len()
            )));
        }
        Ok(Self { common, members })
    }

    pub fn members(&self) -> &[JsonType] {
        &self.members
    }

    pub fn into_members(self) -> Vec<JsonType> {
        self.members
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.members.iter().map(JsonType::type_name).collect()
    }

    pub fn is_nullable(&self) -> bool {
        self.members.iter().any(|m| matches!(m, JsonType::Null(_)))
    }

    /// For `[X, null]` (in either order, X not null) return `X`.
    pub fn simple_nullable(&self) -> Option<&JsonType> {
        match self.members.as_slice() {
            [JsonType::Null(_), JsonType::Null(_)] => None,
            [JsonType::Null(_), other] | [other, JsonType::Null(_)] => Some(other),
            _ => None,
        }
    }
}

// ------------------------------ Convenience ------------------------------- //

/// Property map type used by objects (insertion ordered).
pub type Properties = IndexMap<String, JsonType>;
