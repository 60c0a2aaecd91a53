use indexmap::{IndexMap, IndexSet};
use super::{Annotations, JsonType, Properties, SchemaOrBool};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectType {
    pub common: Annotations,
    /// `None` = no properties declared; `Some({})` = declared empty.
    pub properties: Option<Properties>,
    pub additional_properties: Option<SchemaOrBool>,
    pub pattern_properties: Option<Properties>,
    pub unevaluated_properties: Option<SchemaOrBool>,
    pub required: Option<IndexSet<String>>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub all_of: Option<Vec<JsonType>>,
    pub any_of: Option<Vec<JsonType>>,
    pub one_of: Option<Vec<JsonType>>,
    pub not: Option<Box<JsonType>>,
    pub if_: Option<Box<JsonType>>,
    pub then: Option<Box<JsonType>>,
    pub else_: Option<Box<JsonType>>,
    pub property_names: Option<Box<JsonType>>,
    pub dependent_required: Option<IndexMap<String, Vec<String>>>,
    pub dependent_schemas: Option<Properties>,
}

impl ObjectType {
    pub fn has_properties(&self) -> bool {
        self.properties.is_some()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.as_ref().is_some_and(|r| r.contains(name))
    }
}
