use super::{Annotations, JsonType, SchemaOrBool};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayType {
    pub common: Annotations,
    /// `true` = any item, `false` = no items, absent = unconstrained.
    pub items: Option<SchemaOrBool>,
    pub prefix_items: Option<Vec<JsonType>>,
    pub additional_items: Option<SchemaOrBool>,
    pub unevaluated_items: Option<SchemaOrBool>,
    pub contains: Option<Box<JsonType>>,
    pub min_contains: Option<u64>,
    pub max_contains: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
}

impl ArrayType {
    /// The single item schema, when `items` is a schema rather than a boolean.
    pub fn item_schema(&self) -> Option<&JsonType> {
        self.items.as_ref().and_then(SchemaOrBool::schema)
    }
}
