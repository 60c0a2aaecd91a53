//! Depth-bounded flattening of nested objects into compound keys.
//!
//! `{"address": {"city": string}}` becomes `{"address__city": string}`.
//! Only objects with at least one declared property are rewritten; arrays,
//! unions and property-less objects pass through untouched. The input is never
//! modified; a new tree is returned.
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::{JsonType, ObjectType, Properties};

pub const DEFAULT_MAX_DEPTH: i32 = 10;
pub const DEFAULT_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Nesting levels to collapse; `0` or less leaves the schema unchanged.
    pub max_depth: i32,
    pub separator: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

pub fn flatten_with(schema: &JsonType, options: &FlattenOptions) -> Result<JsonType> {
    flatten(schema, options.max_depth, &options.separator)
}

/// Fails with [`Error::KeyCollision`] when two property paths produce the
/// same flattened key.
pub fn flatten(schema: &JsonType, max_depth: i32, separator: &str) -> Result<JsonType> {
    match schema {
        JsonType::Object(obj) if max_depth > 0 && obj.has_properties() => {
            debug!(max_depth, separator, "flattening object schema");
            Ok(JsonType::Object(flatten_object(obj, max_depth, separator)?))
        }
        other => Ok(other.clone()),
    }
}

/// Depth is spent once per nesting level, not per property.
fn flatten_object(obj: &ObjectType, depth: i32, separator: &str) -> Result<ObjectType> {
    let Some(props) = &obj.properties else {
        return Ok(obj.clone());
    };

    let mut flat = Properties::with_capacity(props.len());
    let mut required = obj.required.clone();

    for (key, value) in props {
        let nested = match value {
            JsonType::Object(child) if depth > 0 && lifts_keys(child) => child,
            _ => {
                insert_unique(&mut flat, key.clone(), value.clone())?;
                continue;
            }
        };

        let child = flatten_object(nested, depth - 1, separator)?;
        let parent_required = obj.is_required(key);
        if let Some(req) = required.as_mut() {
            req.shift_remove(key);
        }
        trace!(key = %key, "lifting nested properties");

        let child_required = child.required.unwrap_or_default();
        for (child_key, child_value) in child.properties.unwrap_or_default() {
            let flat_key = format!("{key}{separator}{child_key}");
            if parent_required && child_required.contains(&child_key) {
                required.get_or_insert_with(IndexSet::new).insert(flat_key.clone());
            }
            insert_unique(&mut flat, flat_key, child_value)?;
        }
    }

    Ok(ObjectType {
        properties: Some(flat),
        required,
        ..obj.clone()
    })
}

/// Objects with no declared properties, or an empty `properties`, stay as
/// one key.
fn lifts_keys(obj: &ObjectType) -> bool {
    obj.properties.as_ref().is_some_and(|props| !props.is_empty())
}

fn insert_unique(props: &mut Properties, key: String, value: JsonType) -> Result<()> {
    if props.contains_key(&key) {
        return Err(Error::KeyCollision { key });
    }
    props.insert(key, value);
    Ok(())
}
