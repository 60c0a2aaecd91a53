use serde_json::Number;
use super::Annotations;

/// Shared by `integer` and `number`. Bounds keep the document's JSON number.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumericType {
    pub common: Annotations,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    pub multiple_of: Option<Number>,
}
