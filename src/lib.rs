//! Map JSON Schema type descriptions to Arrow schemas and back.
//!
//! ```text
//! raw document ─ parse ─▶ JsonType ─┬─ flatten ─▶ JsonType
//!                                   ├─ columnar::to_columnar ─▶ arrow Schema
//!                                   └─ emit::to_json ─▶ raw document
//! arrow Schema ─ columnar::to_descriptive ─▶ JsonType
//! ```
pub mod error;
pub mod formats;
pub mod model;
pub mod parse;
pub mod emit;
pub mod columnar;
pub mod flatten;
pub mod path_de;

pub use arrow_schema;
pub use columnar::{to_columnar, to_descriptive};
pub use error::{Error, Result};
pub use flatten::{flatten, FlattenOptions};
pub use model::JsonType;
pub use parse::parse;
