use crate::formats::{self, StringFormat};
use super::Annotations;

/// The `format` keyword: a registered format, or any other string kept as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Known(StringFormat),
    Custom(String),
}

impl Format {
    /// Resolve through the registry; unknown names become `Custom`.
    pub fn from_name(name: &str) -> Self {
        match formats::resolve(name) {
            Some(known) => Format::Known(known),
            None => Format::Custom(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Known(f) => f.as_str(),
            Format::Custom(s) => s,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringType {
    pub common: Annotations,
    pub format: Option<Format>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

impl StringType {
    /// The specialized sub-variant pinned to `format`.
    pub fn specialized(format: StringFormat) -> Self {
        Self { format: Some(Format::Known(format)), ..Self::default() }
    }

    /// `Some` when this is one of the specialized sub-variants.
    pub fn specialization(&self) -> Option<StringFormat> {
        match &self.format {
            Some(Format::Known(f)) => Some(*f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_formats_are_preserved_verbatim() {
        assert_eq!(Format::from_name("uuid"), Format::Known(StringFormat::Uuid));
        let custom = Format::from_name("x-custom");
        assert_eq!(custom, Format::Custom("x-custom".into()));
        assert_eq!(custom.as_str(), "x-custom");
    }

    #[test]
    fn specialization_only_for_registered_formats() {
        assert_eq!(StringType::specialized(StringFormat::Email).specialization(), Some(StringFormat::Email));
        let custom = StringType { format: Some(Format::Custom("x".into())), ..StringType::default() };
        assert_eq!(custom.specialization(), None);
        assert_eq!(StringType::default().specialization(), None);
    }
}
