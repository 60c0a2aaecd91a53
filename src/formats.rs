//! Registry of the string formats that select a specialized `String` variant.
//!
//! The table is built once on first use and never mutated. Formats missing
//! from it are not an error: the parser keeps them as custom format strings.
use indexmap::IndexMap;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    /// `2018-11-13T20:20:39+00:00`
    DateTime,
    /// `20:20:39+00:00`
    Time,
    /// `2018-11-13`
    Date,
    /// `P3D`
    Duration,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    /// `3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a`
    Uuid,
    Uri,
    UriReference,
    UriTemplate,
    JsonPointer,
    RelativeJsonPointer,
    Regex,
}

impl StringFormat {
    pub const ALL: [StringFormat; 15] = [
        StringFormat::DateTime,
        StringFormat::Time,
        StringFormat::Date,
        StringFormat::Duration,
        StringFormat::Email,
        StringFormat::Hostname,
        StringFormat::Ipv4,
        StringFormat::Ipv6,
        StringFormat::Uuid,
        StringFormat::Uri,
        StringFormat::UriReference,
        StringFormat::UriTemplate,
        StringFormat::JsonPointer,
        StringFormat::RelativeJsonPointer,
        StringFormat::Regex,
    ];

    /// The `format` keyword value pinned by this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Time => "time",
            StringFormat::Date => "date",
            StringFormat::Duration => "duration",
            StringFormat::Email => "email",
            StringFormat::Hostname => "hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uuid => "uuid",
            StringFormat::Uri => "uri",
            StringFormat::UriReference => "uri-reference",
            StringFormat::UriTemplate => "uri-template",
            StringFormat::JsonPointer => "json-pointer",
            StringFormat::RelativeJsonPointer => "relative-json-pointer",
            StringFormat::Regex => "regex",
        }
    }
}

impl std::fmt::Display for StringFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static REGISTRY: Lazy<IndexMap<&'static str, StringFormat>> = Lazy::new(|| {
    StringFormat::ALL.iter().map(|f| (f.as_str(), *f)).collect()
});

/// Look up the specialized variant for a `format` keyword value.
pub fn resolve(name: &str) -> Option<StringFormat> {
    REGISTRY.get(name).copied()
}

/// Registered format names, in registration order.
pub fn registered() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}
