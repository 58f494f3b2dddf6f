use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Attribute codes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Code table used when the config file has no `[attributes]` section.
///
/// The host process must agree on these numbers; change them together.
pub const DEFAULT_ATTRIBUTE_CODES: [(&str, i64); 9] = [
    ("Rects", 0),
    ("FixedId", 1),
    ("OverflowId", 2),
    ("Text", 3),
    ("IsPassword", 4),
    ("Url", 5),
    ("Options", 6),
    ("MaxScrolling", 7),
    ("CurrentScrolling", 8),
];

/// Name → code table, kept as raw integers so that out-of-range values
/// surface as validation issues instead of opaque parse errors.
pub type AttributeCodes = BTreeMap<String, i64>;

pub(crate) fn d_attribute_codes() -> AttributeCodes {
    DEFAULT_ATTRIBUTE_CODES
        .iter()
        .map(|(name, code)| ((*name).to_string(), *code))
        .collect()
}

/// An attribute outside the built-in set, registered at start-up.
///
/// ```toml
/// [[custom_attributes]]
/// name = "Title"
/// code = 20
/// encoding = "pass_through"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomAttributeConfig {
    pub name: String,
    pub code: i64,
    /// One of `pass_through`, `bool_as_number`, `list_join`, `nested_list_join`.
    #[serde(default = "d_encoding")]
    pub encoding: String,
}

fn d_encoding() -> String {
    "pass_through".into()
}

/// True when `name` is one of the built-in attributes.
pub fn is_builtin_attribute(name: &str) -> bool {
    DEFAULT_ATTRIBUTE_CODES.iter().any(|(n, _)| *n == name)
}
