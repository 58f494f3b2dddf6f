use std::fmt;

use br_domain::Error;
use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;

/// Name of an observable node attribute.
///
/// The built-in variants are the attributes the host protocol defines;
/// `Custom` covers names registered at start-up.  Parsing a built-in name
/// always yields its variant, never `Custom`, so the two cannot alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeName {
    Rects,
    FixedId,
    OverflowId,
    Text,
    IsPassword,
    Url,
    Options,
    MaxScrolling,
    CurrentScrolling,
    Custom(String),
}

impl AttributeName {
    pub const BUILTIN: [AttributeName; 9] = [
        AttributeName::Rects,
        AttributeName::FixedId,
        AttributeName::OverflowId,
        AttributeName::Text,
        AttributeName::IsPassword,
        AttributeName::Url,
        AttributeName::Options,
        AttributeName::MaxScrolling,
        AttributeName::CurrentScrolling,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AttributeName::Rects => "Rects",
            AttributeName::FixedId => "FixedId",
            AttributeName::OverflowId => "OverflowId",
            AttributeName::Text => "Text",
            AttributeName::IsPassword => "IsPassword",
            AttributeName::Url => "Url",
            AttributeName::Options => "Options",
            AttributeName::MaxScrolling => "MaxScrolling",
            AttributeName::CurrentScrolling => "CurrentScrolling",
            AttributeName::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, AttributeName::Custom(_))
    }

    /// The canonical encoding of a built-in attribute.
    pub fn default_encoding(&self) -> Option<Encoding> {
        let encoding = match self {
            AttributeName::FixedId
            | AttributeName::OverflowId
            | AttributeName::Text
            | AttributeName::Url => Encoding::PassThrough,
            AttributeName::IsPassword => Encoding::BoolAsNumber,
            AttributeName::Options
            | AttributeName::MaxScrolling
            | AttributeName::CurrentScrolling => Encoding::ListJoin,
            AttributeName::Rects => Encoding::NestedListJoin,
            AttributeName::Custom(_) => return None,
        };
        Some(encoding)
    }
}

impl From<&str> for AttributeName {
    fn from(s: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|b| b.as_str() == s)
            .cloned()
            .unwrap_or_else(|| AttributeName::Custom(s.to_string()))
    }
}

impl From<String> for AttributeName {
    fn from(s: String) -> Self {
        match AttributeName::from(s.as_str()) {
            AttributeName::Custom(_) => AttributeName::Custom(s),
            builtin => builtin,
        }
    }
}

impl From<AttributeName> for String {
    fn from(name: AttributeName) -> Self {
        match name {
            AttributeName::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire identifier of an attribute.  Assigned by whoever registers the
/// attribute; the bridge only stores the association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeCode(pub u32);

impl AttributeCode {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for AttributeCode {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u32::try_from(raw)
            .map(AttributeCode)
            .map_err(|_| Error::InvalidArgument(format!("attribute code {raw} is not a valid u32")))
    }
}

impl fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_parse_to_variants() {
        for name in AttributeName::BUILTIN {
            assert_eq!(AttributeName::from(name.as_str()), name);
        }
    }

    #[test]
    fn unknown_name_is_custom() {
        assert_eq!(
            AttributeName::from("Title"),
            AttributeName::Custom("Title".into())
        );
        assert!(!AttributeName::from("Title").is_builtin());
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(
            AttributeName::from("text"),
            AttributeName::Custom("text".into())
        );
    }

    #[test]
    fn builtins_have_encodings() {
        for name in AttributeName::BUILTIN {
            assert!(name.default_encoding().is_some(), "{name}");
        }
        assert_eq!(AttributeName::Custom("X".into()).default_encoding(), None);
    }

    #[test]
    fn serde_uses_plain_strings() {
        let json = serde_json::to_string(&AttributeName::IsPassword).unwrap();
        assert_eq!(json, "\"IsPassword\"");
        let back: AttributeName = serde_json::from_str("\"Options\"").unwrap();
        assert_eq!(back, AttributeName::Options);
    }

    #[test]
    fn code_rejects_negative() {
        assert_eq!(AttributeCode::try_from(7).unwrap(), AttributeCode(7));
        assert!(matches!(
            AttributeCode::try_from(-1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(AttributeCode::try_from(i64::from(u32::MAX) + 1).is_err());
    }
}
