use std::fmt;
use std::str::FromStr;

use br_domain::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeName;
use crate::value::{format_number, AttributeValue, Rect};
use crate::{RECT_ARITY, VALUE_DELIMITER};

/// Canonical text encoding of one attribute shape.
///
/// Encodings are chosen for readability in logs, not compactness.  Empty
/// lists encode to the empty string and decode back to an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Scalars in their natural text form.
    PassThrough,
    /// `true` → `1`, `false` → `0`.
    BoolAsNumber,
    /// Elements joined with `;`.
    ListJoin,
    /// Each rectangle's four coordinates joined with `;`, then the
    /// rectangles joined with `;`.  No marker separates rectangles.
    NestedListJoin,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::PassThrough,
        Encoding::BoolAsNumber,
        Encoding::ListJoin,
        Encoding::NestedListJoin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::PassThrough => "pass_through",
            Encoding::BoolAsNumber => "bool_as_number",
            Encoding::ListJoin => "list_join",
            Encoding::NestedListJoin => "nested_list_join",
        }
    }

    /// Encode `value` as the data of `attribute`.
    ///
    /// Fails with [`Error::EncodingFailed`] when the value's shape does not
    /// fit this encoding.
    pub fn encode(&self, attribute: &AttributeName, value: &AttributeValue) -> Result<String> {
        match (self, value) {
            (Encoding::PassThrough, AttributeValue::Text(s)) => Ok(s.clone()),
            (Encoding::PassThrough, AttributeValue::Integer(v)) => Ok(v.to_string()),
            (Encoding::PassThrough, AttributeValue::Number(v)) => Ok(format_number(*v)),
            (Encoding::PassThrough, AttributeValue::Bool(b)) => Ok(b.to_string()),

            (Encoding::BoolAsNumber, AttributeValue::Bool(b)) => Ok(u8::from(*b).to_string()),
            (Encoding::BoolAsNumber, AttributeValue::Integer(v)) => Ok(v.to_string()),
            (Encoding::BoolAsNumber, AttributeValue::Number(v)) => Ok(format_number(*v)),

            (Encoding::ListJoin, AttributeValue::List(items)) => {
                Ok(items.join(VALUE_DELIMITER.to_string().as_str()))
            }

            (Encoding::NestedListJoin, AttributeValue::Rects(rects)) => Ok(rects
                .iter()
                .flat_map(|r| r.coordinates())
                .map(format_number)
                .collect::<Vec<_>>()
                .join(VALUE_DELIMITER.to_string().as_str())),

            (encoding, value) => Err(Error::EncodingFailed {
                attribute: attribute.to_string(),
                reason: format!("{} cannot encode a {} value", encoding.as_str(), value.kind()),
            }),
        }
    }

    /// Inverse of [`encode`](Self::encode), for the host side.
    ///
    /// Pass-through data always decodes to text: the wire does not say
    /// whether `42` was a number or a string.
    pub fn decode(&self, data: &str) -> Result<AttributeValue> {
        match self {
            Encoding::PassThrough => Ok(AttributeValue::Text(data.to_string())),
            Encoding::BoolAsNumber => match data {
                "1" => Ok(AttributeValue::Bool(true)),
                "0" => Ok(AttributeValue::Bool(false)),
                other => Err(Error::Malformed(format!(
                    "expected 0 or 1 for a boolean, got '{other}'"
                ))),
            },
            Encoding::ListJoin => Ok(AttributeValue::List(split_list(data))),
            Encoding::NestedListJoin => {
                let numbers = split_list(data)
                    .iter()
                    .map(|token| {
                        token.parse::<f64>().map_err(|_| {
                            Error::Malformed(format!("'{token}' is not a coordinate"))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()?;
                if numbers.len() % RECT_ARITY != 0 {
                    return Err(Error::Malformed(format!(
                        "{} coordinates do not form whole rectangles",
                        numbers.len()
                    )));
                }
                Ok(AttributeValue::Rects(
                    numbers
                        .chunks_exact(RECT_ARITY)
                        .map(|c| Rect::new(c[0], c[1], c[2], c[3]))
                        .collect(),
                ))
            }
        }
    }
}

fn split_list(data: &str) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }
    data.split(VALUE_DELIMITER).map(str::to_string).collect()
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown encoding '{s}'")))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
