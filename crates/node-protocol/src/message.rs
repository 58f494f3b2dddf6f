use std::fmt;
use std::str::FromStr;

use br_domain::{Error, Result};
use serde::Serialize;

use crate::attribute::AttributeCode;
use crate::{FIELD_SEPARATOR, MESSAGE_PREFIX, UPDATE_VERB};

/// One attribute update, as sent to the host:
///
/// ```text
/// DOM#upd#<nodeType>#<nodeId>#<attrCode>#<encodedData>#
/// ```
///
/// The message is built once and never changed afterwards; the wire text
/// is produced by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolMessage {
    node_type: String,
    node_id: u64,
    code: AttributeCode,
    data: String,
}

impl ProtocolMessage {
    pub fn new(
        node_type: impl Into<String>,
        node_id: u64,
        code: AttributeCode,
        data: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            node_id,
            code,
            data: data.into(),
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    pub fn code(&self) -> AttributeCode {
        self.code
    }

    /// The encoded attribute payload, without framing.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for ProtocolMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = FIELD_SEPARATOR;
        write!(
            f,
            "{MESSAGE_PREFIX}{sep}{UPDATE_VERB}{sep}{}{sep}{}{sep}{}{sep}{}{sep}",
            self.node_type, self.node_id, self.code, self.data
        )
    }
}

impl FromStr for ProtocolMessage {
    type Err = Error;

    /// Parse a wire message.  Everything after the fifth separator, minus
    /// the terminating one, is data, so payloads may contain `#`.
    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_suffix(FIELD_SEPARATOR)
            .ok_or_else(|| Error::Malformed(format!("missing trailing '{FIELD_SEPARATOR}'")))?;

        let mut fields = body.splitn(6, FIELD_SEPARATOR);
        let mut next = |what: &str| {
            fields
                .next()
                .ok_or_else(|| Error::Malformed(format!("missing {what} field")))
        };

        let prefix = next("prefix")?;
        let verb = next("verb")?;
        let node_type = next("node type")?;
        let node_id = next("node id")?;
        let code = next("attribute code")?;
        let data = next("data")?;

        if prefix != MESSAGE_PREFIX {
            return Err(Error::Malformed(format!("unexpected prefix '{prefix}'")));
        }
        if verb != UPDATE_VERB {
            return Err(Error::Malformed(format!("unexpected verb '{verb}'")));
        }
        if node_type.is_empty() {
            return Err(Error::Malformed("empty node type".into()));
        }
        let node_id = node_id
            .parse::<u64>()
            .map_err(|_| Error::Malformed(format!("node id '{node_id}' is not an integer")))?;
        let code = code
            .parse::<u32>()
            .map(AttributeCode)
            .map_err(|_| Error::Malformed(format!("attribute code '{code}' is not an integer")))?;

        Ok(ProtocolMessage::new(node_type, node_id, code, data))
    }
}
