/// Shared error type used across all DomBridge crates.
///
/// Each notification failure maps to exactly one variant, so callers can
/// tell "no message was produced" apart from protocol data by type alone.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Registration input of the wrong shape (empty name, negative code, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No encoder is registered for the attribute.
    #[error("unknown attribute '{0}': no encoder registered")]
    UnknownAttribute(String),

    /// No code is registered for the attribute.
    #[error("unknown attribute code for '{0}'")]
    UnknownAttributeCode(String),

    /// The node cannot take part in the protocol at all.
    #[error("node is missing capability: {0}")]
    MissingCapability(String),

    /// The node does not provide a getter for the attribute.
    #[error("node {node_id} has no getter for attribute '{attribute}'")]
    MissingGetter { attribute: String, node_id: u64 },

    /// The encoder rejected the value.
    #[error("failed to encode attribute '{attribute}': {reason}")]
    EncodingFailed { attribute: String, reason: String },

    /// A wire message or encoded payload could not be parsed.
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("config: {0}")]
    Config(String),

    #[error("IO: {0}")]
    Io(String),

    #[error("TOML: {0}")]
    Toml(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Toml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
