//! Host protocol: attribute names and codes, value shapes, their canonical
//! text encodings, and the `DOM#upd#...#` update message.
//!
//! Messages flow one way, from the page to the host process.  The host
//! never sees attribute names, only codes, and must know an attribute's
//! encoding to decode its data (a `Rects` payload is a flat run of numbers
//! taken four at a time).

mod attribute;
mod encoding;
mod message;
mod value;

pub use attribute::{AttributeCode, AttributeName};
pub use encoding::Encoding;
pub use message::ProtocolMessage;
pub use value::{AttributeValue, ClientRect, Rect};

/// First field of every message.
pub const MESSAGE_PREFIX: &str = "DOM";

/// Second field: the only verb the bridge emits.
pub const UPDATE_VERB: &str = "upd";

/// Separates message fields; also terminates the message.
pub const FIELD_SEPARATOR: char = '#';

/// Separates elements inside list-shaped attribute data.
pub const VALUE_DELIMITER: char = ';';

/// Coordinates per rectangle in a `Rects` payload.
pub const RECT_ARITY: usize = 4;

/// `fixed_id` value of an element that is not fixed-position.
pub const NOT_FIXED: i64 = -1;
