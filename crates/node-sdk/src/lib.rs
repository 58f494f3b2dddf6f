//! `br-node-sdk`: page-side half of the DomBridge protocol.
//!
//! A node proxy implements [`DomNode`].  At start-up the host application
//! builds one [`AttributeCatalog`] (codes, encoders and getters) and shares
//! it by reference.  Attribute changes then flow through a
//! [`ChangeNotifier`] into a [`MessageSink`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  let catalog = AttributeCatalog::from_config(&config)?;      │
//! │  let sink = StdoutSink;                                      │
//! │  let notifier = ChangeNotifier::new(&catalog, &sink);        │
//! │                                                              │
//! │  notifier.notify(&AttributeName::Text, &node)?;              │
//! │      // DOM#upd#input#42#3#hello#                            │
//! │                                                              │
//! │  let geometry = GeometryDetector::new(&notifier, &viewport); │
//! │  geometry.update_rects(&mut node, None);                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs synchronously on the calling thread.  The catalog is
//! immutable once built; geometry state lives inside each node and is only
//! changed through `&mut` access by the [`GeometryDetector`].

pub mod catalog;
pub mod geometry;
pub mod node;
pub mod notifier;
pub mod transport;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use catalog::{Accessor, AttributeCatalog, AttributeCatalogBuilder, CatalogEntry};
pub use geometry::{GeometryDetector, GeometryState, NodeGeometry, ViewportTransform, WindowAdjuster};
pub use node::{DomNode, RectSource};
pub use notifier::ChangeNotifier;
pub use transport::{sink_for, LogSink, MemorySink, MessageSink, StdoutSink};

// Re-export protocol types so node authors never need to import br-protocol directly.
pub use br_protocol::{
    AttributeCode, AttributeName, AttributeValue, ClientRect, Encoding, ProtocolMessage, Rect,
    NOT_FIXED,
};
