//! Change notifier: turns "attribute X of node N changed" into one
//! protocol message.

use br_domain::trace::TraceEvent;
use br_domain::{Error, Result};
use br_protocol::{AttributeName, ProtocolMessage, FIELD_SEPARATOR};

use crate::catalog::AttributeCatalog;
use crate::node::DomNode;
use crate::transport::MessageSink;

/// Builds update messages from the catalog and hands them to a sink.
///
/// A message is delivered only when every step succeeds; on failure the
/// error is logged and returned and the sink sees nothing.
pub struct ChangeNotifier<'a> {
    catalog: &'a AttributeCatalog,
    sink: &'a dyn MessageSink,
}

impl<'a> ChangeNotifier<'a> {
    pub fn new(catalog: &'a AttributeCatalog, sink: &'a dyn MessageSink) -> Self {
        Self { catalog, sink }
    }

    pub fn catalog(&self) -> &AttributeCatalog {
        self.catalog
    }

    /// Send the current value of `name` on `node` to the host.
    pub fn notify(&self, name: &AttributeName, node: &dyn DomNode) -> Result<ProtocolMessage> {
        match self.build(name, node) {
            Ok(message) => {
                self.sink.deliver(&message);
                TraceEvent::NotificationSent {
                    node_type: message.node_type().to_string(),
                    node_id: message.node_id(),
                    attribute: name.to_string(),
                    code: message.code().get(),
                    data_chars: message.data().len(),
                }
                .emit();
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(
                    attribute = %name,
                    node_id = node.id(),
                    error = %e,
                    "attribute change not sent"
                );
                TraceEvent::NotificationFailed {
                    node_id: node.id(),
                    attribute: name.to_string(),
                    reason: e.to_string(),
                }
                .emit();
                Err(e)
            }
        }
    }

    fn build(&self, name: &AttributeName, node: &dyn DomNode) -> Result<ProtocolMessage> {
        let node_type = node.node_type();
        if node_type.is_empty() {
            return Err(Error::MissingCapability(format!(
                "node {} has no type tag",
                node.id()
            )));
        }
        if node_type.contains(FIELD_SEPARATOR) {
            return Err(Error::MissingCapability(format!(
                "node type '{node_type}' contains '{FIELD_SEPARATOR}'"
            )));
        }

        let code = self.catalog.code(name)?;

        // Check the encoder before touching the node, so a missing encoder
        // never costs a getter call.
        let encoding = self
            .catalog
            .encoding(name)
            .ok_or_else(|| Error::EncodingFailed {
                attribute: name.to_string(),
                reason: "no encoder registered".into(),
            })?;

        let value = self.catalog.fetch(name, node)?;
        let data = encoding.encode(name, &value)?;

        Ok(ProtocolMessage::new(node_type, node.id(), code, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NodeGeometry;
    use crate::node::RectSource;
    use crate::transport::MemorySink;
    use br_protocol::{AttributeCode, AttributeValue, ClientRect, Encoding, Rect};
    use std::cell::Cell;

    struct Paragraph {
        node_type: &'static str,
        text: Option<String>,
        text_calls: Cell<usize>,
        geometry: NodeGeometry,
    }

    impl Paragraph {
        fn new(text: &str) -> Self {
            Self {
                node_type: "p",
                text: Some(text.into()),
                text_calls: Cell::new(0),
                geometry: NodeGeometry::new(),
            }
        }
    }

    impl RectSource for Paragraph {
        fn client_rects(&self) -> Option<Vec<ClientRect>> {
            None
        }
    }

    impl DomNode for Paragraph {
        fn node_type(&self) -> &str {
            self.node_type
        }
        fn id(&self) -> u64 {
            3
        }
        fn fixed_id(&self) -> i64 {
            -1
        }
        fn geometry(&self) -> &NodeGeometry {
            &self.geometry
        }
        fn geometry_mut(&mut self) -> &mut NodeGeometry {
            &mut self.geometry
        }
        fn text(&self) -> Option<String> {
            self.text_calls.set(self.text_calls.get() + 1);
            self.text.clone()
        }
        fn custom_attribute(&self, name: &str) -> Option<AttributeValue> {
            (name == "Broken").then_some(AttributeValue::Bool(true))
        }
    }

    fn catalog() -> AttributeCatalog {
        let mut builder = AttributeCatalog::builder();
        builder
            .add_attribute(AttributeName::Text, AttributeCode(9))
            .add_attribute(AttributeName::Rects, AttributeCode(1))
            .add_attribute(AttributeName::Url, AttributeCode(5))
            .add_custom("Broken", AttributeCode(40), Encoding::ListJoin)
            .add_attribute("NoEncoder", AttributeCode(41))
            .with_accessor("NoEncoder", |n| n.text().map(AttributeValue::Text));
        builder.build()
    }

    #[test]
    fn notify_formats_and_delivers() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let msg = notifier
            .notify(&AttributeName::Text, &Paragraph::new("hi"))
            .unwrap();
        assert_eq!(msg.to_string(), "DOM#upd#p#3#9#hi#");
        assert_eq!(sink.messages(), vec![msg]);
    }

    #[test]
    fn notify_rects_uses_recorded_geometry() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let mut node = Paragraph::new("hi");
        node.geometry_mut().record(vec![
            Rect::new(10.0, 20.0, 30.0, 40.0),
            Rect::new(1.0, 2.0, 3.0, 4.0),
        ]);
        let msg = notifier.notify(&AttributeName::Rects, &node).unwrap();
        assert_eq!(msg.to_string(), "DOM#upd#p#3#1#10;20;30;40;1;2;3;4#");
    }

    #[test]
    fn missing_type_tag_sends_nothing() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let mut node = Paragraph::new("hi");
        node.node_type = "";
        let err = notifier.notify(&AttributeName::Text, &node).unwrap_err();
        assert!(matches!(err, Error::MissingCapability(_)));
        assert!(sink.is_empty());
        assert_eq!(node.text_calls.get(), 0);
    }

    #[test]
    fn separator_in_type_tag_is_rejected() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let mut node = Paragraph::new("hi");
        node.node_type = "p#1";
        assert!(matches!(
            notifier.notify(&AttributeName::Text, &node),
            Err(Error::MissingCapability(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn unknown_code_sends_nothing() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let err = notifier
            .notify(&AttributeName::Options, &Paragraph::new("hi"))
            .unwrap_err();
        assert_eq!(err, Error::UnknownAttributeCode("Options".into()));
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_getter_sends_nothing() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let err = notifier
            .notify(&AttributeName::Url, &Paragraph::new("hi"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingGetter { node_id: 3, .. }));

        let mut silent = Paragraph::new("hi");
        silent.text = None;
        assert!(matches!(
            notifier.notify(&AttributeName::Text, &silent),
            Err(Error::MissingGetter { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn encoder_mismatch_sends_nothing() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let err = notifier
            .notify(&AttributeName::from("Broken"), &Paragraph::new("hi"))
            .unwrap_err();
        match err {
            Error::EncodingFailed { attribute, reason } => {
                assert_eq!(attribute, "Broken");
                assert!(reason.contains("cannot encode a bool"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_encoder_skips_getter() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);

        let node = Paragraph::new("hi");
        let err = notifier
            .notify(&AttributeName::from("NoEncoder"), &node)
            .unwrap_err();
        assert!(matches!(err, Error::EncodingFailed { .. }));
        assert_eq!(node.text_calls.get(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn repeated_notify_is_identical() {
        let catalog = catalog();
        let sink = MemorySink::new();
        let notifier = ChangeNotifier::new(&catalog, &sink);
        let node = Paragraph::new("same");

        let a = notifier.notify(&AttributeName::Text, &node).unwrap();
        let b = notifier.notify(&AttributeName::Text, &node).unwrap();
        assert_eq!(a, b);
        assert_eq!(sink.len(), 2);
    }
}
