//! The capability contract every node proxy satisfies.

use br_protocol::{AttributeValue, ClientRect, Rect, NOT_FIXED};

use crate::geometry::NodeGeometry;

/// Anything that can report client rectangles: the node itself, or an
/// alternate representation of it (e.g. a wrapping element) used when
/// measuring geometry.
pub trait RectSource {
    /// Raw client rectangles, or `None` when the underlying source cannot
    /// enumerate them.
    fn client_rects(&self) -> Option<Vec<ClientRect>>;
}

/// A proxy for one in-page element.
///
/// The identity methods are required.  Attribute getters default to
/// `None`, meaning "this node kind does not have that attribute"; the
/// notifier reports that as a missing getter instead of sending anything.
///
/// # Example
///
/// ```rust,no_run
/// use br_node_sdk::{ClientRect, DomNode, NodeGeometry, RectSource};
///
/// struct TextInput {
///     id: u64,
///     value: String,
///     geometry: NodeGeometry,
/// }
///
/// impl RectSource for TextInput {
///     fn client_rects(&self) -> Option<Vec<ClientRect>> {
///         Some(vec![ClientRect::new(0.0, 0.0, 20.0, 200.0)])
///     }
/// }
///
/// impl DomNode for TextInput {
///     fn node_type(&self) -> &str { "input" }
///     fn id(&self) -> u64 { self.id }
///     fn fixed_id(&self) -> i64 { -1 }
///     fn geometry(&self) -> &NodeGeometry { &self.geometry }
///     fn geometry_mut(&mut self) -> &mut NodeGeometry { &mut self.geometry }
///     fn text(&self) -> Option<String> { Some(self.value.clone()) }
/// }
/// ```
pub trait DomNode: RectSource {
    /// Node kind tag sent on the wire (`"input"`, `"a"`, ...).
    fn node_type(&self) -> &str;

    /// Stable identifier, unique among nodes of the same kind.
    fn id(&self) -> u64;

    /// Index of the fixed-position ancestor, or [`NOT_FIXED`].
    fn fixed_id(&self) -> i64;

    fn geometry(&self) -> &NodeGeometry;

    fn geometry_mut(&mut self) -> &mut NodeGeometry;

    fn is_fixed(&self) -> bool {
        self.fixed_id() != NOT_FIXED
    }

    // ── Attribute getters ────────────────────────────────────────────

    /// Last recorded rectangles.
    fn rects(&self) -> Option<Vec<Rect>> {
        Some(self.geometry().rects().to_vec())
    }

    fn overflow_id(&self) -> Option<i64> {
        None
    }

    fn text(&self) -> Option<String> {
        None
    }

    fn is_password(&self) -> Option<bool> {
        None
    }

    fn url(&self) -> Option<String> {
        None
    }

    fn options(&self) -> Option<Vec<String>> {
        None
    }

    /// Maximum scroll offsets, `[x, y]`.
    fn max_scrolling(&self) -> Option<Vec<f64>> {
        None
    }

    /// Current scroll offsets, `[x, y]`.
    fn current_scrolling(&self) -> Option<Vec<f64>> {
        None
    }

    /// Getter for attributes outside the built-in set.
    fn custom_attribute(&self, _name: &str) -> Option<AttributeValue> {
        None
    }
}
