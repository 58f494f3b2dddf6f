//! Geometry change detection.
//!
//! Each node carries a [`NodeGeometry`]: the rectangles last reported to
//! the host.  The [`GeometryDetector`] recomputes them from the live
//! client rects and notifies `Rects` only when the sequence actually
//! changed, comparing every coordinate of every rectangle.

use br_domain::trace::TraceEvent;
use br_protocol::{AttributeName, ClientRect, Rect};

use crate::node::{DomNode, RectSource};
use crate::notifier::ChangeNotifier;

/// Whether a node's recorded rectangles can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryState {
    /// Nothing recorded yet, or the last measurement failed.
    #[default]
    Unknown,
    /// Rectangles reflect the last observed layout.
    Tracked,
}

/// Rectangles last recorded for one node.
///
/// Only the [`GeometryDetector`] changes what is recorded; node code can
/// read it but not overwrite it.
///
/// ```rust,compile_fail
/// use br_node_sdk::{NodeGeometry, Rect};
///
/// let mut geometry = NodeGeometry::new();
/// geometry.record(vec![Rect::ZERO]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeGeometry {
    rects: Vec<Rect>,
    state: GeometryState,
}

impl NodeGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn state(&self) -> GeometryState {
        self.state
    }

    /// Replace the recorded rectangles.  Returns true when they differ
    /// from the previous ones.
    pub(crate) fn record(&mut self, rects: Vec<Rect>) -> bool {
        let changed = self.rects != rects;
        self.rects = rects;
        self.state = GeometryState::Tracked;
        changed
    }

    /// Mark the recorded rectangles as stale without discarding them.
    pub(crate) fn invalidate(&mut self) {
        self.state = GeometryState::Unknown;
    }

    /// A node is visible when its first rectangle has a non-zero area.
    pub fn is_visible(&self) -> bool {
        self.rects
            .first()
            .is_some_and(|r| r.width() != 0.0 && r.height() != 0.0)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Window adjustment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Maps a raw client rectangle of a non-fixed element into page
/// coordinates.
pub trait WindowAdjuster {
    fn adjust(&self, rect: &ClientRect) -> Rect;
}

impl<F> WindowAdjuster for F
where
    F: Fn(&ClientRect) -> Rect,
{
    fn adjust(&self, rect: &ClientRect) -> Rect {
        self(rect)
    }
}

/// Scroll offset plus zoom factor of the viewport:
/// `page = (client + scroll) * zoom` on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl WindowAdjuster for ViewportTransform {
    fn adjust(&self, rect: &ClientRect) -> Rect {
        Rect::new(
            (rect.top + self.scroll_y) * self.zoom,
            (rect.left + self.scroll_x) * self.zoom,
            (rect.bottom + self.scroll_y) * self.zoom,
            (rect.right + self.scroll_x) * self.zoom,
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Detector
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Recomputes node rectangles and reports changes through a notifier.
pub struct GeometryDetector<'a> {
    notifier: &'a ChangeNotifier<'a>,
    adjuster: &'a dyn WindowAdjuster,
}

impl<'a> GeometryDetector<'a> {
    pub fn new(notifier: &'a ChangeNotifier<'a>, adjuster: &'a dyn WindowAdjuster) -> Self {
        Self { notifier, adjuster }
    }

    /// Current rectangles of `node`, read from `alt` when given.
    ///
    /// Non-fixed nodes go through the window adjuster once per rectangle;
    /// fixed nodes keep their raw coordinates.  A source that cannot
    /// enumerate its rectangles yields an empty sequence.
    pub fn recompute_rects(&self, node: &dyn DomNode, alt: Option<&dyn RectSource>) -> Vec<Rect> {
        self.measure(node, alt).unwrap_or_default()
    }

    /// Recompute, record and, if anything changed, notify `Rects`.
    ///
    /// Returns true when the recorded rectangles changed.  When the source
    /// cannot be measured the node drops back to
    /// [`GeometryState::Unknown`] and nothing is sent.
    pub fn update_rects(&self, node: &mut dyn DomNode, alt: Option<&dyn RectSource>) -> bool {
        match self.measure(&*node, alt) {
            Some(rects) => self.record_and_notify(node, rects),
            None => {
                node.geometry_mut().invalidate();
                false
            }
        }
    }

    /// Collapse the node to a single zero rectangle.
    ///
    /// Returns true (and notifies `Rects`) only if that differs from what
    /// was recorded, so a second call in a row is a no-op.
    pub fn zero_out_rects(&self, node: &mut dyn DomNode) -> bool {
        self.record_and_notify(node, vec![Rect::ZERO])
    }

    fn measure(&self, node: &dyn DomNode, alt: Option<&dyn RectSource>) -> Option<Vec<Rect>> {
        let raw = match alt {
            Some(source) => source.client_rects(),
            None => node.client_rects(),
        };
        let Some(raw) = raw else {
            tracing::warn!(
                node_id = node.id(),
                node_type = node.node_type(),
                "client rects not available, treating geometry as unknown"
            );
            return None;
        };

        let rects = if node.is_fixed() {
            raw.into_iter().map(Rect::from).collect()
        } else {
            raw.iter().map(|r| self.adjuster.adjust(r)).collect()
        };
        Some(rects)
    }

    fn record_and_notify(&self, node: &mut dyn DomNode, rects: Vec<Rect>) -> bool {
        let previous = node.geometry().rects().len();
        let current = rects.len();
        if !node.geometry_mut().record(rects) {
            return false;
        }

        tracing::debug!(node_id = node.id(), previous, current, "rects changed");
        TraceEvent::RectsChanged {
            node_id: node.id(),
            previous,
            current,
        }
        .emit();

        // A failed notification is already logged; the change itself stands.
        let _ = self.notifier.notify(&AttributeName::Rects, &*node);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_compares_deeply() {
        let mut geometry = NodeGeometry::new();
        assert_eq!(geometry.state(), GeometryState::Unknown);

        assert!(geometry.record(vec![Rect::new(1.0, 2.0, 3.0, 4.0)]));
        assert_eq!(geometry.state(), GeometryState::Tracked);
        assert!(!geometry.record(vec![Rect::new(1.0, 2.0, 3.0, 4.0)]));
        assert!(geometry.record(vec![Rect::new(1.0, 2.0, 3.0, 4.5)]));
    }

    #[test]
    fn empty_and_single_zero_rect_differ() {
        let mut geometry = NodeGeometry::new();
        assert!(geometry.record(vec![Rect::ZERO]));
        assert!(geometry.record(vec![]));
        assert!(!geometry.record(vec![]));
    }

    #[test]
    fn invalidate_keeps_rects() {
        let mut geometry = NodeGeometry::new();
        geometry.record(vec![Rect::ZERO]);
        geometry.invalidate();
        assert_eq!(geometry.state(), GeometryState::Unknown);
        assert_eq!(geometry.rects(), &[Rect::ZERO]);
    }

    #[test]
    fn visibility_follows_first_rect() {
        let mut geometry = NodeGeometry::new();
        assert!(!geometry.is_visible());
        geometry.record(vec![Rect::ZERO, Rect::new(0.0, 0.0, 10.0, 10.0)]);
        assert!(!geometry.is_visible());
        geometry.record(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        assert!(geometry.is_visible());
        geometry.record(vec![Rect::new(0.0, 0.0, 10.0, 0.0)]);
        assert!(!geometry.is_visible());
    }

    #[test]
    fn viewport_transform_scrolls_then_zooms() {
        let viewport = ViewportTransform {
            scroll_x: 10.0,
            scroll_y: 100.0,
            zoom: 2.0,
        };
        let rect = viewport.adjust(&ClientRect::new(5.0, 1.0, 15.0, 11.0));
        assert_eq!(rect, Rect::new(210.0, 22.0, 230.0, 42.0));
    }

    #[test]
    fn default_viewport_is_identity() {
        let raw = ClientRect::new(5.0, 1.0, 15.0, 11.0);
        assert_eq!(ViewportTransform::default().adjust(&raw), Rect::from(raw));
    }

    #[test]
    fn closures_are_adjusters() {
        let shift = |r: &ClientRect| Rect::new(r.top + 1.0, r.left, r.bottom + 1.0, r.right);
        assert_eq!(
            shift.adjust(&ClientRect::new(0.0, 0.0, 1.0, 1.0)),
            Rect::new(1.0, 0.0, 2.0, 1.0)
        );
    }
}
