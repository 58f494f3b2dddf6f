//! Simulated page: a few nodes scrolled, typed into and hidden, with every
//! resulting update sent through the configured transport.

use br_domain::config::Config;
use br_node_sdk::{
    sink_for, AttributeCatalog, AttributeName, ChangeNotifier, ClientRect, DomNode,
    GeometryDetector, MessageSink, NodeGeometry, RectSource, ViewportTransform, NOT_FIXED,
};

const SCROLL_STEP: f64 = 40.0;
const TYPED: &str = "hello";

pub fn run(config: &Config, steps: u32) -> anyhow::Result<()> {
    let catalog = AttributeCatalog::from_config(config)?;
    let sink = sink_for(config.transport.kind);
    let failed = run_with(&catalog, sink.as_ref(), steps);
    tracing::info!(steps, failed, "demo finished");
    Ok(())
}

#[derive(Debug, Default)]
struct DemoNode {
    node_type: &'static str,
    id: u64,
    fixed_id: i64,
    client: Vec<ClientRect>,
    geometry: NodeGeometry,
    text: Option<String>,
    url: Option<String>,
    is_password: Option<bool>,
    options: Option<Vec<String>>,
    max_scrolling: Option<Vec<f64>>,
    current_scrolling: Option<Vec<f64>>,
}

impl DemoNode {
    fn new(node_type: &'static str, id: u64, fixed_id: i64, rect: [f64; 4]) -> Self {
        let [top, left, bottom, right] = rect;
        Self {
            node_type,
            id,
            fixed_id,
            client: vec![ClientRect::new(top, left, bottom, right)],
            ..Default::default()
        }
    }

    /// Content moves up in client space as the page scrolls down.
    fn scroll_by(&mut self, dy: f64) {
        if self.is_fixed() {
            return;
        }
        for rect in &mut self.client {
            rect.top -= dy;
            rect.bottom -= dy;
        }
    }
}

impl RectSource for DemoNode {
    fn client_rects(&self) -> Option<Vec<ClientRect>> {
        Some(self.client.clone())
    }
}

impl DomNode for DemoNode {
    fn node_type(&self) -> &str {
        self.node_type
    }
    fn id(&self) -> u64 {
        self.id
    }
    fn fixed_id(&self) -> i64 {
        self.fixed_id
    }
    fn geometry(&self) -> &NodeGeometry {
        &self.geometry
    }
    fn geometry_mut(&mut self) -> &mut NodeGeometry {
        &mut self.geometry
    }
    fn text(&self) -> Option<String> {
        self.text.clone()
    }
    fn url(&self) -> Option<String> {
        self.url.clone()
    }
    fn is_password(&self) -> Option<bool> {
        self.is_password
    }
    fn options(&self) -> Option<Vec<String>> {
        self.options.clone()
    }
    fn max_scrolling(&self) -> Option<Vec<f64>> {
        self.max_scrolling.clone()
    }
    fn current_scrolling(&self) -> Option<Vec<f64>> {
        self.current_scrolling.clone()
    }
}

fn page() -> Vec<(DemoNode, Vec<AttributeName>)> {
    let mut input = DemoNode::new("input", 0, NOT_FIXED, [100.0, 20.0, 124.0, 220.0]);
    input.text = Some(String::new());
    input.is_password = Some(false);

    let mut link = DemoNode::new("a", 1, NOT_FIXED, [140.0, 20.0, 156.0, 60.0]);
    link.text = Some("Docs".into());
    link.url = Some("https://example.org/docs".into());

    let mut select = DemoNode::new("select", 2, NOT_FIXED, [180.0, 20.0, 200.0, 120.0]);
    select.options = Some(vec!["red".into(), "green".into(), "blue".into()]);

    let mut header = DemoNode::new("div", 3, 0, [0.0, 0.0, 48.0, 800.0]);
    header.max_scrolling = Some(vec![0.0, 400.0]);
    header.current_scrolling = Some(vec![0.0, 0.0]);

    vec![
        (input, vec![AttributeName::Text, AttributeName::IsPassword]),
        (link, vec![AttributeName::Text, AttributeName::Url]),
        (select, vec![AttributeName::Options]),
        (
            header,
            vec![AttributeName::MaxScrolling, AttributeName::CurrentScrolling],
        ),
    ]
}

/// Returns the number of notifications that failed.
fn run_with(catalog: &AttributeCatalog, sink: &dyn MessageSink, steps: u32) -> usize {
    let notifier = ChangeNotifier::new(catalog, sink);
    let mut nodes = page();
    let mut viewport = ViewportTransform::default();
    let mut failed = 0;

    let mut send = |name: &AttributeName, node: &DemoNode| {
        if notifier.notify(name, node).is_err() {
            failed += 1;
        }
    };

    // Initial layout: every node reports its geometry and attributes.
    {
        let detector = GeometryDetector::new(&notifier, &viewport);
        for (node, attributes) in &mut nodes {
            detector.update_rects(node, None);
            for name in attributes.iter() {
                send(name, node);
            }
        }
    }

    let typed: Vec<char> = TYPED.chars().collect();
    for step in 0..steps as usize {
        viewport.scroll_y += SCROLL_STEP;
        tracing::debug!(step, scroll_y = viewport.scroll_y, "scrolling");

        for (node, _) in &mut nodes {
            node.scroll_by(SCROLL_STEP);
        }

        let (input, _) = &mut nodes[0];
        if let Some(text) = input.text.as_mut() {
            text.push(typed[step % typed.len()]);
        }
        send(&AttributeName::Text, input);

        let (header, _) = &mut nodes[3];
        header.current_scrolling = Some(vec![0.0, viewport.scroll_y]);
        send(&AttributeName::CurrentScrolling, header);

        // Page coordinates are unchanged by scrolling, so nothing is sent.
        let detector = GeometryDetector::new(&notifier, &viewport);
        for (node, _) in &mut nodes {
            detector.update_rects(node, None);
        }
    }

    // The link collapses.
    let detector = GeometryDetector::new(&notifier, &viewport);
    let (link, _) = &mut nodes[1];
    detector.zero_out_rects(link);

    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use br_node_sdk::MemorySink;

    #[test]
    fn demo_sends_expected_sequence() {
        let catalog = AttributeCatalog::from_config(&Config::default()).unwrap();
        let sink = MemorySink::new();
        let failed = run_with(&catalog, &sink, 3);
        assert_eq!(failed, 0);

        let sent: Vec<String> = sink.drain().iter().map(|m| m.to_string()).collect();
        // 4 initial geometries + 7 initial attributes + 2 per step + 1 collapse.
        assert_eq!(sent.len(), 4 + 7 + 2 * 3 + 1);
        assert_eq!(sent[0], "DOM#upd#input#0#0#100;20;124;220#");
        assert_eq!(sent[1], "DOM#upd#input#0#3##");
        assert_eq!(sent[2], "DOM#upd#input#0#4#0#");
        assert!(sent.contains(&"DOM#upd#input#0#3#hel#".to_string()));
        assert!(sent.contains(&"DOM#upd#div#3#8#0;120#".to_string()));
        assert_eq!(sent.last().unwrap(), "DOM#upd#a#1#0#0;0;0;0#");
    }

    #[test]
    fn scrolling_leaves_fixed_nodes_alone() {
        let mut header = DemoNode::new("div", 3, 0, [0.0, 0.0, 48.0, 800.0]);
        header.scroll_by(SCROLL_STEP);
        assert_eq!(header.client[0].top, 0.0);

        let mut link = DemoNode::new("a", 1, NOT_FIXED, [140.0, 20.0, 156.0, 60.0]);
        link.scroll_by(SCROLL_STEP);
        assert_eq!(link.client[0].top, 100.0);
    }
}
