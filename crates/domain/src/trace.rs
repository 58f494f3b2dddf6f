use serde::Serialize;

/// Structured trace events emitted across all DomBridge crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    AttributeRegistered {
        name: String,
        code: u32,
        replaced: Option<u32>,
    },
    CatalogBuilt {
        codes: usize,
        encoders: usize,
    },
    NotificationSent {
        node_type: String,
        node_id: u64,
        attribute: String,
        code: u32,
        data_chars: usize,
    },
    NotificationFailed {
        node_id: u64,
        attribute: String,
        reason: String,
    },
    RectsChanged {
        node_id: u64,
        previous: usize,
        current: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "br_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let ev = TraceEvent::RectsChanged {
            node_id: 4,
            previous: 0,
            current: 1,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "RectsChanged");
        assert_eq!(json["node_id"], 4);
    }
}
