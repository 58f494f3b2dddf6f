//! Message sinks: where formatted protocol messages are handed off.
//!
//! Delivery is fire-and-forget: a sink has no way to report failure back
//! to the notifier, and the bridge defines no acknowledgement.

use std::io::Write;

use br_domain::config::TransportKind;
use br_protocol::ProtocolMessage;
use parking_lot::Mutex;

pub trait MessageSink {
    fn deliver(&self, message: &ProtocolMessage);
}

/// Writes one message per line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn deliver(&self, message: &ProtocolMessage) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{message}") {
            tracing::warn!(error = %e, "failed to write protocol message to stdout");
        }
    }
}

/// Emits each message as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn deliver(&self, message: &ProtocolMessage) {
        tracing::info!(target: "br_transport", message = %message, "protocol message");
    }
}

/// Buffers messages in memory until drained.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<ProtocolMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far.
    pub fn messages(&self) -> Vec<ProtocolMessage> {
        self.messages.lock().clone()
    }

    /// Take all buffered messages, leaving the sink empty.
    pub fn drain(&self) -> Vec<ProtocolMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl MessageSink for MemorySink {
    fn deliver(&self, message: &ProtocolMessage) {
        self.messages.lock().push(message.clone());
    }
}

/// The sink selected by `[transport] kind`.
pub fn sink_for(kind: TransportKind) -> Box<dyn MessageSink> {
    match kind {
        TransportKind::Stdout => Box::new(StdoutSink),
        TransportKind::Log => Box::new(LogSink),
    }
}
