//! Operator-facing events raised while resolving wire ids.
//!
//! Sinks are called on the packet path and must return immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ProtocolVersion;

/// A wire id that the version's catalog does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnresolvedWireId {
    pub version: ProtocolVersion,
    pub wire_id: i32,
}

pub trait DiagnosticSink: Send + Sync {
    fn unresolved(&self, event: UnresolvedWireId);
}

/// Logs every unresolved id as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn unresolved(&self, event: UnresolvedWireId) {
        warn!(
            version = event.version.get(),
            wire_id = event.wire_id,
            "could not find entity type id {} in {}, falling back",
            event.wire_id,
            event.version
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn unresolved(&self, _event: UnresolvedWireId) {}
}

/// Forwards events into a channel, dropping them when it is full or closed.
///
/// Drops are counted. Only the first drop of an overflow is logged; the next
/// successful send logs how many were lost.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<UnresolvedWireId>,
    overflow: Arc<Overflow>,
}

#[derive(Debug, Default)]
struct Overflow {
    dropped: AtomicU64,
    active: AtomicBool,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: Sender<UnresolvedWireId>) -> Self {
        Self {
            tx,
            overflow: Arc::default(),
        }
    }

    /// A sink backed by a bounded channel, plus the receiving end.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<UnresolvedWireId>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self::new(tx), rx)
    }

    /// Events dropped because the channel was full, since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.overflow.dropped.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for ChannelSink {
    fn unresolved(&self, event: UnresolvedWireId) {
        match self.tx.try_send(event) {
            Ok(()) => {
                if self.overflow.active.load(Ordering::Relaxed)
                    && self.overflow.active.swap(false, Ordering::Relaxed)
                {
                    warn!(
                        "diagnostic channel drained, {} unresolved ids dropped so far",
                        self.dropped()
                    );
                }
            }
            Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(dropped)) => {
                self.overflow.dropped.fetch_add(1, Ordering::Relaxed);
                if !self.overflow.active.swap(true, Ordering::Relaxed) {
                    warn!(
                        "diagnostic channel full, dropping unresolved ids starting with {} for {}",
                        dropped.wire_id, dropped.version
                    );
                }
            }
        }
    }
}
