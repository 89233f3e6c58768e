use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Process-wide admission gate: at most one upstream call in flight.
///
/// Waiters are admitted in FIFO order.
#[derive(Debug, Default)]
pub struct AdmissionGate {
    slot: Mutex<()>,
    admitted: AtomicU64,
}

/// Exclusive possession of the upstream slot. Dropping it releases the gate.
#[derive(Debug)]
pub struct AdmissionToken<'a> {
    _slot: MutexGuard<'a, ()>,
    seq: u64,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> AdmissionToken<'_> {
        let queued_at = Instant::now();
        let slot = self.slot.lock().await;
        let seq = self.admitted.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            seq,
            waited_ms = queued_at.elapsed().as_millis() as u64,
            "admission granted"
        );
        AdmissionToken { _slot: slot, seq }
    }

    /// Number of tokens granted since startup.
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }
}

impl AdmissionToken<'_> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn release(self) {
        debug!(seq = self.seq, "admission released");
    }
}
