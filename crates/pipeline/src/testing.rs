//! In-memory sinks for schedule tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use transport::{TransportError, TransportKind, TransportSink};

/// Records every frame it is given
#[derive(Clone)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    ready: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            frames: Arc::default(),
            ready: true,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl TransportSink for RecordingSink {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.frames.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

/// Rejects the first `failures` frames, then records the rest
#[derive(Clone)]
pub struct FailingSink {
    remaining_failures: Arc<AtomicUsize>,
    delivered: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FailingSink {
    pub fn new(failures: usize) -> Self {
        Self {
            remaining_failures: Arc::new(AtomicUsize::new(failures)),
            delivered: Arc::default(),
        }
    }

    pub fn delivered(&self) -> Vec<Vec<u8>> {
        self.delivered.lock().unwrap().clone()
    }
}

impl TransportSink for FailingSink {
    fn kind(&self) -> TransportKind {
        TransportKind::Notification
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let failing = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TransportError::BufferExhausted);
        }
        self.delivered.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

/// Never completes a send
pub struct StalledSink;

impl TransportSink for StalledSink {
    fn kind(&self) -> TransportKind {
        TransportKind::Notification
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn send(&mut self, _frame: &[u8]) -> Result<(), TransportError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}
