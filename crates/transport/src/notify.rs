//! Connection-oriented notification transport
//!
//! Models a wireless link where one peer at a time subscribes to a
//! notification characteristic. Each frame becomes one notification. When no
//! peer is subscribed, or every notification buffer is in flight, the send
//! fails and the frame is dropped.
//!
//! Notification buffers come from a fixed pool sized at construction, so
//! sending a frame copies into an existing buffer and never allocates.

use crate::connection::{ConnectionState, PeerId};
use crate::error::TransportError;
use crate::sink::{TransportKind, TransportSink};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Notification link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Advertised device name
    pub device_name: String,
    /// UART-style service UUID
    pub service_uuid: String,
    /// Notify (device → peer) characteristic UUID
    pub tx_characteristic_uuid: String,
    /// Negotiated ATT MTU; one notification carries at most `mtu - 3` bytes
    pub mtu: usize,
    /// Notification buffers; at most this many may be in flight to the peer
    pub queue_depth: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            device_name: "BioSignal".to_string(),
            service_uuid: "6E400001-B5A3-F393-E0A9-E50E24DCCA9E".to_string(),
            tx_characteristic_uuid: "6E400003-B5A3-F393-E0A9-E50E24DCCA9E".to_string(),
            mtu: 247,
            queue_depth: 8,
        }
    }
}

impl NotifyConfig {
    /// Largest frame a single notification can carry
    pub fn max_notification_len(&self) -> usize {
        self.mtu.saturating_sub(3)
    }
}

struct Subscriber {
    peer: PeerId,
    tx: mpsc::Sender<Notification>,
}

/// Fixed set of notification buffers
struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    fn new(count: usize, size: usize) -> Self {
        let free = (0..count).map(|_| Vec::with_capacity(size)).collect();
        Self {
            free: Mutex::new(free),
        }
    }

    fn take(&self) -> Option<Vec<u8>> {
        self.lock().pop()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.lock().push(buf);
    }

    fn available(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One delivered frame. The buffer returns to the pool when dropped.
pub struct Notification {
    buf: Vec<u8>,
    pool: Arc<BufferPool>,
}

impl Deref for Notification {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl Drop for Notification {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}

/// The device side of the link: readiness, advertising, and the single
/// subscriber slot
pub struct NotificationChannel {
    config: NotifyConfig,
    state: Arc<ConnectionState>,
    subscriber: Mutex<Option<Subscriber>>,
    pool: Arc<BufferPool>,
    next_peer: AtomicU32,
    ready: AtomicBool,
    advertising: AtomicBool,
}

impl NotificationChannel {
    /// Create a channel that is ready but not yet advertising
    pub fn new(config: NotifyConfig) -> Arc<Self> {
        info!(
            "Notification channel '{}' (service {})",
            config.device_name, config.service_uuid
        );
        let pool = Arc::new(BufferPool::new(
            config.queue_depth.max(1),
            config.max_notification_len(),
        ));
        Arc::new(Self {
            config,
            state: Arc::new(ConnectionState::new()),
            subscriber: Mutex::new(None),
            pool,
            next_peer: AtomicU32::new(1),
            ready: AtomicBool::new(true),
            advertising: AtomicBool::new(false),
        })
    }

    /// Connection state the framer gates on
    pub fn connection(&self) -> Arc<ConnectionState> {
        Arc::clone(&self.state)
    }

    /// Identity and link parameters
    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// Mark the radio usable or not
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Whether the radio is usable
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Begin advertising for a connection
    pub fn start_advertising(&self) -> Result<(), TransportError> {
        if !self.is_ready() {
            return Err(TransportError::NotReady("radio not ready".to_string()));
        }
        if !self.advertising.swap(true, Ordering::AcqRel) {
            info!("Advertising as '{}'", self.config.device_name);
        }
        Ok(())
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising.load(Ordering::Acquire)
    }

    /// Attach a new peer and hand back its receiving end
    pub fn subscribe(self: &Arc<Self>) -> Result<Subscription, TransportError> {
        let mut slot = self.slot();
        if let Some(existing) = slot.as_ref() {
            return Err(TransportError::AlreadyAttached(existing.peer));
        }

        let id = self.next_peer.fetch_add(1, Ordering::Relaxed);
        let peer = PeerId::new(id).ok_or_else(|| TransportError::NotReady("peer ids exhausted".to_string()))?;
        let (tx, rx) = mpsc::channel(self.config.queue_depth.max(1));

        self.state.attach(peer)?;
        *slot = Some(Subscriber { peer, tx });
        self.advertising.store(false, Ordering::Release);

        Ok(Subscription {
            peer,
            rx,
            channel: Arc::clone(self),
        })
    }

    fn unsubscribe(&self, peer: PeerId) {
        let mut slot = self.slot();
        if slot.as_ref().map(|s| s.peer) == Some(peer) {
            *slot = None;
            self.state.detach(peer);
            // Resume advertising so a new peer can connect
            if self.is_ready() {
                self.advertising.store(true, Ordering::Release);
                debug!("Peer {} gone, advertising again", peer);
            }
        }
    }

    /// Sink handing frames to the current subscriber
    pub fn sink(self: &Arc<Self>) -> NotifySink {
        NotifySink {
            channel: Arc::clone(self),
        }
    }

    fn notify(&self, frame: &[u8]) -> Result<(), TransportError> {
        let max = self.config.max_notification_len();
        if frame.len() > max {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max,
            });
        }

        let slot = self.slot();
        let subscriber = slot.as_ref().ok_or(TransportError::NotSubscribed)?;
        let mut buf = self.pool.take().ok_or(TransportError::BufferExhausted)?;
        buf.extend_from_slice(frame);
        let notification = Notification {
            buf,
            pool: Arc::clone(&self.pool),
        };
        subscriber
            .tx
            .try_send(notification)
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => TransportError::BufferExhausted,
                mpsc::error::TrySendError::Closed(_) => TransportError::NotSubscribed,
            })
    }

    /// Notification buffers not currently in flight
    pub fn free_buffers(&self) -> usize {
        self.pool.available()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Subscriber>> {
        self.subscriber.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Peer side of a subscription; dropping it detaches the peer
pub struct Subscription {
    peer: PeerId,
    rx: mpsc::Receiver<Notification>,
    channel: Arc<NotificationChannel>,
}

impl Subscription {
    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// Wait for the next notification
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Take a queued notification without waiting
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.peer);
    }
}

/// [`TransportSink`] over a [`NotificationChannel`]
#[derive(Clone)]
pub struct NotifySink {
    channel: Arc<NotificationChannel>,
}

impl NotifySink {
    pub fn channel(&self) -> &Arc<NotificationChannel> {
        &self.channel
    }
}

impl TransportSink for NotifySink {
    fn kind(&self) -> TransportKind {
        TransportKind::Notification
    }

    fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        self.channel.start_advertising()
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.channel.notify(frame).map_err(|e| {
            warn!("Notification dropped: {}", e);
            e
        })
    }
}
