//! Peer connection state shared by the link manager and the framer

use crate::error::TransportError;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

/// Identifier of an attached peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(NonZeroU32);

impl PeerId {
    /// `None` for zero, which is reserved for "no peer"
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(PeerId)
    }

    /// Raw non-zero id
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// At most one attached peer, readable without locks from any context.
///
/// Written by the connection collaborator (attach/detach), read by the framer
/// once per transmit tick.
#[derive(Debug, Default)]
pub struct ConnectionState {
    /// Attached peer id, 0 when detached
    peer: AtomicU32,
}

impl ConnectionState {
    /// Create a detached state
    pub const fn new() -> Self {
        Self {
            peer: AtomicU32::new(0),
        }
    }

    /// Create a state with `peer` already attached (e.g. a serial line)
    pub fn attached(peer: PeerId) -> Self {
        Self {
            peer: AtomicU32::new(peer.get()),
        }
    }

    /// Attach `peer`. Fails if another peer is already attached.
    pub fn attach(&self, peer: PeerId) -> Result<(), TransportError> {
        match self
            .peer
            .compare_exchange(0, peer.get(), Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                info!("Peer {} attached", peer);
                Ok(())
            }
            Err(current) => match PeerId::new(current) {
                Some(existing) if existing == peer => Ok(()),
                Some(existing) => Err(TransportError::AlreadyAttached(existing)),
                None => unreachable!("failed exchange from 0 observed 0"),
            },
        }
    }

    /// Detach `peer`. Returns false if it was not the attached peer.
    pub fn detach(&self, peer: PeerId) -> bool {
        let detached = self
            .peer
            .compare_exchange(peer.get(), 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if detached {
            info!("Peer {} detached", peer);
        } else {
            debug!("Ignoring detach of peer {} that is not attached", peer);
        }
        detached
    }

    /// Whether a peer is currently attached
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.peer.load(Ordering::Acquire) != 0
    }

    /// Currently attached peer
    pub fn peer(&self) -> Option<PeerId> {
        PeerId::new(self.peer.load(Ordering::Acquire))
    }
}
