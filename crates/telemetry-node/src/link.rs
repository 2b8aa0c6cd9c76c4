//! TCP peer link
//!
//! Stands in for the radio: an accepted connection is a subscribed peer and
//! receives one frame per notification. A second connection while a peer is
//! attached is refused. Closing the socket detaches the peer.

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use transport::{NotificationChannel, Subscription, TransportError};

/// Bind the link listener. Failure to bind is fatal to startup.
pub async fn bind_link(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("Peer link listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept loop that stops when dropped
pub struct LinkTask {
    handle: JoinHandle<()>,
}

impl LinkTask {
    /// Serve `listener` in the background
    pub fn spawn(
        listener: TcpListener,
        channel: Arc<NotificationChannel>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            handle: tokio::spawn(serve_link(listener, channel, shutdown)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for LinkTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Accept peers until shutdown
pub async fn serve_link(
    listener: TcpListener,
    channel: Arc<NotificationChannel>,
    mut shutdown: watch::Receiver<bool>,
) {
    while !*shutdown.borrow() {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => match channel.subscribe() {
                    Ok(subscription) => {
                        info!("Peer {} connected from {}", subscription.peer(), addr);
                        tokio::spawn(forward(stream, subscription, shutdown.clone()));
                    }
                    Err(TransportError::AlreadyAttached(existing)) => {
                        warn!("Refusing {}: peer {} already attached", addr, existing);
                        drop(stream);
                    }
                    Err(e) => warn!("Refusing {}: {}", addr, e),
                },
                Err(e) => warn!("Accept failed: {}", e),
            },
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Peer link stopped");
}

/// Pump notifications to the socket until either side goes away
async fn forward(stream: TcpStream, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
    let peer = subscription.peer();
    let (mut reader, mut writer) = stream.into_split();
    let mut discard = [0u8; 64];

    loop {
        tokio::select! {
            frame = subscription.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = writer.write_all(&frame).await {
                        debug!("Peer {} write failed: {}", peer, e);
                        break;
                    }
                }
                None => break,
            },
            read = reader.read(&mut discard) => match read {
                Ok(0) | Err(_) => break,
                // Peer to device traffic is ignored
                Ok(_) => {}
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Peer {} disconnected", peer);
}
