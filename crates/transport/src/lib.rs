//! Frame Transports
//!
//! One [`TransportSink`] abstraction with two implementations: a byte-stream
//! serial sink that is always connected, and a connection-oriented
//! notification sink that fails when no peer is subscribed. Delivery is
//! best-effort; failed frames are never retried.

mod connection;
mod error;
mod notify;
mod serial;
mod sink;

pub use connection::{ConnectionState, PeerId};
pub use error::TransportError;
pub use notify::{Notification, NotificationChannel, NotifyConfig, NotifySink, Subscription};
pub use serial::{open_serial, SerialConfig, SerialSink};
pub use sink::{TransportKind, TransportSink};
