//! Serial line transport
//!
//! Frames are written straight to a byte stream. The line has no connection
//! concept and no backpressure signal, so it counts as permanently attached.

use crate::error::TransportError;
use crate::sink::{TransportKind, TransportSink};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info};

/// Default baud rate for the serial console
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Serial transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port device path (e.g. "/dev/ttyACM0"), or "stdout"
    pub device: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Write a `timestamp,ch0,...` header line at stream start
    pub session_header: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: "stdout".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            session_header: true,
        }
    }
}

impl SerialConfig {
    /// Whether frames go to the process stdout instead of a port
    pub fn is_stdout(&self) -> bool {
        self.device == "stdout" || self.device == "-"
    }
}

/// Open the configured serial port
pub fn open_serial(config: &SerialConfig) -> Result<SerialSink<SerialStream>, TransportError> {
    info!(
        "Opening serial port {} at {} baud",
        config.device, config.baud_rate
    );
    let port = tokio_serial::new(config.device.as_str(), config.baud_rate).open_native_async()?;
    Ok(SerialSink::new(port))
}

/// Frame sink over any async byte stream.
///
/// Frames are handed to the stream's buffer without a per-frame flush.
/// Flushing a serial port drains the tty synchronously, which would hold the
/// runtime thread for the whole line time of the frame.
pub struct SerialSink<W> {
    writer: W,
    header: Option<String>,
    header_sent: bool,
    bytes_written: u64,
}

impl<W: AsyncWrite + Unpin + Send> SerialSink<W> {
    /// Create a sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header: None,
            header_sent: false,
            bytes_written: 0,
        }
    }

    /// Send `header` once when the stream starts
    pub fn with_session_header(mut self, header: String) -> Self {
        self.header = Some(header);
        self
    }

    /// Bytes written so far, header included
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Access the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Release the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(bytes).await?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

impl<W: AsyncWrite + Unpin + Send> TransportSink for SerialSink<W> {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        if self.header_sent {
            return Ok(());
        }
        if let Some(header) = self.header.take() {
            debug!("Writing session header");
            self.write_bytes(header.as_bytes()).await?;
        }
        self.header_sent = true;
        Ok(())
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.write_bytes(frame).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;

    /// Accepts every write, never finishes a flush
    #[derive(Default)]
    struct UndrainedLine {
        written: Vec<u8>,
    }

    impl AsyncWrite for UndrainedLine {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.written.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Pending
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Pending
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_does_not_wait_for_line_drain() {
        let mut sink = SerialSink::new(UndrainedLine::default())
            .with_session_header("timestamp,ch0,ch1\n".to_string());

        tokio::time::timeout(Duration::from_millis(5), sink.start())
            .await
            .expect("header write waited on drain")
            .unwrap();
        tokio::time::timeout(Duration::from_millis(5), sink.send(b"1000,100,-200,2D29\n"))
            .await
            .expect("frame write waited on drain")
            .unwrap();

        assert_eq!(
            sink.get_ref().written,
            b"timestamp,ch0,ch1\n1000,100,-200,2D29\n".to_vec()
        );
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let mut sink = SerialSink::new(Vec::new()).with_session_header("timestamp,ch0\n".to_string());

        sink.start().await.unwrap();
        sink.start().await.unwrap();
        sink.send(b"10,1,ABCD\n").await.unwrap();

        assert_eq!(sink.get_ref().as_slice(), b"timestamp,ch0\n10,1,ABCD\n");
        assert_eq!(sink.bytes_written(), 24);
    }

    #[tokio::test]
    async fn test_frames_written_verbatim() {
        let mut sink = SerialSink::new(Vec::new());
        sink.start().await.unwrap();

        sink.send(b"1000,100,-200,2D29\n").await.unwrap();
        sink.send(b"1010,101,-201,0000\n").await.unwrap();

        let written = sink.into_inner();
        assert_eq!(
            written,
            b"1000,100,-200,2D29\n1010,101,-201,0000\n".to_vec()
        );
    }

    #[tokio::test]
    async fn test_always_ready() {
        let sink = SerialSink::new(tokio::io::sink());
        assert!(sink.is_ready());
        assert_eq!(sink.kind(), TransportKind::Serial);
    }

    #[test]
    fn test_stdout_device() {
        assert!(SerialConfig::default().is_stdout());
        let port = SerialConfig {
            device: "/dev/ttyACM0".to_string(),
            ..Default::default()
        };
        assert!(!port.is_stdout());
    }
}
