//! Telemetry Node
//!
//! Wires the acquisition pipeline to the configured transport and runs it
//! until Ctrl-C. Frames go to a serial line (or stdout), or to a single
//! peer over the notification link.

use anyhow::Context;
use frame_codec::session_header;
use crate::link::LinkTask;
use pipeline::{shutdown_channel, Pipeline, PipelineConfig, StatsSnapshot};
use signal_generator::SyntheticSource;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use transport::{open_serial, ConnectionState, NotificationChannel, PeerId, SerialSink, TransportKind};

pub mod config;
pub mod link;
pub mod sink;
pub mod verify;

pub use crate::config::{LinkConfig, NodeConfig};
pub use crate::sink::NodeSink;
pub use crate::verify::{verify_stream, VerifyReport};

/// Peer id used for the always-connected serial line
const SERIAL_PEER: u32 = 1;

/// Initialize logging to stderr; stdout may be carrying frames
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Flip `shutdown` on Ctrl-C
fn spawn_ctrl_c(stop: watch::Sender<bool>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
        }
        let _ = stop.send(true);
    });
}

/// Run the node until Ctrl-C
pub async fn run_node(config: NodeConfig) -> anyhow::Result<StatsSnapshot> {
    let (stop, shutdown) = shutdown_channel();
    spawn_ctrl_c(stop);
    run_node_until(config, shutdown).await
}

/// Run the node until `shutdown` flips to true
pub async fn run_node_until(
    config: NodeConfig,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<StatsSnapshot> {
    config
        .pipeline
        .validate()
        .context("invalid pipeline configuration")?;

    let source = SyntheticSource::new(&config.pipeline.generator);
    let channels = config.pipeline.generator.channels();

    match config.transport {
        TransportKind::Serial => {
            let header = config
                .serial
                .session_header
                .then(|| session_header(channels));
            let sink = if config.serial.is_stdout() {
                info!("Writing frames to stdout");
                NodeSink::Stdout(with_header(SerialSink::new(tokio::io::stdout()), header))
            } else {
                let port = open_serial(&config.serial)
                    .with_context(|| format!("cannot open serial port {}", config.serial.device))?;
                NodeSink::Port(with_header(port, header))
            };
            let peer = PeerId::new(SERIAL_PEER).context("serial peer id")?;
            let connection = Arc::new(ConnectionState::attached(peer));
            run_pipeline(config.pipeline, source, sink, connection, shutdown).await
        }
        TransportKind::Notification => {
            let channel = NotificationChannel::new(config.notify.clone());
            let listener = link::bind_link(&config.link.listen_addr)
                .await
                .with_context(|| format!("cannot bind peer link on {}", config.link.listen_addr))?;
            run_notification(config.pipeline, source, listener, channel, shutdown).await
        }
    }
}

/// Serve peers on `listener` for as long as the pipeline runs
async fn run_notification(
    config: PipelineConfig,
    source: SyntheticSource,
    listener: TcpListener,
    channel: Arc<NotificationChannel>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<StatsSnapshot> {
    let _link = LinkTask::spawn(listener, Arc::clone(&channel), shutdown.clone());
    let sink = NodeSink::Notify(channel.sink());
    run_pipeline(config, source, sink, channel.connection(), shutdown).await
}

async fn run_pipeline(
    config: PipelineConfig,
    source: SyntheticSource,
    sink: NodeSink,
    connection: Arc<ConnectionState>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<StatsSnapshot> {
    let pipeline = Pipeline::new(config, source, sink, connection)?;
    info!("Telemetry node started");
    let snapshot = pipeline.run(shutdown).await?;
    info!("Telemetry node stopped");
    Ok(snapshot)
}

fn with_header<W>(sink: SerialSink<W>, header: Option<String>) -> SerialSink<W>
where
    W: tokio::io::AsyncWrite + Unpin + Send,
{
    match header {
        Some(header) => sink.with_session_header(header),
        None => sink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_notification_node_streams_to_peer() {
        let mut config = NodeConfig::default();
        config.transport = TransportKind::Notification;
        config.pipeline.generator = signal_generator::GeneratorConfig::with_channels(2);

        // Bind here to learn the port, then hand the address over
        let probe = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = probe.local_addr().unwrap();
        drop(probe);
        config.link.listen_addr = addr.to_string();

        let (stop, shutdown) = shutdown_channel();
        let node = tokio::spawn(run_node_until(config, shutdown));

        let mut client = None;
        for _ in 0..100 {
            if let Ok(stream) = TcpStream::connect(addr).await {
                client = Some(stream);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let mut lines = BufReader::new(client.unwrap()).lines();

        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let frame = frame_codec::decode_frame(line.as_bytes()).unwrap();
        assert_eq!(frame.channels.len(), 2);

        stop.send(true).unwrap();
        let snapshot = node.await.unwrap().unwrap();
        assert!(snapshot.frames_sent >= 1);
    }

    #[tokio::test]
    async fn test_link_closed_when_transport_fails_to_start() {
        let config = PipelineConfig::default();
        let source = SyntheticSource::new(&config.generator);
        let channel = NotificationChannel::new(transport::NotifyConfig::default());
        channel.set_ready(false);
        let listener = link::bind_link("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (_stop, shutdown) = shutdown_channel();

        let result = run_notification(config, source, listener, Arc::clone(&channel), shutdown).await;
        assert!(result.is_err());

        let mut refused = false;
        for _ in 0..200 {
            if TcpStream::connect(addr).await.is_err() {
                refused = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(refused, "peer link still accepting after failed start");
        assert!(!channel.connection().is_attached());
    }

    #[tokio::test]
    async fn test_invalid_config_fails_fast() {
        let mut config = NodeConfig::default();
        config.pipeline.schedule.transmit_rate_hz = 0.0;
        let (_stop, shutdown) = shutdown_channel();

        assert!(run_node_until(config, shutdown).await.is_err());
    }
}
