//! Telemetry Node - Main Entry Point
//!
//! Usage: telemetry-node [run|verify] [--config PATH]
//!
//! `run` streams frames over the configured transport until Ctrl-C.
//! `verify` checks a captured stream read from stdin.

use anyhow::bail;
use telemetry_node::{init_logging, run_node, verify_stream, NodeConfig};
use tokio::io::BufReader;
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Run,
    Verify,
}

fn parse_args(args: &[String]) -> anyhow::Result<(Mode, Option<String>)> {
    let mut mode = Mode::Run;
    let mut config_path = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "run" => mode = Mode::Run,
            "verify" => mode = Mode::Verify,
            "--config" | "-c" => match iter.next() {
                Some(path) => config_path = Some(path.clone()),
                None => bail!("--config needs a path"),
            },
            other => bail!("unknown argument '{}'", other),
        }
    }
    Ok((mode, config_path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (mode, config_path) = parse_args(&args)?;
    let config = NodeConfig::load(config_path.as_deref())?;

    init_logging(config.log_level());
    info!("Starting telemetry node v{}", env!("CARGO_PKG_VERSION"));

    match mode {
        Mode::Run => {
            let snapshot = run_node(config).await?;
            info!(
                "Sent {} frames ({} bytes), {} failed, {} skipped",
                snapshot.frames_sent,
                snapshot.bytes_sent,
                snapshot.send_failures,
                snapshot.overflow_skips
            );
        }
        Mode::Verify => {
            let report = verify_stream(BufReader::new(tokio::io::stdin())).await?;
            if !report.is_clean() {
                bail!(
                    "{} checksum errors, {} malformed lines",
                    report.checksum_errors,
                    report.malformed
                );
            }
        }
    }

    Ok(())
}
