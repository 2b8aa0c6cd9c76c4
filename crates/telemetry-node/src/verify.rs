//! Offline check of a captured frame stream

use frame_codec::{decode_frame, is_session_header, FrameError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Totals over a verified stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub valid: u64,
    pub checksum_errors: u64,
    pub malformed: u64,
    pub headers: u64,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.checksum_errors == 0 && self.malformed == 0
    }
}

/// Decode every line from `input`, counting good and bad frames
pub async fn verify_stream<R: AsyncBufRead + Unpin>(input: R) -> std::io::Result<VerifyReport> {
    let mut report = VerifyReport::default();
    let mut lines = input.lines();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        if is_session_header(&line) {
            report.headers += 1;
            continue;
        }

        match decode_frame(line.as_bytes()) {
            Ok(frame) => {
                debug!("line {}: ts {} ms, {} channels", line_no, frame.timestamp_ms, frame.channels.len());
                report.valid += 1;
            }
            Err(e @ FrameError::ChecksumMismatch { .. }) => {
                warn!("line {}: {}", line_no, e);
                report.checksum_errors += 1;
            }
            Err(e) => {
                warn!("line {}: {}", line_no, e);
                report.malformed += 1;
            }
        }
    }

    info!(
        valid = report.valid,
        checksum_errors = report.checksum_errors,
        malformed = report.malformed,
        "Verification finished"
    );
    Ok(report)
}
