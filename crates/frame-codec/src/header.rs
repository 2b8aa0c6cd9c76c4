//! Serial session header

/// Column header sent once at the start of a serial stream:
/// `timestamp,ch0,ch1,...,chN-1\n`
pub fn session_header(channels: usize) -> String {
    let mut header = String::from("timestamp");
    for channel in 0..channels {
        header.push_str(&format!(",ch{}", channel));
    }
    header.push('\n');
    header
}

/// Whether a received line is the session header rather than a frame
pub fn is_session_header(line: &str) -> bool {
    line.trim_start().starts_with("timestamp")
}
