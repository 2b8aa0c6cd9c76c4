//! Monotonic device uptime

use tokio::time::Instant;

/// Milliseconds since the pipeline started, from the tokio clock
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    origin: Instant,
}

impl Uptime {
    /// Start counting from now
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Elapsed uptime in milliseconds; never decreases
    pub fn millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::start()
    }
}
