//! Acquisition Pipeline
//!
//! Runs two independent periodic schedules on the tokio clock: a high-rate
//! sampler that fills the channel rings, and a lower-rate transmitter that
//! frames the latest values and hands them to the transport. Neither blocks
//! the other; they share only the rings and the connection state.

mod clock;
mod config;
mod error;
mod pipeline;
mod schedule;
mod stats;
mod transmitter;

pub use clock::Uptime;
pub use config::{PipelineConfig, ScheduleConfig, MAX_RATE_HZ, MIN_RATE_HZ};
pub use error::PipelineError;
pub use pipeline::{shutdown_channel, Pipeline};
pub use schedule::{run_sampler, run_transmitter};
pub use stats::{PipelineStats, StatsSnapshot};
pub use transmitter::{TickOutcome, Transmitter};

#[cfg(test)]
mod testing;
