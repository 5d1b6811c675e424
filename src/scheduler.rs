use crate::collectors::filesystem::StatSource;
use crate::collectors::mounts::MountLister;
use crate::error::PollerError;
use crate::poller::Poller;
use crate::sink::MetricSink;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Drives a poller: one initialization, then serialized ticks at a fixed interval.
pub struct Scheduler {
    interval:  Duration,
    max_ticks: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, max_ticks: None }
    }

    /// Stop after `n` ticks instead of running forever.
    pub fn max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = Some(n);
        self
    }

    /// Initialize the poller (fatal on error) and tick until `max_ticks`.
    /// Returns the number of ticks run.
    pub fn run<L, S>(&self, poller: &mut Poller<L, S>, sink: &mut dyn MetricSink) -> Result<u64, PollerError>
    where
        L: MountLister,
        S: StatSource,
    {
        if !poller.is_ready() {
            poller.initialize()?;
        }
        info!(interval_secs = self.interval.as_secs(), max_ticks = ?self.max_ticks, "collection loop starting");

        let mut ticks = 0u64;
        loop {
            let started = Instant::now();
            let summary = poller.collect_tick(sink)?;
            ticks += 1;
            debug!(tick = ticks, reported = summary.reported, excluded = summary.excluded,
                stat_failed = summary.stat_failed, sink_failed = summary.sink_failed, "tick done");

            if self.max_ticks.is_some_and(|max| ticks >= max) {
                return Ok(ticks);
            }
            // next deadline is measured from tick start so slow ticks don't drift
            std::thread::sleep(self.interval.saturating_sub(started.elapsed()));
        }
    }
}
