//! The filesystem usage poller.
//!
//! A [`Poller`] snapshots the mounted filesystems of one type at
//! [`Poller::initialize`], then on every [`Poller::collect_tick`] reads live
//! statistics for each remembered mount point and hands its free, reserved and
//! used byte counts to a [`MetricSink`]. One failing mount point never affects
//! the others.

use crate::collectors::filesystem::StatSource;
use crate::collectors::mounts::MountLister;
use crate::error::PollerError;
use crate::models::metric::{MetricValue, PLUGIN, TYPE};
use crate::models::mount::{MountEntry, DEVICE_PREFIX};
use crate::models::usage::UsageSample;
use crate::sink::MetricSink;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};

/// Static settings the poller needs; built from the `[mounts]` and
/// `[general]` config sections.
#[derive(Debug, Clone)]
pub struct PollerOptions {
    pub fs_type:         String,
    pub device_prefix:   String,
    pub exclude_markers: Vec<String>,
    pub hostname:        String,
    pub interval_secs:   u64,
    /// Debug-log mount points skipped because their stats query failed.
    pub log_skipped:     bool,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            fs_type:         "ext4".into(),
            device_prefix:   DEVICE_PREFIX.into(),
            exclude_markers: vec!["devicemapper".into()],
            hostname:        "localhost".into(),
            interval_secs:   10,
            log_skipped:     false,
        }
    }
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Ready(Vec<MountEntry>),
}

/// What one tick did. Informational only; a tick never fails once ready.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub reported:    usize,
    pub excluded:    usize,
    pub stat_failed: usize,
    pub sink_failed: usize,
}

pub struct Poller<L, S> {
    lister: L,
    stats:  S,
    opts:   PollerOptions,
    state:  State,
}

impl<L: MountLister, S: StatSource> Poller<L, S> {
    pub fn new(lister: L, stats: S, opts: PollerOptions) -> Self {
        Self { lister, stats, opts, state: State::Uninitialized }
    }

    pub fn options(&self) -> &PollerOptions {
        &self.opts
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Remembered mount points, or `None` before initialization.
    pub fn entries(&self) -> Option<&[MountEntry]> {
        match &self.state {
            State::Ready(e)      => Some(e),
            State::Uninitialized => None,
        }
    }

    /// Enumerate mounts of the configured type and remember them.
    ///
    /// On error the poller stays uninitialized.
    pub fn initialize(&mut self) -> Result<&[MountEntry], PollerError> {
        let rows = self.lister.list(&self.opts.fs_type)?;
        let entries: Vec<MountEntry> = rows.into_iter().map(MountEntry::from).collect();

        let listing = entries.iter()
            .map(|e| format!("{} -> {}", e.device, e.mount_path))
            .collect::<Vec<_>>()
            .join(", ");
        info!(fs_type = %self.opts.fs_type, count = entries.len(), mounts = %listing,
            "df poller initialized");

        self.state = State::Ready(entries);
        Ok(self.entries().unwrap_or_default())
    }

    /// Query every remembered mount point once and dispatch its usage.
    ///
    /// Fails only with [`PollerError::NotInitialized`].
    pub fn collect_tick(&self, sink: &mut dyn MetricSink) -> Result<TickSummary, PollerError> {
        let entries = match &self.state {
            State::Ready(e)      => e,
            State::Uninitialized => return Err(PollerError::NotInitialized),
        };

        let mut summary = TickSummary::default();
        for entry in entries {
            if entry.is_excluded(&self.opts.device_prefix, &self.opts.exclude_markers) {
                summary.excluded += 1;
                continue;
            }

            // handles disk removal
            let st = match self.stats.stat(Path::new(&entry.mount_path)) {
                Ok(st) => st,
                Err(e) if e.is_unavailable() => {
                    if self.opts.log_skipped {
                        debug!(device = %entry.device, error = %e, "skipping mount");
                    }
                    summary.stat_failed += 1;
                    continue;
                }
                Err(e) => {
                    warn!(device = %entry.device, error = %e, "skipping mount");
                    summary.stat_failed += 1;
                    continue;
                }
            };

            let values = self.values_for(entry, &UsageSample::from_stats(&st));
            match sink.dispatch(&values) {
                Ok(())  => summary.reported += 1,
                Err(e)  => {
                    warn!(device = %entry.device, error = %e, "metric dispatch failed");
                    summary.sink_failed += 1;
                }
            }
        }
        Ok(summary)
    }

    fn values_for(&self, entry: &MountEntry, sample: &UsageSample) -> Vec<MetricValue> {
        let now = Utc::now();
        sample.components().into_iter().map(|(type_instance, value)| MetricValue {
            host:            self.opts.hostname.clone(),
            plugin:          PLUGIN,
            plugin_instance: entry.instance_name.clone(),
            type_:           TYPE,
            type_instance,
            time:            now,
            interval_secs:   self.opts.interval_secs,
            value,
        }).collect()
    }
}
