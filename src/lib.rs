//! Polls filesystem usage of mounted volumes of one type and reports
//! free/reserved/used bytes per device to a metrics sink (collectd by default).

pub mod collectors;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod poller;
pub mod scheduler;
pub mod sink;
pub mod util;

pub use error::{MountListError, PollerError, SinkError, StatError};
pub use poller::{Poller, PollerOptions, TickSummary};
