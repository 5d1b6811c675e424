//! Destinations for dispatched metric values.
//!
//! The poller hands each mount point's free/reserved/used triple to a
//! [`MetricSink`] in a single call. Delivery and durability are the sink's
//! concern.

pub mod json;
pub mod memory;
pub mod putval;
pub mod unixsock;

use crate::error::SinkError;
use crate::models::metric::MetricValue;

pub use json::JsonLinesSink;
pub use memory::MemorySink;
pub use putval::PutvalSink;
pub use unixsock::UnixSockSink;

pub trait MetricSink {
    fn dispatch(&mut self, values: &[MetricValue]) -> Result<(), SinkError>;
}
