pub mod metric;
pub mod mount;
pub mod usage;
