use serde::Serialize;

/// Raw statvfs counters for one filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsStats {
    pub fragment_size:    u64,
    pub total_blocks:     u64,
    pub free_blocks:      u64,
    /// Free blocks available to unprivileged users.
    pub available_blocks: u64,
}

/// Derived byte counts for one tick. free + reserved + used == total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSample {
    pub free_bytes:     u64,
    pub reserved_bytes: u64,
    pub used_bytes:     u64,
}

impl UsageSample {
    pub fn from_stats(st: &FsStats) -> Self {
        let f = st.fragment_size;
        Self {
            free_bytes:     st.available_blocks.saturating_mul(f),
            // root took these
            reserved_bytes: st.free_blocks.saturating_sub(st.available_blocks).saturating_mul(f),
            used_bytes:     st.total_blocks.saturating_sub(st.free_blocks).saturating_mul(f),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.free_bytes + self.reserved_bytes + self.used_bytes
    }

    /// (type_instance, value) pairs in dispatch order.
    pub fn components(&self) -> [(&'static str, u64); 3] {
        [
            ("free",     self.free_bytes),
            ("reserved", self.reserved_bytes),
            ("used",     self.used_bytes),
        ]
    }
}
