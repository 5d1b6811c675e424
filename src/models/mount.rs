use serde::Serialize;

/// The conventional device directory.
pub const DEVICE_PREFIX: &str = "/dev/";

/// One row returned by the mount lister, before it becomes a [`MountEntry`].
/// Sizes are in 1K blocks, as `df` reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRow {
    pub device:     String,
    pub mount_path: String,
    pub size_kib:   u64,
    pub used_kib:   u64,
    pub avail_kib:  u64,
}

/// One remembered filesystem to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountEntry {
    pub device:        String,
    pub mount_path:    String,
    pub instance_name: String,
}

impl MountEntry {
    pub fn new(device: impl Into<String>, mount_path: impl Into<String>) -> Self {
        let device = device.into();
        let instance_name = instance_name(&device, DEVICE_PREFIX);
        Self { device, mount_path: mount_path.into(), instance_name }
    }

    /// True when the entry is never queried: a non-device source, or a mount
    /// path carrying one of the virtualized-device markers.
    pub fn is_excluded(&self, device_prefix: &str, markers: &[String]) -> bool {
        !self.device.starts_with(device_prefix)
            || markers.iter().any(|m| !m.is_empty() && self.mount_path.contains(m.as_str()))
    }
}

impl From<MountRow> for MountEntry {
    fn from(row: MountRow) -> Self {
        MountEntry::new(row.device, row.mount_path)
    }
}

/// "sda1" from "/dev/sda1", "mapper_vg-root" from "/dev/mapper/vg-root".
pub fn instance_name(device: &str, prefix: &str) -> String {
    device.strip_prefix(prefix).unwrap_or(device).replace('/', "_")
}
