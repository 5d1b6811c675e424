use crate::models::mount::MountEntry;
use crate::models::usage::UsageSample;
use crate::sink::MemorySink;
use crate::util::human::fmt_bytes;
use serde_json::{json, Value};

/// One remembered mount and what a single tick reported for it.
/// `usage` is None when the mount was excluded or its stats query failed.
#[derive(Debug, Clone)]
pub struct MountUsage {
    pub entry: MountEntry,
    pub usage: Option<UsageSample>,
}

/// Pair each entry with the free/reserved/used values one tick sent to `sink`.
pub fn collect_usage(entries: &[MountEntry], sink: &MemorySink) -> Vec<MountUsage> {
    entries.iter().map(|e| {
        let name = e.instance_name.as_str();
        let usage = match (sink.get(name, "free"), sink.get(name, "reserved"), sink.get(name, "used")) {
            (Some(free_bytes), Some(reserved_bytes), Some(used_bytes)) => {
                Some(UsageSample { free_bytes, reserved_bytes, used_bytes })
            }
            _ => None,
        };
        MountUsage { entry: e.clone(), usage }
    }).collect()
}

/// Generate a human-readable usage table.
pub fn generate(host: &str, fs_type: &str, rows: &[MountUsage]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str(&format!("dfpoll report for {} ({}) at {}\n\n", host, fs_type, now));
    out.push_str(&format!(
        "  {:<16} {:<20} {:>10} {:>10} {:>10} {:>10}\n",
        "Instance", "Mount", "Total", "Free", "Reserved", "Used"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(81)));
    for r in rows {
        match &r.usage {
            Some(u) => out.push_str(&format!(
                "  {:<16} {:<20} {:>10} {:>10} {:>10} {:>10}\n",
                r.entry.instance_name, r.entry.mount_path,
                fmt_bytes(u.total_bytes()), fmt_bytes(u.free_bytes),
                fmt_bytes(u.reserved_bytes), fmt_bytes(u.used_bytes),
            )),
            None => out.push_str(&format!(
                "  {:<16} {:<20} {:>10}\n",
                r.entry.instance_name, r.entry.mount_path, "(skipped)"
            )),
        }
    }
    if rows.is_empty() {
        out.push_str("  (no mounted filesystems)\n");
    }
    out
}

/// One-shot JSON snapshot of every remembered mount.
pub fn snapshot_json(host: &str, fs_type: &str, rows: &[MountUsage]) -> Value {
    let mounts: Vec<Value> = rows.iter().map(|r| {
        json!({
            "device":        r.entry.device,
            "mountpoint":    r.entry.mount_path,
            "instance":      r.entry.instance_name,
            "free":          r.usage.map(|u| u.free_bytes),
            "reserved":      r.usage.map(|u| u.reserved_bytes),
            "used":          r.usage.map(|u| u.used_bytes),
            "total_hr":      r.usage.map(|u| fmt_bytes(u.total_bytes())),
        })
    }).collect();

    json!({
        "dfpoll_version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Local::now().to_rfc3339(),
        "host":      host,
        "fs_type":   fs_type,
        "mounts":    mounts,
    })
}
