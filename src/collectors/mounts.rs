use crate::error::MountListError;
use crate::models::mount::MountRow;
use std::process::Command;

/// Enumerates mounted filesystems of a given type.
pub trait MountLister {
    fn list(&self, fs_type: &str) -> Result<Vec<MountRow>, MountListError>;
}

/// Runs `df --type=<fs> --output=source,target,size,used,avail`.
#[derive(Debug, Clone)]
pub struct DfLister {
    command: String,
}

impl DfLister {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

impl Default for DfLister {
    fn default() -> Self {
        Self::new("df")
    }
}

impl MountLister for DfLister {
    fn list(&self, fs_type: &str) -> Result<Vec<MountRow>, MountListError> {
        let out = Command::new(&self.command)
            .arg(format!("--type={}", fs_type))
            .arg("--output=source,target,size,used,avail")
            .output()
            .map_err(|source| MountListError::Spawn { command: self.command.clone(), source })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            // df exits 1 when nothing of the requested type is mounted
            if stdout.trim().is_empty() && stderr.contains("no file systems processed") {
                tracing::warn!(fs_type, "no mounted filesystems of this type");
                return Ok(Vec::new());
            }
            return Err(MountListError::CommandFailed {
                command: self.command.clone(),
                status:  out.status.to_string(),
                stderr,
            });
        }
        parse_df_output(&stdout)
    }
}

/// Parse `df --output=source,target,size,used,avail` text.
///
/// The first line is dropped when it is a header. Mount paths containing
/// spaces are rejoined from the middle tokens.
pub fn parse_df_output(text: &str) -> Result<Vec<MountRow>, MountListError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();

    if lines.peek().is_some_and(|first| is_header(first)) {
        lines.next();
    }

    lines.map(parse_row).collect()
}

/// A header has all five columns and none of the three size columns is numeric.
fn is_header(line: &str) -> bool {
    let f: Vec<&str> = line.split_whitespace().collect();
    f.len() >= 5 && f[f.len() - 3..].iter().all(|s| s.parse::<u64>().is_err())
}

fn parse_row(line: &str) -> Result<MountRow, MountListError> {
    let malformed = |reason: &str| MountListError::Malformed {
        line:   line.to_string(),
        reason: reason.to_string(),
    };

    let f: Vec<&str> = line.split_whitespace().collect();
    if f.len() < 5 { return Err(malformed("expected 5 columns")); }

    let n = f.len();
    let num = |s: &str| s.parse::<u64>().map_err(|_| malformed("non-numeric size column"));

    Ok(MountRow {
        device:     f[0].to_string(),
        mount_path: f[1..n - 3].join(" "),
        size_kib:   num(f[n - 3])?,
        used_kib:   num(f[n - 2])?,
        avail_kib:  num(f[n - 1])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_label_header() {
        let rows = parse_df_output("source target size used avail\n/dev/sda1 /data 1000 200 600\n").unwrap();
        assert_eq!(rows, vec![MountRow {
            device: "/dev/sda1".into(), mount_path: "/data".into(),
            size_kib: 1000, used_kib: 200, avail_kib: 600,
        }]);
    }

    #[test]
    fn strips_real_df_header_and_keeps_order() {
        let text = "\
Filesystem     Mounted on      1K-blocks     Used    Avail
/dev/nvme0n1p2 /               490617784 31220412 434401412
/dev/sdb1      /srv/backups   1921802432 12042424 1812091160
";
        let rows = parse_df_output(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mount_path, "/");
        assert_eq!(rows[1].device, "/dev/sdb1");
    }

    #[test]
    fn mount_path_with_spaces() {
        let rows = parse_df_output("/dev/sdc1 /media/usb stick 100 10 90\n").unwrap();
        assert_eq!(rows[0].mount_path, "/media/usb stick");
    }

    #[test]
    fn headerless_output_keeps_first_row() {
        let rows = parse_df_output("/dev/sda1 /data 1000 200 600\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn empty_output_is_empty_list() {
        assert!(parse_df_output("").unwrap().is_empty());
        assert!(parse_df_output("Filesystem Mounted on 1K-blocks Used Avail\n").unwrap().is_empty());
    }

    #[test]
    fn short_row_is_malformed() {
        let err = parse_df_output("header a b c d\n/dev/sda1 /data 1000\n").unwrap_err();
        assert!(matches!(err, MountListError::Malformed { .. }));
    }

    #[test]
    fn non_numeric_row_after_header_is_malformed() {
        let err = parse_df_output("header a b c d\n/dev/sda1 /data big 200 600\n").unwrap_err();
        assert!(matches!(err, MountListError::Malformed { .. }));
    }

    #[test]
    fn truncated_first_row_is_malformed() {
        let err = parse_df_output("/dev/sda1 /data 1000\n/dev/sdb1 /b 1 1 1\n").unwrap_err();
        assert!(matches!(err, MountListError::Malformed { ref line, .. } if line.starts_with("/dev/sda1")));
    }

    #[test]
    fn partly_numeric_first_row_is_malformed() {
        let err = parse_df_output("/dev/sda1 /data 1000 x 600\n").unwrap_err();
        assert!(matches!(err, MountListError::Malformed { .. }));
    }

    /// Write an executable stand-in for df and run the lister against it.
    fn list_with_script(tag: &str, body: &str) -> Result<Vec<MountRow>, MountListError> {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(format!("dfpoll-df-{}-{}.sh", tag, std::process::id()));
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let lister = DfLister::new(path.to_string_lossy().into_owned());
        let mut res = lister.list("ext4");
        // another test thread may have forked while the script was open for writing
        for _ in 0..5 {
            match &res {
                Err(MountListError::Spawn { source, .. }) if source.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    res = lister.list("ext4");
                }
                _ => break,
            }
        }
        let _ = std::fs::remove_file(&path);
        res
    }

    #[test]
    fn nothing_mounted_is_empty_list() {
        let rows = list_with_script("none", "echo 'df: no file systems processed' >&2\nexit 1").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn other_failure_exit_is_command_failed() {
        let err = list_with_script("fail", "echo 'df: /data: Input/output error' >&2\nexit 2").unwrap_err();
        match err {
            MountListError::CommandFailed { stderr, status, .. } => {
                assert!(stderr.contains("Input/output error"));
                assert!(status.contains('2'), "{status}");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn successful_script_output_is_parsed() {
        let rows = list_with_script("ok", "echo 'Filesystem Mounted on 1K-blocks Used Avail'\necho '/dev/sda1 /data 1000 200 600'").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].device, "/dev/sda1");
    }

    #[test]
    fn missing_command_fails_to_spawn() {
        let err = DfLister::new("/nonexistent/dfpoll-df").list("ext4").unwrap_err();
        assert!(matches!(err, MountListError::Spawn { .. }));
    }
}
