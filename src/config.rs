use crate::models::mount::DEVICE_PREFIX;
use crate::poller::PollerOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub mounts: MountsConfig,

    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Collection tick interval in seconds
    pub interval_secs: u64,
    /// Host part of the metric identifier. Empty = system hostname.
    pub hostname: String,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// "text" or "json"
    pub log_format: String,
    /// Debug-log mount points skipped because their stats query failed
    pub log_skipped_mounts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountsConfig {
    /// Filesystem type passed to `df --type`
    pub fs_type: String,
    /// Sources not under this prefix are never polled
    pub device_prefix: String,
    /// Mount paths containing any of these are never polled
    pub exclude_markers: Vec<String>,
    /// df binary to run
    pub df_command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// PUTVAL lines on stdout (collectd exec plugin)
    Putval,
    /// PUTVAL over the collectd unixsock socket
    Unixsock,
    /// JSON lines on stdout
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,
    /// collectd unixsock plugin socket (used with kind = "unixsock")
    pub socket_path: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_secs:      10,
            hostname:           String::new(),
            log_level:          "info".into(),
            log_format:         "text".into(),
            log_skipped_mounts: false,
        }
    }
}

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            fs_type:         "ext4".into(),
            device_prefix:   DEVICE_PREFIX.into(),
            exclude_markers: vec!["devicemapper".into()],
            df_command:      "df".into(),
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind:        SinkKind::Putval,
            socket_path: PathBuf::from("/var/run/collectd-unixsock"),
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load from `explicit` (the CLI flag or `$DFPOLL_CONFIG`), else the
    /// per-user config file. Only the per-user default may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_file(p);
        }
        match Self::config_path() {
            Some(p) if p.exists() => Self::from_file(&p),
            _                     => Ok(Config::default()),
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dfpoll").join("dfpoll.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn interval_secs(&self) -> u64 {
        self.general.interval_secs.max(1)
    }

    /// Configured hostname, else the system one, else "localhost".
    pub fn resolved_hostname(&self) -> String {
        if !self.general.hostname.is_empty() {
            return self.general.hostname.clone();
        }
        nix::unistd::gethostname()
            .ok()
            .and_then(|h| h.into_string().ok())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string())
    }

    pub fn poller_options(&self) -> PollerOptions {
        PollerOptions {
            fs_type:         self.mounts.fs_type.clone(),
            device_prefix:   self.mounts.device_prefix.clone(),
            exclude_markers: self.mounts.exclude_markers.clone(),
            hostname:        self.resolved_hostname(),
            interval_secs:   self.interval_secs(),
            log_skipped:     self.general.log_skipped_mounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::parse(r#"
            [general]
            interval_secs = 30

            [sink]
            kind = "unixsock"
        "#).unwrap();
        assert_eq!(cfg.general.interval_secs, 30);
        assert_eq!(cfg.general.log_level, "info");
        assert_eq!(cfg.mounts.fs_type, "ext4");
        assert_eq!(cfg.sink.kind, SinkKind::Unixsock);
        assert_eq!(cfg.sink.socket_path, PathBuf::from("/var/run/collectd-unixsock"));
    }

    #[test]
    fn unknown_sink_kind_is_an_error() {
        assert!(Config::parse("[sink]\nkind = \"graphite\"\n").is_err());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = Config::parse("[general]\ninterval_secs = 0\n").unwrap();
        assert_eq!(cfg.interval_secs(), 1);
    }

    #[test]
    fn explicit_hostname_wins() {
        let cfg = Config::parse("[general]\nhostname = \"box\"\n").unwrap();
        assert_eq!(cfg.poller_options().hostname, "box");
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn env_var_is_left_to_the_cli() {
        std::env::set_var("DFPOLL_CONFIG", "/nonexistent/dfpoll-env.toml");
        let res = Config::load(None);
        std::env::remove_var("DFPOLL_CONFIG");
        assert!(res.is_ok(), "{res:?}");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/dfpoll.toml"))).is_err());
    }
}
