use crate::config::GeneralConfig;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Output goes to stderr; stdout is
/// reserved for the metric stream.
///
/// Filter precedence: `RUST_LOG`, then `verbose` (debug), then the configured level.
pub fn init_tracing(cfg: &GeneralConfig, verbose: bool) -> Result<()> {
    let default = if verbose { "debug".to_string() } else { cfg.log_level.clone() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let res = if cfg.log_format == "json" {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.try_init()
    };
    res.map_err(|e| anyhow::anyhow!("installing tracing subscriber: {}", e))
}
