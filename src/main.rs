use anyhow::{Context, Result};
use clap::Parser;
use dfpoll::collectors::{filesystem::Statvfs, mounts::DfLister};
use dfpoll::config::{Config, SinkKind};
use dfpoll::scheduler::Scheduler;
use dfpoll::sink::{JsonLinesSink, MemorySink, MetricSink, PutvalSink, UnixSockSink};
use dfpoll::util::report;
use dfpoll::{logging, Poller};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "dfpoll", about = "Report df free/reserved/used bytes to collectd", version)]
struct Cli {
    /// Config file (default: ~/.config/dfpoll/dfpoll.toml)
    #[arg(short, long, env = "DFPOLL_CONFIG")]
    config: Option<PathBuf>,

    /// Collection interval in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Filesystem type to poll
    #[arg(long)]
    fs_type: Option<String>,

    /// Where to send values
    #[arg(long, value_enum)]
    sink: Option<SinkKind>,

    /// collectd unixsock socket path (with --sink unixsock)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Run a single collection tick and exit
    #[arg(long)]
    once: bool,

    /// Print a one-shot JSON snapshot of all polled mounts and exit
    #[arg(long)]
    json: bool,

    /// Print a human-readable usage report and exit
    #[arg(long)]
    report: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = effective_config(&cli)?;

    if cli.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    logging::init_tracing(&cfg.general, cli.verbose)?;

    let mut poller = Poller::new(
        DfLister::new(cfg.mounts.df_command.clone()),
        Statvfs,
        cfg.poller_options(),
    );

    if cli.json || cli.report {
        return run_snapshot(&mut poller, cli.json);
    }

    let mut sink = build_sink(&cfg);
    let mut scheduler = Scheduler::new(Duration::from_secs(cfg.interval_secs()));
    if cli.once {
        scheduler = scheduler.max_ticks(1);
    }
    tracing::info!(sink = ?cfg.sink.kind, fs_type = %cfg.mounts.fs_type, "dfpoll starting");
    scheduler.run(&mut poller, sink.as_mut()).context("collection loop")?;
    Ok(())
}

fn effective_config(cli: &Cli) -> Result<Config> {
    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(n) = cli.interval { cfg.general.interval_secs = n; }
    if let Some(t) = &cli.fs_type { cfg.mounts.fs_type = t.clone(); }
    if let Some(k) = cli.sink     { cfg.sink.kind = k; }
    if let Some(p) = &cli.socket  { cfg.sink.socket_path = p.clone(); }
    Ok(cfg)
}

fn build_sink(cfg: &Config) -> Box<dyn MetricSink> {
    match cfg.sink.kind {
        SinkKind::Putval   => Box::new(PutvalSink::stdout()),
        SinkKind::Json     => Box::new(JsonLinesSink::new(std::io::stdout())),
        SinkKind::Unixsock => Box::new(UnixSockSink::new(cfg.sink.socket_path.clone())),
    }
}

fn run_snapshot(poller: &mut Poller<DfLister, Statvfs>, json: bool) -> Result<()> {
    poller.initialize().context("enumerating mounts")?;
    let mut sink = MemorySink::new();
    poller.collect_tick(&mut sink)?;

    let opts = poller.options();
    let rows = report::collect_usage(poller.entries().unwrap_or_default(), &sink);
    if json {
        let snapshot = report::snapshot_json(&opts.hostname, &opts.fs_type, &rows);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", report::generate(&opts.hostname, &opts.fs_type, &rows));
    }
    Ok(())
}
