//! hoststatd - Host telemetry sampler.
//!
//! Samples CPU, memory, disk, network and latency every 30 seconds of wall
//! clock and writes them to the dashboard's MariaDB tables.

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use hoststat_core::collector::{HostCollector, HostConfig, LatencyTargets, RealFs};
use hoststat_core::readiness::readiness;
use hoststat_core::scheduler::{Scheduler, TickPeriod};
use hoststat_core::storage::Store;

/// Host telemetry sampler.
#[derive(Parser)]
#[command(name = "hoststatd", about = "Host telemetry sampler", version)]
struct Args {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Maximum pooled database connections.
    #[arg(long, default_value = "10")]
    max_connections: u32,

    /// Tick period in seconds. Must divide 60.
    #[arg(long, default_value = "30", value_parser = parse_period)]
    interval: TickPeriod,

    /// Network interface whose traffic is reported.
    #[arg(long, default_value = "eth0")]
    interface: String,

    /// Mount point of the volume whose space is reported.
    #[arg(long, default_value = "/")]
    volume: PathBuf,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    #[arg(long, default_value = "8.8.8.8")]
    ping_google: String,

    #[arg(long, default_value = "1.1.1.1")]
    ping_cloudflare: String,

    #[arg(long, default_value = "discord.com")]
    ping_discord: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// MariaDB connection settings.
#[derive(ClapArgs)]
struct DatabaseArgs {
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "DB_USER", required_unless_present = "database_url")]
    db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    db_password: String,

    #[arg(long, env = "DB_DATABASE", required_unless_present = "database_url")]
    db_database: Option<String>,

    #[arg(long, env = "DB_PORT", default_value = "3306")]
    db_port: u16,

    /// Full connection URL; overrides the DB_* settings.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
}

/// Rejected database settings.
#[derive(Debug)]
enum ConfigError {
    Url(url::ParseError),
    /// The host does not accept credentials (e.g. `unix:` style URLs).
    Credentials,
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Url(e) => write!(f, "invalid database URL: {}", e),
            ConfigError::Credentials => write!(f, "database URL cannot carry credentials"),
            ConfigError::Missing(name) => write!(f, "{} is required", name),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<url::ParseError> for ConfigError {
    fn from(e: url::ParseError) -> Self {
        ConfigError::Url(e)
    }
}

impl DatabaseArgs {
    /// Connection URL with user and password percent-encoded.
    fn url(&self) -> Result<Url, ConfigError> {
        if let Some(ref url) = self.database_url {
            return Ok(Url::parse(url)?);
        }

        let user = self.db_user.as_deref().ok_or(ConfigError::Missing("DB_USER"))?;
        let database = self
            .db_database
            .as_deref()
            .ok_or(ConfigError::Missing("DB_DATABASE"))?;

        let mut url = Url::parse(&format!("mysql://{}:{}", self.db_host, self.db_port))?;
        url.set_username(user)
            .map_err(|()| ConfigError::Credentials)?;
        if !self.db_password.is_empty() {
            url.set_password(Some(&self.db_password))
                .map_err(|()| ConfigError::Credentials)?;
        }
        url.set_path(database);
        Ok(url)
    }
}

fn parse_period(s: &str) -> Result<TickPeriod, String> {
    let secs = s
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid interval '{}': {}", s, e))?;
    TickPeriod::from_secs(secs)
}

/// The URL as safe to log: no password.
fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() {
        let _ = shown.set_password(Some("***"));
    }
    shown.to_string()
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["hoststatd", "hoststat_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!("hoststatd {} starting", env!("CARGO_PKG_VERSION"));

    let url = match args.database.url() {
        Ok(url) => url,
        Err(e) => {
            error!("Invalid database configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!(
        "Config: interval={}s, interface={}, volume={}, proc={}, database={}",
        args.interval.as_secs(),
        args.interface,
        args.volume.display(),
        args.proc_path,
        redacted(&url)
    );

    let store = match Store::connect_lazy(url.as_str(), args.max_connections) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create connection pool: {}", e);
            std::process::exit(1);
        }
    };

    let collector = HostCollector::new(
        RealFs::new(),
        HostConfig {
            proc_path: args.proc_path,
            interface: args.interface,
            volume_mount: args.volume,
            latency_targets: LatencyTargets {
                google: args.ping_google,
                cloudflare: args.ping_cloudflare,
                discord: args.ping_discord,
            },
        },
    );

    // Ticks before this finishes are no-ops.
    let (signal, gate) = readiness();
    let init_store = store.clone();
    tokio::spawn(async move {
        if let Err(e) = init_store.initialize().await {
            error!(error = %e, "failed to initialize database");
            std::process::exit(1);
        }
        match init_store.series_len().await {
            Ok(rows) => info!(series_rows = rows, "database tables ready"),
            Err(e) => info!(error = %e, "database tables ready, row count unavailable"),
        }
        signal.mark_ready();
    });

    let scheduler = Scheduler::new(collector, store, gate, args.interval);

    tokio::select! {
        _ = scheduler.run() => {}
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        }
    }

    info!("Shutting down...");
}
