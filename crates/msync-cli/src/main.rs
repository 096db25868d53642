use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "msync")]
#[command(about = "Marketplace catalog sync console", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> env -> local)
    #[arg(long = "config", global = true, default_value = "config/base.yaml")]
    config_paths: Vec<String>,

    /// Refuse config leaf keys nothing consumes (default: warn)
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the canonical catalog to every bound marketplace
    Sync,

    /// Pause or resume the store on every bound marketplace
    Pause {
        #[arg(value_enum)]
        state: PauseState,

        /// Shown to customers where the marketplace supports it
        #[arg(long)]
        reason: Option<String>,

        /// Automatic resume time, RFC 3339 (e.g. 2026-05-01T18:00:00Z)
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },

    /// Set the same opening hours for every day of the week
    Hours {
        /// Opening time, HH:MM
        #[arg(value_parser = parse_hhmm)]
        open: NaiveTime,

        /// Closing time, HH:MM
        #[arg(value_parser = parse_hhmm)]
        close: NaiveTime,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Audit trail utilities
    Audit {
        #[command(subcommand)]
        cmd: AuditCmd,
    },

    /// Print the taxonomy entry for an error code (e.g. AUTH_INVALID)
    Explain { code: String },
}

#[derive(Subcommand)]
enum AuditCmd {
    /// Verify the hash chain of an audit log
    Verify {
        /// Audit JSONL file
        path: String,
    },

    /// Print the most recent audit records (oldest first)
    Tail {
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Audit JSONL file (default: paths.audit_log from config)
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PauseState {
    Pause,
    Resume,
}

fn parse_hhmm(raw: &str) -> std::result::Result<NaiveTime, String> {
    msync_schemas::hhmm::parse(raw).map_err(|e| format!("expected HH:MM ({e})"))
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    // Production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let config = commands::ConfigArgs {
        paths: cli.config_paths,
        strict: cli.strict_config,
    };

    match cli.cmd {
        Commands::Sync => commands::sync::run_sync(&config)?,

        Commands::Pause {
            state,
            reason,
            until,
        } => {
            let paused = matches!(state, PauseState::Pause);
            commands::sync::run_pause(&config, paused, reason, until)?
        }

        Commands::Hours { open, close } => commands::sync::run_hours(&config, open, close)?,

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = msync_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Audit { cmd } => match cmd {
            AuditCmd::Verify { path } => commands::audit::run_verify(&path)?,
            AuditCmd::Tail { limit, path } => commands::audit::run_tail(&config, path, limit)?,
        },

        Commands::Explain { code } => commands::explain(&code)?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
