use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use configs::{IngestConfig, LogFormat};
use dotenvy::dotenv;
use service::event::resolve_event_path;
use service::ingest::ingest_event;
use service::posts::repository::FilePostRepository;
use service::posts::service::{IngestPolicy, PostService};
use tracing::{error, info};
use uuid::Uuid;

/// Append the post carried in a GitHub issue event to the JSON post list.
#[derive(Debug, Parser)]
#[command(name = "ingest", version)]
struct Cli {
    /// TOML config file (defaults to $CONFIG_PATH, then ./ingest.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Event document; overrides the path taken from the environment
    #[arg(long)]
    event: Option<PathBuf>,
    /// Posts file; overrides store.path
    #[arg(long)]
    store: Option<PathBuf>,
    /// Log output format
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

/// Plain diagnostic on stdout, independent of the `RUST_LOG` filter.
fn report_failure(e: &dyn std::fmt::Display) {
    println!("Error: {e}");
}

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
    info!(service = "ingest", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // .env first so RUST_LOG, POSTS_PATH and friends apply
    dotenv().ok();
    let cli = Cli::parse();

    let config = IngestConfig::load_and_validate(cli.config.as_deref());
    let format = cli
        .log_format
        .or_else(|| config.as_ref().ok().map(|c| c.logging.format))
        .unwrap_or_default();
    init_logging(format);

    let mut config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "ingest", event = "config_invalid", error = %e, "failed to load configuration");
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    let run_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "ingest", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let event_path = match resolve_event_path(cli.event, &config.event.path_env, |var| std::env::var(var).ok()) {
        Ok(path) => path,
        Err(e) => {
            error!(service = "ingest", event = "no_event", code = e.code(), error = %e, "no event document");
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "ingest",
        event = "start",
        %run_id,
        version = env!("CARGO_PKG_VERSION"),
        event_path = %event_path.display(),
        store = %config.store.path.display(),
        enforce_trip_key = config.auth.enforce_trip_key,
        "ingest starting"
    );

    // one-shot; a single-threaded runtime is enough for the file I/O
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "ingest", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    let repo = Arc::new(FilePostRepository::new(config.store.path.clone()));
    let svc = PostService::new(repo, IngestPolicy { enforce_trip_key: config.auth.enforce_trip_key });

    match rt.block_on(ingest_event(&svc, &event_path)) {
        Ok(post) => {
            info!(service = "ingest", event = "stop", %run_id, post_id = %post.id, "post stored");
            println!("Successfully processed post.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "ingest", event = "rejected", %run_id, code = e.code(), error = %e, "ingest rejected");
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}
