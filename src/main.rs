use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use restcheck::runner::{self, TestStatus};
use restcheck::utils::config::Config;

#[derive(Parser)]
#[command(name = "restcheck")]
#[command(version = "0.1.0")]
#[command(about = "End-to-end smoke test runner for RESTful APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a test plan file, or the built-in plan when omitted
    Run {
        /// Path to a YAML test plan
        plan: Option<PathBuf>,

        /// Connectivity probe endpoint
        #[arg(long)]
        probe_url: Option<String>,

        /// Per-step request timeout in milliseconds
        #[arg(long)]
        request_timeout_ms: Option<u64>,

        /// Keep executing steps even when the connectivity probe fails
        #[arg(long, default_value = "false")]
        keep_going_on_abort: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logger is built explicitly here; RUST_LOG overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let (plan_path, probe_url, request_timeout_ms, keep_going) = match cli.command {
        Some(Commands::Run {
            plan,
            probe_url,
            request_timeout_ms,
            keep_going_on_abort,
        }) => (plan, probe_url, request_timeout_ms, keep_going_on_abort),
        // No subcommand: run the built-in plan with defaults.
        None => (None, None, None, false),
    };

    let mut config = Config::default();
    if let Some(url) = probe_url {
        config.probe_url = url;
    }
    if let Some(ms) = request_timeout_ms {
        config.request_timeout_ms = ms;
    }
    config.halt_on_abort = !keep_going;

    match runner::run_plan(plan_path.as_deref(), config).await {
        Ok(TestStatus::Pass | TestStatus::Running) => ExitCode::SUCCESS,
        Ok(TestStatus::Fail) => ExitCode::from(1),
        Ok(TestStatus::Abort) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
