//! clipgate CLI entry point

use std::process::ExitCode;

use clap::Parser;

use clipgate::cli::{
    app::{load_merged_config, run_formats, run_get, run_text, run_watch},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    finish,
    logging::setup_tracing,
    presenter::Presenter,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use clipgate::domain::config::{AppConfig, GateConfig};
use clipgate::domain::timing::Duration;
use clipgate::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);
    let presenter = Presenter::new();

    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    // Validate retry flags before touching the clipboard
    for (flag, value) in [
        ("--retry-deadline", &cli.retry_deadline),
        ("--retry-interval", &cli.retry_interval),
    ] {
        if let Some(Err(e)) = value.as_ref().map(|s| s.parse::<Duration>()) {
            presenter.error(&format!("Invalid {}: {}", flag, e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    let cli_config = AppConfig {
        gate: (cli.retry_deadline.is_some() || cli.retry_interval.is_some()).then(|| GateConfig {
            retry_interval: cli.retry_interval.clone(),
            retry_deadline: cli.retry_deadline.clone(),
            backoff: None,
        }),
        catalog: None,
    };
    let config = load_merged_config(cli_config).await;
    tracing::debug!(policy = ?config.retry_policy(), "Effective configuration");

    let result = match command {
        Commands::Formats { json } => run_formats(&config, json, &presenter).await,
        Commands::Get {
            format,
            base64,
            allow_stale,
        } => run_get(&config, format, base64, allow_stale, &presenter).await,
        Commands::Text { action } => run_text(&config, action, &presenter).await,
        Commands::Watch { count } => run_watch(&config, count, &presenter).await,
        Commands::Config { .. } => return ExitCode::SUCCESS,
    };

    finish(result, &presenter)
}
