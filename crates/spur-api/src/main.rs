//! Spur CLI and REST API entry point.
//!
//! Binary name: `spur`
//!
//! Parses CLI arguments, loads configuration, initializes the database and
//! services, then dispatches to a command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use spur_infra::config::load_config;
use spur_infra::sqlite::DatabasePool;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, Commands::Serve { .. });
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if serving => "info",
        0 => "warn",
        1 => "info,spur=debug",
        _ => "trace",
    };
    spur_observe::init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need config or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "spur", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config).await;

    let result = match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(config, cli.quiet).await
        }

        Commands::Migrate => {
            let pool = DatabasePool::new(&config.database.url).await?;
            pool.close().await;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "migrated": true, "database": config.database.url })
                );
            } else if !cli.quiet {
                println!(
                    "  {} Database ready at {}",
                    console::style("✓").green().bold(),
                    console::style(&config.database.url).cyan()
                );
            }
            Ok(())
        }

        Commands::Ask { message, session } => {
            let state = AppState::init(config).await?;
            let outcome =
                cli::ask::ask(&state, &message, session.as_deref(), cli.json, cli.quiet).await;
            state.db_pool.close().await;
            outcome
        }

        Commands::History { session_id } => {
            let pool = DatabasePool::new(&config.database.url).await?;
            let outcome = cli::history::show_history(&pool, &session_id, cli.json).await;
            pool.close().await;
            outcome
        }

        Commands::Completions { .. } => Ok(()),
    };

    spur_observe::shutdown_tracing();
    result
}

async fn serve(config: spur_types::config::AppConfig, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::init(config).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} Spur support API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }
    let model = state.conversations.generator().current_model().await;
    tracing::info!(
        %addr,
        %model,
        database = %state.config.database.url,
        "Server started"
    );

    let router = http::router::build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db_pool.close().await;
    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
