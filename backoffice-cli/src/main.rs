//! Back-office console entry point
//!
//! Logs go to stderr so command output on stdout stays pipeable.

mod cli;
mod commands;
mod config;
mod render;
mod session_store;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use commands::Console;
use config::AppConfig;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    let console = Console::new(config)?;

    match cli.command {
        Command::Login { email, password } => console.login(&email, &password).await,
        Command::Logout => console.logout().await,
        Command::List(args) => console.list(&args).await,
        Command::Browse { resource } => console.browse(resource).await,
        Command::Show { resource, id } => console.show(resource, id).await,
        Command::Delete { resource, id } => console.delete(resource, id).await,
        Command::AddTerm { term } => console.add_term(&term).await,
        Command::Review {
            id,
            decision,
            reason,
        } => console.review(id, decision, reason.as_deref()).await,
        Command::SetVisible { id, visible } => console.set_visible(id, visible).await,
        Command::Save(form) => console.save(form).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
