//! Routewise CLI: one-shot routing, catalog listing, and classification.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "Allow for tests"
    )
)]

use anyhow::Result;
use clap::Parser as _;
use cli::{Cli, Commands};
use handlers::RouteArgs;
use std::io;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routewise_routing=info,routewise_cli=info".into()),
        )
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Route {
            input,
            priority,
            preferred,
            avoided,
            json,
        } => {
            let config = handlers::load_config(cli.config.as_deref())?;
            let args = RouteArgs {
                input,
                priority,
                preferred,
                avoided,
                json,
            };
            handlers::handle_route(&config, args).await?;
        }
        Commands::Models { category } => {
            let config = handlers::load_config(cli.config.as_deref())?;
            handlers::handle_models(&config, category)?;
        }
        Commands::Classify { input } => handlers::handle_classify(&input),
    }

    Ok(())
}
