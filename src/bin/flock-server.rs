// ABOUTME: Production server binary wiring config, database, and HTTP serving
// ABOUTME: Entry point for running the Flock REST backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Flock Server Binary
//!
//! Starts the REST backend with token-based authentication and the
//! refresh-token ledger backed by the configured database.

use anyhow::Result;
use clap::Parser;
use flock_server::{
    config::environment::ServerConfig,
    database_plugins::{factory::Database, DatabaseProvider},
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "flock-server")]
#[command(about = "Flock - REST backend for church management")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Flock server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", database.backend_info());

    let resources = Arc::new(ServerResources::new(database, config)?);

    server::run(resources).await?;

    Ok(())
}
