// ABOUTME: Development seeding tool creating one demo credential per role
// ABOUTME: Stands in for the external member-registration flow
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Flock Contributors

//! # Demo User Seeder
//!
//! Creates one demo account per role so the auth endpoints can be exercised
//! locally. Credential creation belongs to member-registration flows outside
//! the auth core; this binary plays that part for development.

use anyhow::Result;
use clap::Parser;
use flock_server::{
    database_plugins::{factory::Database, DatabaseProvider},
    models::User,
    permissions::Role,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "seed-demo-users")]
#[command(about = "Seed demo users for local development")]
struct Args {
    /// Database URL
    #[arg(long, default_value = "sqlite:./data/flock.db")]
    database_url: String,

    /// Passkey assigned to every demo account
    #[arg(long, default_value = "changeme!")]
    password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().compact().init();

    let args = Args::parse();
    let database = Database::new(&args.database_url).await?;

    let demo_accounts = [
        ("admin@flock.church", "Flock Admin", Role::Admin),
        ("pastor1@flock.church", "Pastor One", Role::Pastor),
        ("treasurer1@flock.church", "Treasurer One", Role::Treasurer),
        ("secretary1@flock.church", "Secretary One", Role::Secretary),
        ("member1@flock.church", "Member One", Role::Member),
    ];

    let password_hash = bcrypt::hash(&args.password, bcrypt::DEFAULT_COST)?;

    for (email, display_name, role) in demo_accounts {
        if database.get_user_by_email(email).await?.is_some() {
            info!("{email} already exists, skipping");
            continue;
        }

        let user = User::new(
            email.into(),
            password_hash.clone(),
            Some(display_name.into()),
            role,
        );
        let user_id = database.create_user(&user).await?;
        info!("created {role} account {email} ({user_id})");
    }

    info!("seeded {} users total", database.get_user_count().await?);

    Ok(())
}
