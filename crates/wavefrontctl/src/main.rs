//! wavefrontctl - manage Wavefront users from the command line.

mod cli;
mod config;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use wavefront_api::{NewUserRequest, User, UserGroups, Users, WavefrontClient, permissions};

use crate::cli::{Cli, Command, CommonOpts, UsersCommand, search_conditions};
use crate::config::{AppConfig, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.common.config.as_deref())?;
    apply_overrides(&mut config, &cli.common);
    init_logging(&cli.common, &config.logging);
    debug!(address = %config.api.address, "configuration loaded");

    match cli.command {
        Command::Permissions => {
            for token in permissions::ALL {
                println!("{token}");
            }
            Ok(())
        }
        Command::Users(command) => {
            let client =
                WavefrontClient::new(&config.api).context("creating Wavefront client")?;
            run_users(client.users(), command).await
        }
    }
}

async fn run_users(users: Users, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { filters, matching } => {
            let conditions = search_conditions(&filters, matching);
            let found = users.find(&conditions).await.context("searching users")?;
            info!(count = found.len(), "users found");
            print_json(&found)
        }
        UsersCommand::Get { id } => {
            let mut user = User::with_id(id);
            users
                .get(&mut user)
                .await
                .with_context(|| format!("fetching user {}", user.id))?;
            print_json(&user)
        }
        UsersCommand::Create {
            email,
            permissions,
            groups,
            send_email,
        } => {
            let request = NewUserRequest {
                email_address: email,
                permissions,
                groups: UserGroups::from_ids(groups),
            };
            let user = users
                .create(&request, send_email)
                .await
                .with_context(|| format!("creating user {}", request.email_address))?;
            info!(id = %user.id, "user created");
            print_json(&user)
        }
        UsersCommand::Update {
            id,
            permissions,
            groups,
            credential,
        } => {
            let mut user = User::with_id(id.clone());
            users
                .get(&mut user)
                .await
                .with_context(|| format!("fetching user {id}"))?;

            if !permissions.is_empty() {
                user.permissions = permissions;
            }
            if !groups.is_empty() {
                user.groups = UserGroups::from_ids(groups);
            }
            user.credential = credential;

            users
                .update(&mut user)
                .await
                .with_context(|| format!("updating user {id}"))?;
            print_json(&user)
        }
        UsersCommand::Delete { id } => {
            let mut user = User::with_id(id.clone());
            users
                .delete(&mut user)
                .await
                .with_context(|| format!("deleting user {id}"))?;
            println!("Deleted user {id}");
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut AppConfig, common: &CommonOpts) {
    if let Some(address) = &common.address {
        config.api.address = address.clone();
    }
    if let Some(token) = &common.token {
        config.api.token = token.clone();
    }
}

fn init_logging(common: &CommonOpts, logging: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if common.quiet {
        "error"
    } else {
        match common.verbose {
            0 => logging.level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wavefrontctl={level},wavefront_api={level}")));

    if common.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal()),
            )
            .try_init()
            .ok();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
