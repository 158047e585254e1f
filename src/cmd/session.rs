//! Login, logout, and identity commands.
//!
//! The backend has no token scheme: "logging in" is looking the username up
//! and storing the returned record locally. Credentials are never persisted.

use anyhow::Result;

use sprintdeck::errors::ApiError;
use sprintdeck::session::{self, Session};

use crate::Cli;

pub async fn cmd_login(cli: &Cli, username: Option<&str>) -> Result<()> {
    let username = match username {
        Some(name) => name.to_string(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };

    let client = super::build_client(cli)?;
    let bar = super::spinner("Looking up user...");
    let user = match client.get_user_by_username(&username).await {
        Ok(user) => user,
        Err(ApiError::Status { status: 404, .. }) => {
            bar.finish_and_clear();
            anyhow::bail!("No user named '{}' on {}", username, client.base_url());
        }
        Err(e) => {
            bar.finish_and_clear();
            return Err(e.into());
        }
    };
    bar.finish_and_clear();

    let session = Session::for_user(&user);
    session::save(&session)?;

    println!(
        "{} Logged in as {} ({})",
        console::style("✓").green().bold(),
        console::style(session.label()).bold(),
        user.role
    );
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    session::clear()?;
    println!("Logged out.");
    Ok(())
}

pub async fn cmd_users(cli: &Cli) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Loading users...");
    let outcome = client.list_users().await;
    bar.finish_and_clear();
    let users = outcome?;

    println!();
    println!("{}", console::style("Team").bold().cyan());
    for user in &users {
        println!(
            "  {:>5}  {:<20} {}",
            console::style(user.id).bold(),
            user.label(),
            console::style(format!("@{} · {}", user.username, user.role)).dim()
        );
    }
    Ok(())
}

pub fn cmd_whoami() -> Result<()> {
    match session::load()? {
        Some(session) => {
            println!(
                "{} (@{}) — {}",
                console::style(session.label()).bold(),
                session.username,
                session.role
            );
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
