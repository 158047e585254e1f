//! Sprint commands — `sprintdeck sprint`.

use anyhow::Result;
use console::style;

use sprintdeck::model::NewSprint;

use crate::{Cli, SprintCommands};

pub async fn cmd_sprint(cli: &Cli, command: &SprintCommands) -> Result<()> {
    match command {
        SprintCommands::List => cmd_sprint_list(cli).await,
        SprintCommands::Add {
            name,
            description,
            start,
            weeks,
        } => cmd_sprint_add(cli, name, description.as_deref(), *start, *weeks).await,
    }
}

async fn cmd_sprint_list(cli: &Cli) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Loading sprints...");
    let outcome = client.list_sprints().await;
    bar.finish_and_clear();
    let sprints = outcome?;

    if sprints.is_empty() {
        println!("No sprints yet. Create one with 'sprintdeck sprint add <name>'.");
        return Ok(());
    }

    println!();
    println!("{}", style("Sprints").bold().cyan());
    for sprint in &sprints {
        println!(
            "  {:>5}  {}  {}",
            style(sprint.id).bold(),
            sprint.name,
            style(format!("{} → {}", sprint.start_date, sprint.end_date)).dim()
        );
        if let Some(description) = &sprint.description {
            if !description.is_empty() {
                println!("         {}", style(description).dim());
            }
        }
    }
    Ok(())
}

async fn cmd_sprint_add(
    cli: &Cli,
    name: &str,
    description: Option<&str>,
    start: Option<chrono::NaiveDate>,
    weeks: u32,
) -> Result<()> {
    let session = super::require_session()?;
    let client = super::build_client(cli)?;

    let start = start.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let sprint = NewSprint::spanning_weeks(
        name.to_string(),
        description.map(str::to_string),
        start,
        weeks,
        Some(session.user_id),
    );

    let bar = super::spinner("Creating sprint...");
    let outcome = client.create_sprint(&sprint).await;
    bar.finish_and_clear();
    let created = outcome?;

    println!(
        "{} Created sprint {} — {} ({} → {})",
        style("✓").green().bold(),
        style(created.id).bold(),
        created.name,
        created.start_date,
        created.end_date
    );
    Ok(())
}
