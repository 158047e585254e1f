//! GitHub branch commands — `sprintdeck branch`.

use anyhow::Result;
use console::style;

use sprintdeck::api::github::branch_name_for_task;
use sprintdeck::config::AppConfig;
use sprintdeck::model::BranchRequest;

use crate::{BranchCommands, Cli};

pub async fn cmd_branch(cli: &Cli, command: &BranchCommands) -> Result<()> {
    match command {
        BranchCommands::List { owner, repo } => {
            cmd_branch_list(cli, owner.as_deref(), repo.as_deref()).await
        }
        BranchCommands::Create {
            task,
            owner,
            repo,
            base,
        } => cmd_branch_create(cli, *task, owner.as_deref(), repo.as_deref(), base).await,
    }
}

async fn cmd_branch_list(cli: &Cli, owner: Option<&str>, repo: Option<&str>) -> Result<()> {
    super::require_session()?;
    let config = AppConfig::load()?;
    let owner = config.github_owner(owner)?;
    let repo = config.github_repo(repo)?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Listing branches...");
    let outcome = client.list_branches(&owner, &repo).await;
    bar.finish_and_clear();
    let branches = outcome?;

    println!();
    println!(
        "{} {}",
        style(format!("{owner}/{repo}")).bold().cyan(),
        style(format!("({} branches)", branches.len())).dim()
    );
    for branch in &branches {
        println!("  {}", branch.name);
    }
    Ok(())
}

async fn cmd_branch_create(
    cli: &Cli,
    task_id: i32,
    owner: Option<&str>,
    repo: Option<&str>,
    base: &str,
) -> Result<()> {
    super::require_session()?;
    let config = AppConfig::load()?;
    let owner = config.github_owner(owner)?;
    let repo = config.github_repo(repo)?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Creating branch...");
    let outcome = async {
        let task = client.get_task(task_id).await?;
        let request = BranchRequest {
            owner: owner.clone(),
            repo: repo.clone(),
            new_branch_name: branch_name_for_task(&task),
            base_branch: base.to_string(),
            task_id,
        };
        client.create_branch(request).await
    }
    .await;
    bar.finish_and_clear();
    let created = outcome?;

    if created.retried {
        println!(
            "{} Branch name was taken; created {} instead",
            style("!").yellow().bold(),
            style(&created.name).bold()
        );
    } else {
        println!(
            "{} Created branch {} from {base}",
            style("✓").green().bold(),
            style(&created.name).bold()
        );
    }
    Ok(())
}
