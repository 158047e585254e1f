//! Task commands: listing, creation, and the full mutation set.
//!
//! Every mutation goes through [`TaskBoard`] so the CLI gets the same
//! guards and converge-by-refetch behavior as any other frontend to the
//! sync core would.

use anyhow::Result;
use console::style;

use sprintdeck::board::{NewTaskInput, TaskBoard};
use sprintdeck::filters::{self, TaskFilter};
use sprintdeck::model::{Task, TaskPriority, TaskStatus};

use super::hours_label;
use crate::Cli;

/// Load the board and the viewer in one go; most commands start here.
async fn loaded_board(cli: &Cli) -> Result<(TaskBoard, sprintdeck::model::User)> {
    let session = super::require_session()?;
    let client = super::build_client(cli)?;
    let mut board = TaskBoard::new(client);

    let bar = super::spinner("Loading tasks...");
    let outcome = board.refresh().await;
    bar.finish_and_clear();
    outcome?;

    Ok((board, session.to_user()))
}

fn priority_cell(priority: TaskPriority) -> console::StyledObject<String> {
    let label = format!("{:<8}", priority.to_string());
    match priority {
        TaskPriority::Critical => style(label).red().bold(),
        TaskPriority::High => style(label).red(),
        TaskPriority::Medium => style(label).yellow(),
        TaskPriority::Low => style(label).dim(),
    }
}

fn print_row(task: &Task) {
    let sprint = match task.sprint_id {
        Some(id) => format!("sprint {id}"),
        None => "backlog".to_string(),
    };
    println!(
        "  {:>5}  {} {}  {}",
        style(task.id).bold(),
        priority_cell(task.priority),
        task.description,
        style(format!(
            "[{} · est {} · act {}]",
            sprint,
            hours_label(task.estimated_hours),
            hours_label(task.actual_hours)
        ))
        .dim()
    );
}

fn print_bucket(title: &str, tasks: &[&Task]) {
    println!(
        "{} {}",
        style(title).bold().cyan(),
        style(format!("({})", tasks.len())).dim()
    );
    if tasks.is_empty() {
        println!("  {}", style("none").dim());
    }
    for task in tasks {
        print_row(task);
    }
    println!();
}

pub async fn cmd_list(
    cli: &Cli,
    priority: Option<TaskPriority>,
    sprint: Option<i32>,
    backlog_only: bool,
) -> Result<()> {
    let (board, viewer) = loaded_board(cli).await?;
    let filter = TaskFilter::for_viewer(&viewer, priority);

    println!();
    if backlog_only {
        print_bucket("Backlog", &filters::backlog(board.tasks(), &filter));
        return Ok(());
    }
    if let Some(sprint_id) = sprint {
        print_bucket(
            &format!("Sprint {sprint_id}"),
            &filters::in_sprint(board.tasks(), &filter, sprint_id),
        );
        return Ok(());
    }

    let buckets = filters::group_by_status(board.tasks(), &filter);
    print_bucket("Pending", &buckets.pending);
    print_bucket("In Progress", &buckets.in_progress);
    print_bucket("In Review", &buckets.in_review);
    print_bucket("Completed", &buckets.completed);
    print_bucket("Backlog", &filters::backlog(board.tasks(), &filter));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_add(
    cli: &Cli,
    description: &str,
    steps: Option<&str>,
    priority: TaskPriority,
    sprint: Option<i32>,
    assign: Option<i32>,
    estimate: Option<f64>,
) -> Result<()> {
    let session = super::require_session()?;
    let client = super::build_client(cli)?;
    let mut board = TaskBoard::new(client);
    let creator = session.to_user();

    let input = NewTaskInput {
        description: description.to_string(),
        steps: steps.unwrap_or_default().to_string(),
        priority,
        sprint_id: sprint,
        assigned_to: assign.or(Some(creator.id)),
        estimated_hours: estimate,
    };

    let bar = super::spinner("Creating task...");
    let outcome = board.create(input, &creator).await;
    bar.finish_and_clear();
    let task = outcome?;

    println!(
        "{} Created task {} — {}",
        style("✓").green().bold(),
        style(task.id).bold(),
        task.description
    );
    Ok(())
}

pub async fn cmd_show(cli: &Cli, id: i32) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Fetching task...");
    let outcome = client.get_task(id).await;
    bar.finish_and_clear();
    let task = outcome?;

    println!();
    println!("{} {}", style(format!("Task {}", task.id)).bold(), task.description);
    println!("  Status:    {}", task.status);
    println!("  Priority:  {}", task.priority);
    println!(
        "  Sprint:    {}",
        task.sprint_id
            .map(|s| s.to_string())
            .unwrap_or_else(|| "backlog".to_string())
    );
    println!("  Estimated: {}", hours_label(task.estimated_hours));
    println!("  Actual:    {}", hours_label(task.actual_hours));
    if let Some(user) = task.assigned_to {
        println!("  Assignee:  user {user}");
    }
    if let Some(user) = task.created_by {
        println!("  Creator:   user {user}");
    }
    if let Some(ts) = task.created_at {
        println!("  Created:   {}", ts.format("%Y-%m-%d %H:%M UTC"));
    }
    if !task.steps.is_empty() {
        println!("  Steps:");
        for step in task.steps.lines() {
            println!("    - {step}");
        }
    }
    Ok(())
}

pub async fn cmd_done(cli: &Cli, id: i32, hours: Option<f64>, undo: bool) -> Result<()> {
    let (mut board, _) = loaded_board(cli).await?;

    let bar = super::spinner("Updating task...");
    let outcome = board.toggle_done(id, !undo, hours).await;
    bar.finish_and_clear();
    outcome?;

    let task = board.tasks().iter().find(|t| t.id == id);
    let status = task.map(|t| t.status).unwrap_or(TaskStatus::Completed);
    println!(
        "{} Task {} is now {}",
        style("✓").green().bold(),
        id,
        style(status).bold()
    );
    Ok(())
}

pub async fn cmd_status(
    cli: &Cli,
    id: i32,
    status: TaskStatus,
    hours: Option<f64>,
) -> Result<()> {
    let (mut board, _) = loaded_board(cli).await?;

    let bar = super::spinner("Updating status...");
    let outcome = board.patch_status(id, status, hours).await;
    bar.finish_and_clear();
    outcome?;

    println!(
        "{} Task {} moved to {}",
        style("✓").green().bold(),
        id,
        style(status).bold()
    );
    Ok(())
}

pub async fn cmd_hours(cli: &Cli, id: i32, hours: f64) -> Result<()> {
    let (mut board, _) = loaded_board(cli).await?;

    let bar = super::spinner("Recording hours...");
    let outcome = board.record_actual_hours(id, hours).await;
    bar.finish_and_clear();
    outcome?;

    println!("{} Recorded {hours:.1}h on task {id}", style("✓").green().bold());
    Ok(())
}

pub async fn cmd_estimate(cli: &Cli, id: i32, hours: f64) -> Result<()> {
    let (mut board, _) = loaded_board(cli).await?;

    let bar = super::spinner("Updating estimate...");
    let outcome = board.set_estimate(id, hours).await;
    bar.finish_and_clear();
    outcome?;

    println!("{} Estimated task {id} at {hours:.1}h", style("✓").green().bold());
    Ok(())
}

pub async fn cmd_assign(cli: &Cli, id: i32, sprint: Option<i32>, backlog: bool) -> Result<()> {
    if sprint.is_none() && !backlog {
        anyhow::bail!("Pass --sprint <id> to pick a sprint, or --backlog to remove the task from its sprint");
    }
    let (mut board, _) = loaded_board(cli).await?;

    let target = if backlog { None } else { sprint };
    let bar = super::spinner("Moving task...");
    let outcome = board.assign_sprint(id, target).await;
    bar.finish_and_clear();
    outcome?;

    match target {
        Some(sprint_id) => println!(
            "{} Task {id} moved to sprint {sprint_id}",
            style("✓").green().bold()
        ),
        None => println!("{} Task {id} moved to the backlog", style("✓").green().bold()),
    }
    Ok(())
}

pub async fn cmd_archive(cli: &Cli, id: i32) -> Result<()> {
    let (mut board, _) = loaded_board(cli).await?;

    let bar = super::spinner("Archiving task...");
    let outcome = board.archive(id).await;
    bar.finish_and_clear();
    outcome?;

    println!("{} Archived task {id}", style("✓").green().bold());
    Ok(())
}

pub async fn cmd_delete(cli: &Cli, id: i32) -> Result<()> {
    let (mut board, viewer) = loaded_board(cli).await?;

    if !cli.yes {
        let description = board
            .tasks()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.description.clone())
            .unwrap_or_else(|| format!("task {id}"));
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete '{description}'? This cannot be undone"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let bar = super::spinner("Deleting task...");
    let outcome = board.delete(id, &viewer).await;
    bar.finish_and_clear();
    outcome?;

    println!("{} Deleted task {id}", style("✓").green().bold());
    Ok(())
}
