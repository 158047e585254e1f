//! KPI report commands — `sprintdeck report`.

use anyhow::Result;
use console::style;

use crate::{Cli, ReportCommands};

pub async fn cmd_report(cli: &Cli, command: &ReportCommands) -> Result<()> {
    match command {
        ReportCommands::Team { sprint } => cmd_report_team(cli, *sprint).await,
        ReportCommands::User { user, sprint } => cmd_report_user(cli, *user, *sprint).await,
        ReportCommands::Completed { sprint } => cmd_report_completed(cli, *sprint).await,
        ReportCommands::Summary => cmd_report_summary(cli).await,
    }
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

async fn cmd_report_team(cli: &Cli, sprint_id: i32) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Computing team KPIs...");
    let outcome = client.team_kpi(sprint_id).await;
    bar.finish_and_clear();
    let kpi = outcome?;

    let title = kpi
        .sprint_name
        .clone()
        .unwrap_or_else(|| format!("Sprint {sprint_id}"));
    println!();
    println!("{}", style(format!("Team KPIs — {title}")).bold().cyan());
    if let (Some(start), Some(end)) = (kpi.start_date, kpi.end_date) {
        println!("  {}", style(format!("{start} → {end}")).dim());
    }
    println!("  Tasks:       {}/{} completed", kpi.completed_tasks, kpi.total_tasks);
    println!("  Completion:  {}", percent(kpi.completion_rate));
    println!("  Estimated:   {:.1}h", kpi.total_estimated_hours);
    println!("  Actual:      {:.1}h", kpi.total_actual_hours);
    println!("  Efficiency:  {}", percent(kpi.efficiency));
    Ok(())
}

async fn cmd_report_user(cli: &Cli, user_id: i32, sprint_id: i32) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Computing user KPIs...");
    let outcome = client.user_kpi(user_id, sprint_id).await;
    bar.finish_and_clear();
    let kpi = outcome?;

    let name = kpi
        .user_name
        .clone()
        .unwrap_or_else(|| format!("user {user_id}"));
    let sprint = kpi
        .sprint_name
        .clone()
        .unwrap_or_else(|| format!("sprint {sprint_id}"));
    println!();
    println!("{}", style(format!("{name} — {sprint}")).bold().cyan());
    if let Some(role) = &kpi.user_role {
        println!("  {}", style(role).dim());
    }
    println!("  Tasks:       {}/{} completed", kpi.completed_tasks, kpi.total_tasks);
    println!("  Completion:  {}", percent(kpi.completion_rate));
    println!("  Estimated:   {:.1}h", kpi.total_estimated_hours);
    println!("  Actual:      {:.1}h", kpi.total_actual_hours);
    println!("  Efficiency:  {}", percent(kpi.efficiency));

    if !kpi.tasks.is_empty() {
        println!();
        println!("  {}", style("Tasks").bold());
        for task in &kpi.tasks {
            let mark = if task.completed {
                style("✓").green()
            } else {
                style("·").dim()
            };
            println!(
                "    {} {:>5}  {}  {}",
                mark,
                task.id,
                task.description,
                style(format!("est {:.1}h · act {:.1}h", task.estimated_hours, task.actual_hours))
                    .dim()
            );
        }
    }
    Ok(())
}

async fn cmd_report_completed(cli: &Cli, sprint_id: i32) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Loading completed tasks...");
    let outcome = client.completed_tasks(sprint_id).await;
    bar.finish_and_clear();
    let tasks = outcome?;

    println!();
    println!(
        "{} {}",
        style(format!("Completed in sprint {sprint_id}")).bold().cyan(),
        style(format!("({})", tasks.len())).dim()
    );
    for task in &tasks {
        let who = task.developer_name.clone().unwrap_or_else(|| "unassigned".to_string());
        let efficiency = match task.efficiency() {
            Some(e) => percent(e),
            None => "—".to_string(),
        };
        println!(
            "  {:>5}  {}  {}",
            style(task.id).bold(),
            task.description,
            style(format!(
                "{who} · est {:.1}h · act {:.1}h · {efficiency}",
                task.estimated_hours, task.actual_hours
            ))
            .dim()
        );
    }
    Ok(())
}

async fn cmd_report_summary(cli: &Cli) -> Result<()> {
    super::require_session()?;
    let client = super::build_client(cli)?;

    let bar = super::spinner("Summarizing sprints...");
    let outcome = client.sprints_summary().await;
    bar.finish_and_clear();
    let sprints = outcome?;

    println!();
    println!("{}", style("Sprint hour totals").bold().cyan());
    for sprint in &sprints {
        println!(
            "  {:>5}  {:<24} {:>3}/{:<3} tasks  est {:>7} act {:>7}  {}",
            style(sprint.id).bold(),
            sprint.name,
            sprint.completed_tasks,
            sprint.total_tasks,
            format!("{:.1}h", sprint.total_estimated_hours),
            format!("{:.1}h", sprint.total_actual_hours),
            style(percent(sprint.completion_rate)).dim()
        );
    }
    Ok(())
}
