use anyhow::Result;
use clap::{Parser, Subcommand};

use sprintdeck::model::{TaskPriority, TaskStatus};

mod cmd;

#[derive(Parser)]
#[command(name = "sprintdeck")]
#[command(version, about = "Terminal client for the sprint tracking backend")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// API base URL (overrides SPRINTDECK_API_URL and sprintdeck.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in by username
    Login {
        /// Username to log in as (prompted when omitted)
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List team members and their ids
    Users,
    /// List tasks grouped by status, plus the backlog
    List {
        /// Only show tasks with this priority (low, medium, high, critical)
        #[arg(short, long)]
        priority: Option<TaskPriority>,
        /// Only show tasks in this sprint
        #[arg(short, long)]
        sprint: Option<i32>,
        /// Only show the backlog (tasks with no sprint)
        #[arg(long)]
        backlog: bool,
    },
    /// Create a task
    Add {
        description: String,
        /// Newline-separated steps
        #[arg(long)]
        steps: Option<String>,
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,
        /// Sprint to place the task in (backlog when omitted)
        #[arg(short, long)]
        sprint: Option<i32>,
        /// User id to assign the task to (defaults to you)
        #[arg(short, long)]
        assign: Option<i32>,
        /// Estimated hours
        #[arg(short, long)]
        estimate: Option<f64>,
    },
    /// Show one task in full
    Show { id: i32 },
    /// Mark a task done (or not done with --undo)
    Done {
        id: i32,
        /// Actual hours worked, required unless already recorded
        #[arg(long)]
        hours: Option<f64>,
        /// Un-complete the task instead
        #[arg(long)]
        undo: bool,
    },
    /// Set a task's workflow status
    Status {
        id: i32,
        /// pending, in-progress, in-review, completed
        status: TaskStatus,
        /// Actual hours worked, required when completing
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Record actual hours worked on a task
    Hours { id: i32, hours: f64 },
    /// Set a task's estimated hours
    Estimate { id: i32, hours: f64 },
    /// Move a task into a sprint (or back to the backlog)
    Assign {
        id: i32,
        /// Target sprint id
        #[arg(short, long)]
        sprint: Option<i32>,
        /// Move the task back to the backlog
        #[arg(long)]
        backlog: bool,
    },
    /// Archive a task
    Archive { id: i32 },
    /// Delete a task (creator or Manager only)
    Delete { id: i32 },
    /// Manage sprints
    Sprint {
        #[command(subcommand)]
        command: SprintCommands,
    },
    /// KPI reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// GitHub branches linked to tasks
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
}

#[derive(Subcommand)]
pub enum SprintCommands {
    /// List all sprints
    List,
    /// Create a sprint
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<chrono::NaiveDate>,
        /// Sprint length in weeks
        #[arg(long, default_value = "2")]
        weeks: u32,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Team-wide KPIs for a sprint
    Team { sprint: i32 },
    /// Per-user KPIs for a sprint
    User {
        user: i32,
        #[arg(short, long)]
        sprint: i32,
    },
    /// Completed tasks in a sprint, with hour comparisons
    Completed { sprint: i32 },
    /// Hour totals across all sprints
    Summary,
}

#[derive(Subcommand)]
pub enum BranchCommands {
    /// List branches in the configured repository
    List {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        repo: Option<String>,
    },
    /// Create a branch named after a task
    Create {
        /// Task the branch is for
        task: i32,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        repo: Option<String>,
        #[arg(long, default_value = "main")]
        base: String,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "sprintdeck=debug" } else { "sprintdeck=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Login { username } => cmd::cmd_login(&cli, username.as_deref()).await?,
        Commands::Logout => cmd::cmd_logout()?,
        Commands::Whoami => cmd::cmd_whoami()?,
        Commands::Users => cmd::cmd_users(&cli).await?,
        Commands::List { priority, sprint, backlog } => {
            cmd::cmd_list(&cli, *priority, *sprint, *backlog).await?
        }
        Commands::Add {
            description,
            steps,
            priority,
            sprint,
            assign,
            estimate,
        } => {
            cmd::cmd_add(
                &cli,
                description,
                steps.as_deref(),
                *priority,
                *sprint,
                *assign,
                *estimate,
            )
            .await?
        }
        Commands::Show { id } => cmd::cmd_show(&cli, *id).await?,
        Commands::Done { id, hours, undo } => cmd::cmd_done(&cli, *id, *hours, *undo).await?,
        Commands::Status { id, status, hours } => {
            cmd::cmd_status(&cli, *id, *status, *hours).await?
        }
        Commands::Hours { id, hours } => cmd::cmd_hours(&cli, *id, *hours).await?,
        Commands::Estimate { id, hours } => cmd::cmd_estimate(&cli, *id, *hours).await?,
        Commands::Assign { id, sprint, backlog } => {
            cmd::cmd_assign(&cli, *id, *sprint, *backlog).await?
        }
        Commands::Archive { id } => cmd::cmd_archive(&cli, *id).await?,
        Commands::Delete { id } => cmd::cmd_delete(&cli, *id).await?,
        Commands::Sprint { command } => cmd::cmd_sprint(&cli, command).await?,
        Commands::Report { command } => cmd::cmd_report(&cli, command).await?,
        Commands::Branch { command } => cmd::cmd_branch(&cli, command).await?,
    }

    Ok(())
}
