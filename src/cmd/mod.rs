//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                                          |
//! |-----------|-----------------------------------------------------------|
//! | `session` | `Login`, `Logout`, `Whoami`, `Users`                      |
//! | `tasks`   | `List`, `Add`, `Show`, `Done`, `Status`, `Hours`,         |
//! |           | `Estimate`, `Assign`, `Archive`, `Delete`                 |
//! | `sprints` | `Sprint`                                                  |
//! | `reports` | `Report`                                                  |
//! | `github`  | `Branch`                                                  |

pub mod github;
pub mod reports;
pub mod session;
pub mod sprints;
pub mod tasks;

pub use github::cmd_branch;
pub use reports::cmd_report;
pub use session::{cmd_login, cmd_logout, cmd_users, cmd_whoami};
pub use sprints::cmd_sprint;
pub use tasks::{
    cmd_add, cmd_archive, cmd_assign, cmd_delete, cmd_done, cmd_estimate, cmd_hours, cmd_list,
    cmd_show, cmd_status,
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use sprintdeck::api::ApiClient;
use sprintdeck::config::AppConfig;
use sprintdeck::session::Session;

use crate::Cli;

/// Build the API client from config layered with the global `--api-url`.
pub fn build_client(cli: &Cli) -> Result<ApiClient> {
    let config = AppConfig::load()?;
    Ok(ApiClient::new(config.api_url(cli.api_url.as_deref())))
}

/// The stored session, or a friendly error when nobody is logged in.
pub fn require_session() -> Result<Session> {
    sprintdeck::session::load()?
        .context("Not logged in. Run 'sprintdeck login <username>' first.")
}

/// A spinner shown while a request is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .expect("progress bar template is a valid static string");
    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}

/// `12.5h` style formatting for optional hour fields.
pub fn hours_label(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{h:.1}h"),
        None => "—".to_string(),
    }
}
