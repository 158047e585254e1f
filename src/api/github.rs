//! GitHub branch proxy endpoints.
//!
//! The backend fronts the GitHub API; this module adds the one piece of
//! client-side policy around it: when branch creation hits HTTP 422
//! "Reference already exists", exactly one automatic retry is attempted
//! with a timestamp-suffixed name. Any further failure is terminal.

use super::ApiClient;
use crate::errors::ApiError;
use crate::model::{Branch, BranchRequest, Task};

/// Message the GitHub API returns for a ref-name collision, passed through
/// by the backend proxy.
const REF_EXISTS_MESSAGE: &str = "Reference already exists";

/// Outcome of a branch creation, including the name that finally stuck.
#[derive(Debug, Clone)]
pub struct CreatedBranch {
    pub name: String,
    /// True when the first name collided and the suffixed retry succeeded.
    pub retried: bool,
}

impl ApiClient {
    /// GET /github/get-branches?owner&repo.
    pub async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, ApiError> {
        let url = self.url("/github/get-branches");
        let resp = self
            .send(
                self.http().get(&url).query(&[("owner", owner), ("repo", repo)]),
                &url,
            )
            .await?;
        self.decode(resp, &url).await
    }

    /// POST /github/create-branch, with the bounded conflict retry.
    pub async fn create_branch(&self, request: BranchRequest) -> Result<CreatedBranch, ApiError> {
        let url = self.url("/github/create-branch");

        match self.send(self.http().post(&url).json(&request), &url).await {
            Ok(_) => Ok(CreatedBranch {
                name: request.new_branch_name,
                retried: false,
            }),
            Err(ApiError::Status { status: 422, message, .. })
                if message == REF_EXISTS_MESSAGE =>
            {
                let retry_name =
                    format!("{}-{}", request.new_branch_name, timestamp_suffix());
                tracing::warn!(
                    original = %request.new_branch_name,
                    retry = %retry_name,
                    "branch name collision, retrying once with suffixed name"
                );
                let retry = BranchRequest {
                    new_branch_name: retry_name.clone(),
                    ..request
                };
                self.send(self.http().post(&url).json(&retry), &url).await?;
                Ok(CreatedBranch { name: retry_name, retried: true })
            }
            Err(err) => Err(err),
        }
    }
}

/// Default branch name for a task: `task-{id}-{slug}-{ts}`, where the slug
/// is the lowercased description with specials stripped, spaces dashed, and
/// capped at 30 characters.
pub fn branch_name_for_task(task: &Task) -> String {
    format!(
        "task-{}-{}-{}",
        task.id,
        slugify(&task.description),
        timestamp_suffix()
    )
}

fn slugify(description: &str) -> String {
    let cleaned: String = description
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(30)
        .collect()
}

/// Uniquification rule: last six digits of the unix millisecond clock.
fn timestamp_suffix() -> String {
    let millis = chrono::Utc::now().timestamp_millis().to_string();
    let start = millis.len().saturating_sub(6);
    millis[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};

    fn task(id: i32, description: &str) -> Task {
        Task {
            id,
            description: description.into(),
            done: false,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            steps: String::new(),
            created_at: None,
            assigned_to: None,
            created_by: None,
            archived: false,
            estimated_hours: None,
            actual_hours: None,
            sprint_id: None,
        }
    }

    #[test]
    fn test_slugify_strips_specials_and_dashes_spaces() {
        assert_eq!(slugify("Fix the login page!"), "fix-the-login-page");
        assert_eq!(slugify("Add  KPI: charts (v2)"), "add-kpi-charts-v2");
    }

    #[test]
    fn test_slugify_caps_length_at_thirty() {
        let slug = slugify("a very long description that keeps going and going");
        assert!(slug.len() <= 30);
    }

    #[test]
    fn test_branch_name_embeds_task_id_and_suffix() {
        let name = branch_name_for_task(&task(12, "Fix login"));
        assert!(name.starts_with("task-12-fix-login-"));
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_timestamp_suffix_is_six_digits() {
        let suffix = timestamp_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
