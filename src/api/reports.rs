//! KPI report endpoints.
//!
//! All snapshots are derived server-side and fetched fresh per selection;
//! the client never mutates them.

use super::ApiClient;
use crate::errors::ApiError;
use crate::model::{CompletedTask, SprintSummary, TeamKpi, UserKpi};

impl ApiClient {
    /// GET /reports/team/kpi/{sprintId}.
    pub async fn team_kpi(&self, sprint_id: i32) -> Result<TeamKpi, ApiError> {
        let url = self.url(&format!("/reports/team/kpi/{sprint_id}"));
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }

    /// GET /reports/user/{userId}/kpi/{sprintId}.
    pub async fn user_kpi(&self, user_id: i32, sprint_id: i32) -> Result<UserKpi, ApiError> {
        let url = self.url(&format!("/reports/user/{user_id}/kpi/{sprint_id}"));
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }

    /// GET /reports/sprint/{sprintId}/completed-tasks.
    pub async fn completed_tasks(&self, sprint_id: i32) -> Result<Vec<CompletedTask>, ApiError> {
        let url = self.url(&format!("/reports/sprint/{sprint_id}/completed-tasks"));
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }

    /// GET /reports/sprints/summary.
    pub async fn sprints_summary(&self) -> Result<Vec<SprintSummary>, ApiError> {
        let url = self.url("/reports/sprints/summary");
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }
}
