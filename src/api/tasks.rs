//! Task endpoints under /todolist.

use serde_json::json;

use super::ApiClient;
use crate::errors::ApiError;
use crate::model::{NewTask, Task, TaskRecord, TaskStatus};

impl ApiClient {
    /// GET /todolist — all active (non-archived) tasks, projected.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.url("/todolist");
        let resp = self.send(self.http().get(&url), &url).await?;
        let records: Vec<TaskRecord> = self.decode(resp, &url).await?;
        Ok(records.into_iter().map(TaskRecord::project).collect())
    }

    /// GET /todolist/{id} — one task, projected.
    pub async fn get_task(&self, id: i32) -> Result<Task, ApiError> {
        let url = self.url(&format!("/todolist/{id}"));
        let resp = self.send(self.http().get(&url), &url).await?;
        let record: TaskRecord = self.decode(resp, &url).await?;
        Ok(record.project())
    }

    /// POST /todolist — create a task. The backend returns an empty body
    /// and exposes the new id through a response header named `location`;
    /// that header is the contract, not a body field.
    pub async fn create_task(&self, task: &NewTask) -> Result<i32, ApiError> {
        let url = self.url("/todolist");
        let resp = self.send(self.http().post(&url).json(task), &url).await?;

        let header = resp
            .headers()
            .get("location")
            .ok_or_else(|| ApiError::MissingLocation { url: url.clone() })?;
        header
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .ok_or(ApiError::BadLocation { url })
    }

    /// PUT /todolist/{id} — full replace. Callers reload the record
    /// afterwards rather than trusting the response body.
    pub async fn update_task(&self, id: i32, task: &TaskRecord) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}"));
        self.send(self.http().put(&url).json(task), &url).await?;
        Ok(())
    }

    /// PATCH /todolist/{id}/status with body `{"status": ...}`.
    pub async fn patch_status(&self, id: i32, status: TaskStatus) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}/status"));
        self.send(self.http().patch(&url).json(&json!({ "status": status })), &url)
            .await?;
        Ok(())
    }

    /// PATCH /todolist/{id}/actual-hours with body `{"hours": ...}`.
    pub async fn patch_actual_hours(&self, id: i32, hours: f64) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}/actual-hours"));
        self.send(self.http().patch(&url).json(&json!({ "hours": hours })), &url)
            .await?;
        Ok(())
    }

    /// PATCH /todolist/{id}/estimated-hours with body `{"hours": ...}`.
    pub async fn patch_estimated_hours(&self, id: i32, hours: f64) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}/estimated-hours"));
        self.send(self.http().patch(&url).json(&json!({ "hours": hours })), &url)
            .await?;
        Ok(())
    }

    /// PATCH /todolist/{id}/sprint with body `{"sprintId": ...}`.
    /// `None` moves the task back to the backlog.
    pub async fn assign_sprint(&self, id: i32, sprint_id: Option<i32>) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}/sprint"));
        self.send(
            self.http().patch(&url).json(&json!({ "sprintId": sprint_id })),
            &url,
        )
        .await?;
        Ok(())
    }

    /// PUT /todolist/{id}/archive — soft-delete; the task drops out of
    /// the active list.
    pub async fn archive_task(&self, id: i32) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}/archive"));
        self.send(self.http().put(&url), &url).await?;
        Ok(())
    }

    /// DELETE /todolist/{id}.
    pub async fn delete_task(&self, id: i32) -> Result<(), ApiError> {
        let url = self.url(&format!("/todolist/{id}"));
        self.send(self.http().delete(&url), &url).await?;
        Ok(())
    }
}
