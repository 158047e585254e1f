//! Sprint and user endpoints.

use super::ApiClient;
use crate::errors::ApiError;
use crate::model::{NewSprint, Sprint, User};

impl ApiClient {
    /// GET /sprints.
    pub async fn list_sprints(&self) -> Result<Vec<Sprint>, ApiError> {
        let url = self.url("/sprints");
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }

    /// POST /sprints — returns the created sprint with its server id.
    pub async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint, ApiError> {
        let url = self.url("/sprints");
        let resp = self.send(self.http().post(&url).json(sprint), &url).await?;
        self.decode(resp, &url).await
    }

    /// GET /users.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/users");
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }

    /// GET /users/username/{username} — the login lookup. A 404 means the
    /// username is unknown.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, ApiError> {
        let url = self.url(&format!("/users/username/{username}"));
        let resp = self.send(self.http().get(&url), &url).await?;
        self.decode(resp, &url).await
    }
}
