//! The task board view-model.
//!
//! `TaskBoard` is the single owner of the in-memory task list plus the
//! detail-view mirror, and funnels every mutation through its own named
//! operations so the synchronization rules live in one place:
//!
//! - every record entering the board goes through the one wire projection
//!   ([`crate::model::TaskRecord::project`]), whether it came from a list
//!   load, a single-record reload, or the optimistic insert after create;
//! - after a successful status/hours mutation the board does not trust the
//!   optimistic payload — it re-fetches the single record and replaces the
//!   list entry in place (and the open detail view, if it shows that id);
//!   a failed mutation triggers the same re-fetch so the view never sits
//!   on stale state;
//! - at most one mutating request per record is in flight at a time,
//!   enforced before any network I/O;
//! - full-list loads carry a generation counter so a stale response cannot
//!   overwrite a newer one.

use std::collections::HashMap;

use chrono::Utc;

use crate::api::ApiClient;
use crate::errors::BoardError;
use crate::model::{NewTask, Role, Task, TaskPriority, TaskRecord, TaskStatus, User};

/// Hours fields accept only finite, positive numbers; clap's f64 parser
/// happily produces `NaN` and `inf`, which must never reach the wire.
fn valid_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

/// Per-record sync state. Absent from the in-flight map means `Saved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Saved,
    Saving,
    Deleting,
}

/// What the caller supplies to create a task; the board fills in the
/// status, timestamps, and creator.
#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub description: String,
    pub steps: String,
    pub priority: TaskPriority,
    pub sprint_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub estimated_hours: Option<f64>,
}

pub struct TaskBoard {
    api: ApiClient,
    tasks: Vec<Task>,
    /// Mirror of the record open in a detail view, kept in sync with the
    /// list entry of the same id.
    selected: Option<Task>,
    in_flight: HashMap<i32, RecordState>,
    load_generation: u64,
}

impl TaskBoard {
    pub fn new(api: ApiClient) -> Self {
        TaskBoard {
            api,
            tasks: Vec::new(),
            selected: None,
            in_flight: HashMap::new(),
            load_generation: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    pub fn record_state(&self, id: i32) -> RecordState {
        self.in_flight.get(&id).copied().unwrap_or(RecordState::Saved)
    }

    fn find(&self, id: i32) -> Result<&Task, BoardError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(BoardError::UnknownTask { id })
    }

    fn begin(&mut self, id: i32, state: RecordState) -> Result<(), BoardError> {
        if self.in_flight.contains_key(&id) {
            return Err(BoardError::MutationInFlight { id });
        }
        self.in_flight.insert(id, state);
        Ok(())
    }

    fn finish(&mut self, id: i32) {
        self.in_flight.remove(&id);
    }

    /// Claim the next load generation. Callers that schedule their own
    /// fetches pair this with [`TaskBoard::commit_load`]; [`TaskBoard::refresh`]
    /// does both for the inline case.
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }

    /// Commit a fetched task list for a claimed generation. A result from a
    /// superseded load — another `begin_load` happened after this one — is
    /// dropped instead of overwriting newer state. Returns whether the list
    /// was committed.
    pub fn commit_load(&mut self, generation: u64, tasks: Vec<Task>) -> bool {
        if generation != self.load_generation {
            tracing::debug!(
                generation,
                latest = self.load_generation,
                "dropping stale task list response"
            );
            return false;
        }
        self.tasks = tasks;
        // Resync or drop the detail mirror against the fresh list.
        if let Some(selected) = &self.selected {
            self.selected = self.tasks.iter().find(|t| t.id == selected.id).cloned();
        }
        true
    }

    /// Full list load: claim a generation, fetch, commit. Holding `&mut self`
    /// across the await already serializes inline refreshes; frontends that
    /// run the fetch detached get the same staleness protection from the
    /// `begin_load`/`commit_load` pair.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        let generation = self.begin_load();
        let tasks = self.api.list_tasks().await?;
        self.commit_load(generation, tasks);
        Ok(())
    }

    /// Open a task in the detail view.
    pub fn select(&mut self, id: i32) -> Result<&Task, BoardError> {
        let task = self.find(id)?.clone();
        Ok(self.selected.insert(task))
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Create a task: POST, resolve the server id from the `location`
    /// header, and splice the projected record at the head of the list.
    /// On failure the record is dropped and the error surfaced.
    pub async fn create(
        &mut self,
        input: NewTaskInput,
        creator: &User,
    ) -> Result<&Task, BoardError> {
        let creation_ts = Utc::now();
        let body = NewTask {
            description: input.description.clone(),
            done: false,
            status: TaskStatus::Pending,
            priority: input.priority,
            steps: input.steps.clone(),
            creation_ts,
            sprint_id: input.sprint_id,
            assigned_to: input.assigned_to,
            created_by: Some(creator.id),
            estimated_hours: input.estimated_hours,
        };

        let id = self.api.create_task(&body).await?;

        // Same projection as the load paths, so the optimistic insert has
        // exactly the shape a reload would produce.
        let task = TaskRecord {
            id,
            description: input.description,
            done: Some(false),
            status: Some(TaskStatus::Pending),
            priority: Some(input.priority),
            steps: Some(input.steps),
            creation_ts: Some(creation_ts),
            assigned_to: input.assigned_to,
            created_by: Some(creator.id),
            is_archived: Some(false),
            estimated_hours: input.estimated_hours,
            actual_hours: None,
            sprint_id: input.sprint_id,
        }
        .project();

        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Re-fetch one record and replace the matching list entry in place,
    /// patching the detail mirror when it shows the same id.
    pub async fn reload_one(&mut self, id: i32) -> Result<(), BoardError> {
        let fresh = self.api.get_task(id).await?;
        if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == id) {
            *entry = fresh.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = Some(fresh);
        }
        Ok(())
    }

    /// After a mutation, converge the record with the store regardless of
    /// how the mutation went; a reload failure after a mutation failure is
    /// logged, not surfaced over the original error.
    async fn converge(&mut self, id: i32, outcome: Result<(), BoardError>) -> Result<(), BoardError> {
        match outcome {
            Ok(()) => self.reload_one(id).await,
            Err(err) => {
                if let Err(reload_err) = self.reload_one(id).await {
                    tracing::warn!(id, error = %reload_err, "reload after failed mutation also failed");
                }
                Err(err)
            }
        }
    }

    /// Change a task's workflow status, optionally logging actual hours in
    /// the same action. Completing a task requires actual hours — either
    /// already on the record or supplied here — checked before any network
    /// call is issued.
    pub async fn patch_status(
        &mut self,
        id: i32,
        status: TaskStatus,
        actual_hours: Option<f64>,
    ) -> Result<(), BoardError> {
        let task = self.find(id)?;
        if let Some(hours) = actual_hours {
            if !valid_hours(hours) {
                return Err(BoardError::InvalidHours { hours });
            }
        }
        if status == TaskStatus::Completed && actual_hours.or(task.actual_hours).is_none() {
            return Err(BoardError::MissingActualHours { id });
        }

        self.begin(id, RecordState::Saving)?;
        let outcome = async {
            if let Some(hours) = actual_hours {
                self.api.patch_actual_hours(id, hours).await?;
            }
            self.api.patch_status(id, status).await?;
            Ok(())
        }
        .await;
        self.finish(id);
        self.converge(id, outcome).await
    }

    /// Advance a task to the next workflow stage (the detail view's
    /// "move to next" action).
    pub async fn advance_status(
        &mut self,
        id: i32,
        actual_hours: Option<f64>,
    ) -> Result<TaskStatus, BoardError> {
        let next = self.find(id)?.status.next();
        self.patch_status(id, next, actual_hours).await?;
        Ok(next)
    }

    /// Log actual hours worked on a task.
    pub async fn record_actual_hours(&mut self, id: i32, hours: f64) -> Result<(), BoardError> {
        if !valid_hours(hours) {
            return Err(BoardError::InvalidHours { hours });
        }
        self.find(id)?;
        self.begin(id, RecordState::Saving)?;
        let outcome = self.api.patch_actual_hours(id, hours).await.map_err(Into::into);
        self.finish(id);
        self.converge(id, outcome).await
    }

    /// Set or revise the estimate for a task.
    pub async fn set_estimate(&mut self, id: i32, hours: f64) -> Result<(), BoardError> {
        if !valid_hours(hours) {
            return Err(BoardError::InvalidHours { hours });
        }
        self.find(id)?;
        self.begin(id, RecordState::Saving)?;
        let outcome = self.api.patch_estimated_hours(id, hours).await.map_err(Into::into);
        self.finish(id);
        self.converge(id, outcome).await
    }

    /// Move a task into a sprint, or back to the backlog with `None`.
    pub async fn assign_sprint(&mut self, id: i32, sprint_id: Option<i32>) -> Result<(), BoardError> {
        self.find(id)?;
        self.begin(id, RecordState::Saving)?;
        let outcome = self.api.assign_sprint(id, sprint_id).await.map_err(Into::into);
        self.finish(id);
        self.converge(id, outcome).await
    }

    /// Flip the legacy done flag via a full replace, preserving the
    /// done/status coupling. Marking done counts as completing, so the
    /// actual-hours guard applies.
    pub async fn toggle_done(
        &mut self,
        id: i32,
        done: bool,
        actual_hours: Option<f64>,
    ) -> Result<(), BoardError> {
        let task = self.find(id)?;
        if let Some(hours) = actual_hours {
            if !valid_hours(hours) {
                return Err(BoardError::InvalidHours { hours });
            }
        }
        if done && actual_hours.or(task.actual_hours).is_none() {
            return Err(BoardError::MissingActualHours { id });
        }

        let mut updated = task.clone();
        updated.set_done(done);
        if let Some(hours) = actual_hours {
            updated.actual_hours = Some(hours);
        }

        self.begin(id, RecordState::Saving)?;
        let outcome = self
            .api
            .update_task(id, &updated.to_record())
            .await
            .map_err(Into::into);
        self.finish(id);
        self.converge(id, outcome).await
    }

    /// Archive a task. Archived records drop out of the active list, so a
    /// success removes the entry and closes a matching detail view.
    pub async fn archive(&mut self, id: i32) -> Result<(), BoardError> {
        self.find(id)?;
        self.begin(id, RecordState::Deleting)?;
        let outcome = self.api.archive_task(id).await;
        self.finish(id);
        outcome?;
        self.remove_locally(id);
        Ok(())
    }

    /// Delete a task. Only the creator or a Manager may delete — checked
    /// here before the request, and again by nothing on this side: the
    /// server stays the real authority. The record is never removed from
    /// view until the delete call round-trips successfully.
    pub async fn delete(&mut self, id: i32, actor: &User) -> Result<(), BoardError> {
        let task = self.find(id)?;
        if actor.role != Role::Manager && task.created_by != Some(actor.id) {
            return Err(BoardError::NotPermitted { id });
        }

        self.begin(id, RecordState::Deleting)?;
        let outcome = self.api.delete_task(id).await;
        self.finish(id);
        outcome?;
        self.remove_locally(id);
        Ok(())
    }

    fn remove_locally(&mut self, id: i32) {
        self.tasks.retain(|t| t.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    /// Client pointed at a closed port: any operation that reaches the
    /// network fails with a transport error, so a guard error proves the
    /// guard fired before any request was issued.
    fn offline_board() -> TaskBoard {
        TaskBoard::new(ApiClient::new("http://127.0.0.1:9/api"))
    }

    fn seeded_board(tasks: Vec<Task>) -> TaskBoard {
        let mut board = offline_board();
        board.tasks = tasks;
        board
    }

    fn task(id: i32, created_by: Option<i32>) -> Task {
        TaskRecord {
            id,
            description: format!("task {id}"),
            done: None,
            status: None,
            priority: None,
            steps: None,
            creation_ts: None,
            assigned_to: None,
            created_by,
            is_archived: None,
            estimated_hours: None,
            actual_hours: None,
            sprint_id: None,
        }
        .project()
    }

    fn developer(id: i32) -> User {
        User {
            id,
            username: format!("dev{id}"),
            name: None,
            role: Role::Developer,
            phone: None,
        }
    }

    fn manager(id: i32) -> User {
        User {
            id,
            username: format!("mgr{id}"),
            name: None,
            role: Role::Manager,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_completing_without_hours_rejected_before_network() {
        let mut board = seeded_board(vec![task(1, None)]);
        let err = board
            .patch_status(1, TaskStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::MissingActualHours { id: 1 }));
    }

    #[tokio::test]
    async fn test_completing_with_existing_hours_passes_the_guard() {
        let mut seeded = task(1, None);
        seeded.actual_hours = Some(2.0);
        let mut board = seeded_board(vec![seeded]);
        // The guard passes; the offline client then fails in transport.
        let err = board
            .patch_status(1, TaskStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Api(_)));
    }

    #[tokio::test]
    async fn test_toggle_done_requires_hours() {
        let mut board = seeded_board(vec![task(4, None)]);
        let err = board.toggle_done(4, true, None).await.unwrap_err();
        assert!(matches!(err, BoardError::MissingActualHours { id: 4 }));
    }

    #[tokio::test]
    async fn test_non_positive_hours_rejected() {
        let mut board = seeded_board(vec![task(1, None)]);
        let err = board.record_actual_hours(1, 0.0).await.unwrap_err();
        assert!(matches!(err, BoardError::InvalidHours { .. }));
        let err = board.set_estimate(1, -2.5).await.unwrap_err();
        assert!(matches!(err, BoardError::InvalidHours { .. }));
    }

    #[tokio::test]
    async fn test_non_finite_hours_rejected() {
        let mut board = seeded_board(vec![task(1, None)]);
        for hours in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = board.record_actual_hours(1, hours).await.unwrap_err();
            assert!(matches!(err, BoardError::InvalidHours { .. }));
            let err = board.set_estimate(1, hours).await.unwrap_err();
            assert!(matches!(err, BoardError::InvalidHours { .. }));
            let err = board
                .patch_status(1, TaskStatus::Completed, Some(hours))
                .await
                .unwrap_err();
            assert!(matches!(err, BoardError::InvalidHours { .. }));
            let err = board.toggle_done(1, true, Some(hours)).await.unwrap_err();
            assert!(matches!(err, BoardError::InvalidHours { .. }));
        }
    }

    #[tokio::test]
    async fn test_unknown_task_is_rejected() {
        let mut board = seeded_board(vec![task(1, None)]);
        let err = board.patch_status(99, TaskStatus::InProgress, None).await.unwrap_err();
        assert!(matches!(err, BoardError::UnknownTask { id: 99 }));
    }

    #[tokio::test]
    async fn test_delete_requires_creator_or_manager() {
        let mut board = seeded_board(vec![task(1, Some(10))]);

        let err = board.delete(1, &developer(11)).await.unwrap_err();
        assert!(matches!(err, BoardError::NotPermitted { id: 1 }));
        // The record is still on the board after the refusal.
        assert_eq!(board.tasks().len(), 1);

        // The creator passes the permission check and reaches the network.
        let err = board.delete(1, &developer(10)).await.unwrap_err();
        assert!(matches!(err, BoardError::Api(_)));
        assert_eq!(board.tasks().len(), 1);

        // A manager passes regardless of creator.
        let err = board.delete(1, &manager(99)).await.unwrap_err();
        assert!(matches!(err, BoardError::Api(_)));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record_saved() {
        let mut board = seeded_board(vec![task(1, Some(10))]);
        let _ = board.delete(1, &manager(1)).await;
        assert_eq!(board.record_state(1), RecordState::Saved);
        assert_eq!(board.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_mutation_in_flight_blocks_second_mutation() {
        let mut board = seeded_board(vec![task(1, None)]);
        board.begin(1, RecordState::Saving).unwrap();
        let err = board.assign_sprint(1, Some(2)).await.unwrap_err();
        assert!(matches!(err, BoardError::MutationInFlight { id: 1 }));
        board.finish(1);
        assert_eq!(board.record_state(1), RecordState::Saved);
    }

    #[test]
    fn test_stale_load_cannot_overwrite_a_newer_one() {
        let mut board = seeded_board(vec![]);
        let first = board.begin_load();
        let second = board.begin_load();

        assert!(board.commit_load(second, vec![task(2, None)]));
        assert_eq!(board.tasks().len(), 1);

        // The superseded load's result arrives late and is dropped.
        assert!(!board.commit_load(first, vec![task(1, None)]));
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].id, 2);
    }

    #[test]
    fn test_commit_load_resyncs_the_detail_mirror() {
        let mut board = seeded_board(vec![task(1, None)]);
        board.select(1).unwrap();

        let generation = board.begin_load();
        let mut fresh = task(1, None);
        fresh.description = "renamed".into();
        assert!(board.commit_load(generation, vec![fresh]));
        assert_eq!(board.selected().unwrap().description, "renamed");

        // A load that no longer contains the selected id closes the view.
        let generation = board.begin_load();
        assert!(board.commit_load(generation, vec![task(2, None)]));
        assert!(board.selected().is_none());
    }

    #[test]
    fn test_select_and_close_detail() {
        let mut board = seeded_board(vec![task(1, None), task(2, None)]);
        board.select(2).unwrap();
        assert_eq!(board.selected().unwrap().id, 2);
        board.close_detail();
        assert!(board.selected().is_none());

        let mut board = seeded_board(vec![]);
        assert!(matches!(board.select(7), Err(BoardError::UnknownTask { id: 7 })));
    }

    #[test]
    fn test_remove_locally_closes_matching_detail_view() {
        let mut board = seeded_board(vec![task(1, None), task(2, None)]);
        board.select(1).unwrap();
        board.remove_locally(1);
        assert!(board.selected().is_none());
        assert_eq!(board.tasks().len(), 1);

        board.select(2).unwrap();
        board.remove_locally(99);
        assert!(board.selected().is_some());
    }
}
