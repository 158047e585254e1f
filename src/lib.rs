//! Sprintdeck — a terminal client for the sprint-tracking backend.
//!
//! The crate splits into a reusable synchronization core and a thin CLI:
//!
//! - [`model`] — wire records, normalized tasks, and the projection
//!   between them
//! - [`api`] — typed REST client for tasks, sprints, reports, and the
//!   GitHub proxy
//! - [`board`] — client-side task board: refresh, create, mutate,
//!   converge-by-refetch
//! - [`filters`] — pure filter and status-bucket projections
//! - [`session`] / [`config`] — persisted login and layered settings
//! - [`errors`] — error types shared across the crate

pub mod api;
pub mod board;
pub mod config;
pub mod errors;
pub mod filters;
pub mod model;
pub mod session;
