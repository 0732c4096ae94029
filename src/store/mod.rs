//! Remote store contract.
//!
//! The view model only ever talks to a [`TaskStore`]. The production
//! implementation is [`rest::RestStore`]; tests use [`fake::FakeStore`].

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::task::{NewTask, Task, TaskId};

#[cfg(test)]
pub mod fake;
pub mod rest;

/// Which remote operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Insert,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Fetch => "fetch",
            Operation::Insert => "insert",
            Operation::Update => "update",
        })
    }
}

/// A remote operation failed. Network, validation and authorization
/// failures are not distinguished.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("remote {operation} failed: {reason}")]
pub struct StoreError {
    pub operation: Operation,
    pub reason: String,
}

impl StoreError {
    pub fn new(operation: Operation, reason: impl Into<String>) -> Self {
        StoreError {
            operation,
            reason: reason.into(),
        }
    }
}

/// The service of record for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, ordered by ascending priority then newest first.
    async fn fetch_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Insert one task and return the stored record(s).
    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError>;

    /// Overwrite the notes of one task.
    async fn update_notes(&self, id: TaskId, notes: &str) -> Result<(), StoreError>;
}
