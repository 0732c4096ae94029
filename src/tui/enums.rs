//! Enumerations for TUI state management.

use crate::store::StoreError;
use crate::task::{Task, TaskId};

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    NoteEdit,
    CreateModal,
    Help,
}

/// A store response posted back to the event loop.
#[derive(Debug)]
pub enum StoreEvent {
    Loaded(Result<Vec<Task>, StoreError>),
    Created(Result<Vec<Task>, StoreError>),
    NoteSaved {
        id: TaskId,
        text: String,
        result: Result<(), StoreError>,
    },
}
