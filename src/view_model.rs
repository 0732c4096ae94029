//! Client-side state of the task list.
//!
//! `TaskListViewModel` holds the loaded tasks, the loading flag, the single
//! note edit and the creation modal, and mediates every read and write
//! against the injected [`TaskStore`].
//!
//! Each remote operation comes in two shapes. The `async` methods run the
//! whole round trip and are what the CLI and tests use. The `begin_*` /
//! `prepare_*` and `finish_*` halves let the terminal UI issue the request on
//! a spawned task and apply the response whenever it arrives.
//!
//! Store failures never escape: they are logged and the state is left as it
//! was before the operation, so the user can retry by hand.

use std::sync::Arc;

use tracing::{error, info};

use crate::fields::Priority;
use crate::store::{StoreError, TaskStore};
use crate::task::{sort_tasks, NewTask, Task, TaskDraft, TaskId};

/// The task currently open for note editing.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEdit {
    pub task_id: TaskId,
    pub draft: String,
}

/// The creation modal and its draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateModal {
    pub open: bool,
    pub draft: TaskDraft,
}

pub struct TaskListViewModel {
    store: Arc<dyn TaskStore>,
    tasks: Vec<Task>,
    loading: bool,
    note_edit: Option<NoteEdit>,
    create_modal: CreateModal,
}

impl TaskListViewModel {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        TaskListViewModel {
            store,
            tasks: Vec::new(),
            loading: false,
            note_edit: None,
            create_modal: CreateModal::default(),
        }
    }

    /// The store this view model talks to.
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn note_edit(&self) -> Option<&NoteEdit> {
        self.note_edit.as_ref()
    }

    /// Whether `id` is the task open for note editing.
    pub fn editing(&self, id: TaskId) -> bool {
        self.note_edit.as_ref().is_some_and(|e| e.task_id == id)
    }

    pub fn create_modal(&self) -> &CreateModal {
        &self.create_modal
    }

    /// Highest priority among the loaded tasks, 0 when there are none.
    pub fn max_priority(&self) -> Priority {
        self.tasks
            .iter()
            .map(|t| t.priority)
            .max()
            .unwrap_or_default()
    }

    // Load

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a fetch result. The collection is only replaced on success.
    pub fn finish_load(&mut self, result: Result<Vec<Task>, StoreError>) -> bool {
        self.loading = false;
        match result {
            Ok(mut tasks) => {
                sort_tasks(&mut tasks);
                info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to load tasks");
                false
            }
        }
    }

    /// Fetch every task from the store.
    pub async fn load(&mut self) -> bool {
        self.begin_load();
        let result = self.store.fetch_all().await;
        self.finish_load(result)
    }

    // Create

    pub fn open_create_modal(&mut self) {
        self.create_modal.open = true;
    }

    /// Close the modal. The draft is kept for the next time it opens.
    pub fn close_create_modal(&mut self) {
        self.create_modal.open = false;
    }

    pub fn set_draft(&mut self, draft: TaskDraft) {
        self.create_modal.draft = draft;
    }

    /// Insert payload for `draft`, ranked after every loaded task.
    pub fn prepare_create(&self, draft: &TaskDraft) -> NewTask {
        draft.to_new_task(self.max_priority().next())
    }

    /// Apply an insert result. On success the stored rows are merged in,
    /// the modal closes and the draft resets; the caller should then reload.
    pub fn finish_create(&mut self, result: Result<Vec<Task>, StoreError>) -> bool {
        match result {
            Ok(created) => {
                info!(ids = ?created.iter().map(|t| t.id).collect::<Vec<_>>(), "task created");
                let mut tasks = created;
                tasks.append(&mut self.tasks);
                sort_tasks(&mut tasks);
                self.tasks = tasks;
                self.create_modal = CreateModal::default();
                true
            }
            Err(e) => {
                error!(error = %e, "failed to create task");
                false
            }
        }
    }

    /// Insert a task built from `draft`, then reload to reconcile with the
    /// store.
    pub async fn create(&mut self, draft: &TaskDraft) -> bool {
        let new = self.prepare_create(draft);
        let result = self.store.insert(&new).await;
        if !self.finish_create(result) {
            return false;
        }
        self.load().await;
        true
    }

    // Notes

    /// Open `id` for note editing, seeding the draft with its notes.
    /// Returns false if the task is not loaded.
    pub fn start_note_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.task(id) else {
            return false;
        };
        self.note_edit = Some(NoteEdit {
            task_id: id,
            draft: task.notes.clone().unwrap_or_default(),
        });
        true
    }

    pub fn set_note_draft(&mut self, text: String) {
        if let Some(edit) = self.note_edit.as_mut() {
            edit.draft = text;
        }
    }

    /// Drop the open edit without saving.
    pub fn cancel_note_edit(&mut self) {
        self.note_edit = None;
    }

    /// Apply an update result for `id`. Only that task's notes change.
    pub fn finish_save_note(
        &mut self,
        id: TaskId,
        text: String,
        result: Result<(), StoreError>,
    ) -> bool {
        if let Err(e) = result {
            error!(error = %e, id, "failed to save notes");
            return false;
        }
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.notes = Some(text);
        }
        if self.editing(id) {
            self.note_edit = None;
        }
        info!(id, "notes saved");
        true
    }

    /// Write `text` as the notes of `id`.
    pub async fn save_note(&mut self, id: TaskId, text: String) -> bool {
        let result = self.store.update_notes(id, &text).await;
        self.finish_save_note(id, text, result)
    }
}
