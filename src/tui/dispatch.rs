//! Store calls issued from the UI.
//!
//! Each call runs on its own task and posts a [`StoreEvent`] back to the
//! event loop, which is the only place the view model is mutated.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::store::TaskStore;
use crate::task::{NewTask, TaskId};
use crate::tui::enums::StoreEvent;

pub type EventSender = UnboundedSender<StoreEvent>;

pub fn spawn_load(store: Arc<dyn TaskStore>, tx: EventSender) {
    tokio::spawn(async move {
        let result = store.fetch_all().await;
        let _ = tx.send(StoreEvent::Loaded(result));
    });
}

pub fn spawn_create(store: Arc<dyn TaskStore>, new: NewTask, tx: EventSender) {
    tokio::spawn(async move {
        let result = store.insert(&new).await;
        let _ = tx.send(StoreEvent::Created(result));
    });
}

pub fn spawn_save_note(store: Arc<dyn TaskStore>, id: TaskId, text: String, tx: EventSender) {
    tokio::spawn(async move {
        let result = store.update_notes(id, &text).await;
        let _ = tx.send(StoreEvent::NoteSaved { id, text, result });
    });
}
