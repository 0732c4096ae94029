//! Task data structures and the record boundary.
//!
//! `Task` is the in-memory model the view model and renderers work with.
//! `TaskRecord` and `NewTaskRecord` mirror the rows of the remote table; all
//! string-to-type normalization happens in the conversion between the two.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::fields::{Priority, Status};

/// Identifier assigned by the remote store.
pub type TaskId = u64;

/// A tracked unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub created_at: DateTime<Utc>,
    pub task: Option<String>,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Option<Status>,
    pub trigger: Option<String>,
    pub notes: Option<String>,
    pub delivery_time: Option<String>,
}

/// Row shape returned by the remote table.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let priority = match record.priority.as_deref() {
            None => Priority::default(),
            Some(raw) => Priority::parse(raw).unwrap_or_else(|| {
                warn!(id = record.id, raw, "unparseable priority, treating as 0");
                Priority::default()
            }),
        };

        Task {
            id: record.id,
            created_at: record.created_at,
            task: record.task,
            description: record.description,
            priority,
            status: record.status.as_deref().map(Status::parse),
            trigger: record.trigger,
            notes: record.notes,
            delivery_time: record.delivery_time,
        }
    }
}

/// Fields submitted when inserting a task. The store assigns id and
/// creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub task: String,
    pub description: String,
    pub priority: Priority,
    pub trigger: String,
    pub status: Status,
}

/// Wire shape of [`NewTask`].
#[derive(Debug, Serialize)]
pub struct NewTaskRecord<'a> {
    pub task: &'a str,
    pub description: &'a str,
    pub priority: String,
    pub trigger: &'a str,
    pub status: &'a str,
}

impl<'a> From<&'a NewTask> for NewTaskRecord<'a> {
    fn from(new: &'a NewTask) -> Self {
        NewTaskRecord {
            task: &new.task,
            description: &new.description,
            priority: new.priority.to_string(),
            trigger: &new.trigger,
            status: new.status.label(),
        }
    }
}

/// Unsaved input of the creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub task: String,
    pub description: String,
    pub status: Status,
    pub trigger: String,
}

/// A creation form rule that the draft does not satisfy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Título da tarefa é obrigatório")]
    MissingTitle,
    #[error("Descrição é obrigatória")]
    MissingDescription,
    #[error("Gatilho é obrigatório")]
    MissingTrigger,
    #[error("Status '{0}' não é uma opção válida")]
    UnknownStatus(String),
}

impl TaskDraft {
    /// Check the form rules, reporting the first field that fails.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.task.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if !self.status.is_known() {
            return Err(DraftError::UnknownStatus(self.status.label().to_string()));
        }
        if self.trigger.trim().is_empty() {
            return Err(DraftError::MissingTrigger);
        }
        Ok(())
    }

    /// Build the insert payload for this draft at the given priority.
    pub fn to_new_task(&self, priority: Priority) -> NewTask {
        NewTask {
            task: self.task.clone(),
            description: self.description.clone(),
            priority,
            trigger: self.trigger.clone(),
            status: self.status.clone(),
        }
    }
}

/// Display order: ascending priority, then newest first.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort a task collection into display order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(display_order);
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::TimeZone;

    use super::*;

    /// A task with the given id and priority, created `id` minutes after a
    /// fixed epoch.
    pub fn task(id: TaskId, priority: u32) -> Task {
        Task {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
                + chrono::Duration::minutes(id as i64),
            task: Some(format!("Tarefa {id}")),
            description: Some("Descrição".to_string()),
            priority: Priority(priority),
            status: Some(Status::Pending),
            trigger: Some("Manual".to_string()),
            notes: None,
            delivery_time: None,
        }
    }

    pub fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            task: title.to_string(),
            description: "Revisar fluxo".to_string(),
            status: Status::Pending,
            trigger: "Cliente".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::{draft, task};
    use super::*;

    fn record(value: serde_json::Value) -> Task {
        serde_json::from_value::<TaskRecord>(value).unwrap().into()
    }

    #[test]
    fn test_record_conversion() {
        let t = record(json!({
            "id": 5,
            "created_at": "2024-05-01T12:30:00.123456+00:00",
            "task": "Atualizar CRM",
            "description": null,
            "priority": "3",
            "status": "EM ANDAMENTO",
            "trigger": "Reunião",
            "notes": "ligar amanhã",
            "delivery_time": null
        }));
        assert_eq!(t.id, 5);
        assert_eq!(t.priority, Priority(3));
        assert_eq!(t.status, Some(Status::InProgress));
        assert_eq!(t.notes.as_deref(), Some("ligar amanhã"));
        assert_eq!(t.description, None);
    }

    #[test]
    fn test_missing_or_bad_priority_normalizes_to_zero() {
        let base = json!({"id": 1, "created_at": "2024-05-01T12:30:00Z"});
        assert_eq!(record(base.clone()).priority, Priority(0));

        let mut bad = base.clone();
        bad["priority"] = json!("urgente");
        assert_eq!(record(bad).priority, Priority(0));

        let mut negative = base;
        negative["priority"] = json!("-2");
        assert_eq!(record(negative).priority, Priority(0));
    }

    #[test]
    fn test_new_task_record_serializes_priority_as_text() {
        let new = draft("Nova").to_new_task(Priority(6));
        let value = serde_json::to_value(NewTaskRecord::from(&new)).unwrap();
        assert_eq!(
            value,
            json!({
                "task": "Nova",
                "description": "Revisar fluxo",
                "priority": "6",
                "trigger": "Cliente",
                "status": "Pendente"
            })
        );
    }

    #[test]
    fn test_display_order() {
        // Ids double as creation order: a larger id is newer.
        let mut tasks = vec![task(1, 10), task(2, 2), task(3, 2), task(4, 0)];
        sort_tasks(&mut tasks);
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(draft("Título").validate(), Ok(()));

        let mut d = draft("  ");
        assert_eq!(d.validate(), Err(DraftError::MissingTitle));

        d = draft("Título");
        d.description.clear();
        assert_eq!(d.validate(), Err(DraftError::MissingDescription));

        d = draft("Título");
        d.trigger = " ".to_string();
        assert_eq!(d.validate(), Err(DraftError::MissingTrigger));

        d = draft("Título");
        d.status = Status::Other("Arquivado".to_string());
        assert_eq!(
            d.validate(),
            Err(DraftError::UnknownStatus("Arquivado".to_string()))
        );
    }
}
