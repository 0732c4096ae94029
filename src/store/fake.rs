//! In-memory store for tests, with switchable failures and call counters.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::store::{Operation, StoreError, TaskStore};
use crate::task::{NewTask, Task, TaskId};

#[derive(Default)]
pub struct FakeStore {
    tasks: Mutex<Vec<Task>>,
    inserted: Mutex<Vec<NewTask>>,
    fail_fetch: AtomicBool,
    fail_insert: AtomicBool,
    fail_update: AtomicBool,
    fetches: AtomicUsize,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

impl FakeStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        FakeStore {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, operation: Operation, failing: bool) {
        self.flag(operation).store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self, operation: Operation) -> usize {
        match operation {
            Operation::Fetch => &self.fetches,
            Operation::Insert => &self.inserts,
            Operation::Update => &self.updates,
        }
        .load(Ordering::SeqCst)
    }

    pub fn last_insert(&self) -> Option<NewTask> {
        self.inserted.lock().unwrap().last().cloned()
    }

    pub fn stored(&self, id: TaskId) -> Option<Task> {
        self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned()
    }

    fn flag(&self, operation: Operation) -> &AtomicBool {
        match operation {
            Operation::Fetch => &self.fail_fetch,
            Operation::Insert => &self.fail_insert,
            Operation::Update => &self.fail_update,
        }
    }

    fn check(&self, operation: Operation) -> Result<(), StoreError> {
        if self.flag(operation).load(Ordering::SeqCst) {
            Err(StoreError::new(operation, "connection reset"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn fetch_all(&self) -> Result<Vec<Task>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check(Operation::Fetch)?;
        // The remote column is text, so its ordering is lexicographic.
        let mut tasks = self.tasks.lock().unwrap().clone();
        tasks.sort_by(|a, b| {
            a.priority
                .to_string()
                .cmp(&b.priority.to_string())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(tasks)
    }

    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check(Operation::Insert)?;
        self.inserted.lock().unwrap().push(task.clone());

        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let stored = Task {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
                + Duration::minutes(id as i64),
            task: Some(task.task.clone()),
            description: Some(task.description.clone()),
            priority: task.priority,
            status: Some(task.status.clone()),
            trigger: Some(task.trigger.clone()),
            notes: None,
            delivery_time: None,
        };
        tasks.push(stored.clone());
        Ok(vec![stored])
    }

    async fn update_notes(&self, id: TaskId, notes: &str) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check(Operation::Update)?;
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.notes = Some(notes.to_string());
                Ok(())
            }
            None => Err(StoreError::new(Operation::Update, format!("no task {id}"))),
        }
    }
}
