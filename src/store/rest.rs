//! PostgREST client for the remote task table.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::StoreSettings;
use crate::store::{Operation, StoreError, TaskStore};
use crate::task::{NewTask, NewTaskRecord, Task, TaskId, TaskRecord};

/// Ordering requested from the remote table.
const ORDER: &str = "priority.asc,created_at.desc";

/// The client could not be built from the configured settings.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid store endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("API key is not a valid header value")]
    ApiKey(#[from] InvalidHeaderValue),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct NotesPatch<'a> {
    notes: &'a str,
}

/// Task store backed by a PostgREST table.
pub struct RestStore {
    client: Client,
    endpoint: Url,
}

impl RestStore {
    /// Build a client for `{url}/rest/v1/{table}` authenticated with the
    /// configured key.
    pub fn new(settings: &StoreSettings) -> Result<Self, SetupError> {
        let endpoint = settings
            .url
            .join(&format!("rest/v1/{}", settings.table))?;

        let key = settings.api_key.expose_secret();
        let mut api_key = HeaderValue::from_str(key)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .user_agent(concat!("task_board/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(RestStore { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Turn a non-2xx response into a store error, keeping the body for the log.
async fn check(operation: Operation, response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::new(operation, format!("HTTP {status}: {body}")))
}

async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, StoreError> {
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::new(operation, format!("invalid response body: {e}")))
}

fn transport(operation: Operation) -> impl Fn(reqwest::Error) -> StoreError {
    move |e| StoreError::new(operation, e.to_string())
}

fn into_tasks(records: Vec<TaskRecord>) -> Vec<Task> {
    records.into_iter().map(Task::from).collect()
}

#[async_trait]
impl TaskStore for RestStore {
    async fn fetch_all(&self) -> Result<Vec<Task>, StoreError> {
        debug!(endpoint = %self.endpoint, "fetching tasks");
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", "*"), ("order", ORDER)])
            .send()
            .await
            .map_err(transport(Operation::Fetch))?;

        let response = check(Operation::Fetch, response).await?;
        let records: Vec<TaskRecord> = decode(Operation::Fetch, response).await?;
        debug!(count = records.len(), "fetched tasks");
        Ok(into_tasks(records))
    }

    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError> {
        debug!(priority = %task.priority, "inserting task");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(&[NewTaskRecord::from(task)])
            .send()
            .await
            .map_err(transport(Operation::Insert))?;

        let response = check(Operation::Insert, response).await?;
        let records: Vec<TaskRecord> = decode(Operation::Insert, response).await?;
        Ok(into_tasks(records))
    }

    async fn update_notes(&self, id: TaskId, notes: &str) -> Result<(), StoreError> {
        debug!(id, "updating notes");
        let response = self
            .client
            .patch(self.endpoint.clone())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&NotesPatch { notes })
            .send()
            .await
            .map_err(transport(Operation::Update))?;

        check(Operation::Update, response).await?;
        Ok(())
    }
}
