//! HTTP clients for the Databricks vector search index and model serving
//! endpoint that back retrieval and generation.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{resolve_host, resolve_token, Settings};
use crate::error::{Error, Result};
use crate::generation::GenerationBackend;
use crate::retrieval::{RetrievalBackend, RetrievedDocument};

const RETRIEVAL: &str = "retrieval";
const GENERATION: &str = "generation";

fn build_client(backend: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::service(backend, format!("failed to build http client: {e}")))
}

fn describe_transport_error(error: &reqwest::Error, url: &str, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("request to {url} timed out after {}s", timeout.as_secs())
    } else if error.is_connect() {
        format!("failed to reach {url}: {error}")
    } else {
        format!("request to {url} failed: {error}")
    }
}

/// Returns the response if its status is a success, or the status and body.
fn check_status(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(format!("http error {status}: {body}"))
}

#[derive(Serialize, Debug)]
struct QueryRequest<'a> {
    query_text: &'a str,
    columns: [&'a str; 2],
    num_results: usize,
}

#[derive(Deserialize, Debug, Default)]
struct ColumnInfo {
    name: String,
}

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    columns: Vec<ColumnInfo>,
}

#[derive(Deserialize, Debug, Default)]
struct QueryResult {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    manifest: Manifest,
    #[serde(default)]
    result: QueryResult,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Maps the positional rows of a query response to documents, locating the
/// command and summary columns by name. Rows without a command are skipped.
fn documents_from_response(
    response: QueryResponse,
    command_column: &str,
    summary_column: &str,
) -> Result<Vec<RetrievedDocument>> {
    let position = |column: &str| {
        response
            .manifest
            .columns
            .iter()
            .position(|info| info.name == column)
    };

    if response.result.data_array.is_empty() {
        return Ok(Vec::new());
    }

    let (Some(command_index), Some(summary_index)) =
        (position(command_column), position(summary_column))
    else {
        return Err(Error::service(
            RETRIEVAL,
            format!("response is missing the `{command_column}` or `{summary_column}` column"),
        ));
    };

    Ok(response
        .result
        .data_array
        .iter()
        .filter_map(|row| {
            let command = cell_text(row.get(command_index)?);
            if command.trim().is_empty() {
                return None;
            }
            let summary = row.get(summary_index).map(cell_text).unwrap_or_default();
            Some(RetrievedDocument { command, summary })
        })
        .collect())
}

pub struct VectorSearchClient {
    client: Client,
    host: String,
    token: String,
    timeout: Duration,
    index_name: String,
    command_column: String,
    summary_column: String,
}

impl VectorSearchClient {
    /// # Errors
    ///
    /// Returns an error if no host or token is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let retrieval = &settings.retrieval;
        Ok(Self {
            client: build_client(RETRIEVAL, settings.timeout())?,
            host: resolve_host(&retrieval.host, RETRIEVAL)?,
            token: resolve_token()?,
            timeout: settings.timeout(),
            index_name: retrieval.index_name().to_string(),
            command_column: retrieval.command_column().to_string(),
            summary_column: retrieval.summary_column().to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/api/2.0/vector-search/indexes/{}/query",
            self.host, self.index_name
        )
    }
}

impl RetrievalBackend for VectorSearchClient {
    fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        let url = self.url();
        let request = QueryRequest {
            query_text: text,
            columns: [self.command_column.as_str(), self.summary_column.as_str()],
            num_results: k,
        };
        debug!("Querying {url} for {k} document(s)");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .map_err(|e| Error::service(RETRIEVAL, describe_transport_error(&e, &url, self.timeout)))?;

        let response = check_status(response).map_err(|e| Error::service(RETRIEVAL, e))?;

        let parsed: QueryResponse = response
            .json()
            .map_err(|e| Error::service(RETRIEVAL, format!("returned invalid JSON: {e}")))?;

        documents_from_response(parsed, &self.command_column, &self.summary_column)
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn content_from_response(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::generation("the serving endpoint returned no choices"))
}

pub struct ServingEndpointClient {
    client: Client,
    host: String,
    token: String,
    timeout: Duration,
    endpoint: String,
}

impl ServingEndpointClient {
    /// # Errors
    ///
    /// Returns an error if no host or token is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let generation = &settings.generation;
        Ok(Self {
            client: build_client(GENERATION, settings.timeout())?,
            host: resolve_host(&generation.host, GENERATION)?,
            token: resolve_token()?,
            timeout: settings.timeout(),
            endpoint: generation.endpoint().to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/serving-endpoints/{}/invocations", self.host, self.endpoint)
    }
}

impl GenerationBackend for ServingEndpointClient {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = self.url();
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
        };
        debug!("Requesting a completion of at most {max_tokens} tokens from {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .map_err(|e| Error::generation(describe_transport_error(&e, &url, self.timeout)))?;

        let response = check_status(response).map_err(Error::generation)?;

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::generation(format!("returned invalid JSON: {e}")))?;

        content_from_response(parsed)
    }
}
