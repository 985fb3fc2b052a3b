use super::client::{
    ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, Completion,
    CompletionResult, CompletionStream,
};
use crate::Message;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

const LANGSMITH_API_URL: &str = "https://api.smith.langchain.com";

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("Tracing HttpError: {0}")]
    HttpError(String),
    #[error("Tracing Other: {0}")]
    Other(String),
}

/// Sink for run records. Each run is opened once and closed once.
#[async_trait]
pub trait TracingProvider: Send + Sync {
    async fn start_trace(
        &self,
        trace_id: &str,
        name: &str,
        trace_type: &str,
        inputs: &Value,
        parent_trace_id: Option<String>,
        start_time: Option<SystemTime>,
    ) -> Result<(), TracingError>;

    async fn end_trace(
        &self,
        trace_id: &str,
        outputs: &Value,
        end_time: Option<SystemTime>,
    ) -> Result<(), TracingError>;
}

/// Posts runs to the LangSmith REST API.
pub struct LangSmithTracer {
    pub base_url: String,
    pub api_key: String,
    pub http_client: Client,
}

impl LangSmithTracer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: LANGSMITH_API_URL.to_string(),
            api_key: api_key.into(),
            http_client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn check(resp: reqwest::Response, action: &str) -> Result<(), TracingError> {
        if resp.status().is_success() {
            return Ok(());
        }
        let status = resp.status();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());
        Err(TracingError::HttpError(format!(
            "{} failed: HTTP {} - {}",
            action, status, text
        )))
    }
}

fn rfc3339(time: Option<SystemTime>) -> String {
    DateTime::<Utc>::from(time.unwrap_or_else(SystemTime::now))
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Serialize)]
struct StartRunBody<'a> {
    id: &'a str,
    name: &'a str,
    run_type: &'a str,
    inputs: &'a Value,
    start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_run_id: Option<String>,
}

#[derive(Serialize)]
struct EndRunBody<'a> {
    outputs: &'a Value,
    end_time: String,
}

#[async_trait]
impl TracingProvider for LangSmithTracer {
    async fn start_trace(
        &self,
        trace_id: &str,
        name: &str,
        trace_type: &str,
        inputs: &Value,
        parent_trace_id: Option<String>,
        start_time: Option<SystemTime>,
    ) -> Result<(), TracingError> {
        let body = StartRunBody {
            id: trace_id,
            name,
            run_type: trace_type,
            inputs,
            start_time: rfc3339(start_time),
            parent_run_id: parent_trace_id,
        };

        let resp = self
            .http_client
            .post(format!("{}/runs", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| TracingError::HttpError(err.to_string()))?;

        Self::check(resp, "start_trace").await
    }

    async fn end_trace(
        &self,
        trace_id: &str,
        outputs: &Value,
        end_time: Option<SystemTime>,
    ) -> Result<(), TracingError> {
        let body = EndRunBody {
            outputs,
            end_time: rfc3339(end_time),
        };

        let resp = self
            .http_client
            .patch(format!("{}/runs/{}", self.base_url, trace_id))
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| TracingError::HttpError(err.to_string()))?;

        Self::check(resp, "end_trace").await
    }
}

/// Wraps a `ChatClient` and records every call as a run.
///
/// A tracer failure while opening the run fails the call; a failure while
/// closing it is logged.
pub struct TracedChatClient<C> {
    inner: C,
    tracer: Arc<dyn TracingProvider>,
}

impl<C> TracedChatClient<C> {
    pub fn new(inner: C, tracer: Arc<dyn TracingProvider>) -> Self {
        Self { inner, tracer }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

fn trace_ids(call_options: Option<ChatCompletionCallOptions>) -> (String, Option<String>) {
    let call_options = call_options.unwrap_or_default();
    let trace_id = call_options
        .trace_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    (trace_id, call_options.parent_trace_id)
}

fn trace_inputs(messages: &[Message], options: &ChatCompletionRequestOptions) -> Value {
    let messages = serde_json::to_value(messages)
        .unwrap_or_else(|_| json!({ "error": "Failed to serialize messages" }));
    json!({
        "messages": messages,
        "model": options.model,
        "temperature": options.temperature,
    })
}

#[async_trait]
impl<C> ChatClient for TracedChatClient<C>
where
    C: ChatClient,
{
    async fn complete(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<Completion> {
        let (trace_id, parent_trace_id) = trace_ids(call_options);
        let inputs = trace_inputs(&messages, &options);

        self.tracer
            .start_trace(
                &trace_id,
                "chat_completion",
                "llm",
                &inputs,
                parent_trace_id.clone(),
                Some(SystemTime::now()),
            )
            .await?;

        let call_options = ChatCompletionCallOptions::new(Some(trace_id.clone()), parent_trace_id);
        let result = self.inner.complete(messages, options, Some(call_options)).await;

        let outputs = match &result {
            Ok(completion) => serde_json::to_value(completion)
                .unwrap_or_else(|_| json!({ "error": "Failed to serialize response" })),
            Err(e) => json!({ "error": e.to_string() }),
        };
        if let Err(e) = self
            .tracer
            .end_trace(&trace_id, &outputs, Some(SystemTime::now()))
            .await
        {
            tracing::warn!(trace_id = %trace_id, error = %e, "failed to end trace");
        }

        result
    }

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<CompletionStream> {
        let (trace_id, parent_trace_id) = trace_ids(call_options);
        let inputs = trace_inputs(&messages, &options);

        self.tracer
            .start_trace(
                &trace_id,
                "chat_completion_stream",
                "llm",
                &inputs,
                parent_trace_id.clone(),
                Some(SystemTime::now()),
            )
            .await?;

        let call_options = ChatCompletionCallOptions::new(Some(trace_id.clone()), parent_trace_id);
        let mut inner = self
            .inner
            .complete_stream(messages, options, Some(call_options))
            .await?;
        let tracer = self.tracer.clone();

        let stream = async_stream::stream! {
            let mut full_response = String::new();
            let mut error = None;
            while let Some(chunk) = inner.next().await {
                match &chunk {
                    Ok(text) => full_response.push_str(text),
                    Err(e) => error = Some(e.to_string()),
                }
                yield chunk;
            }

            // End trace after we finish streaming
            let outputs = match error {
                Some(error) => json!({ "streamed_content": full_response, "error": error }),
                None => json!({ "streamed_content": full_response }),
            };
            if let Err(e) = tracer.end_trace(&trace_id, &outputs, Some(SystemTime::now())).await {
                tracing::warn!(trace_id = %trace_id, error = %e, "failed to end stream trace");
            }
        };

        Ok(Box::pin(stream))
    }
}
