use crate::{Context, Message, TracingError};
use async_openai::error::OpenAIError;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OpenAI: {0}")]
    Api(#[from] OpenAIError),

    #[error(transparent)]
    Tracing(#[from] TracingError),

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("Provider: {0}")]
    Provider(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// Partial text chunks of a streamed completion. Finite and not restartable.
pub type CompletionStream = Pin<Box<dyn Stream<Item = CompletionResult<String>> + Send>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequestOptions {
    pub model: String,
    pub temperature: Option<f32>,
}

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.0;

impl Default for ChatCompletionRequestOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE.into(),
        }
    }
}

impl ChatCompletionRequestOptions {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature: Some(temperature),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatCompletionCallOptions {
    pub trace_id: Option<String>,
    pub parent_trace_id: Option<String>,
}

impl ChatCompletionCallOptions {
    pub fn new(trace_id: Option<String>, parent_trace_id: Option<String>) -> Self {
        Self {
            trace_id,
            parent_trace_id,
        }
    }
}

/// Calls made on behalf of a node are traced as children of the node's run.
impl From<&Context> for ChatCompletionCallOptions {
    fn from(ctx: &Context) -> Self {
        Self::new(None, Some(ctx.trace_id.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text returned by a chat model for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

impl Completion {
    pub fn text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
        }
    }
}

/// A chat model reachable by request/response, optionally streaming.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<Completion>;

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<CompletionStream>;
}
