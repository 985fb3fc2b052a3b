//! In-memory chat client for tests, benches and offline demos.

use super::client::{
    ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, Completion,
    CompletionError, CompletionResult, CompletionStream,
};
use crate::{Message, MessageType};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// One call observed by a `ScriptedChatClient`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: ChatCompletionRequestOptions,
    pub call_options: Option<ChatCompletionCallOptions>,
}

impl RecordedCall {
    /// Content of the last human message sent.
    pub fn prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.message_type == MessageType::Human)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug)]
enum Script {
    Replies(Vec<String>),
    Echo,
    Fail(String),
}

/// Deterministic `ChatClient` that records every call.
#[derive(Debug)]
pub struct ScriptedChatClient {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChatClient {
    /// Always answers with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![reply.into()])
    }

    /// Answers with `replies` in order, repeating the last one.
    pub fn with_replies<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::from_script(Script::Replies(replies.into_iter().map(Into::into).collect()))
    }

    /// Answers with `[model] <last human message>`.
    pub fn echo() -> Self {
        Self::from_script(Script::Echo)
    }

    /// Fails every call with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_script(Script::Fail(message.into()))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<Completion> {
        let call = RecordedCall {
            messages,
            options,
            call_options,
        };
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        let index = calls.len();

        let content = match &self.script {
            Script::Fail(message) => {
                calls.push(call);
                return Err(CompletionError::Provider(message.clone()));
            }
            Script::Echo => format!(
                "[{}] {}",
                call.options.model,
                call.prompt().unwrap_or_default()
            ),
            Script::Replies(replies) => replies
                .get(index)
                .or_else(|| replies.last())
                .cloned()
                .ok_or(CompletionError::EmptyResponse)?,
        };

        let model = call.options.model.clone();
        calls.push(call);
        Ok(Completion::text(model, content))
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<Completion> {
        self.record(messages, options, call_options)
    }

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<CompletionStream> {
        let completion = self.record(messages, options, call_options)?;
        let chunks: Vec<CompletionResult<String>> = completion
            .content
            .split_inclusive(' ')
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
