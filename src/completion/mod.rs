mod client;
mod openai;
mod scripted;
mod trace;

pub use client::{
    ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, Completion,
    CompletionError, CompletionResult, CompletionStream, Usage,
};
pub use openai::OpenAIChatClient;
pub use scripted::{RecordedCall, ScriptedChatClient};
pub use trace::{LangSmithTracer, TracedChatClient, TracingError, TracingProvider};
