use crate::completion::{
    ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, CompletionResult,
};
use crate::{Context, Message};
use std::fmt;
use std::sync::Arc;

/// A model persona: who it is, what it wants, and which model speaks for it.
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    client: Arc<dyn ChatClient>,
    options: ChatCompletionRequestOptions,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        client: Arc<dyn ChatClient>,
        options: ChatCompletionRequestOptions,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            client,
            options,
        }
    }

    pub fn options(&self) -> &ChatCompletionRequestOptions {
        &self.options
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    /// One system + human exchange with the agent's model.
    pub async fn respond(&self, ctx: &Context, message: impl Into<String>) -> CompletionResult<String> {
        let completion = self
            .client
            .complete(
                vec![Message::system(self.system_prompt()), Message::human(message)],
                self.options.clone(),
                Some(ChatCompletionCallOptions::from(ctx)),
            )
            .await?;
        Ok(completion.content)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("options", &self.options)
            .finish()
    }
}
