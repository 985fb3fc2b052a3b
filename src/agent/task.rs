use super::Agent;
use serde::{Deserialize, Serialize};

/// A unit of work handed to one agent.
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub expected_output: Option<String>,
    pub agent: Agent,
    /// Indices of earlier tasks whose outputs go into the prompt. `None`
    /// means the output of the task right before this one.
    pub context: Option<Vec<usize>>,
}

impl Task {
    pub fn new(description: impl Into<String>, agent: Agent) -> Self {
        Self {
            description: description.into(),
            expected_output: None,
            agent,
            context: None,
        }
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = Some(expected_output.into());
        self
    }

    pub fn with_context(mut self, tasks: impl IntoIterator<Item = usize>) -> Self {
        self.context = Some(tasks.into_iter().collect());
        self
    }

    /// Tasks whose outputs this one reads when it runs at `index`.
    pub(crate) fn context_indices(&self, index: usize) -> Vec<usize> {
        match &self.context {
            Some(indices) => indices.clone(),
            None if index > 0 => vec![index - 1],
            None => vec![],
        }
    }

    pub(crate) fn prompt(&self, context: &[&str]) -> String {
        let mut prompt = self.description.clone();
        if let Some(expected) = &self.expected_output {
            prompt.push_str("\n\nThis is the expected criteria for your final answer: ");
            prompt.push_str(expected);
        }
        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&context.join("\n\n"));
        }
        prompt
    }
}

/// What an agent produced for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub description: String,
    pub agent: String,
    pub raw: String,
}
