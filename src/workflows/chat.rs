//! One-node conversation graph: the model's reply is appended to the messages.

use crate::completion::{ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions};
use crate::{
    Built, Context, Graph, GraphResult, Message, MessagesState, MessagesStateUpdate, Node,
    NodeOutput, NodeResult,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub struct ChatNode {
    name: String,
    client: Arc<dyn ChatClient>,
    options: ChatCompletionRequestOptions,
}

impl ChatNode {
    pub fn new(
        name: impl Into<String>,
        client: Arc<dyn ChatClient>,
        options: ChatCompletionRequestOptions,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            options,
        }
    }
}

impl fmt::Debug for ChatNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatNode")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

#[async_trait]
impl Node<MessagesState> for ChatNode {
    async fn process(&self, ctx: &Context, state: MessagesState) -> NodeResult<MessagesState> {
        let completion = self
            .client
            .complete(
                state.messages,
                self.options.clone(),
                Some(ChatCompletionCallOptions::from(ctx)),
            )
            .await?;

        Ok(NodeOutput::Updates(vec![MessagesStateUpdate::Messages(
            vec![Message::ai(completion.content)],
        )]))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `START -> chat -> END`
pub fn chat_graph(node: ChatNode) -> GraphResult<Graph<MessagesState, Built>> {
    let name = node.name().to_string();
    let mut graph = Graph::new("chat_graph");
    graph
        .add_node(node)
        .set_entry_point(name.clone())
        .set_finish_point(name);
    graph.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ScriptedChatClient;
    use crate::MessageType;

    #[tokio::test]
    async fn test_chat_graph_appends_reply() {
        let client = Arc::new(ScriptedChatClient::new("LangGraph wires LLM calls into graphs."));
        let graph = chat_graph(ChatNode::new(
            "chat",
            client.clone(),
            ChatCompletionRequestOptions::new("gpt-4o", 0.0),
        ))
        .unwrap();

        let result = graph
            .invoke(MessagesState::from_human("Explain LangGraph in 1 sentence."))
            .await
            .unwrap();

        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[1].message_type, MessageType::AI);
        assert_eq!(
            result.messages[1].content,
            "LangGraph wires LLM calls into graphs."
        );

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages, vec![Message::human("Explain LangGraph in 1 sentence.")]);
        assert_eq!(calls[0].options.model, "gpt-4o");
    }
}
