use super::client::{
    ChatClient, ChatCompletionCallOptions, ChatCompletionRequestOptions, Completion,
    CompletionError, CompletionResult, CompletionStream, Usage,
};
use crate::{Message, MessageType};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client as OpenAIClient,
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

/// `ChatClient` backed by the OpenAI chat completions API.
///
/// A missing API key is not checked here; the first request fails instead.
#[derive(Clone)]
pub struct OpenAIChatClient {
    client: OpenAIClient<OpenAIConfig>,
}

impl std::fmt::Debug for OpenAIChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIChatClient").finish_non_exhaustive()
    }
}

impl OpenAIChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key))
    }

    /// Reads `OPENAI_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self::with_config(OpenAIConfig::new())
    }

    pub fn with_config(config: OpenAIConfig) -> Self {
        Self {
            client: OpenAIClient::with_config(config),
        }
    }

    fn create_request(
        &self,
        messages: &[Message],
        options: ChatCompletionRequestOptions,
        stream: bool,
    ) -> CompletionResult<CreateChatCompletionRequest> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(options.model).messages(messages).stream(stream);
        if let Some(temperature) = options.temperature {
            builder.temperature(temperature);
        }

        Ok(builder.build()?)
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone();
    Ok(match message.message_type {
        MessageType::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageType::Human => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageType::AI => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        _call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<Completion> {
        let request = self.create_request(&messages, options, false)?;
        debug!(model = %request.model, messages = messages.len(), "chat completion");

        let response = self.client.chat().create(request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            usage: response.usage.map(|usage| Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }

    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        options: ChatCompletionRequestOptions,
        _call_options: Option<ChatCompletionCallOptions>,
    ) -> CompletionResult<CompletionStream> {
        let request = self.create_request(&messages, options, true)?;
        debug!(model = %request.model, messages = messages.len(), "chat completion stream");

        let mut stream = self.client.chat().create_stream(request).await?;
        let stream = async_stream::stream! {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(response) => {
                        let delta = response
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.delta.content);
                        if let Some(content) = delta {
                            yield Ok(content);
                        }
                    }
                    Err(e) => {
                        yield Err(CompletionError::from(e));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request() {
        let client = OpenAIChatClient::new("sk-test");
        let messages = vec![
            Message::system("You are terse."),
            Message::human("Say hi in one sentence."),
            Message::ai("Hi."),
        ];
        let options = ChatCompletionRequestOptions::new("gpt-4o", 0.4);

        let request = client.create_request(&messages, options, false).unwrap();

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.stream, Some(false));
        assert_eq!(request.messages.len(), 3);
        assert!(matches!(
            request.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            request.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert!(matches!(
            request.messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }

    #[test]
    fn test_create_stream_request_without_temperature() {
        let client = OpenAIChatClient::new("sk-test");
        let options = ChatCompletionRequestOptions {
            model: "gpt-4o-mini".into(),
            temperature: None,
        };

        let request = client
            .create_request(&[Message::human("hello")], options, true)
            .unwrap();

        assert_eq!(request.stream, Some(true));
        assert_eq!(request.temperature, None);
    }
}
