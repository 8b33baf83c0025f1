//! OpenAI chat-completions adapter

use crate::completion::{Completion, TokenUsage};
use crate::error::CompletionError;
use crate::message::{CompletionOptions, Message, OutputFormat, Role};
use crate::provider::{finish_payload, CompletionProvider, ProviderKind};
use crate::schema::to_openai_schema;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default API root
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI backend
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: String,
    strict_schema: bool,
}

impl OpenAiProvider {
    /// Create provider with the default API root
    #[must_use]
    pub fn new(api_key: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            default_model: default_model.into(),
            strict_schema: true,
        }
    }

    /// With a different API root (proxies, compatible servers)
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// With a shared HTTP client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Toggle `strict` on JSON-schema output
    #[inline]
    #[must_use]
    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        options: &'a CompletionOptions,
    ) -> ChatRequest<'a> {
        let response_format = match &options.output {
            OutputFormat::Text => None,
            OutputFormat::JsonSchema { name, schema } => Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: name.as_str(),
                    schema: to_openai_schema(schema),
                    strict: self.strict_schema,
                },
            }),
        };

        if options.grounded {
            tracing::debug!("openai provider ignores search grounding");
        }

        ChatRequest {
            model: options.model.as_deref().unwrap_or(&self.default_model),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: role_name(m.role),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_completion_tokens: options.max_output_tokens,
            response_format,
        }
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError> {
        let body = self.build_request(messages, options);
        tracing::debug!("openai request: model={} messages={}", body.model, messages.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                provider: ProviderKind::OpenAi,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        into_completion(parsed, &options.output)
    }
}

fn into_completion(
    response: ChatResponse,
    output: &OutputFormat,
) -> Result<Completion, CompletionError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(CompletionError::EmptyResponse(ProviderKind::OpenAi))?;

    if let Some(refusal) = message.refusal {
        return Err(CompletionError::Refusal {
            provider: ProviderKind::OpenAi,
            message: refusal,
        });
    }

    let text = message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse(ProviderKind::OpenAi))?;

    Ok(Completion {
        payload: finish_payload(text, output)?,
        model: response.model,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
        grounding: None,
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat<'a> {
    JsonSchema { json_schema: JsonSchemaFormat<'a> },
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Payload;
    use serde_json::json;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("sk-test", "gpt-4o-mini")
    }

    #[test]
    fn request_text_shape() {
        let provider = provider();
        let messages = vec![Message::system("be brief"), Message::user("John 3:16")];
        let options = CompletionOptions::new().with_temperature(0.2);

        let body = serde_json::to_value(provider.build_request(&messages, &options)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "John 3:16");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn request_structured_shape() {
        let provider = provider().with_strict_schema(false);
        let messages = vec![Message::user("x")];
        let options = CompletionOptions::new()
            .with_model("gpt-4.1")
            .with_output(OutputFormat::JsonSchema {
                name: "commentary".into(),
                schema: json!({ "$schema": "s", "type": "object" }),
            });

        let body = serde_json::to_value(provider.build_request(&messages, &options)).unwrap();
        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "commentary");
        assert_eq!(body["response_format"]["json_schema"]["strict"], false);
        assert!(body["response_format"]["json_schema"]["schema"]
            .get("$schema")
            .is_none());
    }

    #[test]
    fn response_to_completion() {
        let raw: ChatResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini-2024",
            "choices": [{ "message": { "role": "assistant", "content": "Grace." } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12 }
        }))
        .unwrap();

        let completion = into_completion(raw, &OutputFormat::Text).unwrap();
        assert_eq!(completion.payload, Payload::Text("Grace.".into()));
        assert_eq!(completion.model, "gpt-4o-mini-2024");
        assert_eq!(completion.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn response_refusal_and_empty() {
        let refused: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": null, "refusal": "no" } }]
        }))
        .unwrap();
        assert!(matches!(
            into_completion(refused, &OutputFormat::Text),
            Err(CompletionError::Refusal { .. })
        ));

        let empty: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(
            into_completion(empty, &OutputFormat::Text),
            Err(CompletionError::EmptyResponse(ProviderKind::OpenAi))
        ));
    }
}
