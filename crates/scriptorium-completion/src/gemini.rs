//! Google Gemini `generateContent` adapter
//!
//! System messages become `systemInstruction`, assistant turns use role
//! `model`, structured output goes through [`to_gemini_schema`], and search
//! grounding metadata is lifted into [`GroundingMetadata`].

use crate::completion::{
    Completion, GroundingMetadata, GroundingSource, GroundingSupport, TokenUsage,
};
use crate::error::CompletionError;
use crate::message::{CompletionOptions, Message, OutputFormat, Role};
use crate::provider::{finish_payload, CompletionProvider, ProviderKind};
use crate::schema::to_gemini_schema;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default API root
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini backend
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    /// Create provider with the default API root
    #[must_use]
    pub fn new(api_key: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            default_model: default_model.into(),
        }
    }

    /// With a different API root
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

    fn model<'a>(&'a self, options: &'a CompletionOptions) -> &'a str {
        options.model.as_deref().unwrap_or(&self.default_model)
    }
}

fn build_request(messages: &[Message], options: &CompletionOptions) -> GenerateRequest {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let system_instruction = (!system.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part {
            text: system.join("\n\n"),
        }],
    });

    let contents = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| Content {
            role: Some(if m.role == Role::Assistant { "model" } else { "user" }),
            parts: vec![Part {
                text: m.content.clone(),
            }],
        })
        .collect();

    let (response_mime_type, response_schema) = match &options.output {
        OutputFormat::Text => (None, None),
        OutputFormat::JsonSchema { schema, .. } => {
            (Some("application/json"), Some(to_gemini_schema(schema)))
        }
    };

    let tools = if options.grounded {
        vec![Tool {
            google_search: GoogleSearch {},
        }]
    } else {
        Vec::new()
    };

    GenerateRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            response_mime_type,
            response_schema,
        },
        tools,
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError> {
        let model = self.model(options);
        let body = build_request(messages, options);
        tracing::debug!(
            "gemini request: model={} messages={} grounded={}",
            model,
            messages.len(),
            options.grounded
        );

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                provider: ProviderKind::Gemini,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        into_completion(parsed, model, &options.output)
    }
}

fn into_completion(
    response: GenerateResponse,
    requested_model: &str,
    output: &OutputFormat,
) -> Result<Completion, CompletionError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyResponse(ProviderKind::Gemini))?;

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(CompletionError::Refusal {
            provider: ProviderKind::Gemini,
            message: "blocked by safety filters".to_string(),
        });
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse(ProviderKind::Gemini));
    }

    let grounding = candidate
        .grounding_metadata
        .map(parse_grounding)
        .filter(|g| !g.is_empty());

    Ok(Completion {
        payload: finish_payload(text, output)?,
        model: response
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        usage: response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        }),
        grounding,
    })
}

fn parse_grounding(raw: RawGrounding) -> GroundingMetadata {
    GroundingMetadata {
        queries: raw.web_search_queries,
        sources: raw
            .grounding_chunks
            .into_iter()
            .map(|chunk| {
                let web = chunk.web.unwrap_or_default();
                GroundingSource {
                    uri: web.uri,
                    title: web.title,
                }
            })
            .collect(),
        supports: raw
            .grounding_supports
            .into_iter()
            .map(|support| GroundingSupport {
                text: support.segment.and_then(|s| s.text).unwrap_or_default(),
                source_indices: support.grounding_chunk_indices,
                confidence: support.confidence_scores,
            })
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<RawGrounding>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGrounding {
    #[serde(default)]
    web_search_queries: Vec<String>,
    #[serde(default)]
    grounding_chunks: Vec<RawChunk>,
    #[serde(default)]
    grounding_supports: Vec<RawSupport>,
}

#[derive(Debug, Deserialize)]
struct RawChunk {
    web: Option<RawWeb>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWeb {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSupport {
    segment: Option<RawSegment>,
    #[serde(default)]
    grounding_chunk_indices: Vec<usize>,
    #[serde(default)]
    confidence_scores: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    text: Option<String>,
}
