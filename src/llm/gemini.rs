//! Gemini REST client (`models/{model}:generateContent`).
//!
//! Translates the neutral chat types into Gemini's wire format:
//! the system message becomes `systemInstruction`, assistant turns
//! become `model` contents, and tool results are sent back as
//! `functionResponse` parts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, Role, ToolCall, ToolSchema};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for Google's Generative Language API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a client bound to a fixed model and sampling temperature.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Override the API base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, LlmError> {
        let request = build_request(messages, tools, self.temperature);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        parse_response(body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireToolGroup>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireToolGroup {
    function_declarations: Vec<WireFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct WireFunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

/// One content part. Exactly one of the fields is set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<WireFunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<WireContent>,
}

fn build_request(
    messages: &[ChatMessage],
    tools: &[ToolSchema],
    temperature: f32,
) -> GenerateContentRequest {
    let mut system_instruction = None;
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => {
                system_instruction = Some(WireContent {
                    role: None,
                    parts: vec![text_part(message.content.clone().unwrap_or_default())],
                });
            }
            Role::User => contents.push(WireContent {
                role: Some("user".to_string()),
                parts: vec![text_part(message.content.clone().unwrap_or_default())],
            }),
            Role::Assistant => {
                let mut parts = Vec::new();
                if let Some(text) = &message.content {
                    if !text.is_empty() {
                        parts.push(text_part(text.clone()));
                    }
                }
                for call in &message.tool_calls {
                    parts.push(WirePart {
                        text: None,
                        function_call: Some(WireFunctionCall {
                            name: call.name.clone(),
                            args: call.args.clone(),
                        }),
                        function_response: None,
                    });
                }
                contents.push(WireContent {
                    role: Some("model".to_string()),
                    parts,
                });
            }
            // Tool results travel as user-role functionResponse parts.
            Role::Tool => contents.push(WireContent {
                role: Some("user".to_string()),
                parts: vec![WirePart {
                    text: None,
                    function_call: None,
                    function_response: Some(WireFunctionResponse {
                        name: message.responds_to.clone().unwrap_or_default(),
                        response: json!({
                            "result": message.content.clone().unwrap_or_default()
                        }),
                    }),
                }],
            }),
        }
    }

    let tools = if tools.is_empty() {
        Vec::new()
    } else {
        vec![WireToolGroup {
            function_declarations: tools
                .iter()
                .map(|t| WireFunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect(),
        }]
    };

    GenerateContentRequest {
        system_instruction,
        contents,
        tools,
        generation_config: GenerationConfig { temperature },
    }
}

fn text_part(text: String) -> WirePart {
    WirePart {
        text: Some(text),
        function_call: None,
        function_response: None,
    }
}

fn parse_response(body: GenerateContentResponse) -> Result<ChatResponse, LlmError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Malformed("response contained no candidates".to_string()))?;

    let content = candidate
        .content
        .ok_or_else(|| LlmError::Malformed("candidate contained no content".to_string()))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in content.parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(call) = part.function_call {
            tool_calls.push(ToolCall {
                name: call.name,
                args: call.args,
            });
        }
    }

    Ok(ChatResponse {
        content: if text.is_empty() { None } else { Some(text) },
        tool_calls,
    })
}
