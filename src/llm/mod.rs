//! LLM client abstraction and chat types.
//!
//! The agent loop talks to the reasoning model only through the
//! [`LlmClient`] trait, so tests can substitute a scripted client.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

/// Message roles in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Name of the tool to invoke
    pub name: String,

    /// Structured arguments as produced by the model
    pub args: Value,
}

/// A single message in the conversation history.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,

    /// Text content, if any
    pub content: Option<String>,

    /// Tool calls attached to an assistant message
    pub tool_calls: Vec<ToolCall>,

    /// For `Role::Tool` messages: name of the tool this result answers
    pub responds_to: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            responds_to: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            responds_to: None,
        }
    }

    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            responds_to: None,
        }
    }

    pub fn tool_result(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            responds_to: Some(tool_name.into()),
        }
    }
}

/// Declaration of a tool the model may call.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,

    /// JSON schema for the tool's arguments
    pub parameters: Value,
}

/// One model turn: free text, tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// A chat-completion backend with function calling.
///
/// Model identifier and sampling temperature are fixed at construction;
/// the loop supplies only the conversation and the tool declarations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, LlmError>;
}
