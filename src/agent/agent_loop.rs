//! Core agent loop implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, Secrets};
use crate::llm::{ChatMessage, GeminiClient, LlmClient, LlmError};
use crate::tools::{web::TavilySearch, ToolRegistry};

use super::prompt::build_system_prompt;
use super::ResearchInvoker;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Step budget ({0}) exhausted without a final answer")]
    StepBudgetExhausted(usize),

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Kinds of entries in a run's step trace.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Model is thinking / planning
    Thinking,
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Model produced the final summary
    Response,
}

/// A single entry in a run's step trace.
#[derive(Debug, Clone, Serialize)]
pub struct StepTrace {
    pub timestamp: DateTime<Utc>,
    pub kind: StepKind,
    pub content: String,
}

/// Outcome of one completed research run.
#[derive(Debug, Clone)]
pub struct ResearchRun {
    /// The final Markdown summary
    pub summary: String,

    /// Think/act steps taken before the final answer
    pub steps: usize,

    /// Diagnostic trace of the run (not part of the display contract)
    pub trace: Vec<StepTrace>,
}

/// The research agent: a Gemini client plus the search tool, driven by
/// a bounded think/act loop.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_steps: usize,
}

impl Agent {
    /// Create an agent from the loaded configuration and credentials.
    pub fn new(config: &Config, secrets: &Secrets) -> Self {
        let llm = Arc::new(GeminiClient::new(
            secrets.google_api_key.clone(),
            config.model.clone(),
            config.temperature,
        ));

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(TavilySearch::new(
            secrets.tavily_api_key.clone(),
            config.search_max_results,
        )));

        Self {
            llm,
            tools,
            max_steps: config.max_steps,
        }
    }

    /// Assemble an agent from parts (useful for testing).
    pub fn with_parts(llm: Arc<dyn LlmClient>, tools: ToolRegistry, max_steps: usize) -> Self {
        Self {
            llm,
            tools,
            max_steps,
        }
    }
}

#[async_trait]
impl ResearchInvoker for Agent {
    /// Run the think/act loop once with the given instruction.
    ///
    /// Errors from the LLM client propagate unmodified; tool failures do
    /// not abort the run but are fed back to the model as tool results
    /// so it can recover.
    async fn invoke(&self, instruction: &str) -> Result<ResearchRun, AgentError> {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, "Starting research run");

        let mut trace = Vec::new();

        let mut messages = vec![
            ChatMessage::system(build_system_prompt(&self.tools)),
            ChatMessage::user(instruction),
        ];

        let tool_schemas = self.tools.schemas();

        for step in 0..self.max_steps {
            tracing::debug!("Agent step {}", step + 1);

            let response = self
                .llm
                .chat_completion(&messages, &tool_schemas)
                .await?;

            if !response.tool_calls.is_empty() {
                if let Some(thought) = &response.content {
                    tracing::debug!("Model thought: {}", truncate_for_log(thought, 500));
                    trace.push(entry(StepKind::Thinking, truncate_for_log(thought, 500)));
                }

                messages.push(ChatMessage::assistant(
                    response.content.clone(),
                    response.tool_calls.clone(),
                ));

                for call in &response.tool_calls {
                    tracing::info!("Calling tool: {} with args: {}", call.name, call.args);
                    trace.push(entry(
                        StepKind::ToolCall,
                        format!("Calling tool: {} with args: {}", call.name, call.args),
                    ));

                    // Failures become tool results so the model can correct
                    // itself (unknown tool, bad arguments, search errors).
                    let result_str = match self.tools.execute(&call.name, call.args.clone()).await
                    {
                        Ok(output) => output,
                        Err(e) => format!("Error: {}", e),
                    };

                    tracing::debug!("Tool result: {}", truncate_for_log(&result_str, 500));
                    trace.push(entry(
                        StepKind::ToolResult,
                        truncate_for_log(&result_str, 1000),
                    ));

                    messages.push(ChatMessage::tool_result(call.name.clone(), result_str));
                }

                continue;
            }

            // No tool calls - this is the final summary
            if let Some(content) = response.content {
                tracing::info!("Run complete after {} steps", step + 1);
                trace.push(entry(StepKind::Response, truncate_for_log(&content, 2000)));
                return Ok(ResearchRun {
                    summary: content,
                    steps: step + 1,
                    trace,
                });
            }

            // Empty response - shouldn't happen but handle gracefully
            return Err(AgentError::EmptyResponse);
        }

        Err(AgentError::StepBudgetExhausted(self.max_steps))
    }
}

fn entry(kind: StepKind, content: String) -> StepTrace {
    StepTrace {
        timestamp: Utc::now(),
        kind,
        content,
    }
}

/// Truncate a string for logging, never splitting a UTF-8 character.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut idx = max_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    format!("{}... [truncated]", &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatResponse, ToolSchema};
    use crate::tools::Tool;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// LLM client that replays a fixed script of responses.
    struct ScriptedLlm {
        script: Mutex<Vec<Result<ChatResponse, LlmError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedLlm {
        fn new(script: Vec<Result<ChatResponse, LlmError>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolSchema],
        ) -> Result<ChatResponse, LlmError> {
            *self.calls.lock().expect("lock") += 1;
            let mut script = self.script.lock().expect("lock");
            if script.is_empty() {
                return Err(LlmError::Malformed("script exhausted".to_string()));
            }
            script.remove(0)
        }
    }

    struct FixedSearch;

    #[async_trait]
    impl Tool for FixedSearch {
        fn name(&self) -> &str {
            "web_search"
        }

        fn description(&self) -> &str {
            "Fixed search results"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            Ok("Acme Corp manufactures anvils.".to_string())
        }
    }

    fn tool_call_response() -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: vec![crate::llm::ToolCall {
                name: "web_search".to_string(),
                args: json!({"query": "Acme Corp"}),
            }],
        }
    }

    fn final_response(text: &str) -> ChatResponse {
        ChatResponse {
            content: Some(text.to_string()),
            tool_calls: Vec::new(),
        }
    }

    fn agent_with(script: Vec<Result<ChatResponse, LlmError>>, max_steps: usize) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(FixedSearch));
        Agent::with_parts(Arc::new(ScriptedLlm::new(script)), tools, max_steps)
    }

    #[tokio::test]
    async fn completes_after_tool_round_trip() {
        let agent = agent_with(
            vec![
                Ok(tool_call_response()),
                Ok(final_response("### Company Overview\nAnvils.")),
            ],
            15,
        );

        let run = agent.invoke("Research Acme Corp").await.expect("run");
        assert_eq!(run.summary, "### Company Overview\nAnvils.");
        assert_eq!(run.steps, 2);

        let kinds: Vec<StepKind> = run.trace.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![StepKind::ToolCall, StepKind::ToolResult, StepKind::Response]
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_not_fatal() {
        let bogus_call = ChatResponse {
            content: None,
            tool_calls: vec![crate::llm::ToolCall {
                name: "bogus_tool".to_string(),
                args: json!({}),
            }],
        };
        let agent = agent_with(
            vec![Ok(bogus_call), Ok(final_response("Summary anyway."))],
            15,
        );

        let run = agent.invoke("Research Acme Corp").await.expect("run");
        assert_eq!(run.summary, "Summary anyway.");

        let tool_result = run
            .trace
            .iter()
            .find(|e| e.kind == StepKind::ToolResult)
            .expect("tool result entry");
        assert!(tool_result.content.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn step_budget_exhaustion_is_an_error() {
        let agent = agent_with(vec![Ok(tool_call_response()), Ok(tool_call_response())], 2);

        let err = agent.invoke("Research Acme Corp").await;
        assert!(matches!(err, Err(AgentError::StepBudgetExhausted(2))));
    }

    #[tokio::test]
    async fn llm_errors_propagate_unmodified() {
        let agent = agent_with(
            vec![Err(LlmError::Api {
                status: 401,
                message: "invalid key".to_string(),
            })],
            15,
        );

        let err = agent.invoke("Research Acme Corp").await;
        match err {
            Err(AgentError::Llm(LlmError::Api { status, message })) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid key");
            }
            other => panic!("expected propagated API error, got {:?}", other.map(|r| r.summary)),
        }
    }

    #[tokio::test]
    async fn empty_response_is_an_error() {
        let agent = agent_with(vec![Ok(ChatResponse::default())], 15);

        let err = agent.invoke("Research Acme Corp").await;
        assert!(matches!(err, Err(AgentError::EmptyResponse)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "héllo wörld";
        let truncated = truncate_for_log(s, 2);
        assert!(truncated.starts_with('h'));
        assert!(truncated.ends_with("[truncated]"));
    }
}
