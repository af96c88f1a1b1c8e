//! Agent module - the research loop and its prompt templates.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the research instruction
//! 2. Call the LLM with the search tool available
//! 3. If the LLM requests a tool call, execute it and feed the result back
//! 4. Repeat until the LLM produces the final summary or the step budget runs out

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, AgentError, ResearchRun, StepKind, StepTrace};
pub use prompt::{build_research_prompt, build_system_prompt};

use async_trait::async_trait;

/// The one seam between the UI flow and the reasoning loop.
///
/// Handlers depend on this trait rather than on [`Agent`] directly so
/// tests can count and script invocations.
#[async_trait]
pub trait ResearchInvoker: Send + Sync {
    /// Run the loop exactly once with the given instruction.
    async fn invoke(&self, instruction: &str) -> Result<ResearchRun, AgentError>;
}
