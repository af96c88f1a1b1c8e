//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to run one research round trip.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchRequest {
    /// Company to research
    pub company_name: String,

    /// Job role to research
    pub job_role: String,
}

/// Outcome of one trigger, consumed exhaustively by the page.
///
/// Exactly one of these is rendered per action: the summary, a neutral
/// warning, or an error banner with the failure's description.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResearchOutcome {
    /// The agent produced a summary
    Success {
        /// Markdown as returned by the agent
        summary_markdown: String,
        /// Server-rendered HTML fragment of the same summary
        summary_html: String,
        /// Think/act steps the run took
        steps: usize,
    },
    /// One or both inputs were empty; the agent was never invoked
    RejectedInput { message: String },
    /// Construction or invocation failed
    InvocationError { message: String },
}

/// Body for non-outcome failures (not ready, busy).
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Whether both provider credentials were found at startup
    pub ready: bool,
}
