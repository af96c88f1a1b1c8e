//! Research endpoint: readiness gate, validation gate, single invocation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::agent::build_research_prompt;
use crate::markdown::render_markdown;

use super::types::{ApiError, ResearchOutcome, ResearchRequest};
use super::AppState;

/// How one trigger resolved, before HTTP mapping.
#[derive(Debug)]
pub(super) enum ResearchReply {
    /// One of the three presenter outcomes
    Outcome(ResearchOutcome),
    /// Credentials were missing at startup; nothing can run
    NotReady,
    /// Another request is already in flight
    Busy,
}

impl IntoResponse for ResearchReply {
    fn into_response(self) -> Response {
        match self {
            ResearchReply::Outcome(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
            ResearchReply::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiError {
                    error: "configuration_missing".to_string(),
                    message: "API keys not found. Add GOOGLE_API_KEY and TAVILY_API_KEY and restart the server.".to_string(),
                }),
            )
                .into_response(),
            ResearchReply::Busy => (
                StatusCode::CONFLICT,
                Json(ApiError {
                    error: "busy".to_string(),
                    message: "A research request is already running. Wait for it to finish and try again.".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// POST /api/research
pub async fn research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> ResearchReply {
    handle(&state, request).await
}

pub(super) async fn handle(state: &AppState, request: ResearchRequest) -> ResearchReply {
    // Readiness gate: without both credentials the invoker was never built.
    let Some(invoker) = &state.invoker else {
        return ResearchReply::NotReady;
    };

    // One in-flight request at a time; concurrent triggers are refused
    // rather than queued.
    let Ok(_running) = state.run_gate.try_lock() else {
        return ResearchReply::Busy;
    };

    // Validation gate: both fields must be non-empty. The invoker is
    // never called for rejected input.
    let company_name = request.company_name.trim();
    let job_role = request.job_role.trim();
    if company_name.is_empty() || job_role.is_empty() {
        return ResearchReply::Outcome(ResearchOutcome::RejectedInput {
            message: "Please enter both a company name and a job role.".to_string(),
        });
    }

    tracing::info!("Researching {} for the role of {}", company_name, job_role);

    let instruction = build_research_prompt(company_name, job_role);

    match invoker.invoke(&instruction).await {
        Ok(run) => ResearchReply::Outcome(ResearchOutcome::Success {
            summary_html: render_markdown(&run.summary),
            summary_markdown: run.summary,
            steps: run.steps,
        }),
        Err(e) => {
            tracing::error!("Research run failed: {}", e);
            ResearchReply::Outcome(ResearchOutcome::InvocationError {
                message: format!("An error occurred during the research process: {}", e),
            })
        }
    }
}
