//! Practical grading endpoints.
//!
//! Every endpoint is a pure function of its request body: the UI sends the
//! problem record along with the learner's input.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::content::{audit_problems, AuditFinding, PracticalProblem};
use crate::grading::Draft;
use crate::state::AppState;

// ============================================================================
// Shape
// ============================================================================

/// Slot layout for a problem.
///
/// POST /api/practical/shape
pub async fn shape(State(state): State<AppState>, Json(problem): Json<PracticalProblem>) -> impl IntoResponse {
    let problem = problem.cleaned();
    Json(problem.shape(&state.classify))
}

// ============================================================================
// Grade
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub problem: PracticalProblem,
    /// Learner input, already joined by the draft codec
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub correct: bool,
}

/// Grade one answer.
///
/// POST /api/practical/grade
pub async fn grade(State(state): State<AppState>, Json(request): Json<GradeRequest>) -> impl IntoResponse {
    let problem = request.problem.cleaned();
    let correct = problem.grade(&request.answer, &state.classify);
    tracing::debug!("Graded problem {}: {}", problem.problem_number, correct);
    Json(GradeResponse { correct })
}

// ============================================================================
// Draft codec
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EncodeDraftRequest {
    pub problem: PracticalProblem,
    #[serde(default)]
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EncodeDraftResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct DecodeDraftRequest {
    pub problem: PracticalProblem,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct DecodeDraftResponse {
    pub slots: Vec<String>,
    /// Slot labels for multi-blank problems, empty for sequences
    pub labels: Vec<String>,
}

fn single_slot_error(problem: &PracticalProblem) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": format!("Problem {} takes a single answer, not slots", problem.problem_number)
        })),
    )
        .into_response()
}

/// Join slot values into the answer string the grader expects.
///
/// POST /api/practical/draft/encode
pub async fn encode_draft(
    State(state): State<AppState>,
    Json(request): Json<EncodeDraftRequest>,
) -> impl IntoResponse {
    let problem = request.problem.cleaned();
    let meta = problem.shape(&state.classify);

    match Draft::from_slots(&meta, request.slots) {
        Some(draft) => Json(EncodeDraftResponse { answer: draft.encode() }).into_response(),
        None => single_slot_error(&problem),
    }
}

/// Split a saved answer string back into slot values.
///
/// POST /api/practical/draft/decode
pub async fn decode_draft(
    State(state): State<AppState>,
    Json(request): Json<DecodeDraftRequest>,
) -> impl IntoResponse {
    let problem = request.problem.cleaned();
    let meta = problem.shape(&state.classify);

    match Draft::decode(&meta, &request.answer) {
        Some(Draft::Sequence(slots)) => Json(DecodeDraftResponse {
            slots,
            labels: Vec::new(),
        })
        .into_response(),
        Some(Draft::MultiBlank { labels, values }) => Json(DecodeDraftResponse { slots: values, labels }).into_response(),
        None => single_slot_error(&problem),
    }
}

// ============================================================================
// Audit
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub findings: Vec<AuditFinding>,
}

/// Audit a problem set.
///
/// POST /api/practical/audit
pub async fn audit(State(state): State<AppState>, Json(problems): Json<Vec<PracticalProblem>>) -> impl IntoResponse {
    let problems: Vec<PracticalProblem> = problems.into_iter().map(PracticalProblem::cleaned).collect();
    let findings = audit_problems(&problems, &state.classify);
    tracing::info!("Audited {} problems: {} findings", problems.len(), findings.len());
    Json(AuditResponse { findings })
}
