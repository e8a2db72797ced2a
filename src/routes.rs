//! REST surface — session operations plus the thin webhook and profile
//! proxies consumed by the browser front end.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::flow::{
    Advance, ApprovalOutcome, FlowDeps, ReviewController, Rewind, SessionController, StepMode,
};
use crate::profile::{ProfileClient, ProfileData};
use crate::webhook::{ForwardOutcome, WebhookProxy};

/// One live session and its review stage.
#[derive(Clone)]
struct SessionEntry {
    controller: Arc<SessionController>,
    review: Arc<Mutex<ReviewController>>,
}

/// Shared state for the REST routes.
#[derive(Clone)]
pub struct ApiState {
    deps: FlowDeps,
    proxy: Arc<WebhookProxy>,
    profile: Arc<ProfileClient>,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl ApiState {
    pub fn new(deps: FlowDeps, proxy: Arc<WebhookProxy>, profile: Arc<ProfileClient>) -> Self {
        Self {
            deps,
            proxy,
            profile,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn entry(&self, id: &str) -> Option<SessionEntry> {
        self.sessions.read().await.get(id).cloned()
    }
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Unknown session"})),
    )
}

fn advance_body(outcome: &Advance) -> serde_json::Value {
    match outcome {
        Advance::Ignored => json!({"status": "ignored"}),
        Advance::FollowUp { question } => json!({"status": "followUp", "question": question}),
        Advance::Advanced { next_step } => json!({"status": "advanced", "currentStep": next_step}),
        Advance::Completed => json!({"status": "completed"}),
    }
}

// ── Session operations ───────────────────────────────────────────────────

/// POST /api/sessions
///
/// Start a fresh onboarding session and return its id and first question.
async fn create_session(State(state): State<ApiState>) -> impl IntoResponse {
    let id = Uuid::new_v4().to_string();
    let controller = SessionController::new(id.clone(), state.deps.clone());
    let review = ReviewController::new(
        Arc::clone(&controller),
        Arc::clone(&state.deps.forwarder),
    );
    let first = controller.current_question();

    state.sessions.write().await.insert(
        id.clone(),
        SessionEntry {
            controller,
            review: Arc::new(Mutex::new(review)),
        },
    );

    Json(json!({
        "sessionId": id,
        "totalQuestions": state.deps.catalog.len(),
        "question": first,
    }))
}

/// GET /api/sessions/{id}
///
/// Snapshot of the session: record, current question, step mode, transition
/// phase, and the transient assistant note and error text.
async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let controller = entry.controller;

    let mode = match controller.mode() {
        StepMode::Answering => json!({"kind": "answering"}),
        StepMode::FollowUp { question, .. } => {
            json!({"kind": "followUp", "question": question})
        }
    };

    Json(json!({
        "session": controller.session_snapshot(),
        "question": controller.current_question(),
        "mode": mode,
        "phase": controller.phase(),
        "isTransitioning": controller.is_transitioning(),
        "assistantNote": controller.assistant_note(),
        "error": controller.last_error(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct DraftBody {
    draft: String,
}

/// POST /api/sessions/{id}/answer
async fn submit_answer(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<DraftBody>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    match entry.controller.submit_answer(&body.draft).await {
        Ok(outcome) => Json(advance_body(&outcome)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// POST /api/sessions/{id}/follow-up
async fn submit_follow_up(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<DraftBody>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    match entry.controller.submit_follow_up(&body.draft).await {
        Ok(outcome) => Json(advance_body(&outcome)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// POST /api/sessions/{id}/back
async fn go_back(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let body = match entry.controller.go_back().await {
        Rewind::Ignored => json!({"status": "ignored"}),
        Rewind::ToAnswering => json!({"status": "answering"}),
        Rewind::ToStep(step) => json!({"status": "rewound", "currentStep": step}),
    };
    Json(body).into_response()
}

/// POST /api/sessions/{id}/skip
///
/// Diagnostic shortcut: complete the session from the catalog sample answers
/// and fire the sample payload at the workflow webhook.
async fn skip_to_end(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let outcome = entry.controller.skip_to_end().await;
    Json(advance_body(&outcome)).into_response()
}

/// POST /api/sessions/{id}/analysis
///
/// Synchronous analysis path: run the advisor over the full response set.
async fn final_analysis(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let responses = entry.controller.session_snapshot().responses;
    match state.deps.advisor.generate_final_analysis(&responses).await {
        Ok(analysis) => Json(json!({"analysis": analysis})).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

// ── Review operations ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditBody {
    question_id: u32,
    answer: String,
}

/// POST /api/sessions/{id}/review/edit
///
/// In-place correction; later responses are left untouched.
async fn review_edit(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<EditBody>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let mut review = entry.review.lock().await;
    let saved = review.begin_edit(body.question_id) && review.save_edit(body.question_id, &body.answer);
    if saved {
        Json(json!({"status": "saved"})).into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Cannot edit that answer"})),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewindBody {
    question_id: u32,
}

/// POST /api/sessions/{id}/review/rewind
///
/// Flow rewind: re-enter the interview at the given question.
async fn review_rewind(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<RewindBody>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let mut review = entry.review.lock().await;
    if review.edit_from_review(body.question_id) {
        Json(json!({"status": "rewound", "currentStep": body.question_id})).into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Cannot rewind to that question"})),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct ApproveBody {
    acknowledged: bool,
}

/// POST /api/sessions/{id}/review/approve
///
/// Acknowledgement-gated final submission to the workflow webhook.
async fn review_approve(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> impl IntoResponse {
    let Some(entry) = state.entry(&id).await else {
        return not_found().into_response();
    };
    let mut review = entry.review.lock().await;
    review.request_approval();
    review.set_acknowledged(body.acknowledged);
    match review.confirm_approval().await {
        ApprovalOutcome::NotAcknowledged => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Acknowledgement is required before submission"})),
        )
            .into_response(),
        ApprovalOutcome::NotReady => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Session is not complete"})),
        )
            .into_response(),
        ApprovalOutcome::Submitted(outcome) => {
            let body = match outcome {
                ForwardOutcome::AnalysisReady(analysis) => {
                    json!({"status": "analysisReady", "analysis": analysis})
                }
                ForwardOutcome::WorkflowStarted(message) => {
                    json!({"status": "workflowStarted", "message": message})
                }
                ForwardOutcome::Unknown(raw) => json!({"status": "accepted", "response": raw}),
            };
            Json(body).into_response()
        }
        ApprovalOutcome::SubmittedWithError(error) => {
            Json(json!({"status": "submittedWithError", "error": error})).into_response()
        }
    }
}

// ── Webhook proxy ────────────────────────────────────────────────────────

/// POST /api/webhook/onboarding
///
/// Thin passthrough to the workflow webhook.
async fn webhook_forward(
    State(state): State<ApiState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    match state.proxy.forward_raw(&body).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error forwarding to workflow webhook");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to forward data to workflow webhook"})),
            )
                .into_response()
        }
    }
}

/// GET /api/webhook/onboarding
async fn webhook_info() -> impl IntoResponse {
    Json(json!({
        "message": "Onboarding webhook endpoint is active",
        "endpoint": "/api/webhook/onboarding",
        "method": "POST",
        "expectedFormat": {
            "responses": "Array of response objects",
            "sessionId": "Optional session identifier",
        },
    }))
}

// ── Profile proxy ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileQuery {
    session_id: Option<String>,
}

/// GET /api/profile?sessionId=...
async fn profile_get(
    State(state): State<ApiState>,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    let Some(session_id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Session ID is required"})),
        )
            .into_response();
    };
    match state.profile.fetch(&session_id).await {
        Ok(data) => Json(json!({"profileData": data})).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Profile fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch profile data"})),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePostBody {
    session_id: String,
    profile_data: ProfileData,
}

/// POST /api/profile
async fn profile_post(
    State(state): State<ApiState>,
    Json(body): Json<ProfilePostBody>,
) -> impl IntoResponse {
    match state
        .profile
        .submit(&body.session_id, &body.profile_data)
        .await
    {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Profile submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to submit profile data"})),
            )
                .into_response()
        }
    }
}

/// Build the REST routes.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/answer", post(submit_answer))
        .route("/api/sessions/{id}/follow-up", post(submit_follow_up))
        .route("/api/sessions/{id}/back", post(go_back))
        .route("/api/sessions/{id}/skip", post(skip_to_end))
        .route("/api/sessions/{id}/analysis", post(final_analysis))
        .route("/api/sessions/{id}/review/edit", post(review_edit))
        .route("/api/sessions/{id}/review/rewind", post(review_rewind))
        .route("/api/sessions/{id}/review/approve", post(review_approve))
        .route(
            "/api/webhook/onboarding",
            post(webhook_forward).get(webhook_info),
        )
        .route("/api/profile", get(profile_get).post(profile_post))
        .with_state(state)
}
