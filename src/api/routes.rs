//! REST endpoints for checklists, progress, analysis, coaching and history.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::error::ApiError;
use crate::checklist::ChecklistRegistry;
use crate::checklist::builtin::JIRA;
use crate::history::{HistoryRecord, HistoryStore};
use crate::progress::ProgressEvaluator;
use crate::relay::{Analysis, AnalysisContext, Coach, MousePosition, ScreenAnalyzer, Screenshot};

/// Shared state for coach routes.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChecklistRegistry>,
    pub evaluator: ProgressEvaluator,
    pub history: Arc<dyn HistoryStore>,
    pub analyzer: Arc<dyn ScreenAnalyzer>,
    pub coach: Arc<dyn Coach>,
    /// Whether model credentials are present, reported by `/health`.
    pub llm_configured: bool,
}

/// Build the coach REST routes.
pub fn coach_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/checklist/{task_type}", get(get_checklist))
        .route("/api/progress/{task_type}", post(update_progress))
        .route("/api/screenshot/analyze", post(analyze_screenshot))
        .route("/api/coaching/guidance", post(coaching_guidance))
        .route("/api/history", get(get_history))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn default_task_type() -> String {
    JIRA.to_string()
}

fn default_step() -> i64 {
    1
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "gemini_configured": state.llm_configured,
    }))
}

// ── Checklists & progress ──────────────────────────────────────────────

/// GET /api/checklist/{task_type}
async fn get_checklist(
    State(state): State<AppState>,
    Path(task_type): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let checklist = state
        .registry
        .get(&task_type)
        .map_err(ApiError::from_path_lookup)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "checklist": checklist,
    })))
}

#[derive(Deserialize)]
struct ProgressRequest {
    analysis: Option<Analysis>,
    #[serde(default = "default_step")]
    current_step: i64,
}

/// POST /api/progress/{task_type}
///
/// Evaluates the posted analysis against the current step. Stateless.
async fn update_progress(
    State(state): State<AppState>,
    Path(task_type): Path<String>,
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let checklist = state
        .registry
        .get(&task_type)
        .map_err(ApiError::from_path_lookup)?;
    let Json(body) = body?;
    let analysis = body
        .analysis
        .ok_or_else(|| ApiError::bad_request("No analysis provided"))?;

    let progress = state
        .evaluator
        .evaluate(checklist, body.current_step, &analysis)
        .map_err(ApiError::from_path_lookup)?;

    info!(
        task_type = %task_type,
        step = progress.current_step,
        can_proceed = progress.can_proceed,
        missing = progress.missing_fields.len(),
        "Progress evaluated"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "progress": progress,
    })))
}

// ── Screenshot analysis ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct AnalyzeRequest {
    screenshot: Option<String>,
    #[serde(default = "default_task_type")]
    task_type: String,
    #[serde(default = "default_step")]
    current_step: i64,
    mouse_position: Option<MousePosition>,
}

/// POST /api/screenshot/analyze
///
/// Sends the screenshot to the vision model and records the result in the
/// history log.
async fn analyze_screenshot(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let encoded = body
        .screenshot
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No screenshot provided"))?;

    let checklist = state
        .registry
        .get(&body.task_type)
        .map_err(ApiError::from_body_lookup)?;
    let step = checklist
        .step(body.current_step)
        .map_err(ApiError::from_body_lookup)?;
    let screenshot = Screenshot::from_base64(encoded)?;

    let context = AnalysisContext {
        checklist_name: &checklist.name,
        step,
        mouse_position: body.mouse_position,
    };
    let mut analysis = state.analyzer.analyze(&screenshot, &context).await?;

    let record = HistoryRecord::new(
        &body.task_type,
        body.current_step,
        analysis.clone(),
        body.mouse_position,
    );
    let timestamp = record.timestamp;
    state.history.append(record).await;

    // The coaching endpoint reads the cursor back out of the analysis
    analysis.mouse_position = body.mouse_position;

    Ok(Json(serde_json::json!({
        "success": true,
        "analysis": analysis,
        "timestamp": timestamp,
    })))
}

// ── Coaching ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GuidanceRequest {
    analysis: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default = "default_task_type")]
    task_type: String,
    #[serde(default = "default_step")]
    current_step: i64,
}

/// POST /api/coaching/guidance
async fn coaching_guidance(
    State(state): State<AppState>,
    body: Result<Json<GuidanceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let analysis = coaching_analysis(body.analysis)?;

    let checklist = state
        .registry
        .get(&body.task_type)
        .map_err(ApiError::from_body_lookup)?;
    let expected_step = checklist
        .step(body.current_step)
        .map_err(ApiError::from_body_lookup)?;

    let guidance = state
        .coach
        .coach(&analysis, expected_step, &checklist.name)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "guidance": guidance,
        "expected_step": expected_step,
    })))
}

/// An absent, null or empty analysis object gives the coach nothing to judge.
fn coaching_analysis(
    raw: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<Analysis, ApiError> {
    let fields = raw
        .filter(|fields| !fields.is_empty())
        .ok_or_else(|| ApiError::bad_request("No analysis provided"))?;
    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| ApiError::bad_request(format!("Invalid analysis: {e}")))
}

// ── History ─────────────────────────────────────────────────────────────

/// GET /api/history
async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    let history = state.history.list().await;
    Json(serde_json::json!({
        "success": true,
        "history": history,
    }))
}
