//! Axum route handlers for the wizard API.
//!
//! Every handler that changes a session answers with the session's fresh
//! `SessionView`, so the browser only ever renders what the server computed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::fallback_roles;
use crate::models::Role;
use crate::state::AppState;
use crate::wizard::completion::CompletionKey;
use crate::wizard::session::SessionView;
use crate::wizard::store::lock;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChooseRoleRequest {
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetSkillRequest {
    pub skill: String,
    /// Slider position, 0 – 100.
    pub value: u32,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
    pub banner: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleCompletedResponse {
    pub completed: bool,
    pub view: SessionView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (id, session) = state.sessions.create();
    let view = lock(&session).view(id);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
///
/// The results presentation is recomputed on every call.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let view = lock(&session).view(id);
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    guard.start()?;
    Ok(Json(guard.view(id)))
}

/// GET /api/v1/sessions/:id/roles
///
/// Asks the evaluation service for its catalog. When it cannot be reached the
/// built-in catalog is used and the failure is shown as a banner.
pub async fn handle_list_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RolesResponse>, AppError> {
    let session = state.sessions.get(id)?;

    let (roles, banner) = match state.evaluator.roles().await {
        Ok(roles) if !roles.is_empty() => (roles, None),
        Ok(_) => {
            warn!("Evaluation service returned no roles; using built-in catalog");
            (fallback_roles(), None)
        }
        Err(e) => {
            warn!("Falling back to built-in role catalog: {e}");
            (fallback_roles(), Some(e.display_message()))
        }
    };

    let mut guard = lock(&session);
    guard.set_catalog(roles, banner.clone());
    Ok(Json(RolesResponse {
        roles: guard.catalog().to_vec(),
        banner,
    }))
}

/// POST /api/v1/sessions/:id/role
pub async fn handle_choose_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChooseRoleRequest>,
) -> Result<Json<SessionView>, AppError> {
    if request.role_id.trim().is_empty() {
        return Err(AppError::Validation("role_id cannot be empty".to_string()));
    }

    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    guard.choose_role(&request.role_id)?;
    Ok(Json(guard.view(id)))
}

/// PUT /api/v1/sessions/:id/skills
pub async fn handle_set_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetSkillRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    guard.set_skill(&request.skill, request.value)?;
    Ok(Json(guard.view(id)))
}

/// POST /api/v1/sessions/:id/submit
///
/// Evaluation failures are not errors here: they come back as the banner of a
/// SkillInput view so the user can retry.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let ticket = {
        let mut guard = lock(&session);
        guard.begin_submission()?
    };

    info!("Session {id}: submitting profile for role {}", ticket.role_id);
    let outcome = state
        .evaluator
        .evaluate(&ticket.role_id, &ticket.profile)
        .await;

    let mut guard = lock(&session);
    guard.finish_submission(ticket, outcome)?;
    Ok(Json(guard.view(id)))
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    guard.back()?;
    Ok(Json(guard.view(id)))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    guard.restart()?;
    Ok(Json(guard.view(id)))
}

/// POST /api/v1/sessions/:id/completed
pub async fn handle_toggle_completed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(key): Json<CompletionKey>,
) -> Result<Json<ToggleCompletedResponse>, AppError> {
    let session = state.sessions.get(id)?;
    let mut guard = lock(&session);
    let completed = guard.toggle_completed(key)?;
    Ok(Json(ToggleCompletedResponse {
        completed,
        view: guard.view(id),
    }))
}
