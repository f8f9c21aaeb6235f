//! HTTP endpoint handlers. These are thin wrappers that forward to session logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::error::DrillError;
use crate::protocol::*;
use crate::state::AppState;

/// `DrillError` rendered as a JSON error body with a matching status.
pub struct ApiError(pub DrillError);

impl From<DrillError> for ApiError {
  fn from(e: DrillError) -> Self { ApiError(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self.0 {
      DrillError::UnknownSession(_) => StatusCode::NOT_FOUND,
      DrillError::ChoiceDisabled { .. } => StatusCode::CONFLICT,
      DrillError::EmptyPool | DrillError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
      _ => StatusCode::BAD_REQUEST,
    };
    warn!(target: "pick_drill", %status, error = %self.0, "Request rejected");
    (status, Json(ErrorOut { error: self.0.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_post_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionOut>, ApiError> {
  let id = state.create_session().await?;
  let out = state
    .with_session(&id, |s| {
      Ok(SessionOut {
        session_id: s.id.clone(),
        pool: state.pool_name.clone(),
        score: s.score,
        round: round_out(s.engine.round()),
      })
    })
    .await?;
  info!(target: "pick_drill", session = %id, prompt = %out.round.prompt, "HTTP session created");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_round(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<RoundOut>, ApiError> {
  let out = state.with_session(&id, |s| Ok(round_out(s.engine.round()))).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, ApiError> {
  let answer = body.into_answer().ok_or(DrillError::MissingAnswer)?;
  let sub = state.with_session(&id, |s| s.answer(&answer)).await?;
  info!(target: "round", session = %id, correct = sub.resolved, score = sub.score, "HTTP answer evaluated");
  Ok(Json(answer_out(&sub)))
}

#[instrument(level = "info", skip(state, body), fields(hidden = body.hidden))]
pub async fn http_post_visibility(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<VisibilityIn>,
) -> Result<StatusCode, ApiError> {
  state
    .with_session(&id, |s| {
      s.engine.set_hidden(body.hidden);
      Ok(())
    })
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<StatsOut>, ApiError> {
  let out = state.with_session(&id, |s| Ok(stats_out(s.score, &s.history))).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.remove_session(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
