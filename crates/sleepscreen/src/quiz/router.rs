//! HTTP surface for the quiz service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerValue, QuizMode, SessionId};
use super::repository::{FollowUpScheduler, RepositoryError, SessionStore};
use super::service::{QuizService, QuizServiceError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    mode: QuizMode,
    /// Empty means the service default.
    #[serde(default)]
    locale: String,
    #[serde(default)]
    contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAnswerRequest {
    question_code: String,
    value: AnswerValue,
}

/// Router builder exposing session, answer, and result endpoints.
pub fn quiz_router<S, F>(service: Arc<QuizService<S, F>>) -> Router
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    Router::new()
        .route("/api/v1/quiz/sessions", post(create_session_handler::<S, F>))
        .route(
            "/api/v1/quiz/sessions/:session_id",
            get(session_handler::<S, F>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/answers",
            post(submit_answer_handler::<S, F>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/results",
            get(results_handler::<S, F>).post(force_complete_handler::<S, F>),
        )
        .with_state(service)
}

fn error_response(error: QuizServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    let status = match &error {
        QuizServiceError::SessionNotFound => StatusCode::NOT_FOUND,
        QuizServiceError::SessionCompleted => StatusCode::CONFLICT,
        QuizServiceError::UnknownQuestion(_) => StatusCode::NOT_FOUND,
        QuizServiceError::InvalidAnswer(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizServiceError::ResultsNotReady => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        QuizServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(payload)).into_response()
}

async fn create_session_handler<S, F>(
    State(service): State<Arc<QuizService<S, F>>>,
    axum::Json(request): axum::Json<CreateSessionRequest>,
) -> Response
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    match service.create_session(request.mode, &request.locale, request.contact_email) {
        Ok(session) => {
            let payload = json!({
                "sessionId": session.id.0,
                "mode": session.mode.label(),
                "locale": session.locale,
                "firstQuestion": service.first_question(session.mode),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn session_handler<S, F>(
    State(service): State<Arc<QuizService<S, F>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    let id = SessionId(session_id);
    let session = match service.session(&id) {
        Ok(session) => session,
        Err(error) => return error_response(error),
    };
    match service.progress(&id) {
        Ok(progress) => {
            let payload = json!({
                "sessionId": session.id.0,
                "mode": session.mode.label(),
                "completed": session.is_completed(),
                "progress": progress,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn submit_answer_handler<S, F>(
    State(service): State<Arc<QuizService<S, F>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SubmitAnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    let id = SessionId(session_id);
    match service.submit_answer(&id, &request.question_code, request.value) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn results_handler<S, F>(
    State(service): State<Arc<QuizService<S, F>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    let id = SessionId(session_id);
    match service.results(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn force_complete_handler<S, F>(
    State(service): State<Arc<QuizService<S, F>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    let id = SessionId(session_id);
    match service.force_complete(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

