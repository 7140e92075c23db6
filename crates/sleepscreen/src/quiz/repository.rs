use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Answer, QuizSession, SessionId};
use super::flags::MedicalFlag;
use super::recommend::Recommendation;
use super::scoring::ScoringResult;

/// Persisted outcome of a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRecord {
    pub session_id: SessionId,
    pub scoring: ScoringResult,
    pub flags: Vec<MedicalFlag>,
    pub recommendations: Vec<Recommendation>,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn create_session(&self, session: QuizSession) -> Result<(), RepositoryError>;
    fn load_session(&self, id: &SessionId) -> Result<Option<QuizSession>, RepositoryError>;
    fn save_session(&self, session: &QuizSession) -> Result<(), RepositoryError>;
    /// Upsert keyed by question code; resubmitting a question replaces the
    /// earlier answer.
    fn save_answer(&self, id: &SessionId, answer: Answer) -> Result<(), RepositoryError>;
    fn load_answers(&self, id: &SessionId) -> Result<Vec<Answer>, RepositoryError>;
    fn save_result(&self, record: &QuizResultRecord) -> Result<(), RepositoryError>;
    fn load_result(&self, id: &SessionId) -> Result<Option<QuizResultRecord>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound boundary for scheduling follow-up contact after a completed
/// session. Failures here never fail the quiz itself.
pub trait FollowUpScheduler: Send + Sync {
    fn schedule(&self, request: FollowUpRequest) -> Result<(), SchedulerError>;
}

/// Payload handed to the follow-up transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    pub session_id: SessionId,
    pub contact_email: String,
    pub locale: String,
    pub has_urgent_flags: bool,
}

/// Follow-up dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("follow-up transport unavailable: {0}")]
    Transport(String),
}
