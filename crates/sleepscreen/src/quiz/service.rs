//! Session orchestration: answer intake, gate-driven skips, progress, and
//! result computation on completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::{QuestionKind, QuizCatalog, QuizQuestion};
use super::domain::{Answer, AnswerMap, AnswerValue, QuizMode, QuizSession, SessionId};
use super::flags::MedicalFlagGenerator;
use super::gating::GateEvaluator;
use super::recommend::recommendations_for;
use super::repository::{
    FollowUpRequest, FollowUpScheduler, QuizResultRecord, RepositoryError, SessionStore,
};
use super::rules::QuizRuleSet;
use super::scoring::ScoreCalculator;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("qs-{id:06}"))
}

/// Answer-by-answer view returned after each submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    pub completed: bool,
    pub progress: QuizProgress,
}

/// Progress against the questions still reachable after skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

impl QuizProgress {
    fn new(answered: usize, total: usize) -> Self {
        // Rounded to the nearest whole percent, not truncated.
        let percent = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            answered,
            total,
            percent,
        }
    }
}

/// Service composing the catalog, the three evaluators, and the storage and
/// follow-up boundaries.
pub struct QuizService<S, F> {
    catalog: QuizCatalog,
    gates: GateEvaluator,
    calculator: ScoreCalculator,
    flags: MedicalFlagGenerator,
    store: Arc<S>,
    scheduler: Arc<F>,
    follow_up_enabled: bool,
    default_locale: String,
}

impl<S, F> QuizService<S, F>
where
    S: SessionStore + 'static,
    F: FollowUpScheduler + 'static,
{
    pub fn new(catalog: QuizCatalog, rules: QuizRuleSet, store: Arc<S>, scheduler: Arc<F>) -> Self {
        Self {
            catalog,
            gates: GateEvaluator::new(rules.gate_rules),
            calculator: ScoreCalculator::new(rules.scoring_rules, rules.categories),
            flags: MedicalFlagGenerator::new(rules.flag_rules, rules.flag_translations),
            store,
            scheduler,
            follow_up_enabled: true,
            default_locale: super::flags::DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_follow_up(mut self, enabled: bool) -> Self {
        self.follow_up_enabled = enabled;
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Start a new session in the given mode. An empty locale falls back to
    /// the configured default.
    pub fn create_session(
        &self,
        mode: QuizMode,
        locale: &str,
        contact_email: Option<String>,
    ) -> Result<QuizSession, QuizServiceError> {
        let locale = if locale.is_empty() {
            self.default_locale.as_str()
        } else {
            locale
        };
        let session = QuizSession::new(next_session_id(), mode, locale, contact_email);
        self.store.create_session(session.clone())?;
        info!(session_id = %session.id.0, mode = mode.label(), "quiz session created");
        Ok(session)
    }

    /// First question presented to a fresh session in this mode.
    pub fn first_question(&self, mode: QuizMode) -> Option<String> {
        self.catalog
            .reachable_questions(mode, &Default::default())
            .first()
            .map(|code| code.to_string())
    }

    pub fn session(&self, id: &SessionId) -> Result<QuizSession, QuizServiceError> {
        self.store
            .load_session(id)?
            .ok_or(QuizServiceError::SessionNotFound)
    }

    /// Record an answer, re-run the gates, and advance the session. Completes
    /// the session when no reachable question remains unanswered.
    pub fn submit_answer(
        &self,
        id: &SessionId,
        question_code: &str,
        value: AnswerValue,
    ) -> Result<SubmitOutcome, QuizServiceError> {
        let mut session = self.session(id)?;
        if session.is_completed() {
            return Err(QuizServiceError::SessionCompleted);
        }

        let question = self
            .catalog
            .question(question_code)
            .ok_or_else(|| QuizServiceError::UnknownQuestion(question_code.to_string()))?;
        validate_answer(question, &value)?;

        self.store.save_answer(
            id,
            Answer {
                question_code: question_code.to_string(),
                value,
                responded_at: Utc::now(),
            },
        )?;

        let stored = self.store.load_answers(id)?;
        let answers = AnswerMap::from_answers(stored.iter());

        // Skips only accumulate; revising an earlier answer never un-skips.
        let triggered = self.gates.evaluate(&answers);
        if !triggered.is_empty() {
            session.skips.merge(&triggered);
        }

        let answered: std::collections::HashSet<&str> = stored
            .iter()
            .map(|answer| answer.question_code.as_str())
            .collect();
        let reachable = self.catalog.reachable_questions(session.mode, &session.skips);
        let next_question = reachable
            .iter()
            .find(|code| !answered.contains(**code))
            .map(|code| code.to_string());

        let progress = QuizProgress::new(
            reachable.iter().filter(|code| answered.contains(**code)).count(),
            reachable.len(),
        );

        match &next_question {
            Some(code) => {
                self.advance_to(&mut session, code);
                self.store.save_session(&session)?;
                debug!(session_id = %session.id.0, next = %code, "session advanced");
            }
            None => {
                self.complete(&mut session, &answers)?;
            }
        }

        Ok(SubmitOutcome {
            session_id: session.id,
            completed: next_question.is_none(),
            next_question,
            progress,
        })
    }

    /// Progress snapshot without mutating the session.
    pub fn progress(&self, id: &SessionId) -> Result<QuizProgress, QuizServiceError> {
        let session = self.session(id)?;
        let stored = self.store.load_answers(id)?;
        let answered: std::collections::HashSet<&str> = stored
            .iter()
            .map(|answer| answer.question_code.as_str())
            .collect();
        let reachable = self.catalog.reachable_questions(session.mode, &session.skips);
        Ok(QuizProgress::new(
            reachable.iter().filter(|code| answered.contains(**code)).count(),
            reachable.len(),
        ))
    }

    /// Results for a completed session.
    pub fn results(&self, id: &SessionId) -> Result<QuizResultRecord, QuizServiceError> {
        let session = self.session(id)?;
        match self.store.load_result(id)? {
            Some(record) => Ok(record),
            None if session.is_completed() => Err(QuizServiceError::Repository(
                RepositoryError::Unavailable("completed session has no stored result".to_string()),
            )),
            None => Err(QuizServiceError::ResultsNotReady),
        }
    }

    /// Compute results from whatever has been answered so far, completing the
    /// session early. Repeating the call returns the stored result.
    pub fn force_complete(&self, id: &SessionId) -> Result<QuizResultRecord, QuizServiceError> {
        let mut session = self.session(id)?;
        if let Some(record) = self.store.load_result(id)? {
            return Ok(record);
        }

        let stored = self.store.load_answers(id)?;
        let answers = AnswerMap::from_answers(stored.iter());
        self.complete(&mut session, &answers)?;
        self.store
            .load_result(id)?
            .ok_or(QuizServiceError::Repository(RepositoryError::NotFound))
    }

    fn advance_to(&self, session: &mut QuizSession, question_code: &str) {
        let sections = self.catalog.sections_for(session.mode);
        for (section_index, section) in sections.iter().enumerate() {
            for (question_index, question) in section.questions_for(session.mode).enumerate() {
                if question.code == question_code {
                    session.current_section_index = section_index;
                    session.current_question_index = question_index;
                    return;
                }
            }
        }
    }

    fn complete(
        &self,
        session: &mut QuizSession,
        answers: &AnswerMap,
    ) -> Result<(), QuizServiceError> {
        let scoring = self.calculator.calculate(answers);
        let flags = self.flags.generate(answers, &session.locale);
        let recommendations = recommendations_for(&scoring.top_risks, &session.locale);
        let has_urgent = flags
            .iter()
            .any(|flag| flag.severity == super::flags::FlagSeverity::Urgent);

        let record = QuizResultRecord {
            session_id: session.id.clone(),
            scoring,
            flags,
            recommendations,
            created_at: Utc::now(),
        };
        self.store.save_result(&record)?;

        session.completed_at = Some(record.created_at);
        self.store.save_session(session)?;
        info!(
            session_id = %session.id.0,
            overall_score = record.scoring.overall_score,
            flags = record.flags.len(),
            "quiz session completed"
        );

        if !self.follow_up_enabled {
            return Ok(());
        }
        if let Some(email) = session.contact_email.clone() {
            let request = FollowUpRequest {
                session_id: session.id.clone(),
                contact_email: email,
                locale: session.locale.clone(),
                has_urgent_flags: has_urgent,
            };
            if let Err(error) = self.scheduler.schedule(request) {
                warn!(session_id = %session.id.0, %error, "follow-up scheduling failed");
            }
        }

        Ok(())
    }
}

fn validate_answer(question: &QuizQuestion, value: &AnswerValue) -> Result<(), QuizServiceError> {
    match (question.kind, value) {
        (QuestionKind::SingleChoice, AnswerValue::Choices(choices)) => {
            if choices.len() != 1 {
                return Err(QuizServiceError::InvalidAnswer(
                    "single-choice question takes exactly one option".to_string(),
                ));
            }
            validate_options(question, choices)
        }
        (QuestionKind::MultipleChoice, AnswerValue::Choices(choices)) => {
            if choices.is_empty() {
                return Err(QuizServiceError::InvalidAnswer(
                    "at least one option is required".to_string(),
                ));
            }
            validate_options(question, choices)
        }
        (QuestionKind::Scale, AnswerValue::Scale(value)) => match question.scale {
            Some(scale) if *value >= scale.min && *value <= scale.max => Ok(()),
            Some(scale) => Err(QuizServiceError::InvalidAnswer(format!(
                "scale value {value} outside {}..={}",
                scale.min, scale.max
            ))),
            None => Ok(()),
        },
        (QuestionKind::Text, AnswerValue::Text(text)) => {
            if text.trim().is_empty() {
                return Err(QuizServiceError::InvalidAnswer(
                    "text answer is empty".to_string(),
                ));
            }
            Ok(())
        }
        _ => Err(QuizServiceError::InvalidAnswer(
            "answer shape does not match the question kind".to_string(),
        )),
    }
}

fn validate_options(question: &QuizQuestion, choices: &[String]) -> Result<(), QuizServiceError> {
    for choice in choices {
        if !question.answers.iter().any(|option| option.code == *choice) {
            return Err(QuizServiceError::InvalidAnswer(format!(
                "unknown option {choice} for question {}",
                question.code
            )));
        }
    }
    Ok(())
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error("session not found")]
    SessionNotFound,
    #[error("session is already completed")]
    SessionCompleted,
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("invalid answer: {0}")]
    InvalidAnswer(String),
    #[error("results are not ready")]
    ResultsNotReady,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
