use metrics_exporter_prometheus::PrometheusHandle;
use sleepscreen::quiz::{
    Answer, FollowUpRequest, FollowUpScheduler, QuizResultRecord, QuizSession, RepositoryError,
    SchedulerError, SessionId, SessionStore,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage. Sufficient for single-instance deployments
/// and the CLI demo; swap in a persistent implementation behind the same trait
/// when sessions must survive restarts.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, QuizSession>>>,
    answers: Arc<Mutex<HashMap<String, Vec<Answer>>>>,
    results: Arc<Mutex<HashMap<String, QuizResultRecord>>>,
}

impl SessionStore for InMemorySessionStore {
    fn create_session(&self, session: QuizSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.0.clone(), session);
        Ok(())
    }

    fn load_session(&self, id: &SessionId) -> Result<Option<QuizSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn save_session(&self, session: &QuizSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if !guard.contains_key(&session.id.0) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(session.id.0.clone(), session.clone());
        Ok(())
    }

    fn save_answer(&self, id: &SessionId, answer: Answer) -> Result<(), RepositoryError> {
        let mut guard = self.answers.lock().expect("answer mutex poisoned");
        let entries = guard.entry(id.0.clone()).or_default();
        match entries
            .iter_mut()
            .find(|existing| existing.question_code == answer.question_code)
        {
            Some(existing) => *existing = answer,
            None => entries.push(answer),
        }
        Ok(())
    }

    fn load_answers(&self, id: &SessionId) -> Result<Vec<Answer>, RepositoryError> {
        let guard = self.answers.lock().expect("answer mutex poisoned");
        Ok(guard.get(&id.0).cloned().unwrap_or_default())
    }

    fn save_result(&self, record: &QuizResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.results.lock().expect("result mutex poisoned");
        guard.insert(record.session_id.0.clone(), record.clone());
        Ok(())
    }

    fn load_result(&self, id: &SessionId) -> Result<Option<QuizResultRecord>, RepositoryError> {
        let guard = self.results.lock().expect("result mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }
}

/// Records follow-up requests and emits a log line in place of a real mail
/// transport. Downstream deployments wire an SMTP- or queue-backed scheduler
/// behind the same trait.
#[derive(Default, Clone)]
pub(crate) struct LoggingFollowUpScheduler {
    requests: Arc<Mutex<Vec<FollowUpRequest>>>,
}

impl FollowUpScheduler for LoggingFollowUpScheduler {
    fn schedule(&self, request: FollowUpRequest) -> Result<(), SchedulerError> {
        info!(
            session_id = %request.session_id.0,
            urgent = request.has_urgent_flags,
            "follow-up email queued"
        );
        let mut guard = self.requests.lock().expect("follow-up mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

impl LoggingFollowUpScheduler {
    pub(crate) fn requests(&self) -> Vec<FollowUpRequest> {
        self.requests
            .lock()
            .expect("follow-up mutex poisoned")
            .clone()
    }
}
