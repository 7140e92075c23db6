use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::quiz::catalog::default_catalog;
use crate::quiz::domain::{Answer, AnswerValue, QuizSession, SessionId};
use crate::quiz::repository::{
    FollowUpRequest, FollowUpScheduler, QuizResultRecord, RepositoryError, SchedulerError,
    SessionStore,
};
use crate::quiz::rules::QuizRuleSet;
use crate::quiz::service::QuizService;

#[derive(Default)]
pub(super) struct InMemoryStore {
    sessions: Mutex<HashMap<String, QuizSession>>,
    answers: Mutex<HashMap<String, Vec<Answer>>>,
    results: Mutex<HashMap<String, QuizResultRecord>>,
}

impl SessionStore for InMemoryStore {
    fn create_session(&self, session: QuizSession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().expect("lock");
        if sessions.contains_key(&session.id.0) {
            return Err(RepositoryError::Conflict);
        }
        sessions.insert(session.id.0.clone(), session);
        Ok(())
    }

    fn load_session(&self, id: &SessionId) -> Result<Option<QuizSession>, RepositoryError> {
        Ok(self.sessions.lock().expect("lock").get(&id.0).cloned())
    }

    fn save_session(&self, session: &QuizSession) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .expect("lock")
            .insert(session.id.0.clone(), session.clone());
        Ok(())
    }

    fn save_answer(&self, id: &SessionId, answer: Answer) -> Result<(), RepositoryError> {
        let mut answers = self.answers.lock().expect("lock");
        let entries = answers.entry(id.0.clone()).or_default();
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
        Ok(self
            .answers
            .lock()
            .expect("lock")
            .get(&id.0)
            .cloned()
            .unwrap_or_default())
    }

    fn save_result(&self, record: &QuizResultRecord) -> Result<(), RepositoryError> {
        self.results
            .lock()
            .expect("lock")
            .insert(record.session_id.0.clone(), record.clone());
        Ok(())
    }

    fn load_result(&self, id: &SessionId) -> Result<Option<QuizResultRecord>, RepositoryError> {
        Ok(self.results.lock().expect("lock").get(&id.0).cloned())
    }
}

#[derive(Default)]
pub(super) struct RecordingScheduler {
    requests: Mutex<Vec<FollowUpRequest>>,
}

impl RecordingScheduler {
    pub(super) fn requests(&self) -> Vec<FollowUpRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl FollowUpScheduler for RecordingScheduler {
    fn schedule(&self, request: FollowUpRequest) -> Result<(), SchedulerError> {
        self.requests.lock().expect("lock").push(request);
        Ok(())
    }
}

pub(super) struct FailingScheduler;

impl FollowUpScheduler for FailingScheduler {
    fn schedule(&self, _request: FollowUpRequest) -> Result<(), SchedulerError> {
        Err(SchedulerError::Transport("smtp offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<QuizService<InMemoryStore, RecordingScheduler>>,
    Arc<InMemoryStore>,
    Arc<RecordingScheduler>,
) {
    let store = Arc::new(InMemoryStore::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let service = Arc::new(QuizService::new(
        default_catalog(),
        QuizRuleSet::builtin(),
        store.clone(),
        scheduler.clone(),
    ));
    (service, store, scheduler)
}

pub(super) fn choice(code: &str) -> AnswerValue {
    AnswerValue::Choices(vec![code.to_string()])
}
