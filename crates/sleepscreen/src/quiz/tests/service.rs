use std::sync::Arc;

use super::common::*;
use crate::quiz::catalog::{default_catalog, QuestionKind};
use crate::quiz::domain::{AnswerValue, QuizMode, SessionId};
use crate::quiz::repository::SessionStore;
use crate::quiz::rules::QuizRuleSet;
use crate::quiz::service::{QuizService, QuizServiceError, SubmitOutcome};

fn answer_for(question_code: &str) -> AnswerValue {
    let catalog = default_catalog();
    let question = catalog.question(question_code).expect("question exists");
    match question.kind {
        QuestionKind::Scale => {
            AnswerValue::Scale(question.scale.map(|scale| scale.min).unwrap_or(1.0))
        }
        _ => AnswerValue::Choices(vec![question
            .answers
            .first()
            .expect("question has options")
            .code
            .clone()]),
    }
}

fn run_to_completion(
    service: &QuizService<InMemoryStore, RecordingScheduler>,
    id: &SessionId,
    first_question: &str,
) -> SubmitOutcome {
    let mut outcome = service
        .submit_answer(id, first_question, answer_for(first_question))
        .expect("answer accepted");
    while let Some(next) = outcome.next_question.clone() {
        outcome = service
            .submit_answer(id, &next, answer_for(&next))
            .expect("answer accepted");
    }
    outcome
}

#[test]
fn create_session_assigns_sequential_id_and_persists() {
    let (service, store, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");
    assert!(session.id.0.starts_with("qs-"));
    assert!(store
        .load_session(&session.id)
        .expect("load works")
        .is_some());
}

#[test]
fn empty_locale_falls_back_to_the_service_default() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "", None)
        .expect("session created");
    assert_eq!(session.locale, "en");
}

#[test]
fn submit_advances_to_next_reachable_question() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Complete, "en", None)
        .expect("session created");

    let outcome = service
        .submit_answer(&session.id, "GENDER", choice("MALE"))
        .expect("answer accepted");
    assert!(!outcome.completed);
    assert_eq!(outcome.next_question.as_deref(), Some("AGE_GROUP"));
    assert_eq!(outcome.progress.answered, 1);
}

#[test]
fn unknown_question_is_rejected() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");

    match service.submit_answer(&session.id, "NOT_A_QUESTION", choice("YES")) {
        Err(QuizServiceError::UnknownQuestion(code)) => assert_eq!(code, "NOT_A_QUESTION"),
        other => panic!("expected unknown question error, got {other:?}"),
    }
}

#[test]
fn invalid_option_is_rejected() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");

    match service.submit_answer(&session.id, "GENDER", choice("YES_PLEASE")) {
        Err(QuizServiceError::InvalidAnswer(_)) => {}
        other => panic!("expected invalid answer error, got {other:?}"),
    }
}

#[test]
fn scale_bounds_are_enforced() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");

    match service.submit_answer(&session.id, "SLEEP_QUALITY", AnswerValue::Scale(42.0)) {
        Err(QuizServiceError::InvalidAnswer(message)) => assert!(message.contains("42")),
        other => panic!("expected invalid answer error, got {other:?}"),
    }
    service
        .submit_answer(&session.id, "SLEEP_QUALITY", AnswerValue::Scale(7.0))
        .expect("in-range scale accepted");
}

#[test]
fn resubmission_replaces_without_inflating_progress() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");

    let first = service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("OFTEN"))
        .expect("answer accepted");
    let second = service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("CONSTANTLY"))
        .expect("revision accepted");
    assert_eq!(first.progress.answered, second.progress.answered);
}

#[test]
fn progress_percent_rounds_to_nearest() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");

    // Ten of the nineteen rapid questions: 52.63% rounds up to 53, a
    // truncating division would report 52.
    let mut next = service.first_question(QuizMode::Rapid);
    for _ in 0..10 {
        let code = next.take().expect("question remains");
        let outcome = service
            .submit_answer(&session.id, &code, answer_for(&code))
            .expect("answer accepted");
        next = outcome.next_question;
    }

    let progress = service.progress(&session.id).expect("progress");
    assert_eq!(progress.answered, 10);
    assert_eq!(progress.total, 19);
    assert_eq!(progress.percent, 53);
}

#[test]
fn rapid_session_runs_to_completion_with_results() {
    let (service, _, scheduler) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", Some("sleeper@example.com".to_string()))
        .expect("session created");

    match service.results(&session.id) {
        Err(QuizServiceError::ResultsNotReady) => {}
        other => panic!("expected results-not-ready, got {other:?}"),
    }

    let first = service
        .first_question(QuizMode::Rapid)
        .expect("first question");
    let outcome = run_to_completion(&service, &session.id, &first);
    assert!(outcome.completed);
    assert_eq!(outcome.progress.percent, 100);

    let record = service.results(&session.id).expect("results available");
    assert_eq!(record.session_id, session.id);
    assert_eq!(
        record.scoring.category_scores.len(),
        QuizRuleSet::builtin().categories.len()
    );

    let requests = scheduler.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].contact_email, "sleeper@example.com");

    match service.submit_answer(&session.id, "GENDER", choice("MALE")) {
        Err(QuizServiceError::SessionCompleted) => {}
        other => panic!("expected completed error, got {other:?}"),
    }
}

#[test]
fn force_complete_is_idempotent() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "en", None)
        .expect("session created");
    service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("CONSTANTLY"))
        .expect("answer accepted");

    let first = service.force_complete(&session.id).expect("forced");
    let second = service.force_complete(&session.id).expect("repeat");
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(first.scoring.overall_score, second.scoring.overall_score);

    let completed = service.session(&session.id).expect("session loads");
    assert!(completed.is_completed());
}

#[test]
fn follow_up_failure_does_not_fail_completion() {
    let store = Arc::new(InMemoryStore::default());
    let service = QuizService::new(
        default_catalog(),
        QuizRuleSet::builtin(),
        store,
        Arc::new(FailingScheduler),
    );
    let session = service
        .create_session(QuizMode::Rapid, "en", Some("sleeper@example.com".to_string()))
        .expect("session created");

    service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("CONSTANTLY"))
        .expect("answer accepted");
    service.force_complete(&session.id).expect("completes anyway");
}

#[test]
fn follow_up_can_be_disabled() {
    let store = Arc::new(InMemoryStore::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let service = QuizService::new(
        default_catalog(),
        QuizRuleSet::builtin(),
        store,
        scheduler.clone(),
    )
    .with_follow_up(false);

    let session = service
        .create_session(QuizMode::Rapid, "en", Some("sleeper@example.com".to_string()))
        .expect("session created");
    service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("CONSTANTLY"))
        .expect("answer accepted");
    service.force_complete(&session.id).expect("completes");

    assert!(scheduler.requests().is_empty());
}

#[test]
fn missing_session_is_not_found() {
    let (service, _, _) = build_service();
    match service.session(&SessionId("qs-999999".to_string())) {
        Err(QuizServiceError::SessionNotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn romanian_session_renders_romanian_recommendations() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Rapid, "ro", None)
        .expect("session created");
    service
        .submit_answer(&session.id, "ANXIETY_LEVEL", choice("CONSTANTLY"))
        .expect("answer accepted");
    let record = service.force_complete(&session.id).expect("completes");

    assert!(!record.recommendations.is_empty());
    assert!(record.recommendations[0].title.contains("mintea"));
}
