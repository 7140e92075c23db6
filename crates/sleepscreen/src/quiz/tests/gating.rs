use super::common::*;
use crate::quiz::domain::{AnswerValue, QuizMode};
use crate::quiz::gating::GateEvaluator;
use crate::quiz::rules::gate_rules;

use crate::quiz::domain::AnswerMap;

fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
    let mut map = AnswerMap::new();
    for (question, answer) in pairs {
        map.insert(question, AnswerValue::Choices(vec![answer.to_string()]));
    }
    map
}

#[test]
fn male_answer_suppresses_female_only_questions() {
    let evaluator = GateEvaluator::new(gate_rules());
    let skips = evaluator.evaluate(&answers(&[("GENDER", "MALE")]));

    for code in [
        "MENOPAUSE_SYMPTOMS",
        "PREGNANCY_STATUS",
        "POSTPARTUM",
        "MENSTRUAL_CYCLE",
    ] {
        assert!(skips.skips_question(code), "expected {code} to be skipped");
    }
    assert!(!skips.skips_question("ANDROPAUSE_SYMPTOMS"));
    assert!(skips.sections.is_empty());
}

#[test]
fn in_operator_matches_any_listed_code() {
    let evaluator = GateEvaluator::new(gate_rules());

    let young = evaluator.evaluate(&answers(&[("AGE_GROUP", "26_35")]));
    assert!(young.skips_question("AGE_RELATED_SLEEP"));

    let older = evaluator.evaluate(&answers(&[("AGE_GROUP", "56_PLUS")]));
    assert!(!older.skips_question("AGE_RELATED_SLEEP"));
}

#[test]
fn check_triggers_only_consults_referencing_rules() {
    let evaluator = GateEvaluator::new(gate_rules());
    let prior = answers(&[("GENDER", "MALE")]);
    let none = AnswerValue::Choices(vec!["NONE".to_string()]);

    // The incoming answer is merged over the prior ones internally; only
    // rules mentioning the answered question are consulted.
    let caffeine_only = evaluator.check_triggers("CAFFEINE_AMOUNT", &none, &prior);
    assert!(caffeine_only.skips_question("CAFFEINE_TIMING"));
    assert!(!caffeine_only.skips_question("PREGNANCY_STATUS"));

    let male = AnswerValue::Choices(vec!["MALE".to_string()]);
    let gender_only = evaluator.check_triggers("GENDER", &male, &AnswerMap::new());
    assert!(gender_only.skips_question("PREGNANCY_STATUS"));
    assert!(!gender_only.skips_question("CAFFEINE_TIMING"));
}

#[test]
fn missing_answers_trigger_nothing() {
    let evaluator = GateEvaluator::new(gate_rules());
    assert!(evaluator.evaluate(&AnswerMap::new()).is_empty());
}

#[test]
fn service_accumulates_skips_one_way() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Complete, "en", None)
        .expect("session created");

    service
        .submit_answer(&session.id, "GENDER", choice("MALE"))
        .expect("male answer accepted");
    let after_male = service.session(&session.id).expect("session loads");
    assert!(after_male.skips.skips_question("MENOPAUSE_SYMPTOMS"));

    // Revising the answer adds the female skips without restoring the old ones.
    service
        .submit_answer(&session.id, "GENDER", choice("FEMALE"))
        .expect("revised answer accepted");
    let after_revision = service.session(&session.id).expect("session loads");
    assert!(after_revision.skips.skips_question("MENOPAUSE_SYMPTOMS"));
    assert!(after_revision.skips.skips_question("ANDROPAUSE_SYMPTOMS"));
    assert!(after_revision.skips.skips_question("PROSTATE_ISSUES"));
}

#[test]
fn skipped_questions_leave_the_remaining_flow() {
    let (service, _, _) = build_service();
    let session = service
        .create_session(QuizMode::Complete, "en", None)
        .expect("session created");

    service
        .submit_answer(&session.id, "LIVING_SITUATION", choice("ALONE"))
        .expect("answer accepted");
    let progress_alone = service.progress(&session.id).expect("progress");

    let (service2, _, _) = build_service();
    let partnered = service2
        .create_session(QuizMode::Complete, "en", None)
        .expect("session created");
    service2
        .submit_answer(&partnered.id, "LIVING_SITUATION", choice("WITH_PARTNER"))
        .expect("answer accepted");
    let progress_partnered = service2.progress(&partnered.id).expect("progress");

    // PARTNER_SNORING and PARTNER_MOVEMENT drop out for the solo sleeper.
    assert_eq!(progress_alone.total + 2, progress_partnered.total);
}
