use crate::infra::{InMemorySessionStore, LoggingFollowUpScheduler};
use clap::Args;
use sleepscreen::error::AppError;
use sleepscreen::quiz::{
    default_catalog, AnswerValue, QuestionKind, QuizMode, QuizRuleSet, QuizService,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run the complete questionnaire instead of the rapid screen
    #[arg(long)]
    pub(crate) complete: bool,
    /// Locale for flag and recommendation text
    #[arg(long, default_value = "en")]
    pub(crate) locale: String,
    /// Contact email to exercise the follow-up path
    #[arg(long)]
    pub(crate) contact_email: Option<String>,
}

/// Scripted answers for a respondent with apnea symptoms, heavy caffeine use,
/// and elevated anxiety. Everything else takes the mildest option.
fn demo_persona() -> HashMap<&'static str, AnswerValue> {
    let choice = |code: &str| AnswerValue::Choices(vec![code.to_string()]);
    HashMap::from([
        ("SNORING_SEVERITY", choice("WITH_PAUSES")),
        ("BREATHING_PAUSES", choice("FREQUENTLY")),
        ("ANXIETY_LEVEL", choice("CONSTANTLY")),
        ("PANIC_ATTACKS", choice("FREQUENTLY")),
        ("CAFFEINE_AMOUNT", choice("FOUR_PLUS")),
        ("CAFFEINE_TIMING", choice("EVENING")),
    ])
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mode = if args.complete {
        QuizMode::Complete
    } else {
        QuizMode::Rapid
    };

    let catalog = default_catalog();
    let store = Arc::new(InMemorySessionStore::default());
    let scheduler = Arc::new(LoggingFollowUpScheduler::default());
    let service = QuizService::new(
        catalog.clone(),
        QuizRuleSet::builtin(),
        store,
        Arc::clone(&scheduler),
    );

    let session = service.create_session(mode, &args.locale, args.contact_email.clone())?;
    println!("Sleep screening demo");
    println!("  Session: {} ({})", session.id.0, mode.label());

    let persona = demo_persona();
    let mut next = service.first_question(mode);
    while let Some(question_code) = next.take() {
        let question = catalog
            .question(&question_code)
            .expect("catalog question exists");
        let value = persona.get(question_code.as_str()).cloned().unwrap_or_else(|| {
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
        });
        let summary = match &value {
            AnswerValue::Choices(choices) => choices.join(", "),
            AnswerValue::Scale(scale) => scale.to_string(),
            AnswerValue::Text(text) => text.clone(),
        };
        println!("  {} -> {}", question_code, summary);
        let outcome = service.submit_answer(&session.id, &question_code, value)?;
        next = outcome.next_question;
    }

    let record = service.results(&session.id)?;
    println!("\nOverall score: {} ({:?})", record.scoring.overall_score, record.scoring.overall_risk_level);

    println!("Top risk categories:");
    for score in &record.scoring.top_risks {
        println!(
            "  {:<20} {:>3}% ({}/{} points, {:?})",
            score.category_name, score.percentage, score.raw_score, score.max_possible, score.risk_level
        );
    }

    if record.flags.is_empty() {
        println!("No medical flags raised.");
    } else {
        println!("Medical flags:");
        for flag in &record.flags {
            println!(
                "  [{:?}] {} (confidence {:.0}%)",
                flag.severity,
                flag.title,
                flag.confidence * 100.0
            );
        }
    }

    if !record.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &record.recommendations {
            println!("  {}. {}", recommendation.priority, recommendation.title);
        }
    }

    let follow_ups = scheduler.requests();
    if !follow_ups.is_empty() {
        println!(
            "\nFollow-up scheduled for {} (urgent: {})",
            follow_ups[0].contact_email, follow_ups[0].has_urgent_flags
        );
    }

    Ok(())
}
