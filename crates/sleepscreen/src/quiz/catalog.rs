//! Ordered sections and questions keyed by stable codes.
//!
//! The catalog is an immutable input supplied at construction; the engine
//! never invents or mutates it. Question codes are the join key for every
//! condition evaluation.

use serde::{Deserialize, Serialize};

use super::domain::QuizMode;
use super::gating::SkipSet;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    Scale,
    Text,
}

/// Bounds for a scale question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// A selectable answer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub code: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub code: String,
    pub text: String,
    pub kind: QuestionKind,
    /// Gate questions drive skip rules and are asked early in their section.
    pub is_gate: bool,
    pub modes: Vec<QuizMode>,
    pub answers: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSection {
    pub code: String,
    pub title: String,
    pub modes: Vec<QuizMode>,
    pub questions: Vec<QuizQuestion>,
}

impl QuizSection {
    pub fn questions_for(&self, mode: QuizMode) -> impl Iterator<Item = &QuizQuestion> {
        self.questions
            .iter()
            .filter(move |question| question.modes.contains(&mode))
    }
}

/// The full ordered catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCatalog {
    sections: Vec<QuizSection>,
}

impl QuizCatalog {
    pub fn new(sections: Vec<QuizSection>) -> Self {
        Self { sections }
    }

    /// Sections participating in the given mode, in declared order.
    pub fn sections_for(&self, mode: QuizMode) -> Vec<&QuizSection> {
        self.sections
            .iter()
            .filter(|section| section.modes.contains(&mode))
            .collect()
    }

    pub fn question(&self, question_code: &str) -> Option<&QuizQuestion> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .find(|question| question.code == question_code)
    }

    /// Codes of questions reachable in this mode given the accumulated skips:
    /// questions outside skipped sections and not themselves skipped.
    pub fn reachable_questions(&self, mode: QuizMode, skips: &SkipSet) -> Vec<&str> {
        self.sections_for(mode)
            .into_iter()
            .filter(|section| !skips.skips_section(&section.code))
            .flat_map(|section| section.questions_for(mode))
            .filter(|question| !skips.skips_question(&question.code))
            .map(|question| question.code.as_str())
            .collect()
    }
}

fn single(code: &str, text: &str, gate: bool, modes: &[QuizMode], options: &[&str]) -> QuizQuestion {
    QuizQuestion {
        code: code.to_string(),
        text: text.to_string(),
        kind: QuestionKind::SingleChoice,
        is_gate: gate,
        modes: modes.to_vec(),
        answers: options
            .iter()
            .map(|option| AnswerOption {
                code: option.to_string(),
                text: option.replace('_', " ").to_lowercase(),
            })
            .collect(),
        scale: None,
    }
}

const BOTH: &[QuizMode] = &[QuizMode::Rapid, QuizMode::Complete];
const COMPLETE_ONLY: &[QuizMode] = &[QuizMode::Complete];

/// Built-in sleep-questionnaire catalog covering the default rule set. Codes
/// line up with the default gate, scoring, and flag rules.
pub fn default_catalog() -> QuizCatalog {
    QuizCatalog::new(vec![
        QuizSection {
            code: "S1_PROFILE".to_string(),
            title: "About you".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single("GENDER", "What is your gender?", true, BOTH, &["MALE", "FEMALE", "OTHER"]),
                single(
                    "AGE_GROUP",
                    "What is your age group?",
                    true,
                    BOTH,
                    &["18_25", "26_35", "36_45", "46_55", "56_PLUS"],
                ),
                single(
                    "LIVING_SITUATION",
                    "Do you share your bed or bedroom?",
                    true,
                    BOTH,
                    &["ALONE", "WITH_PARTNER", "SHARED"],
                ),
                single("HAS_YOUNG_CHILDREN", "Do you care for young children at night?", true, BOTH, &["YES", "NO"]),
                single("HAS_PETS_BEDROOM", "Do pets sleep in your bedroom?", true, BOTH, &["YES", "NO"]),
            ],
        },
        QuizSection {
            code: "S2_STRESS".to_string(),
            title: "Stress and mood".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single(
                    "ANXIETY_LEVEL",
                    "How often do you feel anxious?",
                    false,
                    BOTH,
                    &["RARELY", "SOMETIMES", "OFTEN", "CONSTANTLY"],
                ),
                single(
                    "PANIC_ATTACKS",
                    "Do you experience panic attacks?",
                    false,
                    BOTH,
                    &["NEVER", "SOMETIMES", "FREQUENTLY"],
                ),
                single(
                    "DEPRESSION_SYMPTOMS",
                    "Do you experience low mood or loss of interest?",
                    false,
                    BOTH,
                    &["NEVER", "OCCASIONALLY", "PERSISTENTLY"],
                ),
                single(
                    "ENERGY_LEVELS",
                    "How are your energy levels during the day?",
                    false,
                    BOTH,
                    &["NORMAL", "LOW", "VERY_LOW"],
                ),
                single(
                    "TRAUMA_HISTORY",
                    "Have you experienced significant trauma?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "YES_MINOR", "YES_SIGNIFICANT"],
                ),
                single(
                    "RACING_THOUGHTS",
                    "Do racing thoughts keep you awake?",
                    false,
                    COMPLETE_ONLY,
                    &["RARELY", "SOMETIMES", "EVERY_NIGHT"],
                ),
            ],
        },
        QuizSection {
            code: "S3_SLEEP_DISORDERS".to_string(),
            title: "Sleep symptoms".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single(
                    "SNORING_SEVERITY",
                    "How would you describe your snoring?",
                    false,
                    BOTH,
                    &["NONE", "QUIET", "LOUD", "WITH_PAUSES"],
                ),
                single(
                    "BREATHING_PAUSES",
                    "Has anyone observed pauses in your breathing during sleep?",
                    false,
                    BOTH,
                    &["NEVER", "OCCASIONALLY", "FREQUENTLY"],
                ),
                single(
                    "RESTLESS_LEGS_SYNDROME",
                    "Do you feel an urge to move your legs at night?",
                    false,
                    BOTH,
                    &["NEVER", "SOMETIMES", "EVERY_NIGHT"],
                ),
                single(
                    "NIGHTMARES",
                    "How often do you have nightmares?",
                    false,
                    COMPLETE_ONLY,
                    &["RARELY", "MONTHLY", "WEEKLY", "FREQUENTLY"],
                ),
                single(
                    "HEADACHES_MORNING",
                    "Do you wake with headaches?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "OCCASIONALLY", "FREQUENTLY", "DAILY"],
                ),
            ],
        },
        QuizSection {
            code: "S4_RHYTHM".to_string(),
            title: "Schedule and rhythm".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single(
                    "WORK_SCHEDULE",
                    "What is your work schedule?",
                    false,
                    BOTH,
                    &["REGULAR_DAY", "EVENING", "NIGHT_SHIFT", "ROTATING"],
                ),
                single(
                    "SCHEDULE_CONSISTENCY",
                    "How consistent are your sleep and wake times?",
                    false,
                    BOTH,
                    &["VERY_CONSISTENT", "SOMEWHAT", "VERY_INCONSISTENT"],
                ),
                single(
                    "SHIFT_WORK",
                    "Do you work shifts?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "NIGHT_SHIFT", "ROTATING"],
                ),
            ],
        },
        QuizSection {
            code: "S5_SUBSTANCES".to_string(),
            title: "Substances".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single(
                    "CAFFEINE_AMOUNT",
                    "How much caffeine do you drink per day?",
                    true,
                    BOTH,
                    &["NONE", "ONE_TWO", "THREE", "FOUR_PLUS"],
                ),
                single(
                    "CAFFEINE_TIMING",
                    "When is your last caffeinated drink?",
                    false,
                    BOTH,
                    &["MORNING", "AFTERNOON", "EVENING"],
                ),
                single(
                    "ALCOHOL_CONSUMPTION",
                    "How often do you drink alcohol?",
                    false,
                    BOTH,
                    &["NEVER", "MONTHLY", "WEEKLY", "DAILY"],
                ),
                single(
                    "SLEEP_MEDICATIONS",
                    "Do you take sleep medication?",
                    false,
                    COMPLETE_ONLY,
                    &["NONE", "HERBAL", "OTC", "PRESCRIPTION", "BENZODIAZEPINES"],
                ),
                single(
                    "MEDICATION_DURATION",
                    "For how long have you taken it?",
                    false,
                    COMPLETE_ONLY,
                    &["NOT_APPLICABLE", "DAYS", "WEEKS", "MONTHS_PLUS"],
                ),
            ],
        },
        QuizSection {
            code: "S6_ENVIRONMENT".to_string(),
            title: "Bedroom environment".to_string(),
            modes: COMPLETE_ONLY.to_vec(),
            questions: vec![
                single(
                    "ROOM_TEMPERATURE",
                    "How is your bedroom temperature?",
                    false,
                    COMPLETE_ONLY,
                    &["COMFORTABLE", "TOO_HOT", "TOO_COLD"],
                ),
                single(
                    "NOISE_LEVEL",
                    "How noisy is your bedroom at night?",
                    false,
                    COMPLETE_ONLY,
                    &["QUIET", "SOMEWHAT", "NOISY"],
                ),
                single(
                    "PARTNER_SNORING",
                    "Does your partner's snoring disturb you?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SOMETIMES", "OFTEN"],
                ),
                single(
                    "PARTNER_MOVEMENT",
                    "Does your partner's movement wake you?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SOMETIMES", "OFTEN"],
                ),
                single(
                    "PET_DISTURBANCE",
                    "Do pets disturb your sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SOMETIMES", "OFTEN"],
                ),
                single(
                    "CHILDCARE_DISRUPTION",
                    "How often do children wake you at night?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SOMETIMES", "FREQUENTLY"],
                ),
            ],
        },
        QuizSection {
            code: "S7_HEALTH".to_string(),
            title: "Health".to_string(),
            modes: BOTH.to_vec(),
            questions: vec![
                single(
                    "CHRONIC_PAIN",
                    "Do you live with chronic pain?",
                    false,
                    BOTH,
                    &["NONE", "MILD", "MODERATE", "SEVERE"],
                ),
                single(
                    "MENOPAUSE_SYMPTOMS",
                    "Do menopause symptoms affect your sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NONE", "MILD", "MODERATE", "SEVERE"],
                ),
                single(
                    "PREGNANCY_STATUS",
                    "Are you currently pregnant?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "FIRST_TRIMESTER", "SECOND_TRIMESTER", "THIRD_TRIMESTER"],
                ),
                single(
                    "POSTPARTUM",
                    "Have you given birth recently?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "0_3_MONTHS", "3_6_MONTHS"],
                ),
                single(
                    "MENSTRUAL_CYCLE",
                    "Does your menstrual cycle affect your sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "SOMEWHAT", "SIGNIFICANTLY"],
                ),
                single(
                    "ANDROPAUSE_SYMPTOMS",
                    "Do hormonal changes affect your sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NONE", "MILD", "MODERATE", "SEVERE"],
                ),
                single(
                    "PROSTATE_ISSUES",
                    "Do prostate issues wake you at night?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "SOMETIMES", "OFTEN"],
                ),
                single(
                    "AGE_RELATED_SLEEP",
                    "Has your sleep changed noticeably with age?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "SOMEWHAT", "SIGNIFICANTLY"],
                ),
                single(
                    "BLOOD_PRESSURE",
                    "How is your blood pressure?",
                    false,
                    COMPLETE_ONLY,
                    &["NORMAL", "HIGH", "LOW", "UNKNOWN"],
                ),
                single(
                    "ACID_REFLUX",
                    "Does acid reflux or heartburn disturb your sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "OCCASIONALLY", "FREQUENTLY", "NIGHTLY"],
                ),
                single(
                    "NASAL_CONGESTION",
                    "Do you sleep with a blocked nose?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SEASONAL", "OFTEN", "CHRONIC"],
                ),
                QuizQuestion {
                    code: "SLEEP_QUALITY".to_string(),
                    text: "Rate your overall sleep quality.".to_string(),
                    kind: QuestionKind::Scale,
                    is_gate: false,
                    modes: BOTH.to_vec(),
                    answers: Vec::new(),
                    scale: Some(ScaleConfig {
                        min: 1.0,
                        max: 10.0,
                        step: 1.0,
                    }),
                },
            ],
        },
        QuizSection {
            code: "S8_HABITS".to_string(),
            title: "Sleep habits".to_string(),
            modes: COMPLETE_ONLY.to_vec(),
            questions: vec![
                single(
                    "BLUE_LIGHT_EXPOSURE",
                    "How long do you use screens before bed?",
                    false,
                    COMPLETE_ONLY,
                    &["NONE", "UNDER_30", "30_TO_60", "MORE_THAN_60"],
                ),
                single(
                    "BED_ASSOCIATION",
                    "Do you work or watch TV in bed?",
                    false,
                    COMPLETE_ONLY,
                    &["NO", "YES"],
                ),
                single(
                    "CLOCK_WATCHING",
                    "Do you check the clock when you cannot sleep?",
                    false,
                    COMPLETE_ONLY,
                    &["NEVER", "SOMETIMES", "ALWAYS"],
                ),
                single(
                    "HYPERVIGILANCE",
                    "Do you stay alert to sounds while falling asleep?",
                    false,
                    COMPLETE_ONLY,
                    &["RARELY", "SOMETIMES", "CONSTANTLY"],
                ),
                single(
                    "LIGHT_SLEEPER",
                    "How easily do you wake from noise or light?",
                    false,
                    COMPLETE_ONLY,
                    &["DEEP", "AVERAGE", "VERY_LIGHT"],
                ),
                single(
                    "VIVID_DREAMS",
                    "How often do you have vivid dreams?",
                    false,
                    COMPLETE_ONLY,
                    &["RARELY", "SOMETIMES", "EVERY_NIGHT"],
                ),
            ],
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_mode_filters_sections_and_questions() {
        let catalog = default_catalog();
        let rapid = catalog.sections_for(QuizMode::Rapid);
        let complete = catalog.sections_for(QuizMode::Complete);
        assert!(rapid.len() < complete.len());
        assert!(rapid.iter().all(|section| section.code != "S6_ENVIRONMENT"));

        let stress = rapid
            .iter()
            .find(|section| section.code == "S2_STRESS")
            .expect("stress section in rapid mode");
        assert!(stress
            .questions_for(QuizMode::Rapid)
            .all(|question| question.code != "TRAUMA_HISTORY"));
    }

    #[test]
    fn reachable_questions_honors_skips() {
        let catalog = default_catalog();
        let mut skips = SkipSet::default();
        let baseline = catalog.reachable_questions(QuizMode::Complete, &skips).len();

        skips.questions.insert("MENOPAUSE_SYMPTOMS".to_string());
        skips.sections.insert("S6_ENVIRONMENT".to_string());
        let trimmed = catalog.reachable_questions(QuizMode::Complete, &skips);
        assert!(trimmed.len() < baseline);
        assert!(!trimmed.contains(&"MENOPAUSE_SYMPTOMS"));
        assert!(!trimmed.contains(&"NOISE_LEVEL"));
    }

    #[test]
    fn question_lookup_by_code() {
        let catalog = default_catalog();
        assert!(catalog.question("GENDER").is_some());
        assert!(catalog.question("UNKNOWN_CODE").is_none());
    }
}
