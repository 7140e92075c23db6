//! Built-in rule configuration for the sleep questionnaire.
//!
//! A deployment normally loads these from its configuration source at process
//! start; the built-in set keeps the demo binary and the tests self-contained.
//! The engine treats whichever set it is constructed with as immutable for
//! the process lifetime.

use super::condition::{BoolOp, Condition, MatchMode};
use super::flags::{FlagSeverity, FlagTranslation, MedicalFlagRule};
use super::gating::{GateCondition, GateOp, GateRule, GateValue};
use super::scoring::{RiskCategory, ScoringRule};

/// Everything the engine needs besides the catalog, grouped so a service can
/// be constructed from one injected value.
#[derive(Debug, Clone)]
pub struct QuizRuleSet {
    pub gate_rules: Vec<GateRule>,
    pub categories: Vec<RiskCategory>,
    pub scoring_rules: Vec<ScoringRule>,
    pub flag_rules: Vec<MedicalFlagRule>,
    pub flag_translations: Vec<FlagTranslation>,
}

impl QuizRuleSet {
    pub fn builtin() -> Self {
        Self {
            gate_rules: gate_rules(),
            categories: risk_categories(),
            scoring_rules: scoring_rules(),
            flag_rules: flag_rules(),
            flag_translations: flag_translations(),
        }
    }
}

fn equals(question: &str, answer: &str) -> GateCondition {
    GateCondition::Simple {
        question_code: question.to_string(),
        operator: GateOp::Equals,
        value: GateValue::Code(answer.to_string()),
    }
}

fn gate(id: &str, condition: GateCondition, questions: &[&str]) -> GateRule {
    GateRule {
        id: id.to_string(),
        condition,
        skips_sections: Vec::new(),
        skips_questions: questions.iter().map(|q| q.to_string()).collect(),
    }
}

pub fn gate_rules() -> Vec<GateRule> {
    vec![
        gate(
            "gate_male",
            equals("GENDER", "MALE"),
            &[
                "MENOPAUSE_SYMPTOMS",
                "PREGNANCY_STATUS",
                "POSTPARTUM",
                "MENSTRUAL_CYCLE",
            ],
        ),
        gate(
            "gate_female",
            equals("GENDER", "FEMALE"),
            &["ANDROPAUSE_SYMPTOMS", "PROSTATE_ISSUES"],
        ),
        gate(
            "gate_young",
            GateCondition::Simple {
                question_code: "AGE_GROUP".to_string(),
                operator: GateOp::In,
                value: GateValue::Codes(vec![
                    "18_25".to_string(),
                    "26_35".to_string(),
                    "36_45".to_string(),
                ]),
            },
            &[
                "AGE_RELATED_SLEEP",
                "MENOPAUSE_SYMPTOMS",
                "ANDROPAUSE_SYMPTOMS",
            ],
        ),
        gate(
            "gate_no_children",
            equals("HAS_YOUNG_CHILDREN", "NO"),
            &["CHILDCARE_DISRUPTION"],
        ),
        gate(
            "gate_no_pets",
            equals("HAS_PETS_BEDROOM", "NO"),
            &["PET_DISTURBANCE"],
        ),
        gate(
            "gate_lives_alone",
            equals("LIVING_SITUATION", "ALONE"),
            &["PARTNER_SNORING", "PARTNER_MOVEMENT"],
        ),
        gate(
            "gate_no_caffeine",
            equals("CAFFEINE_AMOUNT", "NONE"),
            &["CAFFEINE_TIMING"],
        ),
    ]
}

fn category(code: &str, name: &str, max_score: i32, weight: f64) -> RiskCategory {
    RiskCategory {
        code: code.to_string(),
        name: name.to_string(),
        max_score,
        weight,
    }
}

pub fn risk_categories() -> Vec<RiskCategory> {
    vec![
        category("R1_STRESS_PSYCH", "Stress & Psychological", 30, 1.2),
        category("R2_SLEEP_DISORDERS", "Sleep Disorders", 25, 1.3),
        category("R3_LIFESTYLE", "Lifestyle Factors", 25, 1.0),
        category("R4_ENVIRONMENT", "Sleep Environment", 20, 0.9),
        category("R5_HEALTH", "Health Conditions", 25, 1.2),
        category("R6_SUBSTANCES", "Substances & Medications", 20, 1.1),
        category("R7_CIRCADIAN", "Circadian Rhythm", 20, 1.0),
        category("R8_HORMONAL", "Hormonal Factors", 15, 1.0),
        category("R9_DIGESTIVE", "Digestive Issues", 15, 0.8),
        category("R10_RESPIRATORY", "Respiratory Issues", 20, 1.1),
        category("R11_PAIN", "Pain & Discomfort", 20, 1.0),
        category("R12_NEUROLOGICAL", "Neurological", 15, 1.1),
        category("R13_EXTERNAL", "External Factors", 15, 0.7),
        category("R14_SLEEP_HABITS", "Sleep Habits", 20, 0.9),
    ]
}

fn single_rule(id: &str, category: &str, points: i32, question: &str, answer: &str) -> ScoringRule {
    ScoringRule {
        id: id.to_string(),
        category_code: category.to_string(),
        condition: Condition::Single {
            question_code: question.to_string(),
            answer_code: answer.to_string(),
        },
        points,
        description: None,
    }
}

fn any_rule(
    id: &str,
    category: &str,
    points: i32,
    question: &str,
    answers: &[&str],
) -> ScoringRule {
    ScoringRule {
        id: id.to_string(),
        category_code: category.to_string(),
        condition: Condition::Multi {
            question_code: question.to_string(),
            answer_codes: answers.iter().map(|a| a.to_string()).collect(),
            match_mode: MatchMode::Any,
        },
        points,
        description: None,
    }
}

pub fn scoring_rules() -> Vec<ScoringRule> {
    vec![
        // R1: stress & psychological
        single_rule("r1_anxiety_high", "R1_STRESS_PSYCH", 5, "ANXIETY_LEVEL", "CONSTANTLY"),
        single_rule("r1_anxiety_moderate", "R1_STRESS_PSYCH", 3, "ANXIETY_LEVEL", "OFTEN"),
        single_rule("r1_panic_attacks", "R1_STRESS_PSYCH", 5, "PANIC_ATTACKS", "FREQUENTLY"),
        single_rule("r1_trauma", "R1_STRESS_PSYCH", 5, "TRAUMA_HISTORY", "YES_SIGNIFICANT"),
        single_rule("r1_depression", "R1_STRESS_PSYCH", 5, "DEPRESSION_SYMPTOMS", "PERSISTENTLY"),
        single_rule("r1_racing_thoughts", "R1_STRESS_PSYCH", 4, "RACING_THOUGHTS", "EVERY_NIGHT"),
        // R2: sleep disorders
        single_rule("r2_snoring_with_pauses", "R2_SLEEP_DISORDERS", 5, "SNORING_SEVERITY", "WITH_PAUSES"),
        single_rule("r2_snoring_loud", "R2_SLEEP_DISORDERS", 3, "SNORING_SEVERITY", "LOUD"),
        single_rule("r2_breathing_pauses", "R2_SLEEP_DISORDERS", 5, "BREATHING_PAUSES", "FREQUENTLY"),
        single_rule("r2_restless_legs", "R2_SLEEP_DISORDERS", 4, "RESTLESS_LEGS_SYNDROME", "EVERY_NIGHT"),
        // R3: lifestyle
        single_rule("r3_blue_light_high", "R3_LIFESTYLE", 4, "BLUE_LIGHT_EXPOSURE", "MORE_THAN_60"),
        single_rule("r3_bed_association", "R3_LIFESTYLE", 4, "BED_ASSOCIATION", "YES"),
        single_rule("r3_clock_watching", "R3_LIFESTYLE", 2, "CLOCK_WATCHING", "ALWAYS"),
        // R4: environment
        single_rule("r4_room_too_hot", "R4_ENVIRONMENT", 3, "ROOM_TEMPERATURE", "TOO_HOT"),
        single_rule("r4_room_too_cold", "R4_ENVIRONMENT", 2, "ROOM_TEMPERATURE", "TOO_COLD"),
        single_rule("r4_noise", "R4_ENVIRONMENT", 3, "NOISE_LEVEL", "NOISY"),
        // R5: health
        single_rule("r5_chronic_pain", "R5_HEALTH", 4, "CHRONIC_PAIN", "SEVERE"),
        single_rule("r5_chronic_pain_moderate", "R5_HEALTH", 2, "CHRONIC_PAIN", "MODERATE"),
        any_rule("r5_blood_pressure", "R5_HEALTH", 3, "BLOOD_PRESSURE", &["HIGH", "LOW"]),
        // R6: substances
        single_rule("r6_caffeine_high", "R6_SUBSTANCES", 4, "CAFFEINE_AMOUNT", "FOUR_PLUS"),
        single_rule("r6_caffeine_late", "R6_SUBSTANCES", 4, "CAFFEINE_TIMING", "EVENING"),
        single_rule("r6_caffeine_afternoon", "R6_SUBSTANCES", 2, "CAFFEINE_TIMING", "AFTERNOON"),
        single_rule("r6_alcohol_daily", "R6_SUBSTANCES", 4, "ALCOHOL_CONSUMPTION", "DAILY"),
        single_rule("r6_alcohol_weekly", "R6_SUBSTANCES", 2, "ALCOHOL_CONSUMPTION", "WEEKLY"),
        // R7: circadian
        single_rule("r7_shift_work_rotating", "R7_CIRCADIAN", 5, "SHIFT_WORK", "ROTATING"),
        single_rule("r7_shift_work_night", "R7_CIRCADIAN", 5, "SHIFT_WORK", "NIGHT_SHIFT"),
        single_rule("r7_irregular_schedule", "R7_CIRCADIAN", 4, "SCHEDULE_CONSISTENCY", "VERY_INCONSISTENT"),
        // R8: hormonal
        single_rule("r8_menopause_severe", "R8_HORMONAL", 5, "MENOPAUSE_SYMPTOMS", "SEVERE"),
        single_rule("r8_menopause_moderate", "R8_HORMONAL", 3, "MENOPAUSE_SYMPTOMS", "MODERATE"),
        any_rule("r8_andropause", "R8_HORMONAL", 4, "ANDROPAUSE_SYMPTOMS", &["MODERATE", "SEVERE"]),
        any_rule(
            "r8_pregnancy",
            "R8_HORMONAL",
            3,
            "PREGNANCY_STATUS",
            &["FIRST_TRIMESTER", "SECOND_TRIMESTER", "THIRD_TRIMESTER"],
        ),
        any_rule("r8_postpartum", "R8_HORMONAL", 4, "POSTPARTUM", &["0_3_MONTHS", "3_6_MONTHS"]),
        single_rule("r8_menstrual", "R8_HORMONAL", 3, "MENSTRUAL_CYCLE", "SIGNIFICANTLY"),
        // R9: digestive
        single_rule("r9_acid_reflux_nightly", "R9_DIGESTIVE", 4, "ACID_REFLUX", "NIGHTLY"),
        single_rule("r9_acid_reflux_frequent", "R9_DIGESTIVE", 2, "ACID_REFLUX", "FREQUENTLY"),
        // R10: respiratory
        single_rule("r10_nasal_chronic", "R10_RESPIRATORY", 4, "NASAL_CONGESTION", "CHRONIC"),
        single_rule("r10_nasal_often", "R10_RESPIRATORY", 2, "NASAL_CONGESTION", "OFTEN"),
        // R11: pain
        single_rule("r11_morning_headaches", "R11_PAIN", 4, "HEADACHES_MORNING", "DAILY"),
        single_rule("r11_morning_headaches_freq", "R11_PAIN", 2, "HEADACHES_MORNING", "FREQUENTLY"),
        // R12: neurological
        single_rule("r12_nightmares", "R12_NEUROLOGICAL", 3, "NIGHTMARES", "FREQUENTLY"),
        single_rule("r12_vivid_dreams", "R12_NEUROLOGICAL", 2, "VIVID_DREAMS", "EVERY_NIGHT"),
        // R13: external
        single_rule("r13_partner_snoring", "R13_EXTERNAL", 4, "PARTNER_SNORING", "OFTEN"),
        single_rule("r13_partner_movement", "R13_EXTERNAL", 3, "PARTNER_MOVEMENT", "OFTEN"),
        single_rule("r13_pet", "R13_EXTERNAL", 2, "PET_DISTURBANCE", "OFTEN"),
        single_rule("r13_childcare", "R13_EXTERNAL", 4, "CHILDCARE_DISRUPTION", "FREQUENTLY"),
        // R14: sleep habits
        single_rule("r14_hypervigilance", "R14_SLEEP_HABITS", 4, "HYPERVIGILANCE", "CONSTANTLY"),
        single_rule("r14_light_sleeper", "R14_SLEEP_HABITS", 3, "LIGHT_SLEEPER", "VERY_LIGHT"),
    ]
}

fn single_condition(question: &str, answer: &str) -> Condition {
    Condition::Single {
        question_code: question.to_string(),
        answer_code: answer.to_string(),
    }
}

fn any_condition(question: &str, answers: &[&str]) -> Condition {
    Condition::Multi {
        question_code: question.to_string(),
        answer_codes: answers.iter().map(|a| a.to_string()).collect(),
        match_mode: MatchMode::Any,
    }
}

fn and(conditions: Vec<Condition>) -> Condition {
    Condition::Combination {
        operator: BoolOp::And,
        conditions,
    }
}

fn flag(
    id: &str,
    code: &str,
    severity: FlagSeverity,
    requires_professional: bool,
    condition: Condition,
) -> MedicalFlagRule {
    MedicalFlagRule {
        id: id.to_string(),
        code: code.to_string(),
        severity,
        condition,
        requires_professional,
    }
}

pub fn flag_rules() -> Vec<MedicalFlagRule> {
    vec![
        flag(
            "flag_apnea_urgent",
            "SLEEP_APNEA_URGENT",
            FlagSeverity::Urgent,
            true,
            and(vec![
                single_condition("SNORING_SEVERITY", "WITH_PAUSES"),
                single_condition("BREATHING_PAUSES", "FREQUENTLY"),
            ]),
        ),
        flag(
            "flag_apnea_likely",
            "SLEEP_APNEA_LIKELY",
            FlagSeverity::Important,
            true,
            and(vec![
                any_condition("SNORING_SEVERITY", &["LOUD", "WITH_PAUSES"]),
                any_condition("HEADACHES_MORNING", &["FREQUENTLY", "DAILY"]),
            ]),
        ),
        flag(
            "flag_depression_urgent",
            "DEPRESSION_URGENT",
            FlagSeverity::Urgent,
            true,
            and(vec![
                single_condition("DEPRESSION_SYMPTOMS", "PERSISTENTLY"),
                single_condition("ENERGY_LEVELS", "VERY_LOW"),
            ]),
        ),
        flag(
            "flag_ptsd",
            "PTSD_INDICATOR",
            FlagSeverity::Important,
            true,
            and(vec![
                single_condition("TRAUMA_HISTORY", "YES_SIGNIFICANT"),
                any_condition("NIGHTMARES", &["WEEKLY", "FREQUENTLY"]),
            ]),
        ),
        flag(
            "flag_anxiety_severe",
            "SEVERE_ANXIETY",
            FlagSeverity::Important,
            true,
            and(vec![
                single_condition("ANXIETY_LEVEL", "CONSTANTLY"),
                any_condition("PANIC_ATTACKS", &["SOMETIMES", "FREQUENTLY"]),
            ]),
        ),
        flag(
            "flag_chronic_pain",
            "CHRONIC_PAIN_SEVERE",
            FlagSeverity::Moderate,
            true,
            single_condition("CHRONIC_PAIN", "SEVERE"),
        ),
        flag(
            "flag_rls",
            "RLS_LIKELY",
            FlagSeverity::Moderate,
            true,
            single_condition("RESTLESS_LEGS_SYNDROME", "EVERY_NIGHT"),
        ),
        flag(
            "flag_caffeine",
            "CAFFEINE_OVERUSE",
            FlagSeverity::Info,
            false,
            Condition::Combination {
                operator: BoolOp::Or,
                conditions: vec![
                    single_condition("CAFFEINE_AMOUNT", "FOUR_PLUS"),
                    single_condition("CAFFEINE_TIMING", "EVENING"),
                ],
            },
        ),
        flag(
            "flag_circadian",
            "CIRCADIAN_DISORDER",
            FlagSeverity::Moderate,
            true,
            and(vec![
                any_condition("WORK_SCHEDULE", &["NIGHT_SHIFT", "ROTATING"]),
                single_condition("SCHEDULE_CONSISTENCY", "VERY_INCONSISTENT"),
            ]),
        ),
        flag(
            "flag_medication_dependency",
            "MEDICATION_DEPENDENCY",
            FlagSeverity::Moderate,
            true,
            and(vec![
                any_condition("SLEEP_MEDICATIONS", &["PRESCRIPTION", "BENZODIAZEPINES"]),
                single_condition("MEDICATION_DURATION", "MONTHS_PLUS"),
            ]),
        ),
    ]
}

fn translation(
    code: &str,
    locale: &str,
    title: &str,
    description: &str,
    recommendation: &str,
) -> FlagTranslation {
    FlagTranslation {
        code: code.to_string(),
        locale: locale.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        recommendation: recommendation.to_string(),
    }
}

pub fn flag_translations() -> Vec<FlagTranslation> {
    vec![
        translation(
            "SLEEP_APNEA_URGENT",
            "en",
            "Possible Sleep Apnea - Urgent",
            "Your responses strongly indicate sleep apnea with breathing stops during sleep.",
            "Please consult a sleep specialist urgently for a sleep study.",
        ),
        translation(
            "SLEEP_APNEA_URGENT",
            "ro",
            "Posibilă Apnee de Somn - Urgent",
            "Răspunsurile dumneavoastră indică puternic apnee de somn cu opriri ale respirației în timpul somnului.",
            "Vă rugăm să consultați urgent un specialist în tulburări de somn pentru o polisomnografie.",
        ),
        translation(
            "SLEEP_APNEA_LIKELY",
            "en",
            "Possible Sleep Apnea",
            "Your responses suggest possible sleep apnea based on snoring and symptoms.",
            "We recommend consulting a sleep specialist for evaluation.",
        ),
        translation(
            "SLEEP_APNEA_LIKELY",
            "ro",
            "Posibilă Apnee de Somn",
            "Răspunsurile dumneavoastră sugerează posibilă apnee de somn pe baza sforăitului și simptomelor.",
            "Vă recomandăm să consultați un specialist în tulburări de somn pentru evaluare.",
        ),
        translation(
            "DEPRESSION_URGENT",
            "en",
            "Possible Depression",
            "Your responses suggest depression, which significantly impacts sleep.",
            "Please speak with a mental health professional. Help is available.",
        ),
        translation(
            "DEPRESSION_URGENT",
            "ro",
            "Posibilă Depresie",
            "Răspunsurile dumneavoastră sugerează depresie, care afectează semnificativ somnul.",
            "Vă rugăm să discutați cu un specialist în sănătate mintală. Ajutorul este disponibil.",
        ),
        translation(
            "PTSD_INDICATOR",
            "en",
            "Trauma-Related Sleep Issues",
            "Trauma may be affecting your sleep based on your symptoms.",
            "Consider consulting a trauma-informed therapist.",
        ),
        translation(
            "PTSD_INDICATOR",
            "ro",
            "Probleme de Somn Legate de Traumă",
            "Trauma poate afecta somnul dumneavoastră pe baza simptomelor.",
            "Luați în considerare consultarea unui terapeut specializat în traumă.",
        ),
        translation(
            "SEVERE_ANXIETY",
            "en",
            "Severe Anxiety",
            "High anxiety levels are significantly impacting your sleep.",
            "We recommend consulting a mental health professional.",
        ),
        translation(
            "SEVERE_ANXIETY",
            "ro",
            "Anxietate Severă",
            "Nivelurile ridicate de anxietate vă afectează semnificativ somnul.",
            "Vă recomandăm să consultați un specialist în sănătate mintală.",
        ),
        translation(
            "CHRONIC_PAIN_SEVERE",
            "en",
            "Chronic Pain Affecting Sleep",
            "Severe chronic pain is disrupting your sleep quality.",
            "Discuss pain management options with your healthcare provider.",
        ),
        translation(
            "CHRONIC_PAIN_SEVERE",
            "ro",
            "Durere Cronică ce Afectează Somnul",
            "Durerea cronică severă vă perturbă calitatea somnului.",
            "Discutați opțiunile de management al durerii cu medicul dumneavoastră.",
        ),
        translation(
            "RLS_LIKELY",
            "en",
            "Possible Restless Legs Syndrome",
            "Your symptoms suggest Restless Legs Syndrome.",
            "A healthcare provider can diagnose RLS and recommend treatments.",
        ),
        translation(
            "RLS_LIKELY",
            "ro",
            "Posibil Sindrom al Picioarelor Neliniștite",
            "Simptomele dumneavoastră sugerează Sindromul Picioarelor Neliniștite.",
            "Un medic poate diagnostica RLS și recomanda tratamente.",
        ),
        translation(
            "CAFFEINE_OVERUSE",
            "en",
            "Caffeine May Be Affecting Sleep",
            "Your caffeine consumption may be contributing to sleep difficulties.",
            "Try limiting caffeine to 2-3 cups before noon.",
        ),
        translation(
            "CAFFEINE_OVERUSE",
            "ro",
            "Cafeina Poate Afecta Somnul",
            "Consumul dumneavoastră de cofeină poate contribui la dificultățile de somn.",
            "Încercați să limitați cafeina la 2-3 căni înainte de prânz.",
        ),
        translation(
            "CIRCADIAN_DISORDER",
            "en",
            "Circadian Rhythm Disruption",
            "Shift work and irregular sleep schedules are disrupting your natural circadian rhythm.",
            "Consider strategies like light therapy and maintaining consistent sleep times when possible.",
        ),
        translation(
            "CIRCADIAN_DISORDER",
            "ro",
            "Perturbarea Ritmului Circadian",
            "Munca în schimburi și programul de somn neregulat vă perturbă ritmul circadian natural.",
            "Luați în considerare strategii precum terapia cu lumină și menținerea unor ore de somn constante.",
        ),
        translation(
            "MEDICATION_DEPENDENCY",
            "en",
            "Sleep Medication Concern",
            "Long-term use of sleep medications can lead to dependency.",
            "Discuss with your healthcare provider about gradually reducing sleep medication use.",
        ),
        translation(
            "MEDICATION_DEPENDENCY",
            "ro",
            "Îngrijorare privind Medicamentele pentru Somn",
            "Utilizarea pe termen lung a medicamentelor pentru somn poate duce la dependență.",
            "Discutați cu medicul dumneavoastră despre reducerea treptată a utilizării medicamentelor pentru somn.",
        ),
    ]
}
