use crate::quiz::domain::{AnswerMap, AnswerValue};
use crate::quiz::flags::{FlagSeverity, MedicalFlagGenerator};
use crate::quiz::rules::{flag_rules, flag_translations};

fn generator() -> MedicalFlagGenerator {
    MedicalFlagGenerator::new(flag_rules(), flag_translations())
}

fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
    let mut map = AnswerMap::new();
    for (question, answer) in pairs {
        map.insert(question, AnswerValue::Choices(vec![answer.to_string()]));
    }
    map
}

#[test]
fn apnea_flag_requires_both_symptoms() {
    let generator = generator();

    let partial = generator.generate(&answers(&[("SNORING_SEVERITY", "WITH_PAUSES")]), "en");
    assert!(partial.iter().all(|flag| flag.code != "SLEEP_APNEA_URGENT"));

    let full = generator.generate(
        &answers(&[
            ("SNORING_SEVERITY", "WITH_PAUSES"),
            ("BREATHING_PAUSES", "FREQUENTLY"),
        ]),
        "en",
    );
    let apnea = full
        .iter()
        .find(|flag| flag.code == "SLEEP_APNEA_URGENT")
        .expect("apnea flag triggered");
    assert_eq!(apnea.severity, FlagSeverity::Urgent);
    assert_eq!(apnea.confidence, 1.0);
    assert!(apnea.requires_professional);
}

#[test]
fn flags_sort_urgent_first_then_confidence() {
    let generator = generator();
    let map = answers(&[
        ("SNORING_SEVERITY", "WITH_PAUSES"),
        ("BREATHING_PAUSES", "FREQUENTLY"),
        // One of the two OR branches: confidence 0.5, severity INFO.
        ("CAFFEINE_AMOUNT", "FOUR_PLUS"),
    ]);

    let flags = generator.generate(&map, "en");
    assert!(flags.len() >= 2);
    assert_eq!(flags[0].code, "SLEEP_APNEA_URGENT");
    let caffeine = flags
        .iter()
        .find(|flag| flag.code == "CAFFEINE_OVERUSE")
        .expect("caffeine flag triggered");
    assert_eq!(caffeine.severity, FlagSeverity::Info);
    assert_eq!(caffeine.confidence, 0.5);
    assert!(!caffeine.requires_professional);
    for window in flags.windows(2) {
        assert!(window[0].severity.rank() <= window[1].severity.rank());
    }
}

#[test]
fn romanian_locale_renders_translated_text() {
    let generator = generator();
    let map = answers(&[("CHRONIC_PAIN", "SEVERE")]);

    let flags = generator.generate(&map, "ro");
    let pain = flags
        .iter()
        .find(|flag| flag.code == "CHRONIC_PAIN_SEVERE")
        .expect("pain flag triggered");
    assert!(pain.title.contains("Durere"));
}

#[test]
fn unknown_locale_falls_back_to_english() {
    let generator = generator();
    let flags = generator.generate(&answers(&[("CHRONIC_PAIN", "SEVERE")]), "de");
    let pain = flags
        .iter()
        .find(|flag| flag.code == "CHRONIC_PAIN_SEVERE")
        .expect("pain flag triggered");
    assert!(pain.title.contains("Chronic Pain"));
}

#[test]
fn urgent_and_professional_predicates() {
    let generator = generator();

    let calm = answers(&[("CAFFEINE_AMOUNT", "FOUR_PLUS")]);
    assert!(!generator.has_urgent_flags(&calm));
    assert!(!generator.requires_professional(&calm));

    let severe = answers(&[
        ("DEPRESSION_SYMPTOMS", "PERSISTENTLY"),
        ("ENERGY_LEVELS", "VERY_LOW"),
    ]);
    assert!(generator.has_urgent_flags(&severe));
    assert!(generator.requires_professional(&severe));
}

#[test]
fn medication_dependency_needs_duration() {
    let generator = generator();

    let short_term = answers(&[("SLEEP_MEDICATIONS", "PRESCRIPTION")]);
    assert!(generator
        .generate(&short_term, "en")
        .iter()
        .all(|flag| flag.code != "MEDICATION_DEPENDENCY"));

    let long_term = answers(&[
        ("SLEEP_MEDICATIONS", "PRESCRIPTION"),
        ("MEDICATION_DURATION", "MONTHS_PLUS"),
    ]);
    assert!(generator
        .generate(&long_term, "en")
        .iter()
        .any(|flag| flag.code == "MEDICATION_DEPENDENCY"));
}

#[test]
fn no_answers_no_flags() {
    assert!(generator().generate(&AnswerMap::new(), "en").is_empty());
}
