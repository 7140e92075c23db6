use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gating::SkipSet;

/// Identifier wrapper for quiz sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Which flow the respondent is taking; `Rapid` is a shortened subset of the
/// full catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizMode {
    Rapid,
    Complete,
}

impl QuizMode {
    pub const fn label(self) -> &'static str {
        match self {
            QuizMode::Rapid => "rapid",
            QuizMode::Complete => "complete",
        }
    }
}

/// A single recorded answer, keyed by question code within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_code: String,
    pub value: AnswerValue,
    pub responded_at: DateTime<Utc>,
}

/// What the respondent supplied for one question. Free text is carried for
/// persistence but is never consulted by gating or scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Choices(Vec<String>),
    Scale(f64),
    Text(String),
}

impl AnswerValue {
    pub fn is_evaluable(&self) -> bool {
        match self {
            AnswerValue::Choices(codes) => !codes.is_empty(),
            AnswerValue::Scale(_) => true,
            AnswerValue::Text(_) => false,
        }
    }
}

/// Accumulated answers for one session, keyed by question code.
///
/// Built fresh from whatever answers exist at evaluation time; insertion order
/// is irrelevant and a later insert for the same code replaces the earlier
/// one. Non-evaluable values (free text, empty choice lists) are dropped on
/// construction so every entry can be consulted by the evaluators.
#[derive(Debug, Clone, Default)]
pub struct AnswerMap {
    entries: HashMap<String, AnswerValue>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_answers<'a, I>(answers: I) -> Self
    where
        I: IntoIterator<Item = &'a Answer>,
    {
        let mut map = Self::new();
        for answer in answers {
            map.insert(&answer.question_code, answer.value.clone());
        }
        map
    }

    /// Upsert an answer. Last write wins; non-evaluable values remove any
    /// previous entry for the code so a cleared answer stops matching.
    pub fn insert(&mut self, question_code: &str, value: AnswerValue) {
        if value.is_evaluable() {
            self.entries.insert(question_code.to_string(), value);
        } else {
            self.entries.remove(question_code);
        }
    }

    pub fn contains(&self, question_code: &str) -> bool {
        self.entries.contains_key(question_code)
    }

    /// Selected choice codes for a question, if the answer is choice-shaped.
    pub fn choices(&self, question_code: &str) -> Option<&[String]> {
        match self.entries.get(question_code) {
            Some(AnswerValue::Choices(codes)) => Some(codes),
            _ => None,
        }
    }

    /// Numeric view of an answer: the scale value directly, or the first
    /// choice code parsed as a float. `None` when missing or unparsable.
    pub fn numeric(&self, question_code: &str) -> Option<f64> {
        match self.entries.get(question_code)? {
            AnswerValue::Scale(value) => Some(*value),
            AnswerValue::Choices(codes) => codes.first()?.trim().parse::<f64>().ok(),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn question_codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Session state mutated exclusively by the orchestrator as answers arrive.
///
/// `current_section_index` and `current_question_index` are stored for
/// clients resuming a session from a snapshot; advancement itself is
/// derived from the reachable, still-unanswered questions, not from
/// these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub id: SessionId,
    pub mode: QuizMode,
    pub locale: String,
    pub contact_email: Option<String>,
    pub current_section_index: usize,
    pub current_question_index: usize,
    pub skips: SkipSet,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new(id: SessionId, mode: QuizMode, locale: &str, contact_email: Option<String>) -> Self {
        Self {
            id,
            mode,
            locale: locale.to_string(),
            contact_email,
            current_section_index: 0,
            current_question_index: 0,
            skips: SkipSet::default(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
