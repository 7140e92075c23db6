//! Qualitative medical warnings derived from condition trees, distinct from
//! the numeric scoring system.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::domain::AnswerMap;

pub const DEFAULT_LOCALE: &str = "en";

/// Severity ladder, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagSeverity {
    Urgent,
    Important,
    Moderate,
    Info,
}

impl FlagSeverity {
    pub const fn rank(self) -> u8 {
        match self {
            FlagSeverity::Urgent => 0,
            FlagSeverity::Important => 1,
            FlagSeverity::Moderate => 2,
            FlagSeverity::Info => 3,
        }
    }
}

/// A flag rule: severity-ranked warning with its trigger condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFlagRule {
    pub id: String,
    pub code: String,
    pub severity: FlagSeverity,
    pub condition: Condition,
    pub requires_professional: bool,
}

/// Localized display text attached at render time, keyed by (code, locale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagTranslation {
    pub code: String,
    pub locale: String,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

/// A triggered, rendered flag ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFlag {
    pub code: String,
    pub severity: FlagSeverity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub requires_professional: bool,
    pub confidence: f64,
}

/// Evaluates flag rules and renders localized warnings.
pub struct MedicalFlagGenerator {
    rules: Vec<MedicalFlagRule>,
    translations: HashMap<(String, String), FlagTranslation>,
}

impl MedicalFlagGenerator {
    pub fn new(rules: Vec<MedicalFlagRule>, translations: Vec<FlagTranslation>) -> Self {
        let translations = translations
            .into_iter()
            .map(|t| ((t.code.clone(), t.locale.clone()), t))
            .collect();
        Self {
            rules,
            translations,
        }
    }

    /// Flags for every triggered rule, sorted by severity (urgent first) then
    /// confidence descending. Rules with no resolvable translation are
    /// skipped rather than rendered untranslated.
    pub fn generate(&self, answers: &AnswerMap, locale: &str) -> Vec<MedicalFlag> {
        let mut flags: Vec<MedicalFlag> = self
            .rules
            .iter()
            .filter(|rule| rule.condition.evaluate(answers))
            .filter_map(|rule| {
                let translation = self.translation(&rule.code, locale)?;
                Some(MedicalFlag {
                    code: rule.code.clone(),
                    severity: rule.severity,
                    title: translation.title.clone(),
                    description: translation.description.clone(),
                    recommendation: translation.recommendation.clone(),
                    requires_professional: rule.requires_professional,
                    confidence: rule.condition.confidence(answers),
                })
            })
            .collect();

        flags.sort_by(|a, b| {
            match a.severity.rank().cmp(&b.severity.rank()) {
                Ordering::Equal => b.confidence.total_cmp(&a.confidence),
                ordering => ordering,
            }
        });
        flags
    }

    /// Whether any urgent-severity rule currently triggers. Does not build
    /// the flag list.
    pub fn has_urgent_flags(&self, answers: &AnswerMap) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.severity == FlagSeverity::Urgent)
            .any(|rule| rule.condition.evaluate(answers))
    }

    /// Whether any triggered rule carries the professional-consultation
    /// marker. Does not build the flag list.
    pub fn requires_professional(&self, answers: &AnswerMap) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.requires_professional)
            .any(|rule| rule.condition.evaluate(answers))
    }

    fn translation(&self, code: &str, locale: &str) -> Option<&FlagTranslation> {
        self.translations
            .get(&(code.to_string(), locale.to_string()))
            .or_else(|| {
                self.translations
                    .get(&(code.to_string(), DEFAULT_LOCALE.to_string()))
            })
    }

    pub fn rules(&self) -> &[MedicalFlagRule] {
        &self.rules
    }
}
