//! Gate rules decide which sections and questions become unreachable as
//! answers accumulate.
//!
//! The gate grammar keeps its own surface syntax (equality and containment
//! operators over answer sets) but leans on the same answer-lookup helpers as
//! the canonical condition AST, so leaf semantics cannot drift between the
//! two.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::condition::BoolOp;
use super::domain::{AnswerMap, AnswerValue};

/// Comparison operator for a simple gate condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateOp {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    GreaterThan,
    LessThan,
}

/// Right-hand side of a simple gate condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GateValue {
    Code(String),
    Codes(Vec<String>),
    Number(f64),
}

/// Condition tree for gate rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum GateCondition {
    Composite {
        operator: BoolOp,
        conditions: Vec<GateCondition>,
    },
    Simple {
        question_code: String,
        operator: GateOp,
        value: GateValue,
    },
}

impl GateCondition {
    /// Evaluate against the collected answers. Shape mismatches between the
    /// operator and the configured value degrade to `false`.
    pub fn evaluate(&self, answers: &AnswerMap) -> bool {
        match self {
            GateCondition::Composite {
                operator,
                conditions,
            } => match operator {
                BoolOp::And => conditions.iter().all(|c| c.evaluate(answers)),
                BoolOp::Or => conditions.iter().any(|c| c.evaluate(answers)),
            },
            GateCondition::Simple {
                question_code,
                operator,
                value,
            } => evaluate_simple(answers, question_code, *operator, value),
        }
    }

    pub fn references_question(&self, question_code: &str) -> bool {
        match self {
            GateCondition::Composite { conditions, .. } => conditions
                .iter()
                .any(|c| c.references_question(question_code)),
            GateCondition::Simple {
                question_code: code,
                ..
            } => code == question_code,
        }
    }
}

fn evaluate_simple(
    answers: &AnswerMap,
    question_code: &str,
    operator: GateOp,
    value: &GateValue,
) -> bool {
    match operator {
        GateOp::Equals | GateOp::NotEquals => {
            let GateValue::Code(expected) = value else {
                return false;
            };
            let Some(selected) = answers.choices(question_code) else {
                return false;
            };
            let hit = selected.iter().any(|code| code == expected);
            if operator == GateOp::Equals {
                hit
            } else {
                !hit
            }
        }
        GateOp::In | GateOp::NotIn => {
            let GateValue::Codes(expected) = value else {
                return false;
            };
            let Some(selected) = answers.choices(question_code) else {
                return false;
            };
            let hit = expected
                .iter()
                .any(|code| selected.iter().any(|chosen| chosen == code));
            if operator == GateOp::In {
                hit
            } else {
                !hit
            }
        }
        GateOp::Contains => {
            let GateValue::Code(fragment) = value else {
                return false;
            };
            answers
                .choices(question_code)
                .is_some_and(|selected| selected.iter().any(|code| code.contains(fragment)))
        }
        GateOp::GreaterThan | GateOp::LessThan => {
            let GateValue::Number(bound) = value else {
                return false;
            };
            let Some(answer) = answers.numeric(question_code) else {
                return false;
            };
            if operator == GateOp::GreaterThan {
                answer > *bound
            } else {
                answer < *bound
            }
        }
    }
}

/// A gate rule: when its condition holds, the listed sections and questions
/// are suppressed from the remaining flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRule {
    pub id: String,
    pub condition: GateCondition,
    #[serde(default)]
    pub skips_sections: Vec<String>,
    #[serde(default)]
    pub skips_questions: Vec<String>,
}

/// Sections and questions suppressed by triggered gate rules.
///
/// Ordered sets keep serialized output stable for persistence and assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipSet {
    pub sections: BTreeSet<String>,
    pub questions: BTreeSet<String>,
}

impl SkipSet {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.questions.is_empty()
    }

    /// Union the other set into this one. Skips are one-directional: nothing
    /// is ever removed here.
    pub fn merge(&mut self, other: &SkipSet) {
        self.sections.extend(other.sections.iter().cloned());
        self.questions.extend(other.questions.iter().cloned());
    }

    pub fn skips_section(&self, code: &str) -> bool {
        self.sections.contains(code)
    }

    pub fn skips_question(&self, code: &str) -> bool {
        self.questions.contains(code)
    }
}

/// Evaluates the configured gate rules against collected answers.
pub struct GateEvaluator {
    rules: Vec<GateRule>,
}

impl GateEvaluator {
    pub fn new(rules: Vec<GateRule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule against the full answer collection and union the
    /// suppression targets of the ones that trigger. Deterministic and
    /// idempotent: the same answers always produce the same skip set.
    pub fn evaluate(&self, answers: &AnswerMap) -> SkipSet {
        self.evaluate_rules(answers, |_| true)
    }

    /// Skips newly discoverable from one incoming answer: merges it over the
    /// prior answers, then evaluates only the rules whose condition mentions
    /// the answered question anywhere in its tree. Produces the same skips as
    /// a full `evaluate` call restricted to those rules; useful for
    /// incremental UI updates after a single answer.
    pub fn check_triggers(
        &self,
        question_code: &str,
        value: &AnswerValue,
        prior: &AnswerMap,
    ) -> SkipSet {
        let mut answers = prior.clone();
        answers.insert(question_code, value.clone());
        self.evaluate_rules(&answers, |rule| {
            rule.condition.references_question(question_code)
        })
    }

    fn evaluate_rules<F>(&self, answers: &AnswerMap, applies: F) -> SkipSet
    where
        F: Fn(&GateRule) -> bool,
    {
        let mut skips = SkipSet::default();
        for rule in &self.rules {
            if applies(rule) && rule.condition.evaluate(answers) {
                skips.sections.extend(rule.skips_sections.iter().cloned());
                skips.questions.extend(rule.skips_questions.iter().cloned());
            }
        }
        skips
    }

    pub fn rules(&self) -> &[GateRule] {
        &self.rules
    }
}
