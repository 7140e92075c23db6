//! Canonical condition AST shared by the score calculator and the medical
//! flag generator.
//!
//! Evaluation is total: an answer of the wrong shape, a missing answer, or an
//! unparsable numeric simply fails to match. Malformed rule data degrades to
//! `false` instead of interrupting an assessment.

use serde::{Deserialize, Serialize};

use super::domain::AnswerMap;

/// How a `Multi` condition combines its listed choice codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    Any,
    All,
}

/// Numeric comparator for `Threshold` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparator {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
}

impl Comparator {
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Gt => lhs > rhs,
            Comparator::Lt => lhs < rhs,
            Comparator::Gte => lhs >= rhs,
            Comparator::Lte => lhs <= rhs,
            Comparator::Eq => lhs == rhs,
        }
    }
}

/// Boolean operator for `Combination` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoolOp {
    And,
    Or,
}

/// Declarative condition tree over collected answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Condition {
    /// True iff the answer set for the question contains the choice.
    Single {
        question_code: String,
        answer_code: String,
    },
    /// True iff any/all of the listed choices are present in the answer set.
    Multi {
        question_code: String,
        answer_codes: Vec<String>,
        match_mode: MatchMode,
    },
    /// True iff the numeric view of the answer satisfies the comparator.
    Threshold {
        question_code: String,
        comparator: Comparator,
        value: f64,
    },
    /// Recursively combines sub-conditions. An empty `And` is vacuously true;
    /// an empty `Or` is false. Well-formed rule data never carries an empty
    /// list, but the behavior is pinned so malformed data stays harmless.
    Combination {
        operator: BoolOp,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// Evaluate against the collected answers. Pure and side-effect-free.
    pub fn evaluate(&self, answers: &AnswerMap) -> bool {
        match self {
            Condition::Single {
                question_code,
                answer_code,
            } => answers
                .choices(question_code)
                .is_some_and(|codes| codes.iter().any(|code| code == answer_code)),
            Condition::Multi {
                question_code,
                answer_codes,
                match_mode,
            } => {
                let Some(selected) = answers.choices(question_code) else {
                    return false;
                };
                let contains = |code: &String| selected.iter().any(|chosen| chosen == code);
                match match_mode {
                    MatchMode::Any => answer_codes.iter().any(contains),
                    MatchMode::All => answer_codes.iter().all(contains),
                }
            }
            Condition::Threshold {
                question_code,
                comparator,
                value,
            } => answers
                .numeric(question_code)
                .is_some_and(|answer| comparator.compare(answer, *value)),
            Condition::Combination {
                operator,
                conditions,
            } => match operator {
                BoolOp::And => conditions.iter().all(|c| c.evaluate(answers)),
                BoolOp::Or => conditions.iter().any(|c| c.evaluate(answers)),
            },
        }
    }

    /// Confidence in `[0, 1]` used to rank flags of equal severity.
    ///
    /// Simple conditions are all-or-nothing, as are `And` combinations. An
    /// `Or` combination reports the fraction of satisfied branches.
    pub fn confidence(&self, answers: &AnswerMap) -> f64 {
        match self {
            Condition::Combination {
                operator,
                conditions,
            } => {
                let met = conditions
                    .iter()
                    .filter(|c| c.evaluate(answers))
                    .count();
                match operator {
                    BoolOp::And => {
                        if met == conditions.len() {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    BoolOp::Or => {
                        if conditions.is_empty() {
                            0.0
                        } else {
                            met as f64 / conditions.len() as f64
                        }
                    }
                }
            }
            _ => {
                if self.evaluate(answers) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// The governing question code: the direct code for simple conditions, or
    /// the first code found by a depth-first walk of a combination tree.
    pub fn primary_question_code(&self) -> Option<&str> {
        match self {
            Condition::Single { question_code, .. }
            | Condition::Multi { question_code, .. }
            | Condition::Threshold { question_code, .. } => Some(question_code),
            Condition::Combination { conditions, .. } => conditions
                .iter()
                .find_map(Condition::primary_question_code),
        }
    }

    /// Whether the tree mentions the question anywhere.
    pub fn references_question(&self, question_code: &str) -> bool {
        match self {
            Condition::Single {
                question_code: code,
                ..
            }
            | Condition::Multi {
                question_code: code,
                ..
            }
            | Condition::Threshold {
                question_code: code,
                ..
            } => code == question_code,
            Condition::Combination { conditions, .. } => conditions
                .iter()
                .any(|c| c.references_question(question_code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::domain::AnswerValue;

    fn answers(pairs: &[(&str, &[&str])]) -> AnswerMap {
        let mut map = AnswerMap::new();
        for (code, choices) in pairs {
            map.insert(
                code,
                AnswerValue::Choices(choices.iter().map(|c| c.to_string()).collect()),
            );
        }
        map
    }

    fn single(question: &str, answer: &str) -> Condition {
        Condition::Single {
            question_code: question.to_string(),
            answer_code: answer.to_string(),
        }
    }

    #[test]
    fn single_matches_only_selected_choice() {
        let map = answers(&[("GENDER", &["MALE"])]);
        assert!(single("GENDER", "MALE").evaluate(&map));
        assert!(!single("GENDER", "FEMALE").evaluate(&map));
        assert!(!single("AGE_GROUP", "18_25").evaluate(&map));
    }

    #[test]
    fn single_is_false_against_numeric_answer() {
        let mut map = AnswerMap::new();
        map.insert("SLEEP_QUALITY", AnswerValue::Scale(3.0));
        assert!(!single("SLEEP_QUALITY", "3").evaluate(&map));
    }

    #[test]
    fn multi_any_and_all() {
        let map = answers(&[("SNORING_SEVERITY", &["LOUD", "WITH_PAUSES"])]);
        let any = Condition::Multi {
            question_code: "SNORING_SEVERITY".into(),
            answer_codes: vec!["QUIET".into(), "LOUD".into()],
            match_mode: MatchMode::Any,
        };
        let all = Condition::Multi {
            question_code: "SNORING_SEVERITY".into(),
            answer_codes: vec!["QUIET".into(), "LOUD".into()],
            match_mode: MatchMode::All,
        };
        assert!(any.evaluate(&map));
        assert!(!all.evaluate(&map));

        let all_present = Condition::Multi {
            question_code: "SNORING_SEVERITY".into(),
            answer_codes: vec!["LOUD".into(), "WITH_PAUSES".into()],
            match_mode: MatchMode::All,
        };
        assert!(all_present.evaluate(&map));
    }

    #[test]
    fn threshold_covers_scale_and_parsed_choices() {
        let mut map = AnswerMap::new();
        map.insert("SLEEP_QUALITY", AnswerValue::Scale(7.0));
        map.insert("HOURS_SLEPT", AnswerValue::Choices(vec!["5.5".into()]));
        map.insert("GENDER", AnswerValue::Choices(vec!["MALE".into()]));

        let quality = Condition::Threshold {
            question_code: "SLEEP_QUALITY".into(),
            comparator: Comparator::Gte,
            value: 7.0,
        };
        let hours = Condition::Threshold {
            question_code: "HOURS_SLEPT".into(),
            comparator: Comparator::Lt,
            value: 6.0,
        };
        let unparsable = Condition::Threshold {
            question_code: "GENDER".into(),
            comparator: Comparator::Gt,
            value: 0.0,
        };
        let missing = Condition::Threshold {
            question_code: "NAPS".into(),
            comparator: Comparator::Eq,
            value: 1.0,
        };

        assert!(quality.evaluate(&map));
        assert!(hours.evaluate(&map));
        assert!(!unparsable.evaluate(&map));
        assert!(!missing.evaluate(&map));
    }

    #[test]
    fn empty_combinations_are_pinned() {
        let map = AnswerMap::new();
        let empty_and = Condition::Combination {
            operator: BoolOp::And,
            conditions: Vec::new(),
        };
        let empty_or = Condition::Combination {
            operator: BoolOp::Or,
            conditions: Vec::new(),
        };
        assert!(empty_and.evaluate(&map));
        assert!(!empty_or.evaluate(&map));
        assert_eq!(empty_and.confidence(&map), 1.0);
        assert_eq!(empty_or.confidence(&map), 0.0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let map = answers(&[("ANXIETY_LEVEL", &["CONSTANTLY"])]);
        let condition = Condition::Combination {
            operator: BoolOp::Or,
            conditions: vec![
                single("ANXIETY_LEVEL", "CONSTANTLY"),
                single("PANIC_ATTACKS", "FREQUENTLY"),
            ],
        };
        assert_eq!(condition.evaluate(&map), condition.evaluate(&map));
        assert_eq!(condition.confidence(&map), condition.confidence(&map));
    }

    #[test]
    fn or_confidence_is_fraction_of_met_branches() {
        let map = answers(&[("ANXIETY_LEVEL", &["CONSTANTLY"])]);
        let condition = Condition::Combination {
            operator: BoolOp::Or,
            conditions: vec![
                single("ANXIETY_LEVEL", "CONSTANTLY"),
                single("PANIC_ATTACKS", "FREQUENTLY"),
            ],
        };
        assert!(condition.evaluate(&map));
        assert_eq!(condition.confidence(&map), 0.5);
    }

    #[test]
    fn and_confidence_is_all_or_nothing() {
        let partial = answers(&[("SNORING_SEVERITY", &["WITH_PAUSES"])]);
        let full = answers(&[
            ("SNORING_SEVERITY", &["WITH_PAUSES"]),
            ("BREATHING_PAUSES", &["FREQUENTLY"]),
        ]);
        let condition = Condition::Combination {
            operator: BoolOp::And,
            conditions: vec![
                single("SNORING_SEVERITY", "WITH_PAUSES"),
                single("BREATHING_PAUSES", "FREQUENTLY"),
            ],
        };
        assert_eq!(condition.confidence(&partial), 0.0);
        assert_eq!(condition.confidence(&full), 1.0);
    }

    #[test]
    fn primary_question_code_walks_depth_first() {
        let condition = Condition::Combination {
            operator: BoolOp::And,
            conditions: vec![
                Condition::Combination {
                    operator: BoolOp::Or,
                    conditions: vec![single("SNORING_SEVERITY", "LOUD")],
                },
                single("BREATHING_PAUSES", "FREQUENTLY"),
            ],
        };
        assert_eq!(condition.primary_question_code(), Some("SNORING_SEVERITY"));
        assert!(condition.references_question("BREATHING_PAUSES"));
        assert!(!condition.references_question("GENDER"));
    }

    #[test]
    fn condition_round_trips_rule_source_shape() {
        let raw = serde_json::json!({
            "type": "MULTI",
            "questionCode": "WORK_SCHEDULE",
            "answerCodes": ["NIGHT_SHIFT", "ROTATING"],
            "matchMode": "ANY"
        });
        let condition: Condition = serde_json::from_value(raw).expect("parses rule shape");
        assert_eq!(condition.primary_question_code(), Some("WORK_SCHEDULE"));
    }
}
