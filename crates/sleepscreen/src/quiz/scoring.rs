//! Weighted risk scoring over declarative rules.
//!
//! The normalization denominator is the *effective* maximum: the points of
//! rules whose governing question was actually presented. Shortened modes are
//! therefore scored against what was asked rather than the full catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::domain::AnswerMap;

/// Qualitative banding of a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Fixed thresholds: >=75 critical, >=50 high, >=25 moderate, else low.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 75 {
            RiskLevel::Critical
        } else if percentage >= 50 {
            RiskLevel::High
        } else if percentage >= 25 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// A condition-to-points mapping contributing to one risk category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRule {
    pub id: String,
    pub category_code: String,
    pub condition: Condition,
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A risk category with its declared ceiling and relative weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCategory {
    pub code: String,
    pub name: String,
    pub max_score: i32,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Per-category outcome of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category_code: String,
    pub category_name: String,
    pub raw_score: i32,
    pub max_possible: i32,
    pub normalized_score: f64,
    pub percentage: u32,
    pub risk_level: RiskLevel,
}

/// Full scoring output, a plain structured value suitable for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub overall_score: u32,
    pub overall_risk_level: RiskLevel,
    pub category_scores: Vec<CategoryScore>,
    pub top_risks: Vec<CategoryScore>,
    pub triggered_rules: Vec<String>,
}

const TOP_RISK_LIMIT: usize = 5;

/// Applies the configured rule set and categories to an answer collection.
pub struct ScoreCalculator {
    rules: Vec<ScoringRule>,
    categories: Vec<RiskCategory>,
}

impl ScoreCalculator {
    pub fn new(rules: Vec<ScoringRule>, categories: Vec<RiskCategory>) -> Self {
        Self { rules, categories }
    }

    /// Compute category scores, the weighted overall score, top risks, and
    /// the audit list of triggered rules. Pure function of the answers; every
    /// edge case (no answers, zero weights, empty categories) has a defined
    /// numeric fallback.
    pub fn calculate(&self, answers: &AnswerMap) -> ScoringResult {
        let category_scores = self.category_scores(answers);
        let overall_score = self.overall_score(&category_scores);
        let overall_risk_level = RiskLevel::from_percentage(overall_score);
        let top_risks = top_risks(&category_scores);
        let triggered_rules = self.triggered_rules(answers);

        ScoringResult {
            overall_score,
            overall_risk_level,
            category_scores,
            top_risks,
            triggered_rules,
        }
    }

    /// Every rule whose condition currently holds, independent of whether its
    /// question was reachable. Kept for audit and debugging.
    pub fn triggered_rules(&self, answers: &AnswerMap) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.condition.evaluate(answers))
            .map(|rule| rule.id.clone())
            .collect()
    }

    fn category_scores(&self, answers: &AnswerMap) -> Vec<CategoryScore> {
        let mut raw: HashMap<&str, i32> = HashMap::new();
        let mut effective_max: HashMap<&str, i32> = HashMap::new();

        // A rule counts toward the effective max only when its governing
        // question was answered, i.e. the respondent was actually asked.
        for rule in &self.rules {
            let Some(question_code) = rule.condition.primary_question_code() else {
                continue;
            };
            if !answers.contains(question_code) {
                continue;
            }
            *effective_max.entry(rule.category_code.as_str()).or_insert(0) += rule.points;
            if rule.condition.evaluate(answers) {
                *raw.entry(rule.category_code.as_str()).or_insert(0) += rule.points;
            }
        }

        self.categories
            .iter()
            .map(|category| {
                let raw_score = raw.get(category.code.as_str()).copied().unwrap_or(0);
                let effective = effective_max
                    .get(category.code.as_str())
                    .copied()
                    .unwrap_or(0);
                let max_possible = if effective > 0 {
                    effective
                } else {
                    category.max_score
                };
                let normalized_score = normalize(raw_score, max_possible);
                let percentage = (normalized_score * 100.0).round() as u32;
                tracing::debug!(
                    category = %category.code,
                    raw_score,
                    max_possible,
                    percentage,
                    "category scored"
                );
                CategoryScore {
                    category_code: category.code.clone(),
                    category_name: category.name.clone(),
                    raw_score,
                    max_possible,
                    normalized_score,
                    percentage,
                    risk_level: RiskLevel::from_percentage(percentage),
                }
            })
            .collect()
    }

    fn overall_score(&self, category_scores: &[CategoryScore]) -> u32 {
        // Restrict the weighted mean to categories with points so that
        // untested categories cannot drag the average down in a shortened
        // mode. When nothing scored at all, average over every category.
        let tested: Vec<&CategoryScore> = category_scores
            .iter()
            .filter(|score| score.raw_score > 0)
            .collect();
        let scores: Vec<&CategoryScore> = if tested.is_empty() {
            category_scores.iter().collect()
        } else {
            tested
        };

        let mut total_weight = 0.0;
        let mut weighted_sum = 0.0;
        for score in scores {
            let weight = self
                .categories
                .iter()
                .find(|category| category.code == score.category_code)
                .map(|category| category.weight)
                .unwrap_or(1.0);
            total_weight += weight;
            weighted_sum += score.normalized_score * weight;
        }

        if total_weight == 0.0 {
            return 0;
        }
        ((weighted_sum / total_weight) * 100.0).round() as u32
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn categories(&self) -> &[RiskCategory] {
        &self.categories
    }
}

fn normalize(raw_score: i32, max_score: i32) -> f64 {
    if max_score <= 0 {
        return 0.0;
    }
    (raw_score as f64 / max_score as f64).min(1.0)
}

fn top_risks(category_scores: &[CategoryScore]) -> Vec<CategoryScore> {
    let mut ranked: Vec<&CategoryScore> = category_scores
        .iter()
        .filter(|score| score.percentage > 0)
        .collect();
    // Stable sort keeps input order on ties.
    ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    ranked
        .into_iter()
        .take(TOP_RISK_LIMIT)
        .cloned()
        .collect()
}
