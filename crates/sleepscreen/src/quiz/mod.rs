//! Sleep questionnaire engine: catalog, gating, scoring, flags, and the
//! session orchestrator tying them together.

pub mod catalog;
pub(crate) mod condition;
pub mod domain;
pub(crate) mod gating;
pub(crate) mod flags;
pub mod recommend;
pub mod repository;
pub mod router;
pub mod rules;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    default_catalog, AnswerOption, QuestionKind, QuizCatalog, QuizQuestion, QuizSection,
    ScaleConfig,
};
pub use condition::{BoolOp, Comparator, Condition, MatchMode};
pub use domain::{Answer, AnswerMap, AnswerValue, QuizMode, QuizSession, SessionId};
pub use flags::{
    FlagSeverity, FlagTranslation, MedicalFlag, MedicalFlagGenerator, MedicalFlagRule,
    DEFAULT_LOCALE,
};
pub use gating::{GateCondition, GateEvaluator, GateOp, GateRule, GateValue, SkipSet};
pub use recommend::{recommendations_for, Recommendation};
pub use repository::{
    FollowUpRequest, FollowUpScheduler, QuizResultRecord, RepositoryError, SchedulerError,
    SessionStore,
};
pub use router::quiz_router;
pub use rules::QuizRuleSet;
pub use scoring::{
    CategoryScore, RiskCategory, RiskLevel, ScoreCalculator, ScoringResult, ScoringRule,
};
pub use service::{QuizProgress, QuizService, QuizServiceError, SubmitOutcome};
