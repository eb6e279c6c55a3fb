//! Error taxonomy for the comparison engine.
//!
//! Only selection validation surfaces at runtime. Registry inconsistencies are
//! construction-time faults, and resolving a metric a scenario does not carry
//! is not an error at all (it yields the placeholder).

use std::path::PathBuf;

use crate::types::{MetricCategory, MetricId, ScenarioId, ValueType, VariantKind};

/// Validation failures at the selection boundary. The session a failing
/// operation was called on is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    /// Fewer than two scenarios were selected.
    #[error("at least 2 scenarios are required for a comparison, got {selected}")]
    InsufficientSelection { selected: usize },

    /// More scenarios were selected than the configured maximum.
    #[error("at most {max} scenarios can be compared, got {selected}")]
    SelectionLimitExceeded { selected: usize, max: usize },

    /// The same scenario id appears twice in one selection.
    #[error("scenario '{0}' is selected more than once")]
    DuplicateScenario(ScenarioId),

    /// A comparison-only operation was invoked while selecting.
    #[error("no comparison is active")]
    NotComparing,

    /// `select` was invoked while a comparison is already showing.
    #[error("a comparison is already active; go back to selection first")]
    AlreadyComparing,
}

/// A metric registry that breaks the cross-kind sharing rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryInconsistency {
    #[error("metric '{metric}' is listed twice for kind '{kind}'")]
    DuplicateWithinKind { kind: VariantKind, metric: MetricId },

    #[error(
        "metric '{metric}' is {first_type:?}/{first_category} on '{first_kind}' but \
         {second_type:?}/{second_category} on '{second_kind}'"
    )]
    SharedDefinitionMismatch {
        metric: MetricId,
        first_kind: VariantKind,
        first_type: ValueType,
        first_category: MetricCategory,
        second_kind: VariantKind,
        second_type: ValueType,
        second_category: MetricCategory,
    },

    #[error("headline metric '{metric}' of kind '{kind}' is not a rankable metric of that kind")]
    HeadlineNotRankable { kind: VariantKind, metric: MetricId },

    #[error("no metrics registered for kind '{0}'")]
    MissingKind(VariantKind),
}

/// Failure loading a scenario set or config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
