use thiserror::Error;

/// Fatal errors surfaced to the caller of an analysis.
///
/// Configuration and ordering errors are only ever raised while validating a
/// declared analysis. Data-provider errors and cancellation are raised while
/// running one.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error in {step}: missing required option '{option}'. {hint}")]
    MissingOption {
        step: String,
        option: &'static str,
        hint: &'static str,
    },

    #[error("Configuration error in {step}: invalid value for '{option}': {message}")]
    InvalidOption {
        step: String,
        option: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Step ordering error: {0}")]
    StepOrdering(String),

    #[error("Data provider error in {step}: {source}")]
    DataProvider {
        step: String,
        #[source]
        source: ProviderError,
    },

    #[error("Analysis cancelled after {completed_steps} completed steps")]
    Cancelled { completed_steps: usize },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors reported by injected annotation, frequency, pathogenicity or
/// phenotype sources.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("missing annotation: {0}")]
    MissingAnnotation(String),
}

impl ProviderError {
    /// Missing annotation for a single item never compromises the rest of
    /// the run, unlike an unreachable or corrupt source.
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, ProviderError::MissingAnnotation(_))
    }
}

/// Why a single step could not evaluate a single variant or gene.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvaluationError {
    /// Contained: recorded as a FAIL with this message and the run continues.
    #[error("{0}")]
    Item(String),

    /// Escalated according to the run's provider error policy.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for EvaluationError {
    fn from(err: ProviderError) -> Self {
        if err.is_item_scoped() {
            EvaluationError::Item(err.to_string())
        } else {
            EvaluationError::Provider(err)
        }
    }
}
