//! exomyx-common — Shared entities, enumerations, errors and the analysis
//! declaration used across all Exomyx crates.

pub mod error;
pub mod effects;
pub mod sources;
pub mod inheritance;
pub mod entities;
pub mod pedigree;
pub mod declaration;

// Re-export commonly used types
pub use declaration::{AnalysisDeclaration, AnalysisMode, StepDeclaration, StepKind};
pub use effects::VariantEffect;
pub use entities::{
    AlleleCall, FilterResult, FilterStatus, FilterType, Gene, GeneticInterval, Genotype, VariantEvaluation,
};
pub use error::{AnalysisError, EvaluationError, ProviderError, Result};
pub use inheritance::ModeOfInheritance;
pub use pedigree::{AffectionStatus, Individual, Pedigree, Sex};
pub use sources::{FrequencySource, PathogenicitySource, PriorityType};
