//! exomyx-analysis — Validates declared analyses and runs them over genes.
//!
//! Entry points:
//! - [`Analysis::from_declaration`] checks a declared step list and its options
//! - [`AnalysisRunner::run`] executes a validated analysis in FULL or PASS_ONLY mode

pub mod analysis;
pub mod diagnostics;
pub mod progress;
pub mod runner;
pub mod step;
pub mod validator;

pub use analysis::Analysis;
pub use diagnostics::{AnalysisResults, Diagnostic, Severity, StepReport};
pub use progress::{AnalysisProgress, CancellationToken, RunState};
pub use runner::AnalysisRunner;
pub use step::{AnalysisContext, AnalysisStep};
pub use validator::validate;
