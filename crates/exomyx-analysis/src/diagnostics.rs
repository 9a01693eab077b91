//! Diagnostics, per-step reports and the results of a run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use exomyx_common::{AnalysisMode, Gene};

use crate::progress::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
}

/// A contained problem: the run carried on but a reader should know.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub step: Option<String>,
    /// Variant key or gene symbol the problem concerns.
    pub subject: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(step: Option<&str>, subject: Option<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, step: step.map(str::to_string), subject, message: message.into() }
    }

    pub fn error(step: Option<&str>, subject: Option<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, step: step.map(str::to_string), subject, message: message.into() }
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: String,
    /// Position in the execution schedule, from 0.
    pub position: usize,
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
    /// Items that could not be evaluated and were recorded as FAIL.
    pub errors: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    pub run_id: Uuid,
    pub state: RunState,
    pub mode: AnalysisMode,
    /// Every input gene, in input order, annotated by the run.
    pub genes: Vec<Gene>,
    pub step_reports: Vec<StepReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl AnalysisResults {
    pub fn passed_genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter().filter(|g| g.passed_filters())
    }

    pub fn gene(&self, symbol: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.symbol == symbol)
    }

    /// Passing genes, best combined priority score first, ties by symbol.
    pub fn ranked_genes(&self) -> Vec<&Gene> {
        let mut ranked: Vec<&Gene> = self.passed_genes().collect();
        ranked.sort_by(|a, b| {
            b.combined_priority_score()
                .partial_cmp(&a.combined_priority_score())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        ranked
    }

    pub fn report_for(&self, step: &str) -> Option<&StepReport> {
        self.step_reports.iter().find(|r| r.step == step)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
