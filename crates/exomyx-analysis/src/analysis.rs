//! A validated, immutable analysis.

use std::collections::BTreeSet;

use exomyx_common::{AnalysisDeclaration, AnalysisMode, ModeOfInheritance, Pedigree, Result};

use crate::step::AnalysisStep;
use crate::validator;

/// Only the validator constructs an `Analysis`; nothing can change it after.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    steps: Vec<AnalysisStep>,
    mode: AnalysisMode,
    inheritance_modes: BTreeSet<ModeOfInheritance>,
    pedigree: Pedigree,
    hpo_ids: Vec<String>,
    warnings: Vec<String>,
}

impl Analysis {
    /// Validate a declaration. See [`validator::validate`].
    pub fn from_declaration(declaration: &AnalysisDeclaration) -> Result<Self> {
        validator::validate(declaration)
    }

    pub(crate) fn new(
        steps: Vec<AnalysisStep>,
        mode: AnalysisMode,
        inheritance_modes: BTreeSet<ModeOfInheritance>,
        pedigree: Pedigree,
        hpo_ids: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            steps,
            mode,
            inheritance_modes,
            pedigree,
            hpo_ids,
            warnings,
        }
    }

    /// Steps in declared order.
    pub fn steps(&self) -> &[AnalysisStep] {
        &self.steps
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn inheritance_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.inheritance_modes
    }

    pub fn pedigree(&self) -> &Pedigree {
        &self.pedigree
    }

    pub fn hpo_ids(&self) -> &[String] {
        &self.hpo_ids
    }

    /// Non-fatal findings from validation, e.g. a dropped inheritance filter.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Stable partition of the declared steps: variant filters first, then
    /// gene filters and prioritisers, each group in declared order.
    pub fn execution_schedule(&self) -> Vec<&AnalysisStep> {
        let (variant, gene): (Vec<&AnalysisStep>, Vec<&AnalysisStep>) =
            self.steps.iter().partition(|s| s.is_variant_filter());
        variant.into_iter().chain(gene).collect()
    }
}
