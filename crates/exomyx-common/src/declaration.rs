//! User-facing analysis declaration.
//!
//! Analyses are declared in YAML or JSON. Field names here are the external
//! contract; the declaration is only ever consumed by the step-order
//! validator, which turns it into a typed, immutable analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::pedigree::Pedigree;

/// Raw declared analysis, as read from a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDeclaration {
    #[serde(default)]
    pub steps: Vec<StepDeclaration>,

    #[serde(default)]
    pub analysis_mode: AnalysisMode,

    /// Declared modes of inheritance, e.g. `AUTOSOMAL_RECESSIVE`.
    #[serde(default)]
    pub inheritance_modes: Vec<String>,

    #[serde(default)]
    pub pedigree: Pedigree,

    #[serde(default)]
    pub hpo_ids: Vec<String>,

    /// Analysis-wide default for steps that read frequency data.
    #[serde(default)]
    pub frequency_sources: Vec<String>,

    /// Analysis-wide default for steps that read pathogenicity predictions.
    #[serde(default)]
    pub pathogenicity_sources: Vec<String>,
}

impl AnalysisDeclaration {
    pub fn from_yaml_str(source: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_step(mut self, step: StepDeclaration) -> Self {
        self.steps.push(step);
        self
    }
}

/// One declared step. `kind` stays a plain string so that unknown kinds can
/// be reported and skipped instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDeclaration {
    pub kind: String,
    #[serde(default)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

impl StepDeclaration {
    pub fn new(kind: StepKind) -> Self {
        Self { kind: kind.as_str().to_string(), options: BTreeMap::new() }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<serde_yaml::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    pub fn step_kind(&self) -> Option<StepKind> {
        self.kind.parse().ok()
    }

    pub fn option(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.options.get(key).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    /// Every step sees every variant and gene.
    Full,
    /// Steps only see what is still passing.
    #[default]
    PassOnly,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Full     => "FULL",
            AnalysisMode::PassOnly => "PASS_ONLY",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every step kind a declaration may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    FailedVariantFilter,
    IntervalFilter,
    GenePanelFilter,
    VariantEffectFilter,
    QualityFilter,
    KnownVariantFilter,
    FrequencyFilter,
    PathogenicityFilter,
    RegulatoryFeatureFilter,
    InheritanceFilter,
    PriorityScoreFilter,
    OmimPrioritiser,
    HiPhivePrioritiser,
    PhivePrioritiser,
    PhenixPrioritiser,
    ExomeWalkerPrioritiser,
}

impl StepKind {
    pub const ALL: [StepKind; 16] = [
        StepKind::FailedVariantFilter,
        StepKind::IntervalFilter,
        StepKind::GenePanelFilter,
        StepKind::VariantEffectFilter,
        StepKind::QualityFilter,
        StepKind::KnownVariantFilter,
        StepKind::FrequencyFilter,
        StepKind::PathogenicityFilter,
        StepKind::RegulatoryFeatureFilter,
        StepKind::InheritanceFilter,
        StepKind::PriorityScoreFilter,
        StepKind::OmimPrioritiser,
        StepKind::HiPhivePrioritiser,
        StepKind::PhivePrioritiser,
        StepKind::PhenixPrioritiser,
        StepKind::ExomeWalkerPrioritiser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::FailedVariantFilter     => "failedVariantFilter",
            StepKind::IntervalFilter          => "intervalFilter",
            StepKind::GenePanelFilter         => "genePanelFilter",
            StepKind::VariantEffectFilter     => "variantEffectFilter",
            StepKind::QualityFilter           => "qualityFilter",
            StepKind::KnownVariantFilter      => "knownVariantFilter",
            StepKind::FrequencyFilter         => "frequencyFilter",
            StepKind::PathogenicityFilter     => "pathogenicityFilter",
            StepKind::RegulatoryFeatureFilter => "regulatoryFeatureFilter",
            StepKind::InheritanceFilter       => "inheritanceFilter",
            StepKind::PriorityScoreFilter     => "priorityScoreFilter",
            StepKind::OmimPrioritiser         => "omimPrioritiser",
            StepKind::HiPhivePrioritiser      => "hiPhivePrioritiser",
            StepKind::PhivePrioritiser        => "phivePrioritiser",
            StepKind::PhenixPrioritiser       => "phenixPrioritiser",
            StepKind::ExomeWalkerPrioritiser  => "exomeWalkerPrioritiser",
        }
    }

    pub fn is_prioritiser(&self) -> bool {
        matches!(
            self,
            StepKind::OmimPrioritiser
                | StepKind::HiPhivePrioritiser
                | StepKind::PhivePrioritiser
                | StepKind::PhenixPrioritiser
                | StepKind::ExomeWalkerPrioritiser
        )
    }

    pub fn is_gene_filter(&self) -> bool {
        matches!(self, StepKind::InheritanceFilter | StepKind::PriorityScoreFilter)
    }

    pub fn is_variant_filter(&self) -> bool {
        !self.is_prioritiser() && !self.is_gene_filter()
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StepKind::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("unknown analysis step '{s}'"))
    }
}
