//! The closed set of analysis steps and the capabilities they run against.

use exomyx_common::{FilterType, StepKind};
use exomyx_filters::{GeneFilter, VariantDataProviders, VariantFilter};
use exomyx_ranker::{Prioritiser, PriorityDataProviders};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStep {
    VariantFilter(VariantFilter),
    GeneFilter(GeneFilter),
    Prioritiser(Prioritiser),
}

impl AnalysisStep {
    pub fn kind(&self) -> StepKind {
        match self {
            AnalysisStep::VariantFilter(filter) => match filter {
                VariantFilter::FailedVariant     => StepKind::FailedVariantFilter,
                VariantFilter::Interval(_)       => StepKind::IntervalFilter,
                VariantFilter::GenePanel(_)      => StepKind::GenePanelFilter,
                VariantFilter::VariantEffect(_)  => StepKind::VariantEffectFilter,
                VariantFilter::Quality(_)        => StepKind::QualityFilter,
                VariantFilter::KnownVariant(_)   => StepKind::KnownVariantFilter,
                VariantFilter::Frequency(_)      => StepKind::FrequencyFilter,
                VariantFilter::Pathogenicity(_)  => StepKind::PathogenicityFilter,
                VariantFilter::RegulatoryFeature => StepKind::RegulatoryFeatureFilter,
            },
            AnalysisStep::GeneFilter(filter) => match filter {
                GeneFilter::Inheritance(_)   => StepKind::InheritanceFilter,
                GeneFilter::PriorityScore(_) => StepKind::PriorityScoreFilter,
            },
            AnalysisStep::Prioritiser(prioritiser) => match prioritiser {
                Prioritiser::Omim               => StepKind::OmimPrioritiser,
                Prioritiser::HiPhive(_)         => StepKind::HiPhivePrioritiser,
                Prioritiser::Phive              => StepKind::PhivePrioritiser,
                Prioritiser::Phenix             => StepKind::PhenixPrioritiser,
                Prioritiser::ExomeWalker { .. } => StepKind::ExomeWalkerPrioritiser,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Filter type recorded by this step, `None` for prioritisers.
    pub fn filter_type(&self) -> Option<FilterType> {
        match self {
            AnalysisStep::VariantFilter(f) => Some(f.filter_type()),
            AnalysisStep::GeneFilter(f) => Some(f.filter_type()),
            AnalysisStep::Prioritiser(_) => None,
        }
    }

    pub fn is_variant_filter(&self) -> bool {
        matches!(self, AnalysisStep::VariantFilter(_))
    }
}

/// Read-only data providers handed to the runner.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub variant_data: VariantDataProviders,
    pub priority_data: PriorityDataProviders,
}

impl AnalysisContext {
    pub fn new(variant_data: VariantDataProviders, priority_data: PriorityDataProviders) -> Self {
        Self { variant_data, priority_data }
    }

    pub fn with_variant_data(mut self, variant_data: VariantDataProviders) -> Self {
        self.variant_data = variant_data;
        self
    }

    pub fn with_priority_data(mut self, priority_data: PriorityDataProviders) -> Self {
        self.priority_data = priority_data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomyx_ranker::HiPhiveOptions;

    #[test]
    fn test_step_kind_round_trip() {
        let step = AnalysisStep::Prioritiser(Prioritiser::HiPhive(HiPhiveOptions::default()));
        assert_eq!(step.kind(), StepKind::HiPhivePrioritiser);
        assert_eq!(step.name(), "hiPhivePrioritiser");
        assert_eq!(step.filter_type(), None);

        let step = AnalysisStep::VariantFilter(VariantFilter::FailedVariant);
        assert_eq!(step.filter_type(), Some(FilterType::FailedVariantFilter));
        assert!(step.is_variant_filter());
    }
}
