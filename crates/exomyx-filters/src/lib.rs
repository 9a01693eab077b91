//! exomyx-filters — Variant and gene filters, inheritance checks and the
//! compound heterozygosity resolver.

pub mod gene;
pub mod inheritance;
pub mod providers;
pub mod variant;

pub use gene::{GeneEvaluation, GeneFilter, PriorityScoreFilter};
pub use inheritance::{CompHetResolver, InheritanceAssessment, InheritanceFilter};
pub use providers::{
    FrequencyData, FrequencyProvider, MockFrequencyProvider, MockPathogenicityProvider, PathogenicityProvider,
    VariantDataProviders,
};
pub use variant::{
    FrequencyFilter, GenePanelFilter, IntervalFilter, KnownVariantFilter, PathogenicityFilter, QualityFilter,
    VariantEffectFilter, VariantFilter,
};
