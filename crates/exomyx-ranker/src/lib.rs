//! exomyx-ranker — Gene prioritisers and score normalisation.

pub mod normalise;
pub mod prioritiser;
pub mod providers;

pub use prioritiser::{HiPhiveOptions, Prioritiser, ScoringParallelism};
pub use providers::{
    DiseaseAssociation, DiseaseProvider, InteractionProvider, MockDiseaseProvider, MockInteractionProvider,
    MockPhenotypeProvider, PhenotypeProvider, PhenotypeQuery, PhenotypeSource, PriorityDataProviders,
};
