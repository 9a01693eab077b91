//! Traits for gene-level knowledge access.
//!
//! Prioritisers never compute phenotype similarity or network proximity
//! themselves; they only combine and normalise what these providers return.
//! Implementations can use:
//! - Local OMIM / HPO / model-organism databases
//! - Remote services
//! - Mock data (testing)

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use exomyx_common::{ModeOfInheritance, ProviderError};

/// A known Mendelian disease associated with a gene.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseAssociation {
    pub disease_id: String,
    pub disease_name: String,
    pub inheritance_modes: BTreeSet<ModeOfInheritance>,
}

impl DiseaseAssociation {
    pub fn new(disease_id: &str, disease_name: &str, modes: &[ModeOfInheritance]) -> Self {
        Self {
            disease_id: disease_id.to_string(),
            disease_name: disease_name.to_string(),
            inheritance_modes: modes.iter().copied().collect(),
        }
    }
}

/// Where a phenotype match is computed: a species' annotations or the
/// protein-interaction neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhenotypeSource {
    Human,
    Mouse,
    Fish,
    Ppi,
}

impl PhenotypeSource {
    pub const ALL: [PhenotypeSource; 4] =
        [PhenotypeSource::Human, PhenotypeSource::Mouse, PhenotypeSource::Fish, PhenotypeSource::Ppi];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhenotypeSource::Human => "human",
            PhenotypeSource::Mouse => "mouse",
            PhenotypeSource::Fish  => "fish",
            PhenotypeSource::Ppi   => "ppi",
        }
    }
}

impl fmt::Display for PhenotypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhenotypeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PhenotypeSource::ALL
            .iter()
            .find(|p| p.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("'{s}' is not a run parameter. Use any of: human, mouse, fish, ppi"))
    }
}

/// The phenotype question asked about one gene.
#[derive(Debug, Clone, Copy)]
pub struct PhenotypeQuery<'a> {
    pub gene_id: u32,
    pub gene_symbol: &'a str,
    pub hpo_ids: &'a [String],
    pub disease_id: Option<&'a str>,
    pub candidate_gene_symbol: Option<&'a str>,
}

/// Trait for OMIM-style disease lookups.
pub trait DiseaseProvider: Send + Sync {
    /// Known diseases for an Entrez gene id; empty when none are known.
    fn diseases_for_gene(&self, gene_id: u32) -> Result<Vec<DiseaseAssociation>, ProviderError>;
}

/// Trait for phenotype similarity lookups.
pub trait PhenotypeProvider: Send + Sync {
    /// Similarity of the patient's phenotypes to those annotated for the
    /// gene in `source`. Returns `None` if the gene has no annotation there.
    fn phenotype_score(&self, query: &PhenotypeQuery<'_>, source: PhenotypeSource)
        -> Result<Option<f64>, ProviderError>;
}

/// Trait for interaction-network proximity lookups.
pub trait InteractionProvider: Send + Sync {
    /// Random-walk proximity of `gene_id` to the seed genes, or `None` if
    /// the gene is not in the network.
    fn walk_proximity(&self, gene_id: u32, seed_gene_ids: &[u32]) -> Result<Option<f64>, ProviderError>;
}

/// Read-only provider capabilities available to prioritisers.
#[derive(Clone, Default)]
pub struct PriorityDataProviders {
    pub disease: Option<Arc<dyn DiseaseProvider>>,
    pub phenotype: Option<Arc<dyn PhenotypeProvider>>,
    pub interaction: Option<Arc<dyn InteractionProvider>>,
}

impl PriorityDataProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disease(mut self, provider: Arc<dyn DiseaseProvider>) -> Self {
        self.disease = Some(provider);
        self
    }

    pub fn with_phenotype(mut self, provider: Arc<dyn PhenotypeProvider>) -> Self {
        self.phenotype = Some(provider);
        self
    }

    pub fn with_interaction(mut self, provider: Arc<dyn InteractionProvider>) -> Self {
        self.interaction = Some(provider);
        self
    }

    pub fn disease(&self) -> Result<&dyn DiseaseProvider, ProviderError> {
        self.disease
            .as_deref()
            .ok_or_else(|| ProviderError::Unreachable("no disease provider configured".to_string()))
    }

    pub fn phenotype(&self) -> Result<&dyn PhenotypeProvider, ProviderError> {
        self.phenotype
            .as_deref()
            .ok_or_else(|| ProviderError::Unreachable("no phenotype provider configured".to_string()))
    }

    pub fn interaction(&self) -> Result<&dyn InteractionProvider, ProviderError> {
        self.interaction
            .as_deref()
            .ok_or_else(|| ProviderError::Unreachable("no interaction provider configured".to_string()))
    }
}

impl fmt::Debug for PriorityDataProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityDataProviders")
            .field("disease", &self.disease.is_some())
            .field("phenotype", &self.phenotype.is_some())
            .field("interaction", &self.interaction.is_some())
            .finish()
    }
}

// ── Mock Implementations for Testing ─────────────────────────────────────────

/// Mock disease provider with hardcoded associations.
pub struct MockDiseaseProvider {
    data: HashMap<u32, Vec<DiseaseAssociation>>,
}

impl MockDiseaseProvider {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn with(mut self, gene_id: u32, disease: DiseaseAssociation) -> Self {
        self.data.entry(gene_id).or_default().push(disease);
        self
    }
}

impl Default for MockDiseaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DiseaseProvider for MockDiseaseProvider {
    fn diseases_for_gene(&self, gene_id: u32) -> Result<Vec<DiseaseAssociation>, ProviderError> {
        Ok(self.data.get(&gene_id).cloned().unwrap_or_default())
    }
}

/// Mock phenotype provider keyed by gene id and source.
pub struct MockPhenotypeProvider {
    data: HashMap<(u32, PhenotypeSource), f64>,
    outage: Option<ProviderError>,
}

impl MockPhenotypeProvider {
    pub fn new() -> Self {
        Self { data: HashMap::new(), outage: None }
    }

    pub fn with(mut self, gene_id: u32, source: PhenotypeSource, score: f64) -> Self {
        self.data.insert((gene_id, source), score);
        self
    }

    pub fn failing(error: ProviderError) -> Self {
        Self { data: HashMap::new(), outage: Some(error) }
    }
}

impl Default for MockPhenotypeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PhenotypeProvider for MockPhenotypeProvider {
    fn phenotype_score(
        &self,
        query: &PhenotypeQuery<'_>,
        source: PhenotypeSource,
    ) -> Result<Option<f64>, ProviderError> {
        if let Some(err) = &self.outage {
            return Err(err.clone());
        }
        Ok(self.data.get(&(query.gene_id, source)).copied())
    }
}

/// Mock interaction network: a fixed proximity per gene, ignoring seeds.
pub struct MockInteractionProvider {
    data: HashMap<u32, f64>,
}

impl MockInteractionProvider {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn with(mut self, gene_id: u32, proximity: f64) -> Self {
        self.data.insert(gene_id, proximity);
        self
    }
}

impl Default for MockInteractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionProvider for MockInteractionProvider {
    fn walk_proximity(&self, gene_id: u32, _seed_gene_ids: &[u32]) -> Result<Option<f64>, ProviderError> {
        Ok(self.data.get(&gene_id).copied())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
