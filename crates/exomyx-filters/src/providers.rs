//! Traits for variant annotation data access.
//!
//! Frequency and pathogenicity lookups are injected so that filters stay
//! pure functions of their inputs. Implementations can be backed by local
//! databases, remote services, or the mocks below.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use exomyx_common::{FrequencySource, PathogenicitySource, ProviderError, VariantEvaluation};

/// Population data known for one variant. Frequencies are percentages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyData {
    pub rs_id: Option<String>,
    pub frequencies: BTreeMap<FrequencySource, f64>,
}

impl FrequencyData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Highest frequency among `sources`, or `None` if none of them report one.
    pub fn max_frequency(&self, sources: &BTreeSet<FrequencySource>) -> Option<f64> {
        self.frequencies
            .iter()
            .filter(|(source, _)| sources.contains(source))
            .map(|(_, freq)| *freq)
            .fold(None, |max, f| Some(max.map_or(f, |m: f64| m.max(f))))
    }

    /// True when the variant has an rsID or any frequency from `sources`.
    pub fn is_represented_in(&self, sources: &BTreeSet<FrequencySource>) -> bool {
        self.rs_id.is_some() || self.frequencies.keys().any(|s| sources.contains(s))
    }
}

/// Trait for population frequency lookups.
pub trait FrequencyProvider: Send + Sync {
    /// Frequency data for a variant. An unknown variant yields empty data,
    /// not an error.
    fn frequency_data(&self, variant: &VariantEvaluation) -> Result<FrequencyData, ProviderError>;
}

/// Trait for pathogenicity predictor lookups.
pub trait PathogenicityProvider: Send + Sync {
    /// Predicted scores in [0, 1], higher meaning more damaging. Sources with
    /// no prediction for the variant are omitted from the map.
    fn pathogenicity_scores(
        &self,
        variant: &VariantEvaluation,
        sources: &BTreeSet<PathogenicitySource>,
    ) -> Result<BTreeMap<PathogenicitySource, f64>, ProviderError>;
}

/// Read-only provider capabilities available to variant filters.
#[derive(Clone, Default)]
pub struct VariantDataProviders {
    pub frequency: Option<Arc<dyn FrequencyProvider>>,
    pub pathogenicity: Option<Arc<dyn PathogenicityProvider>>,
}

impl VariantDataProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frequency(mut self, provider: Arc<dyn FrequencyProvider>) -> Self {
        self.frequency = Some(provider);
        self
    }

    pub fn with_pathogenicity(mut self, provider: Arc<dyn PathogenicityProvider>) -> Self {
        self.pathogenicity = Some(provider);
        self
    }

    pub fn frequency(&self) -> Result<&dyn FrequencyProvider, ProviderError> {
        self.frequency
            .as_deref()
            .ok_or_else(|| ProviderError::Unreachable("no frequency provider configured".to_string()))
    }

    pub fn pathogenicity(&self) -> Result<&dyn PathogenicityProvider, ProviderError> {
        self.pathogenicity
            .as_deref()
            .ok_or_else(|| ProviderError::Unreachable("no pathogenicity provider configured".to_string()))
    }
}

impl std::fmt::Debug for VariantDataProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantDataProviders")
            .field("frequency", &self.frequency.is_some())
            .field("pathogenicity", &self.pathogenicity.is_some())
            .finish()
    }
}

// ── Mock Implementations for Testing ─────────────────────────────────────────

/// Mock frequency provider keyed by `VariantEvaluation::key()`.
pub struct MockFrequencyProvider {
    data: HashMap<String, FrequencyData>,
    outage: Option<ProviderError>,
}

impl MockFrequencyProvider {
    pub fn new() -> Self {
        Self { data: HashMap::new(), outage: None }
    }

    /// Add a frequency (percent) for a variant key.
    pub fn with(mut self, variant_key: &str, source: FrequencySource, frequency: f64) -> Self {
        self.data
            .entry(variant_key.to_string())
            .or_default()
            .frequencies
            .insert(source, frequency);
        self
    }

    pub fn with_rs_id(mut self, variant_key: &str, rs_id: &str) -> Self {
        self.data.entry(variant_key.to_string()).or_default().rs_id = Some(rs_id.to_string());
        self
    }

    /// Every lookup fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self { data: HashMap::new(), outage: Some(error) }
    }
}

impl Default for MockFrequencyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyProvider for MockFrequencyProvider {
    fn frequency_data(&self, variant: &VariantEvaluation) -> Result<FrequencyData, ProviderError> {
        if let Some(err) = &self.outage {
            return Err(err.clone());
        }
        Ok(self.data.get(&variant.key()).cloned().unwrap_or_default())
    }
}

/// Mock pathogenicity provider keyed by `VariantEvaluation::key()`.
pub struct MockPathogenicityProvider {
    data: HashMap<String, BTreeMap<PathogenicitySource, f64>>,
    outage: Option<ProviderError>,
}

impl MockPathogenicityProvider {
    pub fn new() -> Self {
        Self { data: HashMap::new(), outage: None }
    }

    pub fn with(mut self, variant_key: &str, source: PathogenicitySource, score: f64) -> Self {
        self.data.entry(variant_key.to_string()).or_default().insert(source, score);
        self
    }

    pub fn failing(error: ProviderError) -> Self {
        Self { data: HashMap::new(), outage: Some(error) }
    }
}

impl Default for MockPathogenicityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PathogenicityProvider for MockPathogenicityProvider {
    fn pathogenicity_scores(
        &self,
        variant: &VariantEvaluation,
        sources: &BTreeSet<PathogenicitySource>,
    ) -> Result<BTreeMap<PathogenicitySource, f64>, ProviderError> {
        if let Some(err) = &self.outage {
            return Err(err.clone());
        }
        Ok(self
            .data
            .get(&variant.key())
            .map(|scores| {
                scores
                    .iter()
                    .filter(|(source, _)| sources.contains(source))
                    .map(|(s, v)| (*s, *v))
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
