//! Gene prioritisers.
//!
//! A prioritiser scores a set of genes at once, since some scores are only
//! meaningful relative to the rest of the set. Scores are keyed by Entrez id
//! and always fall in [0, 1].

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::debug;

use exomyx_common::{Gene, PriorityType, ProviderError};

use crate::normalise::{max_normalise, rank_normalise, unit_clamp};
use crate::providers::{PhenotypeQuery, PhenotypeSource, PriorityDataProviders};

/// OMIM score for a gene whose known diseases disagree with its inheritance.
pub const OMIM_INCOMPATIBLE_SCORE: f64 = 0.5;

/// Options for the cross-species phenotype prioritiser.
#[derive(Debug, Clone, PartialEq)]
pub struct HiPhiveOptions {
    pub disease_id: Option<String>,
    pub candidate_gene_symbol: Option<String>,
    pub run_params: BTreeSet<PhenotypeSource>,
}

impl Default for HiPhiveOptions {
    fn default() -> Self {
        Self {
            disease_id: None,
            candidate_gene_symbol: None,
            run_params: PhenotypeSource::ALL.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prioritiser {
    Omim,
    HiPhive(HiPhiveOptions),
    Phive,
    Phenix,
    ExomeWalker { seed_gene_ids: Vec<u32> },
}

/// Parallelism knob passed down from the runner.
#[derive(Debug, Clone, Copy)]
pub struct ScoringParallelism {
    pub enabled: bool,
    pub threshold: usize,
}

impl ScoringParallelism {
    pub fn sequential() -> Self {
        Self { enabled: false, threshold: usize::MAX }
    }

    fn applies_to(&self, n: usize) -> bool {
        self.enabled && self.threshold > 0 && n >= self.threshold
    }
}

/// Rank-normalise the genes with positive evidence among themselves. Genes
/// without evidence keep 0.0 instead of sharing a tied rank.
fn rank_with_evidence(raw: &[f64]) -> Vec<f64> {
    let with_evidence: Vec<f64> = raw.iter().copied().filter(|&s| s > 0.0).collect();
    let mut ranked = rank_normalise(&with_evidence, false).into_iter();
    raw.iter()
        .map(|&s| if s > 0.0 { ranked.next().unwrap_or(0.0) } else { 0.0 })
        .collect()
}

impl Prioritiser {
    pub fn priority_type(&self) -> PriorityType {
        match self {
            Prioritiser::Omim             => PriorityType::OmimPriority,
            Prioritiser::HiPhive(_)       => PriorityType::HiphivePriority,
            Prioritiser::Phive            => PriorityType::PhivePriority,
            Prioritiser::Phenix           => PriorityType::PhenixPriority,
            Prioritiser::ExomeWalker { .. } => PriorityType::ExomewalkerPriority,
        }
    }

    /// Score every gene in `genes`. Pure: the genes are not modified.
    pub fn score(
        &self,
        genes: &[&Gene],
        hpo_ids: &[String],
        providers: &PriorityDataProviders,
        parallelism: ScoringParallelism,
    ) -> Result<BTreeMap<u32, f64>, ProviderError> {
        let raw = self.raw_scores(genes, hpo_ids, providers, parallelism)?;
        let scores = match self {
            Prioritiser::Phenix => max_normalise(&raw),
            Prioritiser::ExomeWalker { .. } => rank_with_evidence(&raw),
            _ => raw,
        };
        debug!(
            priority_type = %self.priority_type(),
            genes = genes.len(),
            "prioritiser scored genes"
        );
        Ok(genes.iter().map(|g| g.gene_id).zip(scores).collect())
    }

    fn raw_scores(
        &self,
        genes: &[&Gene],
        hpo_ids: &[String],
        providers: &PriorityDataProviders,
        parallelism: ScoringParallelism,
    ) -> Result<Vec<f64>, ProviderError> {
        let score_one = |gene: &&Gene| self.raw_score(gene, hpo_ids, providers);
        if parallelism.applies_to(genes.len()) {
            genes.par_iter().map(score_one).collect()
        } else {
            genes.iter().map(score_one).collect()
        }
    }

    fn raw_score(&self, gene: &Gene, hpo_ids: &[String], providers: &PriorityDataProviders) -> Result<f64, ProviderError> {
        fn query<'q>(gene: &'q Gene, hpo_ids: &'q [String], options: Option<&'q HiPhiveOptions>) -> PhenotypeQuery<'q> {
            PhenotypeQuery {
                gene_id: gene.gene_id,
                gene_symbol: &gene.symbol,
                hpo_ids,
                disease_id: options.and_then(|o| o.disease_id.as_deref()),
                candidate_gene_symbol: options.and_then(|o| o.candidate_gene_symbol.as_deref()),
            }
        }

        match self {
            Prioritiser::Omim => {
                let diseases = providers.disease()?.diseases_for_gene(gene.gene_id)?;
                let gene_modes = gene.compatible_modes();
                if diseases.is_empty() || gene_modes.is_empty() {
                    return Ok(1.0);
                }
                let compatible = diseases.iter().any(|d| {
                    d.inheritance_modes.is_empty() || !d.inheritance_modes.is_disjoint(gene_modes)
                });
                Ok(if compatible { 1.0 } else { OMIM_INCOMPATIBLE_SCORE })
            }

            Prioritiser::Phive => {
                let score = providers.phenotype()?.phenotype_score(&query(gene, hpo_ids, None), PhenotypeSource::Mouse)?;
                Ok(score.map(unit_clamp).unwrap_or(0.0))
            }

            Prioritiser::Phenix => {
                let score = providers.phenotype()?.phenotype_score(&query(gene, hpo_ids, None), PhenotypeSource::Human)?;
                Ok(score.map(|s| if s.is_nan() { 0.0 } else { s.max(0.0) }).unwrap_or(0.0))
            }

            Prioritiser::HiPhive(options) => {
                let provider = providers.phenotype()?;
                let q = query(gene, hpo_ids, Some(options));
                let mut best: f64 = 0.0;
                for &source in &options.run_params {
                    if let Some(score) = provider.phenotype_score(&q, source)? {
                        best = best.max(unit_clamp(score));
                    }
                }
                Ok(best)
            }

            Prioritiser::ExomeWalker { seed_gene_ids } => {
                let proximity = providers.interaction()?.walk_proximity(gene.gene_id, seed_gene_ids)?;
                Ok(proximity.filter(|p| !p.is_nan()).unwrap_or(0.0))
            }
        }
    }
}
