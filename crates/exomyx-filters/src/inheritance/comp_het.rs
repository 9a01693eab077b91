//! Compound heterozygosity resolver.
//!
//! Pairs up a gene's variants and keeps those pairs that could sit on
//! opposite haplotypes in every affected individual without also doing so
//! in an unaffected one.

use exomyx_common::{Genotype, Individual, Pedigree, VariantEvaluation};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairEvidence {
    Disqualifies,
    Consistent,
    Inconclusive,
}

pub struct CompHetResolver<'a> {
    pedigree: &'a Pedigree,
}

impl<'a> CompHetResolver<'a> {
    pub fn new(pedigree: &'a Pedigree) -> Self {
        Self { pedigree }
    }

    /// Retained pairs as indices into `variants`, ordered `(i, j)` with `i < j`
    /// in first-encountered order.
    pub fn find_compatible_index_pairs(&self, variants: &[&VariantEvaluation]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        if variants.len() < 2 {
            return pairs;
        }
        for i in 0..variants.len() {
            for j in (i + 1)..variants.len() {
                if self.is_compatible_pair(variants[i], variants[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    pub fn find_compatible_pairs<'v>(
        &self,
        variants: &[&'v VariantEvaluation],
    ) -> Vec<(&'v VariantEvaluation, &'v VariantEvaluation)> {
        self.find_compatible_index_pairs(variants)
            .into_iter()
            .map(|(i, j)| (variants[i], variants[j]))
            .collect()
    }

    fn is_compatible_pair(&self, first: &VariantEvaluation, second: &VariantEvaluation) -> bool {
        for individual in self.pedigree.individuals() {
            let (Some(a), Some(b)) = (first.called_genotype(&individual.id), second.called_genotype(&individual.id))
            else {
                continue;
            };
            if evidence(individual, a, b) == PairEvidence::Disqualifies {
                trace!(
                    individual = %individual.id,
                    first = %first.key(),
                    second = %second.key(),
                    "comp-het pair disqualified"
                );
                return false;
            }
        }
        true
    }
}

fn evidence(individual: &Individual, a: &Genotype, b: &Genotype) -> PairEvidence {
    if a.shares_phase_set(b) {
        if let (Some(ha), Some(hb)) = (a.alt_haplotype(), b.alt_haplotype()) {
            let in_cis = ha == hb;
            return match (individual.is_affected(), individual.is_unaffected(), in_cis) {
                (true, _, true) => PairEvidence::Disqualifies,
                (_, true, false) => PairEvidence::Disqualifies,
                _ => PairEvidence::Consistent,
            };
        }
    }

    if individual.is_affected() {
        if a.is_het() && b.is_het() {
            PairEvidence::Consistent
        } else {
            PairEvidence::Disqualifies
        }
    } else if individual.is_unaffected() {
        if a.is_hom_alt() || b.is_hom_alt() {
            PairEvidence::Disqualifies
        } else if a.is_het() && b.is_het() {
            PairEvidence::Inconclusive
        } else {
            PairEvidence::Consistent
        }
    } else {
        PairEvidence::Inconclusive
    }
}
