//! Inheritance-mode compatibility for a gene's passing variants.

pub mod comp_het;
pub mod segregation;

use std::collections::{BTreeMap, BTreeSet};

use exomyx_common::entities::CHROMOSOME_X;
use exomyx_common::{FilterResult, FilterType, Gene, ModeOfInheritance, Pedigree, VariantEvaluation};

pub use comp_het::CompHetResolver;
pub use segregation::segregates;

/// What the inheritance filter learned about one gene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritanceAssessment {
    pub compatible_modes: BTreeSet<ModeOfInheritance>,
    /// Pairs of indices into the gene's full variant list.
    pub comp_het_pairs: Vec<(usize, usize)>,
    /// Modes each passing variant supports, keyed by index into the gene's variants.
    pub variant_modes: BTreeMap<usize, BTreeSet<ModeOfInheritance>>,
}

impl InheritanceAssessment {
    pub fn is_compatible(&self) -> bool {
        !self.compatible_modes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceFilter {
    /// Never contains `ANY` and is never empty once validated.
    pub modes: BTreeSet<ModeOfInheritance>,
}

impl InheritanceFilter {
    pub fn new(modes: BTreeSet<ModeOfInheritance>) -> Self {
        Self { modes }
    }

    /// Checks each declared mode against the gene's currently passing variants.
    pub fn assess(&self, gene: &Gene, pedigree: &Pedigree) -> InheritanceAssessment {
        let passing: Vec<(usize, &VariantEvaluation)> =
            gene.variants().iter().enumerate().filter(|(_, v)| v.passed_filters()).collect();
        let mut assessment = InheritanceAssessment::default();

        for &mode in &self.modes {
            if mode == ModeOfInheritance::Any {
                continue;
            }
            let mut supported = false;

            for &(index, variant) in &passing {
                if segregates(mode, variant, pedigree) {
                    assessment.variant_modes.entry(index).or_default().insert(mode);
                    supported = true;
                }
            }

            if mode.is_recessive() {
                let candidates: Vec<(usize, &VariantEvaluation)> = passing
                    .iter()
                    .copied()
                    .filter(|(_, v)| mode != ModeOfInheritance::XRecessive || v.chromosome == CHROMOSOME_X)
                    .collect();
                let refs: Vec<&VariantEvaluation> = candidates.iter().map(|(_, v)| *v).collect();
                let pairs = CompHetResolver::new(pedigree).find_compatible_index_pairs(&refs);

                for (a, b) in pairs {
                    let pair = (candidates[a].0, candidates[b].0);
                    for index in [pair.0, pair.1] {
                        assessment.variant_modes.entry(index).or_default().insert(mode);
                    }
                    if !assessment.comp_het_pairs.contains(&pair) {
                        assessment.comp_het_pairs.push(pair);
                    }
                    supported = true;
                }
            }

            if supported {
                assessment.compatible_modes.insert(mode);
            }
        }

        assessment
    }

    pub fn evaluate(&self, gene: &Gene, pedigree: &Pedigree) -> (FilterResult, InheritanceAssessment) {
        let assessment = self.assess(gene, pedigree);
        let result = if assessment.is_compatible() {
            FilterResult::pass(FilterType::InheritanceFilter)
        } else {
            FilterResult::fail(FilterType::InheritanceFilter)
        };
        (result, assessment)
    }
}
