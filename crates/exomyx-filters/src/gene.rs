//! Gene-level filters.

use exomyx_common::{EvaluationError, FilterResult, FilterType, Gene, Pedigree, PriorityType};

use crate::inheritance::{InheritanceAssessment, InheritanceFilter};

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityScoreFilter {
    pub priority_type: PriorityType,
    pub min_priority_score: f64,
}

impl PriorityScoreFilter {
    /// A gene the matching prioritiser never scored fails.
    pub fn evaluate(&self, gene: &Gene) -> FilterResult {
        match gene.priority_score(self.priority_type) {
            Some(score) if score >= self.min_priority_score => {
                FilterResult::pass_with_score(FilterType::PriorityScoreFilter, score)
            }
            Some(score) => FilterResult::fail_with_score(FilterType::PriorityScoreFilter, score),
            None => FilterResult::fail(FilterType::PriorityScoreFilter),
        }
    }
}

/// Result of a gene filter plus any inheritance findings to record on the gene.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneEvaluation {
    pub result: FilterResult,
    pub assessment: Option<InheritanceAssessment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeneFilter {
    Inheritance(InheritanceFilter),
    PriorityScore(PriorityScoreFilter),
}

impl GeneFilter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            GeneFilter::Inheritance(_)   => FilterType::InheritanceFilter,
            GeneFilter::PriorityScore(_) => FilterType::PriorityScoreFilter,
        }
    }

    pub fn evaluate(&self, gene: &Gene, pedigree: &Pedigree) -> Result<GeneEvaluation, EvaluationError> {
        match self {
            GeneFilter::Inheritance(filter) => {
                let (result, assessment) = filter.evaluate(gene, pedigree);
                Ok(GeneEvaluation { result, assessment: Some(assessment) })
            }
            GeneFilter::PriorityScore(filter) => Ok(GeneEvaluation { result: filter.evaluate(gene), assessment: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PriorityScoreFilter {
        PriorityScoreFilter { priority_type: PriorityType::HiphivePriority, min_priority_score: 0.8 }
    }

    #[test]
    fn test_priority_score_threshold() {
        let mut gene = Gene::new("RBM8A", 9939);
        gene.add_priority_score(PriorityType::HiphivePriority, 0.9);
        let result = filter().evaluate(&gene);
        assert!(result.passed());
        assert_eq!(result.score(), 0.9);

        let mut low = Gene::new("GNRHR2", 114814);
        low.add_priority_score(PriorityType::HiphivePriority, 0.79);
        assert!(filter().evaluate(&low).failed());
    }

    #[test]
    fn test_unscored_gene_fails() {
        let mut gene = Gene::new("RBM8A", 9939);
        gene.add_priority_score(PriorityType::OmimPriority, 1.0);
        assert!(filter().evaluate(&gene).failed());
    }

    #[test]
    fn test_gene_filter_dispatch() {
        let gene_filter = GeneFilter::PriorityScore(filter());
        let evaluation = gene_filter.evaluate(&Gene::new("A", 1), &Pedigree::default()).unwrap();
        assert!(evaluation.assessment.is_none());
        assert_eq!(evaluation.result.filter_type(), FilterType::PriorityScoreFilter);
    }
}
