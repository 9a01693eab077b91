//! Variant-level filters.
//!
//! Each filter is a pure function of one variant plus read-only providers and
//! yields a single `FilterResult`. Problems confined to one variant come back
//! as `EvaluationError::Item`; source failures as `EvaluationError::Provider`.

use std::collections::BTreeSet;

use exomyx_common::{
    EvaluationError, FilterResult, FilterType, FrequencySource, GeneticInterval, PathogenicitySource, ProviderError,
    VariantEffect, VariantEvaluation,
};

use crate::providers::VariantDataProviders;

/// Predicted scores at or above this are treated as pathogenic.
pub const PATHOGENICITY_THRESHOLD: f64 = 0.5;

/// Off-gene variants further than this from their gene are removed.
pub const MAX_REGULATORY_DISTANCE: u32 = 20_000;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalFilter {
    pub interval: GeneticInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenePanelFilter {
    pub gene_symbols: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantEffectFilter {
    pub remove: BTreeSet<VariantEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityFilter {
    pub min_quality: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnownVariantFilter {
    pub sources: BTreeSet<FrequencySource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyFilter {
    /// Percentage, e.g. 1.0 for 1%.
    pub max_frequency: f64,
    pub sources: BTreeSet<FrequencySource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathogenicityFilter {
    pub keep_non_pathogenic: bool,
    pub sources: BTreeSet<PathogenicitySource>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantFilter {
    FailedVariant,
    Interval(IntervalFilter),
    GenePanel(GenePanelFilter),
    VariantEffect(VariantEffectFilter),
    Quality(QualityFilter),
    KnownVariant(KnownVariantFilter),
    Frequency(FrequencyFilter),
    Pathogenicity(PathogenicityFilter),
    RegulatoryFeature,
}

impl VariantFilter {
    pub fn filter_type(&self) -> FilterType {
        match self {
            VariantFilter::FailedVariant     => FilterType::FailedVariantFilter,
            VariantFilter::Interval(_)       => FilterType::IntervalFilter,
            VariantFilter::GenePanel(_)      => FilterType::GeneSymbolFilter,
            VariantFilter::VariantEffect(_)  => FilterType::VariantEffectFilter,
            VariantFilter::Quality(_)        => FilterType::QualityFilter,
            VariantFilter::KnownVariant(_)   => FilterType::KnownVariantFilter,
            VariantFilter::Frequency(_)      => FilterType::FrequencyFilter,
            VariantFilter::Pathogenicity(_)  => FilterType::PathogenicityFilter,
            VariantFilter::RegulatoryFeature => FilterType::RegulatoryFeatureFilter,
        }
    }

    pub fn evaluate(
        &self,
        variant: &VariantEvaluation,
        providers: &VariantDataProviders,
    ) -> Result<FilterResult, EvaluationError> {
        let filter_type = self.filter_type();
        let verdict = |passed: bool| {
            if passed {
                FilterResult::pass(filter_type)
            } else {
                FilterResult::fail(filter_type)
            }
        };

        match self {
            VariantFilter::FailedVariant => Ok(verdict(variant.passed_vcf_filter)),

            VariantFilter::Interval(f) => Ok(verdict(f.interval.contains(variant.chromosome, variant.position))),

            VariantFilter::GenePanel(f) => {
                Ok(verdict(!variant.variant_effect.is_off_gene() && f.gene_symbols.contains(&variant.gene_symbol)))
            }

            VariantFilter::VariantEffect(f) => Ok(verdict(!f.remove.contains(&variant.variant_effect))),

            VariantFilter::Quality(f) => {
                if variant.quality.is_nan() {
                    return Err(EvaluationError::Item(format!("variant {} has no QUAL value", variant.key())));
                }
                let result = if variant.quality >= f.min_quality {
                    FilterResult::pass_with_score(filter_type, variant.quality)
                } else {
                    FilterResult::fail_with_score(filter_type, variant.quality)
                };
                Ok(result)
            }

            VariantFilter::KnownVariant(f) => {
                let data = providers.frequency()?.frequency_data(variant)?;
                Ok(verdict(!data.is_represented_in(&f.sources)))
            }

            VariantFilter::Frequency(f) => {
                let data = providers.frequency()?.frequency_data(variant)?;
                let Some(max) = data.max_frequency(&f.sources) else {
                    return Ok(FilterResult::pass(filter_type));
                };
                if !(0.0..=100.0).contains(&max) {
                    return Err(ProviderError::Malformed(format!(
                        "frequency {max} for {} is not a percentage",
                        variant.key()
                    ))
                    .into());
                }
                let score = 1.0 - max / 100.0;
                let result = if max <= f.max_frequency {
                    FilterResult::pass_with_score(filter_type, score)
                } else {
                    FilterResult::fail_with_score(filter_type, score)
                };
                Ok(result)
            }

            VariantFilter::Pathogenicity(f) => {
                let scores = providers.pathogenicity()?.pathogenicity_scores(variant, &f.sources)?;
                if let Some((source, bad)) = scores.iter().find(|(_, s)| !(0.0..=1.0).contains(*s)) {
                    return Err(ProviderError::Malformed(format!(
                        "{source} score {bad} for {} is outside [0, 1]",
                        variant.key()
                    ))
                    .into());
                }
                let score = scores
                    .values()
                    .copied()
                    .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
                    .unwrap_or_else(|| variant.variant_effect.default_pathogenicity());
                let result = if f.keep_non_pathogenic || score >= PATHOGENICITY_THRESHOLD {
                    FilterResult::pass_with_score(filter_type, score)
                } else {
                    FilterResult::fail_with_score(filter_type, score)
                };
                Ok(result)
            }

            VariantFilter::RegulatoryFeature => {
                if !variant.variant_effect.is_off_gene() {
                    return Ok(FilterResult::pass(filter_type));
                }
                let distance = variant.gene_distance.ok_or_else(|| {
                    EvaluationError::Item(format!(
                        "{} variant {} has no distance to its gene",
                        variant.variant_effect,
                        variant.key()
                    ))
                })?;
                Ok(verdict(distance <= MAX_REGULATORY_DISTANCE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockFrequencyProvider, MockPathogenicityProvider};
    use std::sync::Arc;

    fn variant() -> VariantEvaluation {
        VariantEvaluation::new(10, 123_256_215, "T", "G")
            .with_gene("FGFR2", 2263)
            .with_quality(100.0)
            .with_effect(VariantEffect::MissenseVariant)
    }

    fn no_providers() -> VariantDataProviders {
        VariantDataProviders::new()
    }

    #[test]
    fn test_failed_variant_filter() {
        let filter = VariantFilter::FailedVariant;
        assert!(filter.evaluate(&variant(), &no_providers()).unwrap().passed());
        let failed = variant().with_vcf_filter_passed(false);
        assert!(filter.evaluate(&failed, &no_providers()).unwrap().failed());
    }

    #[test]
    fn test_interval_filter_is_inclusive() {
        let filter = VariantFilter::Interval(IntervalFilter {
            interval: "chr10:123256215-123256300".parse().unwrap(),
        });
        let result = filter.evaluate(&variant(), &no_providers()).unwrap();
        assert!(result.passed());
        assert_eq!(result.filter_type(), FilterType::IntervalFilter);

        let outside = VariantEvaluation::new(10, 123_256_214, "T", "G");
        assert!(filter.evaluate(&outside, &no_providers()).unwrap().failed());
    }

    #[test]
    fn test_gene_panel_and_effect_filters() {
        let panel = VariantFilter::GenePanel(GenePanelFilter { gene_symbols: BTreeSet::from(["FGFR2".to_string()]) });
        assert!(panel.evaluate(&variant(), &no_providers()).unwrap().passed());

        let effect = VariantFilter::VariantEffect(VariantEffectFilter {
            remove: BTreeSet::from([VariantEffect::MissenseVariant]),
        });
        assert!(effect.evaluate(&variant(), &no_providers()).unwrap().failed());
    }

    #[test]
    fn test_gene_panel_fails_off_gene_variants() {
        let panel = VariantFilter::GenePanel(GenePanelFilter { gene_symbols: BTreeSet::from(["FGFR2".to_string()]) });
        let upstream = variant().with_effect(VariantEffect::UpstreamGeneVariant);
        assert!(panel.evaluate(&upstream, &no_providers()).unwrap().failed());
        let intergenic = variant().with_effect(VariantEffect::IntergenicVariant);
        assert!(panel.evaluate(&intergenic, &no_providers()).unwrap().failed());
    }

    #[test]
    fn test_quality_filter_nan_is_item_error() {
        let filter = VariantFilter::Quality(QualityFilter { min_quality: 50.0 });
        assert!(filter.evaluate(&variant(), &no_providers()).unwrap().passed());
        assert!(filter.evaluate(&variant().with_quality(49.9), &no_providers()).unwrap().failed());
        let err = filter.evaluate(&variant().with_quality(f64::NAN), &no_providers()).unwrap_err();
        assert!(matches!(err, EvaluationError::Item(_)));
    }

    #[test]
    fn test_frequency_filter() {
        let key = variant().key();
        let providers = no_providers().with_frequency(Arc::new(
            MockFrequencyProvider::new()
                .with(&key, FrequencySource::ThousandGenomes, 0.5)
                .with(&key, FrequencySource::GnomadEAll, 3.0),
        ));
        let strict = VariantFilter::Frequency(FrequencyFilter {
            max_frequency: 1.0,
            sources: BTreeSet::from(FrequencySource::ALL),
        });
        assert!(strict.evaluate(&variant(), &providers).unwrap().failed());

        let only_1kg = VariantFilter::Frequency(FrequencyFilter {
            max_frequency: 1.0,
            sources: BTreeSet::from([FrequencySource::ThousandGenomes]),
        });
        assert!(only_1kg.evaluate(&variant(), &providers).unwrap().passed());

        let unseen = VariantEvaluation::new(1, 1, "A", "C");
        assert!(strict.evaluate(&unseen, &providers).unwrap().passed());
    }

    #[test]
    fn test_provider_filters_are_deterministic() {
        let key = variant().key();
        let providers = no_providers()
            .with_frequency(Arc::new(MockFrequencyProvider::new().with(&key, FrequencySource::GnomadEAll, 0.4)))
            .with_pathogenicity(Arc::new(
                MockPathogenicityProvider::new().with(&key, PathogenicitySource::Polyphen, 0.9),
            ));
        let filters = [
            VariantFilter::Frequency(FrequencyFilter { max_frequency: 1.0, sources: BTreeSet::from(FrequencySource::ALL) }),
            VariantFilter::Pathogenicity(PathogenicityFilter {
                keep_non_pathogenic: false,
                sources: BTreeSet::from([PathogenicitySource::Polyphen]),
            }),
        ];
        for filter in &filters {
            let first = filter.evaluate(&variant(), &providers).unwrap();
            let second = filter.evaluate(&variant(), &providers).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_frequency_out_of_range_is_malformed() {
        let key = variant().key();
        let providers = no_providers()
            .with_frequency(Arc::new(MockFrequencyProvider::new().with(&key, FrequencySource::Local, 150.0)));
        let filter = VariantFilter::Frequency(FrequencyFilter {
            max_frequency: 1.0,
            sources: BTreeSet::from([FrequencySource::Local]),
        });
        let err = filter.evaluate(&variant(), &providers).unwrap_err();
        assert!(matches!(err, EvaluationError::Provider(ProviderError::Malformed(_))));
    }

    #[test]
    fn test_known_variant_filter() {
        let key = variant().key();
        let providers =
            no_providers().with_frequency(Arc::new(MockFrequencyProvider::new().with_rs_id(&key, "rs121918506")));
        let filter = VariantFilter::KnownVariant(KnownVariantFilter { sources: BTreeSet::from(FrequencySource::ALL) });
        assert!(filter.evaluate(&variant(), &providers).unwrap().failed());
        assert!(filter.evaluate(&VariantEvaluation::new(2, 5, "G", "A"), &providers).unwrap().passed());
    }

    #[test]
    fn test_pathogenicity_filter_falls_back_to_effect_default() {
        let providers = no_providers().with_pathogenicity(Arc::new(MockPathogenicityProvider::new()));
        let filter = VariantFilter::Pathogenicity(PathogenicityFilter {
            keep_non_pathogenic: false,
            sources: BTreeSet::from([PathogenicitySource::Polyphen]),
        });
        let result = filter.evaluate(&variant(), &providers).unwrap();
        assert!(result.passed());
        assert_eq!(result.score(), VariantEffect::MissenseVariant.default_pathogenicity());

        let synonymous = variant().with_effect(VariantEffect::SynonymousVariant);
        assert!(filter.evaluate(&synonymous, &providers).unwrap().failed());
    }

    #[test]
    fn test_pathogenicity_filter_uses_max_prediction() {
        let key = variant().key();
        let providers = no_providers().with_pathogenicity(Arc::new(
            MockPathogenicityProvider::new()
                .with(&key, PathogenicitySource::Polyphen, 0.2)
                .with(&key, PathogenicitySource::Sift, 0.3),
        ));
        let sources = BTreeSet::from([PathogenicitySource::Polyphen, PathogenicitySource::Sift]);
        let strict =
            VariantFilter::Pathogenicity(PathogenicityFilter { keep_non_pathogenic: false, sources: sources.clone() });
        let result = strict.evaluate(&variant(), &providers).unwrap();
        assert!(result.failed());
        assert_eq!(result.score(), 0.3);

        let lenient = VariantFilter::Pathogenicity(PathogenicityFilter { keep_non_pathogenic: true, sources });
        assert!(lenient.evaluate(&variant(), &providers).unwrap().passed());
    }

    #[test]
    fn test_regulatory_feature_filter() {
        let filter = VariantFilter::RegulatoryFeature;
        assert!(filter.evaluate(&variant(), &no_providers()).unwrap().passed());

        let near = variant().with_effect(VariantEffect::UpstreamGeneVariant).with_gene_distance(5_000);
        assert!(filter.evaluate(&near, &no_providers()).unwrap().passed());

        let far = variant().with_effect(VariantEffect::IntergenicVariant).with_gene_distance(250_000);
        assert!(filter.evaluate(&far, &no_providers()).unwrap().failed());

        let unknown = variant().with_effect(VariantEffect::IntergenicVariant);
        assert!(matches!(filter.evaluate(&unknown, &no_providers()), Err(EvaluationError::Item(_))));
    }

    #[test]
    fn test_provider_outage_escalates() {
        let providers = no_providers().with_frequency(Arc::new(MockFrequencyProvider::failing(
            ProviderError::Unreachable("gnomad".into()),
        )));
        let filter = VariantFilter::Frequency(FrequencyFilter {
            max_frequency: 1.0,
            sources: BTreeSet::from(FrequencySource::ALL),
        });
        assert!(matches!(
            filter.evaluate(&variant(), &providers),
            Err(EvaluationError::Provider(ProviderError::Unreachable(_)))
        ));
    }
}
