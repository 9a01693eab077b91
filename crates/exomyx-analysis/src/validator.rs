//! Step-order validator.
//!
//! Turns a raw declaration into an [`Analysis`] or fails with the first
//! configuration or ordering problem found. Nothing is partially accepted.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde_yaml::Value;
use tracing::{debug, warn};

use exomyx_common::{
    AnalysisDeclaration, AnalysisError, FrequencySource, GeneticInterval, ModeOfInheritance, PathogenicitySource,
    PriorityType, Result, StepDeclaration, StepKind, VariantEffect,
};
use exomyx_filters::{
    FrequencyFilter, GeneFilter, GenePanelFilter, InheritanceFilter, IntervalFilter, KnownVariantFilter,
    PathogenicityFilter, PriorityScoreFilter, QualityFilter, VariantEffectFilter, VariantFilter,
};
use exomyx_ranker::{HiPhiveOptions, PhenotypeSource, Prioritiser};

use crate::analysis::Analysis;
use crate::step::AnalysisStep;

const ANALYSIS: &str = "analysis";

const FREQUENCY_SOURCES: &str = "frequencySources";
const PATHOGENICITY_SOURCES: &str = "pathogenicitySources";

const KNOWN_VARIANT_SOURCES_HINT: &str =
    "Known variant filter requires a list of frequency sources for the analysis e.g. frequencySources: [THOUSAND_GENOMES, ESP_ALL]";
const FREQUENCY_SOURCES_HINT: &str =
    "Frequency filter requires a list of frequency sources for the analysis e.g. frequencySources: [THOUSAND_GENOMES, ESP_ALL]";
const PATHOGENICITY_SOURCES_HINT: &str =
    "Pathogenicity filter requires a list of pathogenicity sources for the analysis e.g. {pathogenicitySources: [SIFT, POLYPHEN, MUTATION_TASTER]}";

/// Validate a declared analysis.
///
/// Rules, in the order they bite:
/// - unknown step kinds are logged and skipped
/// - at most one `inheritanceFilter`; it is dropped with a warning when the
///   declared modes are empty or only `ANY`
/// - every step's required options are present and well-formed
/// - no two prioritisers of the same type
/// - a `priorityScoreFilter` needs an earlier prioritiser of its type
pub fn validate(declaration: &AnalysisDeclaration) -> Result<Analysis> {
    let frequency_defaults: BTreeSet<FrequencySource> =
        parse_all(ANALYSIS, FREQUENCY_SOURCES, &declaration.frequency_sources)?;
    let pathogenicity_defaults: BTreeSet<PathogenicitySource> =
        parse_all(ANALYSIS, PATHOGENICITY_SOURCES, &declaration.pathogenicity_sources)?;

    let mut inheritance_modes = ModeOfInheritance::parse_declared(&declaration.inheritance_modes).map_err(|message| {
        AnalysisError::InvalidOption { step: ANALYSIS.to_string(), option: "inheritanceModes".to_string(), message }
    })?;
    inheritance_modes.remove(&ModeOfInheritance::Any);

    let mut warnings: Vec<String> = declaration
        .pedigree
        .problems()
        .into_iter()
        .map(|p| format!("pedigree: {p}"))
        .collect();

    let mut steps = Vec::with_capacity(declaration.steps.len());
    let mut inheritance_declared_at: Option<usize> = None;
    let mut prioritisers_seen: BTreeMap<PriorityType, usize> = BTreeMap::new();

    for (index, step_decl) in declaration.steps.iter().enumerate() {
        let position = index + 1;
        let Some(kind) = step_decl.step_kind() else {
            let message = format!("step {position}: unknown analysis step '{}' skipped", step_decl.kind);
            warn!(step = %step_decl.kind, position, "unknown analysis step skipped");
            warnings.push(message);
            continue;
        };
        let step_name = format!("{kind} (step {position})");

        let step = match kind {
            StepKind::InheritanceFilter => {
                if let Some(first) = inheritance_declared_at {
                    return Err(AnalysisError::StepOrdering(format!(
                        "only one inheritanceFilter is allowed, found one at step {first} and another at step {position}"
                    )));
                }
                inheritance_declared_at = Some(position);
                if inheritance_modes.is_empty() {
                    let message = format!(
                        "{step_name}: dropped, no inheritance modes declared other than ANY"
                    );
                    warn!(position, "inheritance filter dropped: no modes of inheritance declared");
                    warnings.push(message);
                    continue;
                }
                AnalysisStep::GeneFilter(GeneFilter::Inheritance(InheritanceFilter::new(inheritance_modes.clone())))
            }

            StepKind::PriorityScoreFilter => {
                let filter = priority_score_filter(step_decl, &step_name)?;
                if !prioritisers_seen.contains_key(&filter.priority_type) {
                    return Err(AnalysisError::StepOrdering(format!(
                        "{step_name} filters on {} but no prioritiser producing that score is declared before it",
                        filter.priority_type
                    )));
                }
                AnalysisStep::GeneFilter(GeneFilter::PriorityScore(filter))
            }

            kind if kind.is_prioritiser() => {
                let prioritiser = prioritiser(kind, step_decl, &step_name)?;
                let priority_type = prioritiser.priority_type();
                if let Some(first) = prioritisers_seen.insert(priority_type, position) {
                    return Err(AnalysisError::Config(format!(
                        "{priority_type} is produced twice, by step {first} and step {position}"
                    )));
                }
                if kind == StepKind::OmimPrioritiser && inheritance_declared_at.is_none() {
                    let inheritance_later = declaration.steps[position..]
                        .iter()
                        .any(|s| s.step_kind() == Some(StepKind::InheritanceFilter));
                    if inheritance_later && !inheritance_modes.is_empty() {
                        let message = format!(
                            "{step_name}: declared before the inheritanceFilter, so it will not see inheritance compatibility"
                        );
                        warn!(position, "omim prioritiser declared before inheritance filter");
                        warnings.push(message);
                    }
                }
                AnalysisStep::Prioritiser(prioritiser)
            }

            kind => AnalysisStep::VariantFilter(variant_filter(
                kind,
                step_decl,
                &step_name,
                &frequency_defaults,
                &pathogenicity_defaults,
            )?),
        };

        debug!(step = %step.name(), position, "validated analysis step");
        steps.push(step);
    }

    Ok(Analysis::new(
        steps,
        declaration.analysis_mode,
        inheritance_modes,
        declaration.pedigree.clone(),
        declaration.hpo_ids.clone(),
        warnings,
    ))
}

// ── Per-kind option parsing ──────────────────────────────────────────────────

fn variant_filter(
    kind: StepKind,
    decl: &StepDeclaration,
    step: &str,
    frequency_defaults: &BTreeSet<FrequencySource>,
    pathogenicity_defaults: &BTreeSet<PathogenicitySource>,
) -> Result<VariantFilter> {
    let filter = match kind {
        StepKind::FailedVariantFilter => VariantFilter::FailedVariant,

        StepKind::IntervalFilter => {
            let value = require(
                decl,
                step,
                "interval",
                "Interval filter requires a valid genetic interval e.g. {interval: 'chr10:122892600-122892700'}",
            )?;
            let raw = as_str(step, "interval", value)?;
            let interval = GeneticInterval::from_str(raw).map_err(|message| invalid(step, "interval", message))?;
            VariantFilter::Interval(IntervalFilter { interval })
        }

        StepKind::GenePanelFilter => {
            const HINT: &str = "Gene panel filter requires a list of HGNC gene symbols e.g. {geneSymbols: [FGFR1, FGFR2]}";
            let symbols = as_strings(step, "geneSymbols", require(decl, step, "geneSymbols", HINT)?)?;
            if symbols.is_empty() {
                return Err(missing(step, "geneSymbols", HINT));
            }
            VariantFilter::GenePanel(GenePanelFilter { gene_symbols: symbols.into_iter().collect() })
        }

        StepKind::VariantEffectFilter => {
            let value = require(
                decl,
                step,
                "remove",
                "VariantEffect filter requires a list of VariantEffects to be removed e.g. {remove: [UPSTREAM_GENE_VARIANT, INTERGENIC_VARIANT, SYNONYMOUS_VARIANT]}",
            )?;
            let remove: BTreeSet<VariantEffect> = parse_all(step, "remove", &as_strings(step, "remove", value)?)?;
            VariantFilter::VariantEffect(VariantEffectFilter { remove })
        }

        StepKind::QualityFilter => {
            let value = require(
                decl,
                step,
                "minQuality",
                "Quality filter requires a floating point value for the minimum PHRED score e.g. {minQuality: 50.0}",
            )?;
            VariantFilter::Quality(QualityFilter { min_quality: as_f64(step, "minQuality", value)? })
        }

        StepKind::KnownVariantFilter => {
            let sources = step_sources(decl, step, FREQUENCY_SOURCES, frequency_defaults, KNOWN_VARIANT_SOURCES_HINT)?;
            VariantFilter::KnownVariant(KnownVariantFilter { sources })
        }

        StepKind::FrequencyFilter => {
            let sources = step_sources(decl, step, FREQUENCY_SOURCES, frequency_defaults, FREQUENCY_SOURCES_HINT)?;
            let value = require(
                decl,
                step,
                "maxFrequency",
                "Frequency filter requires a floating point value for the maximum frequency e.g. {maxFrequency: 1.0}",
            )?;
            let max_frequency = as_f64(step, "maxFrequency", value)?;
            if !(0.0..=100.0).contains(&max_frequency) {
                return Err(invalid(step, "maxFrequency", format!("{max_frequency} is not a percentage between 0 and 100")));
            }
            VariantFilter::Frequency(FrequencyFilter { max_frequency, sources })
        }

        StepKind::PathogenicityFilter => {
            let value = require(
                decl,
                step,
                "keepNonPathogenic",
                "Pathogenicity filter requires a boolean value for keepNonPathogenic e.g. {keepNonPathogenic: false}",
            )?;
            let keep_non_pathogenic = as_bool(step, "keepNonPathogenic", value)?;
            let sources =
                step_sources(decl, step, PATHOGENICITY_SOURCES, pathogenicity_defaults, PATHOGENICITY_SOURCES_HINT)?;
            VariantFilter::Pathogenicity(PathogenicityFilter { keep_non_pathogenic, sources })
        }

        StepKind::RegulatoryFeatureFilter => VariantFilter::RegulatoryFeature,

        other => {
            return Err(AnalysisError::Config(format!("{other} is not a variant filter")));
        }
    };
    Ok(filter)
}

fn priority_score_filter(decl: &StepDeclaration, step: &str) -> Result<PriorityScoreFilter> {
    let type_value = require(
        decl,
        step,
        "priorityType",
        "Priority score filter requires a string value for the prioritiser type e.g. {priorityType: HIPHIVE_PRIORITY}",
    )?;
    let priority_type: PriorityType = as_str(step, "priorityType", type_value)?
        .parse()
        .map_err(|message| invalid(step, "priorityType", message))?;
    let score_value = require(
        decl,
        step,
        "minPriorityScore",
        "Priority score filter requires a floating point value for the minimum prioritiser score e.g. {minPriorityScore: 0.65}",
    )?;
    let min_priority_score = as_f64(step, "minPriorityScore", score_value)?;
    Ok(PriorityScoreFilter { priority_type, min_priority_score })
}

fn prioritiser(kind: StepKind, decl: &StepDeclaration, step: &str) -> Result<Prioritiser> {
    let prioritiser = match kind {
        StepKind::OmimPrioritiser => Prioritiser::Omim,
        StepKind::PhivePrioritiser => Prioritiser::Phive,
        StepKind::PhenixPrioritiser => Prioritiser::Phenix,

        StepKind::HiPhivePrioritiser => {
            let mut options = HiPhiveOptions::default();
            if let Some(value) = decl.option("diseaseId") {
                options.disease_id = Some(as_str(step, "diseaseId", value)?.to_string()).filter(|s| !s.is_empty());
            }
            if let Some(value) = decl.option("candidateGeneSymbol") {
                options.candidate_gene_symbol =
                    Some(as_str(step, "candidateGeneSymbol", value)?.to_string()).filter(|s| !s.is_empty());
            }
            if let Some(value) = decl.option("runParams") {
                let params: BTreeSet<PhenotypeSource> =
                    parse_all(step, "runParams", &as_strings(step, "runParams", value)?)?;
                if !params.is_empty() {
                    options.run_params = params;
                }
            }
            Prioritiser::HiPhive(options)
        }

        StepKind::ExomeWalkerPrioritiser => {
            const HINT: &str = "ExomeWalker prioritiser requires a list of ENTREZ geneIds e.g. {seedGeneIds: [11111, 22222, 33333]}";
            let raw = as_strings(step, "seedGeneIds", require(decl, step, "seedGeneIds", HINT)?)?;
            if raw.is_empty() {
                return Err(missing(step, "seedGeneIds", HINT));
            }
            let seed_gene_ids = raw
                .iter()
                .map(|id| {
                    id.parse::<u32>()
                        .map_err(|_| invalid(step, "seedGeneIds", format!("'{id}' is not an Entrez gene id")))
                })
                .collect::<Result<Vec<u32>>>()?;
            Prioritiser::ExomeWalker { seed_gene_ids }
        }

        other => return Err(AnalysisError::Config(format!("{other} is not a prioritiser"))),
    };
    Ok(prioritiser)
}

// ── Value helpers ────────────────────────────────────────────────────────────

fn missing(step: &str, option: &'static str, hint: &'static str) -> AnalysisError {
    AnalysisError::MissingOption { step: step.to_string(), option, hint }
}

fn invalid(step: &str, option: &str, message: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidOption { step: step.to_string(), option: option.to_string(), message: message.into() }
}

fn require<'a>(decl: &'a StepDeclaration, step: &str, option: &'static str, hint: &'static str) -> Result<&'a Value> {
    decl.option(option).ok_or_else(|| missing(step, option, hint))
}

fn as_str<'a>(step: &str, option: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| invalid(step, option, "expected a string"))
}

fn as_f64(step: &str, option: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(step, option, "expected a number"))
}

fn as_bool(step: &str, option: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| invalid(step, option, "expected true or false"))
}

/// A YAML list, or a comma separated string.
fn as_strings(step: &str, option: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(invalid(step, option, "expected a list of strings")),
            })
            .collect(),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()),
        _ => Err(invalid(step, option, "expected a list")),
    }
}

fn parse_all<T>(step: &str, option: &str, values: &[String]) -> Result<BTreeSet<T>>
where
    T: FromStr<Err = String> + Ord,
{
    values
        .iter()
        .map(|v| v.parse::<T>().map_err(|message| invalid(step, option, message)))
        .collect()
}

/// Step-level sources win over the analysis-level default.
fn step_sources<T>(
    decl: &StepDeclaration,
    step: &str,
    option: &'static str,
    defaults: &BTreeSet<T>,
    hint: &'static str,
) -> Result<BTreeSet<T>>
where
    T: FromStr<Err = String> + Ord + Clone,
{
    let sources = match decl.option(option) {
        Some(value) => parse_all(step, option, &as_strings(step, option, value)?)?,
        None => defaults.clone(),
    };
    if sources.is_empty() {
        return Err(missing(step, option, hint));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomyx_common::AnalysisMode;

    fn declaration(yaml: &str) -> AnalysisDeclaration {
        AnalysisDeclaration::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_analysis_preserves_declared_order() {
        let analysis = validate(&declaration(
            r#"
analysisMode: PASS_ONLY
inheritanceModes: [AUTOSOMAL_DOMINANT]
frequencySources: [THOUSAND_GENOMES, GNOMAD_E_ALL]
pathogenicitySources: [POLYPHEN, SIFT]
steps:
  - kind: hiPhivePrioritiser
    options: {runParams: 'human,mouse'}
  - kind: intervalFilter
    options: {interval: 'chr10:122892600-122892700'}
  - kind: priorityScoreFilter
    options: {priorityType: HIPHIVE_PRIORITY, minPriorityScore: 0.501}
  - kind: frequencyFilter
    options: {maxFrequency: 1.0}
  - kind: pathogenicityFilter
    options: {keepNonPathogenic: true}
  - kind: inheritanceFilter
"#,
        ))
        .unwrap();

        let kinds: Vec<StepKind> = analysis.steps().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::HiPhivePrioritiser,
                StepKind::IntervalFilter,
                StepKind::PriorityScoreFilter,
                StepKind::FrequencyFilter,
                StepKind::PathogenicityFilter,
                StepKind::InheritanceFilter,
            ]
        );
        assert_eq!(analysis.mode(), AnalysisMode::PassOnly);
        assert!(analysis.warnings().is_empty());

        let scheduled: Vec<StepKind> = analysis.execution_schedule().iter().map(|s| s.kind()).collect();
        assert_eq!(
            scheduled,
            vec![
                StepKind::IntervalFilter,
                StepKind::FrequencyFilter,
                StepKind::PathogenicityFilter,
                StepKind::HiPhivePrioritiser,
                StepKind::PriorityScoreFilter,
                StepKind::InheritanceFilter,
            ]
        );
    }

    #[test]
    fn test_two_inheritance_filters_rejected() {
        let err = validate(&declaration(
            r#"
inheritanceModes: [AUTOSOMAL_RECESSIVE]
steps:
  - kind: inheritanceFilter
  - kind: inheritanceFilter
"#,
        ))
        .unwrap_err();
        assert!(matches!(err, AnalysisError::StepOrdering(_)));
    }

    #[test]
    fn test_duplicate_inheritance_rejected_even_without_modes() {
        let err = validate(&declaration("steps: [{kind: inheritanceFilter}, {kind: inheritanceFilter}]")).unwrap_err();
        assert!(matches!(err, AnalysisError::StepOrdering(_)));
    }

    #[test]
    fn test_inheritance_filter_dropped_without_modes() {
        for modes in ["[]", "[ANY]", "[UNDEFINED]"] {
            let analysis = validate(&declaration(&format!(
                "inheritanceModes: {modes}\nsteps: [{{kind: inheritanceFilter}}, {{kind: failedVariantFilter}}]"
            )))
            .unwrap();
            assert_eq!(analysis.steps().len(), 1, "modes {modes}");
            assert_eq!(analysis.steps()[0].kind(), StepKind::FailedVariantFilter);
            assert_eq!(analysis.warnings().len(), 1);
        }
    }

    #[test]
    fn test_any_discarded_from_mixed_modes() {
        let analysis = validate(&declaration(
            "inheritanceModes: [ANY, AUTOSOMAL_DOMINANT]\nsteps: [{kind: inheritanceFilter}]",
        ))
        .unwrap();
        assert_eq!(analysis.inheritance_modes(), &BTreeSet::from([ModeOfInheritance::AutosomalDominant]));
        assert_eq!(analysis.steps().len(), 1);
    }

    #[test]
    fn test_missing_interval_names_step_and_option() {
        let err = validate(&declaration("steps: [{kind: intervalFilter, options: {}}]")).unwrap_err();
        match err {
            AnalysisError::MissingOption { step, option, hint } => {
                assert!(step.contains("intervalFilter"));
                assert_eq!(option, "interval");
                assert!(hint.contains("chr10:122892600-122892700"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_interval_is_invalid_option() {
        let err = validate(&declaration("steps: [{kind: intervalFilter, options: {interval: 'chr10:20-10'}}]")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidOption { .. }));
    }

    #[test]
    fn test_frequency_filter_needs_sources() {
        let err = validate(&declaration("steps: [{kind: frequencyFilter, options: {maxFrequency: 1.0}}]")).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingOption { option: "frequencySources", .. }));
    }

    #[test]
    fn test_step_sources_override_analysis_sources() {
        let analysis = validate(&declaration(
            r#"
frequencySources: [THOUSAND_GENOMES]
steps:
  - kind: frequencyFilter
    options: {maxFrequency: 2, frequencySources: [GNOMAD_G_ALL]}
"#,
        ))
        .unwrap();
        match &analysis.steps()[0] {
            AnalysisStep::VariantFilter(VariantFilter::Frequency(f)) => {
                assert_eq!(f.sources, BTreeSet::from([FrequencySource::GnomadGAll]));
                assert_eq!(f.max_frequency, 2.0);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_unrecognised_enum_values_rejected() {
        let cases = [
            "steps: [{kind: variantEffectFilter, options: {remove: [BANANA_VARIANT]}}]",
            "frequencySources: [UK10K]\nsteps: []",
            "pathogenicitySources: [PSYCHIC]\nsteps: []",
            "inheritanceModes: [CODOMINANT]\nsteps: []",
            "steps: [{kind: hiPhivePrioritiser}, {kind: priorityScoreFilter, options: {priorityType: MAGIC, minPriorityScore: 0.5}}]",
        ];
        for yaml in cases {
            let err = validate(&declaration(yaml)).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidOption { .. }), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_duplicate_prioritiser_rejected() {
        let err = validate(&declaration("steps: [{kind: phivePrioritiser}, {kind: phivePrioritiser}]")).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_priority_score_filter_needs_preceding_prioritiser() {
        let yaml = r#"
steps:
  - kind: priorityScoreFilter
    options: {priorityType: HIPHIVE_PRIORITY, minPriorityScore: 0.8}
  - kind: hiPhivePrioritiser
"#;
        let err = validate(&declaration(yaml)).unwrap_err();
        assert!(matches!(err, AnalysisError::StepOrdering(_)));

        let wrong_type = r#"
steps:
  - kind: phivePrioritiser
  - kind: priorityScoreFilter
    options: {priorityType: HIPHIVE_PRIORITY, minPriorityScore: 0.8}
"#;
        assert!(matches!(validate(&declaration(wrong_type)).unwrap_err(), AnalysisError::StepOrdering(_)));
    }

    #[test]
    fn test_omim_before_inheritance_warns() {
        let analysis = validate(&declaration(
            "inheritanceModes: [AUTOSOMAL_DOMINANT]\nsteps: [{kind: omimPrioritiser}, {kind: inheritanceFilter}]",
        ))
        .unwrap();
        assert_eq!(analysis.steps().len(), 2);
        assert_eq!(analysis.warnings().len(), 1);
    }

    #[test]
    fn test_unknown_step_skipped_with_warning() {
        let analysis = validate(&declaration("steps: [{kind: bananaFilter}, {kind: failedVariantFilter}]")).unwrap();
        assert_eq!(analysis.steps().len(), 1);
        assert!(analysis.warnings()[0].contains("bananaFilter"));
    }

    #[test]
    fn test_hiphive_options() {
        let analysis = validate(&declaration(
            "steps: [{kind: hiPhivePrioritiser, options: {diseaseId: 'OMIM:101600', candidateGeneSymbol: FGFR2, runParams: [human, ppi]}}]",
        ))
        .unwrap();
        match &analysis.steps()[0] {
            AnalysisStep::Prioritiser(Prioritiser::HiPhive(options)) => {
                assert_eq!(options.disease_id.as_deref(), Some("OMIM:101600"));
                assert_eq!(options.candidate_gene_symbol.as_deref(), Some("FGFR2"));
                assert_eq!(options.run_params, BTreeSet::from([PhenotypeSource::Human, PhenotypeSource::Ppi]));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_exome_walker_seed_ids() {
        let ok = validate(&declaration("steps: [{kind: exomeWalkerPrioritiser, options: {seedGeneIds: [2260, 2263]}}]"));
        assert!(ok.is_ok());
        let empty = validate(&declaration("steps: [{kind: exomeWalkerPrioritiser, options: {seedGeneIds: []}}]"));
        assert!(matches!(empty.unwrap_err(), AnalysisError::MissingOption { .. }));
        let bad = validate(&declaration("steps: [{kind: exomeWalkerPrioritiser, options: {seedGeneIds: [FGFR2]}}]"));
        assert!(matches!(bad.unwrap_err(), AnalysisError::InvalidOption { .. }));
    }

    #[test]
    fn test_gene_panel_requires_symbols() {
        let err = validate(&declaration("steps: [{kind: genePanelFilter, options: {geneSymbols: []}}]")).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingOption { option: "geneSymbols", .. }));
    }
}
