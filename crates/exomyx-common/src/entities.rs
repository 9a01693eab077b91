/// Core entity types shared by every analysis step.
/// Genes own their variants; both carry append-only logs of filter results.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::effects::VariantEffect;
use crate::inheritance::ModeOfInheritance;
use crate::sources::PriorityType;

pub const CHROMOSOME_X: u8 = 23;
pub const CHROMOSOME_Y: u8 = 24;
pub const CHROMOSOME_MT: u8 = 25;

/// Parse a contig name (`chr1`, `1`, `X`, `chrM`, `MT`) into its numeric form.
pub fn parse_chromosome(name: &str) -> Option<u8> {
    let trimmed = name.trim();
    let bare = trimmed
        .strip_prefix("chr")
        .or_else(|| trimmed.strip_prefix("CHR"))
        .unwrap_or(trimmed);
    match bare.to_uppercase().as_str() {
        "X" => Some(CHROMOSOME_X),
        "Y" => Some(CHROMOSOME_Y),
        "M" | "MT" => Some(CHROMOSOME_MT),
        digits => digits.parse::<u8>().ok().filter(|n| (1..=22).contains(n)),
    }
}

pub fn chromosome_name(chromosome: u8) -> String {
    match chromosome {
        CHROMOSOME_X => "X".to_string(),
        CHROMOSOME_Y => "Y".to_string(),
        CHROMOSOME_MT => "MT".to_string(),
        n => n.to_string(),
    }
}


// ── Genotypes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleCall {
    Ref,
    Alt,
    NoCall,
}

/// A diploid genotype call for one individual at one site.
///
/// Haploid calls (e.g. male chrX) are stored with the allele duplicated.
/// Phase is only comparable between two calls sharing a phase set; `None`
/// means the whole contig is one phase set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genotype {
    pub alleles: [AlleleCall; 2],
    pub phased: bool,
    pub phase_set: Option<u32>,
}

impl Genotype {
    pub fn unphased(first: AlleleCall, second: AlleleCall) -> Self {
        Self { alleles: [first, second], phased: false, phase_set: None }
    }

    pub fn phased(first: AlleleCall, second: AlleleCall) -> Self {
        Self { alleles: [first, second], phased: true, phase_set: None }
    }

    pub fn no_call() -> Self {
        Self::unphased(AlleleCall::NoCall, AlleleCall::NoCall)
    }

    pub fn with_phase_set(mut self, phase_set: u32) -> Self {
        self.phase_set = Some(phase_set);
        self
    }

    pub fn is_no_call(&self) -> bool {
        self.alleles.contains(&AlleleCall::NoCall)
    }

    pub fn is_het(&self) -> bool {
        matches!(self.alleles, [AlleleCall::Ref, AlleleCall::Alt] | [AlleleCall::Alt, AlleleCall::Ref])
    }

    pub fn is_hom_ref(&self) -> bool {
        self.alleles == [AlleleCall::Ref, AlleleCall::Ref]
    }

    pub fn is_hom_alt(&self) -> bool {
        self.alleles == [AlleleCall::Alt, AlleleCall::Alt]
    }

    pub fn carries_alt(&self) -> bool {
        !self.is_no_call() && self.alleles.contains(&AlleleCall::Alt)
    }

    /// Haplotype index holding the alternate allele of a phased heterozygote.
    pub fn alt_haplotype(&self) -> Option<usize> {
        if !self.phased || !self.is_het() {
            return None;
        }
        self.alleles.iter().position(|a| *a == AlleleCall::Alt)
    }

    pub fn shares_phase_set(&self, other: &Genotype) -> bool {
        self.phased && other.phased && self.phase_set == other.phase_set
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allele = |a: AlleleCall| match a {
            AlleleCall::Ref => '0',
            AlleleCall::Alt => '1',
            AlleleCall::NoCall => '.',
        };
        let sep = if self.phased { '|' } else { '/' };
        write!(f, "{}{}{}", allele(self.alleles[0]), sep, allele(self.alleles[1]))
    }
}

impl FromStr for Genotype {
    type Err = String;

    /// Parses VCF `GT` values such as `0/1`, `1|0`, `./.`, `1` or `1/2`.
    /// Any non-reference allele index counts as the alternate allele.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_allele = |token: &str| -> Result<AlleleCall, String> {
            match token {
                "." => Ok(AlleleCall::NoCall),
                "0" => Ok(AlleleCall::Ref),
                other => other
                    .parse::<u32>()
                    .map(|_| AlleleCall::Alt)
                    .map_err(|_| format!("malformed genotype '{s}'")),
            }
        };

        let value = s.trim();
        let (tokens, phased): (Vec<&str>, bool) = if value.contains('|') {
            (value.split('|').collect(), true)
        } else {
            (value.split('/').collect(), false)
        };

        match tokens.as_slice() {
            [single] => {
                let call = parse_allele(single)?;
                Ok(Genotype::unphased(call, call))
            }
            [first, second] => Ok(Genotype {
                alleles: [parse_allele(first)?, parse_allele(second)?],
                phased,
                phase_set: None,
            }),
            _ => Err(format!("malformed genotype '{s}'")),
        }
    }
}


// ── Genetic interval ──────────────────────────────────────────────────────────

lazy_static! {
    static ref INTERVAL_RE: Regex =
        Regex::new(r"(?i)^(?:chr)?([0-9]{1,2}|X|Y|MT?):([0-9,]+)-([0-9,]+)$").expect("valid interval regex");
}

/// An inclusive genomic interval on a single chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneticInterval {
    pub chromosome: u8,
    pub start: u32,
    pub end: u32,
}

impl GeneticInterval {
    pub fn new(chromosome: u8, start: u32, end: u32) -> Self {
        Self { chromosome, start, end }
    }

    pub fn contains(&self, chromosome: u8, position: u32) -> bool {
        self.chromosome == chromosome && position >= self.start && position <= self.end
    }
}

impl FromStr for GeneticInterval {
    type Err = String;

    /// Parses `chr10:122892600-122892700` style regions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = INTERVAL_RE
            .captures(s.trim())
            .ok_or_else(|| format!("'{s}' is not a genetic interval, expected e.g. 'chr10:122892600-122892700'"))?;
        let chromosome = parse_chromosome(&caps[1]).ok_or_else(|| format!("unknown chromosome in '{s}'"))?;
        let coordinate = |raw: &str| {
            raw.replace(',', "")
                .parse::<u32>()
                .map_err(|e| format!("bad coordinate '{raw}' in '{s}': {e}"))
        };
        let start = coordinate(&caps[2])?;
        let end = coordinate(&caps[3])?;
        if start > end {
            return Err(format!("interval start {start} is after end {end} in '{s}'"));
        }
        Ok(Self { chromosome, start, end })
    }
}

impl fmt::Display for GeneticInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chr{}:{}-{}", chromosome_name(self.chromosome), self.start, self.end)
    }
}


// ── Filter results ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    FailedVariantFilter,
    IntervalFilter,
    GeneSymbolFilter,
    VariantEffectFilter,
    QualityFilter,
    KnownVariantFilter,
    FrequencyFilter,
    PathogenicityFilter,
    RegulatoryFeatureFilter,
    InheritanceFilter,
    PriorityScoreFilter,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::FailedVariantFilter     => "FAILED_VARIANT_FILTER",
            FilterType::IntervalFilter          => "INTERVAL_FILTER",
            FilterType::GeneSymbolFilter        => "GENE_SYMBOL_FILTER",
            FilterType::VariantEffectFilter     => "VARIANT_EFFECT_FILTER",
            FilterType::QualityFilter           => "QUALITY_FILTER",
            FilterType::KnownVariantFilter      => "KNOWN_VARIANT_FILTER",
            FilterType::FrequencyFilter         => "FREQUENCY_FILTER",
            FilterType::PathogenicityFilter     => "PATHOGENICITY_FILTER",
            FilterType::RegulatoryFeatureFilter => "REGULATORY_FEATURE_FILTER",
            FilterType::InheritanceFilter       => "INHERITANCE_FILTER",
            FilterType::PriorityScoreFilter     => "PRIORITY_SCORE_FILTER",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterStatus {
    Pass,
    Fail,
}

/// The outcome of one filter applied to one variant or gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    filter_type: FilterType,
    status: FilterStatus,
    score: f64,
    message: Option<String>,
}

impl FilterResult {
    /// Boolean filters use a token score of 1.0 for a pass and 0.0 for a fail.
    pub fn pass(filter_type: FilterType) -> Self {
        Self::pass_with_score(filter_type, 1.0)
    }

    pub fn fail(filter_type: FilterType) -> Self {
        Self::fail_with_score(filter_type, 0.0)
    }

    pub fn pass_with_score(filter_type: FilterType, score: f64) -> Self {
        Self { filter_type, status: FilterStatus::Pass, score, message: None }
    }

    pub fn fail_with_score(filter_type: FilterType, score: f64) -> Self {
        Self { filter_type, status: FilterStatus::Fail, score, message: None }
    }

    /// A failure caused by an evaluation problem rather than by the data.
    pub fn fail_with_message(filter_type: FilterType, message: impl Into<String>) -> Self {
        Self { filter_type, status: FilterStatus::Fail, score: 0.0, message: Some(message.into()) }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn status(&self) -> FilterStatus {
        self.status
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn passed(&self) -> bool {
        self.status == FilterStatus::Pass
    }

    pub fn failed(&self) -> bool {
        self.status == FilterStatus::Fail
    }
}


// ── Variant ───────────────────────────────────────────────────────────────────

/// A called variant plus everything the analysis learns about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantEvaluation {
    pub chromosome: u8,
    pub position: u32,
    pub ref_allele: String,
    pub alt_allele: String,
    pub gene_symbol: String,
    pub gene_id: u32,
    /// PHRED-scaled QUAL column.
    pub quality: f64,
    /// True when the VCF FILTER column was `PASS` or `.`.
    pub passed_vcf_filter: bool,
    pub variant_effect: VariantEffect,
    /// Distance to the associated gene for upstream/intergenic variants.
    pub gene_distance: Option<u32>,
    /// Genotype calls keyed by sample id.
    pub genotypes: BTreeMap<String, Genotype>,
    filter_results: Vec<FilterResult>,
    compatible_modes: BTreeSet<ModeOfInheritance>,
}

impl VariantEvaluation {
    pub fn new(chromosome: u8, position: u32, ref_allele: impl Into<String>, alt_allele: impl Into<String>) -> Self {
        Self {
            chromosome,
            position,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            gene_symbol: String::new(),
            gene_id: 0,
            quality: 0.0,
            passed_vcf_filter: true,
            variant_effect: VariantEffect::SequenceVariant,
            gene_distance: None,
            genotypes: BTreeMap::new(),
            filter_results: Vec::new(),
            compatible_modes: BTreeSet::new(),
        }
    }

    pub fn with_gene(mut self, symbol: impl Into<String>, gene_id: u32) -> Self {
        self.gene_symbol = symbol.into();
        self.gene_id = gene_id;
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_effect(mut self, effect: VariantEffect) -> Self {
        self.variant_effect = effect;
        self
    }

    pub fn with_vcf_filter_passed(mut self, passed: bool) -> Self {
        self.passed_vcf_filter = passed;
        self
    }

    pub fn with_gene_distance(mut self, distance: u32) -> Self {
        self.gene_distance = Some(distance);
        self
    }

    pub fn with_genotype(mut self, sample: impl Into<String>, genotype: Genotype) -> Self {
        self.genotypes.insert(sample.into(), genotype);
        self
    }

    /// `chrom-pos-ref-alt`, e.g. `1-98518687-T-A`.
    pub fn key(&self) -> String {
        format!("{}-{}-{}-{}", chromosome_name(self.chromosome), self.position, self.ref_allele, self.alt_allele)
    }

    /// Called-genotype lookup; no-calls are reported as absent.
    pub fn called_genotype(&self, sample: &str) -> Option<&Genotype> {
        self.genotypes.get(sample).filter(|gt| !gt.is_no_call())
    }

    pub fn add_filter_result(&mut self, result: FilterResult) {
        self.filter_results.push(result);
    }

    pub fn filter_results(&self) -> &[FilterResult] {
        &self.filter_results
    }

    pub fn result_for(&self, filter_type: FilterType) -> Option<&FilterResult> {
        self.filter_results.iter().find(|r| r.filter_type() == filter_type)
    }

    /// A variant passes while none of the filters applied so far failed it.
    pub fn passed_filters(&self) -> bool {
        !self.filter_results.iter().any(FilterResult::failed)
    }

    pub fn failed_filter_types(&self) -> Vec<FilterType> {
        self.filter_results.iter().filter(|r| r.failed()).map(|r| r.filter_type()).collect()
    }

    pub fn add_compatible_modes(&mut self, modes: impl IntoIterator<Item = ModeOfInheritance>) {
        self.compatible_modes.extend(modes);
    }

    pub fn compatible_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.compatible_modes
    }
}

impl fmt::Display for VariantEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} qual={} passed={}",
            self.key(),
            self.gene_symbol,
            self.variant_effect,
            self.quality,
            self.passed_filters()
        )
    }
}


// ── Gene ──────────────────────────────────────────────────────────────────────

/// A gene and the variants observed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub symbol: String,
    /// Entrez gene id.
    pub gene_id: u32,
    variants: Vec<VariantEvaluation>,
    filter_results: Vec<FilterResult>,
    priority_scores: BTreeMap<PriorityType, f64>,
    compatible_modes: BTreeSet<ModeOfInheritance>,
    /// Index pairs into `variants` consistent with compound heterozygosity.
    comp_het_pairs: Vec<(usize, usize)>,
}

impl Gene {
    pub fn new(symbol: impl Into<String>, gene_id: u32) -> Self {
        Self {
            symbol: symbol.into(),
            gene_id,
            variants: Vec::new(),
            filter_results: Vec::new(),
            priority_scores: BTreeMap::new(),
            compatible_modes: BTreeSet::new(),
            comp_het_pairs: Vec::new(),
        }
    }

    pub fn add_variant(&mut self, variant: VariantEvaluation) {
        self.variants.push(variant);
    }

    pub fn variants(&self) -> &[VariantEvaluation] {
        &self.variants
    }

    pub fn variants_mut(&mut self) -> &mut [VariantEvaluation] {
        &mut self.variants
    }

    pub fn passed_variants(&self) -> impl Iterator<Item = &VariantEvaluation> {
        self.variants.iter().filter(|v| v.passed_filters())
    }

    pub fn passed_variant_indices(&self) -> Vec<usize> {
        self.variants
            .iter()
            .enumerate()
            .filter(|(_, v)| v.passed_filters())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_passing_variant(&self) -> bool {
        self.variants.iter().any(VariantEvaluation::passed_filters)
    }

    pub fn add_filter_result(&mut self, result: FilterResult) {
        self.filter_results.push(result);
    }

    pub fn filter_results(&self) -> &[FilterResult] {
        &self.filter_results
    }

    pub fn result_for(&self, filter_type: FilterType) -> Option<&FilterResult> {
        self.filter_results.iter().find(|r| r.filter_type() == filter_type)
    }

    /// Aggregate flag: no gene-level filter failed and at least one variant
    /// still passes. A gene without variants never passes.
    pub fn passed_filters(&self) -> bool {
        !self.filter_results.iter().any(FilterResult::failed) && self.has_passing_variant()
    }

    pub fn add_priority_score(&mut self, priority_type: PriorityType, score: f64) {
        self.priority_scores.insert(priority_type, score);
    }

    pub fn priority_score(&self, priority_type: PriorityType) -> Option<f64> {
        self.priority_scores.get(&priority_type).copied()
    }

    pub fn priority_scores(&self) -> &BTreeMap<PriorityType, f64> {
        &self.priority_scores
    }

    /// Product of every prioritiser score; 1.0 when unprioritised.
    pub fn combined_priority_score(&self) -> f64 {
        self.priority_scores.values().product()
    }

    pub fn set_inheritance_assessment(
        &mut self,
        modes: BTreeSet<ModeOfInheritance>,
        comp_het_pairs: Vec<(usize, usize)>,
    ) {
        self.compatible_modes = modes;
        self.comp_het_pairs = comp_het_pairs;
    }

    pub fn compatible_modes(&self) -> &BTreeSet<ModeOfInheritance> {
        &self.compatible_modes
    }

    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        self.compatible_modes.contains(&mode)
    }

    pub fn comp_het_pairs(&self) -> &[(usize, usize)] {
        &self.comp_het_pairs
    }

    /// The compound heterozygous groupings as variant references.
    pub fn comp_het_variants(&self) -> Vec<(&VariantEvaluation, &VariantEvaluation)> {
        self.comp_het_pairs
            .iter()
            .map(|&(a, b)| (&self.variants[a], &self.variants[b]))
            .collect()
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) variants={} passed={} priority={:.3}",
            self.symbol,
            self.gene_id,
            self.variants.len(),
            self.passed_filters(),
            self.combined_priority_score()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chromosome_names() {
        assert_eq!(parse_chromosome("chr10"), Some(10));
        assert_eq!(parse_chromosome("X"), Some(CHROMOSOME_X));
        assert_eq!(parse_chromosome("chrM"), Some(CHROMOSOME_MT));
        assert_eq!(parse_chromosome("23"), None);
        assert_eq!(parse_chromosome("chrUn"), None);
    }

    #[test]
    fn test_genotype_parsing() {
        let gt: Genotype = "0|1".parse().unwrap();
        assert!(gt.is_het() && gt.phased);
        assert_eq!(gt.alt_haplotype(), Some(1));

        let gt: Genotype = "1/0".parse().unwrap();
        assert!(gt.is_het() && !gt.phased);
        assert_eq!(gt.alt_haplotype(), None);

        assert!("1/1".parse::<Genotype>().unwrap().is_hom_alt());
        assert!("0/0".parse::<Genotype>().unwrap().is_hom_ref());
        assert!("./.".parse::<Genotype>().unwrap().is_no_call());
        assert!("1".parse::<Genotype>().unwrap().is_hom_alt());
        assert!("1/2".parse::<Genotype>().unwrap().is_hom_alt());
        assert!("A/T".parse::<Genotype>().is_err());
    }

    #[test]
    fn test_genotype_display() {
        assert_eq!("1|0".parse::<Genotype>().unwrap().to_string(), "1|0");
        assert_eq!(Genotype::no_call().to_string(), "./.");
    }

    #[test]
    fn test_phase_sets_must_match() {
        let a = Genotype::phased(AlleleCall::Alt, AlleleCall::Ref).with_phase_set(100);
        let b = Genotype::phased(AlleleCall::Ref, AlleleCall::Alt).with_phase_set(100);
        let c = Genotype::phased(AlleleCall::Ref, AlleleCall::Alt).with_phase_set(200);
        assert!(a.shares_phase_set(&b));
        assert!(!a.shares_phase_set(&c));
        assert!(!a.shares_phase_set(&"0/1".parse().unwrap()));
    }

    #[test]
    fn test_interval_parse_and_contains() {
        let interval: GeneticInterval = "chr10:122892600-122892700".parse().unwrap();
        assert_eq!(interval, GeneticInterval::new(10, 122_892_600, 122_892_700));
        assert!(interval.contains(10, 122_892_600));
        assert!(interval.contains(10, 122_892_700));
        assert!(!interval.contains(10, 122_892_701));
        assert!(!interval.contains(11, 122_892_650));
        assert_eq!(interval.to_string(), "chr10:122892600-122892700");
    }

    #[test]
    fn test_interval_rejects_bad_input() {
        assert!("chr10:200-100".parse::<GeneticInterval>().is_err());
        assert!("chr10".parse::<GeneticInterval>().is_err());
        assert!("chrZ:1-2".parse::<GeneticInterval>().is_err());
    }

    #[test]
    fn test_variant_passes_until_a_filter_fails() {
        let mut variant = VariantEvaluation::new(1, 145_508_800, "T", "C").with_gene("RBM8A", 9939);
        assert!(variant.passed_filters());
        variant.add_filter_result(FilterResult::pass(FilterType::QualityFilter));
        assert!(variant.passed_filters());
        variant.add_filter_result(FilterResult::fail(FilterType::FrequencyFilter));
        assert!(!variant.passed_filters());
        assert_eq!(variant.failed_filter_types(), vec![FilterType::FrequencyFilter]);
        assert_eq!(variant.filter_results().len(), 2);
        assert_eq!(variant.key(), "1-145508800-T-C");
    }

    #[test]
    fn test_gene_aggregate_flag() {
        let mut gene = Gene::new("RBM8A", 9939);
        assert!(!gene.passed_filters());

        let mut failing = VariantEvaluation::new(1, 1, "A", "G");
        failing.add_filter_result(FilterResult::fail(FilterType::IntervalFilter));
        gene.add_variant(failing);
        assert!(!gene.passed_filters());

        gene.add_variant(VariantEvaluation::new(1, 2, "A", "G"));
        assert!(gene.passed_filters());
        assert_eq!(gene.passed_variant_indices(), vec![1]);

        gene.add_filter_result(FilterResult::fail(FilterType::InheritanceFilter));
        assert!(!gene.passed_filters());
    }

    #[test]
    fn test_combined_priority_score_is_product() {
        let mut gene = Gene::new("FGFR2", 2263);
        assert_eq!(gene.combined_priority_score(), 1.0);
        gene.add_priority_score(PriorityType::OmimPriority, 0.5);
        gene.add_priority_score(PriorityType::HiphivePriority, 0.8);
        assert!((gene.combined_priority_score() - 0.4).abs() < 1e-9);
    }
}
