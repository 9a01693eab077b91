//! Sequence Ontology variant effects, as assigned by the upstream annotator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantEffect {
    FrameshiftVariant,
    StopGained,
    StopLost,
    StartLost,
    SpliceAcceptorVariant,
    SpliceDonorVariant,
    MissenseVariant,
    InframeInsertion,
    InframeDeletion,
    SpliceRegionVariant,
    SynonymousVariant,
    StopRetainedVariant,
    CodingTranscriptIntronVariant,
    NonCodingTranscriptIntronVariant,
    NonCodingTranscriptExonVariant,
    FivePrimeUtrExonVariant,
    ThreePrimeUtrExonVariant,
    UpstreamGeneVariant,
    DownstreamGeneVariant,
    IntergenicVariant,
    RegulatoryRegionVariant,
    SequenceVariant,
}

impl VariantEffect {
    pub const ALL: [VariantEffect; 22] = [
        VariantEffect::FrameshiftVariant,
        VariantEffect::StopGained,
        VariantEffect::StopLost,
        VariantEffect::StartLost,
        VariantEffect::SpliceAcceptorVariant,
        VariantEffect::SpliceDonorVariant,
        VariantEffect::MissenseVariant,
        VariantEffect::InframeInsertion,
        VariantEffect::InframeDeletion,
        VariantEffect::SpliceRegionVariant,
        VariantEffect::SynonymousVariant,
        VariantEffect::StopRetainedVariant,
        VariantEffect::CodingTranscriptIntronVariant,
        VariantEffect::NonCodingTranscriptIntronVariant,
        VariantEffect::NonCodingTranscriptExonVariant,
        VariantEffect::FivePrimeUtrExonVariant,
        VariantEffect::ThreePrimeUtrExonVariant,
        VariantEffect::UpstreamGeneVariant,
        VariantEffect::DownstreamGeneVariant,
        VariantEffect::IntergenicVariant,
        VariantEffect::RegulatoryRegionVariant,
        VariantEffect::SequenceVariant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantEffect::FrameshiftVariant                => "FRAMESHIFT_VARIANT",
            VariantEffect::StopGained                       => "STOP_GAINED",
            VariantEffect::StopLost                         => "STOP_LOST",
            VariantEffect::StartLost                        => "START_LOST",
            VariantEffect::SpliceAcceptorVariant            => "SPLICE_ACCEPTOR_VARIANT",
            VariantEffect::SpliceDonorVariant               => "SPLICE_DONOR_VARIANT",
            VariantEffect::MissenseVariant                  => "MISSENSE_VARIANT",
            VariantEffect::InframeInsertion                 => "INFRAME_INSERTION",
            VariantEffect::InframeDeletion                  => "INFRAME_DELETION",
            VariantEffect::SpliceRegionVariant              => "SPLICE_REGION_VARIANT",
            VariantEffect::SynonymousVariant                => "SYNONYMOUS_VARIANT",
            VariantEffect::StopRetainedVariant              => "STOP_RETAINED_VARIANT",
            VariantEffect::CodingTranscriptIntronVariant    => "CODING_TRANSCRIPT_INTRON_VARIANT",
            VariantEffect::NonCodingTranscriptIntronVariant => "NON_CODING_TRANSCRIPT_INTRON_VARIANT",
            VariantEffect::NonCodingTranscriptExonVariant   => "NON_CODING_TRANSCRIPT_EXON_VARIANT",
            VariantEffect::FivePrimeUtrExonVariant          => "FIVE_PRIME_UTR_EXON_VARIANT",
            VariantEffect::ThreePrimeUtrExonVariant         => "THREE_PRIME_UTR_EXON_VARIANT",
            VariantEffect::UpstreamGeneVariant              => "UPSTREAM_GENE_VARIANT",
            VariantEffect::DownstreamGeneVariant            => "DOWNSTREAM_GENE_VARIANT",
            VariantEffect::IntergenicVariant                => "INTERGENIC_VARIANT",
            VariantEffect::RegulatoryRegionVariant          => "REGULATORY_REGION_VARIANT",
            VariantEffect::SequenceVariant                  => "SEQUENCE_VARIANT",
        }
    }

    /// Pathogenicity assumed for an effect when no predictor has scored the
    /// variant. Missense changes carry a neutral prior since their impact is
    /// left to the predictors.
    pub fn default_pathogenicity(&self) -> f64 {
        match self {
            VariantEffect::StopGained => 1.0,
            VariantEffect::FrameshiftVariant | VariantEffect::StartLost => 0.95,
            VariantEffect::SpliceAcceptorVariant | VariantEffect::SpliceDonorVariant => 0.90,
            VariantEffect::InframeInsertion | VariantEffect::InframeDeletion => 0.85,
            VariantEffect::SpliceRegionVariant => 0.80,
            VariantEffect::StopLost => 0.70,
            VariantEffect::MissenseVariant => 0.60,
            VariantEffect::SynonymousVariant => 0.10,
            _ => 0.0,
        }
    }

    /// Effects lying outside any transcript, upstream of one, or in intergenic sequence.
    pub fn is_off_gene(&self) -> bool {
        matches!(self, VariantEffect::UpstreamGeneVariant | VariantEffect::IntergenicVariant)
    }
}

impl fmt::Display for VariantEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        VariantEffect::ALL
            .iter()
            .find(|effect| effect.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                let permitted: Vec<&str> = VariantEffect::ALL.iter().map(|e| e.as_str()).collect();
                format!("'{s}' is not a variant effect. Permitted effects are any of: {}", permitted.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_effect_case_insensitive() {
        assert_eq!("missense_variant".parse::<VariantEffect>(), Ok(VariantEffect::MissenseVariant));
        assert_eq!("INTERGENIC_VARIANT".parse::<VariantEffect>(), Ok(VariantEffect::IntergenicVariant));
    }

    #[test]
    fn test_unknown_effect_lists_permitted() {
        let err = "BANANA_VARIANT".parse::<VariantEffect>().unwrap_err();
        assert!(err.contains("STOP_GAINED"));
    }

    #[test]
    fn test_truncating_effects_outrank_missense() {
        assert!(VariantEffect::StopGained.default_pathogenicity() > VariantEffect::MissenseVariant.default_pathogenicity());
        assert_eq!(VariantEffect::IntergenicVariant.default_pathogenicity(), 0.0);
    }
}
