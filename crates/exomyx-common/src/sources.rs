//! Enumerated data sources and prioritiser types recognised in analysis
//! declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Frequency sources ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencySource {
    ThousandGenomes,
    TopmedAll,
    EspAll,
    ExacAll,
    GnomadEAll,
    GnomadGAll,
    Local,
}

impl FrequencySource {
    pub const ALL: [FrequencySource; 7] = [
        FrequencySource::ThousandGenomes,
        FrequencySource::TopmedAll,
        FrequencySource::EspAll,
        FrequencySource::ExacAll,
        FrequencySource::GnomadEAll,
        FrequencySource::GnomadGAll,
        FrequencySource::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencySource::ThousandGenomes => "THOUSAND_GENOMES",
            FrequencySource::TopmedAll       => "TOPMED_ALL",
            FrequencySource::EspAll          => "ESP_ALL",
            FrequencySource::ExacAll         => "EXAC_ALL",
            FrequencySource::GnomadEAll      => "GNOMAD_E_ALL",
            FrequencySource::GnomadGAll      => "GNOMAD_G_ALL",
            FrequencySource::Local           => "LOCAL",
        }
    }
}

// ── Pathogenicity sources ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathogenicitySource {
    Sift,
    Polyphen,
    MutationTaster,
    Cadd,
    Remm,
    Revel,
    Mvp,
}

impl PathogenicitySource {
    pub const ALL: [PathogenicitySource; 7] = [
        PathogenicitySource::Sift,
        PathogenicitySource::Polyphen,
        PathogenicitySource::MutationTaster,
        PathogenicitySource::Cadd,
        PathogenicitySource::Remm,
        PathogenicitySource::Revel,
        PathogenicitySource::Mvp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathogenicitySource::Sift           => "SIFT",
            PathogenicitySource::Polyphen       => "POLYPHEN",
            PathogenicitySource::MutationTaster => "MUTATION_TASTER",
            PathogenicitySource::Cadd           => "CADD",
            PathogenicitySource::Remm           => "REMM",
            PathogenicitySource::Revel          => "REVEL",
            PathogenicitySource::Mvp            => "MVP",
        }
    }
}

// ── Prioritiser types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityType {
    OmimPriority,
    HiphivePriority,
    PhivePriority,
    PhenixPriority,
    ExomewalkerPriority,
}

impl PriorityType {
    pub const ALL: [PriorityType; 5] = [
        PriorityType::OmimPriority,
        PriorityType::HiphivePriority,
        PriorityType::PhivePriority,
        PriorityType::PhenixPriority,
        PriorityType::ExomewalkerPriority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityType::OmimPriority        => "OMIM_PRIORITY",
            PriorityType::HiphivePriority     => "HIPHIVE_PRIORITY",
            PriorityType::PhivePriority       => "PHIVE_PRIORITY",
            PriorityType::PhenixPriority      => "PHENIX_PRIORITY",
            PriorityType::ExomewalkerPriority => "EXOMEWALKER_PRIORITY",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ident, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_uppercase();
                $ty::ALL
                    .iter()
                    .find(|v| v.as_str() == wanted)
                    .copied()
                    .ok_or_else(|| {
                        let permitted: Vec<&str> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                        format!("Illegal {}: '{}'. Permitted values are any of: {}", $label, s, permitted.join(", "))
                    })
            }
        }
    };
}

display_and_parse!(FrequencySource, "FrequencySource");
display_and_parse!(PathogenicitySource, "PathogenicitySource");
display_and_parse!(PriorityType, "PriorityType");
