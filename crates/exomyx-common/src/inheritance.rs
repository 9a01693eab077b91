//! Mendelian modes of inheritance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeOfInheritance {
    AutosomalDominant,
    AutosomalRecessive,
    XDominant,
    XRecessive,
    Mitochondrial,
    /// Sentinel meaning "no restriction". Never checked against genotypes.
    Any,
}

impl ModeOfInheritance {
    pub const ALL: [ModeOfInheritance; 6] = [
        ModeOfInheritance::AutosomalDominant,
        ModeOfInheritance::AutosomalRecessive,
        ModeOfInheritance::XDominant,
        ModeOfInheritance::XRecessive,
        ModeOfInheritance::Mitochondrial,
        ModeOfInheritance::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOfInheritance::AutosomalDominant  => "AUTOSOMAL_DOMINANT",
            ModeOfInheritance::AutosomalRecessive => "AUTOSOMAL_RECESSIVE",
            ModeOfInheritance::XDominant          => "X_DOMINANT",
            ModeOfInheritance::XRecessive         => "X_RECESSIVE",
            ModeOfInheritance::Mitochondrial      => "MITOCHONDRIAL",
            ModeOfInheritance::Any                => "ANY",
        }
    }

    /// Recessive modes need two damaged copies, so compound heterozygotes count.
    pub fn is_recessive(&self) -> bool {
        matches!(self, ModeOfInheritance::AutosomalRecessive | ModeOfInheritance::XRecessive)
    }

    pub fn is_x_linked(&self) -> bool {
        matches!(self, ModeOfInheritance::XDominant | ModeOfInheritance::XRecessive)
    }

    /// Parses a declared list of modes. `UNDEFINED`, `UNINITIALIZED` and `ANY`
    /// collapse to the "any" sentinel; the sentinel is dropped from mixed lists.
    pub fn parse_declared(values: &[String]) -> Result<BTreeSet<ModeOfInheritance>, String> {
        let mut modes = BTreeSet::new();
        for value in values {
            let upper = value.trim().to_uppercase();
            if upper == "UNDEFINED" || upper == "UNINITIALIZED" {
                modes.insert(ModeOfInheritance::Any);
                continue;
            }
            modes.insert(upper.parse::<ModeOfInheritance>()?);
        }
        if modes.len() > 1 {
            modes.remove(&ModeOfInheritance::Any);
        }
        Ok(modes)
    }
}

impl fmt::Display for ModeOfInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeOfInheritance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ModeOfInheritance::ALL
            .iter()
            .find(|m| m.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                let permitted: Vec<&str> = ModeOfInheritance::ALL.iter().map(|m| m.as_str()).collect();
                format!("'{s}' is not a valid mode of inheritance. Use one of: {}", permitted.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_declared_drops_any_from_mixed_list() {
        let modes = ModeOfInheritance::parse_declared(&strings(&["AUTOSOMAL_RECESSIVE", "ANY"])).unwrap();
        assert_eq!(modes, BTreeSet::from([ModeOfInheritance::AutosomalRecessive]));
    }

    #[test]
    fn test_parse_declared_uninitialized_is_any() {
        let modes = ModeOfInheritance::parse_declared(&strings(&["UNINITIALIZED"])).unwrap();
        assert_eq!(modes, BTreeSet::from([ModeOfInheritance::Any]));
    }

    #[test]
    fn test_parse_declared_rejects_unknown() {
        let err = ModeOfInheritance::parse_declared(&strings(&["CODOMINANT"])).unwrap_err();
        assert!(err.contains("CODOMINANT"));
    }

    #[test]
    fn test_recessive_modes() {
        assert!(ModeOfInheritance::XRecessive.is_recessive());
        assert!(!ModeOfInheritance::XDominant.is_recessive());
        assert!(ModeOfInheritance::XDominant.is_x_linked());
    }
}
