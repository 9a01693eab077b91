//! Family structure used for segregation and compound-het checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffectionStatus {
    Affected,
    Unaffected,
    #[default]
    Unknown,
}

/// One pedigree record. Parent ids of `"0"` or empty mean unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: String,
    #[serde(default)]
    pub family_id: String,
    #[serde(default)]
    pub paternal_id: Option<String>,
    #[serde(default)]
    pub maternal_id: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub affection_status: AffectionStatus,
}

impl Individual {
    pub fn new(id: impl Into<String>, sex: Sex, affection_status: AffectionStatus) -> Self {
        Self {
            id: id.into(),
            family_id: String::new(),
            paternal_id: None,
            maternal_id: None,
            sex,
            affection_status,
        }
    }

    pub fn with_family(mut self, family_id: impl Into<String>) -> Self {
        self.family_id = family_id.into();
        self
    }

    pub fn with_parents(mut self, paternal_id: Option<&str>, maternal_id: Option<&str>) -> Self {
        self.paternal_id = paternal_id.map(str::to_string);
        self.maternal_id = maternal_id.map(str::to_string);
        self
    }

    pub fn is_affected(&self) -> bool {
        self.affection_status == AffectionStatus::Affected
    }

    pub fn is_unaffected(&self) -> bool {
        self.affection_status == AffectionStatus::Unaffected
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }
}

fn known_parent(id: &Option<String>) -> Option<&str> {
    id.as_deref().map(str::trim).filter(|p| !p.is_empty() && *p != "0")
}

/// A set of individuals keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pedigree {
    #[serde(default)]
    individuals: Vec<Individual>,
}

impl Pedigree {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Single-sample analyses without family data.
    pub fn single_affected(id: impl Into<String>) -> Self {
        Self::new(vec![Individual::new(id, Sex::Unknown, AffectionStatus::Affected)])
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn get(&self, id: &str) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    /// Father record, if the id resolves within the pedigree.
    pub fn father_of(&self, individual: &Individual) -> Option<&Individual> {
        known_parent(&individual.paternal_id).and_then(|id| self.get(id))
    }

    pub fn mother_of(&self, individual: &Individual) -> Option<&Individual> {
        known_parent(&individual.maternal_id).and_then(|id| self.get(id))
    }

    pub fn affected(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| i.is_affected())
    }

    pub fn unaffected(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| i.is_unaffected())
    }

    /// Basic consistency problems: duplicate ids and dangling parent references.
    /// Dangling references are tolerated at run time and treated as unknown.
    pub fn problems(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for individual in &self.individuals {
            *seen.entry(individual.id.as_str()).or_default() += 1;
        }
        let mut problems: Vec<String> = seen
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(id, count)| format!("individual '{id}' declared {count} times"))
            .collect();

        for individual in &self.individuals {
            for (role, parent) in [("father", &individual.paternal_id), ("mother", &individual.maternal_id)] {
                if let Some(parent_id) = known_parent(parent) {
                    if !seen.contains_key(parent_id) {
                        problems.push(format!(
                            "{role} '{parent_id}' of '{}' is not in the pedigree",
                            individual.id
                        ));
                    }
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cain_abel_eve() -> Pedigree {
        Pedigree::new(vec![
            Individual::new("Cain", Sex::Male, AffectionStatus::Affected)
                .with_family("ADAM")
                .with_parents(Some("0"), Some("Eve")),
            Individual::new("Abel", Sex::Male, AffectionStatus::Affected)
                .with_family("ADAM")
                .with_parents(Some("0"), Some("Eve")),
            Individual::new("Eve", Sex::Female, AffectionStatus::Unaffected).with_family("ADAM"),
        ])
    }

    #[test]
    fn test_parent_lookup_treats_zero_as_unknown() {
        let pedigree = cain_abel_eve();
        let cain = pedigree.get("Cain").unwrap();
        assert!(pedigree.father_of(cain).is_none());
        assert_eq!(pedigree.mother_of(cain).map(|m| m.id.as_str()), Some("Eve"));
    }

    #[test]
    fn test_affected_partition() {
        let pedigree = cain_abel_eve();
        assert_eq!(pedigree.affected().count(), 2);
        assert_eq!(pedigree.unaffected().count(), 1);
    }

    #[test]
    fn test_dangling_parent_is_reported_not_resolved() {
        let pedigree = Pedigree::new(vec![
            Individual::new("Seth", Sex::Male, AffectionStatus::Affected).with_parents(Some("Adam"), None),
        ]);
        let seth = pedigree.get("Seth").unwrap();
        assert!(pedigree.father_of(seth).is_none());
        assert_eq!(pedigree.problems().len(), 1);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"individuals":[{"id":"p1","familyId":"F1","maternalId":"m","sex":"FEMALE","affectionStatus":"AFFECTED"}]}"#;
        let pedigree: Pedigree = serde_json::from_str(json).unwrap();
        let p1 = pedigree.get("p1").unwrap();
        assert_eq!(p1.family_id, "F1");
        assert_eq!(p1.maternal_id.as_deref(), Some("m"));
        assert!(p1.is_affected());
        assert_eq!(p1.sex, Sex::Female);
    }
}
