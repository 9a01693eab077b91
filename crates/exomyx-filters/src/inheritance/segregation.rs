//! Single-variant segregation checks.
//!
//! A variant is compatible with a mode unless some individual with a called
//! genotype contradicts it. No-calls and individuals without a call are
//! uninformative.

use exomyx_common::entities::{CHROMOSOME_MT, CHROMOSOME_X};
use exomyx_common::{Genotype, Individual, ModeOfInheritance, Pedigree, Sex, VariantEvaluation};

/// Whether `variant` on its own segregates with the disease under `mode`.
/// For autosomal recessive this is the homozygous case only; compound
/// heterozygotes are handled by the resolver.
pub fn segregates(mode: ModeOfInheritance, variant: &VariantEvaluation, pedigree: &Pedigree) -> bool {
    let contig_ok = match mode {
        ModeOfInheritance::XDominant | ModeOfInheritance::XRecessive => variant.chromosome == CHROMOSOME_X,
        ModeOfInheritance::Mitochondrial => variant.chromosome == CHROMOSOME_MT,
        ModeOfInheritance::AutosomalDominant | ModeOfInheritance::AutosomalRecessive => {
            variant.chromosome != CHROMOSOME_X && variant.chromosome != CHROMOSOME_MT
        }
        ModeOfInheritance::Any => true,
    };
    if !contig_ok {
        return false;
    }

    pedigree.individuals().iter().all(|individual| match variant.called_genotype(&individual.id) {
        Some(genotype) => consistent(mode, individual, genotype),
        None => true,
    })
}

fn consistent(mode: ModeOfInheritance, individual: &Individual, gt: &Genotype) -> bool {
    let affected = individual.is_affected();
    let unaffected = individual.is_unaffected();

    match mode {
        ModeOfInheritance::AutosomalDominant => {
            if affected {
                gt.is_het()
            } else if unaffected {
                !gt.carries_alt()
            } else {
                true
            }
        }
        ModeOfInheritance::AutosomalRecessive => {
            if affected {
                gt.is_hom_alt()
            } else if unaffected {
                !gt.is_hom_alt()
            } else {
                true
            }
        }
        ModeOfInheritance::XRecessive => match (affected, unaffected, individual.sex) {
            (true, _, Sex::Female) => gt.is_hom_alt(),
            (true, _, _) => gt.carries_alt(),
            (_, true, Sex::Male) => !gt.carries_alt(),
            (_, true, _) => !gt.is_hom_alt(),
            _ => true,
        },
        ModeOfInheritance::XDominant | ModeOfInheritance::Mitochondrial => {
            if affected {
                gt.carries_alt()
            } else if unaffected {
                !gt.carries_alt()
            } else {
                true
            }
        }
        ModeOfInheritance::Any => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exomyx_common::AffectionStatus;

    fn trio() -> Pedigree {
        Pedigree::new(vec![
            Individual::new("proband", Sex::Female, AffectionStatus::Affected)
                .with_parents(Some("father"), Some("mother")),
            Individual::new("father", Sex::Male, AffectionStatus::Unaffected),
            Individual::new("mother", Sex::Female, AffectionStatus::Unaffected),
        ])
    }

    fn variant(chromosome: u8, proband: &str, father: &str, mother: &str) -> VariantEvaluation {
        VariantEvaluation::new(chromosome, 1000, "A", "T")
            .with_genotype("proband", proband.parse().unwrap())
            .with_genotype("father", father.parse().unwrap())
            .with_genotype("mother", mother.parse().unwrap())
    }

    #[test]
    fn test_de_novo_dominant() {
        let v = variant(1, "0/1", "0/0", "0/0");
        assert!(segregates(ModeOfInheritance::AutosomalDominant, &v, &trio()));
        assert!(!segregates(ModeOfInheritance::AutosomalRecessive, &v, &trio()));
    }

    #[test]
    fn test_dominant_rejects_carrier_unaffected_parent() {
        let v = variant(1, "0/1", "0/1", "0/0");
        assert!(!segregates(ModeOfInheritance::AutosomalDominant, &v, &trio()));
    }

    #[test]
    fn test_homozygous_recessive() {
        let v = variant(1, "1/1", "0/1", "0/1");
        assert!(segregates(ModeOfInheritance::AutosomalRecessive, &v, &trio()));
        let parent_hom = variant(1, "1/1", "1/1", "0/1");
        assert!(!segregates(ModeOfInheritance::AutosomalRecessive, &parent_hom, &trio()));
    }

    #[test]
    fn test_x_linked_requires_chromosome_x() {
        let autosomal = variant(1, "1/1", "0/0", "0/1");
        assert!(!segregates(ModeOfInheritance::XRecessive, &autosomal, &trio()));
        let x = variant(CHROMOSOME_X, "1/1", "0", "0/1");
        assert!(segregates(ModeOfInheritance::XRecessive, &x, &trio()));
        let carrier_father = variant(CHROMOSOME_X, "1/1", "1", "0/1");
        assert!(!segregates(ModeOfInheritance::XRecessive, &carrier_father, &trio()));
    }

    #[test]
    fn test_missing_calls_are_uninformative() {
        let v = VariantEvaluation::new(1, 1000, "A", "T")
            .with_genotype("proband", "0/1".parse().unwrap())
            .with_genotype("father", Genotype::no_call());
        assert!(segregates(ModeOfInheritance::AutosomalDominant, &v, &trio()));
    }
}
