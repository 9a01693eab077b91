//! Shared fixtures for Exomyx tests.

pub use pretty_assertions;

use exomyx_common::{AffectionStatus, Gene, Genotype, Individual, Pedigree, Sex, VariantEffect, VariantEvaluation};

pub const PROBAND: &str = "manuel";

pub const RBM8A_ID: u32 = 9939;
pub const GNRHR2_ID: u32 = 114_814;

/// Position of the single RBM8A variant kept by `SMALL_TEST_INTERVAL`.
pub const RBM8A_KEPT_POSITION: u32 = 145_508_800;
pub const SMALL_TEST_INTERVAL: &str = "chr1:145508800-145508800";

/// Route tracing output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn het() -> Genotype {
    "0/1".parse().expect("valid genotype")
}

fn proband_variant(gene: &str, gene_id: u32, position: u32, effect: VariantEffect) -> VariantEvaluation {
    VariantEvaluation::new(1, position, "A", "G")
        .with_gene(gene, gene_id)
        .with_quality(120.0)
        .with_effect(effect)
        .with_genotype(PROBAND, het())
}

/// Two neighbouring chr1 genes, three variants between them: RBM8A carries
/// one variant inside `SMALL_TEST_INTERVAL` and one outside, GNRHR2 carries
/// one outside.
pub fn small_test_genes() -> Vec<Gene> {
    let mut rbm8a = Gene::new("RBM8A", RBM8A_ID);
    rbm8a.add_variant(proband_variant("RBM8A", RBM8A_ID, RBM8A_KEPT_POSITION, VariantEffect::MissenseVariant));
    rbm8a.add_variant(proband_variant("RBM8A", RBM8A_ID, 145_507_646, VariantEffect::FivePrimeUtrExonVariant));

    let mut gnrhr2 = Gene::new("GNRHR2", GNRHR2_ID);
    gnrhr2.add_variant(proband_variant("GNRHR2", GNRHR2_ID, 145_509_520, VariantEffect::StopGained));

    vec![rbm8a, gnrhr2]
}

pub fn single_sample_pedigree() -> Pedigree {
    Pedigree::new(vec![Individual::new(PROBAND, Sex::Male, AffectionStatus::Affected)])
}

/// Two affected brothers, unknown father, unaffected mother.
pub fn cain_abel_eve() -> Pedigree {
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

/// Gene ABC for `cain_abel_eve`: three heterozygous variants phased in one
/// phase set. The first two sit in cis in everyone; the third is in trans to
/// them in both brothers and absent from Eve.
pub fn abc_gene() -> Gene {
    const PHASE_SET: u32 = 98_518_683;
    let phased = |s: &str| -> Genotype { s.parse::<Genotype>().expect("valid genotype").with_phase_set(PHASE_SET) };

    let variant = |position: u32, cain: Genotype, eve: Genotype, abel: Genotype| {
        VariantEvaluation::new(1, position, "C", "T")
            .with_gene("ABC", 19)
            .with_quality(200.0)
            .with_effect(VariantEffect::MissenseVariant)
            .with_genotype("Cain", cain)
            .with_genotype("Eve", eve)
            .with_genotype("Abel", abel)
    };

    let mut gene = Gene::new("ABC", 19);
    gene.add_variant(variant(98_518_687, phased("1|0"), phased("1|0"), phased("1|0")));
    gene.add_variant(variant(98_518_683, phased("1|0"), phased("1|0"), phased("1|0")));
    gene.add_variant(variant(97_723_020, phased("0|1"), phased("0|0"), phased("0|1")));
    gene
}

/// Affected child of unaffected parents.
pub fn trio() -> Pedigree {
    Pedigree::new(vec![
        Individual::new("proband", Sex::Female, AffectionStatus::Affected)
            .with_family("FAM1")
            .with_parents(Some("father"), Some("mother")),
        Individual::new("father", Sex::Male, AffectionStatus::Unaffected).with_family("FAM1"),
        Individual::new("mother", Sex::Female, AffectionStatus::Unaffected).with_family("FAM1"),
    ])
}

/// A trio variant with the given proband/father/mother genotypes.
pub fn trio_variant(gene: &str, gene_id: u32, position: u32, calls: [&str; 3]) -> VariantEvaluation {
    let [proband, father, mother] = calls;
    VariantEvaluation::new(2, position, "G", "A")
        .with_gene(gene, gene_id)
        .with_quality(80.0)
        .with_effect(VariantEffect::MissenseVariant)
        .with_genotype("proband", proband.parse().expect("valid genotype"))
        .with_genotype("father", father.parse().expect("valid genotype"))
        .with_genotype("mother", mother.parse().expect("valid genotype"))
}

/// `n` single-variant genes, for exercising the parallel path.
pub fn many_genes(n: u32) -> Vec<Gene> {
    (0..n)
        .map(|i| {
            let symbol = format!("GENE{i}");
            let mut gene = Gene::new(symbol.clone(), 100_000 + i);
            let quality = if i % 2 == 0 { 90.0 } else { 10.0 };
            gene.add_variant(
                proband_variant(&symbol, 100_000 + i, 1_000_000 + i * 10, VariantEffect::MissenseVariant)
                    .with_quality(quality),
            );
            gene
        })
        .collect()
}
