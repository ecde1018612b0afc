//! Integration test: load pedigrees from the two supported on-disk formats
//! and run them through family inference and ordering.
//!
//! The relationship-list format carries no sex information, so it exercises
//! the lenient inference path (first-seen parent becomes the father). The
//! VCF header format records parent sexes through Father=/Mother= keys, so
//! single-family inference resolves without guessing.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use pedigree_graph_core::family::{order_families_and_set_mates, FamilyUnit};
use pedigree_graph_core::graph::{IsPrimary, RelationshipGraph, Sex};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Helper: write content to a temporary file and return the path.
fn write_temp(content: &str, ext: &str) -> String {
    let dir = std::env::temp_dir();
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let file_name = format!("test_pedgraph_it_{}_{}.{}", std::process::id(), id, ext);
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

/// Test 1: relationship-list file through lenient inference and ordering.
#[test]
fn test_rel_file_pipeline() {
    let path = write_temp(
        "\
# Two generations plus a tumour sample.
PARENT_CHILD dad son
PARENT_CHILD mom son
PARENT_CHILD dad daughter
PARENT_CHILD mom daughter
PARENT_CHILD gpa dad
PARENT_CHILD gma dad
ORIGINAL_DERIVED son son_tumour
",
        "rel",
    );
    let graph = RelationshipGraph::from_rel_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(graph.n_genomes(), 7);
    assert_eq!(graph.n_relationships(), 7);

    // No sexes are recorded: strict mode drops everything, lenient mode
    // defaults the first-seen parent to father.
    assert!(FamilyUnit::infer_all_families(&graph, false, None).is_empty());

    // "dad" is the first genome in the file, so his parents' group is the
    // first-seen pair. Within each pair the first-seen parent is defaulted
    // to father.
    let families = FamilyUnit::infer_all_families(&graph, true, None);
    assert_eq!(families.len(), 2);
    assert_eq!(families[0].father(), "gpa");
    assert_eq!(families[0].mother(), "gma");
    assert_eq!(families[0].children(), &["dad"]);
    assert_eq!(families[1].father(), "dad");
    assert_eq!(families[1].mother(), "mom");
    assert_eq!(families[1].children(), &["daughter", "son"]);

    // Ordering keeps the grandparent family ahead of the family it feeds.
    let ordered = order_families_and_set_mates(families).unwrap();
    assert_eq!(ordered[0].father(), "gpa");
    assert_eq!(ordered[1].father(), "dad");
    assert_eq!(ordered[1].father_distinct_mates(), 1);
}

/// Test 2: VCF header through single-family inference.
#[test]
fn test_vcf_header_pipeline() {
    let path = write_temp(
        "\
##fileformat=VCFv4.2
##source=pedigree_toolkit
##PEDIGREE=<Child=son,Father=dad,Mother=mom>
##PEDIGREE=<Child=daughter,Father=dad,Mother=mom>
##PEDIGREE=<Derived=son_tumour,Original=son>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tson\tdaughter\tson_tumour
",
        "vcf",
    );
    let graph = RelationshipGraph::from_vcf_header(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(graph.n_genomes(), 5);
    assert_eq!(graph.attributes("dad").unwrap().sex(), Sex::Male);
    assert_eq!(graph.attributes("mom").unwrap().sex(), Sex::Female);
    assert_eq!(
        graph.genomes_matching(&[&IsPrimary]),
        vec!["son", "daughter", "son_tumour"]
    );

    // The derived edge does not take part in family inference.
    let family = FamilyUnit::infer_single_family(&graph).unwrap();
    assert_eq!(family.father(), "dad");
    assert_eq!(family.mother(), "mom");
    assert_eq!(family.children(), &["daughter", "son"]);
}

/// Test 3: the strict toggle on a VCF-loaded graph. Children come out of the
/// header unsexed, so strict inference accepts the family only after their
/// sexes are annotated.
#[test]
fn test_strict_inference_after_sex_annotation() {
    let input = "\
##fileformat=VCFv4.2
##PEDIGREE=<Child=son,Father=dad,Mother=mom>
##PEDIGREE=<Child=daughter,Father=dad,Mother=mom>
";
    let mut graph = RelationshipGraph::read_vcf_header(input.as_bytes(), "trio").unwrap();

    assert!(FamilyUnit::infer_all_families(&graph, false, None).is_empty());
    assert_eq!(FamilyUnit::infer_all_families(&graph, true, None).len(), 1);

    graph.attributes_mut("son").unwrap().set_sex(Sex::Male);
    graph.attributes_mut("daughter").unwrap().set_sex(Sex::Female);

    let strict = FamilyUnit::infer_all_families(&graph, false, None);
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].father(), "dad");
}
