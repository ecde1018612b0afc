//! Integration test: family inference and generational ordering over a
//! three-generation pedigree.
//!
//! Pedigree:
//!   gpa x gma -> dad, uncle        (generation 1)
//!   dad x mom -> son, daughter     (generation 2)
//!   dad x ex  -> half_sib          (dad's second mate)
//!
//! The nuclear family's edges are inserted first, so a correct ordering has
//! to move the grandparent family in front of it. All sexes are recorded,
//! which lets the strict (non-lenient) inference path accept every family.

use pedigree_graph_core::error::PedigreeError;
use pedigree_graph_core::family::{
    is_monogamous, non_monogamous_samples, order_families_and_set_mates, FamilyUnit,
};
use pedigree_graph_core::graph::{
    founder_filter, NameWithin, RelationshipGraph, RelationshipType, Sex,
};

/// Build the three-generation pedigree described in the module header.
fn three_generation_pedigree() -> RelationshipGraph {
    let mut graph = RelationshipGraph::new();

    // Nuclear family first: its candidate children are scanned before the
    // grandparent family's.
    for child in ["son", "daughter"] {
        graph.add_relationship(RelationshipType::ParentChild, "mom", child);
        graph.add_relationship(RelationshipType::ParentChild, "dad", child);
    }
    for child in ["dad", "uncle"] {
        graph.add_relationship(RelationshipType::ParentChild, "gpa", child);
        graph.add_relationship(RelationshipType::ParentChild, "gma", child);
    }
    graph.add_relationship(RelationshipType::ParentChild, "ex", "half_sib");
    graph.add_relationship(RelationshipType::ParentChild, "dad", "half_sib");

    for name in ["gpa", "dad", "uncle", "son", "half_sib"] {
        graph.add_genome(name, Some(Sex::Male)).unwrap();
    }
    for name in ["gma", "mom", "daughter", "ex"] {
        graph.add_genome(name, Some(Sex::Female)).unwrap();
    }
    graph
}

/// Test 1: a four-genome nuclear graph infers to exactly one family with
/// canonical child ordering and slot indices.
#[test]
fn test_nuclear_family_inference() {
    let mut graph = RelationshipGraph::new();
    graph.add_genome("dad", Some(Sex::Male)).unwrap();
    graph.add_genome("mom", Some(Sex::Female)).unwrap();
    for child in ["son", "daughter"] {
        graph.add_relationship(RelationshipType::ParentChild, "dad", child);
        graph.add_relationship(RelationshipType::ParentChild, "mom", child);
    }

    let family = FamilyUnit::infer_single_family(&graph).unwrap();
    assert_eq!(family.father(), "dad");
    assert_eq!(family.mother(), "mom");
    assert_eq!(family.children(), &["daughter", "son"]);

    // Slot indices: father 0, mother 1, children alphabetically from 2.
    assert_eq!(family.slot_index("dad"), Some(0));
    assert_eq!(family.slot_index("mom"), Some(1));
    assert_eq!(family.slot_index("daughter"), Some(2));
    assert_eq!(family.slot_index("son"), Some(3));
    assert_eq!(family.slot_index("stranger"), None);

    // A single family orders trivially and is its own only mate pair.
    let ordered = order_families_and_set_mates(vec![family]).unwrap();
    assert_eq!(ordered.len(), 1);
    assert_eq!(ordered[0].father_family_id(), 0);
    assert_eq!(ordered[0].mother_family_id(), 0);
    assert_eq!(ordered[0].father_distinct_mates(), 1);
    assert_eq!(ordered[0].mother_distinct_mates(), 1);
    assert!(is_monogamous(&ordered));
}

/// Test 2: strict inference over the full pedigree finds all three families
/// and ordering emits every parent's family before the families it feeds.
#[test]
fn test_three_generation_inference_and_ordering() {
    let graph = three_generation_pedigree();

    let families = FamilyUnit::infer_all_families(&graph, false, None);
    assert_eq!(families.len(), 3, "Expected three families, got {:?}", families);

    // Input order is first-seen candidate order: the nuclear family leads.
    assert_eq!(families[0].father(), "dad");
    assert_eq!(families[0].mother(), "mom");
    assert_eq!(families[1].father(), "gpa");
    assert_eq!(families[1].mother(), "gma");
    assert_eq!(families[2].father(), "dad");
    assert_eq!(families[2].mother(), "ex");

    let ordered = order_families_and_set_mates(families).unwrap();
    assert_eq!(ordered.len(), 3);

    for (i, family) in ordered.iter().enumerate() {
        println!("family {}: {}", i, family);
    }

    // The grandparent family must precede both families dad parents.
    let position = |father: &str, mother: &str| {
        ordered
            .iter()
            .position(|f| f.father() == father && f.mother() == mother)
            .unwrap_or_else(|| panic!("Family {} x {} missing from ordering", father, mother))
    };
    assert_eq!(position("gpa", "gma"), 0);
    assert!(position("gpa", "gma") < position("dad", "mom"));
    assert!(position("gpa", "gma") < position("dad", "ex"));

    // General property: no family may precede the family its parents come from.
    for (i, family) in ordered.iter().enumerate() {
        for (j, other) in ordered.iter().enumerate() {
            let feeds = other
                .children()
                .iter()
                .any(|c| c == family.father() || c == family.mother());
            if feeds {
                assert!(j < i, "{} must be emitted before {}", other, family);
            }
        }
    }
}

/// Test 3: mate counts and per-parent family ids reflect dad's two mates,
/// numbered in first-seen input order.
#[test]
fn test_mate_annotations_after_ordering() {
    let graph = three_generation_pedigree();
    let families = FamilyUnit::infer_all_families(&graph, false, None);
    let ordered = order_families_and_set_mates(families).unwrap();

    let by_mother = |mother: &str| {
        ordered
            .iter()
            .find(|f| f.mother() == mother)
            .unwrap_or_else(|| panic!("No family with mother {}", mother))
    };

    // dad x mom was seen before dad x ex, so it holds dad's family id 0.
    let with_mom = by_mother("mom");
    assert_eq!(with_mom.father_distinct_mates(), 2);
    assert_eq!(with_mom.father_family_id(), 0);
    assert_eq!(with_mom.mother_distinct_mates(), 1);
    assert_eq!(with_mom.mother_family_id(), 0);

    let with_ex = by_mother("ex");
    assert_eq!(with_ex.father_distinct_mates(), 2);
    assert_eq!(with_ex.father_family_id(), 1);
    assert_eq!(with_ex.mother_distinct_mates(), 1);

    let grandparents = by_mother("gma");
    assert_eq!(grandparents.father_distinct_mates(), 1);
    assert_eq!(grandparents.father_family_id(), 0);

    assert!(!is_monogamous(&ordered));
    assert_eq!(non_monogamous_samples(&ordered), vec!["dad".to_string()]);
}

/// Test 4: two families that each contain the other's parent as a child can
/// never be ordered.
#[test]
fn test_cycle_is_rejected() {
    let mut graph = RelationshipGraph::new();
    graph.add_relationship(RelationshipType::ParentChild, "af", "bf");
    graph.add_relationship(RelationshipType::ParentChild, "am", "bf");
    graph.add_relationship(RelationshipType::ParentChild, "bf", "af");
    graph.add_relationship(RelationshipType::ParentChild, "bm", "af");

    let first = FamilyUnit::from_members(&graph, "af", "am", &["bf"]).unwrap();
    let second = FamilyUnit::from_members(&graph, "bf", "bm", &["af"]).unwrap();

    let result = order_families_and_set_mates(vec![first, second]);
    let msg = format!("{}", result.unwrap_err());
    assert!(msg.contains("cycle"), "Message was: {}", msg);
}

/// Test 5: a filtered sub-graph of the nuclear family supports single-family
/// inference on its own.
#[test]
fn test_filtered_subgraph_single_family() {
    let graph = three_generation_pedigree();
    let nuclear = NameWithin::new(&["dad", "mom", "son", "daughter"]);
    let subgraph = graph.filter_by_genomes(&[&nuclear]);

    assert_eq!(subgraph.n_genomes(), 4);
    // Edges into uncle, half_sib and from gpa/gma drop with their endpoints.
    assert_eq!(subgraph.n_relationships(), 4);

    let family = FamilyUnit::infer_single_family(&subgraph).unwrap();
    assert_eq!(family.father(), "dad");
    assert_eq!(family.mother(), "mom");
    assert_eq!(family.children(), &["daughter", "son"]);

    // The full graph has more than two parents, so the same call fails there.
    let err = FamilyUnit::infer_single_family(&graph).unwrap_err();
    assert!(matches!(err, PedigreeError::ParentSetSize { found: 5, .. }));
}

/// Test 6: founder queries and connectivity over the pedigree.
#[test]
fn test_founders_and_disconnected_groups() {
    let mut graph = three_generation_pedigree();

    // Founders are the genomes that are nobody's child.
    let founders = founder_filter();
    assert_eq!(graph.genomes_matching(&[&founders]), vec!["mom", "gpa", "gma", "ex"]);

    // dad bridges all three families into a single connected component.
    let everyone: Vec<&str> = graph.genome_names().collect();
    assert_eq!(graph.count_disconnected_groups(&everyone).unwrap(), 1);

    // A tumour/normal pair with no pedigree link forms its own component.
    graph.add_relationship(RelationshipType::OriginalDerived, "normal", "tumour");
    let all: Vec<&str> = graph.genome_names().collect();
    assert_eq!(graph.count_disconnected_groups(&all).unwrap(), 2);
    assert_eq!(graph.count_disconnected_groups(&["son", "tumour"]).unwrap(), 2);
    assert_eq!(graph.count_disconnected_groups(&["normal", "tumour"]).unwrap(), 1);
}
