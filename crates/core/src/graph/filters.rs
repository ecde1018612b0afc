use indexmap::IndexSet;

use super::attributes::Sex;
use super::relationship::{Relationship, RelationshipType, Role};
use super::RelationshipGraph;

/// Edge-level filter capability.
///
/// Query methods take a slice of filters and apply them conjunctively: an
/// edge is accepted only if every filter accepts it.
pub trait RelationshipFilter {
    fn accept(&self, rel: &Relationship) -> bool;
}

/// Accepts edges of one relationship type.
#[derive(Debug, Clone)]
pub struct KindIs(pub RelationshipType);

impl RelationshipFilter for KindIs {
    fn accept(&self, rel: &Relationship) -> bool {
        rel.kind() == self.0
    }
}

/// Accepts edges where a given genome occupies a given endpoint role.
#[derive(Debug, Clone)]
pub struct InRole {
    genome: String,
    role: Role,
}

impl InRole {
    pub fn new(genome: &str, role: Role) -> Self {
        Self {
            genome: genome.to_string(),
            role,
        }
    }
}

impl RelationshipFilter for InRole {
    fn accept(&self, rel: &Relationship) -> bool {
        rel.endpoint(self.role) == self.genome
    }
}

/// Accepts edges whose endpoints are both drawn from a restriction set.
#[derive(Debug, Clone)]
pub struct EndpointsWithin {
    names: IndexSet<String>,
}

impl EndpointsWithin {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl RelationshipFilter for EndpointsWithin {
    fn accept(&self, rel: &Relationship) -> bool {
        self.names.contains(rel.first()) && self.names.contains(rel.second())
    }
}

/// Genome-level filter capability.
///
/// The graph is passed to `accept` so filters can consult attributes and
/// edges; composition is conjunctive, the same as for relationship filters.
pub trait GenomeFilter {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool;
}

/// Accepts genomes occupying `role` in at least `min_count` edges of `kind`.
#[derive(Debug, Clone)]
pub struct HasRelationship {
    kind: RelationshipType,
    role: Role,
    min_count: usize,
}

impl HasRelationship {
    pub fn new(kind: RelationshipType, role: Role, min_count: usize) -> Self {
        Self {
            kind,
            role,
            min_count,
        }
    }
}

impl GenomeFilter for HasRelationship {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        let count = graph
            .edges_of(name)
            .filter(|rel| rel.kind() == self.kind && rel.endpoint(self.role) == name)
            .count();
        count >= self.min_count
    }
}

/// Accepts genomes explicitly declared as primary samples.
#[derive(Debug, Clone)]
pub struct IsPrimary;

impl GenomeFilter for IsPrimary {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        graph.attributes(name).is_some_and(|a| a.is_primary())
    }
}

/// Accepts genomes marked diseased.
#[derive(Debug, Clone)]
pub struct IsDiseased;

impl GenomeFilter for IsDiseased {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        graph.attributes(name).is_some_and(|a| a.is_diseased())
    }
}

/// Accepts genomes whose name is in a restriction set.
#[derive(Debug, Clone)]
pub struct NameWithin {
    names: IndexSet<String>,
}

impl NameWithin {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl GenomeFilter for NameWithin {
    fn accept(&self, _graph: &RelationshipGraph, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Accepts genomes whose family grouping tag is in a restriction set.
///
/// Genomes without a family tag are rejected.
#[derive(Debug, Clone)]
pub struct FamilyIdWithin {
    family_ids: IndexSet<String>,
}

impl FamilyIdWithin {
    pub fn new(family_ids: &[&str]) -> Self {
        Self {
            family_ids: family_ids.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl GenomeFilter for FamilyIdWithin {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        graph
            .attributes(name)
            .and_then(|a| a.family_id())
            .is_some_and(|id| self.family_ids.contains(id))
    }
}

/// Accepts genomes with exactly the given recorded sex.
#[derive(Debug, Clone)]
pub struct SexIs(pub Sex);

impl GenomeFilter for SexIs {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        graph.attributes(name).is_some_and(|a| a.sex() == self.0)
    }
}

/// Logical OR over inner filters: accepts when any inner filter accepts.
///
/// An empty `AnyOf` accepts nothing.
pub struct AnyOf {
    inner: Vec<Box<dyn GenomeFilter>>,
}

impl AnyOf {
    pub fn new(inner: Vec<Box<dyn GenomeFilter>>) -> Self {
        Self { inner }
    }
}

impl GenomeFilter for AnyOf {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        self.inner.iter().any(|f| f.accept(graph, name))
    }
}

/// Logical NOT of an inner filter.
pub struct Not {
    inner: Box<dyn GenomeFilter>,
}

impl Not {
    pub fn new(inner: Box<dyn GenomeFilter>) -> Self {
        Self { inner }
    }
}

impl GenomeFilter for Not {
    fn accept(&self, graph: &RelationshipGraph, name: &str) -> bool {
        !self.inner.accept(graph, name)
    }
}

/// Filter accepting founders: genomes with no recorded parents.
pub fn founder_filter() -> Not {
    Not::new(Box::new(HasRelationship::new(
        RelationshipType::ParentChild,
        Role::Second,
        1,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-generation graph: dad/mom -> son, plus a tumour derived from son.
    fn sample_graph() -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();
        graph.add_genome("dad", Some(Sex::Male)).unwrap();
        graph.add_genome("mom", Some(Sex::Female)).unwrap();
        graph.add_relationship(RelationshipType::ParentChild, "dad", "son");
        graph.add_relationship(RelationshipType::ParentChild, "mom", "son");
        graph.add_relationship(RelationshipType::OriginalDerived, "son", "son_tumour");
        graph.attributes_mut("son").unwrap().set_diseased(true);
        graph.attributes_mut("dad").unwrap().set_primary(true);
        graph.attributes_mut("dad").unwrap().set_family_id("FAM01");
        graph
    }

    #[test]
    fn test_kind_and_role_filters() {
        let graph = sample_graph();
        let pc = KindIs(RelationshipType::ParentChild);
        let as_parent = InRole::new("dad", Role::First);

        let rels = graph.relationships_of("dad", &[&pc, &as_parent]).unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].second(), "son");

        let as_child = InRole::new("dad", Role::Second);
        let rels = graph.relationships_of("dad", &[&pc, &as_child]).unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_endpoints_within() {
        let graph = sample_graph();
        let restrict = EndpointsWithin::new(&["dad", "mom", "son"]);
        let rels = graph.relationships_matching(&[&restrict]);
        assert_eq!(rels.len(), 2); // the derived edge has an endpoint outside
    }

    #[test]
    fn test_has_relationship_counts() {
        let graph = sample_graph();
        let one_child = HasRelationship::new(RelationshipType::ParentChild, Role::First, 1);
        let two_children = HasRelationship::new(RelationshipType::ParentChild, Role::First, 2);
        assert!(one_child.accept(&graph, "dad"));
        assert!(!two_children.accept(&graph, "dad"));
        assert!(!one_child.accept(&graph, "son"));
    }

    #[test]
    fn test_attribute_filters() {
        let graph = sample_graph();
        assert!(IsPrimary.accept(&graph, "dad"));
        assert!(!IsPrimary.accept(&graph, "son"));
        assert!(IsDiseased.accept(&graph, "son"));
        assert!(!IsDiseased.accept(&graph, "mom"));
        assert!(SexIs(Sex::Female).accept(&graph, "mom"));
        assert!(SexIs(Sex::Either).accept(&graph, "son"));
        assert!(FamilyIdWithin::new(&["FAM01"]).accept(&graph, "dad"));
        assert!(!FamilyIdWithin::new(&["FAM01"]).accept(&graph, "mom"));
    }

    #[test]
    fn test_any_of_and_not() {
        let graph = sample_graph();
        let male_or_diseased = AnyOf::new(vec![
            Box::new(SexIs(Sex::Male)),
            Box::new(IsDiseased),
        ]);
        assert!(male_or_diseased.accept(&graph, "dad"));
        assert!(male_or_diseased.accept(&graph, "son"));
        assert!(!male_or_diseased.accept(&graph, "mom"));

        let not_male = Not::new(Box::new(SexIs(Sex::Male)));
        assert!(!not_male.accept(&graph, "dad"));
        assert!(not_male.accept(&graph, "mom"));
    }

    #[test]
    fn test_founder_filter() {
        let graph = sample_graph();
        let founders = graph.genomes_matching(&[&founder_filter()]);
        // son has parents; son_tumour's edge is ORIGINAL_DERIVED, so it still
        // counts as a founder in the parent-child sense.
        assert_eq!(founders, vec!["dad", "mom", "son_tumour"]);
    }

    #[test]
    fn test_empty_any_of_accepts_nothing() {
        let graph = sample_graph();
        let none = AnyOf::new(Vec::new());
        assert!(!none.accept(&graph, "dad"));
    }
}
