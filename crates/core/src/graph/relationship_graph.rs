use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::{PedigreeError, Result};
use crate::graph::attributes::{GenomeAttributes, Sex};
use crate::graph::filters::{GenomeFilter, RelationshipFilter};
use crate::graph::relationship::{Relationship, RelationshipType};

/// In-memory graph of genomes, per-genome attributes, and typed pairwise
/// relationships.
///
/// Genomes are created on first reference, either by explicit declaration
/// through [`add_genome`](RelationshipGraph::add_genome) or by appearing as a
/// relationship endpoint, and live for the lifetime of the graph; the only
/// way to "remove" genomes or edges is to derive a filtered copy with
/// [`filter_by_genomes`](RelationshipGraph::filter_by_genomes) /
/// [`filter_by_relationships`](RelationshipGraph::filter_by_relationships).
///
/// Edges are stored once in an arena and indexed under both endpoints, so a
/// relationship is discoverable from either party while a structurally
/// identical `(first, second, type)` triple stays a single logical edge.
/// Genome iteration follows insertion order, which keeps query results
/// deterministic for a fixed build sequence.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    /// Genome name -> attributes, in insertion order.
    genomes: IndexMap<String, GenomeAttributes>,
    /// Edge arena; ids are indices into this vector.
    edges: Vec<Relationship>,
    /// `(first, second, type)` -> edge id, for duplicate collapsing.
    edge_index: HashMap<(String, String, RelationshipType), usize>,
    /// Genome name -> ids of all edges touching it (either endpoint).
    adjacency: HashMap<String, Vec<usize>>,
}

impl RelationshipGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of genomes in the graph.
    pub fn n_genomes(&self) -> usize {
        self.genomes.len()
    }

    /// Number of logical edges in the graph.
    pub fn n_relationships(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph holds no genomes.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Whether a genome with this name exists.
    pub fn contains_genome(&self, name: &str) -> bool {
        self.genomes.contains_key(name)
    }

    /// Genome names in insertion order.
    pub fn genome_names(&self) -> impl Iterator<Item = &str> {
        self.genomes.keys().map(String::as_str)
    }

    /// Attributes of a genome, or `None` if it does not exist.
    pub fn attributes(&self, name: &str) -> Option<&GenomeAttributes> {
        self.genomes.get(name)
    }

    /// Mutable attributes of a genome, or `None` if it does not exist.
    pub fn attributes_mut(&mut self, name: &str) -> Option<&mut GenomeAttributes> {
        self.genomes.get_mut(name)
    }

    /// Declare a genome, creating it if absent, and return its attribute bag.
    ///
    /// Creation does not mark the genome primary; callers that consider the
    /// declaration authoritative (e.g. a sample column in an input file) set
    /// that through the returned attributes. Redeclaration is idempotent.
    ///
    /// # Errors
    /// Returns [`PedigreeError::ConflictingAttribute`] if `sex` is concrete
    /// and contradicts an already-recorded concrete sex. `Either` never
    /// conflicts, and a concrete sex upgrades a recorded `Either`.
    pub fn add_genome(&mut self, name: &str, sex: Option<Sex>) -> Result<&mut GenomeAttributes> {
        let attrs = self.genomes.entry(name.to_string()).or_default();

        if let Some(declared) = sex {
            match Sex::reconcile(attrs.sex(), declared) {
                Some(merged) => attrs.set_sex(merged),
                None => {
                    return Err(PedigreeError::ConflictingAttribute {
                        genome: name.to_string(),
                        attribute: "sex".to_string(),
                        existing: attrs.sex().to_string(),
                        requested: declared.to_string(),
                    })
                }
            }
        }

        Ok(attrs)
    }

    /// Add a typed relationship, creating missing endpoint genomes.
    ///
    /// Inserting a triple that already exists collapses onto the existing
    /// edge. The returned reference lets the caller attach informational
    /// metadata to the (single) logical edge.
    pub fn add_relationship(
        &mut self,
        kind: RelationshipType,
        first: &str,
        second: &str,
    ) -> &mut Relationship {
        let id = self.insert_edge(Relationship::new(kind, first, second));
        &mut self.edges[id]
    }

    /// Insert a pre-built edge, collapsing duplicates. Returns the edge id.
    fn insert_edge(&mut self, rel: Relationship) -> usize {
        self.genomes.entry(rel.first().to_string()).or_default();
        self.genomes.entry(rel.second().to_string()).or_default();

        let key = (
            rel.first().to_string(),
            rel.second().to_string(),
            rel.kind(),
        );
        if let Some(&id) = self.edge_index.get(&key) {
            return id;
        }

        let id = self.edges.len();
        self.adjacency
            .entry(rel.first().to_string())
            .or_default()
            .push(id);
        if rel.second() != rel.first() {
            self.adjacency
                .entry(rel.second().to_string())
                .or_default()
                .push(id);
        }
        self.edge_index.insert(key, id);
        self.edges.push(rel);
        id
    }

    /// All edges touching `name`, in insertion order. Empty for unknown names.
    pub(crate) fn edges_of(&self, name: &str) -> impl Iterator<Item = &Relationship> {
        self.adjacency
            .get(name)
            .into_iter()
            .flatten()
            .map(|&id| &self.edges[id])
    }

    /// Edges touching `genome` that satisfy every supplied filter.
    ///
    /// # Errors
    /// Returns [`PedigreeError::UnknownGenome`] if `genome` is not in the
    /// graph (querying an absent genome is a malformed query, not an empty
    /// result).
    pub fn relationships_of(
        &self,
        genome: &str,
        rel_filters: &[&dyn RelationshipFilter],
    ) -> Result<Vec<&Relationship>> {
        if !self.contains_genome(genome) {
            return Err(PedigreeError::UnknownGenome(genome.to_string()));
        }
        Ok(self
            .edges_of(genome)
            .filter(|rel| rel_filters.iter().all(|f| f.accept(rel)))
            .collect())
    }

    /// All edges in the graph that satisfy every supplied filter.
    ///
    /// Each logical edge appears once even though it is indexed under both
    /// endpoints.
    pub fn relationships_matching(
        &self,
        rel_filters: &[&dyn RelationshipFilter],
    ) -> Vec<&Relationship> {
        self.edges
            .iter()
            .filter(|rel| rel_filters.iter().all(|f| f.accept(rel)))
            .collect()
    }

    /// Genome names accepted by every supplied filter, in insertion order.
    pub fn genomes_matching(&self, genome_filters: &[&dyn GenomeFilter]) -> Vec<&str> {
        self.genomes
            .keys()
            .filter(|name| genome_filters.iter().all(|f| f.accept(self, name)))
            .map(String::as_str)
            .collect()
    }

    /// Derive a new graph with the same genomes and attributes but only the
    /// edges accepted by every filter.
    pub fn filter_by_relationships(
        &self,
        rel_filters: &[&dyn RelationshipFilter],
    ) -> RelationshipGraph {
        let mut out = RelationshipGraph::new();
        for (name, attrs) in &self.genomes {
            out.genomes.insert(name.clone(), attrs.clone());
        }
        for rel in &self.edges {
            if rel_filters.iter().all(|f| f.accept(rel)) {
                out.insert_edge(rel.clone());
            }
        }
        out
    }

    /// Derive a new graph containing only the genomes accepted by every
    /// filter, and only the edges whose endpoints both survive.
    pub fn filter_by_genomes(&self, genome_filters: &[&dyn GenomeFilter]) -> RelationshipGraph {
        let mut out = RelationshipGraph::new();
        for (name, attrs) in &self.genomes {
            if genome_filters.iter().all(|f| f.accept(self, name)) {
                out.genomes.insert(name.clone(), attrs.clone());
            }
        }
        for rel in &self.edges {
            if out.contains_genome(rel.first()) && out.contains_genome(rel.second()) {
                out.insert_edge(rel.clone());
            }
        }
        out
    }

    /// Whether two genomes are related: the same genome, or joined by any
    /// edge of any type.
    fn related(&self, a: &str, b: &str) -> bool {
        a == b || self.edges_of(a).any(|rel| rel.involves(b))
    }

    /// Number of connected components among the supplied genomes, where
    /// "connected" means joined (possibly transitively within the subset) by
    /// edges of any type.
    ///
    /// The implementation is a single O(n^2) pairwise pass sized for
    /// pedigree-scale inputs: each genome starts in its own group, and
    /// whenever a pair turns out to be related the larger group id is
    /// rewritten to the smaller one across the whole assignment (backward
    /// repair).
    ///
    /// # Errors
    /// Returns [`PedigreeError::UnknownGenome`] if any supplied name is not
    /// in the graph.
    pub fn count_disconnected_groups(&self, genomes: &[&str]) -> Result<usize> {
        for &name in genomes {
            if !self.contains_genome(name) {
                return Err(PedigreeError::UnknownGenome(name.to_string()));
            }
        }

        let n = genomes.len();
        let mut group: Vec<usize> = (0..n).collect();

        for i in 0..n {
            for j in 0..i {
                if !self.related(genomes[i], genomes[j]) {
                    continue;
                }
                let (keep, repair) = if group[i] <= group[j] {
                    (group[i], group[j])
                } else {
                    (group[j], group[i])
                };
                if keep != repair {
                    // Backward repair: everything already filed under the
                    // larger id moves to the smaller one.
                    for g in group.iter_mut() {
                        if *g == repair {
                            *g = keep;
                        }
                    }
                }
            }
        }

        let distinct: HashSet<usize> = group.into_iter().collect();
        Ok(distinct.len())
    }
}
