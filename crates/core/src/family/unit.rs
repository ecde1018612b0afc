use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::error::{PedigreeError, Result};
use crate::graph::{GenomeFilter, KindIs, RelationshipGraph, RelationshipType, Sex};

/// Slot index of the father in a family's member layout.
pub const FATHER_SLOT: usize = 0;
/// Slot index of the mother.
pub const MOTHER_SLOT: usize = 1;
/// Slot index of the first child; the k-th child occupies
/// `FIRST_CHILD_SLOT + k`.
pub const FIRST_CHILD_SLOT: usize = 2;

/// Outcome of assigning father and mother roles to a parent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentResolution<'a> {
    /// At least one recorded sex fixed the assignment.
    Resolved { father: &'a str, mother: &'a str },
    /// Neither sex is recorded; the first-seen genome is taken as the father.
    /// This is a policy default, not a contract. Callers should warn.
    Defaulted { father: &'a str, mother: &'a str },
    /// Both genomes carry the same concrete sex.
    Ambiguous { sex: Sex },
}

/// Assign father/mother roles to two parents from their recorded sexes.
///
/// A concrete sex always beats `Either`: a known male is the father, a known
/// female is the mother, and the remaining genome takes the other role. When
/// neither sex is known the first-seen genome defaults to father; when both
/// carry the same concrete sex no assignment is possible.
pub fn resolve_father_mother<'a>(
    first: (&'a str, Sex),
    second: (&'a str, Sex),
) -> ParentResolution<'a> {
    match (first.1, second.1) {
        (Sex::Male, Sex::Female) | (Sex::Male, Sex::Either) | (Sex::Either, Sex::Female) => {
            ParentResolution::Resolved {
                father: first.0,
                mother: second.0,
            }
        }
        (Sex::Female, Sex::Male) | (Sex::Either, Sex::Male) | (Sex::Female, Sex::Either) => {
            ParentResolution::Resolved {
                father: second.0,
                mother: first.0,
            }
        }
        (Sex::Either, Sex::Either) => ParentResolution::Defaulted {
            father: first.0,
            mother: second.0,
        },
        (Sex::Male, Sex::Male) => ParentResolution::Ambiguous { sex: Sex::Male },
        (Sex::Female, Sex::Female) => ParentResolution::Ambiguous { sex: Sex::Female },
    }
}

/// Candidate children grouped under one parent pair, keeping the order the
/// parents were first encountered in.
struct PairGroup {
    first: String,
    second: String,
    children: Vec<String>,
}

/// A validated nuclear family: father, mother, and their shared children.
///
/// Members occupy fixed slots for the family's lifetime: the father at
/// [`FATHER_SLOT`], the mother at [`MOTHER_SLOT`], and the children from
/// [`FIRST_CHILD_SLOT`] on, sorted by name. Downstream per-sample output is
/// laid out in this column order.
///
/// Two families are equal when they have the same father and mother. The
/// children follow from the parent pair within one source graph, so they are
/// not compared; comparing units drawn from different graphs is not
/// meaningful.
#[derive(Debug, Clone)]
pub struct FamilyUnit {
    father: String,
    mother: String,
    /// Children sorted by name (the canonical child ordering).
    children: Vec<String>,
    /// Zero-based id of this family among the father's families, in
    /// first-seen order. Written by ordering; defaults to 0.
    father_family_id: usize,
    /// Zero-based id of this family among the mother's families.
    mother_family_id: usize,
    /// Number of distinct families the father appears in. Written by
    /// ordering; defaults to 1.
    father_distinct_mates: usize,
    /// Number of distinct families the mother appears in.
    mother_distinct_mates: usize,
}

impl FamilyUnit {
    fn assemble(father: &str, mother: &str, mut children: Vec<String>) -> Self {
        children.sort();
        FamilyUnit {
            father: father.to_string(),
            mother: mother.to_string(),
            children,
            father_family_id: 0,
            mother_family_id: 0,
            father_distinct_mates: 1,
            mother_distinct_mates: 1,
        }
    }

    /// Build a family from explicitly named members, validated against the
    /// graph's recorded parent edges.
    ///
    /// # Errors
    /// - [`PedigreeError::SameParent`] if father and mother are the same genome.
    /// - [`PedigreeError::ParentAsChild`] if a child is also named as a parent.
    /// - [`PedigreeError::DuplicateChild`] if a child is listed twice.
    /// - [`PedigreeError::UnknownGenome`] if any member is not in the graph.
    /// - [`PedigreeError::WrongParentCount`] if a child does not have exactly
    ///   two recorded parents.
    /// - [`PedigreeError::SameParentTwice`] if a child's two parent edges name
    ///   the same genome.
    /// - [`PedigreeError::ForeignParent`] if a child has a recorded parent
    ///   outside the father/mother pair.
    pub fn from_members(
        graph: &RelationshipGraph,
        father: &str,
        mother: &str,
        children: &[&str],
    ) -> Result<FamilyUnit> {
        if father == mother {
            return Err(PedigreeError::SameParent(father.to_string()));
        }
        for &child in children {
            if child == father || child == mother {
                return Err(PedigreeError::ParentAsChild(child.to_string()));
            }
        }
        let mut seen: IndexSet<&str> = IndexSet::new();
        for &child in children {
            if !seen.insert(child) {
                return Err(PedigreeError::DuplicateChild(child.to_string()));
            }
        }
        for name in [father, mother].into_iter().chain(children.iter().copied()) {
            if !graph.contains_genome(name) {
                return Err(PedigreeError::UnknownGenome(name.to_string()));
            }
        }

        for &child in children {
            let recorded = recorded_parents(graph, child);
            if recorded.len() != 2 {
                return Err(PedigreeError::WrongParentCount {
                    child: child.to_string(),
                    found: recorded.len(),
                });
            }
            if recorded[0] == recorded[1] {
                return Err(PedigreeError::SameParentTwice {
                    child: child.to_string(),
                    parent: recorded[0].to_string(),
                });
            }
            for &parent in &recorded {
                if parent != father && parent != mother {
                    return Err(PedigreeError::ForeignParent {
                        child: child.to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        Ok(Self::assemble(
            father,
            mother,
            children.iter().map(|c| c.to_string()).collect(),
        ))
    }

    /// Infer the single nuclear family a graph describes.
    ///
    /// Scans all parent-child edges, requires exactly two distinct genomes
    /// acting as a parent, resolves which is father and which is mother from
    /// their recorded sexes, and validates that every recorded child is a
    /// child of exactly those two. When neither parent's sex is recorded a
    /// warning is logged and the first-seen parent is taken as the father.
    ///
    /// # Errors
    /// - [`PedigreeError::ParentSetSize`] if the graph does not contain
    ///   exactly two distinct parents.
    /// - [`PedigreeError::UnresolvedParentSex`] if both parents carry the
    ///   same concrete sex.
    /// - Any error of [`FamilyUnit::from_members`] for the gathered members.
    pub fn infer_single_family(graph: &RelationshipGraph) -> Result<FamilyUnit> {
        let parent_child = KindIs(RelationshipType::ParentChild);
        let mut parents: IndexSet<&str> = IndexSet::new();
        let mut children: IndexSet<&str> = IndexSet::new();
        for rel in graph.relationships_matching(&[&parent_child]) {
            parents.insert(rel.first());
            children.insert(rel.second());
        }

        if parents.len() != 2 {
            return Err(PedigreeError::ParentSetSize {
                found: parents.len(),
                parents: parents.iter().map(|p| p.to_string()).collect(),
            });
        }
        let (a, b) = (parents[0], parents[1]);

        let (father, mother) = match resolve_father_mother((a, sex_of(graph, a)), (b, sex_of(graph, b)))
        {
            ParentResolution::Resolved { father, mother } => (father, mother),
            ParentResolution::Defaulted { father, mother } => {
                log::warn!(
                    "Sex of parents '{}' and '{}' is unrecorded; assuming '{}' is the father",
                    father,
                    mother,
                    father
                );
                (father, mother)
            }
            ParentResolution::Ambiguous { sex } => {
                return Err(PedigreeError::UnresolvedParentSex {
                    first: a.to_string(),
                    second: b.to_string(),
                    sex: sex.to_string(),
                })
            }
        };

        let children: Vec<&str> = children.into_iter().collect();
        Self::from_members(graph, father, mother, &children)
    }

    /// Infer every nuclear family recorded in the graph.
    ///
    /// Every genome with exactly two recorded parents (after restricting
    /// edges to endpoints accepted by `sample_filter`, when supplied) is a
    /// candidate child; candidates are grouped by their order-independent
    /// parent pair and each group becomes one family.
    ///
    /// Father/mother are resolved per group from recorded sexes. A group
    /// whose parents carry the same concrete sex is skipped with a warning.
    /// In lenient mode an unrecorded parent sex falls back to the first-seen
    /// parent as father (logged); in strict mode (`lenient == false`) a group
    /// is dropped unless the father is recorded male, the mother female, and
    /// every child's sex is known. Dropped groups are not errors.
    ///
    /// Families are returned in first-seen parent-pair order with children
    /// sorted by name, so the result is deterministic for a fixed graph
    /// build sequence.
    pub fn infer_all_families(
        graph: &RelationshipGraph,
        lenient: bool,
        sample_filter: Option<&dyn GenomeFilter>,
    ) -> Vec<FamilyUnit> {
        let accepted = |name: &str| sample_filter.map_or(true, |f| f.accept(graph, name));

        let mut groups: IndexMap<(String, String), PairGroup> = IndexMap::new();
        for genome in graph.genome_names() {
            if !accepted(genome) {
                continue;
            }
            let parents: Vec<&str> = graph
                .edges_of(genome)
                .filter(|rel| rel.kind() == RelationshipType::ParentChild && rel.second() == genome)
                .map(|rel| rel.first())
                .filter(|parent| accepted(parent))
                .collect();
            if parents.len() != 2 {
                continue;
            }
            let (a, b) = (parents[0], parents[1]);
            let key = if a <= b {
                (a.to_string(), b.to_string())
            } else {
                (b.to_string(), a.to_string())
            };
            groups
                .entry(key)
                .or_insert_with(|| PairGroup {
                    first: a.to_string(),
                    second: b.to_string(),
                    children: Vec::new(),
                })
                .children
                .push(genome.to_string());
        }

        let mut families = Vec::new();
        for group in groups.into_values() {
            let resolution = resolve_father_mother(
                (group.first.as_str(), sex_of(graph, &group.first)),
                (group.second.as_str(), sex_of(graph, &group.second)),
            );
            let (father, mother) = match resolution {
                ParentResolution::Resolved { father, mother } => (father, mother),
                ParentResolution::Defaulted { father, mother } => {
                    if !lenient {
                        log::debug!(
                            "Dropping family of '{}' and '{}': neither parent's sex is recorded",
                            father,
                            mother
                        );
                        continue;
                    }
                    log::warn!(
                        "Sex of parents '{}' and '{}' is unrecorded; assuming '{}' is the father",
                        father,
                        mother,
                        father
                    );
                    (father, mother)
                }
                ParentResolution::Ambiguous { sex } => {
                    log::warn!(
                        "Skipping family of '{}' and '{}': both parents are recorded as {}",
                        group.first,
                        group.second,
                        sex
                    );
                    continue;
                }
            };

            if let Some(child) = group.children.iter().find(|c| {
                let c = c.as_str();
                c == father || c == mother
            }) {
                log::warn!(
                    "Skipping family of '{}' and '{}': genome '{}' is both parent and child",
                    father,
                    mother,
                    child
                );
                continue;
            }

            if !lenient {
                if sex_of(graph, father) != Sex::Male || sex_of(graph, mother) != Sex::Female {
                    log::debug!(
                        "Dropping family of '{}' and '{}': parent sexes are not fully resolved",
                        father,
                        mother
                    );
                    continue;
                }
                if let Some(child) = group
                    .children
                    .iter()
                    .find(|c| !sex_of(graph, c.as_str()).is_known())
                {
                    log::debug!(
                        "Dropping family of '{}' and '{}': sex of child '{}' is unrecorded",
                        father,
                        mother,
                        child
                    );
                    continue;
                }
            }

            families.push(Self::assemble(father, mother, group.children));
        }
        families
    }

    /// The father's genome name.
    pub fn father(&self) -> &str {
        &self.father
    }

    /// The mother's genome name.
    pub fn mother(&self) -> &str {
        &self.mother
    }

    /// The children, sorted by name.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Number of children.
    pub fn n_children(&self) -> usize {
        self.children.len()
    }

    /// Total number of members (parents plus children).
    pub fn n_members(&self) -> usize {
        2 + self.children.len()
    }

    /// All members in slot order: father, mother, then children by name.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.father.as_str())
            .chain(std::iter::once(self.mother.as_str()))
            .chain(self.children.iter().map(String::as_str))
    }

    /// The fixed slot of a member, or `None` if the genome is not in this
    /// family. Downstream per-sample arrays are laid out in slot order.
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        if name == self.father {
            return Some(FATHER_SLOT);
        }
        if name == self.mother {
            return Some(MOTHER_SLOT);
        }
        self.children
            .iter()
            .position(|child| child == name)
            .map(|k| FIRST_CHILD_SLOT + k)
    }

    /// The member occupying `slot`, or `None` if the slot is out of range.
    pub fn member_at(&self, slot: usize) -> Option<&str> {
        match slot {
            FATHER_SLOT => Some(&self.father),
            MOTHER_SLOT => Some(&self.mother),
            _ => self.children.get(slot - FIRST_CHILD_SLOT).map(String::as_str),
        }
    }

    /// Whether exactly one of the two parents is marked diseased.
    pub fn is_one_parent_diseased(&self, graph: &RelationshipGraph) -> bool {
        let diseased = |name: &str| {
            graph
                .attributes(name)
                .map_or(false, |attrs| attrs.is_diseased())
        };
        diseased(&self.father) != diseased(&self.mother)
    }

    /// Zero-based id of this family among the father's families.
    pub fn father_family_id(&self) -> usize {
        self.father_family_id
    }

    /// Zero-based id of this family among the mother's families.
    pub fn mother_family_id(&self) -> usize {
        self.mother_family_id
    }

    /// Number of distinct families the father appears in.
    pub fn father_distinct_mates(&self) -> usize {
        self.father_distinct_mates
    }

    /// Number of distinct families the mother appears in.
    pub fn mother_distinct_mates(&self) -> usize {
        self.mother_distinct_mates
    }

    pub(crate) fn set_father_family_id(&mut self, id: usize) {
        self.father_family_id = id;
    }

    pub(crate) fn set_mother_family_id(&mut self, id: usize) {
        self.mother_family_id = id;
    }

    pub(crate) fn set_father_distinct_mates(&mut self, count: usize) {
        self.father_distinct_mates = count;
    }

    pub(crate) fn set_mother_distinct_mates(&mut self, count: usize) {
        self.mother_distinct_mates = count;
    }
}

impl PartialEq for FamilyUnit {
    fn eq(&self, other: &Self) -> bool {
        self.father == other.father && self.mother == other.mother
    }
}

impl Eq for FamilyUnit {}

impl fmt::Display for FamilyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "father '{}' x mother '{}' ({} children)",
            self.father,
            self.mother,
            self.children.len()
        )
    }
}

/// Genomes recorded as parents of `child`, in edge insertion order.
fn recorded_parents<'a>(graph: &'a RelationshipGraph, child: &str) -> Vec<&'a str> {
    graph
        .edges_of(child)
        .filter(|rel| rel.kind() == RelationshipType::ParentChild && rel.second() == child)
        .map(|rel| rel.first())
        .collect()
}

fn sex_of(graph: &RelationshipGraph, name: &str) -> Sex {
    graph
        .attributes(name)
        .map_or(Sex::Either, |attrs| attrs.sex())
}
