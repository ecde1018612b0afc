use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::error::{PedigreeError, Result};
use crate::family::FamilyUnit;

/// Whether no genome is a parent in more than one family of the set.
pub fn is_monogamous(families: &[FamilyUnit]) -> bool {
    non_monogamous_samples(families).is_empty()
}

/// Genomes that are a parent in more than one distinct family, sorted by
/// name. Families are distinct by their (father, mother) pair, so listing
/// the same family twice does not make its parents non-monogamous.
pub fn non_monogamous_samples(families: &[FamilyUnit]) -> Vec<String> {
    let mut families_of: IndexMap<&str, IndexSet<(&str, &str)>> = IndexMap::new();
    for family in families {
        let key = (family.father(), family.mother());
        families_of.entry(family.father()).or_default().insert(key);
        families_of.entry(family.mother()).or_default().insert(key);
    }

    let mut repeated: Vec<String> = families_of
        .iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(name, _)| (*name).to_string())
        .collect();
    repeated.sort();
    repeated
}

/// Order families so that each one appears after every family whose children
/// are among its own parents, and annotate each family with its parents'
/// distinct-mate counts and per-parent family ids.
///
/// A directed dependency runs from family A to family B when a child of A is
/// a parent in B. Kahn's algorithm over per-parent-pair dependency counters
/// produces the order; ties between simultaneously ready families resolve in
/// input order, so callers wanting run-to-run determinism should supply the
/// families in a stable order.
///
/// The annotations do not depend on the computed order: distinct-mate counts
/// and zero-based family ids are assigned from the input set in first-seen
/// order before the topological pass.
///
/// # Errors
/// Returns [`PedigreeError::Cycle`] naming the unresolved families if the
/// set contains a generational cycle (a family is its own
/// descendant-by-marriage). No partial order is returned.
pub fn order_families_and_set_mates(mut families: Vec<FamilyUnit>) -> Result<Vec<FamilyUnit>> {
    annotate_mates(&mut families);

    // Distinct (father, mother) keys in first-seen order. Dependency
    // counters live per key, so duplicate pairs in the input share one
    // counter and become ready together.
    let mut keys: IndexSet<(String, String)> = IndexSet::new();
    let mut key_of: Vec<usize> = Vec::with_capacity(families.len());
    let mut instances_by_key: Vec<Vec<usize>> = Vec::new();
    for (i, family) in families.iter().enumerate() {
        let (k, _) =
            keys.insert_full((family.father().to_string(), family.mother().to_string()));
        if k == instances_by_key.len() {
            instances_by_key.push(Vec::new());
        }
        instances_by_key[k].push(i);
        key_of.push(k);
    }

    // Keys in which a genome acts as a parent.
    let mut parent_keys: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (k, (father, mother)) in keys.iter().enumerate() {
        parent_keys.entry(father.as_str()).or_default().push(k);
        parent_keys.entry(mother.as_str()).or_default().push(k);
    }

    // Incoming dependency counts: one per (family, child) pair where the
    // child is a parent in the counted key.
    let mut pending: Vec<usize> = vec![0; keys.len()];
    for family in &families {
        for child in family.children() {
            if let Some(targets) = parent_keys.get(child.as_str()) {
                for &k in targets {
                    pending[k] += 1;
                }
            }
        }
    }

    // Kahn's algorithm: a VecDeque ready queue seeded in input order.
    let mut ready: VecDeque<usize> = VecDeque::new();
    for (i, &k) in key_of.iter().enumerate() {
        if pending[k] == 0 {
            ready.push_back(i);
        }
    }

    let mut ordered: Vec<FamilyUnit> = Vec::with_capacity(families.len());
    let mut emitted = vec![false; families.len()];

    while let Some(i) = ready.pop_front() {
        emitted[i] = true;
        ordered.push(families[i].clone());
        for child in families[i].children() {
            if let Some(targets) = parent_keys.get(child.as_str()) {
                for &k in targets {
                    pending[k] -= 1;
                    if pending[k] == 0 {
                        ready.extend(instances_by_key[k].iter().copied());
                    }
                }
            }
        }
    }

    if ordered.len() != families.len() {
        let unresolved: Vec<String> = families
            .iter()
            .enumerate()
            .filter(|(i, _)| !emitted[*i])
            .map(|(_, family)| family.to_string())
            .collect();
        return Err(PedigreeError::Cycle(unresolved));
    }

    Ok(ordered)
}

/// Write distinct-mate counts and zero-based per-parent family ids, assigned
/// from the input set in first-seen order.
fn annotate_mates(families: &mut [FamilyUnit]) {
    let mut families_of: IndexMap<String, IndexSet<(String, String)>> = IndexMap::new();
    for family in families.iter_mut() {
        let key = (family.father().to_string(), family.mother().to_string());

        let (father_id, _) = families_of
            .entry(family.father().to_string())
            .or_default()
            .insert_full(key.clone());
        family.set_father_family_id(father_id);

        let (mother_id, _) = families_of
            .entry(family.mother().to_string())
            .or_default()
            .insert_full(key);
        family.set_mother_family_id(mother_id);
    }

    // Second pass: the counts are only final once every family is seen.
    for family in families.iter_mut() {
        let father_mates = families_of[family.father()].len();
        family.set_father_distinct_mates(father_mates);
        let mother_mates = families_of[family.mother()].len();
        family.set_mother_distinct_mates(mother_mates);
    }
}
