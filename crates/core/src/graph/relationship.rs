use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PedigreeError;

/// Type of a pairwise relationship between two genomes.
///
/// The text tags `PARENT_CHILD`/`ORIGINAL_DERIVED` are externally meaningful
/// (relationship files and exports depend on them) and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// The first endpoint is the biological/assigned parent of the second.
    ParentChild,
    /// The second endpoint is derived from the first (e.g. tumour from normal).
    OriginalDerived,
}

impl RelationshipType {
    /// The stable text tag for this relationship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::ParentChild => "PARENT_CHILD",
            RelationshipType::OriginalDerived => "ORIGINAL_DERIVED",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = PedigreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("PARENT_CHILD") {
            Ok(RelationshipType::ParentChild)
        } else if s.eq_ignore_ascii_case("ORIGINAL_DERIVED") {
            Ok(RelationshipType::OriginalDerived)
        } else {
            Err(PedigreeError::Format {
                path: String::new(),
                line: 0,
                reason: format!("Unknown relationship type tag: '{}'", s),
            })
        }
    }
}

/// Which endpoint of a relationship a genome occupies.
///
/// For `PARENT_CHILD`, `First` is the parent and `Second` the child; for
/// `ORIGINAL_DERIVED`, `First` is the original sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    First,
    Second,
}

/// A typed edge between two genomes.
///
/// The `(first, second, kind)` triple identifies the edge: inserting the same
/// triple twice yields one logical edge. Each edge carries its own free-form
/// metadata map for informational annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    first: String,
    second: String,
    kind: RelationshipType,
    info: BTreeMap<String, String>,
}

impl Relationship {
    pub(crate) fn new(kind: RelationshipType, first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            kind,
            info: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> RelationshipType {
        self.kind
    }

    /// The first endpoint (the parent for `PARENT_CHILD`).
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The second endpoint (the child for `PARENT_CHILD`).
    pub fn second(&self) -> &str {
        &self.second
    }

    /// The endpoint occupying `role`.
    pub fn endpoint(&self, role: Role) -> &str {
        match role {
            Role::First => &self.first,
            Role::Second => &self.second,
        }
    }

    /// Whether `name` is one of the two endpoints.
    pub fn involves(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// The endpoint opposite `name`, or `None` if `name` is not an endpoint.
    ///
    /// A self-edge returns `name` itself.
    pub fn other_endpoint(&self, name: &str) -> Option<&str> {
        if self.first == name {
            Some(&self.second)
        } else if self.second == name {
            Some(&self.first)
        } else {
            None
        }
    }

    /// Free-form metadata value for `key`, if set.
    pub fn info(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(|v| v.as_str())
    }

    pub fn set_info(&mut self, key: &str, value: &str) {
        self.info.insert(key.to_string(), value.to_string());
    }
}
