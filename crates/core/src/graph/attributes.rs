use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PedigreeError;

/// Recorded sex of a genome.
///
/// `Either` means the sex is unknown or unconstrained; it is the default for
/// genomes created implicitly as relationship endpoints. The text tags
/// `MALE`/`FEMALE`/`EITHER` are stable: downstream files and exports carry
/// them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Either,
}

impl Sex {
    /// The stable text tag for this sex.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Either => "EITHER",
        }
    }

    /// Whether this is a concrete (Male/Female) value rather than `Either`.
    pub fn is_known(&self) -> bool {
        !matches!(self, Sex::Either)
    }

    /// Reconcile an already-recorded sex with a newly declared one.
    ///
    /// `Either` is compatible with everything and never downgrades a concrete
    /// value; two different concrete values cannot be reconciled and yield
    /// `None`.
    pub fn reconcile(current: Sex, declared: Sex) -> Option<Sex> {
        match (current, declared) {
            (Sex::Either, s) => Some(s),
            (s, Sex::Either) => Some(s),
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = PedigreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("MALE") {
            Ok(Sex::Male)
        } else if s.eq_ignore_ascii_case("FEMALE") {
            Ok(Sex::Female)
        } else if s.eq_ignore_ascii_case("EITHER") {
            Ok(Sex::Either)
        } else {
            Err(PedigreeError::Format {
                path: String::new(),
                line: 0,
                reason: format!("Unknown sex tag: '{}'", s),
            })
        }
    }
}

/// Per-genome attributes.
///
/// The load-bearing attributes (sex, disease status, primary flag, family
/// grouping tag) are typed fields. `info` holds truly free-form metadata
/// only; nothing in the core consults it.
///
/// Sex conflict checking happens where the genome name is known, in
/// [`RelationshipGraph::add_genome`](crate::graph::RelationshipGraph::add_genome)
/// via [`Sex::reconcile`]. `set_sex` here is a plain overwrite for callers
/// that own the decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenomeAttributes {
    sex: Sex,
    diseased: bool,
    primary: bool,
    family_id: Option<String>,
    info: BTreeMap<String, String>,
}

impl GenomeAttributes {
    /// Attributes for a freshly created genome: sex `Either`, not diseased,
    /// not primary, no family tag.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn set_sex(&mut self, sex: Sex) {
        self.sex = sex;
    }

    pub fn is_diseased(&self) -> bool {
        self.diseased
    }

    pub fn set_diseased(&mut self, diseased: bool) {
        self.diseased = diseased;
    }

    /// Whether this genome was explicitly declared (e.g. appeared as a sample
    /// column) rather than created only as a relationship endpoint.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub fn family_id(&self) -> Option<&str> {
        self.family_id.as_deref()
    }

    pub fn set_family_id(&mut self, family_id: &str) {
        self.family_id = Some(family_id.to_string());
    }

    /// Free-form metadata value for `key`, if set.
    pub fn info(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(|v| v.as_str())
    }

    pub fn set_info(&mut self, key: &str, value: &str) {
        self.info.insert(key.to_string(), value.to_string());
    }
}
