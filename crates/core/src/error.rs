use thiserror::Error;

#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("Conflicting value for attribute '{attribute}' of genome '{genome}': '{existing}' vs '{requested}'")]
    ConflictingAttribute {
        genome: String,
        attribute: String,
        existing: String,
        requested: String,
    },

    #[error("Genome '{0}' is not present in the graph")]
    UnknownGenome(String),

    #[error("Father and mother are the same genome: '{0}'")]
    SameParent(String),

    #[error("Genome '{0}' is listed both as a parent and as a child of the family")]
    ParentAsChild(String),

    #[error("Child '{0}' is listed more than once")]
    DuplicateChild(String),

    #[error("Child '{child}' has {found} recorded parent(s); expected exactly 2")]
    WrongParentCount { child: String, found: usize },

    #[error("Child '{child}' has parent '{parent}' outside the family's father/mother pair")]
    ForeignParent { child: String, parent: String },

    #[error("Child '{child}' names '{parent}' as both of its parents")]
    SameParentTwice { child: String, parent: String },

    #[error("Found {found} distinct parent(s) ({parents:?}); a nuclear family requires exactly 2")]
    ParentSetSize { found: usize, parents: Vec<String> },

    #[error("Cannot resolve father and mother: '{first}' and '{second}' are both recorded as {sex}")]
    UnresolvedParentSex {
        first: String,
        second: String,
        sex: String,
    },

    #[error("Pedigree contains a generational cycle; unresolved families: {0:?}")]
    Cycle(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}:{line}: {reason}")]
    Format {
        path: String,
        line: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, PedigreeError>;
