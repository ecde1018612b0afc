mod attributes;
mod filters;
mod relationship;
mod relationship_graph;

pub use attributes::{GenomeAttributes, Sex};
pub use filters::{
    founder_filter, AnyOf, EndpointsWithin, FamilyIdWithin, GenomeFilter, HasRelationship,
    InRole, IsDiseased, IsPrimary, KindIs, NameWithin, Not, RelationshipFilter, SexIs,
};
pub use relationship::{Relationship, RelationshipType, Role};
pub use relationship_graph::RelationshipGraph;
