mod ordering;
mod unit;

pub use ordering::{is_monogamous, non_monogamous_samples, order_families_and_set_mates};
pub use unit::{
    resolve_father_mother, FamilyUnit, ParentResolution, FATHER_SLOT, FIRST_CHILD_SLOT,
    MOTHER_SLOT,
};
