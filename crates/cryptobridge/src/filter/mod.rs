//! Filters driving transformations through complete message cycles

mod hash;
mod symmetric;

pub use hash::{FilterState, HashTransformationFilter};
pub use symmetric::{PaddingScheme, SymmetricTransformationFilter};
