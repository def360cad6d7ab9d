//! Adapters that let host objects stand in for native transformations
//!
//! An adapter holds only a weak reference to its host object. Whoever built
//! the adapter keeps the strong reference, so the host object outlives it.

mod hash;
mod symmetric;

pub use hash::HashProxy;
pub use symmetric::SymmetricTransformationProxy;
