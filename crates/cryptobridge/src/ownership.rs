//! Ownership tag for transformations held by filters
//!
//! A filter either owns the transformation it drives (an adapter it built
//! around a host object) or borrows one the caller keeps using afterwards.
//! Dropping an `Owned` value releases the transformation; dropping a
//! `Borrowed` one leaves it to its owner.

use std::ops::{Deref, DerefMut};

/// Owned or borrowed transformation
#[derive(Debug)]
pub enum Ownership<'a, T: ?Sized> {
    /// Released together with the holder
    Owned(Box<T>),
    /// Lifetime managed by the caller
    Borrowed(&'a mut T),
}

impl<T: ?Sized> Ownership<'_, T> {
    /// Whether the holder releases the transformation
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl<T: ?Sized> Deref for Ownership<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Self::Owned(inner) => inner,
            Self::Borrowed(inner) => inner,
        }
    }
}

impl<T: ?Sized> DerefMut for Ownership<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self {
            Self::Owned(inner) => inner,
            Self::Borrowed(inner) => inner,
        }
    }
}
