//! Key, IV and block-size validation
//!
//! Pure checks against the constraints a transformation declares. Callers
//! turn a [`LengthError`] into a [`TransformError`](crate::TransformError)
//! carrying their own algorithm name.

use std::fmt;

use crate::transformation::KeyingInterface;

/// Why a key or IV length was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthError {
    /// Nothing was supplied
    Missing,
    /// The supplied length is not accepted
    InvalidLength(usize),
}

impl LengthError {
    /// Short machine-readable reason
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::InvalidLength(_) => "invalid_length",
        }
    }
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Check a key length against `transformation`
///
/// An empty key is always `Missing`, whatever the algorithm accepts.
pub fn validate_key_length<T>(transformation: &T, length: usize) -> Result<(), LengthError>
where
    T: KeyingInterface + ?Sized,
{
    if length == 0 {
        return Err(LengthError::Missing);
    }

    if !transformation.is_valid_key_length(length) {
        return Err(LengthError::InvalidLength(length));
    }

    Ok(())
}

/// Check an IV length against `transformation`
///
/// Any length is accepted when the transformation is not resynchronizable.
pub fn validate_iv_length<T>(transformation: &T, length: usize) -> Result<(), LengthError>
where
    T: KeyingInterface + ?Sized,
{
    if !transformation.is_resynchronizable() || transformation.iv_size() == length {
        return Ok(());
    }

    if length == 0 {
        Err(LengthError::Missing)
    } else {
        Err(LengthError::InvalidLength(length))
    }
}

/// Whether `length` is a multiple of `block_size` (0 is treated as 1)
pub const fn is_block_multiple(block_size: usize, length: usize) -> bool {
    block_size <= 1 || length % block_size == 0
}
