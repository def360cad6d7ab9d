//! Transformation interfaces shared by native primitives and host adapters
//!
//! These traits are the contract the filters and wrappers drive. Native
//! primitives implement them directly; host-defined objects reach them
//! through the adapters in [`crate::proxy`].

use std::fmt;

use crate::error::TransformError;

/// Direction of a cipher engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Encryption (forward transformation)
    Encryption,
    /// Decryption (reverse transformation)
    Decryption,
}

impl Direction {
    /// Whether this is the forward direction
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Encryption)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encryption => write!(f, "encryption"),
            Self::Decryption => write!(f, "decryption"),
        }
    }
}

/// Key and IV constraints of a transformation
pub trait KeyingInterface {
    /// Whether `length` bytes is an acceptable key length
    fn is_valid_key_length(&self, length: usize) -> bool;

    /// Whether the transformation needs an IV alongside its key
    fn is_resynchronizable(&self) -> bool {
        false
    }

    /// Required IV length in bytes (0 when not resynchronizable)
    fn iv_size(&self) -> usize {
        0
    }
}

/// A digest-producing transformation (hash, MAC, authenticated cipher tag)
pub trait HashTransformation {
    /// Algorithm name
    fn name(&self) -> String;

    /// Size of the produced digest in bytes
    fn digest_size(&self) -> usize;

    /// Internal block size in bytes, 0 when not meaningful
    fn block_size(&self) -> usize;

    /// Append data to the running digest
    fn update(&mut self, data: &[u8]) -> Result<(), TransformError>;

    /// Complete the digest and return it
    ///
    /// Implementations leave themselves ready for a new message.
    fn finalize(&mut self) -> Result<Vec<u8>, TransformError>;

    /// Discard any accumulated state
    fn restart(&mut self) -> Result<(), TransformError>;

    /// Precondition check run before a filter feeds data
    ///
    /// Keyed transformations report a missing or invalid key here.
    fn ensure_ready(&self) -> Result<(), TransformError> {
        Ok(())
    }

    /// One-shot digest of `data`
    fn calculate_digest(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.ensure_ready()?;
        self.update(data)?;
        self.finalize()
    }
}

/// A single-direction native cipher
pub trait CipherEngine: KeyingInterface {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Direction this engine processes
    fn direction(&self) -> Direction;

    /// Input lengths must be a multiple of this size
    fn mandatory_block_size(&self) -> usize;

    /// Apply a key (non-resynchronizable engines)
    fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError>;

    /// Apply a key and IV (resynchronizable engines)
    fn set_key_with_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), TransformError>;

    /// Transform `data` in place
    fn process_data(&mut self, data: &mut [u8]) -> Result<(), TransformError>;

    /// Change the number of rounds, for engines that support it
    fn set_rounds(&mut self, rounds: u32) -> Result<(), TransformError> {
        let _ = rounds;
        Err(TransformError::Unsupported {
            algorithm: self.name().to_string(),
            operation: "configurable rounds",
        })
    }
}

/// A cipher engine that also authenticates what it processes
pub trait AuthenticatedEngine: CipherEngine {
    /// Size of the authentication tag in bytes
    fn digest_size(&self) -> usize;

    /// Feed associated data into the tag
    fn update(&mut self, data: &[u8]) -> Result<(), TransformError>;

    /// Produce the tag and re-key with the current key and IV
    fn finalize(&mut self) -> Result<Vec<u8>, TransformError>;
}

/// A two-way symmetric transformation usable by a
/// [`SymmetricTransformationFilter`](crate::filter::SymmetricTransformationFilter)
pub trait SymmetricTransformation {
    /// Algorithm name
    fn name(&self) -> String;

    /// Mandatory block size in bytes
    fn block_size(&self) -> usize;

    /// Encrypt `data`
    fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError>;

    /// Decrypt `data`
    fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError>;

    /// Reset to the freshly keyed state
    fn restart(&mut self) -> Result<(), TransformError>;
}
