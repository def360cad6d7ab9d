//! Keyed message authentication codes

use std::fmt;

use tracing::debug;

use crate::error::TransformError;
use crate::native::{MacAlgorithm, MacState};
use crate::transformation::HashTransformation;
use crate::validator::validate_key_length;

/// A MAC that must be keyed before use
///
/// Implements [`HashTransformation`], so it can be driven by a
/// [`HashTransformationFilter`](crate::filter::HashTransformationFilter);
/// an unkeyed MAC is rejected by the filter before any data is fed.
pub struct Mac {
    algorithm: MacAlgorithm,
    key: Vec<u8>,
    state: Option<MacState>,
}

impl Mac {
    /// Unkeyed MAC
    pub const fn new(algorithm: MacAlgorithm) -> Self {
        Self {
            algorithm,
            key: Vec::new(),
            state: None,
        }
    }

    /// The MAC algorithm
    pub const fn algorithm(&self) -> MacAlgorithm {
        self.algorithm
    }

    /// Stored key, empty when unset
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Whether `length` is an acceptable key length
    pub fn is_valid_key_length(&self, length: usize) -> bool {
        validate_key_length(&self.algorithm, length).is_ok()
    }

    /// Validate and apply a key
    ///
    /// An invalid key leaves the previous key and state untouched.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError> {
        validate_key_length(&self.algorithm, key.len())
            .map_err(|error| TransformError::key(self.algorithm.name(), error))?;

        self.state = Some(MacState::new(self.algorithm, key)?);
        self.key = key.to_vec();
        debug!("{}: key set ({} bytes)", self.algorithm, key.len());
        Ok(())
    }

    fn keyed_state(&mut self) -> Result<&mut MacState, TransformError> {
        self.ensure_ready()?;
        self.state.as_mut().ok_or_else(|| {
            TransformError::NotKeyed(self.algorithm.name().to_string())
        })
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mac")
            .field("algorithm", &self.algorithm)
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

impl HashTransformation for Mac {
    fn name(&self) -> String {
        self.algorithm.name().to_string()
    }

    fn digest_size(&self) -> usize {
        self.algorithm.digest_size()
    }

    fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.keyed_state()?.update(data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        Ok(self.keyed_state()?.finalize_reset())
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        if let Some(state) = self.state.as_mut() {
            state.reset();
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), TransformError> {
        validate_key_length(&self.algorithm, self.key.len())
            .map_err(|error| TransformError::key(self.algorithm.name(), error))
    }
}

refuse_serde!(Mac, "Mac");
