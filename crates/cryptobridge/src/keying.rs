//! Key and IV lifecycle shared by the cipher wrappers
//!
//! A wrapper owns two engines of the same algorithm, one per direction.
//! Key and IV are stored once and always applied to both engines together,
//! so the pair can only be observed fully keyed with the same material or
//! not keyed at all.
//!
//! Whenever key or IV changes the pair is re-derived:
//!
//! - not resynchronizable, non-empty key: key only, on both engines
//! - resynchronizable, non-empty key and IV: key and IV, on both engines
//! - otherwise the engines are left as they are; every operation validates
//!   the stored key and IV first and fails before reaching them

use std::fmt;

use tracing::{debug, trace};

use crate::error::TransformError;
use crate::transformation::CipherEngine;
use crate::validator::{is_block_multiple, validate_iv_length, validate_key_length};

/// Forward and reverse engines sharing one key and IV
pub struct KeyedPair<E: ?Sized + CipherEngine> {
    name: String,
    key: Vec<u8>,
    iv: Vec<u8>,
    encryptor: Box<E>,
    decryptor: Box<E>,
}

impl<E: ?Sized + CipherEngine> KeyedPair<E> {
    /// Pair `encryptor` with `decryptor`
    ///
    /// Both engines must implement the same algorithm in opposite
    /// directions.
    pub fn new(encryptor: Box<E>, decryptor: Box<E>) -> Result<Self, TransformError> {
        let name = encryptor.name().to_string();

        if !encryptor.direction().is_forward() || decryptor.direction().is_forward() {
            return Err(TransformError::construction(
                &name,
                "engines must be paired as (encryption, decryption)",
            ));
        }
        if decryptor.name() != name {
            return Err(TransformError::construction(
                &name,
                format!("cannot pair with a {} engine", decryptor.name()),
            ));
        }

        Ok(Self::from_engines(encryptor, decryptor))
    }

    /// Pair engines already known to match
    pub(crate) fn from_engines(encryptor: Box<E>, decryptor: Box<E>) -> Self {
        Self {
            name: encryptor.name().to_string(),
            key: Vec::new(),
            iv: Vec::new(),
            encryptor,
            decryptor,
        }
    }

    /// Algorithm name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored key, empty when unset
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Stored IV, empty when unset
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Mandatory block size of the engines
    pub fn block_size(&self) -> usize {
        self.encryptor.mandatory_block_size()
    }

    /// Whether the algorithm takes an IV
    pub fn is_resynchronizable(&self) -> bool {
        self.encryptor.is_resynchronizable()
    }

    /// Required IV length, 0 when no IV is taken
    pub fn iv_size(&self) -> usize {
        self.encryptor.iv_size()
    }

    /// Whether `length` would be accepted by [`set_key`](Self::set_key)
    pub fn is_valid_key_length(&self, length: usize) -> bool {
        validate_key_length(&*self.encryptor, length).is_ok()
    }

    /// Whether `length` would be accepted by [`set_iv`](Self::set_iv)
    pub fn is_valid_iv_length(&self, length: usize) -> bool {
        validate_iv_length(&*self.encryptor, length).is_ok()
    }

    pub(crate) fn encryptor(&self) -> &E {
        &self.encryptor
    }

    pub(crate) fn encryptor_mut(&mut self) -> &mut E {
        &mut self.encryptor
    }

    pub(crate) fn decryptor_mut(&mut self) -> &mut E {
        &mut self.decryptor
    }

    /// Validate and store a key, then re-key both engines
    ///
    /// An invalid key leaves the previous key in place.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError> {
        validate_key_length(&*self.encryptor, key.len())
            .map_err(|error| TransformError::key(&self.name, error))?;

        let previous = std::mem::replace(&mut self.key, key.to_vec());
        self.reapply_or_restore(|pair| pair.key = previous)?;
        debug!("{}: key set ({} bytes)", self.name, key.len());
        Ok(())
    }

    /// Validate and store an IV, then re-key both engines
    ///
    /// Silently accepted without effect when the algorithm takes no IV.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<(), TransformError> {
        if !self.is_resynchronizable() {
            trace!("{}: ignoring IV, algorithm is not resynchronizable", self.name);
            return Ok(());
        }

        validate_iv_length(&*self.encryptor, iv.len())
            .map_err(|error| TransformError::iv(&self.name, error))?;

        let previous = std::mem::replace(&mut self.iv, iv.to_vec());
        self.reapply_or_restore(|pair| pair.iv = previous)?;
        debug!("{}: iv set ({} bytes)", self.name, iv.len());
        Ok(())
    }

    /// Re-apply the stored key and IV, discarding engine state
    pub fn restart(&mut self) -> Result<(), TransformError> {
        self.apply()
    }

    /// Change the round count of both engines and re-key them
    pub fn set_rounds(&mut self, rounds: u32) -> Result<(), TransformError> {
        self.encryptor.set_rounds(rounds)?;
        self.decryptor.set_rounds(rounds)?;
        self.apply()
    }

    fn apply(&mut self) -> Result<(), TransformError> {
        let resynchronizable = self.is_resynchronizable();

        if !resynchronizable && !self.key.is_empty() {
            self.encryptor.set_key(&self.key)?;
            self.decryptor.set_key(&self.key)?;
        } else if resynchronizable && !self.key.is_empty() && !self.iv.is_empty() {
            self.encryptor.set_key_with_iv(&self.key, &self.iv)?;
            self.decryptor.set_key_with_iv(&self.key, &self.iv)?;
        }
        Ok(())
    }

    fn reapply_or_restore(
        &mut self,
        restore: impl FnOnce(&mut Self),
    ) -> Result<(), TransformError> {
        if let Err(error) = self.apply() {
            restore(self);
            // Old material was accepted before, so this only fails if the
            // engines changed underneath us
            if let Err(secondary) = self.apply() {
                debug!("{}: could not restore previous keying: {}", self.name, secondary);
            }
            return Err(error);
        }
        Ok(())
    }

    /// Fail unless a valid key is stored
    pub fn ensure_key(&self) -> Result<(), TransformError> {
        validate_key_length(&*self.encryptor, self.key.len())
            .map_err(|error| TransformError::key(&self.name, error))
    }

    /// Fail unless a valid IV is stored (always passes without IV)
    pub fn ensure_iv(&self) -> Result<(), TransformError> {
        validate_iv_length(&*self.encryptor, self.iv.len())
            .map_err(|error| TransformError::iv(&self.name, error))
    }

    /// Fail unless `length` is a whole number of blocks
    pub fn ensure_block_multiple(&self, length: usize) -> Result<(), TransformError> {
        let expected = self.block_size();
        if is_block_multiple(expected, length) {
            Ok(())
        } else {
            Err(TransformError::BlockSize {
                algorithm: self.name.clone(),
                actual: length,
                expected,
            })
        }
    }

    /// Encrypt `data` with the forward engine
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.check_input(data.len())?;
        let mut output = data.to_vec();
        self.encryptor.process_data(&mut output)?;
        trace!("{}: encrypted {} bytes", self.name, output.len());
        Ok(output)
    }

    /// Decrypt `data` with the reverse engine
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.check_input(data.len())?;
        let mut output = data.to_vec();
        self.decryptor.process_data(&mut output)?;
        trace!("{}: decrypted {} bytes", self.name, output.len());
        Ok(output)
    }

    fn check_input(&self, length: usize) -> Result<(), TransformError> {
        self.ensure_key()?;
        self.ensure_iv()?;
        self.ensure_block_multiple(length)
    }
}

impl<E: ?Sized + CipherEngine> fmt::Debug for KeyedPair<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedPair")
            .field("name", &self.name)
            .field("key_len", &self.key.len())
            .field("iv_len", &self.iv.len())
            .finish_non_exhaustive()
    }
}
