//! AES block cipher engines and the AES building blocks used by EAX

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};
use ctr::Ctr128BE;
use tracing::trace;

use crate::error::TransformError;
use crate::transformation::{CipherEngine, Direction, KeyingInterface};

/// Accepted AES key lengths in bytes
pub const AES_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// AES block length in bytes
pub(crate) const AES_BLOCK_SIZE: usize = 16;

/// Expanded AES key schedule for one of the three key sizes
pub(crate) enum AesKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKey {
    pub(crate) fn new(key: &[u8]) -> Result<Self, TransformError> {
        Ok(match key.len() {
            16 => Self::Aes128(<Aes128 as KeyInit>::new_from_slice(key)?),
            24 => Self::Aes192(<Aes192 as KeyInit>::new_from_slice(key)?),
            32 => Self::Aes256(<Aes256 as KeyInit>::new_from_slice(key)?),
            _ => return Err(cipher::InvalidLength.into()),
        })
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Self::Aes128(cipher) => cipher.encrypt_block(block),
            Self::Aes192(cipher) => cipher.encrypt_block(block),
            Self::Aes256(cipher) => cipher.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Self::Aes128(cipher) => cipher.decrypt_block(block),
            Self::Aes192(cipher) => cipher.decrypt_block(block),
            Self::Aes256(cipher) => cipher.decrypt_block(block),
        }
    }
}

/// AES in counter mode with a 128-bit big-endian counter
pub(crate) enum AesCtr {
    Aes128(Ctr128BE<Aes128>),
    Aes192(Ctr128BE<Aes192>),
    Aes256(Ctr128BE<Aes256>),
}

impl AesCtr {
    pub(crate) fn new(key: &[u8], iv: &[u8]) -> Result<Self, TransformError> {
        Ok(match key.len() {
            16 => Self::Aes128(<Ctr128BE<Aes128> as KeyIvInit>::new_from_slices(key, iv)?),
            24 => Self::Aes192(<Ctr128BE<Aes192> as KeyIvInit>::new_from_slices(key, iv)?),
            32 => Self::Aes256(<Ctr128BE<Aes256> as KeyIvInit>::new_from_slices(key, iv)?),
            _ => return Err(cipher::InvalidLength.into()),
        })
    }

    pub(crate) fn apply_keystream(&mut self, data: &mut [u8]) {
        match self {
            Self::Aes128(ctr) => ctr.apply_keystream(data),
            Self::Aes192(ctr) => ctr.apply_keystream(data),
            Self::Aes256(ctr) => ctr.apply_keystream(data),
        }
    }
}

/// AES in electronic codebook mode, one direction
///
/// Input must be a whole number of 16-byte blocks; the wrappers check this
/// before any data reaches the engine.
pub struct AesEngine {
    direction: Direction,
    schedule: Option<AesKey>,
}

impl AesEngine {
    /// Unkeyed engine for `direction`
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            schedule: None,
        }
    }
}

impl std::fmt::Debug for AesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesEngine")
            .field("direction", &self.direction)
            .field("keyed", &self.schedule.is_some())
            .finish()
    }
}

impl KeyingInterface for AesEngine {
    fn is_valid_key_length(&self, length: usize) -> bool {
        AES_KEY_LENGTHS.contains(&length)
    }
}

impl CipherEngine for AesEngine {
    fn name(&self) -> &str {
        "aes"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn mandatory_block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError> {
        self.schedule = Some(AesKey::new(key)?);
        trace!("aes {} engine keyed with {} bytes", self.direction, key.len());
        Ok(())
    }

    fn set_key_with_iv(&mut self, key: &[u8], _iv: &[u8]) -> Result<(), TransformError> {
        self.set_key(key)
    }

    fn process_data(&mut self, data: &mut [u8]) -> Result<(), TransformError> {
        let schedule = self
            .schedule
            .as_ref()
            .ok_or_else(|| TransformError::NotKeyed("aes".to_string()))?;

        if data.len() % AES_BLOCK_SIZE != 0 {
            return Err(TransformError::BlockSize {
                algorithm: "aes".to_string(),
                actual: data.len(),
                expected: AES_BLOCK_SIZE,
            });
        }

        for block in data.chunks_exact_mut(AES_BLOCK_SIZE) {
            match self.direction {
                Direction::Encryption => schedule.encrypt_block(block),
                Direction::Decryption => schedule.decrypt_block(block),
            }
        }
        Ok(())
    }
}
