//! Stream ciphers

use tracing::debug;

use crate::error::TransformError;
use crate::keying::KeyedPair;
use crate::native::{SalsaEngine, SalsaVariant};
use crate::transformation::{CipherEngine, Direction, SymmetricTransformation};

/// Resynchronizable stream cipher
///
/// Needs both a key and an IV before any data can be processed. The
/// keystream position carries over between calls until
/// [`restart`](Self::restart).
#[derive(Debug)]
pub struct StreamCipher {
    pair: KeyedPair<dyn CipherEngine>,
}

impl StreamCipher {
    /// Wrap a pair of engines
    pub fn new(
        encryptor: Box<dyn CipherEngine>,
        decryptor: Box<dyn CipherEngine>,
    ) -> Result<Self, TransformError> {
        Ok(Self {
            pair: KeyedPair::new(encryptor, decryptor)?,
        })
    }

    /// Salsa20, 32-byte key, 8-byte IV, 20 rounds unless changed
    pub fn salsa20() -> Self {
        Self::salsa(SalsaVariant::Salsa20)
    }

    /// XSalsa20, 32-byte key, 24-byte IV
    pub fn xsalsa20() -> Self {
        Self::salsa(SalsaVariant::XSalsa20)
    }

    fn salsa(variant: SalsaVariant) -> Self {
        Self {
            pair: KeyedPair::<dyn CipherEngine>::from_engines(
                Box::new(SalsaEngine::new(variant, Direction::Encryption)),
                Box::new(SalsaEngine::new(variant, Direction::Decryption)),
            ),
        }
    }

    /// Algorithm name
    pub fn name(&self) -> &str {
        self.pair.name()
    }

    /// Block size in bytes
    pub fn block_size(&self) -> usize {
        self.pair.block_size()
    }

    /// Stored key
    pub fn key(&self) -> &[u8] {
        self.pair.key()
    }

    /// Stored IV
    pub fn iv(&self) -> &[u8] {
        self.pair.iv()
    }

    /// Required IV length
    pub fn iv_size(&self) -> usize {
        self.pair.iv_size()
    }

    /// Whether `length` is an acceptable key length
    pub fn is_valid_key_length(&self, length: usize) -> bool {
        self.pair.is_valid_key_length(length)
    }

    /// Whether `length` is an acceptable IV length
    pub fn is_valid_iv_length(&self, length: usize) -> bool {
        self.pair.is_valid_iv_length(length)
    }

    /// Set the key
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError> {
        self.pair.set_key(key)
    }

    /// Set the IV
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<(), TransformError> {
        self.pair.set_iv(iv)
    }

    /// Change the number of rounds
    ///
    /// Both directions restart from the beginning of the new keystream.
    pub fn set_rounds(&mut self, rounds: u32) -> Result<(), TransformError> {
        self.pair.set_rounds(rounds)?;
        debug!("{}: rounds set to {}", self.pair.name(), rounds);
        Ok(())
    }

    /// Encrypt `data`
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.encrypt(data)
    }

    /// Decrypt `data`
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.decrypt(data)
    }

    /// Rewind both directions to the start of the keystream
    pub fn restart(&mut self) -> Result<(), TransformError> {
        self.pair.restart()
    }
}

impl SymmetricTransformation for StreamCipher {
    fn name(&self) -> String {
        self.pair.name().to_string()
    }

    fn block_size(&self) -> usize {
        self.pair.block_size()
    }

    fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.encrypt(data)
    }

    fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.decrypt(data)
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        self.pair.restart()
    }
}

refuse_serde!(StreamCipher, "StreamCipher");
