//! Authenticated encryption

use tracing::trace;

use crate::error::TransformError;
use crate::keying::KeyedPair;
use crate::native::EaxEngine;
use crate::transformation::{
    AuthenticatedEngine, Direction, HashTransformation, SymmetricTransformation,
};

/// Authenticated cipher with associated data
///
/// [`update`](Self::update) feeds associated data and
/// [`finalize`](Self::finalize) returns the tag accumulated by the
/// encryption direction over the associated data and everything encrypted
/// since the last tag. Producing a tag re-keys the engine with the same key
/// and IV.
#[derive(Debug)]
pub struct AuthenticatedCipher {
    pair: KeyedPair<dyn AuthenticatedEngine>,
}

impl AuthenticatedCipher {
    /// Wrap a pair of engines
    pub fn new(
        encryptor: Box<dyn AuthenticatedEngine>,
        decryptor: Box<dyn AuthenticatedEngine>,
    ) -> Result<Self, TransformError> {
        Ok(Self {
            pair: KeyedPair::new(encryptor, decryptor)?,
        })
    }

    /// EAX over AES, 16/24/32-byte key, 16-byte IV, 16-byte tag
    pub fn eax_aes() -> Self {
        Self {
            pair: KeyedPair::<dyn AuthenticatedEngine>::from_engines(
                Box::new(EaxEngine::new(Direction::Encryption)),
                Box::new(EaxEngine::new(Direction::Decryption)),
            ),
        }
    }

    /// Algorithm name
    pub fn name(&self) -> &str {
        self.pair.name()
    }

    /// Mandatory block size in bytes
    pub fn block_size(&self) -> usize {
        self.pair.block_size()
    }

    /// Tag size in bytes
    pub fn digest_size(&self) -> usize {
        self.pair.encryptor().digest_size()
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

    /// Encrypt `data`, extending the running tag
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.encrypt(data)
    }

    /// Decrypt `data`
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.decrypt(data)
    }

    /// Tag over `data` as associated data, in one call
    pub fn calculate_digest(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.update(data)?;
        self.finalize()
    }

    /// Feed associated data
    pub fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.ensure_keyed()?;
        self.pair.encryptor_mut().update(data)
    }

    /// Produce the tag
    pub fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        self.ensure_keyed()?;
        let engine = self.pair.encryptor_mut();
        let expected = engine.digest_size();
        let tag = engine.finalize()?;
        if tag.len() != expected {
            return Err(TransformError::InternalInconsistency {
                expected,
                actual: tag.len(),
            });
        }
        trace!("{}: tag {}", self.pair.name(), hex::encode(&tag));
        Ok(tag)
    }

    /// Re-apply key and IV to both directions
    pub fn restart(&mut self) -> Result<(), TransformError> {
        self.pair.restart()
    }

    /// Tag accumulated by the decryption direction
    ///
    /// Compare against the received tag after decrypting a message.
    pub fn verification_tag(&mut self) -> Result<Vec<u8>, TransformError> {
        self.ensure_keyed()?;
        self.pair.decryptor_mut().finalize()
    }

    /// Feed associated data to the decryption direction
    pub fn update_verification(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.ensure_keyed()?;
        self.pair.decryptor_mut().update(data)
    }

    fn ensure_keyed(&self) -> Result<(), TransformError> {
        self.pair.ensure_key()?;
        self.pair.ensure_iv()
    }
}

impl HashTransformation for AuthenticatedCipher {
    fn name(&self) -> String {
        self.pair.name().to_string()
    }

    fn digest_size(&self) -> usize {
        self.pair.encryptor().digest_size()
    }

    fn block_size(&self) -> usize {
        self.pair.block_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        Self::update(self, data)
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        Self::finalize(self)
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        Self::restart(self)
    }

    fn ensure_ready(&self) -> Result<(), TransformError> {
        self.ensure_keyed()
    }
}

impl SymmetricTransformation for AuthenticatedCipher {
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

refuse_serde!(AuthenticatedCipher, "AuthenticatedCipher");
