//! Block ciphers

use crate::error::TransformError;
use crate::keying::KeyedPair;
use crate::native::AesEngine;
use crate::transformation::{CipherEngine, Direction, SymmetricTransformation};

/// Block cipher in ECB mode
///
/// [`encrypt`](Self::encrypt) and [`decrypt`](Self::decrypt) take any whole
/// number of blocks; the `_block` variants take exactly one.
#[derive(Debug)]
pub struct BlockCipher {
    pair: KeyedPair<dyn CipherEngine>,
}

impl BlockCipher {
    /// Wrap a pair of engines
    pub fn new(
        encryptor: Box<dyn CipherEngine>,
        decryptor: Box<dyn CipherEngine>,
    ) -> Result<Self, TransformError> {
        let pair = KeyedPair::new(encryptor, decryptor)?;
        if pair.is_resynchronizable() {
            return Err(TransformError::construction(
                pair.name(),
                "block ciphers must not require an IV",
            ));
        }
        Ok(Self { pair })
    }

    /// AES, 128, 192 or 256 bit keys
    pub fn aes() -> Self {
        Self {
            pair: KeyedPair::<dyn CipherEngine>::from_engines(
                Box::new(AesEngine::new(Direction::Encryption)),
                Box::new(AesEngine::new(Direction::Decryption)),
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

    /// Always empty, block ciphers take no IV
    pub fn iv(&self) -> &[u8] {
        self.pair.iv()
    }

    /// Always 0
    pub fn iv_size(&self) -> usize {
        self.pair.iv_size()
    }

    /// Whether `length` is an acceptable key length
    pub fn is_valid_key_length(&self, length: usize) -> bool {
        self.pair.is_valid_key_length(length)
    }

    /// Always true, the IV is ignored
    pub fn is_valid_iv_length(&self, length: usize) -> bool {
        self.pair.is_valid_iv_length(length)
    }

    /// Set the key
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), TransformError> {
        self.pair.set_key(key)
    }

    /// No-op, accepted for interface parity with the other wrappers
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<(), TransformError> {
        self.pair.set_iv(iv)
    }

    /// Encrypt a whole number of blocks
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.encrypt(data)
    }

    /// Decrypt a whole number of blocks
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.pair.decrypt(data)
    }

    /// Encrypt exactly one block
    pub fn encrypt_block(&mut self, block: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.ensure_single_block(block.len())?;
        self.pair.encrypt(block)
    }

    /// Decrypt exactly one block
    pub fn decrypt_block(&mut self, block: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.ensure_single_block(block.len())?;
        self.pair.decrypt(block)
    }

    /// Re-apply the key
    pub fn restart(&mut self) -> Result<(), TransformError> {
        self.pair.restart()
    }

    fn ensure_single_block(&self, length: usize) -> Result<(), TransformError> {
        let expected = self.block_size();
        if length == expected {
            return Ok(());
        }
        Err(TransformError::BlockSize {
            algorithm: self.name().to_string(),
            actual: length,
            expected,
        })
    }
}

impl SymmetricTransformation for BlockCipher {
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

refuse_serde!(BlockCipher, "BlockCipher");

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{PaddingScheme, SymmetricTransformationFilter};
    use crate::native::SalsaEngine;
    use crate::native::SalsaVariant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aes_known_answer() {
        let mut aes = BlockCipher::aes();
        aes.set_key(&[0u8; 16]).expect("key should be accepted");

        let ciphertext = aes.encrypt_block(&[0u8; 16]).expect("encrypt should succeed");
        assert_eq!(hex::encode(&ciphertext), "66e94bd4ef8a2c3b884cfa59ca342b2e");
        assert_eq!(
            aes.decrypt_block(&ciphertext).expect("decrypt should succeed"),
            vec![0u8; 16]
        );
    }

    #[test]
    fn test_single_block_length() {
        let mut aes = BlockCipher::aes();
        aes.set_key(&[0u8; 16]).unwrap();
        assert!(matches!(
            aes.encrypt_block(&[0u8; 32]),
            Err(TransformError::BlockSize {
                actual: 32,
                expected: 16,
                ..
            })
        ));
        assert_eq!(aes.encrypt(&[0u8; 32]).unwrap().len(), 32);
    }

    #[test]
    fn test_set_iv_is_noop() {
        let mut aes = BlockCipher::aes();
        aes.set_iv(b"anything").expect("iv should be ignored");
        assert!(aes.iv().is_empty());
        assert_eq!(aes.iv_size(), 0);
    }

    #[test]
    fn test_rejects_stream_engines() {
        let result = BlockCipher::new(
            Box::new(SalsaEngine::new(SalsaVariant::Salsa20, Direction::Encryption)),
            Box::new(SalsaEngine::new(SalsaVariant::Salsa20, Direction::Decryption)),
        );
        assert!(matches!(result, Err(TransformError::Construction { .. })));
    }

    #[test]
    fn test_padded_messages_through_filter() {
        let mut aes = BlockCipher::aes();
        aes.set_key(&[0x42; 24]).unwrap();

        let mut filter = SymmetricTransformationFilter::new(&mut aes, PaddingScheme::Default).unwrap();
        assert_eq!(filter.padding(), PaddingScheme::PkcsPadding);

        let ciphertext = filter.encrypt_string(b"seventeen bytes!!").unwrap();
        assert_eq!(ciphertext.len(), 32);
        assert_eq!(
            filter.decrypt_string(&ciphertext).unwrap(),
            b"seventeen bytes!!".to_vec()
        );
    }

    #[test]
    fn test_refuses_serialization() {
        let aes = BlockCipher::aes();
        assert!(serde_json::to_string(&aes).is_err());
        assert!(serde_json::from_str::<BlockCipher>("null").is_err());
    }
}
