//! EAX authenticated encryption over AES
//!
//! EAX (Bellare, Rogaway, Wagner) is built from two primitives the
//! RustCrypto crates already provide: AES-CTR for confidentiality and
//! OMAC (CMAC) for authentication. With `OMAC^t(M) = CMAC(K, [t]_16 || M)`:
//!
//! - `N = OMAC^0(nonce)` is the initial counter
//! - `H = OMAC^1(header)` authenticates associated data
//! - `C = OMAC^2(ciphertext)` authenticates the message
//! - the tag is `N ^ H ^ C`

use aes::{Aes128, Aes192, Aes256};
use cmac::{Cmac, Mac};
use tracing::trace;

use super::aes::{AES_BLOCK_SIZE, AES_KEY_LENGTHS, AesCtr};
use crate::error::TransformError;
use crate::transformation::{AuthenticatedEngine, CipherEngine, Direction, KeyingInterface};
use crate::validator::LengthError;

const NAME: &str = "eax-aes";
const TAG_SIZE: usize = AES_BLOCK_SIZE;

enum Omac {
    Aes128(Cmac<Aes128>),
    Aes192(Cmac<Aes192>),
    Aes256(Cmac<Aes256>),
}

impl Omac {
    fn with_tweak(key: &[u8], tweak: u8) -> Result<Self, TransformError> {
        let mut omac = match key.len() {
            16 => Self::Aes128(<Cmac<Aes128> as Mac>::new_from_slice(key)?),
            24 => Self::Aes192(<Cmac<Aes192> as Mac>::new_from_slice(key)?),
            32 => Self::Aes256(<Cmac<Aes256> as Mac>::new_from_slice(key)?),
            _ => return Err(cipher::InvalidLength.into()),
        };

        let mut prefix = [0u8; AES_BLOCK_SIZE];
        prefix[AES_BLOCK_SIZE - 1] = tweak;
        omac.update(&prefix);
        Ok(omac)
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Aes128(mac) => mac.update(data),
            Self::Aes192(mac) => mac.update(data),
            Self::Aes256(mac) => mac.update(data),
        }
    }

    fn tag(&self) -> [u8; AES_BLOCK_SIZE] {
        let bytes = match self {
            Self::Aes128(mac) => mac.clone().finalize().into_bytes(),
            Self::Aes192(mac) => mac.clone().finalize().into_bytes(),
            Self::Aes256(mac) => mac.clone().finalize().into_bytes(),
        };
        let mut tag = [0u8; AES_BLOCK_SIZE];
        tag.copy_from_slice(&bytes);
        tag
    }
}

struct EaxState {
    ctr: AesCtr,
    nonce_mac: [u8; AES_BLOCK_SIZE],
    header_mac: Omac,
    message_mac: Omac,
}

impl EaxState {
    fn new(key: &[u8], iv: &[u8]) -> Result<Self, TransformError> {
        let mut nonce = Omac::with_tweak(key, 0)?;
        nonce.update(iv);
        let nonce_mac = nonce.tag();

        Ok(Self {
            ctr: AesCtr::new(key, &nonce_mac)?,
            nonce_mac,
            header_mac: Omac::with_tweak(key, 1)?,
            message_mac: Omac::with_tweak(key, 2)?,
        })
    }

    fn tag(&self) -> Vec<u8> {
        let header = self.header_mac.tag();
        let message = self.message_mac.tag();
        self.nonce_mac
            .iter()
            .zip(header)
            .zip(message)
            .map(|((n, h), c)| n ^ h ^ c)
            .collect()
    }
}

/// EAX-AES engine, one direction
pub struct EaxEngine {
    direction: Direction,
    key: Vec<u8>,
    iv: Vec<u8>,
    state: Option<EaxState>,
}

impl EaxEngine {
    /// Unkeyed engine for `direction`
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            key: Vec::new(),
            iv: Vec::new(),
            state: None,
        }
    }

    fn state_mut(&mut self) -> Result<&mut EaxState, TransformError> {
        self.state
            .as_mut()
            .ok_or_else(|| TransformError::NotKeyed(NAME.to_string()))
    }
}

impl std::fmt::Debug for EaxEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EaxEngine")
            .field("direction", &self.direction)
            .field("keyed", &self.state.is_some())
            .finish_non_exhaustive()
    }
}

impl KeyingInterface for EaxEngine {
    fn is_valid_key_length(&self, length: usize) -> bool {
        AES_KEY_LENGTHS.contains(&length)
    }

    fn is_resynchronizable(&self) -> bool {
        true
    }

    fn iv_size(&self) -> usize {
        AES_BLOCK_SIZE
    }
}

impl CipherEngine for EaxEngine {
    fn name(&self) -> &str {
        NAME
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn mandatory_block_size(&self) -> usize {
        1
    }

    fn set_key(&mut self, _key: &[u8]) -> Result<(), TransformError> {
        Err(TransformError::iv(NAME, LengthError::Missing))
    }

    fn set_key_with_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), TransformError> {
        self.state = Some(EaxState::new(key, iv)?);
        self.key = key.to_vec();
        self.iv = iv.to_vec();
        Ok(())
    }

    fn process_data(&mut self, data: &mut [u8]) -> Result<(), TransformError> {
        let direction = self.direction;
        let state = self.state_mut()?;
        match direction {
            Direction::Encryption => {
                state.ctr.apply_keystream(data);
                state.message_mac.update(data);
            }
            Direction::Decryption => {
                state.message_mac.update(data);
                state.ctr.apply_keystream(data);
            }
        }
        Ok(())
    }
}

impl AuthenticatedEngine for EaxEngine {
    fn digest_size(&self) -> usize {
        TAG_SIZE
    }

    fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.state_mut()?.header_mac.update(data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        let tag = self.state_mut()?.tag();
        // Same key and nonce, ready for the next message
        self.state = Some(EaxState::new(&self.key, &self.iv)?);
        trace!("{} {} tag computed, engine re-keyed", NAME, self.direction);
        Ok(tag)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine(direction: Direction, key: &str, nonce: &str) -> EaxEngine {
        let mut engine = EaxEngine::new(direction);
        engine
            .set_key_with_iv(&hex::decode(key).unwrap(), &hex::decode(nonce).unwrap())
            .expect("key and nonce should be accepted");
        engine
    }

    #[test]
    fn test_header_only_tag() {
        let mut eax = engine(
            Direction::Encryption,
            "233952DEE4D5ED5F9B9C6D6FF80FF478",
            "62EC67F9C3A4A407FCB2A8C49031A8B3",
        );
        eax.update(&hex::decode("6BFB914FD07EAE6B").unwrap()).unwrap();
        let tag = eax.finalize().unwrap();
        assert_eq!(hex::encode_upper(tag), "E037830E8389F27B025A2D6527E79D01");
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let key = "91945D3F4DCBEE0BF45EF52255F095A4";
        let nonce = "BECAF043B0A23D843194BA972C66DEBD";
        let header = hex::decode("FA3BFD4806EB53FA").unwrap();

        let mut forward = engine(Direction::Encryption, key, nonce);
        forward.update(&header).unwrap();
        let mut data = hex::decode("F7FB").unwrap();
        forward.process_data(&mut data).unwrap();
        let tag = forward.finalize().unwrap();
        assert_eq!(hex::encode_upper(&data), "19DD");
        assert_eq!(hex::encode_upper(&tag), "5C4C9331049D0BDAB0277408F67967E5");

        let mut reverse = engine(Direction::Decryption, key, nonce);
        reverse.update(&header).unwrap();
        reverse.process_data(&mut data).unwrap();
        assert_eq!(hex::encode_upper(&data), "F7FB");
        assert_eq!(reverse.finalize().unwrap(), tag);
    }

    #[test]
    fn test_finalize_rekeys_with_same_nonce() {
        let mut eax = engine(
            Direction::Encryption,
            "233952DEE4D5ED5F9B9C6D6FF80FF478",
            "62EC67F9C3A4A407FCB2A8C49031A8B3",
        );
        let first = eax.finalize().unwrap();
        let second = eax.finalize().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), TAG_SIZE);
    }

    #[test]
    fn test_unkeyed_engine() {
        let mut eax = EaxEngine::new(Direction::Encryption);
        assert!(matches!(eax.finalize(), Err(TransformError::NotKeyed(_))));
        assert!(matches!(
            eax.set_key(&[0u8; 16]),
            Err(TransformError::Iv {
                error: LengthError::Missing,
                ..
            })
        ));
    }
}
