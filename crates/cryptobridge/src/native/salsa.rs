//! Salsa20 family stream ciphers

use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::{Salsa8, Salsa12, Salsa20, XSalsa20};
use tracing::debug;

use crate::error::TransformError;
use crate::transformation::{CipherEngine, Direction, KeyingInterface};

/// Salsa20 key length in bytes
const KEY_SIZE: usize = 32;

/// Salsa20 variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalsaVariant {
    /// Salsa20 with a 64-bit nonce and configurable rounds
    Salsa20,
    /// XSalsa20 with a 192-bit nonce, always 20 rounds
    XSalsa20,
}

impl SalsaVariant {
    /// Registry name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Salsa20 => "salsa20",
            Self::XSalsa20 => "xsalsa20",
        }
    }

    /// Nonce length in bytes
    pub const fn iv_size(self) -> usize {
        match self {
            Self::Salsa20 => 8,
            Self::XSalsa20 => 24,
        }
    }
}

enum SalsaState {
    Salsa8(Salsa8),
    Salsa12(Salsa12),
    Salsa20(Salsa20),
    XSalsa20(XSalsa20),
}

impl SalsaState {
    fn apply_keystream(&mut self, data: &mut [u8]) {
        match self {
            Self::Salsa8(cipher) => cipher.apply_keystream(data),
            Self::Salsa12(cipher) => cipher.apply_keystream(data),
            Self::Salsa20(cipher) => cipher.apply_keystream(data),
            Self::XSalsa20(cipher) => cipher.apply_keystream(data),
        }
    }
}

/// Salsa20 or XSalsa20 keystream engine
///
/// Encryption and decryption are the same operation; the direction only
/// matters for logging and for pairing engines in a wrapper.
pub struct SalsaEngine {
    variant: SalsaVariant,
    direction: Direction,
    rounds: u32,
    state: Option<SalsaState>,
}

impl SalsaEngine {
    /// Unkeyed engine with 20 rounds
    pub const fn new(variant: SalsaVariant, direction: Direction) -> Self {
        Self {
            variant,
            direction,
            rounds: 20,
            state: None,
        }
    }

    /// Configured number of rounds
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl std::fmt::Debug for SalsaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalsaEngine")
            .field("variant", &self.variant)
            .field("direction", &self.direction)
            .field("rounds", &self.rounds)
            .field("keyed", &self.state.is_some())
            .finish()
    }
}

impl KeyingInterface for SalsaEngine {
    fn is_valid_key_length(&self, length: usize) -> bool {
        length == KEY_SIZE
    }

    fn is_resynchronizable(&self) -> bool {
        true
    }

    fn iv_size(&self) -> usize {
        self.variant.iv_size()
    }
}

impl CipherEngine for SalsaEngine {
    fn name(&self) -> &str {
        self.variant.name()
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn mandatory_block_size(&self) -> usize {
        1
    }

    fn set_key(&mut self, _key: &[u8]) -> Result<(), TransformError> {
        Err(TransformError::iv(
            self.variant.name(),
            crate::validator::LengthError::Missing,
        ))
    }

    fn set_key_with_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), TransformError> {
        let state = match (self.variant, self.rounds) {
            (SalsaVariant::Salsa20, 8) => SalsaState::Salsa8(Salsa8::new_from_slices(key, iv)?),
            (SalsaVariant::Salsa20, 12) => SalsaState::Salsa12(Salsa12::new_from_slices(key, iv)?),
            (SalsaVariant::Salsa20, _) => SalsaState::Salsa20(Salsa20::new_from_slices(key, iv)?),
            (SalsaVariant::XSalsa20, _) => {
                SalsaState::XSalsa20(XSalsa20::new_from_slices(key, iv)?)
            }
        };
        self.state = Some(state);
        Ok(())
    }

    fn process_data(&mut self, data: &mut [u8]) -> Result<(), TransformError> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| TransformError::NotKeyed(self.variant.name().to_string()))?;
        state.apply_keystream(data);
        Ok(())
    }

    fn set_rounds(&mut self, rounds: u32) -> Result<(), TransformError> {
        if self.variant == SalsaVariant::XSalsa20 {
            return Err(TransformError::Unsupported {
                algorithm: self.variant.name().to_string(),
                operation: "configurable rounds",
            });
        }
        if !matches!(rounds, 8 | 12 | 20) {
            return Err(TransformError::InvalidRounds {
                algorithm: self.variant.name().to_string(),
                rounds,
            });
        }

        debug!("{} {} engine set to {} rounds", self.variant.name(), self.direction, rounds);
        self.rounds = rounds;
        // Keystream depends on the round count; the owner re-keys
        self.state = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keyed(variant: SalsaVariant, rounds: u32) -> SalsaEngine {
        let mut engine = SalsaEngine::new(variant, Direction::Encryption);
        engine.set_rounds(rounds).ok();
        engine
            .set_key_with_iv(&[1u8; 32], &vec![2u8; variant.iv_size()])
            .expect("key and iv should be accepted");
        engine
    }

    #[test]
    fn test_keystream_is_symmetric() {
        for variant in [SalsaVariant::Salsa20, SalsaVariant::XSalsa20] {
            let mut data = b"attack at dawn".to_vec();
            keyed(variant, 20).process_data(&mut data).unwrap();
            assert_ne!(data, b"attack at dawn".to_vec());
            keyed(variant, 20).process_data(&mut data).unwrap();
            assert_eq!(data, b"attack at dawn".to_vec());
        }
    }

    #[test]
    fn test_rounds_change_keystream() {
        let mut eight = [0u8; 32];
        let mut twenty = [0u8; 32];
        keyed(SalsaVariant::Salsa20, 8).process_data(&mut eight).unwrap();
        keyed(SalsaVariant::Salsa20, 20).process_data(&mut twenty).unwrap();
        assert_ne!(eight, twenty);
    }

    #[test]
    fn test_set_rounds_validation() {
        let mut engine = SalsaEngine::new(SalsaVariant::Salsa20, Direction::Encryption);
        assert!(matches!(
            engine.set_rounds(10),
            Err(TransformError::InvalidRounds { rounds: 10, .. })
        ));
        assert_eq!(engine.rounds(), 20);
        engine.set_rounds(12).expect("12 rounds should be accepted");
        assert_eq!(engine.rounds(), 12);

        let mut xsalsa = SalsaEngine::new(SalsaVariant::XSalsa20, Direction::Encryption);
        assert!(matches!(
            xsalsa.set_rounds(8),
            Err(TransformError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_set_rounds_drops_keystream() {
        let mut engine = keyed(SalsaVariant::Salsa20, 20);
        engine.set_rounds(8).unwrap();
        assert!(matches!(
            engine.process_data(&mut [0u8; 4]),
            Err(TransformError::NotKeyed(_))
        ));
    }
}
