//! Message authentication codes

use std::fmt;

use aes::{Aes128, Aes256};
use cmac::Cmac;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::error::TransformError;
use crate::transformation::KeyingInterface;

/// Supported MAC algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// HMAC over SHA-256
    HmacSha256,
    /// HMAC over SHA-512
    HmacSha512,
    /// CMAC over AES-128
    CmacAes128,
    /// CMAC over AES-256
    CmacAes256,
}

impl MacAlgorithm {
    /// Every supported MAC
    pub const ALL: [Self; 4] = [
        Self::HmacSha256,
        Self::HmacSha512,
        Self::CmacAes128,
        Self::CmacAes256,
    ];

    /// Registry name
    pub const fn name(self) -> &'static str {
        match self {
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha512 => "hmac-sha512",
            Self::CmacAes128 => "cmac-aes128",
            Self::CmacAes256 => "cmac-aes256",
        }
    }

    /// Tag size in bytes
    pub const fn digest_size(self) -> usize {
        match self {
            Self::HmacSha256 => 32,
            Self::HmacSha512 => 64,
            Self::CmacAes128 | Self::CmacAes256 => 16,
        }
    }

    /// Underlying block size in bytes
    pub const fn block_size(self) -> usize {
        match self {
            Self::HmacSha256 => 64,
            Self::HmacSha512 => 128,
            Self::CmacAes128 | Self::CmacAes256 => 16,
        }
    }

    /// Look up an algorithm by registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.name() == name)
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl KeyingInterface for MacAlgorithm {
    fn is_valid_key_length(&self, length: usize) -> bool {
        match self {
            // HMAC hashes or pads any key to the block size
            Self::HmacSha256 | Self::HmacSha512 => length > 0,
            Self::CmacAes128 => length == 16,
            Self::CmacAes256 => length == 32,
        }
    }
}

#[derive(Clone)]
enum MacCore {
    HmacSha256(Hmac<Sha256>),
    HmacSha512(Hmac<Sha512>),
    CmacAes128(Cmac<Aes128>),
    CmacAes256(Cmac<Aes256>),
}

impl MacCore {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::HmacSha256(mac) => mac.update(data),
            Self::HmacSha512(mac) => mac.update(data),
            Self::CmacAes128(mac) => mac.update(data),
            Self::CmacAes256(mac) => mac.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Self::HmacSha256(mac) => mac.finalize().into_bytes().to_vec(),
            Self::HmacSha512(mac) => mac.finalize().into_bytes().to_vec(),
            Self::CmacAes128(mac) => mac.finalize().into_bytes().to_vec(),
            Self::CmacAes256(mac) => mac.finalize().into_bytes().to_vec(),
        }
    }
}

/// Keyed MAC state
///
/// Keeps the freshly keyed core so a reset never needs the key again.
pub(crate) struct MacState {
    initial: MacCore,
    current: MacCore,
}

impl MacState {
    pub(crate) fn new(algorithm: MacAlgorithm, key: &[u8]) -> Result<Self, TransformError> {
        let initial = match algorithm {
            MacAlgorithm::HmacSha256 => {
                MacCore::HmacSha256(<Hmac<Sha256> as Mac>::new_from_slice(key)?)
            }
            MacAlgorithm::HmacSha512 => {
                MacCore::HmacSha512(<Hmac<Sha512> as Mac>::new_from_slice(key)?)
            }
            MacAlgorithm::CmacAes128 => {
                MacCore::CmacAes128(<Cmac<Aes128> as Mac>::new_from_slice(key)?)
            }
            MacAlgorithm::CmacAes256 => {
                MacCore::CmacAes256(<Cmac<Aes256> as Mac>::new_from_slice(key)?)
            }
        };
        Ok(Self {
            current: initial.clone(),
            initial,
        })
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.current.update(data);
    }

    /// Produce the tag and reset to the keyed initial state
    pub(crate) fn finalize_reset(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.current, self.initial.clone()).finalize()
    }

    pub(crate) fn reset(&mut self) {
        self.current = self.initial.clone();
    }
}
