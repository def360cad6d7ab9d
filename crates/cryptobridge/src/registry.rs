//! Explicit algorithm registry
//!
//! The registry is built once, from the built-in algorithm list filtered by
//! a [`RegistryConfig`], and is read-only afterwards. Callers pass it to
//! whatever needs to create transformations by name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::TransformError;
use crate::mac::Mac;
use crate::native::{HashAlgorithm, MacAlgorithm, NativeHash};
use crate::symmetric::{AuthenticatedCipher, BlockCipher, StreamCipher};

/// Group of algorithms sharing a wrapper type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmFamily {
    /// Unkeyed message digests
    Hash,
    /// Keyed message authentication codes
    Mac,
    /// Block ciphers
    BlockCipher,
    /// Stream ciphers
    StreamCipher,
    /// Authenticated encryption
    AuthenticatedCipher,
}

impl AlgorithmFamily {
    /// Every family
    pub const ALL: [Self; 5] = [
        Self::Hash,
        Self::Mac,
        Self::BlockCipher,
        Self::StreamCipher,
        Self::AuthenticatedCipher,
    ];
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hash => "hash",
            Self::Mac => "MAC",
            Self::BlockCipher => "block cipher",
            Self::StreamCipher => "stream cipher",
            Self::AuthenticatedCipher => "authenticated cipher",
        };
        f.write_str(name)
    }
}

const BLOCK_CIPHERS: [(&str, fn() -> BlockCipher); 1] = [("aes", BlockCipher::aes)];

const STREAM_CIPHERS: [(&str, fn() -> StreamCipher); 2] = [
    ("salsa20", StreamCipher::salsa20),
    ("xsalsa20", StreamCipher::xsalsa20),
];

const AUTHENTICATED_CIPHERS: [(&str, fn() -> AuthenticatedCipher); 1] =
    [("eax-aes", AuthenticatedCipher::eax_aes)];

/// Name-to-constructor tables, one per family
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    hashes: BTreeMap<&'static str, HashAlgorithm>,
    macs: BTreeMap<&'static str, MacAlgorithm>,
    block_ciphers: BTreeMap<&'static str, fn() -> BlockCipher>,
    stream_ciphers: BTreeMap<&'static str, fn() -> StreamCipher>,
    authenticated_ciphers: BTreeMap<&'static str, fn() -> AuthenticatedCipher>,
}

impl AlgorithmRegistry {
    /// Every built-in algorithm
    pub fn builtin() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Built-in algorithms allowed by `config`
    pub fn from_config(config: &RegistryConfig) -> Self {
        let hashes = HashAlgorithm::ALL
            .into_iter()
            .filter(|algorithm| config.is_enabled(AlgorithmFamily::Hash, algorithm.name()))
            .map(|algorithm| (algorithm.name(), algorithm))
            .collect();
        let macs = MacAlgorithm::ALL
            .into_iter()
            .filter(|algorithm| config.is_enabled(AlgorithmFamily::Mac, algorithm.name()))
            .map(|algorithm| (algorithm.name(), algorithm))
            .collect();

        let registry = Self {
            hashes,
            macs,
            block_ciphers: enabled(config, AlgorithmFamily::BlockCipher, BLOCK_CIPHERS),
            stream_ciphers: enabled(config, AlgorithmFamily::StreamCipher, STREAM_CIPHERS),
            authenticated_ciphers: enabled(
                config,
                AlgorithmFamily::AuthenticatedCipher,
                AUTHENTICATED_CIPHERS,
            ),
        };

        for name in &config.disabled_algorithms {
            if !AlgorithmFamily::ALL
                .into_iter()
                .any(|family| Self::is_builtin(family, name))
            {
                warn!("Disabled algorithm {} is not a built-in algorithm", name);
            }
        }

        debug!(
            "Algorithm registry built: {} hashes, {} MACs, {} block, {} stream, {} authenticated ciphers",
            registry.hashes.len(),
            registry.macs.len(),
            registry.block_ciphers.len(),
            registry.stream_ciphers.len(),
            registry.authenticated_ciphers.len()
        );
        registry
    }

    fn is_builtin(family: AlgorithmFamily, name: &str) -> bool {
        match family {
            AlgorithmFamily::Hash => HashAlgorithm::from_name(name).is_some(),
            AlgorithmFamily::Mac => MacAlgorithm::from_name(name).is_some(),
            AlgorithmFamily::BlockCipher => BLOCK_CIPHERS.iter().any(|(n, _)| *n == name),
            AlgorithmFamily::StreamCipher => STREAM_CIPHERS.iter().any(|(n, _)| *n == name),
            AlgorithmFamily::AuthenticatedCipher => {
                AUTHENTICATED_CIPHERS.iter().any(|(n, _)| *n == name)
            }
        }
    }

    /// Registered names of `family`, sorted
    pub fn algorithms(&self, family: AlgorithmFamily) -> Vec<&'static str> {
        match family {
            AlgorithmFamily::Hash => self.hashes.keys().copied().collect(),
            AlgorithmFamily::Mac => self.macs.keys().copied().collect(),
            AlgorithmFamily::BlockCipher => self.block_ciphers.keys().copied().collect(),
            AlgorithmFamily::StreamCipher => self.stream_ciphers.keys().copied().collect(),
            AlgorithmFamily::AuthenticatedCipher => {
                self.authenticated_ciphers.keys().copied().collect()
            }
        }
    }

    /// Whether `name` is registered in `family`
    pub fn contains(&self, family: AlgorithmFamily, name: &str) -> bool {
        match family {
            AlgorithmFamily::Hash => self.hashes.contains_key(name),
            AlgorithmFamily::Mac => self.macs.contains_key(name),
            AlgorithmFamily::BlockCipher => self.block_ciphers.contains_key(name),
            AlgorithmFamily::StreamCipher => self.stream_ciphers.contains_key(name),
            AlgorithmFamily::AuthenticatedCipher => self.authenticated_ciphers.contains_key(name),
        }
    }

    /// Fresh digest called `name`
    pub fn create_hash(&self, name: &str) -> Result<NativeHash, TransformError> {
        self.hashes
            .get(name)
            .map(|algorithm| NativeHash::new(*algorithm))
            .ok_or_else(|| unknown(AlgorithmFamily::Hash, name))
    }

    /// Unkeyed MAC called `name`
    pub fn create_mac(&self, name: &str) -> Result<Mac, TransformError> {
        self.macs
            .get(name)
            .map(|algorithm| Mac::new(*algorithm))
            .ok_or_else(|| unknown(AlgorithmFamily::Mac, name))
    }

    /// Unkeyed block cipher called `name`
    pub fn create_block_cipher(&self, name: &str) -> Result<BlockCipher, TransformError> {
        self.block_ciphers
            .get(name)
            .map(|create| create())
            .ok_or_else(|| unknown(AlgorithmFamily::BlockCipher, name))
    }

    /// Unkeyed stream cipher called `name`
    pub fn create_stream_cipher(&self, name: &str) -> Result<StreamCipher, TransformError> {
        self.stream_ciphers
            .get(name)
            .map(|create| create())
            .ok_or_else(|| unknown(AlgorithmFamily::StreamCipher, name))
    }

    /// Unkeyed authenticated cipher called `name`
    pub fn create_authenticated_cipher(
        &self,
        name: &str,
    ) -> Result<AuthenticatedCipher, TransformError> {
        self.authenticated_ciphers
            .get(name)
            .map(|create| create())
            .ok_or_else(|| unknown(AlgorithmFamily::AuthenticatedCipher, name))
    }
}

fn enabled<T, const N: usize>(
    config: &RegistryConfig,
    family: AlgorithmFamily,
    entries: [(&'static str, fn() -> T); N],
) -> BTreeMap<&'static str, fn() -> T> {
    entries
        .into_iter()
        .filter(|(name, _)| config.is_enabled(family, name))
        .collect()
}

fn unknown(family: AlgorithmFamily, name: &str) -> TransformError {
    TransformError::UnknownAlgorithm {
        family: family.to_string(),
        name: name.to_string(),
    }
}
