//! Message digests

use std::fmt;

use digest::DynDigest;

use crate::error::TransformError;
use crate::transformation::HashTransformation;

/// Supported message digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5 (RFC 1321)
    Md5,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Every supported digest
    pub const ALL: [Self; 5] = [
        Self::Md5,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Registry name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest size in bytes
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Compression function block size in bytes
    pub const fn block_size(self) -> usize {
        match self {
            Self::Md5 | Self::Sha224 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }

    /// Look up an algorithm by registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.name() == name)
    }

    fn instantiate(self) -> Box<dyn DynDigest> {
        match self {
            Self::Md5 => Box::new(md5::Md5::default()),
            Self::Sha224 => Box::new(sha2::Sha224::default()),
            Self::Sha256 => Box::new(sha2::Sha256::default()),
            Self::Sha384 => Box::new(sha2::Sha384::default()),
            Self::Sha512 => Box::new(sha2::Sha512::default()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unkeyed digest backed by RustCrypto
pub struct NativeHash {
    algorithm: HashAlgorithm,
    state: Box<dyn DynDigest>,
}

impl NativeHash {
    /// Fresh digest state for `algorithm`
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            state: algorithm.instantiate(),
        }
    }

    /// The digest algorithm
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl fmt::Debug for NativeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHash")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl HashTransformation for NativeHash {
    fn name(&self) -> String {
        self.algorithm.name().to_string()
    }

    fn digest_size(&self) -> usize {
        self.state.output_size()
    }

    fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.state.update(data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        Ok(self.state.finalize_reset().into_vec())
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        self.state.reset();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_digests() {
        let cases = [
            (HashAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e", &b""[..]),
            (
                HashAlgorithm::Sha256,
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
                &b"abc"[..],
            ),
            (
                HashAlgorithm::Sha224,
                "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7",
                &b"abc"[..],
            ),
        ];

        for (algorithm, expected, input) in cases {
            let mut hash = NativeHash::new(algorithm);
            let digest = hash.calculate_digest(input).expect("digest should succeed");
            assert_eq!(hex::encode(digest), expected, "{algorithm}");
        }
    }

    #[test]
    fn test_declared_sizes_match_output() {
        for algorithm in HashAlgorithm::ALL {
            let mut hash = NativeHash::new(algorithm);
            assert_eq!(hash.digest_size(), algorithm.digest_size());
            let digest = hash.calculate_digest(b"x").expect("digest should succeed");
            assert_eq!(digest.len(), algorithm.digest_size());
        }
    }

    #[test]
    fn test_restart_discards_input() {
        let mut hash = NativeHash::new(HashAlgorithm::Md5);
        hash.update(b"garbage").expect("update should succeed");
        hash.restart().expect("restart should succeed");
        let digest = hash.finalize().expect("finalize should succeed");
        assert_eq!(hex::encode(digest), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(HashAlgorithm::from_name("sha384"), Some(HashAlgorithm::Sha384));
        assert_eq!(HashAlgorithm::from_name("whirlpool"), None);
    }
}
