//! Bridging native cryptographic transformations and host-defined objects
//!
//! This crate sits between a native cryptography layer (the RustCrypto
//! crates) and a dynamically typed host that wants to use it, or to plug its
//! own hash and cipher objects into the same pipeline.
//!
//! # Components
//!
//! - **Transformations**: object safe traits every hash, MAC and cipher
//!   implements ([`HashTransformation`], [`CipherEngine`],
//!   [`AuthenticatedEngine`], [`SymmetricTransformation`])
//! - **Validation**: key, IV and block size checks shared by every wrapper
//! - **Proxies**: host objects presented as native transformations
//! - **Filters**: one-shot and streaming digest and message processing
//! - **Wrappers**: [`Mac`], [`BlockCipher`], [`StreamCipher`] and
//!   [`AuthenticatedCipher`], all sharing one key/IV lifecycle
//! - **Registry**: explicit name-to-constructor tables per algorithm family
//!
//! # Examples
//!
//! ## Digest through a filter
//!
//! ```
//! use cryptobridge::{HashAlgorithm, HashTransformationFilter, NativeHash};
//!
//! let mut sha = NativeHash::new(HashAlgorithm::Sha256);
//! let mut filter = HashTransformationFilter::new(&mut sha);
//! let digest = filter.calculate_digest(b"abc")?;
//! assert_eq!(digest.len(), 32);
//! # Ok::<(), cryptobridge::TransformError>(())
//! ```
//!
//! ## Stream cipher from the registry
//!
//! ```
//! use cryptobridge::AlgorithmRegistry;
//!
//! let registry = AlgorithmRegistry::builtin();
//! let mut salsa = registry.create_stream_cipher("salsa20")?;
//! salsa.set_key(&[7u8; 32])?;
//! salsa.set_iv(&[1u8; 8])?;
//!
//! let ciphertext = salsa.encrypt(b"hello")?;
//! assert_eq!(salsa.decrypt(&ciphertext)?, b"hello");
//! # Ok::<(), cryptobridge::TransformError>(())
//! ```
//!
//! ## Host-defined hash
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cryptobridge::{HashTransformationFilter, HostError, HostObject, HostRef, HostValue};
//!
//! struct Checksum(u8);
//!
//! impl HostObject for Checksum {
//!     fn class_name(&self) -> &str {
//!         "Checksum"
//!     }
//!
//!     fn has_method(&self, method: &str) -> bool {
//!         matches!(method, "getDigestSize" | "update" | "finalize" | "restart")
//!     }
//!
//!     fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
//!         match (method, args) {
//!             ("getDigestSize", _) => Ok(HostValue::Int(1)),
//!             ("update", [HostValue::Bytes(data)]) => {
//!                 self.0 = data.iter().fold(self.0, |sum, byte| sum.wrapping_add(*byte));
//!                 Ok(HostValue::Null)
//!             }
//!             ("finalize", _) => Ok(HostValue::Bytes(vec![std::mem::take(&mut self.0)])),
//!             ("restart", _) => {
//!                 self.0 = 0;
//!                 Ok(HostValue::Null)
//!             }
//!             _ => Err(HostError::new("bad call")),
//!         }
//!     }
//! }
//!
//! let object: HostRef = Rc::new(RefCell::new(Checksum(0)));
//! let mut filter = HashTransformationFilter::from_host(object)?;
//! assert_eq!(filter.calculate_digest(&[1, 2, 3])?, vec![6]);
//! # Ok::<(), cryptobridge::TransformError>(())
//! ```

#![warn(missing_docs)]

/// Refuse serde serialization and deserialization of a wrapper type
macro_rules! refuse_serde {
    ($ty:ty, $class:literal) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom(
                    $crate::error::TransformError::NotSerializable($class),
                ))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
                Err(serde::de::Error::custom(
                    $crate::error::TransformError::NotSerializable($class),
                ))
            }
        }
    };
}

pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod keying;
pub mod mac;
pub mod native;
pub mod ownership;
pub mod proxy;
pub mod registry;
pub mod symmetric;
pub mod transformation;
pub mod validator;

#[cfg(test)]
mod test_util;

pub use error::TransformError;

// Re-export commonly used types
pub use config::RegistryConfig;
pub use filter::{FilterState, HashTransformationFilter, PaddingScheme, SymmetricTransformationFilter};
pub use host::{HostError, HostObject, HostRef, HostValue};
pub use keying::KeyedPair;
pub use mac::Mac;
pub use native::{
    AesEngine, EaxEngine, HashAlgorithm, MacAlgorithm, NativeHash, SalsaEngine, SalsaVariant,
};
pub use ownership::Ownership;
pub use proxy::{HashProxy, SymmetricTransformationProxy};
pub use registry::{AlgorithmFamily, AlgorithmRegistry};
pub use symmetric::{AuthenticatedCipher, BlockCipher, StreamCipher};
pub use transformation::{
    AuthenticatedEngine, CipherEngine, Direction, HashTransformation, KeyingInterface,
    SymmetricTransformation,
};
pub use validator::{LengthError, validate_iv_length, validate_key_length};
