//! Host objects plugged into the native pipeline

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::RefCell;
use std::rc::Rc;

use cryptobridge::{
    BlockCipher, HashProxy, HashTransformation, HashTransformationFilter, HostError, HostObject,
    HostRef, HostValue, LengthError, Mac, MacAlgorithm, PaddingScheme,
    SymmetricTransformationFilter, TransformError,
};
use pretty_assertions::assert_eq;

/// Host hash producing a 32-bit byte sum, with a configurable
/// `getDigestSize` result
struct SumHash {
    digest_size: HostValue,
    sum: u32,
}

impl SumHash {
    fn new(digest_size: HostValue) -> HostRef {
        Rc::new(RefCell::new(Self { digest_size, sum: 0 }))
    }
}

impl HostObject for SumHash {
    fn class_name(&self) -> &str {
        "SumHash"
    }

    fn has_method(&self, method: &str) -> bool {
        matches!(
            method,
            "getDigestSize" | "getName" | "update" | "finalize" | "restart"
        )
    }

    fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
        match (method, args) {
            ("getDigestSize", _) => Ok(self.digest_size.clone()),
            ("getName", _) => Ok(HostValue::Bytes(b"sum32".to_vec())),
            ("update", [HostValue::Bytes(data)]) => {
                self.sum = data
                    .iter()
                    .fold(self.sum, |sum, byte| sum.wrapping_add(u32::from(*byte)));
                Ok(HostValue::Null)
            }
            ("finalize", []) => {
                let digest = self.sum.to_be_bytes().to_vec();
                self.sum = 0;
                Ok(HostValue::Bytes(digest))
            }
            ("restart", []) => {
                self.sum = 0;
                Ok(HostValue::Null)
            }
            _ => Err(HostError::new(format!("unexpected call {method}()"))),
        }
    }
}

/// Host cipher wrapping a native AES instance
struct HostAes {
    inner: BlockCipher,
}

impl HostObject for HostAes {
    fn class_name(&self) -> &str {
        "HostAes"
    }

    fn has_method(&self, method: &str) -> bool {
        matches!(method, "encrypt" | "decrypt" | "getBlockSize")
    }

    fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
        let to_host = |result: Result<Vec<u8>, TransformError>| {
            result
                .map(HostValue::Bytes)
                .map_err(|e| HostError::new(e.to_string()))
        };
        match (method, args) {
            ("getBlockSize", _) => Ok(HostValue::Int(16)),
            ("encrypt", [HostValue::Bytes(data)]) => to_host(self.inner.encrypt(data)),
            ("decrypt", [HostValue::Bytes(data)]) => to_host(self.inner.decrypt(data)),
            _ => Err(HostError::new(format!("unexpected call {method}()"))),
        }
    }
}

#[test]
fn test_host_hash_digest_cycle() {
    let object = SumHash::new(HostValue::Int(4));
    let mut filter = HashTransformationFilter::from_host(Rc::clone(&object)).unwrap();

    assert_eq!(filter.hash().name(), "sum32");
    assert_eq!(filter.calculate_digest(&[1, 2, 3]).unwrap(), vec![0, 0, 0, 6]);
    assert_eq!(filter.calculate_digest(&[250, 10]).unwrap(), vec![0, 0, 1, 4]);
    assert!(Rc::ptr_eq(filter.host_object().unwrap(), &object));
}

#[test]
fn test_non_integer_digest_size_fails_before_data() {
    let object = SumHash::new(HostValue::Bytes(b"4".to_vec()));
    let err = HashTransformationFilter::from_host(object).expect_err("must be rejected");
    assert!(matches!(
        err,
        TransformError::TypeMismatch {
            expected: "int",
            found: "string",
            ..
        }
    ));
}

#[test]
fn test_declared_size_mismatch_is_inconsistency() {
    let object = SumHash::new(HostValue::Int(8));
    let mut filter = HashTransformationFilter::from_host(object).unwrap();
    assert!(matches!(
        filter.calculate_digest(b"abc"),
        Err(TransformError::InternalInconsistency {
            expected: 8,
            actual: 4
        })
    ));
}

#[test]
fn test_proxy_after_host_release() {
    let object = SumHash::new(HostValue::Int(4));
    let mut proxy = HashProxy::new(&object).unwrap();
    drop(object);

    assert!(matches!(
        proxy.update(b"late"),
        Err(TransformError::HostObjectReleased(_))
    ));
}

#[test]
fn test_host_cipher_through_symmetric_filter() {
    let mut inner = BlockCipher::aes();
    inner.set_key(&[0u8; 32]).unwrap();
    let object: HostRef = Rc::new(RefCell::new(HostAes { inner }));

    let mut filter =
        SymmetricTransformationFilter::from_host(object, PaddingScheme::PkcsPadding).unwrap();
    let ciphertext = filter.encrypt_string(b"host side").unwrap();
    assert_eq!(ciphertext.len(), 16);
    assert_eq!(filter.decrypt_string(&ciphertext).unwrap(), b"host side".to_vec());
}

#[test]
fn test_block_cipher_scenario() {
    let mut aes = BlockCipher::aes();
    aes.set_key(&[0u8; 32]).unwrap();

    let ciphertext = aes.encrypt(&[0u8; 16]).unwrap();
    assert_eq!(
        hex::encode(&ciphertext),
        "dc95c078a2408989ad48a21492842087"
    );
    assert_eq!(aes.decrypt(&ciphertext).unwrap(), vec![0u8; 16]);
}

#[test]
fn test_unkeyed_mac_reports_missing() {
    let mut mac = Mac::new(MacAlgorithm::CmacAes128);
    match mac.calculate_digest(b"x") {
        Err(TransformError::Key { error, .. }) => {
            assert_eq!(error, LengthError::Missing);
            assert_eq!(error.reason(), "missing");
        }
        other => panic!("expected a key error, got {other:?}"),
    }
}

#[test]
fn test_iv_on_block_cipher_is_ignored() {
    let mut with_iv = BlockCipher::aes();
    let mut without_iv = BlockCipher::aes();
    with_iv.set_key(&[9u8; 16]).unwrap();
    without_iv.set_key(&[9u8; 16]).unwrap();

    with_iv.set_iv(b"not used at all").unwrap();
    assert!(with_iv.iv().is_empty());
    assert_eq!(
        with_iv.encrypt(&[5u8; 32]).unwrap(),
        without_iv.encrypt(&[5u8; 32]).unwrap()
    );
}
