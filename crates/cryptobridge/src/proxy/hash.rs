//! Host-backed hash transformation

use tracing::{debug, trace};

use crate::error::TransformError;
use crate::host::{self, HostRef, HostValue, WeakHostRef};
use crate::transformation::HashTransformation;

/// Methods a host hash object must expose
const REQUIRED_METHODS: [&str; 4] = ["getDigestSize", "update", "finalize", "restart"];

/// Presents a host object as a [`HashTransformation`]
///
/// The digest size is read once, during construction, so a host object
/// whose `getDigestSize` misbehaves is rejected before any data is fed.
#[derive(Debug)]
pub struct HashProxy {
    object: WeakHostRef,
    class: String,
    name: String,
    digest_size: usize,
    block_size: usize,
}

impl HashProxy {
    /// Adapt `object`
    ///
    /// # Errors
    ///
    /// - [`TransformError::Construction`] if a required method is missing or
    ///   the reported digest or block size is negative
    /// - [`TransformError::TypeMismatch`] if `getDigestSize`, `getBlockSize`
    ///   or `getName` return the wrong type
    pub fn new(object: &HostRef) -> Result<Self, TransformError> {
        let class = host::class_name_of(object)?;

        if let Some(missing) = REQUIRED_METHODS
            .iter()
            .find(|method| !host::has_method(object, method))
        {
            return Err(TransformError::construction(
                &class,
                format!("method {missing}() is required"),
            ));
        }

        let digest_size = host::invoke(object, &class, "getDigestSize", &[])
            .and_then(|value| host::expect_int(value, &class, "getDigestSize"))?;
        let digest_size = usize::try_from(digest_size).map_err(|_| {
            TransformError::construction(&class, format!("invalid digest size {digest_size}"))
        })?;

        let block_size = if host::has_method(object, "getBlockSize") {
            let size = host::invoke(object, &class, "getBlockSize", &[])
                .and_then(|value| host::expect_int(value, &class, "getBlockSize"))?;
            usize::try_from(size).map_err(|_| {
                TransformError::construction(&class, format!("invalid block size {size}"))
            })?
        } else {
            0
        };

        let name = if host::has_method(object, "getName") {
            let raw = host::invoke(object, &class, "getName", &[])
                .and_then(|value| host::expect_bytes(value, &class, "getName"))?;
            String::from_utf8_lossy(&raw).into_owned()
        } else {
            class.clone()
        };

        debug!(
            "Adapted host hash {} (digest size {}, block size {})",
            class, digest_size, block_size
        );

        Ok(Self {
            object: std::rc::Rc::downgrade(object),
            class,
            name,
            digest_size,
            block_size,
        })
    }

    /// Class name of the adapted host object
    pub fn class_name(&self) -> &str {
        &self.class
    }

    fn call(&self, method: &str, args: &[HostValue]) -> Result<HostValue, TransformError> {
        trace!("{}::{}()", self.class, method);
        host::invoke_weak(&self.object, &self.class, method, args)
    }
}

impl HashTransformation for HashProxy {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn digest_size(&self) -> usize {
        self.digest_size
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn update(&mut self, data: &[u8]) -> Result<(), TransformError> {
        self.call("update", &[HostValue::from(data)]).map(|_| ())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, TransformError> {
        let value = self.call("finalize", &[])?;
        host::expect_bytes(value, &self.class, "finalize")
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        self.call("restart", &[]).map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedHash;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_proxy_reads_sizes_at_construction() {
        let object: HostRef = Rc::new(RefCell::new(ScriptedHash::new()));
        let proxy = HashProxy::new(&object).expect("proxy construction should succeed");

        assert_eq!(proxy.digest_size(), 4);
        assert_eq!(proxy.block_size(), 8);
        assert_eq!(proxy.name(), "xor32");
        assert_eq!(proxy.class_name(), "ScriptedHash");
    }

    #[test]
    fn test_proxy_forwards_digest_calls() {
        let object: HostRef = Rc::new(RefCell::new(ScriptedHash::new()));
        let mut proxy = HashProxy::new(&object).expect("proxy construction should succeed");

        proxy.update(&[1, 2, 3, 4]).expect("update should succeed");
        proxy.update(&[1, 0, 0, 0]).expect("update should succeed");
        let digest = proxy.finalize().expect("finalize should succeed");
        assert_eq!(digest, vec![0, 2, 3, 4]);

        proxy.restart().expect("restart should succeed");
        let digest = proxy.finalize().expect("finalize should succeed");
        assert_eq!(digest, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_proxy_rejects_non_integer_digest_size() {
        let object: HostRef = Rc::new(RefCell::new(
            ScriptedHash::new().with_digest_size(HostValue::Bytes(b"4".to_vec())),
        ));
        let result = HashProxy::new(&object);
        assert!(matches!(
            result,
            Err(TransformError::TypeMismatch {
                expected: "int",
                found: "string",
                ..
            })
        ));
    }

    #[test]
    fn test_proxy_rejects_negative_digest_size() {
        let object: HostRef = Rc::new(RefCell::new(
            ScriptedHash::new().with_digest_size(HostValue::Int(-1)),
        ));
        assert!(matches!(
            HashProxy::new(&object),
            Err(TransformError::Construction { .. })
        ));
    }

    #[test]
    fn test_proxy_requires_capabilities() {
        let object: HostRef = Rc::new(RefCell::new(ScriptedHash::new().without("restart")));
        let err = HashProxy::new(&object).expect_err("missing restart should fail");
        assert_eq!(
            err.to_string(),
            "ScriptedHash : method restart() is required"
        );
    }

    #[test]
    fn test_proxy_rejects_negative_block_size() {
        let object: HostRef = Rc::new(RefCell::new(
            ScriptedHash::new().with_block_size(HostValue::Int(-1)),
        ));
        let err = HashProxy::new(&object).expect_err("negative block size should fail");
        assert!(matches!(err, TransformError::Construction { .. }));
        assert!(err.to_string().contains("invalid block size -1"));
    }

    #[test]
    fn test_proxy_reports_false_sentinel() {
        let object: HostRef = Rc::new(RefCell::new(ScriptedHash::new().failing_finalize()));
        let mut proxy = HashProxy::new(&object).expect("proxy construction should succeed");
        assert!(matches!(
            proxy.finalize(),
            Err(TransformError::HostCall { .. })
        ));
    }

    #[test]
    fn test_proxy_does_not_keep_host_alive() {
        let object: HostRef = Rc::new(RefCell::new(ScriptedHash::new()));
        let mut proxy = HashProxy::new(&object).expect("proxy construction should succeed");
        assert_eq!(Rc::strong_count(&object), 1);

        drop(object);
        assert!(matches!(
            proxy.update(b"late"),
            Err(TransformError::HostObjectReleased(_))
        ));
    }
}
