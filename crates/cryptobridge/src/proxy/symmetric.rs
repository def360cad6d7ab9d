//! Host-backed symmetric transformation

use tracing::{debug, trace};

use crate::error::TransformError;
use crate::host::{self, HostRef, HostValue, WeakHostRef};
use crate::transformation::SymmetricTransformation;
use crate::validator::is_block_multiple;

const REQUIRED_METHODS: [&str; 3] = ["encrypt", "decrypt", "getBlockSize"];

/// Presents a host object as a [`SymmetricTransformation`]
///
/// Key material stays on the host side; the proxy only moves data.
#[derive(Debug)]
pub struct SymmetricTransformationProxy {
    object: WeakHostRef,
    class: String,
    name: String,
    block_size: usize,
    restartable: bool,
}

impl SymmetricTransformationProxy {
    /// Adapt `object`
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

        let block_size = host::invoke(object, &class, "getBlockSize", &[])
            .and_then(|value| host::expect_int(value, &class, "getBlockSize"))?;
        let block_size = match usize::try_from(block_size) {
            Ok(size) if size > 0 => size,
            _ => {
                return Err(TransformError::construction(
                    &class,
                    format!("invalid block size {block_size}"),
                ));
            }
        };

        let name = if host::has_method(object, "getName") {
            let raw = host::invoke(object, &class, "getName", &[])
                .and_then(|value| host::expect_bytes(value, &class, "getName"))?;
            String::from_utf8_lossy(&raw).into_owned()
        } else {
            class.clone()
        };

        debug!("Adapted host cipher {} (block size {})", class, block_size);

        Ok(Self {
            object: std::rc::Rc::downgrade(object),
            restartable: host::has_method(object, "restart"),
            class,
            name,
            block_size,
        })
    }

    /// Class name of the adapted host object
    pub fn class_name(&self) -> &str {
        &self.class
    }

    fn process(&self, method: &str, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        if !is_block_multiple(self.block_size, data.len()) {
            return Err(TransformError::BlockSize {
                algorithm: self.name.clone(),
                actual: data.len(),
                expected: self.block_size,
            });
        }
        trace!("{}::{}({} bytes)", self.class, method, data.len());
        let value = host::invoke_weak(&self.object, &self.class, method, &[HostValue::from(data)])?;
        let output = host::expect_bytes(value, &self.class, method)?;

        // Block transformations must be length preserving
        if output.len() != data.len() {
            return Err(TransformError::InternalInconsistency {
                expected: data.len(),
                actual: output.len(),
            });
        }
        Ok(output)
    }
}

impl SymmetricTransformation for SymmetricTransformationProxy {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.process("encrypt", data)
    }

    fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.process("decrypt", data)
    }

    fn restart(&mut self) -> Result<(), TransformError> {
        if !self.restartable {
            return Ok(());
        }
        host::invoke_weak(&self.object, &self.class, "restart", &[]).map(|_| ())
    }
}
