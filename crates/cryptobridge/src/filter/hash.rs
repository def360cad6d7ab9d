//! Digest filter over native or host-backed hash transformations

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::error::TransformError;
use crate::host::HostRef;
use crate::ownership::Ownership;
use crate::proxy::HashProxy;
use crate::transformation::HashTransformation;

const CLASS: &str = "HashTransformationFilter";

/// Position of a filter in its message cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// Waiting for data
    Ready,
    /// Data has been put since the last message end
    Fed,
    /// Message ended, digest waiting to be retrieved
    Finalized,
}

/// Drives a [`HashTransformation`] through put / message end / retrieve
///
/// The transformation is restarted after every digest computed with
/// [`calculate_digest`](Self::calculate_digest), so a filter can be reused
/// indefinitely.
pub struct HashTransformationFilter<'a> {
    hash: Ownership<'a, dyn HashTransformation + 'a>,
    host: Option<HostRef>,
    output: Vec<u8>,
    state: FilterState,
}

impl<'a> HashTransformationFilter<'a> {
    /// Filter over a caller-owned transformation
    pub fn new(hash: &'a mut dyn HashTransformation) -> Self {
        Self::with_ownership(Ownership::Borrowed(hash), None)
    }

    /// Filter taking ownership of `hash`
    pub fn from_boxed(hash: Box<dyn HashTransformation + 'a>) -> Self {
        Self::with_ownership(Ownership::Owned(hash), None)
    }

    fn with_ownership(
        hash: Ownership<'a, dyn HashTransformation + 'a>,
        host: Option<HostRef>,
    ) -> Self {
        Self {
            hash,
            host,
            output: Vec::new(),
            state: FilterState::Ready,
        }
    }

    /// The transformation being driven
    pub fn hash(&self) -> &dyn HashTransformation {
        &*self.hash
    }

    /// The host object behind the transformation, if any
    pub fn host_object(&self) -> Option<&HostRef> {
        self.host.as_ref()
    }

    /// Whether the filter releases the transformation when dropped
    pub fn owns_transformation(&self) -> bool {
        self.hash.is_owned()
    }

    /// Current message state
    pub const fn state(&self) -> FilterState {
        self.state
    }

    /// Feed `data` into the current message
    pub fn put(&mut self, data: &[u8]) -> Result<usize, TransformError> {
        self.hash.update(data)?;
        self.state = FilterState::Fed;
        Ok(data.len())
    }

    /// End the current message and queue its digest
    pub fn message_end(&mut self) -> Result<(), TransformError> {
        let digest = self.hash.finalize()?;
        self.output.extend_from_slice(&digest);
        self.state = FilterState::Finalized;
        Ok(())
    }

    /// Number of bytes waiting to be retrieved
    pub fn max_retrievable(&self) -> usize {
        self.output.len()
    }

    /// Take up to `count` queued bytes
    pub fn get(&mut self, count: usize) -> Vec<u8> {
        let count = count.min(self.output.len());
        let taken: Vec<u8> = self.output.drain(..count).collect();
        if self.output.is_empty() && self.state == FilterState::Finalized {
            self.state = FilterState::Ready;
        }
        taken
    }

    /// Digest of `data` in one call
    ///
    /// The transformation is restarted whether or not the digest was
    /// produced, so a failed call never leaks input into the next one. A size
    /// mismatch is reported as
    /// [`TransformError::InternalInconsistency`] and never as a truncated
    /// digest.
    pub fn calculate_digest(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.hash.ensure_ready()?;

        self.output.clear();
        let fed = self.put(data).and_then(|_| self.message_end());

        let retrievable = self.max_retrievable();
        let digest = self.get(retrievable);
        self.state = FilterState::Ready;
        let restarted = self.hash.restart();
        fed?;
        restarted?;

        let expected = self.hash.digest_size();
        if retrievable != expected {
            warn!(
                "{} produced {} bytes, declared digest size is {}",
                self.hash.name(),
                retrievable,
                expected
            );
            return Err(TransformError::InternalInconsistency {
                expected,
                actual: retrievable,
            });
        }

        trace!("{} digest over {} bytes", self.hash.name(), data.len());
        Ok(digest)
    }
}

impl HashTransformationFilter<'static> {
    /// Filter over a host-defined hash object
    ///
    /// Builds a [`HashProxy`] owned by the filter. The filter also keeps a
    /// strong reference to `object`, which is what keeps the proxy's weak
    /// reference valid.
    pub fn from_host(object: HostRef) -> Result<Self, TransformError> {
        let proxy = HashProxy::new(&object)?;
        debug!("Created digest filter over host object {}", proxy.class_name());
        Ok(Self::with_ownership(
            Ownership::Owned(Box::new(proxy)),
            Some(object),
        ))
    }
}

impl fmt::Debug for HashTransformationFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTransformationFilter")
            .field("name", &self.hash.name())
            .field("owned", &self.hash.is_owned())
            .field("host", &self.host.is_some())
            .field("state", &self.state)
            .field("pending", &self.output.len())
            .finish()
    }
}

impl Serialize for HashTransformationFilter<'_> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom(TransformError::NotSerializable(CLASS)))
    }
}

impl<'de> Deserialize<'de> for HashTransformationFilter<'_> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(serde::de::Error::custom(TransformError::NotSerializable(CLASS)))
    }
}
