//! Message filter over symmetric transformations, with block padding

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::error::TransformError;
use crate::host::HostRef;
use crate::ownership::Ownership;
use crate::proxy::SymmetricTransformationProxy;
use crate::transformation::SymmetricTransformation;

const CLASS: &str = "SymmetricTransformationFilter";

/// How messages are padded up to the block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingScheme {
    /// Messages must already be block aligned
    NoPadding,
    /// Pad with zero bytes; trailing zeros are stripped on decryption
    ZerosPadding,
    /// PKCS #7 padding
    PkcsPadding,
    /// PKCS #7 for block ciphers, no padding for stream ciphers
    #[default]
    Default,
}

impl PaddingScheme {
    /// Resolve [`PaddingScheme::Default`] for `block_size`
    pub const fn resolve(self, block_size: usize) -> Self {
        match self {
            Self::Default if block_size > 1 => Self::PkcsPadding,
            Self::Default => Self::NoPadding,
            other => other,
        }
    }
}

/// Encrypts and decrypts whole messages
///
/// Each call handles one complete message and restarts the transformation
/// afterwards.
pub struct SymmetricTransformationFilter<'a> {
    cipher: Ownership<'a, dyn SymmetricTransformation + 'a>,
    host: Option<HostRef>,
    padding: PaddingScheme,
}

impl<'a> SymmetricTransformationFilter<'a> {
    /// Filter over a caller-owned transformation
    ///
    /// # Errors
    ///
    /// [`TransformError::Construction`] if PKCS #7 padding is requested for a
    /// block size it cannot encode
    pub fn new(
        cipher: &'a mut dyn SymmetricTransformation,
        padding: PaddingScheme,
    ) -> Result<Self, TransformError> {
        let padding = checked_padding(&cipher.name(), padding, cipher.block_size())?;
        Ok(Self {
            cipher: Ownership::Borrowed(cipher),
            host: None,
            padding,
        })
    }

    /// The transformation being driven
    pub fn cipher(&self) -> &dyn SymmetricTransformation {
        &*self.cipher
    }

    /// The host object behind the transformation, if any
    pub fn host_object(&self) -> Option<&HostRef> {
        self.host.as_ref()
    }

    /// Effective padding scheme
    pub const fn padding(&self) -> PaddingScheme {
        self.padding
    }

    /// Whether the filter releases the transformation when dropped
    pub fn owns_transformation(&self) -> bool {
        self.cipher.is_owned()
    }

    /// Pad and encrypt a complete message
    pub fn encrypt_string(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        let block_size = self.cipher.block_size().max(1);
        let padded = pad(self.padding, block_size, data);
        trace!(
            "{}: encrypting {} bytes ({} padded)",
            self.cipher.name(),
            data.len(),
            padded.len()
        );

        let result = self.cipher.encrypt(&padded);
        self.cipher.restart()?;
        result
    }

    /// Decrypt a complete message and remove its padding
    pub fn decrypt_string(&mut self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        let block_size = self.cipher.block_size().max(1);
        let result = self.cipher.decrypt(data);
        self.cipher.restart()?;

        let mut plaintext = result?;
        unpad(self.padding, block_size, &mut plaintext).map_err(|()| {
            TransformError::InvalidPadding {
                algorithm: self.cipher.name(),
            }
        })?;
        Ok(plaintext)
    }
}

impl SymmetricTransformationFilter<'static> {
    /// Filter over a host-defined cipher object
    pub fn from_host(object: HostRef, padding: PaddingScheme) -> Result<Self, TransformError> {
        let proxy = SymmetricTransformationProxy::new(&object)?;
        debug!(
            "Created symmetric filter over host object {}",
            proxy.class_name()
        );
        let padding = checked_padding(proxy.class_name(), padding, proxy.block_size())?;
        Ok(Self {
            cipher: Ownership::Owned(Box::new(proxy)),
            host: Some(object),
            padding,
        })
    }
}

/// PKCS #7 stores the pad length in each pad byte
const MAX_PKCS_BLOCK_SIZE: usize = u8::MAX as usize;

fn checked_padding(
    name: &str,
    padding: PaddingScheme,
    block_size: usize,
) -> Result<PaddingScheme, TransformError> {
    let padding = padding.resolve(block_size);
    if padding == PaddingScheme::PkcsPadding && block_size > MAX_PKCS_BLOCK_SIZE {
        return Err(TransformError::construction(
            name,
            format!("PKCS padding needs a block size of at most {MAX_PKCS_BLOCK_SIZE}, got {block_size}"),
        ));
    }
    Ok(padding)
}

fn pad(scheme: PaddingScheme, block_size: usize, data: &[u8]) -> Vec<u8> {
    let mut padded = data.to_vec();
    match scheme {
        PaddingScheme::ZerosPadding => {
            let remainder = data.len() % block_size;
            if remainder != 0 {
                padded.resize(data.len() + block_size - remainder, 0);
            }
        }
        PaddingScheme::PkcsPadding => {
            // block size checked against MAX_PKCS_BLOCK_SIZE at construction
            let count = block_size - data.len() % block_size;
            padded.resize(data.len() + count, count as u8);
        }
        PaddingScheme::NoPadding | PaddingScheme::Default => {}
    }
    padded
}

fn unpad(scheme: PaddingScheme, block_size: usize, data: &mut Vec<u8>) -> Result<(), ()> {
    match scheme {
        PaddingScheme::ZerosPadding => {
            let kept = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            data.truncate(kept);
        }
        PaddingScheme::PkcsPadding => {
            let count = usize::from(*data.last().ok_or(())?);
            if count == 0 || count > block_size || count > data.len() {
                return Err(());
            }
            let start = data.len() - count;
            if data[start..].iter().any(|&b| usize::from(b) != count) {
                return Err(());
            }
            data.truncate(start);
        }
        PaddingScheme::NoPadding | PaddingScheme::Default => {}
    }
    Ok(())
}

impl fmt::Debug for SymmetricTransformationFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricTransformationFilter")
            .field("name", &self.cipher.name())
            .field("owned", &self.cipher.is_owned())
            .field("host", &self.host.is_some())
            .field("padding", &self.padding)
            .finish()
    }
}

impl Serialize for SymmetricTransformationFilter<'_> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom(TransformError::NotSerializable(CLASS)))
    }
}

impl<'de> Deserialize<'de> for SymmetricTransformationFilter<'_> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(serde::de::Error::custom(TransformError::NotSerializable(CLASS)))
    }
}
