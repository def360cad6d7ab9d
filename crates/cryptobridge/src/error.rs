//! Error types for transformation operations

use thiserror::Error;

use crate::validator::LengthError;

/// Errors that can occur while driving a transformation
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required collaborator was missing or malformed at construction
    #[error("{name} : {reason}")]
    Construction {
        /// Class or algorithm being constructed
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Key absent or of the wrong size for the algorithm
    #[error("{algorithm} : {}", describe_key(.error))]
    Key {
        /// Algorithm name
        algorithm: String,
        /// Validation outcome
        error: LengthError,
    },

    /// Initialization vector absent or of the wrong size
    #[error("{algorithm} : {}", describe_iv(.error))]
    Iv {
        /// Algorithm name
        algorithm: String,
        /// Validation outcome
        error: LengthError,
    },

    /// Input length is not a multiple of the mandatory block size
    #[error("{algorithm}: data size ({actual}) is not a multiple of block size ({expected})")]
    BlockSize {
        /// Algorithm name
        algorithm: String,
        /// Length of the supplied data
        actual: usize,
        /// Mandatory block size
        expected: usize,
    },

    /// A host call returned a value of an unexpected type
    #[error("{class}::{method}() returned {found}, expected {expected}")]
    TypeMismatch {
        /// Host class name
        class: String,
        /// Host method name
        method: String,
        /// Expected value type
        expected: &'static str,
        /// Type actually returned
        found: &'static str,
    },

    /// Retrieved digest length differs from the declared digest size
    #[error("retrievable output ({actual} bytes) does not match digest size ({expected} bytes)")]
    InternalInconsistency {
        /// Declared digest size
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// A host method raised an error or reported failure
    #[error("{class}::{method}() failed: {message}")]
    HostCall {
        /// Host class name
        class: String,
        /// Host method name
        method: String,
        /// Host-provided message
        message: String,
    },

    /// The adapted host object has already been released
    #[error("host object {0} has been released")]
    HostObjectReleased(String),

    /// Instances of this type cannot be persisted or restored
    #[error("You cannot serialize or unserialize {0} instances")]
    NotSerializable(&'static str),

    /// Algorithm not present (or disabled) in the registry
    #[error("unknown {family} algorithm: {name}")]
    UnknownAlgorithm {
        /// Algorithm family
        family: String,
        /// Requested name
        name: String,
    },

    /// Unsupported number of rounds
    #[error("{algorithm}: number of rounds must be one of 8, 12 or 20, got {rounds}")]
    InvalidRounds {
        /// Algorithm name
        algorithm: String,
        /// Requested rounds
        rounds: u32,
    },

    /// Operation not supported by the algorithm
    #[error("{algorithm} does not support {operation}")]
    Unsupported {
        /// Algorithm name
        algorithm: String,
        /// Operation name
        operation: &'static str,
    },

    /// Padding of decrypted data is malformed
    #[error("{algorithm}: invalid padding")]
    InvalidPadding {
        /// Algorithm name
        algorithm: String,
    },

    /// The native primitive rejected key or IV material
    #[error("native primitive rejected key material: {0}")]
    InvalidLength(#[from] cipher::InvalidLength),

    /// A native engine was used before key material was applied
    #[error("{0} : key material has not been applied")]
    NotKeyed(String),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn describe_key(error: &LengthError) -> String {
    match error {
        LengthError::Missing => "a key is required".to_string(),
        LengthError::InvalidLength(length) => format!("{length} is not a valid key length"),
    }
}

fn describe_iv(error: &LengthError) -> String {
    match error {
        LengthError::Missing => "an initialization vector is required".to_string(),
        LengthError::InvalidLength(length) => {
            format!("{length} is not a valid initialization vector length")
        }
    }
}

impl TransformError {
    /// Build a key error for `algorithm`
    pub fn key(algorithm: impl Into<String>, error: LengthError) -> Self {
        Self::Key {
            algorithm: algorithm.into(),
            error,
        }
    }

    /// Build an IV error for `algorithm`
    pub fn iv(algorithm: impl Into<String>, error: LengthError) -> Self {
        Self::Iv {
            algorithm: algorithm.into(),
            error,
        }
    }

    /// Build a construction error
    pub fn construction(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
