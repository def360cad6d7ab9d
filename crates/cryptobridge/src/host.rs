//! Host object model boundary
//!
//! A host is whatever embeds this crate (a scripting runtime, a plugin
//! system). Host objects are reached only through [`HostObject::call`], so
//! the adapters stay independent of any concrete dispatch mechanism.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::error::TransformError;

/// Value exchanged with host methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostValue {
    /// No value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Byte string
    Bytes(Vec<u8>),
}

impl HostValue {
    /// Name of the value type, used in diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Bytes(_) => "string",
        }
    }
}

impl From<&[u8]> for HostValue {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Error raised by a host method
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    /// Host-provided message
    pub message: String,
}

impl HostError {
    /// Create a host error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An object living on the host side
pub trait HostObject {
    /// Class name reported in errors
    fn class_name(&self) -> &str;

    /// Whether `method` can be dispatched on this object
    fn has_method(&self, method: &str) -> bool;

    /// Invoke `method` with `args`
    fn call(&mut self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError>;
}

/// Shared, reference-counted handle to a host object
pub type HostRef = Rc<RefCell<dyn HostObject>>;

/// Non-owning handle held by adapters
pub(crate) type WeakHostRef = Weak<RefCell<dyn HostObject>>;

impl fmt::Debug for dyn HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("class", &self.class_name())
            .finish_non_exhaustive()
    }
}

/// Read the class name of a host object
pub(crate) fn class_name_of(object: &HostRef) -> Result<String, TransformError> {
    let borrowed = object.try_borrow().map_err(|_| TransformError::HostCall {
        class: "<host>".to_string(),
        method: "<class_name>".to_string(),
        message: "object is already in use".to_string(),
    })?;
    Ok(borrowed.class_name().to_string())
}

/// Whether a host object exposes `method`
pub(crate) fn has_method(object: &HostRef, method: &str) -> bool {
    object
        .try_borrow()
        .is_ok_and(|borrowed| borrowed.has_method(method))
}

/// Dispatch `method` on a host object, translating host failures
pub(crate) fn invoke(
    object: &HostRef,
    class: &str,
    method: &str,
    args: &[HostValue],
) -> Result<HostValue, TransformError> {
    let mut borrowed = object
        .try_borrow_mut()
        .map_err(|_| TransformError::HostCall {
            class: class.to_string(),
            method: method.to_string(),
            message: "object is already in use".to_string(),
        })?;

    borrowed
        .call(method, args)
        .map_err(|e| TransformError::HostCall {
            class: class.to_string(),
            method: method.to_string(),
            message: e.message,
        })
}

/// Dispatch through a weak handle, failing if the object is gone
pub(crate) fn invoke_weak(
    object: &WeakHostRef,
    class: &str,
    method: &str,
    args: &[HostValue],
) -> Result<HostValue, TransformError> {
    let strong = object
        .upgrade()
        .ok_or_else(|| TransformError::HostObjectReleased(class.to_string()))?;
    invoke(&strong, class, method, args)
}

/// Expect an integer result
pub(crate) fn expect_int(
    value: HostValue,
    class: &str,
    method: &str,
) -> Result<i64, TransformError> {
    match value {
        HostValue::Int(n) => Ok(n),
        other => Err(TransformError::TypeMismatch {
            class: class.to_string(),
            method: method.to_string(),
            expected: "int",
            found: other.type_name(),
        }),
    }
}

/// Expect a byte string result
///
/// A boolean `false` is the host's failure sentinel and is reported as a
/// failed call rather than a type mismatch.
pub(crate) fn expect_bytes(
    value: HostValue,
    class: &str,
    method: &str,
) -> Result<Vec<u8>, TransformError> {
    match value {
        HostValue::Bytes(bytes) => Ok(bytes),
        HostValue::Bool(false) => Err(TransformError::HostCall {
            class: class.to_string(),
            method: method.to_string(),
            message: "returned false".to_string(),
        }),
        other => Err(TransformError::TypeMismatch {
            class: class.to_string(),
            method: method.to_string(),
            expected: "string",
            found: other.type_name(),
        }),
    }
}
