//! Driver status codes and error types.
//!
//! Switch drivers historically answer with raw integer status codes
//! (0 = success, negative = failure). This module models those codes as
//! [`DriverStatus`] and layers a structured [`DriverError`] on top, so the
//! fabric core can propagate driver failures verbatim while callers still
//! get a typed error to match on.

use std::fmt;
use thiserror::Error;

/// Raw driver status codes (0 = success, negative = failure).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    OutOfCapacity = -4,
    NotFound = -5,
    InvalidParameter = -6,
    NoDevice = -7,
    Io = -8,
    Uninitialized = -9,
}

impl DriverStatus {
    /// Creates a DriverStatus from a raw i32 value.
    ///
    /// Unknown negative codes collapse to `Failure`.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => DriverStatus::Success,
            -2 => DriverStatus::NotSupported,
            -3 => DriverStatus::NoMemory,
            -4 => DriverStatus::OutOfCapacity,
            -5 => DriverStatus::NotFound,
            -6 => DriverStatus::InvalidParameter,
            -7 => DriverStatus::NoDevice,
            -8 => DriverStatus::Io,
            -9 => DriverStatus::Uninitialized,
            _ => DriverStatus::Failure,
        }
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == DriverStatus::Success
    }

    /// Returns the raw i32 value.
    pub fn as_raw(&self) -> i32 {
        *self as i32
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> DriverResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(DriverError::from_status(self))
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriverStatus::Success => "SUCCESS",
            DriverStatus::Failure => "FAILURE",
            DriverStatus::NotSupported => "NOT_SUPPORTED",
            DriverStatus::NoMemory => "NO_MEMORY",
            DriverStatus::OutOfCapacity => "OUT_OF_CAPACITY",
            DriverStatus::NotFound => "NOT_FOUND",
            DriverStatus::InvalidParameter => "INVALID_PARAMETER",
            DriverStatus::NoDevice => "NO_DEVICE",
            DriverStatus::Io => "IO_ERROR",
            DriverStatus::Uninitialized => "UNINITIALIZED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for driver operations.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// Driver returned a raw error status.
    #[error("driver operation failed: {status}")]
    Status { status: DriverStatus },

    /// The operation is not implemented by this driver.
    #[error("operation not supported: {feature}")]
    NotSupported { feature: String },

    /// Invalid parameter passed to the driver.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The requested entry was not found.
    #[error("not found: {item}")]
    NotFound { item: String },

    /// A fixed-capacity hardware resource is exhausted.
    #[error("out of capacity: {resource}")]
    OutOfCapacity { resource: String },

    /// The backing device is gone or was never bound.
    #[error("no device: {device}")]
    NoDevice { device: String },

    /// Bus or register transaction failed.
    #[error("io error: {message}")]
    Io { message: String },

    /// The driver has not been initialized.
    #[error("driver not initialized")]
    Uninitialized,
}

impl DriverError {
    /// Creates an error from a raw status code.
    pub fn from_status(status: DriverStatus) -> Self {
        match status {
            DriverStatus::NotSupported => DriverError::NotSupported {
                feature: "unknown".to_string(),
            },
            DriverStatus::NotFound => DriverError::NotFound {
                item: "unknown".to_string(),
            },
            DriverStatus::OutOfCapacity | DriverStatus::NoMemory => DriverError::OutOfCapacity {
                resource: "unknown".to_string(),
            },
            DriverStatus::InvalidParameter => DriverError::InvalidParameter {
                message: format!("driver returned {}", status),
            },
            DriverStatus::NoDevice => DriverError::NoDevice {
                device: "unknown".to_string(),
            },
            DriverStatus::Io => DriverError::Io {
                message: format!("driver returned {}", status),
            },
            DriverStatus::Uninitialized => DriverError::Uninitialized,
            _ => DriverError::Status { status },
        }
    }

    /// Creates a not supported error with a feature description.
    pub fn not_supported(feature: impl Into<String>) -> Self {
        DriverError::NotSupported {
            feature: feature.into(),
        }
    }

    /// Creates an invalid parameter error with a message.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        DriverError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        DriverError::NotFound { item: item.into() }
    }

    /// Creates an out of capacity error.
    pub fn out_of_capacity(resource: impl Into<String>) -> Self {
        DriverError::OutOfCapacity {
            resource: resource.into(),
        }
    }

    /// Creates a no device error.
    pub fn no_device(device: impl Into<String>) -> Self {
        DriverError::NoDevice {
            device: device.into(),
        }
    }

    /// Creates an io error.
    pub fn io(message: impl Into<String>) -> Self {
        DriverError::Io {
            message: message.into(),
        }
    }

    /// Returns the status code this error maps to.
    pub fn status(&self) -> DriverStatus {
        match self {
            DriverError::Status { status } => *status,
            DriverError::NotSupported { .. } => DriverStatus::NotSupported,
            DriverError::InvalidParameter { .. } => DriverStatus::InvalidParameter,
            DriverError::NotFound { .. } => DriverStatus::NotFound,
            DriverError::OutOfCapacity { .. } => DriverStatus::OutOfCapacity,
            DriverError::NoDevice { .. } => DriverStatus::NoDevice,
            DriverError::Io { .. } => DriverStatus::Io,
            DriverError::Uninitialized => DriverStatus::Uninitialized,
        }
    }

    /// Returns true if this error may succeed on retry.
    ///
    /// The driver has no retry policy of its own; callers use this to
    /// decide whether a failure is worth re-attempting (bus contention)
    /// or permanent (unsupported feature).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DriverError::Io { .. }
                | DriverError::Status {
                    status: DriverStatus::NoMemory
                }
        )
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Extension trait for converting raw status codes.
pub trait DriverStatusExt {
    /// Converts a raw status code to a Result.
    fn to_result(self) -> DriverResult<()>;
}

impl DriverStatusExt for i32 {
    fn to_result(self) -> DriverResult<()> {
        DriverStatus::from_raw(self).into_result()
    }
}
