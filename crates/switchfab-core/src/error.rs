//! Error types for fabric operations.
//!
//! Every public fabric operation returns a normal result or an explicit
//! error; nothing here panics for control flow. [`FabricError::status`]
//! maps each error onto the raw negative status-code taxonomy for callers
//! that still speak integers.

use thiserror::Error;

use switchfab_driver::{DriverError, DriverStatus};

/// Result type alias for fabric operations.
pub type FabricResult<T> = Result<T, FabricError>;

/// Errors that can occur in the fabric core.
#[derive(Debug, Error)]
pub enum FabricError {
    /// A slave transmit found no master attachment to deliver through.
    #[error("no master interface")]
    NoMasterInterface,

    /// A second master attachment was attempted on the same context.
    #[error("master interface already attached")]
    MasterAlreadyAttached,

    /// The interface carries no switch-fabric context.
    #[error("interface '{iface}' is not attached to a switch fabric")]
    NotAttached {
        /// Interface name.
        iface: String,
    },

    /// The interface is not an Ethernet fabric port.
    #[error("interface '{iface}' is not a fabric port")]
    NotFabricPort {
        /// Interface name.
        iface: String,
    },

    /// The master's underlying transmit function was never registered.
    #[error("master transmit function not registered")]
    TxNotRegistered,

    /// A second receive filter was registered on the same interface.
    #[error("receive filter already registered on '{iface}'")]
    FilterAlreadyRegistered {
        /// Interface name.
        iface: String,
    },

    /// Slave-port index out of range.
    #[error("slave port {index} not found ({count} ports configured)")]
    PortNotFound {
        /// The requested index.
        index: usize,
        /// Number of configured slave ports.
        count: usize,
    },

    /// A port tried to leave or change a LAG it is not a member of.
    #[error("port {port} is not a member of LAG {lag}")]
    LagMismatch {
        /// Slave-port index.
        port: usize,
        /// The LAG id named by the caller.
        lag: u32,
    },

    /// A port without any LAG assignment tried to leave or change.
    #[error("port {port} has no LAG assignment")]
    NoLagAssignment {
        /// Slave-port index.
        port: usize,
    },

    /// The fixed pool of live LAG ids is exhausted.
    #[error("out of LAG capacity ({capacity} groups)")]
    LagCapacity {
        /// Pool capacity.
        capacity: usize,
    },

    /// Bring-up configuration is invalid.
    #[error("invalid fabric configuration: {message}")]
    Config {
        /// What is wrong with it.
        message: String,
    },

    /// The switch driver reported a failure; passed through verbatim.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl FabricError {
    /// Creates a not-attached error.
    pub fn not_attached(iface: impl Into<String>) -> Self {
        FabricError::NotAttached {
            iface: iface.into(),
        }
    }

    /// Creates a not-a-fabric-port error.
    pub fn not_fabric_port(iface: impl Into<String>) -> Self {
        FabricError::NotFabricPort {
            iface: iface.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        FabricError::Config {
            message: message.into(),
        }
    }

    /// Maps this error to the raw negative status code it represents.
    pub fn status(&self) -> i32 {
        let status = match self {
            FabricError::NoMasterInterface | FabricError::NotAttached { .. } => {
                DriverStatus::NoDevice
            }
            FabricError::NotFabricPort { .. } | FabricError::PortNotFound { .. } => {
                DriverStatus::NotFound
            }
            FabricError::LagMismatch { .. } | FabricError::NoLagAssignment { .. } => {
                DriverStatus::NotSupported
            }
            FabricError::LagCapacity { .. } => DriverStatus::OutOfCapacity,
            FabricError::TxNotRegistered => DriverStatus::Uninitialized,
            FabricError::MasterAlreadyAttached
            | FabricError::FilterAlreadyRegistered { .. }
            | FabricError::Config { .. } => DriverStatus::InvalidParameter,
            FabricError::Driver(err) => err.status(),
        };
        status.as_raw()
    }

    /// Returns true if this is a "not supported" condition (the LAG
    /// membership precondition failures).
    pub fn is_not_supported(&self) -> bool {
        self.status() == DriverStatus::NotSupported.as_raw()
    }
}
