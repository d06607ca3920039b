//! Fabric port selector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one attachment point of the switch fabric.
///
/// Drivers speak in terms of fabric ports: an ingress tag resolves to a
/// `FabricPort`, and an egress tag is stamped for one. The mapping from a
/// slave index to an actual interface handle is the core's business, not
/// the driver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FabricPort {
    /// The single physical attachment shared by all logical ports.
    Master,
    /// Logical switch port with the given index.
    Slave(usize),
}

impl FabricPort {
    /// Returns the slave index, or `None` for the master.
    pub const fn slave_index(&self) -> Option<usize> {
        match self {
            FabricPort::Master => None,
            FabricPort::Slave(index) => Some(*index),
        }
    }

    /// Returns true if this selects the master attachment.
    pub const fn is_master(&self) -> bool {
        matches!(self, FabricPort::Master)
    }
}

impl fmt::Display for FabricPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FabricPort::Master => write!(f, "master"),
            FabricPort::Slave(index) => write!(f, "slave{}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slave_index() {
        assert_eq!(FabricPort::Master.slave_index(), None);
        assert_eq!(FabricPort::Slave(2).slave_index(), Some(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(FabricPort::Master.to_string(), "master");
        assert_eq!(FabricPort::Slave(0).to_string(), "slave0");
    }
}
