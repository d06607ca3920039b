//! Common types for the switchfab virtual switch-fabric layer.
//!
//! This crate provides type-safe representations of the network primitives
//! shared by the fabric core and switch drivers:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`LagId`]: non-zero link-aggregation group identifiers
//! - [`FabricPort`]: master/slave port selector used at the driver boundary
//! - [`Frame`]: opaque packet-buffer handle
//! - [`LinkState`]: PHY link descriptors for port bring-up

mod frame;
mod lag;
mod link;
mod mac;
mod port;
mod vlan;

pub use frame::Frame;
pub use lag::LagId;
pub use link::{Duplex, LinkSpeed, LinkState, ManagedMode};
pub use mac::MacAddress;
pub use port::FabricPort;
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("invalid LAG ID: 0 is reserved for \"no LAG\"")]
    InvalidLagId,

    #[error("invalid link speed: {0} Mb/s")]
    InvalidLinkSpeed(u32),

    #[error("invalid duplex mode: {0}")]
    InvalidDuplex(String),
}
