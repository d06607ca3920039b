//! Virtual switch-fabric routing and management core.
//!
//! This crate sits between one physical network attachment (the
//! "master" link) and several logical per-port attachments ("slave"
//! ports) multiplexed over it by a hardware tagging protocol. It
//! presents N independently addressable switch ports as N independent
//! interfaces while only one Ethernet MAC/PHY exists, by:
//!
//! - routing every received frame to the right logical port from the
//!   hardware-supplied tag ([`route_ingress`])
//! - wrapping every transmitted frame with the right tag before it
//!   reaches the physical link ([`transmit`])
//! - keeping LAG group membership consistent across ports with no
//!   duplicate or dangling group ids ([`FabricContext::lag_join`] and
//!   friends)
//!
//! Hardware behavior lives behind the
//! [`SwitchDriver`](switchfab_driver::SwitchDriver) capability injected
//! at bring-up; the interface/packet runtime is a collaborator, not
//! implemented here.
//!
//! # Bring-up
//!
//! ```
//! use std::sync::Arc;
//! use switchfab_core::{FabricConfig, FabricContext, Iface};
//! use switchfab_driver::LoopbackDriver;
//!
//! let config = FabricConfig::with_port_count("switch0", "eth0", 3);
//! let driver = Arc::new(LoopbackDriver::new(3));
//! let fabric = FabricContext::new(&config, driver).unwrap();
//!
//! let master = Iface::master("eth0");
//! fabric
//!     .attach_master(master, Box::new(|_, _frame| Ok(())))
//!     .unwrap();
//!
//! assert_eq!(fabric.slave_port(1).unwrap().name(), "lan2");
//! ```

mod config;
mod context;
mod dispatch;
mod egress;
mod error;
mod iface;
mod ingress;
mod lag;

pub use config::{FabricConfig, SlavePortConfig};
pub use context::FabricContext;
pub use egress::transmit;
pub use error::{FabricError, FabricResult};
pub use iface::{is_port_master, Iface, L2Kind, MasterTxFn, RecvFilter};
pub use ingress::route_ingress;
