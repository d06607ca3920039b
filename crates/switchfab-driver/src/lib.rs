//! Switch-driver capability for the switchfab fabric layer.
//!
//! A switch driver owns everything hardware-specific: register access,
//! port enable/disable, PHY link configuration, static MAC and VLAN
//! tables, LAG primitives, and the tagging protocol that multiplexes
//! logical ports over the single physical link. The fabric core only
//! invokes the fixed operation set defined here; it never implements
//! hardware behavior itself.
//!
//! # Architecture
//!
//! - [`error`]: status codes and error types shared by all drivers
//! - [`api`]: the [`SwitchDriver`] trait (the capability operation set)
//! - [`loopback`]: an in-memory reference driver used for bring-up and
//!   testing, in the spirit of the kernel's `dsa_loop` driver
//!
//! # Example
//!
//! ```
//! use switchfab_driver::{LoopbackDriver, SwitchDriver};
//! use switchfab_types::{FabricPort, Frame};
//!
//! let driver = LoopbackDriver::new(3);
//! let tagged = driver
//!     .tag_frame(FabricPort::Slave(1), Frame::from(&[0u8; 64][..]))
//!     .unwrap();
//! assert_eq!(driver.resolve_destination(&tagged).unwrap(), FabricPort::Slave(1));
//! ```

pub mod api;
pub mod error;
pub mod loopback;

pub use api::{LagDescriptor, SwitchDriver};
pub use error::{DriverError, DriverResult, DriverStatus, DriverStatusExt};
pub use loopback::{DriverOp, LoopbackDriver};
