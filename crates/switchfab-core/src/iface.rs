//! Interface handles and per-interface fabric state.
//!
//! One [`Iface`] exists per logical or master interface. It carries the
//! capability flags the routing path checks, the optional receive-filter
//! callback, and (for the master only) the saved underlying transmit
//! function. All registration fields are write-once: they are set during
//! bring-up and read-only afterwards, which is what lets the hot routing
//! path run without locks.

use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::context::FabricContext;
use crate::error::{FabricError, FabricResult};
use switchfab_driver::DriverResult;
use switchfab_types::Frame;

/// Per-port receive filter.
///
/// Returns true to accept the frame on the candidate interface, false to
/// push it back to the master for normal-stack handling. Exists so slave
/// ports can special-case protocols (e.g. bridge management or ARP) that
/// must still reach the master's upper layers.
pub type RecvFilter = Box<dyn Fn(&Iface, &Frame) -> bool + Send + Sync>;

/// The master's underlying transmit function, saved at registration.
///
/// The public transmit entry point wraps this with tag insertion; the
/// original is preserved here exactly once and never overwritten.
pub type MasterTxFn = Box<dyn Fn(&Iface, Frame) -> DriverResult<()> + Send + Sync>;

/// Link-layer kind of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L2Kind {
    /// Ethernet interface; only these can be fabric ports.
    Ethernet,
    /// Any other link layer (never routed by the fabric).
    Other,
}

/// A network interface as seen by the fabric core.
///
/// Shared as `Arc<Iface>`; the owning [`FabricContext`] holds the strong
/// references for slave ports, interfaces hold only a weak back-reference
/// to their context.
pub struct Iface {
    name: String,
    l2: L2Kind,
    master_capable: bool,
    slave_capable: bool,
    slave_index: Option<usize>,
    fabric: OnceCell<Weak<FabricContext>>,
    recv_filter: OnceCell<RecvFilter>,
    master_tx: OnceCell<MasterTxFn>,
}

impl Iface {
    /// Creates a plain Ethernet interface with no fabric role.
    pub fn ethernet(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Iface {
            name: name.into(),
            l2: L2Kind::Ethernet,
            master_capable: false,
            slave_capable: false,
            slave_index: None,
            fabric: OnceCell::new(),
            recv_filter: OnceCell::new(),
            master_tx: OnceCell::new(),
        })
    }

    /// Creates a non-Ethernet interface (e.g. a tunnel endpoint).
    pub fn non_ethernet(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Iface {
            name: name.into(),
            l2: L2Kind::Other,
            master_capable: false,
            slave_capable: false,
            slave_index: None,
            fabric: OnceCell::new(),
            recv_filter: OnceCell::new(),
            master_tx: OnceCell::new(),
        })
    }

    /// Creates the interface for the physical master attachment.
    pub fn master(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Iface {
            name: name.into(),
            l2: L2Kind::Ethernet,
            master_capable: true,
            slave_capable: false,
            slave_index: None,
            fabric: OnceCell::new(),
            recv_filter: OnceCell::new(),
            master_tx: OnceCell::new(),
        })
    }

    pub(crate) fn slave(name: impl Into<String>, index: usize, fabric: Weak<FabricContext>) -> Arc<Self> {
        Arc::new(Iface {
            name: name.into(),
            l2: L2Kind::Ethernet,
            master_capable: false,
            slave_capable: true,
            slave_index: Some(index),
            fabric: OnceCell::from(fabric),
            recv_filter: OnceCell::new(),
            master_tx: OnceCell::new(),
        })
    }

    /// Returns the interface name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true for Ethernet interfaces.
    pub fn is_ethernet(&self) -> bool {
        self.l2 == L2Kind::Ethernet
    }

    /// Returns true iff this is an Ethernet interface advertising the
    /// fabric master capability. Safe to call on any interface.
    pub fn is_master(&self) -> bool {
        self.is_ethernet() && self.master_capable
    }

    /// Returns true iff this is an Ethernet interface advertising the
    /// fabric slave capability.
    pub fn is_slave_port(&self) -> bool {
        self.is_ethernet() && self.slave_capable
    }

    /// Returns true iff this interface can participate in tag routing
    /// (Ethernet with either fabric capability).
    pub fn is_fabric_port(&self) -> bool {
        self.is_ethernet() && (self.master_capable || self.slave_capable)
    }

    /// Returns the slave-port index, if this is a slave port.
    pub fn slave_index(&self) -> Option<usize> {
        self.slave_index
    }

    /// Resolves the owning fabric context, or `None` for interfaces that
    /// never joined a fabric (or whose fabric is gone).
    pub fn fabric(&self) -> Option<Arc<FabricContext>> {
        self.fabric.get().and_then(Weak::upgrade)
    }

    /// Registers the per-interface receive filter.
    ///
    /// Only fabric ports accept a filter. The filter is write-once;
    /// registering a second one is rejected rather than silently
    /// replacing the first.
    pub fn register_recv_filter(&self, filter: RecvFilter) -> FabricResult<()> {
        if !self.is_fabric_port() {
            return Err(FabricError::not_fabric_port(&self.name));
        }
        self.recv_filter
            .set(filter)
            .map_err(|_| FabricError::FilterAlreadyRegistered {
                iface: self.name.clone(),
            })
    }

    /// Returns the registered receive filter, if any.
    pub fn recv_filter(&self) -> Option<&RecvFilter> {
        self.recv_filter.get()
    }

    /// Returns the saved master transmit function, if registered.
    pub fn master_tx(&self) -> Option<&MasterTxFn> {
        self.master_tx.get()
    }

    pub(crate) fn bind_fabric(&self, fabric: Weak<FabricContext>) -> FabricResult<()> {
        self.fabric.set(fabric).map_err(|_| FabricError::Config {
            message: format!("interface '{}' already bound to a fabric", self.name),
        })
    }

    pub(crate) fn save_master_tx(&self, tx: MasterTxFn) -> FabricResult<()> {
        self.master_tx
            .set(tx)
            .map_err(|_| FabricError::MasterAlreadyAttached)
    }
}

impl fmt::Debug for Iface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iface")
            .field("name", &self.name)
            .field("l2", &self.l2)
            .field("master", &self.master_capable)
            .field("slave", &self.slave_index)
            .field("has_filter", &self.recv_filter.get().is_some())
            .finish()
    }
}

/// Free-function form of [`Iface::is_master`], matching the registry
/// contract: side-effect free and safe for any interface.
pub fn is_port_master(iface: &Iface) -> bool {
    iface.is_master()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_flags() {
        let plain = Iface::ethernet("eth0");
        assert!(plain.is_ethernet());
        assert!(!plain.is_master());
        assert!(!plain.is_fabric_port());

        let master = Iface::master("eth0");
        assert!(master.is_master());
        assert!(master.is_fabric_port());
        assert!(!master.is_slave_port());

        let tun = Iface::non_ethernet("tun0");
        assert!(!tun.is_ethernet());
        assert!(!is_port_master(&tun));
    }

    #[test]
    fn test_plain_iface_has_no_fabric() {
        let plain = Iface::ethernet("eth1");
        assert!(plain.fabric().is_none());
    }

    #[test]
    fn test_filter_rejected_on_plain_iface() {
        let plain = Iface::ethernet("eth1");
        let err = plain
            .register_recv_filter(Box::new(|_, _| true))
            .unwrap_err();
        assert!(matches!(err, FabricError::NotFabricPort { .. }));
    }

    #[test]
    fn test_filter_is_write_once() {
        let master = Iface::master("eth0");
        master.register_recv_filter(Box::new(|_, _| true)).unwrap();

        let err = master
            .register_recv_filter(Box::new(|_, _| false))
            .unwrap_err();
        assert!(matches!(err, FabricError::FilterAlreadyRegistered { .. }));
    }
}
