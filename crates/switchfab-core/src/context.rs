//! The per-device fabric context and port registry.
//!
//! One [`FabricContext`] exists per physical switch device. It owns the
//! registry (the fixed, ordered slave-port list plus the master
//! attachment) and the LAG membership table, and holds the injected
//! switch-driver capability. There are no process-wide singletons: every
//! device gets its own independent context.

use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tracing::info;

use crate::config::FabricConfig;
use crate::error::{FabricError, FabricResult};
use crate::iface::{Iface, MasterTxFn};
use crate::lag::LagTable;
use switchfab_driver::SwitchDriver;

/// Shared, per-device switch-fabric state.
pub struct FabricContext {
    device: String,
    driver: Arc<dyn SwitchDriver>,
    slaves: Vec<Arc<Iface>>,
    master: OnceCell<Arc<Iface>>,
    pub(crate) lag: Mutex<LagTable>,
}

impl FabricContext {
    /// Builds the context and its slave-port registry from configuration.
    ///
    /// The registry is immutable after this call; only the master
    /// attachment is still pending (see [`attach_master`]).
    ///
    /// [`attach_master`]: FabricContext::attach_master
    pub fn new(config: &FabricConfig, driver: Arc<dyn SwitchDriver>) -> FabricResult<Arc<Self>> {
        config.validate()?;

        let num_ports = config.num_slave_ports();
        let context = Arc::new_cyclic(|weak| FabricContext {
            device: config.device.clone(),
            driver,
            slaves: config
                .slave_ports
                .iter()
                .enumerate()
                .map(|(index, port)| Iface::slave(&port.name, index, weak.clone()))
                .collect(),
            master: OnceCell::new(),
            lag: Mutex::new(LagTable::new(num_ports)),
        });

        info!(
            device = %context.device,
            ports = num_ports,
            "fabric context created"
        );
        Ok(context)
    }

    /// Returns the switch device name.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the injected driver capability.
    pub fn driver(&self) -> &Arc<dyn SwitchDriver> {
        &self.driver
    }

    /// Returns the number of configured slave ports.
    pub fn num_slave_ports(&self) -> usize {
        self.slaves.len()
    }

    /// Looks up a slave port by index.
    ///
    /// Returns `None` for an out-of-range index; never panics.
    pub fn slave_port(&self, index: usize) -> Option<Arc<Iface>> {
        self.slaves.get(index).cloned()
    }

    /// Returns the master attachment, if one has been registered.
    pub fn master(&self) -> Option<Arc<Iface>> {
        self.master.get().cloned()
    }

    /// Attaches the master interface and saves its underlying transmit
    /// function.
    ///
    /// The transmit function is the *original* one: the public transmit
    /// entry point wraps it with tag insertion, so it must be preserved
    /// here exactly once. A second attach is rejected, which also rules
    /// out accidental double-wrapping.
    pub fn attach_master(
        self: &Arc<Self>,
        iface: Arc<Iface>,
        tx: MasterTxFn,
    ) -> FabricResult<()> {
        if !iface.is_master() {
            return Err(FabricError::not_fabric_port(iface.name()));
        }
        if self.master.get().is_some() {
            return Err(FabricError::MasterAlreadyAttached);
        }

        iface.bind_fabric(Arc::downgrade(self))?;
        iface.save_master_tx(tx)?;
        self.master
            .set(Arc::clone(&iface))
            .map_err(|_| FabricError::MasterAlreadyAttached)?;

        info!(device = %self.device, master = %iface.name(), "master interface attached");
        Ok(())
    }

    /// Bounds-checks a slave-port index for port-scoped driver dispatch.
    pub(crate) fn check_port(&self, index: usize) -> FabricResult<()> {
        if index >= self.slaves.len() {
            return Err(FabricError::PortNotFound {
                index,
                count: self.slaves.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for FabricContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabricContext")
            .field("device", &self.device)
            .field("slave_ports", &self.slaves.len())
            .field("master_attached", &self.master.get().is_some())
            .finish()
    }
}
