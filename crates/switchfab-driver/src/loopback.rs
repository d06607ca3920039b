//! In-memory reference driver.
//!
//! `LoopbackDriver` models a small tagging switch entirely in memory, in
//! the spirit of the kernel's `dsa_loop` driver: a register file, a static
//! MAC table, per-port VLAN membership, and a two-byte trailing tag that
//! encodes the fabric port. It exists for bring-up and for tests; every
//! operation is recorded in a journal so callers can verify exactly what
//! the fabric asked the hardware to do.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::api::{LagDescriptor, SwitchDriver};
use crate::error::{DriverError, DriverResult};
use switchfab_types::{Duplex, FabricPort, Frame, LinkSpeed, LinkState, MacAddress, VlanId};

/// Trailing tag marker byte.
const TAG_MAGIC: u8 = 0xfb;

/// Journal entry describing one driver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOp {
    TagFrame { source: FabricPort },
    Resolve { destination: FabricPort },
    SwitchRead { reg: u16 },
    SwitchWrite { reg: u16, value: u8 },
    SetMacEntry { index: u16, fw_port: u8 },
    GetMacEntry { index: u16 },
    PortEnable { port: usize, is_up: bool },
    PortDisable { port: usize },
    LinkUp { port: usize },
    VlanFiltering { port: usize, enabled: bool },
    VlanAdd { port: usize, vid: u16 },
    VlanDel { port: usize, vid: u16 },
    LagJoin { port: usize, lag: LagDescriptor },
    LagLeave { port: usize, lag: LagDescriptor },
    LagChange { port: usize },
}

#[derive(Default)]
struct LoopbackState {
    regs: HashMap<u16, u8>,
    mac_table: HashMap<u16, (MacAddress, u8, u16)>,
    vlans: HashMap<(usize, u16), bool>,
    enabled: Vec<bool>,
    journal: Vec<DriverOp>,
    fail_next: Option<DriverError>,
}

/// Software-only switch driver with a journal of invoked operations.
pub struct LoopbackDriver {
    num_ports: usize,
    state: Mutex<LoopbackState>,
}

impl LoopbackDriver {
    /// Creates a loopback driver for a switch with `num_ports` front ports.
    pub fn new(num_ports: usize) -> Self {
        LoopbackDriver {
            num_ports,
            state: Mutex::new(LoopbackState {
                enabled: vec![false; num_ports],
                ..LoopbackState::default()
            }),
        }
    }

    /// Returns the number of front ports.
    pub fn num_ports(&self) -> usize {
        self.num_ports
    }

    /// Arms a one-shot failure: the next operation fails with `err`.
    pub fn inject_failure(&self, err: DriverError) {
        self.lock().fail_next = Some(err);
    }

    /// Returns a snapshot of the operation journal.
    pub fn journal(&self) -> Vec<DriverOp> {
        self.lock().journal.clone()
    }

    /// Clears the operation journal.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Returns true if the given port was enabled and not disabled since.
    pub fn is_port_enabled(&self, port: usize) -> bool {
        self.lock().enabled.get(port).copied().unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoopbackState> {
        // Inner state is plain data; a poisoned lock means a panicking
        // test body, which we surface rather than mask.
        self.state.lock().expect("loopback driver state poisoned")
    }

    fn begin(&self, op: DriverOp) -> DriverResult<std::sync::MutexGuard<'_, LoopbackState>> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next.take() {
            debug!("loopback: injected failure for {:?}: {}", op, err);
            return Err(err);
        }
        state.journal.push(op);
        Ok(state)
    }

    fn check_port(&self, port: usize) -> DriverResult<()> {
        if port >= self.num_ports {
            return Err(DriverError::invalid_parameter(format!(
                "port {} out of range (have {})",
                port, self.num_ports
            )));
        }
        Ok(())
    }

    fn port_code(&self, port: FabricPort) -> DriverResult<u8> {
        match port {
            FabricPort::Master => Ok(0),
            FabricPort::Slave(index) => {
                self.check_port(index)?;
                Ok(index as u8 + 1)
            }
        }
    }
}

impl SwitchDriver for LoopbackDriver {
    fn resolve_destination(&self, frame: &Frame) -> DriverResult<FabricPort> {
        let bytes = frame.as_bytes();
        let destination = match bytes {
            [.., magic, code] if *magic == TAG_MAGIC => {
                if *code == 0 {
                    FabricPort::Master
                } else {
                    FabricPort::Slave(*code as usize - 1)
                }
            }
            // Untagged traffic stays on the master attachment.
            _ => FabricPort::Master,
        };
        self.begin(DriverOp::Resolve { destination })?;
        Ok(destination)
    }

    fn tag_frame(&self, source: FabricPort, frame: Frame) -> DriverResult<Frame> {
        let code = self.port_code(source)?;
        self.begin(DriverOp::TagFrame { source })?;
        let mut bytes = frame.into_bytes();
        bytes.push(TAG_MAGIC);
        bytes.push(code);
        Ok(Frame::new(bytes))
    }

    fn switch_read(&self, reg: u16) -> DriverResult<u8> {
        let state = self.begin(DriverOp::SwitchRead { reg })?;
        Ok(state.regs.get(&reg).copied().unwrap_or(0))
    }

    fn switch_write(&self, reg: u16, value: u8) -> DriverResult<()> {
        let mut state = self.begin(DriverOp::SwitchWrite { reg, value })?;
        state.regs.insert(reg, value);
        Ok(())
    }

    fn set_mac_table_entry(
        &self,
        mac: MacAddress,
        fw_port: u8,
        index: u16,
        flags: u16,
    ) -> DriverResult<()> {
        let mut state = self.begin(DriverOp::SetMacEntry { index, fw_port })?;
        state.mac_table.insert(index, (mac, fw_port, flags));
        Ok(())
    }

    fn get_mac_table_entry(&self, index: u16) -> DriverResult<MacAddress> {
        let state = self.begin(DriverOp::GetMacEntry { index })?;
        state
            .mac_table
            .get(&index)
            .map(|(mac, _, _)| *mac)
            .ok_or_else(|| DriverError::not_found(format!("mac table entry {}", index)))
    }

    fn port_enable(&self, port: usize, link: &LinkState) -> DriverResult<()> {
        self.check_port(port)?;
        let mut state = self.begin(DriverOp::PortEnable {
            port,
            is_up: link.is_up,
        })?;
        state.enabled[port] = true;
        Ok(())
    }

    fn port_disable(&self, port: usize) -> DriverResult<()> {
        self.check_port(port)?;
        let mut state = self.begin(DriverOp::PortDisable { port })?;
        state.enabled[port] = false;
        Ok(())
    }

    fn phylink_mac_link_up(
        &self,
        port: usize,
        _mode: switchfab_types::ManagedMode,
        _speed: LinkSpeed,
        _duplex: Duplex,
        _tx_pause: bool,
        _rx_pause: bool,
    ) -> DriverResult<()> {
        self.check_port(port)?;
        self.begin(DriverOp::LinkUp { port })?;
        Ok(())
    }

    fn port_vlan_filtering(&self, port: usize, enabled: bool) -> DriverResult<()> {
        self.check_port(port)?;
        self.begin(DriverOp::VlanFiltering { port, enabled })?;
        Ok(())
    }

    fn port_vlan_add(
        &self,
        port: usize,
        vid: VlanId,
        untagged: bool,
        _pvid: bool,
    ) -> DriverResult<()> {
        self.check_port(port)?;
        let mut state = self.begin(DriverOp::VlanAdd {
            port,
            vid: vid.as_u16(),
        })?;
        state.vlans.insert((port, vid.as_u16()), untagged);
        Ok(())
    }

    fn port_vlan_del(&self, port: usize, vid: VlanId) -> DriverResult<()> {
        self.check_port(port)?;
        let mut state = self.begin(DriverOp::VlanDel {
            port,
            vid: vid.as_u16(),
        })?;
        if state.vlans.remove(&(port, vid.as_u16())).is_none() {
            return Err(DriverError::not_found(format!(
                "vlan {} on port {}",
                vid, port
            )));
        }
        Ok(())
    }

    fn port_lag_join(&self, port: usize, lag: LagDescriptor) -> DriverResult<()> {
        self.check_port(port)?;
        self.begin(DriverOp::LagJoin { port, lag })?;
        Ok(())
    }

    fn port_lag_leave(&self, port: usize, lag: LagDescriptor) -> DriverResult<()> {
        self.check_port(port)?;
        self.begin(DriverOp::LagLeave { port, lag })?;
        Ok(())
    }

    fn port_lag_change(&self, port: usize) -> DriverResult<()> {
        self.check_port(port)?;
        self.begin(DriverOp::LagChange { port })?;
        Ok(())
    }
}
