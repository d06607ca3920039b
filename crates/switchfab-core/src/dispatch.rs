//! Switch configuration dispatch.
//!
//! Thin pass-throughs from the fabric context to the driver capability.
//! Each operation resolves the driver and forwards its arguments
//! unchanged; the only logic added here is the slave-port bounds check
//! and the default link descriptor for [`FabricContext::port_enable`].

use crate::context::FabricContext;
use crate::error::FabricResult;
use switchfab_types::{Duplex, LinkSpeed, LinkState, MacAddress, ManagedMode, VlanId};

impl FabricContext {
    /// Reads a switch register.
    pub fn switch_read(&self, reg: u16) -> FabricResult<u8> {
        Ok(self.driver().switch_read(reg)?)
    }

    /// Writes a switch register.
    pub fn switch_write(&self, reg: u16, value: u8) -> FabricResult<()> {
        Ok(self.driver().switch_write(reg, value)?)
    }

    /// Writes a static MAC table entry.
    pub fn set_mac_table_entry(
        &self,
        mac: MacAddress,
        fw_port: u8,
        index: u16,
        flags: u16,
    ) -> FabricResult<()> {
        Ok(self
            .driver()
            .set_mac_table_entry(mac, fw_port, index, flags)?)
    }

    /// Reads a static MAC table entry.
    pub fn get_mac_table_entry(&self, index: u16) -> FabricResult<MacAddress> {
        Ok(self.driver().get_mac_table_entry(index)?)
    }

    /// Enables a switch port with common-sense link defaults
    /// (1 Gb/s, full duplex, link up).
    pub fn port_enable(&self, port: usize) -> FabricResult<()> {
        self.port_enable_with(port, &LinkState::DEFAULT_UP)
    }

    /// Enables a switch port with an explicit link descriptor.
    pub fn port_enable_with(&self, port: usize, link: &LinkState) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self.driver().port_enable(port, link)?)
    }

    /// Disables a switch port.
    pub fn port_disable(&self, port: usize) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self.driver().port_disable(port)?)
    }

    /// Configures the MAC side of a port's link.
    pub fn phylink_mac_link_up(
        &self,
        port: usize,
        mode: ManagedMode,
        speed: LinkSpeed,
        duplex: Duplex,
        tx_pause: bool,
        rx_pause: bool,
    ) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self
            .driver()
            .phylink_mac_link_up(port, mode, speed, duplex, tx_pause, rx_pause)?)
    }

    /// Enables or disables VLAN filtering on a port.
    pub fn port_vlan_filtering(&self, port: usize, enabled: bool) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self.driver().port_vlan_filtering(port, enabled)?)
    }

    /// Adds a port to a VLAN.
    pub fn port_vlan_add(
        &self,
        port: usize,
        vid: VlanId,
        untagged: bool,
        pvid: bool,
    ) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self.driver().port_vlan_add(port, vid, untagged, pvid)?)
    }

    /// Removes a port from a VLAN.
    pub fn port_vlan_del(&self, port: usize, vid: VlanId) -> FabricResult<()> {
        self.check_port(port)?;
        Ok(self.driver().port_vlan_del(port, vid)?)
    }
}
