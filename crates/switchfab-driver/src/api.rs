//! The switch-driver capability trait.

use crate::error::{DriverError, DriverResult};
use switchfab_types::{Duplex, FabricPort, Frame, LinkSpeed, LinkState, MacAddress, VlanId};

/// LAG membership descriptor handed to the driver's LAG primitives.
///
/// `id` 0 with `is_valid` false describes "no LAG"; a valid descriptor
/// always carries a non-zero id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LagDescriptor {
    /// LAG group id (0 means no LAG).
    pub id: u32,
    /// Whether the descriptor names a live group.
    pub is_valid: bool,
}

impl LagDescriptor {
    /// Descriptor for a live group.
    pub fn valid(id: u32) -> Self {
        LagDescriptor { id, is_valid: true }
    }

    /// Descriptor naming a group the port is leaving.
    pub fn leaving(id: u32) -> Self {
        LagDescriptor {
            id,
            is_valid: false,
        }
    }
}

/// The fixed operation set a hardware switch driver implements.
///
/// The fabric core invokes these operations and nothing else; everything
/// hardware-specific (register maps, tag formats, PHY handling) stays
/// behind this trait. Implementations are selected at device bring-up and
/// injected into the fabric context.
///
/// Any operation may block on a bus transaction. The fabric core never
/// holds a lock across a driver call, so implementations are free to
/// sleep.
pub trait SwitchDriver: Send + Sync {
    /// Resolves which fabric port a received frame belongs to, from the
    /// tag metadata the hardware left in the frame.
    ///
    /// The default body reports the operation as unsupported, modeling a
    /// driver that cannot classify ingress traffic. The fabric treats
    /// that as a fatal configuration error and fails open to the master.
    fn resolve_destination(&self, frame: &Frame) -> DriverResult<FabricPort> {
        let _ = frame;
        Err(DriverError::not_supported("ingress tag resolve"))
    }

    /// Produces the tagged form of a frame for transmission from the
    /// given fabric port. Consumes the buffer and returns the rewritten
    /// one.
    fn tag_frame(&self, source: FabricPort, frame: Frame) -> DriverResult<Frame>;

    /// Reads a switch register.
    fn switch_read(&self, reg: u16) -> DriverResult<u8>;

    /// Writes a switch register.
    fn switch_write(&self, reg: u16, value: u8) -> DriverResult<()>;

    /// Writes a static MAC table entry.
    fn set_mac_table_entry(
        &self,
        mac: MacAddress,
        fw_port: u8,
        index: u16,
        flags: u16,
    ) -> DriverResult<()>;

    /// Reads a static MAC table entry.
    fn get_mac_table_entry(&self, index: u16) -> DriverResult<MacAddress>;

    /// Enables a switch port with the given link parameters.
    fn port_enable(&self, port: usize, link: &LinkState) -> DriverResult<()>;

    /// Disables a switch port.
    fn port_disable(&self, port: usize) -> DriverResult<()>;

    /// Configures the MAC side of a port's link.
    #[allow(clippy::too_many_arguments)]
    fn phylink_mac_link_up(
        &self,
        port: usize,
        mode: switchfab_types::ManagedMode,
        speed: LinkSpeed,
        duplex: Duplex,
        tx_pause: bool,
        rx_pause: bool,
    ) -> DriverResult<()>;

    /// Enables or disables VLAN filtering on a port.
    fn port_vlan_filtering(&self, port: usize, enabled: bool) -> DriverResult<()>;

    /// Adds a port to a VLAN.
    fn port_vlan_add(
        &self,
        port: usize,
        vid: VlanId,
        untagged: bool,
        pvid: bool,
    ) -> DriverResult<()>;

    /// Removes a port from a VLAN.
    fn port_vlan_del(&self, port: usize, vid: VlanId) -> DriverResult<()>;

    /// Joins a port to a LAG.
    fn port_lag_join(&self, port: usize, lag: LagDescriptor) -> DriverResult<()>;

    /// Removes a port from a LAG.
    fn port_lag_leave(&self, port: usize, lag: LagDescriptor) -> DriverResult<()>;

    /// Notifies the driver that a port's LAG assignment changed.
    ///
    /// Device-level notification only; the new assignment is read back
    /// through the fabric's LAG table, so no descriptor travels with it.
    fn port_lag_change(&self, port: usize) -> DriverResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lag_descriptor_constructors() {
        let live = LagDescriptor::valid(7);
        assert_eq!(live.id, 7);
        assert!(live.is_valid);

        let gone = LagDescriptor::leaving(7);
        assert_eq!(gone.id, 7);
        assert!(!gone.is_valid);

        let none = LagDescriptor::default();
        assert_eq!(none.id, 0);
        assert!(!none.is_valid);
    }

    #[test]
    fn test_default_resolve_is_unsupported() {
        struct TagOnly;

        impl SwitchDriver for TagOnly {
            fn tag_frame(&self, _source: FabricPort, frame: Frame) -> DriverResult<Frame> {
                Ok(frame)
            }
            fn switch_read(&self, _reg: u16) -> DriverResult<u8> {
                Ok(0)
            }
            fn switch_write(&self, _reg: u16, _value: u8) -> DriverResult<()> {
                Ok(())
            }
            fn set_mac_table_entry(
                &self,
                _mac: MacAddress,
                _fw_port: u8,
                _index: u16,
                _flags: u16,
            ) -> DriverResult<()> {
                Ok(())
            }
            fn get_mac_table_entry(&self, _index: u16) -> DriverResult<MacAddress> {
                Ok(MacAddress::ZERO)
            }
            fn port_enable(&self, _port: usize, _link: &LinkState) -> DriverResult<()> {
                Ok(())
            }
            fn port_disable(&self, _port: usize) -> DriverResult<()> {
                Ok(())
            }
            fn phylink_mac_link_up(
                &self,
                _port: usize,
                _mode: switchfab_types::ManagedMode,
                _speed: LinkSpeed,
                _duplex: Duplex,
                _tx_pause: bool,
                _rx_pause: bool,
            ) -> DriverResult<()> {
                Ok(())
            }
            fn port_vlan_filtering(&self, _port: usize, _enabled: bool) -> DriverResult<()> {
                Ok(())
            }
            fn port_vlan_add(
                &self,
                _port: usize,
                _vid: VlanId,
                _untagged: bool,
                _pvid: bool,
            ) -> DriverResult<()> {
                Ok(())
            }
            fn port_vlan_del(&self, _port: usize, _vid: VlanId) -> DriverResult<()> {
                Ok(())
            }
            fn port_lag_join(&self, _port: usize, _lag: LagDescriptor) -> DriverResult<()> {
                Ok(())
            }
            fn port_lag_leave(&self, _port: usize, _lag: LagDescriptor) -> DriverResult<()> {
                Ok(())
            }
            fn port_lag_change(&self, _port: usize) -> DriverResult<()> {
                Ok(())
            }
        }

        let driver = TagOnly;
        let err = driver
            .resolve_destination(&Frame::from(&[0u8; 4][..]))
            .unwrap_err();
        assert!(matches!(err, DriverError::NotSupported { .. }));
    }
}
