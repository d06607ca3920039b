//! Ingress redirection: master receive -> logical slave port.
//!
//! Every frame arriving on the physical master attachment carries tag
//! metadata the hardware left behind. The redirector asks the driver
//! which fabric port owns the tag, applies the optional per-port receive
//! filter, and hands back the interface the frame should be delivered
//! on. Dropping a frame is worse than mis-routing it to the master for
//! normal-stack handling, so every failure path here fails open.

use std::sync::Arc;

use tracing::{error, warn};

use crate::iface::Iface;
use switchfab_types::{FabricPort, Frame};

/// Decides which interface should receive a frame that arrived on the
/// master attachment.
///
/// Returns the chosen interface; when redirection is impossible for any
/// reason the master itself is returned, so the frame is treated as a
/// plain Ethernet receive.
pub fn route_ingress(master: &Arc<Iface>, frame: &Frame) -> Arc<Iface> {
    // No fabric context bound: plain Ethernet receive.
    let Some(fabric) = master.fabric() else {
        return Arc::clone(master);
    };

    let destination = match fabric.driver().resolve_destination(frame) {
        Ok(destination) => destination,
        Err(err) => {
            // A fabric driver that cannot classify ingress traffic is a
            // configuration error; deliver to the master rather than
            // dropping the frame.
            error!(
                device = %fabric.device(),
                "no ingress tag resolve operation: {}", err
            );
            return Arc::clone(master);
        }
    };

    let candidate = match destination {
        FabricPort::Master => Arc::clone(master),
        FabricPort::Slave(index) => match fabric.slave_port(index) {
            Some(iface) => iface,
            None => {
                warn!(
                    device = %fabric.device(),
                    index,
                    "tag resolved to unknown slave port"
                );
                return Arc::clone(master);
            }
        },
    };

    if !candidate.is_fabric_port() {
        // Invalid candidates are handed back as-is, not errored.
        return candidate;
    }

    match candidate.recv_filter() {
        // Filter accepts: deliver on the candidate.
        Some(filter) if filter(&candidate, frame) => candidate,
        // Filter rejects: fall back to the master's upper-layer stack.
        Some(_) => Arc::clone(master),
        None => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FabricConfig;
    use crate::context::FabricContext;
    use switchfab_driver::{LoopbackDriver, SwitchDriver};

    fn bring_up(ports: usize) -> (Arc<FabricContext>, Arc<LoopbackDriver>, Arc<Iface>) {
        let config = FabricConfig::with_port_count("switch0", "eth0", ports);
        let driver = Arc::new(LoopbackDriver::new(ports));
        let fabric = FabricContext::new(&config, driver.clone()).unwrap();

        let master = Iface::master("eth0");
        fabric
            .attach_master(Arc::clone(&master), Box::new(|_, _| Ok(())))
            .unwrap();
        (fabric, driver, master)
    }

    fn tagged_for(driver: &LoopbackDriver, port: FabricPort) -> Frame {
        driver
            .tag_frame(port, Frame::from(&[0u8; 64][..]))
            .unwrap()
    }

    #[test]
    fn test_routes_to_resolved_port() {
        let (fabric, driver, master) = bring_up(3);

        for index in 0..3 {
            let frame = tagged_for(&driver, FabricPort::Slave(index));
            let target = route_ingress(&master, &frame);
            assert!(Arc::ptr_eq(&target, &fabric.slave_port(index).unwrap()));
        }
    }

    #[test]
    fn test_master_tag_stays_on_master() {
        let (_fabric, driver, master) = bring_up(2);
        let frame = tagged_for(&driver, FabricPort::Master);
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &master));
    }

    #[test]
    fn test_plain_iface_is_not_redirected() {
        let plain = Iface::master("eth5"); // master-capable but never attached
        let frame = Frame::from(&[0u8; 64][..]);
        let target = route_ingress(&plain, &frame);
        assert!(Arc::ptr_eq(&target, &plain));
    }

    #[test]
    fn test_filter_accept_keeps_candidate() {
        let (fabric, driver, master) = bring_up(2);
        let port = fabric.slave_port(0).unwrap();
        port.register_recv_filter(Box::new(|_, _| true)).unwrap();

        let frame = tagged_for(&driver, FabricPort::Slave(0));
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &port));
    }

    #[test]
    fn test_filter_reject_falls_back_to_master() {
        let (fabric, driver, master) = bring_up(2);
        let port = fabric.slave_port(1).unwrap();
        port.register_recv_filter(Box::new(|_, _| false)).unwrap();

        let frame = tagged_for(&driver, FabricPort::Slave(1));
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &master));
    }

    #[test]
    fn test_unknown_slave_index_fails_open() {
        // Driver knows 4 ports but only 2 are registered with the fabric.
        let config = FabricConfig::with_port_count("switch0", "eth0", 2);
        let driver = Arc::new(LoopbackDriver::new(4));
        let fabric = FabricContext::new(&config, driver.clone()).unwrap();
        let master = Iface::master("eth0");
        fabric
            .attach_master(Arc::clone(&master), Box::new(|_, _| Ok(())))
            .unwrap();

        let frame = tagged_for(&driver, FabricPort::Slave(3));
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &master));
    }
}
