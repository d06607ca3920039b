//! End-to-end fabric behavior over the loopback driver.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use switchfab_core::{route_ingress, transmit, FabricConfig, FabricContext, Iface, MasterTxFn};
use switchfab_driver::{LoopbackDriver, SwitchDriver};
use switchfab_types::{FabricPort, Frame, LagId};

type Wire = Arc<Mutex<Vec<Vec<u8>>>>;

fn capturing_tx(wire: Wire) -> MasterTxFn {
    Box::new(move |_, frame| {
        wire.lock().unwrap().push(frame.into_bytes());
        Ok(())
    })
}

fn bring_up(ports: usize) -> (Arc<FabricContext>, Arc<LoopbackDriver>, Arc<Iface>, Wire) {
    let config = FabricConfig::with_port_count("switch0", "eth0", ports);
    let driver = Arc::new(LoopbackDriver::new(ports));
    let fabric = FabricContext::new(&config, driver.clone()).unwrap();
    let master = Iface::master("eth0");
    let wire: Wire = Arc::new(Mutex::new(Vec::new()));
    fabric
        .attach_master(Arc::clone(&master), capturing_tx(wire.clone()))
        .unwrap();
    (fabric, driver, master, wire)
}

fn lag(id: u32) -> LagId {
    LagId::new(id).unwrap()
}

/// Registry lookup with three configured ports: index 1 resolves, index 5
/// does not.
#[test]
fn registry_lookup_with_three_ports() {
    let (fabric, _driver, master, _wire) = bring_up(3);

    assert_eq!(fabric.num_slave_ports(), 3);
    assert!(master.is_master());

    let port1 = fabric.slave_port(1).unwrap();
    assert_eq!(port1.slave_index(), Some(1));
    assert!(fabric.slave_port(5).is_none());
}

/// Routing determinism: a fixed tag always lands on the same port when
/// no filter rejects it.
#[test]
fn ingress_routing_is_deterministic() {
    let (fabric, driver, master, _wire) = bring_up(3);

    let frame = driver
        .tag_frame(FabricPort::Slave(2), Frame::from(&[0u8; 60][..]))
        .unwrap();
    let expected = fabric.slave_port(2).unwrap();

    for _ in 0..10 {
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &expected));
    }
}

/// Filter override: an always-reject filter forces every frame for that
/// port back to the master, regardless of what the tag said.
#[test]
fn rejecting_filter_always_wins() {
    let (fabric, driver, master, _wire) = bring_up(3);
    let port = fabric.slave_port(0).unwrap();
    port.register_recv_filter(Box::new(|_, _| false)).unwrap();

    for _ in 0..5 {
        let frame = driver
            .tag_frame(FabricPort::Slave(0), Frame::from(&[7u8; 32][..]))
            .unwrap();
        let target = route_ingress(&master, &frame);
        assert!(Arc::ptr_eq(&target, &master));
    }
}

/// Tag round-trip law: egress tagging followed by ingress resolve
/// recovers the source port, for every valid port index.
#[test]
fn egress_then_ingress_recovers_source_port() {
    let (fabric, driver, master, wire) = bring_up(4);

    for index in 0..4 {
        let port = fabric.slave_port(index).unwrap();
        transmit(&port, Frame::from(&[index as u8; 16][..])).unwrap();

        let on_wire = Frame::new(wire.lock().unwrap().pop().unwrap());
        assert_eq!(
            driver.resolve_destination(&on_wire).unwrap(),
            FabricPort::Slave(index)
        );

        let target = route_ingress(&master, &on_wire);
        assert!(Arc::ptr_eq(&target, &port));
    }
}

/// Shared slot and last-member-out reclaim across two ports.
#[test]
fn lag_shared_slot_and_reclaim() {
    let (fabric, _driver, _master, _wire) = bring_up(3);

    fabric.lag_join(0, lag(10)).unwrap();
    fabric.lag_join(1, lag(10)).unwrap();
    assert_eq!(fabric.live_lag_ids(), vec![10]);

    fabric.lag_leave(0, lag(10)).unwrap();
    assert!(fabric.lag_is_live(lag(10)), "port 1 is still a member");

    fabric.lag_leave(1, lag(10)).unwrap();
    assert!(!fabric.lag_is_live(lag(10)), "slot freed after last leave");
    assert_eq!(fabric.live_lag_ids(), Vec::<u32>::new());
}

/// Leaving a LAG the port never joined is a not-supported condition.
#[test]
fn lag_leave_without_membership_is_not_supported() {
    let (fabric, driver, _master, _wire) = bring_up(3);

    let err = fabric.lag_leave(2, lag(99)).unwrap_err();
    assert!(err.is_not_supported());
    assert_eq!(err.status(), -2);
    assert!(driver.journal().is_empty(), "driver never invoked");
}

/// Pool invariants hold across an arbitrary join/leave/change sequence.
#[test]
fn lag_pool_stays_consistent() {
    let (fabric, _driver, _master, _wire) = bring_up(4);

    fabric.lag_join(0, lag(7)).unwrap();
    fabric.lag_join(1, lag(7)).unwrap();
    fabric.lag_join(2, lag(9)).unwrap();
    fabric.lag_change(2, lag(7)).unwrap();
    fabric.lag_leave(0, lag(7)).unwrap();
    fabric.lag_join(3, lag(11)).unwrap();
    fabric.lag_leave(1, lag(7)).unwrap();

    let mut live = fabric.live_lag_ids();
    live.sort_unstable();
    let mut deduped = live.clone();
    deduped.dedup();
    assert_eq!(live, deduped, "no duplicate live ids");
    assert_eq!(live, vec![7, 11]);

    // Every valid assignment references a live id.
    for port in 0..4 {
        if let Some(id) = fabric.lag_assignment(port).unwrap() {
            assert!(fabric.lag_is_live(id));
        }
    }
}

/// Driver LAG primitives receive the resolved descriptors.
#[test]
fn lag_driver_primitives_see_descriptors() {
    use switchfab_driver::{DriverOp, LagDescriptor};

    let (fabric, driver, _master, _wire) = bring_up(2);
    fabric.lag_join(0, lag(5)).unwrap();
    fabric.lag_leave(0, lag(5)).unwrap();

    assert_eq!(
        driver.journal(),
        vec![
            DriverOp::LagJoin {
                port: 0,
                lag: LagDescriptor::valid(5)
            },
            DriverOp::LagLeave {
                port: 0,
                lag: LagDescriptor::leaving(5)
            },
        ]
    );
}

/// Transmit on a slave port with no master attached fails with
/// no-master-interface and reaches no driver operation.
#[test]
fn slave_transmit_without_master_fails_closed() {
    let config = FabricConfig::with_port_count("switch0", "eth0", 2);
    let driver = Arc::new(LoopbackDriver::new(2));
    let fabric = FabricContext::new(&config, driver.clone()).unwrap();

    let port = fabric.slave_port(1).unwrap();
    let err = transmit(&port, Frame::from(&[0u8; 8][..])).unwrap_err();

    assert_eq!(err.to_string(), "no master interface");
    assert_eq!(err.status(), -7);
    assert!(driver.journal().is_empty());
}

/// Full bring-up sequence: config, context, master attach, port enable,
/// then traffic in both directions.
#[test]
fn full_bring_up_and_traffic_pass() {
    let yaml = "
device: switch0
master: eth0
slave_ports:
  - name: lan1
  - name: lan2
  - name: lan3
";
    let config = FabricConfig::from_yaml_str(yaml).unwrap();
    let driver = Arc::new(LoopbackDriver::new(config.num_slave_ports()));
    let fabric = FabricContext::new(&config, driver.clone()).unwrap();

    let master = Iface::master("eth0");
    let wire: Wire = Arc::new(Mutex::new(Vec::new()));
    fabric
        .attach_master(Arc::clone(&master), capturing_tx(wire.clone()))
        .unwrap();

    for port in 0..fabric.num_slave_ports() {
        fabric.port_enable(port).unwrap();
        assert!(driver.is_port_enabled(port));
    }

    // Egress on lan2.
    let lan2 = fabric.slave_port(1).unwrap();
    assert_eq!(lan2.name(), "lan2");
    transmit(&lan2, Frame::from(&[0xde, 0xad][..])).unwrap();

    // The tagged frame comes back in on the master and lands on lan2.
    let on_wire = Frame::new(wire.lock().unwrap().pop().unwrap());
    let target = route_ingress(&master, &on_wire);
    assert!(Arc::ptr_eq(&target, &lan2));
}
