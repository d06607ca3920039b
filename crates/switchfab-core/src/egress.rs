//! Egress tagging: logical port transmit -> physical master link.
//!
//! The master's visible transmit entry point is this wrapper; the
//! original transmit function was saved at registration time
//! ([`FabricContext::attach_master`](crate::FabricContext::attach_master))
//! and is only ever reached through here, after the driver has stamped
//! the frame with the tag that names its source port.

use std::sync::Arc;

use tracing::error;

use crate::error::{FabricError, FabricResult};
use crate::iface::Iface;
use switchfab_types::{FabricPort, Frame};

/// Transmits a frame from a fabric interface.
///
/// For the master, the frame is tagged for the physical link and handed
/// to the saved original transmit function. For a slave port, the frame
/// is tagged with the port's identity and delivered through the master's
/// saved transmit function. The underlying transmit result is returned
/// verbatim; nothing is swallowed.
pub fn transmit(source: &Arc<Iface>, frame: Frame) -> FabricResult<()> {
    let fabric = source
        .fabric()
        .ok_or_else(|| FabricError::not_attached(source.name()))?;

    if source.is_master() {
        let tx = source.master_tx().ok_or(FabricError::TxNotRegistered)?;
        let tagged = fabric.driver().tag_frame(FabricPort::Master, frame)?;
        return tx(source, tagged).map_err(FabricError::from);
    }

    let index = source
        .slave_index()
        .ok_or_else(|| FabricError::not_fabric_port(source.name()))?;

    // No master attachment means nowhere to deliver; fail before any
    // driver work is done.
    let Some(master) = fabric.master() else {
        error!(device = %fabric.device(), "no master interface");
        return Err(FabricError::NoMasterInterface);
    };
    let tx = master.master_tx().ok_or(FabricError::TxNotRegistered)?;

    let tagged = fabric.driver().tag_frame(FabricPort::Slave(index), frame)?;
    tx(&master, tagged).map_err(FabricError::from)
}
