//! LAG membership table.
//!
//! Per-port state machine: `Unassigned -> Assigned(lag_id) -> Unassigned`.
//! The table holds a fixed pool of live LAG ids (slot value 0 = free) and
//! one assignment per port. Two invariants hold after every operation:
//! the pool contains no duplicate non-zero ids, and every valid port
//! assignment names an id present in the pool.
//!
//! Mutation is serialized through the context-scoped mutex; the driver
//! primitive is invoked after the lock is released, since bus
//! transactions may block.

use tracing::{debug, instrument};

use crate::context::FabricContext;
use crate::error::{FabricError, FabricResult};
use switchfab_driver::LagDescriptor;
use switchfab_types::LagId;

/// Fixed-capacity LAG bookkeeping for one fabric.
///
/// Pool capacity equals the port count: each port can hold at most one
/// assignment, so more live groups than ports can never be referenced.
#[derive(Debug)]
pub(crate) struct LagTable {
    /// Live LAG ids; 0 marks a free slot.
    ids: Vec<u32>,
    /// Per-port assignment.
    ports: Vec<LagDescriptor>,
}

impl LagTable {
    pub(crate) fn new(num_ports: usize) -> Self {
        LagTable {
            ids: vec![0; num_ports],
            ports: vec![LagDescriptor::default(); num_ports],
        }
    }

    /// Finds `id` in the pool, or claims the first free slot for it.
    fn claim(&mut self, id: u32) -> FabricResult<()> {
        if self.ids.iter().any(|&slot| slot == id) {
            return Ok(());
        }
        match self.ids.iter_mut().find(|slot| **slot == 0) {
            Some(slot) => {
                *slot = id;
                Ok(())
            }
            None => Err(FabricError::LagCapacity {
                capacity: self.ids.len(),
            }),
        }
    }

    /// Frees the pool slot for `id` if no port references it anymore.
    fn release_if_unreferenced(&mut self, id: u32) {
        let referenced = self
            .ports
            .iter()
            .any(|assignment| assignment.is_valid && assignment.id == id);
        if referenced {
            return;
        }
        if let Some(slot) = self.ids.iter_mut().find(|slot| **slot == id) {
            *slot = 0;
        }
    }

    fn join(&mut self, port: usize, id: u32) -> FabricResult<LagDescriptor> {
        self.claim(id)?;

        let previous = self.ports[port];
        let assignment = LagDescriptor::valid(id);
        self.ports[port] = assignment;

        // A port re-joining while already assigned elsewhere implicitly
        // drops its old membership; reclaim the old id if it was the
        // last reference, so the pool never holds a dangling id.
        if previous.is_valid && previous.id != id {
            self.release_if_unreferenced(previous.id);
        }
        Ok(assignment)
    }

    fn leave(&mut self, port: usize, id: u32) -> FabricResult<LagDescriptor> {
        let assignment = self.ports[port];
        if !assignment.is_valid {
            return Err(FabricError::NoLagAssignment { port });
        }
        if assignment.id != id {
            return Err(FabricError::LagMismatch { port, lag: id });
        }

        self.ports[port] = LagDescriptor::default();
        // Last member out reclaims the id.
        self.release_if_unreferenced(id);
        Ok(LagDescriptor::leaving(id))
    }

    fn change(&mut self, port: usize, new_id: u32) -> FabricResult<()> {
        let assignment = self.ports[port];
        if !assignment.is_valid {
            return Err(FabricError::NoLagAssignment { port });
        }
        let old_id = assignment.id;
        if old_id == new_id {
            // Relabel to the id already held: table state is unchanged,
            // the driver is still notified.
            return Ok(());
        }

        // If this port is the last member of its old group, that slot is
        // about to free up; account for it so a full pool can still swap
        // ids in place. On capacity failure the table is untouched.
        let old_last_member = !self
            .ports
            .iter()
            .enumerate()
            .any(|(p, a)| p != port && a.is_valid && a.id == old_id);
        let new_is_live = self.ids.iter().any(|&slot| slot == new_id);
        let has_free_slot = self.ids.iter().any(|&slot| slot == 0);
        if !new_is_live && !has_free_slot && !old_last_member {
            return Err(FabricError::LagCapacity {
                capacity: self.ids.len(),
            });
        }

        self.ports[port] = LagDescriptor::valid(new_id);
        self.release_if_unreferenced(old_id);
        // Cannot fail: either the id is live, a slot was free, or the
        // old slot was just reclaimed.
        self.claim(new_id)?;
        Ok(())
    }

    /// Live (non-zero) pool ids, for inspection.
    pub(crate) fn live_ids(&self) -> Vec<u32> {
        self.ids.iter().copied().filter(|&id| id != 0).collect()
    }

    pub(crate) fn assignment(&self, port: usize) -> Option<u32> {
        let assignment = self.ports.get(port)?;
        assignment.is_valid.then_some(assignment.id)
    }

    /// True if the pool still has a slot holding `id`.
    pub(crate) fn holds(&self, id: u32) -> bool {
        id != 0 && self.ids.iter().any(|&slot| slot == id)
    }
}

impl FabricContext {
    /// Joins `port` to the LAG `lag`, claiming a pool slot if the group
    /// is new. Fails with out-of-capacity when the pool is full and the
    /// id is not already live.
    #[instrument(skip(self), fields(device = %self.device()))]
    pub fn lag_join(&self, port: usize, lag: LagId) -> FabricResult<()> {
        self.check_port(port)?;

        let descriptor = {
            let mut table = self.lock_lag();
            table.join(port, lag.as_u32())?
        };

        debug!(port, %lag, "port joined LAG");
        self.driver().port_lag_join(port, descriptor)?;
        Ok(())
    }

    /// Removes `port` from the LAG `lag`.
    ///
    /// A port may only leave the group it is actually in; anything else
    /// is a not-supported condition. The pool slot is reclaimed when the
    /// last member leaves.
    #[instrument(skip(self), fields(device = %self.device()))]
    pub fn lag_leave(&self, port: usize, lag: LagId) -> FabricResult<()> {
        self.check_port(port)?;

        let descriptor = {
            let mut table = self.lock_lag();
            table.leave(port, lag.as_u32())?
        };

        debug!(port, %lag, "port left LAG");
        self.driver().port_lag_leave(port, descriptor)?;
        Ok(())
    }

    /// Moves `port` from its current LAG to `lag` in one step.
    ///
    /// Precondition: the port must currently hold a valid assignment,
    /// checked against the port's own membership rather than the target id.
    /// The old id is reclaimed if the port was its last member. The
    /// driver receives a device-level change notification only.
    #[instrument(skip(self), fields(device = %self.device()))]
    pub fn lag_change(&self, port: usize, lag: LagId) -> FabricResult<()> {
        self.check_port(port)?;

        {
            let mut table = self.lock_lag();
            table.change(port, lag.as_u32())?;
        }

        debug!(port, %lag, "port LAG assignment changed");
        self.driver().port_lag_change(port)?;
        Ok(())
    }

    /// Returns the current LAG assignment of `port`, if any.
    pub fn lag_assignment(&self, port: usize) -> FabricResult<Option<LagId>> {
        self.check_port(port)?;
        let table = self.lock_lag();
        Ok(table.assignment(port).and_then(|id| LagId::new(id).ok()))
    }

    /// Returns the live LAG ids currently held in the pool.
    pub fn live_lag_ids(&self) -> Vec<u32> {
        self.lock_lag().live_ids()
    }

    /// Returns true if `lag` currently occupies a pool slot.
    pub fn lag_is_live(&self, lag: LagId) -> bool {
        self.lock_lag().holds(lag.as_u32())
    }

    fn lock_lag(&self) -> std::sync::MutexGuard<'_, LagTable> {
        // Poisoning would mean a panic inside the scan-and-mutate
        // sequence, which contains no panicking operations.
        self.lag.lock().expect("LAG table lock poisoned")
    }
}
