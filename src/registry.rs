use crate::approach::{Approach, Sublane};
use crate::geometry;
use crate::vehicle::{Route, TurnKind, TurnPlan, Vehicle};
use crate::{VehicleId, VehicleSet};
use log::debug;
use rand::Rng;

/// Why a spawn request was not honoured. Every rejection is a silent drop
/// at the registry boundary; none is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnRejected {
    /// The pool has no free slot.
    PoolExhausted,
    /// The requested sublane is reserved as a turn destination.
    ReservedSublane,
    /// A vehicle with the same identity is still active.
    DuplicateId,
    /// Another vehicle occupies the entry point within the following gap.
    EntryBlocked,
}

/// The pool of vehicle records. Slots are reused as vehicles exit; the
/// capacity is fixed at construction and never grows.
pub struct Registry {
    vehicles: VehicleSet,
    capacity: usize,
    min_gap: f64,
}

impl Registry {
    /// Creates an empty registry with the given slot capacity and minimum
    /// following gap in world units.
    pub fn new(capacity: usize, min_gap: f64) -> Self {
        Self {
            vehicles: VehicleSet::with_capacity_and_key(capacity),
            capacity,
            min_gap,
        }
    }

    /// Attempts to place a new vehicle at the entry point of the given
    /// approach. A missing sublane is resolved to a random spawnable one;
    /// a turn-lane vehicle's exit is sampled here, once, so its path is
    /// fixed for its whole life.
    pub fn spawn(
        &mut self,
        ident: &str,
        approach: Approach,
        sublane: Option<Sublane>,
        rng: &mut impl Rng,
    ) -> Result<VehicleId, SpawnRejected> {
        let sublane = sublane.unwrap_or_else(|| {
            if rng.gen_bool(0.5) {
                Sublane::Through
            } else {
                Sublane::Turn
            }
        });
        if !sublane.is_spawn_point() {
            return Err(SpawnRejected::ReservedSublane);
        }
        if self.vehicles.len() >= self.capacity {
            return Err(SpawnRejected::PoolExhausted);
        }
        if self.vehicles.values().any(|v| v.ident() == ident) {
            return Err(SpawnRejected::DuplicateId);
        }

        let entry = geometry::entry_point(approach, sublane);
        let entry_progress = geometry::progress(approach, entry);
        let blocked = self.vehicles.values().any(|v| {
            v.approach() == approach
                && v.sublane() == sublane
                && (v.progress() - entry_progress).abs() < self.min_gap
        });
        if blocked {
            return Err(SpawnRejected::EntryBlocked);
        }

        let route = match sublane {
            Sublane::Turn => {
                let kind = if rng.gen_bool(0.5) {
                    TurnKind::Left
                } else {
                    TurnKind::Right
                };
                let exit_approach = match kind {
                    TurnKind::Left => approach.left_exit(),
                    TurnKind::Right => approach.right_exit(),
                };
                let exit_sublane = if rng.gen_bool(0.5) {
                    Sublane::Inner
                } else {
                    Sublane::Through
                };
                Route::Turn(TurnPlan {
                    kind,
                    exit_approach,
                    exit_sublane,
                })
            }
            _ => Route::Through,
        };

        let id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, ident.to_owned(), approach, sublane, route));
        debug!(
            "spawned vehicle {} on approach {} sublane {}",
            ident,
            approach.letter(),
            sublane.index()
        );
        Ok(id)
    }

    /// Releases a vehicle's slot for reuse.
    pub fn release(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(id)
    }

    /// The number of active vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the registry holds no active vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The fixed slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gets a reference to an active vehicle.
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// Gets a mutable reference to an active vehicle.
    pub(crate) fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    /// Iterates over all active vehicles in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Collects the active vehicle IDs in registry order.
    pub(crate) fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.keys().collect()
    }
}
