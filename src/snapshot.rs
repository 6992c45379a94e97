//! Read-only state snapshots consumed by the presentation side.
//!
//! The simulation core never exposes mutation through these types; a
//! renderer (or the headless driver) takes a [Snapshot] under the shared
//! lock and draws from it at its leisure.

use crate::approach::Approach;
use crate::scheduler::LightState;
use crate::vehicle::Vehicle;
use serde::{Deserialize, Serialize};

/// Display colours keyed by approach, RGB.
const APPROACH_COLOURS: [[u8; 3]; 4] = [
    [255, 0, 0],   // WestEast
    [0, 255, 0],   // EastWest
    [0, 0, 255],   // NorthSouth
    [255, 255, 0], // SouthNorth
];

/// One active vehicle, as the presentation side sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub approach: Approach,
    pub sublane: u8,
    pub colour: [u8; 3],
}

impl VehicleSnapshot {
    pub(crate) fn of(vehicle: &Vehicle) -> Self {
        let position = vehicle.position();
        Self {
            id: vehicle.ident().to_owned(),
            x: position.x,
            y: position.y,
            approach: vehicle.approach(),
            sublane: vehicle.sublane().index(),
            colour: APPROACH_COLOURS[vehicle.approach().index()],
        }
    }
}

/// The four signal states and queue sizes, indexed by [Approach::index].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub lights: [LightState; 4],
    pub queues: [usize; 4],
}

impl SignalSnapshot {
    /// The light state for an approach.
    pub fn light(&self, approach: Approach) -> LightState {
        self.lights[approach.index()]
    }
}

/// A consistent view of the whole simulation at one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: usize,
    pub vehicles: Vec<VehicleSnapshot>,
    pub signals: SignalSnapshot,
}
