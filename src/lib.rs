pub use approach::{Approach, ApproachSpec, Axis, Sublane};
pub use feed::{FeedReader, SpawnRequest};
pub use queue::ApproachQueues;
pub use registry::{Registry, SpawnRejected};
pub use runtime::{start_workers, RuntimeConfig, SharedSimulation};
pub use scheduler::{LightState, SignalController};
pub use simulation::{SimConfig, Simulation};
pub use slotmap::{Key, KeyData};
pub use snapshot::{SignalSnapshot, Snapshot, VehicleSnapshot};
pub use vehicle::{Route, TurnKind, TurnPlan, Vehicle};

use slotmap::{new_key_type, SlotMap};

mod approach;
mod feed;
pub mod geometry;
pub mod math;
mod queue;
mod registry;
mod runtime;
mod scheduler;
mod simulation;
mod snapshot;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
