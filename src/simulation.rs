use crate::approach::{Approach, Sublane};
use crate::feed::SpawnRequest;
use crate::geometry;
use crate::queue::ApproachQueues;
use crate::registry::{Registry, SpawnRejected};
use crate::scheduler::{LightState, SignalController};
use crate::snapshot::{SignalSnapshot, Snapshot, VehicleSnapshot};
use crate::util::Interval;
use crate::vehicle::{Route, TurnKind, TurnPlan, Vehicle};
use crate::VehicleId;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The tunable parameters of a simulation. Distances are in world units,
/// durations in ticks of the relevant cadence.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Fixed capacity of the vehicle pool.
    pub capacity: usize,
    /// Distance a vehicle advances per motion tick.
    pub speed: f64,
    /// Minimum following gap between vehicles sharing a lane.
    pub min_gap: f64,
    /// Length of the stop-distance window behind the stop line.
    pub stop_window: f64,
    /// Detection distance from the intersection centre for queue membership.
    pub detect_window: f64,
    /// Queue length above which an approach preempts the signal rotation.
    pub priority_threshold: usize,
    /// The approach favoured when overloaded queues tie.
    pub priority_approach: Approach,
    /// Control ticks an approach may hold green before reevaluation.
    pub rotation_cap: u32,
    /// Whether the lights start green instead of red.
    pub start_green: bool,
    /// Seed for the RNG driving spawn-time route choices.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            speed: 2.0,
            min_gap: geometry::VEHICLE_LENGTH + 10.0,
            stop_window: 60.0,
            detect_window: 600.0,
            priority_threshold: 5,
            priority_approach: Approach::WestEast,
            rotation_cap: 10,
            start_green: false,
            seed: 0,
        }
    }
}

/// The intersection simulation: the vehicle pool, the four signals and the
/// approach queues, advanced by two independent cadences — [step](Self::step)
/// for motion and [control_tick](Self::control_tick) for signal scheduling.
pub struct Simulation {
    config: SimConfig,
    registry: Registry,
    signals: SignalController,
    queues: ApproachQueues,
    rng: StdRng,
    frame: usize,
}

impl Simulation {
    /// Creates a simulation with no vehicles.
    pub fn new(config: SimConfig) -> Self {
        Self {
            registry: Registry::new(config.capacity, config.min_gap),
            signals: SignalController::new(
                config.start_green,
                config.priority_threshold,
                config.priority_approach,
                config.rotation_cap,
            ),
            queues: ApproachQueues::default(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            frame: 0,
        }
    }

    /// The configuration the simulation was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The current motion frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Issues a spawn request. Rejections are expected under load and are
    /// reported, not raised.
    pub fn spawn(&mut self, request: &SpawnRequest) -> Result<VehicleId, SpawnRejected> {
        self.registry
            .spawn(&request.id, request.approach, request.sublane, &mut self.rng)
    }

    /// Gets a reference to an active vehicle.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.registry.get(id)
    }

    /// Iterates over all active vehicles in registry order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.registry.iter()
    }

    /// The number of active vehicles.
    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// The light state of an approach.
    pub fn light(&self, approach: Approach) -> LightState {
        self.signals.state(approach)
    }

    /// Overrides one approach's light. Intended for scenario tooling; the
    /// next control tick reasserts the scheduling policy.
    pub fn set_light(&mut self, approach: Approach, state: LightState) {
        self.signals.set_state(approach, state);
    }

    /// The queue length last recomputed for an approach.
    pub fn queue_len(&self, approach: Approach) -> usize {
        self.queues.len(approach)
    }

    /// Runs one control tick: rebuild the approach queues from the registry,
    /// then let the scheduler reallocate right-of-way.
    pub fn control_tick(&mut self) {
        self.queues = ApproachQueues::recompute(&self.registry, self.config.detect_window);
        self.signals.decide(&self.queues);
    }

    /// Advances every active vehicle by one motion tick, in registry order.
    pub fn step(&mut self) {
        for id in self.registry.ids() {
            self.step_vehicle(id);
        }
        self.frame += 1;
    }

    /// Takes a consistent, read-only view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let vehicles = self
            .registry
            .iter()
            .map(VehicleSnapshot::of)
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .collect();
        Snapshot {
            frame: self.frame,
            vehicles,
            signals: SignalSnapshot {
                lights: self.signals.states(),
                queues: self.queues.lengths(),
            },
        }
    }

    /// Moves a single vehicle through the per-tick decision ladder:
    /// turn interpolation, merge clearance, car-following, signal gating,
    /// straight advance, turn trigger, exit.
    fn step_vehicle(&mut self, id: VehicleId) {
        let Some(vehicle) = self.registry.get(id) else {
            return;
        };
        let route = *vehicle.route();

        // A curved turn in progress owns the vehicle's motion for the tick.
        // Its final step commits only once the landing point is clear.
        if vehicle.is_turning() {
            let Route::Turn(plan) = route else {
                return;
            };
            if self.blocked_by_leader(vehicle) {
                return;
            }
            if vehicle.turn_would_complete() && self.merge_blocked(vehicle, &plan) {
                return;
            }
            if let Some(vehicle) = self.registry.get_mut(id) {
                vehicle.advance_turn(&plan);
            }
            return;
        }

        // A right-turner across its exit lane's centre line merges before
        // it moves again, and only once the landing point is clear.
        if let Route::Turn(plan) = route {
            if plan.kind == TurnKind::Right && vehicle.ready_for_right_snap(&plan) {
                if self.merge_blocked(vehicle, &plan) {
                    return;
                }
                if let Some(vehicle) = self.registry.get_mut(id) {
                    vehicle.complete_right_turn(&plan);
                }
            }
        }

        let Some(vehicle) = self.registry.get(id) else {
            return;
        };
        if self.blocked_by_leader(vehicle) {
            return;
        }
        if self.held_at_signal(vehicle) {
            return;
        }

        let speed = self.config.speed;
        let Some(vehicle) = self.registry.get_mut(id) else {
            return;
        };
        vehicle.advance_straight(speed);

        if let Some(plan) = vehicle.at_turn_trigger() {
            if plan.kind == TurnKind::Left {
                vehicle.begin_left_turn(&plan, speed);
                return;
            }
        }

        if geometry::is_beyond_exit(vehicle.approach(), vehicle.position()) {
            if let Some(exited) = self.registry.release(id) {
                debug!("vehicle {} exited the simulation", exited.ident());
            }
        }
    }

    /// Car-following: whether advancing this tick could close to within the
    /// minimum following gap of a vehicle ahead in the same approach and
    /// sublane. The leader is assumed static, since it may be held itself.
    /// A linear scan per vehicle; quadratic per tick, fine at this scale.
    fn blocked_by_leader(&self, vehicle: &Vehicle) -> bool {
        let own = vehicle.progress();
        self.registry.iter().any(|other| {
            if other.id() == vehicle.id()
                || other.approach() != vehicle.approach()
                || other.sublane() != vehicle.sublane()
            {
                return false;
            }
            let gap = other.progress() - own;
            gap > 0.0 && gap - self.config.speed < self.config.min_gap
        })
    }

    /// Merge clearance: whether the turn's landing point on its exit lane
    /// is within the minimum following gap of a vehicle already there. The
    /// same scan the registry applies to an entry point at spawn; a blocked
    /// turn holds where it is until the lane clears.
    fn merge_blocked(&self, vehicle: &Vehicle, plan: &TurnPlan) -> bool {
        let landing = vehicle.landing_progress(plan);
        self.registry.iter().any(|other| {
            other.id() != vehicle.id()
                && other.approach() == plan.exit_approach
                && other.sublane() == plan.exit_sublane
                && (other.progress() - landing).abs() < self.config.min_gap
        })
    }

    /// Signal gating: a through vehicle inside the stop-distance window is
    /// held while its approach's light is red. Vehicles already past the
    /// stop line are never held.
    fn held_at_signal(&self, vehicle: &Vehicle) -> bool {
        if vehicle.sublane() != Sublane::Through {
            return false;
        }
        if self.signals.is_green(vehicle.approach()) {
            return false;
        }
        let window = Interval::new(
            geometry::STOP_LINE - self.config.stop_window,
            geometry::STOP_LINE,
        );
        window.contains(vehicle.progress())
    }
}
