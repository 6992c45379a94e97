use crate::approach::{Approach, Axis, Sublane};
use crate::geometry;
use crate::math::{Point2d, QuadraticBezier2d};
use crate::VehicleId;

/// How a vehicle crosses the intersection. Fixed at spawn time.
#[derive(Clone, Copy, Debug)]
pub enum Route {
    /// Stay in the through sublane and cross straight.
    Through,
    /// Turn into a perpendicular approach at the intersection.
    Turn(TurnPlan),
}

/// The shape of a committed turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnKind {
    /// A sweep across the intersection along a curved path.
    Left,
    /// A two-phase straight-then-offset move into the near exit.
    Right,
}

/// A turn committed to at spawn time: where the vehicle leaves the
/// intersection, decided once so its path never flickers between exits.
#[derive(Clone, Copy, Debug)]
pub struct TurnPlan {
    pub kind: TurnKind,
    pub exit_approach: Approach,
    pub exit_sublane: Sublane,
}

/// An in-progress left turn: interpolation state along a quadratic bezier.
#[derive(Clone, Debug)]
struct TurnProgress {
    curve: QuadraticBezier2d,
    /// Curve parameter in `[0, 1]`.
    t: f64,
    /// Parameter increment per tick, derived from speed and arc length.
    step: f64,
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's slot ID.
    pub(crate) id: VehicleId,
    /// The short alphanumeric identity from the spawn request.
    ident: String,
    /// The position in world units.
    position: Point2d,
    /// The approach the vehicle is currently travelling on.
    approach: Approach,
    /// The sublane within the approach.
    sublane: Sublane,
    /// The crossing route committed to at spawn.
    route: Route,
    /// Interpolation state while a left turn is underway.
    turning: Option<TurnProgress>,
    /// Whether a committed turn has already been carried out.
    turn_done: bool,
}

impl Vehicle {
    /// Creates a new vehicle at the entry point of its approach and sublane.
    pub(crate) fn new(id: VehicleId, ident: String, approach: Approach, sublane: Sublane, route: Route) -> Self {
        Self {
            id,
            ident,
            position: geometry::entry_point(approach, sublane),
            approach,
            sublane,
            route,
            turning: None,
            turn_done: false,
        }
    }

    /// Gets the vehicle's slot ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Gets the vehicle's identity string.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// The position of the vehicle in world units.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// The approach the vehicle is currently travelling on.
    pub fn approach(&self) -> Approach {
        self.approach
    }

    /// The sublane the vehicle is currently in.
    pub fn sublane(&self) -> Sublane {
        self.sublane
    }

    /// The crossing route committed to at spawn.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The axis increment per unit of travel, +1 or -1.
    pub fn direction_sign(&self) -> f64 {
        self.approach.spec().sign
    }

    /// Whether a curved turn is underway.
    pub fn is_turning(&self) -> bool {
        self.turning.is_some()
    }

    /// Signed travel-axis distance past the intersection centre.
    pub fn progress(&self) -> f64 {
        geometry::progress(self.approach, self.position)
    }

    /// Whether this vehicle counts toward its approach queue: a through
    /// vehicle still on its own lane line.
    pub(crate) fn is_queue_candidate(&self) -> bool {
        self.sublane == Sublane::Through && self.turning.is_none()
    }

    /// Advances the vehicle along its travel axis.
    pub(crate) fn advance_straight(&mut self, distance: f64) {
        self.position = geometry::advanced(self.approach, self.position, distance);
    }

    /// Whether the vehicle is a turn-lane vehicle that has reached the
    /// intersection edge and not yet carried out its committed turn.
    pub(crate) fn at_turn_trigger(&self) -> Option<TurnPlan> {
        match (&self.route, &self.turning, self.turn_done) {
            (Route::Turn(plan), None, false) if self.progress() >= geometry::TURN_TRIGGER => {
                Some(*plan)
            }
            _ => None,
        }
    }

    /// Starts the curved sweep of a left turn.
    pub(crate) fn begin_left_turn(&mut self, plan: &TurnPlan, speed: f64) {
        let (curve, length) = geometry::left_turn_curve(
            self.approach,
            self.sublane,
            plan.exit_approach,
            plan.exit_sublane,
        );
        self.position = curve.sample(0.0);
        self.turning = Some(TurnProgress {
            curve,
            t: 0.0,
            step: speed / length,
        });
    }

    /// Whether the next advance of an in-progress turn will complete it.
    pub(crate) fn turn_would_complete(&self) -> bool {
        self.turning
            .as_ref()
            .map_or(false, |progress| progress.t + progress.step >= 1.0)
    }

    /// The progress on the exit lane at which the committed turn sets the
    /// vehicle down: the curve end for a left turn, the snap point for the
    /// second phase of a right turn.
    pub(crate) fn landing_progress(&self, plan: &TurnPlan) -> f64 {
        match &self.turning {
            Some(progress) => {
                geometry::progress(plan.exit_approach, progress.curve.sample(1.0))
            }
            None => geometry::progress(plan.exit_approach, self.position),
        }
    }

    /// Advances an in-progress left turn. Returns `true` once the turn is
    /// complete and the vehicle has adopted its exit approach and sublane.
    pub(crate) fn advance_turn(&mut self, plan: &TurnPlan) -> bool {
        let Some(progress) = self.turning.as_mut() else {
            return false;
        };
        progress.t += progress.step;
        if progress.t >= 1.0 {
            self.position = progress.curve.sample(1.0);
            self.turning = None;
            self.turn_done = true;
            self.approach = plan.exit_approach;
            self.sublane = plan.exit_sublane;
            true
        } else {
            self.position = progress.curve.sample(progress.t);
            false
        }
    }

    /// Whether a right-turning vehicle has finished its first, straight
    /// phase: inside the intersection and across its exit lane's centre
    /// line, ready to snap onto the exit approach.
    pub(crate) fn ready_for_right_snap(&self, plan: &TurnPlan) -> bool {
        if self.turn_done || self.turning.is_some() || self.progress() < geometry::TURN_TRIGGER {
            return false;
        }
        let spec = self.approach.spec();
        let exit_lateral = geometry::lane_lateral(plan.exit_approach, plan.exit_sublane);
        spec.sign * (geometry::travel_coord(self.approach, self.position) - exit_lateral) >= 0.0
    }

    /// Completes the second phase of a right turn: snap onto the exit lane
    /// and continue along the perpendicular axis.
    pub(crate) fn complete_right_turn(&mut self, plan: &TurnPlan) {
        let exit_lateral = geometry::lane_lateral(plan.exit_approach, plan.exit_sublane);
        self.position = match self.approach.spec().axis {
            Axis::X => Point2d::new(exit_lateral, self.position.y),
            Axis::Y => Point2d::new(self.position.x, exit_lateral),
        };
        self.approach = plan.exit_approach;
        self.sublane = plan.exit_sublane;
        self.turn_done = true;
    }
}
