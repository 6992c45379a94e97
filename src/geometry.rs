//! Pure lane and intersection geometry.
//!
//! All of the per-approach arithmetic is driven by the [ApproachSpec] table
//! so the same code serves all four entry sides.

use crate::approach::{Approach, ApproachSpec, Axis, Sublane};
use crate::math::{Point2d, QuadraticBezier2d};

/// The extent of the simulated world along the x axis, in world units.
pub const WORLD_WIDTH: f64 = 1280.0;

/// The extent of the simulated world along the y axis, in world units.
pub const WORLD_HEIGHT: f64 = 720.0;

/// The width of a single sublane.
pub const LANE_WIDTH: f64 = 30.0;

/// Half the width of a road; each approach owns three sublanes on its side.
pub const HALF_ROAD: f64 = 3.0 * LANE_WIDTH;

/// The length of a vehicle, used for exit margins and the following gap.
pub const VEHICLE_LENGTH: f64 = 40.0;

/// The stop line, in progress units: just before the intersection edge.
pub const STOP_LINE: f64 = -(HALF_ROAD + 10.0);

/// The progress at which a turn-lane vehicle begins its committed turn.
pub const TURN_TRIGGER: f64 = -HALF_ROAD;

/// Number of chords used to approximate a turn curve's arc length.
const CURVE_LENGTH_SAMPLES: usize = 32;

/// The extent of the world along the given travel axis.
fn axis_extent(axis: Axis) -> f64 {
    match axis {
        Axis::X => WORLD_WIDTH,
        Axis::Y => WORLD_HEIGHT,
    }
}

/// The centre of the world along the given travel axis.
fn axis_centre(axis: Axis) -> f64 {
    0.5 * axis_extent(axis)
}

/// The world coordinate of a sublane's centre line on the axis
/// perpendicular to the approach's direction of travel.
pub fn lane_lateral(approach: Approach, sublane: Sublane) -> f64 {
    let spec = approach.spec();
    let perpendicular = match spec.axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    };
    let offset = (sublane.index() as f64 - 0.5) * LANE_WIDTH;
    axis_centre(perpendicular) + spec.lateral_sign * offset
}

/// Builds the world point at the given travel-axis coordinate in a sublane.
pub fn point_at(approach: Approach, sublane: Sublane, travel: f64) -> Point2d {
    let lateral = lane_lateral(approach, sublane);
    match approach.spec().axis {
        Axis::X => Point2d::new(travel, lateral),
        Axis::Y => Point2d::new(lateral, travel),
    }
}

/// The coordinate of a point along an approach's travel axis.
pub fn travel_coord(approach: Approach, point: Point2d) -> f64 {
    match approach.spec().axis {
        Axis::X => point.x,
        Axis::Y => point.y,
    }
}

/// Signed distance a point has travelled past the intersection centre along
/// an approach; negative while still approaching.
pub fn progress(approach: Approach, point: Point2d) -> f64 {
    let spec = approach.spec();
    spec.sign * (travel_coord(approach, point) - axis_centre(spec.axis))
}

/// The geometric entry point at the simulation boundary for a spawn.
pub fn entry_point(approach: Approach, sublane: Sublane) -> Point2d {
    let spec = approach.spec();
    let travel = if spec.sign > 0.0 {
        0.0
    } else {
        axis_extent(spec.axis)
    };
    point_at(approach, sublane, travel)
}

/// Whether a point has crossed the far simulation boundary of an approach.
pub fn is_beyond_exit(approach: Approach, point: Point2d) -> bool {
    let spec = approach.spec();
    progress(approach, point) > 0.5 * axis_extent(spec.axis) + VEHICLE_LENGTH
}

/// Moves a point by `distance` along an approach's signed travel axis.
pub fn advanced(approach: Approach, point: Point2d, distance: f64) -> Point2d {
    let spec = approach.spec();
    let delta = spec.sign * distance;
    match spec.axis {
        Axis::X => Point2d::new(point.x + delta, point.y),
        Axis::Y => Point2d::new(point.x, point.y + delta),
    }
}

/// Builds the curved path of a left turn: a quadratic bezier from the entry
/// lane at the intersection edge to the exit lane at the opposite edge, with
/// the control point at the corner where the two lane centre lines cross,
/// biased toward the intersection centre.
///
/// Returns the curve and its approximate arc length.
pub fn left_turn_curve(
    from: Approach,
    from_sublane: Sublane,
    exit: Approach,
    exit_sublane: Sublane,
) -> (QuadraticBezier2d, f64) {
    let from_spec: &ApproachSpec = from.spec();
    let exit_spec: &ApproachSpec = exit.spec();

    let start_travel = axis_centre(from_spec.axis) - from_spec.sign * HALF_ROAD;
    let start = point_at(from, from_sublane, start_travel);

    let end_travel = axis_centre(exit_spec.axis) + exit_spec.sign * HALF_ROAD;
    let end = point_at(exit, exit_sublane, end_travel);

    let control = match from_spec.axis {
        Axis::X => Point2d::new(lane_lateral(exit, exit_sublane), start.y),
        Axis::Y => Point2d::new(start.x, lane_lateral(exit, exit_sublane)),
    };

    let curve = QuadraticBezier2d::new(&[start, control, end]);
    let length = curve.approx_length(CURVE_LENGTH_SAMPLES);
    (curve, length)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn entry_points_sit_on_the_boundary() {
        let west = entry_point(Approach::WestEast, Sublane::Through);
        assert_approx_eq!(west.x, 0.0);
        assert_approx_eq!(west.y, 0.5 * WORLD_HEIGHT + 1.5 * LANE_WIDTH);

        let east = entry_point(Approach::EastWest, Sublane::Through);
        assert_approx_eq!(east.x, WORLD_WIDTH);
        assert_approx_eq!(east.y, 0.5 * WORLD_HEIGHT - 1.5 * LANE_WIDTH);

        let north = entry_point(Approach::NorthSouth, Sublane::Turn);
        assert_approx_eq!(north.y, 0.0);
        assert_approx_eq!(north.x, 0.5 * WORLD_WIDTH - 2.5 * LANE_WIDTH);

        let south = entry_point(Approach::SouthNorth, Sublane::Inner);
        assert_approx_eq!(south.y, WORLD_HEIGHT);
        assert_approx_eq!(south.x, 0.5 * WORLD_WIDTH + 0.5 * LANE_WIDTH);
    }

    #[test]
    fn progress_is_negative_at_entry_and_zero_at_centre() {
        for approach in Approach::ALL {
            let entry = entry_point(approach, Sublane::Through);
            assert!(progress(approach, entry) < 0.0);

            let spec = approach.spec();
            let centre = point_at(approach, Sublane::Through, axis_centre(spec.axis));
            assert_approx_eq!(progress(approach, centre), 0.0);
        }
    }

    #[test]
    fn advancing_increases_progress_on_every_approach() {
        for approach in Approach::ALL {
            let entry = entry_point(approach, Sublane::Turn);
            let moved = advanced(approach, entry, 10.0);
            assert_approx_eq!(progress(approach, moved) - progress(approach, entry), 10.0);
        }
    }

    #[test]
    fn exits_trigger_only_past_the_far_boundary() {
        let approach = Approach::EastWest;
        let entry = entry_point(approach, Sublane::Through);
        assert!(!is_beyond_exit(approach, entry));
        let far = advanced(approach, entry, WORLD_WIDTH + 2.0 * VEHICLE_LENGTH);
        assert!(is_beyond_exit(approach, far));
    }

    #[test]
    fn left_turn_curve_joins_the_two_lanes() {
        let (curve, length) = left_turn_curve(
            Approach::WestEast,
            Sublane::Turn,
            Approach::SouthNorth,
            Sublane::Inner,
        );
        let start = curve.sample(0.0);
        let end = curve.sample(1.0);

        // Starts at the intersection edge in the entry lane.
        assert_approx_eq!(start.x, 0.5 * WORLD_WIDTH - HALF_ROAD);
        assert_approx_eq!(start.y, lane_lateral(Approach::WestEast, Sublane::Turn));

        // Ends at the opposite edge in the exit lane, heading north.
        assert_approx_eq!(end.x, lane_lateral(Approach::SouthNorth, Sublane::Inner));
        assert_approx_eq!(end.y, 0.5 * WORLD_HEIGHT - HALF_ROAD);

        assert!(length > 0.0);
    }
}
