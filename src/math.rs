//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// A quadratic bezier curve
#[derive(Copy, Clone, Debug)]
pub struct QuadraticBezier2d {
    points: [Point2d; 3],
}

impl QuadraticBezier2d {
    pub const fn new(points: &[Point2d; 3]) -> Self {
        Self { points: *points }
    }

    /// Samples the curve at the parameter `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Point2d {
        let t1 = 1.0 - t;
        Point2d::from_vec(
            t1 * t1 * self.points[0].to_vec()
                + 2.0 * t1 * t * self.points[1].to_vec()
                + t * t * self.points[2].to_vec(),
        )
    }

    /// Samples the curve's derivative at the parameter `t`.
    pub fn sample_dt(&self, t: f64) -> Vector2d {
        let t1 = 1.0 - t;
        -2.0 * t1 * self.points[0].to_vec()
            + (2.0 - 4.0 * t) * self.points[1].to_vec()
            + 2.0 * t * self.points[2].to_vec()
    }

    /// Approximates the arc length of the curve by sampling `samples` chords.
    pub fn approx_length(&self, samples: usize) -> f64 {
        let step = 1.0 / samples as f64;
        let mut length = 0.0;
        let mut prev = self.sample(0.0);
        for i in 1..=samples {
            let next = self.sample(i as f64 * step);
            length += prev.distance(next);
            prev = next;
        }
        length
    }
}
