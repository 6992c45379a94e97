use crate::approach::Approach;
use crate::queue::ApproachQueues;
use log::info;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// The state of one approach's signal. There is no intermediate amber
/// phase; switching is instantaneous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightState {
    Green,
    Red,
}

/// The signal scheduler: decides, once per control interval, which approach
/// receives right-of-way.
///
/// The policy is a priority-weighted rotation with a starvation override:
/// an approach whose queue exceeds the priority threshold preempts the
/// rotation immediately, otherwise the largest non-empty queue is served
/// until it drains or the rotation cap elapses. The controller never
/// faults; any uncovered condition keeps the prior state.
pub struct SignalController {
    /// The current light states, indexed by [Approach::index].
    lights: [LightState; 4],
    /// The approach currently holding green, if any.
    served: Option<Approach>,
    /// Control ticks since the served approach last changed.
    ticks_in_state: u32,
    /// Queue length above which an approach preempts the rotation.
    priority_threshold: usize,
    /// The approach favoured when overloaded queues tie.
    priority_approach: Approach,
    /// Control ticks an approach may hold green before reevaluation.
    rotation_cap: u32,
}

impl SignalController {
    /// Creates a controller with every light red (or green, per
    /// `start_green`) and no approach served.
    pub fn new(
        start_green: bool,
        priority_threshold: usize,
        priority_approach: Approach,
        rotation_cap: u32,
    ) -> Self {
        let initial = if start_green {
            LightState::Green
        } else {
            LightState::Red
        };
        Self {
            lights: [initial; 4],
            served: None,
            ticks_in_state: 0,
            priority_threshold,
            priority_approach,
            rotation_cap,
        }
    }

    /// The light state of an approach.
    pub fn state(&self, approach: Approach) -> LightState {
        self.lights[approach.index()]
    }

    /// The light states of all four approaches in index order.
    pub fn states(&self) -> [LightState; 4] {
        self.lights
    }

    /// Whether an approach currently holds green.
    pub fn is_green(&self, approach: Approach) -> bool {
        self.state(approach) == LightState::Green
    }

    /// The approach currently being served, if any.
    pub fn served(&self) -> Option<Approach> {
        self.served
    }

    /// Overrides one approach's light without touching the rotation state.
    /// Intended for scenario tooling; the next [decide](Self::decide) call
    /// reasserts the policy.
    pub fn set_state(&mut self, approach: Approach, state: LightState) {
        self.lights[approach.index()] = state;
    }

    /// Runs one step of the scheduling policy against freshly recomputed
    /// queues.
    pub fn decide(&mut self, queues: &ApproachQueues) {
        self.ticks_in_state += 1;
        let expired = self.ticks_in_state > self.rotation_cap;

        // Starvation override: an overloaded approach preempts the rotation.
        // A green that has outlived the rotation cap cannot re-grant itself
        // here, but other overloaded approaches still take precedence, with
        // the same tie-break.
        let overloaded = Approach::ALL
            .iter()
            .copied()
            .filter(|a| queues.len(*a) > self.priority_threshold)
            .filter(|a| !(expired && self.served == Some(*a)))
            .max_by_key(|a| {
                (
                    queues.len(*a),
                    *a == self.priority_approach,
                    Reverse(a.index()),
                )
            });
        if let Some(approach) = overloaded {
            self.grant(approach);
            return;
        }

        let drained = self.served.map_or(true, |a| queues.len(a) == 0);
        if drained || expired {
            // Serve the largest non-empty queue; lowest index wins ties.
            let best = Approach::ALL
                .iter()
                .copied()
                .filter(|a| queues.len(*a) > 0)
                .max_by_key(|a| (queues.len(*a), Reverse(a.index())));
            match best {
                Some(approach) => self.grant(approach),
                None => self.idle(),
            }
        }
        // Otherwise: within the rotation deadline with a non-empty queue;
        // hold the current state.
    }

    /// Sets the approach green and all others red. The rotation timer only
    /// resets when the served approach actually changes.
    fn grant(&mut self, approach: Approach) {
        for other in Approach::ALL {
            self.lights[other.index()] = if other == approach {
                LightState::Green
            } else {
                LightState::Red
            };
        }
        if self.served != Some(approach) {
            info!("signal: green granted to approach {}", approach.letter());
            self.served = Some(approach);
            self.ticks_in_state = 0;
        }
    }

    /// Sets every light red with no approach served.
    fn idle(&mut self) {
        self.lights = [LightState::Red; 4];
        if self.served.take().is_some() {
            info!("signal: all queues empty, idling all-red");
            self.ticks_in_state = 0;
        }
    }
}
