use crate::approach::Approach;
use crate::registry::Registry;
use crate::util::Interval;
use crate::VehicleId;
use smallvec::SmallVec;

/// The vehicles currently waiting near the stop line, one ordered list per
/// approach. Rebuilt from scratch on every scheduling tick; only the counts
/// drive the scheduler, the order is registry scan order.
#[derive(Clone, Debug, Default)]
pub struct ApproachQueues {
    queues: [SmallVec<[VehicleId; 8]>; 4],
}

impl ApproachQueues {
    /// Scans the registry and rebuilds all four queues: through-sublane
    /// vehicles within `detect_window` units of the intersection centre on
    /// the approach side, not yet past it.
    pub fn recompute(registry: &Registry, detect_window: f64) -> Self {
        let window = Interval::new(-detect_window, 0.0);
        let mut queues: [SmallVec<[VehicleId; 8]>; 4] = Default::default();
        for vehicle in registry.iter() {
            if vehicle.is_queue_candidate() && window.contains(vehicle.progress()) {
                queues[vehicle.approach().index()].push(vehicle.id());
            }
        }
        Self { queues }
    }

    /// The number of vehicles waiting on an approach.
    pub fn len(&self, approach: Approach) -> usize {
        self.queues[approach.index()].len()
    }

    /// The queue lengths for all four approaches in index order.
    pub fn lengths(&self) -> [usize; 4] {
        [0, 1, 2, 3].map(|i| self.queues[i].len())
    }

    /// The waiting vehicles on an approach, in registry scan order.
    pub fn ids(&self, approach: Approach) -> &[VehicleId] {
        &self.queues[approach.index()]
    }

    /// Builds queues with the given lengths and placeholder IDs. Only the
    /// counts matter to the scheduler, which is what tests exercise.
    #[cfg(test)]
    pub(crate) fn with_counts(lengths: [usize; 4]) -> Self {
        let mut queues: [SmallVec<[VehicleId; 8]>; 4] = Default::default();
        for (queue, len) in queues.iter_mut().zip(lengths) {
            queue.extend(std::iter::repeat(VehicleId::default()).take(len));
        }
        Self { queues }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_registry_yields_empty_queues() {
        let registry = Registry::new(4, 50.0);
        let queues = ApproachQueues::recompute(&registry, 400.0);
        assert_eq!(queues.lengths(), [0, 0, 0, 0]);
    }
}
