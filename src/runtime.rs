//! The worker threads driving a shared simulation.
//!
//! Three cadences contend for one mutex-guarded state blob: the motion
//! tick, the slower signal-scheduling interval, and the vehicle feed poll.
//! Critical sections are short, so momentary blocking on the lock is fine;
//! a missed motion deadline degrades smoothness, not correctness.

use crate::feed::FeedReader;
use crate::simulation::Simulation;
use log::{debug, info};
use std::io;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The shared simulation state. One mutex serialises every reader and
/// writer; each operation holds it for its whole critical section.
pub type SharedSimulation = Arc<Mutex<Simulation>>;

/// The cadences of the three workers.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Period of the motion tick.
    pub tick: Duration,
    /// Period of the signal-scheduling tick.
    pub control_interval: Duration,
    /// Period of the vehicle feed poll.
    pub feed_poll: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
            control_interval: Duration::from_secs(1),
            feed_poll: Duration::from_secs(1),
        }
    }
}

/// Starts the motion, control and feed workers. The workers loop until
/// process shutdown; the handles never join. Failing to start any worker
/// is fatal, before any of them has touched the state.
pub fn start_workers(
    sim: SharedSimulation,
    feed: FeedReader,
    config: RuntimeConfig,
) -> io::Result<Vec<JoinHandle<()>>> {
    let motion = {
        let sim = Arc::clone(&sim);
        thread::Builder::new().name("motion".into()).spawn(move || loop {
            sim.lock().expect("simulation lock poisoned").step();
            thread::sleep(config.tick);
        })?
    };

    let control = {
        let sim = Arc::clone(&sim);
        thread::Builder::new().name("control".into()).spawn(move || loop {
            sim.lock().expect("simulation lock poisoned").control_tick();
            thread::sleep(config.control_interval);
        })?
    };

    let feed_worker = thread::Builder::new().name("feed".into()).spawn(move || loop {
        // Parse outside the lock; only the spawns need the critical section.
        let batch = feed.poll();
        if !batch.is_empty() {
            let mut sim = sim.lock().expect("simulation lock poisoned");
            for request in &batch {
                if let Err(rejected) = sim.spawn(request) {
                    debug!("spawn of {} rejected: {:?}", request.id, rejected);
                }
            }
        }
        thread::sleep(config.feed_poll);
    })?;

    info!("motion, control and feed workers started");
    Ok(vec![motion, control, feed_worker])
}
