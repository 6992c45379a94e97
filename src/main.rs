use itertools::Itertools;
use junction_sim::{
    start_workers, Approach, FeedReader, LightState, RuntimeConfig, SimConfig, Simulation,
};
use log::info;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Headless driver: runs the simulation workers against the vehicle feed
/// and periodically logs a snapshot summary in place of a renderer.
fn main() {
    env_logger::init();

    let feed_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vehicles.data".to_owned());
    info!("polling vehicle feed at {}", feed_path);

    let sim = Arc::new(Mutex::new(Simulation::new(SimConfig::default())));
    // Workers run until process shutdown; the handles are never joined.
    let _workers = match start_workers(
        Arc::clone(&sim),
        FeedReader::new(&feed_path),
        RuntimeConfig::default(),
    ) {
        Ok(workers) => workers,
        Err(err) => {
            eprintln!("failed to start simulation workers: {err}");
            std::process::exit(1);
        }
    };

    loop {
        thread::sleep(Duration::from_secs(1));
        let snapshot = sim.lock().expect("simulation lock poisoned").snapshot();

        let by_approach = snapshot
            .vehicles
            .iter()
            .counts_by(|vehicle| vehicle.approach);
        let lights = Approach::ALL
            .map(|a| match snapshot.signals.light(a) {
                LightState::Green => format!("{}=G", a.letter()),
                LightState::Red => format!("{}=R", a.letter()),
            })
            .join(" ");
        info!(
            "frame {}: {} active ({} waiting), lights {}",
            snapshot.frame,
            snapshot.vehicles.len(),
            snapshot.signals.queues.iter().sum::<usize>(),
            lights,
        );
        for approach in Approach::ALL {
            if let Some(count) = by_approach.get(&approach) {
                info!("  approach {}: {} vehicles", approach.letter(), count);
            }
        }
    }
}
