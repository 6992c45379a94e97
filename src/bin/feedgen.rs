use junction_sim::Approach;
use log::info;
use rand::rngs::ThreadRng;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use std::fs;
use std::thread;
use std::time::Duration;

/// How often the feed file is rewritten.
const REWRITE_INTERVAL: Duration = Duration::from_secs(2);

/// Mean number of arrivals per rewrite.
const MEAN_ARRIVALS: f64 = 2.5;

/// The external vehicle feed producer: periodically truncates and rewrites
/// the feed file with a fresh batch of `id:approach[:sublane]` records.
/// The simulator tolerates reading mid-rewrite, so no locking is needed.
fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vehicles.data".to_owned());
    let mut rng = rand::thread_rng();
    let arrivals = Poisson::new(MEAN_ARRIVALS).expect("invalid arrival rate");

    loop {
        let count = (arrivals.sample(&mut rng) as usize).max(1);
        let mut batch = String::new();
        for _ in 0..count {
            let id = random_ident(&mut rng);
            let approach = Approach::ALL[rng.gen_range(0..4)];
            // Roughly half the records name a sublane; the rest leave the
            // choice to the simulator.
            if rng.gen_bool(0.5) {
                let sublane = if rng.gen_bool(0.5) { 2 } else { 3 };
                batch.push_str(&format!("{}:{}:{}\n", id, approach.letter(), sublane));
            } else {
                batch.push_str(&format!("{}:{}\n", id, approach.letter()));
            }
        }

        match fs::write(&path, &batch) {
            Ok(()) => info!("wrote {} records to {}", count, path),
            Err(err) => eprintln!("error writing {}: {}", path, err),
        }
        thread::sleep(REWRITE_INTERVAL);
    }
}

/// Generates a registration-plate style identity: two letters, a digit,
/// two letters, three digits.
fn random_ident(rng: &mut ThreadRng) -> String {
    let letter = |rng: &mut ThreadRng| (b'A' + rng.gen_range(0..26)) as char;
    let digit = |rng: &mut ThreadRng| (b'0' + rng.gen_range(0..10)) as char;
    [
        letter(rng),
        letter(rng),
        digit(rng),
        letter(rng),
        letter(rng),
        digit(rng),
        digit(rng),
        digit(rng),
    ]
    .iter()
    .collect()
}
