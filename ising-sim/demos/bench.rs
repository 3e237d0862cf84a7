use std::sync::atomic::AtomicBool;
use std::time::Instant;

use ising_sim::{run_scan, ScanConfig, TemperatureRange};

const L: i64 = 64;
const N_TEMPS: usize = 32;
const STEPS_PER_SAMPLE: usize = (L * L) as usize;
const SAMPLES: usize = 200;

fn main() {
    let config = ScanConfig {
        lattice_size: L,
        temperatures: TemperatureRange::new(1.0, 3.5, N_TEMPS),
        steps_per_sample: STEPS_PER_SAMPLE,
        samples_per_temperature: SAMPLES,
        seed: 42,
        sequential: false,
    };

    println!(
        "Lattice: {}x{}  |  Temps: {}  |  Steps/sample: {}  |  Samples: {}",
        L, L, N_TEMPS, STEPS_PER_SAMPLE, SAMPLES
    );
    println!("{}", "-".repeat(70));

    let interrupted = AtomicBool::new(false);
    let t0 = Instant::now();
    let runs = run_scan(&config, &interrupted, &|| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();

    let total_steps = (N_TEMPS * STEPS_PER_SAMPLE * SAMPLES) as f64;
    println!(
        "Total: {:.3} s  |  {:.2} ns/step  |  {} temperatures",
        elapsed,
        elapsed / total_steps * 1e9,
        runs.len()
    );
}
