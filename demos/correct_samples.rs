//! Example: Correct lux readings with the device calibration.
//!
//! Run with: `cargo run --example correct_samples -- 120 350 900`

use als_correction::{AlsCorrector, CalibrationPaths};

fn main() {
    // Initialize logging (optional)
    env_logger::init();

    // Optional overrides for running off-device
    let mut paths = CalibrationPaths::default();
    if let Ok(dir) = std::env::var("ALS_PERSIST_DIR") {
        paths = paths.with_persist_dir(dir);
    }
    if let Ok(dir) = std::env::var("ALS_BACKLIGHT_DIR") {
        paths = paths.with_backlight_dir(dir);
    }

    let mut corrector = AlsCorrector::init(&paths);
    let profile = corrector.profile();
    println!(
        "Calibration: max_lux={}, cali_coe={}, max_brightness={}{}",
        profile.max_lux(),
        profile.cali_coe,
        profile.max_brightness,
        if profile.is_enabled() { "" } else { " (disabled)" }
    );

    for arg in std::env::args().skip(1) {
        let light: f32 = match arg.parse() {
            Ok(light) => light,
            Err(e) => {
                eprintln!("Skipping {:?}: {}", arg, e);
                continue;
            }
        };
        let trace = corrector.correct_traced(light);
        println!(
            "{:>10.2} -> {:>10.2}  (light_frac={:.4}, correction={:.4}, brightness={})",
            trace.light, trace.corrected, trace.light_frac, trace.correction, trace.brightness
        );
    }
}
