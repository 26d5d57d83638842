//! Process-wide entry points for sensor pipelines that hold no context.
//!
//! [`init`] loads the device calibration once; [`correct`] corrects samples
//! through the shared corrector. Calls are serialized by a mutex, so the
//! pipeline may call from any thread.

use crate::config::CalibrationPaths;
use crate::corrector::AlsCorrector;
use log::{debug, warn};
use std::sync::{Mutex, MutexGuard, OnceLock};

static CORRECTOR: OnceLock<Mutex<AlsCorrector>> = OnceLock::new();

/// Load the device calibration from the default locations.
///
/// Only the first call has an effect; later calls are ignored.
pub fn init() {
    init_with(&CalibrationPaths::default());
}

/// Load the calibration from `paths`.
///
/// Only the first call has an effect; later calls are ignored.
pub fn init_with(paths: &CalibrationPaths) {
    let mut initialized = false;
    CORRECTOR.get_or_init(|| {
        initialized = true;
        Mutex::new(AlsCorrector::init(paths))
    });
    if !initialized {
        debug!("ALS correction already initialized");
    }
}

/// Correct `light` in place with the shared corrector.
///
/// Leaves `light` unchanged if [`init`] has not been called.
pub fn correct(light: &mut f32) {
    match CORRECTOR.get() {
        Some(corrector) => lock(corrector).correct(light),
        None => warn!("ALS correction used before init, reading left as is"),
    }
}

// The corrector holds plain scalars, so a panic mid-correction cannot leave
// it inconsistent.
fn lock(corrector: &Mutex<AlsCorrector>) -> MutexGuard<'_, AlsCorrector> {
    corrector
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
