//! Screen-bleed correction of raw lux samples.

use crate::calibration::CalibrationProfile;
use crate::config::CalibrationPaths;
use crate::screen::{BrightnessSource, ScreenColor, ScreenColorProvider};
use crate::state::CorrectorState;
use crate::system::{PropertyColorProvider, SysfsBacklight, SystemProperties};
use log::{debug, trace};

/// Largest share of a reading attributed to the screen.
pub const MAX_LIGHT_FRAC: f32 = 0.65;

/// Share removed when the computed fraction is negative (unstable).
pub const UNSTABLE_LIGHT_FRAC: f32 = 0.1;

/// Correction below which the exponent depends on brightness alone.
const LOW_BLEED: f32 = 0.1;

/// Every intermediate of one correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionTrace {
    /// The raw reading.
    pub light: f32,
    /// The reading after correction.
    pub corrected: f32,
    /// Screen color used.
    pub color: ScreenColor,
    /// Backlight level used.
    pub brightness: i32,
    /// Backlight level as a fraction of its ceiling.
    pub frac: f32,
    /// Estimated share of the lux budget caused by the displayed color.
    pub correction: f32,
    /// Exponent applied to `frac`.
    pub exp: f32,
    /// `frac` raised to `exp`.
    pub brightness_factor: f32,
    /// Share of the reading removed, in `0.0..=0.65`.
    pub light_frac: f32,
    /// Smallest color channel.
    pub rgb_min: u8,
    /// Mean color intensity. Reported only, not part of the formula.
    pub rgb_avg: f32,
}

/// Correct one reading against a calibration profile.
///
/// Returns the input unchanged when the profile is disabled. Otherwise the
/// result lies in `0.35 * light..=light` for non-negative input.
///
/// # Example
///
/// ```
/// use als_correction::{CalibrationProfile, ScreenColor, compute};
///
/// let profile = CalibrationProfile {
///     red_max_lux: 100,
///     green_max_lux: 100,
///     blue_max_lux: 100,
///     white_max_lux: 50,
///     ..Default::default()
/// };
/// let trace = compute(&profile, 200.0, ScreenColor::new(255, 255, 255), 255);
/// assert_eq!(trace.light_frac, 0.65);
/// approx::assert_abs_diff_eq!(trace.corrected, 70.0, epsilon = 1e-3);
/// ```
pub fn compute(
    profile: &CalibrationProfile,
    light: f32,
    color: ScreenColor,
    brightness: i32,
) -> CorrectionTrace {
    let mut trace = CorrectionTrace {
        light,
        corrected: light,
        color,
        brightness,
        frac: 0.0,
        correction: 0.0,
        exp: 0.0,
        brightness_factor: 0.0,
        light_frac: 0.0,
        rgb_min: 0,
        rgb_avg: 0.0,
    };

    let max_lux = profile.max_lux();
    if max_lux <= 0 {
        return trace;
    }
    let max_lux = max_lux as f32;
    let over_budget = light > max_lux;

    let frac = brightness as f32 / profile.max_brightness as f32;
    let mut light_frac = if over_budget { 1.0 } else { light / max_lux };

    let rgb_min = color.min();
    let rgb_avg = color.avg();

    let mut correction = 0.0f32;
    correction += f32::from(rgb_min) / 255.0 * profile.white_max_lux as f32;
    correction += f32::from(color.r) / 255.0 * profile.red_max_lux as f32;
    correction += f32::from(color.g) / 255.0 * profile.green_max_lux as f32;
    correction += f32::from(color.b) / 255.0 * profile.blue_max_lux as f32;
    correction += profile.als_bias as f32;
    correction /= max_lux;

    light_frac = light_frac * profile.coe_frac() + light_frac * correction.powf(0.2);

    let exp = if correction < LOW_BLEED {
        1.2 - frac.powf(0.05)
    } else {
        1.2 - (correction * frac).powf(0.2)
    };
    let brightness_factor = frac.powf(exp);
    light_frac *= brightness_factor;

    if over_budget {
        light_frac -= (light - max_lux) / max_lux;
    }

    // A negative or undefined fraction would brighten the reading.
    light_frac = if light_frac > MAX_LIGHT_FRAC {
        MAX_LIGHT_FRAC
    } else if light_frac < 0.0 || light_frac.is_nan() {
        UNSTABLE_LIGHT_FRAC
    } else {
        light_frac
    };

    trace.corrected = light * (1.0 - light_frac);
    trace.frac = frac;
    trace.correction = correction;
    trace.exp = exp;
    trace.brightness_factor = brightness_factor;
    trace.light_frac = light_frac;
    trace.rgb_min = rgb_min;
    trace.rgb_avg = rgb_avg;
    trace
}

/// Corrects raw lux samples for light leaking from the display.
///
/// Owns the calibration, the per-sample state and the collaborators that
/// report screen color and backlight level.
///
/// # Example
///
/// ```
/// use als_correction::{AlsCorrector, CalibrationProfile, MockScreen, ScreenColor};
/// use std::sync::Arc;
///
/// let profile = CalibrationProfile {
///     red_max_lux: 100,
///     green_max_lux: 100,
///     blue_max_lux: 100,
///     white_max_lux: 50,
///     ..Default::default()
/// };
/// let screen = Arc::new(MockScreen::new(ScreenColor::new(0, 0, 0), 255));
/// let mut corrector = AlsCorrector::new(profile, screen.clone(), screen);
///
/// let mut light = 70.0;
/// corrector.correct(&mut light);
/// approx::assert_abs_diff_eq!(light, 56.0, epsilon = 1e-3);
/// ```
pub struct AlsCorrector {
    profile: CalibrationProfile,
    state: CorrectorState,
    screen: Box<dyn ScreenColorProvider>,
    backlight: Box<dyn BrightnessSource>,
}

impl AlsCorrector {
    /// Create a corrector from an already loaded profile.
    pub fn new(
        profile: CalibrationProfile,
        screen: impl ScreenColorProvider + 'static,
        backlight: impl BrightnessSource + 'static,
    ) -> Self {
        Self {
            profile,
            state: CorrectorState::new(),
            screen: Box::new(screen),
            backlight: Box::new(backlight),
        }
    }

    /// Load the calibration from `paths` and wire up the system
    /// collaborators: color from system properties, level from sysfs.
    pub fn init(paths: &CalibrationPaths) -> Self {
        let profile = CalibrationProfile::load(paths);
        Self::new(
            profile,
            PropertyColorProvider::new(SystemProperties),
            SysfsBacklight::new(&paths.brightness),
        )
    }

    /// The calibration in use.
    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// The per-sample state.
    pub fn state(&self) -> &CorrectorState {
        &self.state
    }

    /// Correct `light` in place.
    ///
    /// Requests a fresh screen color first but does not wait for it, so the
    /// color applied is whatever was last published.
    pub fn correct(&mut self, light: &mut f32) {
        *light = self.correct_traced(*light).corrected;
    }

    /// Correct `light` and return every intermediate.
    pub fn correct_traced(&mut self, light: f32) -> CorrectionTrace {
        self.screen.request_update();
        let trace = self.evaluate(light);
        self.state.record(trace.corrected);
        trace
    }

    /// Compute the correction for `light` from the current inputs without
    /// requesting a color update or touching the state.
    pub fn evaluate(&self, light: f32) -> CorrectionTrace {
        let color = self.screen.read_last();
        let brightness = self.backlight.brightness();
        trace!("Original reading: {}", light);

        let result = compute(&self.profile, light, color, brightness);
        debug!(
            "Original: {}  Corrected: {} Correction: {} brightness: {} brightness_factor: {} exp: {} light_frac: {} rgb_avg: {}",
            result.light,
            result.corrected,
            result.correction,
            result.brightness,
            result.brightness_factor,
            result.exp,
            result.light_frac,
            result.rgb_avg
        );
        result
    }
}

impl std::fmt::Debug for AlsCorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlsCorrector")
            .field("profile", &self.profile)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
