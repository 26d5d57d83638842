//! Screen-bleed compensation for ambient light sensor readings.
//!
//! A sensor sitting under the display also sees the light the display
//! emits. This crate estimates how much of a raw lux sample comes from the
//! screen, given the backlight level and the color drawn above the sensor,
//! and removes it.
//!
//! # Calibration
//!
//! Per-device lux budgets for the red, green, blue and white components are
//! read once from the calibration store (see [`CalibrationPaths`]). Missing
//! or unreadable files fall back to defaults; a device without any budget
//! gets a disabled profile and readings pass through unchanged.
//!
//! # Example
//!
//! ```
//! use als_correction::{AlsCorrector, CalibrationProfile, MockScreen, ScreenColor};
//! use std::sync::Arc;
//!
//! let profile = CalibrationProfile {
//!     red_max_lux: 100,
//!     green_max_lux: 100,
//!     blue_max_lux: 100,
//!     white_max_lux: 50,
//!     ..Default::default()
//! };
//! let screen = Arc::new(MockScreen::new(ScreenColor::new(255, 255, 255), 255));
//! let mut corrector = AlsCorrector::new(profile, screen.clone(), screen);
//!
//! let mut light = 200.0;
//! corrector.correct(&mut light);
//! approx::assert_abs_diff_eq!(light, 70.0, epsilon = 1e-3);
//! ```
//!
//! On a device, [`AlsCorrector::init`] wires the corrector to system
//! properties and the sysfs backlight, and [`init`] / [`correct`] expose a
//! shared instance to pipelines without a place to keep one.
//!
//! # Testing
//!
//! Use [`MockScreen`] and [`MockProperties`] to drive the corrector without
//! a display or a color process.

#![warn(missing_docs)]

mod calibration;
mod config;
mod corrector;
mod error;
mod global;
mod mock;
mod reader;
mod screen;
mod state;
mod system;

// Re-export public API
pub use calibration::{CalibrationProfile, DEFAULT_CALI_COE, DEFAULT_MAX_BRIGHTNESS};
pub use config::{
    CalibrationPaths, DEFAULT_BACKLIGHT_DIR, DEFAULT_PERSIST_DIR, PROP_BLUE, PROP_GREEN, PROP_PID,
    PROP_RED, PropertyKeys,
};
pub use corrector::{AlsCorrector, CorrectionTrace, MAX_LIGHT_FRAC, UNSTABLE_LIGHT_FRAC, compute};
pub use error::CorrectionError;
pub use global::{correct, init, init_with};
pub use mock::{MockProperties, MockScreen};
pub use reader::{ReadValue, parse_leading_int, read_int, read_int_or};
pub use screen::{
    BrightnessSource, PropertySource, ScreenColor, ScreenColorProvider, parse_property_int,
};
pub use state::CorrectorState;
pub use system::{PropertyColorProvider, SysfsBacklight, SystemProperties, send_refresh_signal};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_global_entry_points() {
        let paths = CalibrationPaths::default()
            .with_persist_dir("/nonexistent/als/persist")
            .with_backlight_dir("/nonexistent/als/backlight");
        init_with(&paths);
        init();

        let mut light = 50.0;
        correct(&mut light);
        assert_eq!(light, 50.0);
    }

    #[test]
    fn test_calibrated_device_end_to_end() {
        let dir = tempdir().unwrap();
        for (name, value) in [
            ("red_max_lux", "100"),
            ("green_max_lux", "100"),
            ("blue_max_lux", "100"),
            ("white_max_lux", "50"),
            ("als_bias", "0"),
            ("cali_coe", "1000"),
            ("max_brightness", "255"),
            ("brightness", "255"),
        ] {
            fs::write(dir.path().join(name), value).unwrap();
        }
        let paths = CalibrationPaths::default()
            .with_persist_dir(dir.path())
            .with_backlight_dir(dir.path());

        let props = Arc::new(MockProperties::new());
        for key in [PROP_RED, PROP_GREEN, PROP_BLUE] {
            props.set(key, "255");
        }
        let mut corrector = AlsCorrector::new(
            CalibrationProfile::load(&paths),
            PropertyColorProvider::new(props.clone()),
            SysfsBacklight::new(&paths.brightness),
        );

        let mut light = 200.0;
        corrector.correct(&mut light);
        assert_abs_diff_eq!(light, 70.0, epsilon = 1e-3);

        // screen goes black and dims to half
        for key in [PROP_RED, PROP_GREEN, PROP_BLUE] {
            props.set(key, "0");
        }
        fs::write(dir.path().join("brightness"), "127").unwrap();
        let mut light = 70.0;
        corrector.correct(&mut light);
        assert_abs_diff_eq!(light, 58.109, epsilon = 1e-2);
    }

    #[test]
    fn test_screen_color_properties_can_be_unset() {
        let props = MockProperties::new();
        props.set(PROP_RED, "10");
        props.remove(PROP_RED);
        assert_eq!(
            PropertyColorProvider::new(props).read_last(),
            ScreenColor::default()
        );
    }
}
