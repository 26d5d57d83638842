//! Per-device calibration loaded once at startup.

use crate::config::CalibrationPaths;
use crate::error::CorrectionError;
use crate::reader::{ReadValue, read_int_or};
use log::{debug, info, warn};

/// Neutral per-mille scale factor.
pub const DEFAULT_CALI_COE: i32 = 1000;

/// Backlight ceiling assumed when the driver does not report one.
pub const DEFAULT_MAX_BRIGHTNESS: i32 = 255;

/// How much each display channel contributes to the sensor at full brightness.
///
/// A profile whose channel budgets sum to zero disables correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationProfile {
    /// Lux attributable to the red channel.
    pub red_max_lux: i32,
    /// Lux attributable to the green channel.
    pub green_max_lux: i32,
    /// Lux attributable to the blue channel.
    pub blue_max_lux: i32,
    /// Lux attributable to the common-mode (white) component.
    pub white_max_lux: i32,
    /// Additive bias, in lux.
    pub als_bias: i32,
    /// Scale factor in per-mille.
    pub cali_coe: i32,
    /// Backlight ceiling.
    pub max_brightness: i32,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            red_max_lux: 0,
            green_max_lux: 0,
            blue_max_lux: 0,
            white_max_lux: 0,
            als_bias: 0,
            cali_coe: DEFAULT_CALI_COE,
            max_brightness: DEFAULT_MAX_BRIGHTNESS,
        }
    }
}

impl CalibrationProfile {
    /// Load the profile from the calibration store.
    ///
    /// Never fails: each missing or unparsable file is replaced by its
    /// default, so a device without calibration data yields a disabled
    /// profile.
    pub fn load(paths: &CalibrationPaths) -> Self {
        let mut defaulted = Vec::new();
        let mut field = |name: &'static str, value: ReadValue<i32>| {
            if value.defaulted {
                defaulted.push(name);
            }
            value.value
        };

        let profile = Self {
            red_max_lux: field("red_max_lux", read_int_or(&paths.red_max_lux, 0)),
            green_max_lux: field("green_max_lux", read_int_or(&paths.green_max_lux, 0)),
            blue_max_lux: field("blue_max_lux", read_int_or(&paths.blue_max_lux, 0)),
            white_max_lux: field("white_max_lux", read_int_or(&paths.white_max_lux, 0)),
            als_bias: field("als_bias", read_int_or(&paths.als_bias, 0)),
            cali_coe: field("cali_coe", read_int_or(&paths.cali_coe, DEFAULT_CALI_COE)),
            max_brightness: field(
                "max_brightness",
                read_max_brightness(read_int_or(&paths.max_brightness, DEFAULT_MAX_BRIGHTNESS)),
            ),
        };

        if !defaulted.is_empty() {
            info!("calibration defaults used for: {}", defaulted.join(", "));
        }
        debug!(
            "max r = {}, max g = {}, max b = {}, max_white: {}, cali_coe: {}, als_bias: {}, max_brightness: {}, max_lux: {}",
            profile.red_max_lux,
            profile.green_max_lux,
            profile.blue_max_lux,
            profile.white_max_lux,
            profile.cali_coe,
            profile.als_bias,
            profile.max_brightness,
            profile.max_lux()
        );
        profile
    }

    /// Total lux budget across the four channels.
    pub fn max_lux(&self) -> i32 {
        self.red_max_lux
            .saturating_add(self.green_max_lux)
            .saturating_add(self.blue_max_lux)
            .saturating_add(self.white_max_lux)
    }

    /// Whether correction is applied at all.
    pub fn is_enabled(&self) -> bool {
        self.max_lux() > 0
    }

    /// The per-mille scale factor as a fraction.
    pub fn coe_frac(&self) -> f32 {
        self.cali_coe as f32 / 1000.0
    }
}

// max_brightness is a divisor; zero or negative is as good as missing.
fn read_max_brightness(value: ReadValue<i32>) -> ReadValue<i32> {
    if value.value > 0 {
        return value;
    }
    let err = CorrectionError::InvalidValue {
        name: "max_brightness",
        value: i64::from(value.value),
    };
    warn!("{}, using default {}", err, DEFAULT_MAX_BRIGHTNESS);
    ReadValue::default_value(DEFAULT_MAX_BRIGHTNESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    fn paths_in(dir: &std::path::Path) -> CalibrationPaths {
        CalibrationPaths::default()
            .with_persist_dir(dir)
            .with_backlight_dir(dir)
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let paths = CalibrationPaths::default()
            .with_persist_dir("/nonexistent/als/persist")
            .with_backlight_dir("/nonexistent/als/backlight");
        let profile = CalibrationProfile::load(&paths);

        assert_eq!(profile, CalibrationProfile::default());
        assert_eq!(profile.red_max_lux, 0);
        assert_eq!(profile.green_max_lux, 0);
        assert_eq!(profile.blue_max_lux, 0);
        assert_eq!(profile.white_max_lux, 0);
        assert_eq!(profile.als_bias, 0);
        assert_eq!(profile.cali_coe, 1000);
        assert_eq!(profile.max_brightness, 255);
        assert_eq!(profile.max_lux(), 0);
        assert!(!profile.is_enabled());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempdir().unwrap();
        for (name, value) in [
            ("red_max_lux", "100"),
            ("green_max_lux", "120\n"),
            ("blue_max_lux", "80"),
            ("white_max_lux", "50"),
            ("als_bias", "-3"),
            ("cali_coe", "950"),
            ("max_brightness", "2047"),
        ] {
            fs::write(dir.path().join(name), value).unwrap();
        }

        let profile = CalibrationProfile::load(&paths_in(dir.path()));

        assert_eq!(
            profile,
            CalibrationProfile {
                red_max_lux: 100,
                green_max_lux: 120,
                blue_max_lux: 80,
                white_max_lux: 50,
                als_bias: -3,
                cali_coe: 950,
                max_brightness: 2047,
            }
        );
        assert_eq!(profile.max_lux(), 350);
        assert!(profile.is_enabled());
        assert_relative_eq!(profile.coe_frac(), 0.95);
    }

    #[test]
    fn test_partial_and_garbage_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("red_max_lux"), "40").unwrap();
        fs::write(dir.path().join("cali_coe"), "not a number").unwrap();
        fs::write(dir.path().join("max_brightness"), "0").unwrap();

        let profile = CalibrationProfile::load(&paths_in(dir.path()));

        assert_eq!(profile.red_max_lux, 40);
        assert_eq!(profile.green_max_lux, 0);
        assert_eq!(profile.cali_coe, DEFAULT_CALI_COE);
        assert_eq!(profile.max_brightness, DEFAULT_MAX_BRIGHTNESS);
        assert_eq!(profile.max_lux(), 40);
    }

    #[test]
    fn test_failed_test_leaves_no_calibration_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(path.join("red_max_lux"), "100").unwrap();
        let leftover = path.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _dir = dir;
            assert_eq!(CalibrationProfile::load(&paths_in(&path)).red_max_lux, 0);
        }));
        assert!(result.is_err());
        assert!(!leftover.exists());

        let fresh = tempdir().unwrap();
        assert_eq!(fs::read_dir(fresh.path()).unwrap().count(), 0);
        assert_eq!(
            CalibrationProfile::load(&paths_in(fresh.path())),
            CalibrationProfile::default()
        );
    }
}
