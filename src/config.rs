//! File locations and property names the corrector reads from.

use std::path::{Path, PathBuf};

/// Directory the calibration tool writes per-device lux budgets into.
pub const DEFAULT_PERSIST_DIR: &str = "/mnt/vendor/persist/engineermode";

/// Backlight device exposing `brightness` and `max_brightness`.
pub const DEFAULT_BACKLIGHT_DIR: &str = "/sys/class/backlight/panel0-backlight";

/// Property holding the pid of the process computing the screen color.
pub const PROP_PID: &str = "vendor.sensors.als_correction.pid";
/// Property holding the red channel of the color above the sensor.
pub const PROP_RED: &str = "vendor.sensors.als_correction.r";
/// Property holding the green channel of the color above the sensor.
pub const PROP_GREEN: &str = "vendor.sensors.als_correction.g";
/// Property holding the blue channel of the color above the sensor.
pub const PROP_BLUE: &str = "vendor.sensors.als_correction.b";

/// Locations of every file read by the loader and the corrector.
///
/// # Example
///
/// ```
/// use als_correction::CalibrationPaths;
///
/// let paths = CalibrationPaths::default().with_persist_dir("/tmp/cali");
/// assert_eq!(paths.cali_coe, std::path::Path::new("/tmp/cali/cali_coe"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationPaths {
    /// Red channel lux budget.
    pub red_max_lux: PathBuf,
    /// Green channel lux budget.
    pub green_max_lux: PathBuf,
    /// Blue channel lux budget.
    pub blue_max_lux: PathBuf,
    /// White (common-mode) lux budget.
    pub white_max_lux: PathBuf,
    /// Additive bias.
    pub als_bias: PathBuf,
    /// Per-mille scale factor.
    pub cali_coe: PathBuf,
    /// Backlight ceiling, read once at init.
    pub max_brightness: PathBuf,
    /// Current backlight level, read on every sample.
    pub brightness: PathBuf,
}

impl CalibrationPaths {
    /// Point the six calibration files at `dir`.
    pub fn with_persist_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.red_max_lux = dir.join("red_max_lux");
        self.green_max_lux = dir.join("green_max_lux");
        self.blue_max_lux = dir.join("blue_max_lux");
        self.white_max_lux = dir.join("white_max_lux");
        self.als_bias = dir.join("als_bias");
        self.cali_coe = dir.join("cali_coe");
        self
    }

    /// Point both backlight files at `dir`.
    pub fn with_backlight_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.max_brightness = dir.join("max_brightness");
        self.brightness = dir.join("brightness");
        self
    }
}

impl Default for CalibrationPaths {
    fn default() -> Self {
        Self {
            red_max_lux: PathBuf::new(),
            green_max_lux: PathBuf::new(),
            blue_max_lux: PathBuf::new(),
            white_max_lux: PathBuf::new(),
            als_bias: PathBuf::new(),
            cali_coe: PathBuf::new(),
            max_brightness: PathBuf::new(),
            brightness: PathBuf::new(),
        }
        .with_persist_dir(DEFAULT_PERSIST_DIR)
        .with_backlight_dir(DEFAULT_BACKLIGHT_DIR)
    }
}

/// Names of the runtime properties shared with the color process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKeys {
    /// Pid of the process to signal.
    pub pid: String,
    /// Red channel.
    pub red: String,
    /// Green channel.
    pub green: String,
    /// Blue channel.
    pub blue: String,
}

impl Default for PropertyKeys {
    fn default() -> Self {
        Self {
            pid: PROP_PID.to_owned(),
            red: PROP_RED.to_owned(),
            green: PROP_GREEN.to_owned(),
            blue: PROP_BLUE.to_owned(),
        }
    }
}
