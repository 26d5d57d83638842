//! Collaborators backed by the running system: properties, signals, sysfs.

use crate::config::PropertyKeys;
use crate::error::CorrectionError;
use crate::reader::read_int_or;
use crate::screen::{BrightnessSource, PropertySource, ScreenColor, ScreenColorProvider};
use log::{debug, trace};
use std::path::PathBuf;

// =============================================================================
// System Properties
// =============================================================================

/// The platform property store.
///
/// On Android this reads through `__system_property_get`. Other platforms
/// have no property store, so every key reads as unset and the corrector
/// sees its defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProperties;

impl PropertySource for SystemProperties {
    #[cfg(target_os = "android")]
    fn get(&self, key: &str) -> Option<String> {
        use std::ffi::{CStr, CString};

        const PROP_VALUE_MAX: usize = 92;

        let name = CString::new(key).ok()?;
        let mut value = [0 as libc::c_char; PROP_VALUE_MAX];
        // Safety: `value` is PROP_VALUE_MAX bytes, the most the call writes,
        // and is NUL-terminated on return.
        let len = unsafe { libc::__system_property_get(name.as_ptr(), value.as_mut_ptr()) };
        if len <= 0 {
            return None;
        }
        // Safety: the buffer was zeroed and the call NUL-terminates what it
        // writes, so a terminator lies within PROP_VALUE_MAX bytes.
        let value = unsafe { CStr::from_ptr(value.as_ptr()) };
        Some(value.to_string_lossy().into_owned())
    }

    #[cfg(not(target_os = "android"))]
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

// =============================================================================
// Signal
// =============================================================================

/// Send `SIGUSR1` to `pid`.
///
/// Only positive pids are signalled; zero and negative values would address
/// process groups and are rejected.
pub fn send_refresh_signal(pid: i32) -> Result<(), CorrectionError> {
    if pid <= 0 {
        return Err(CorrectionError::InvalidValue {
            name: "pid",
            value: i64::from(pid),
        });
    }
    kill_usr1(pid)
}

#[cfg(unix)]
fn kill_usr1(pid: i32) -> Result<(), CorrectionError> {
    // Safety: kill has no memory-safety preconditions.
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGUSR1) };
    if rc == 0 {
        Ok(())
    } else {
        Err(CorrectionError::Signal {
            pid,
            source: std::io::Error::last_os_error(),
        })
    }
}

#[cfg(not(unix))]
fn kill_usr1(pid: i32) -> Result<(), CorrectionError> {
    Err(CorrectionError::Signal {
        pid,
        source: std::io::Error::from(std::io::ErrorKind::Unsupported),
    })
}

// =============================================================================
// Property Color Provider
// =============================================================================

/// Screen color published through properties by a cooperating process.
///
/// [`request_update`](ScreenColorProvider::request_update) looks up the
/// process's pid and signals it; the process answers by rewriting the color
/// properties at some later point.
#[derive(Debug, Clone, Default)]
pub struct PropertyColorProvider<P> {
    props: P,
    keys: PropertyKeys,
}

impl<P: PropertySource> PropertyColorProvider<P> {
    /// Create a provider reading the default vendor keys.
    pub fn new(props: P) -> Self {
        Self::with_keys(props, PropertyKeys::default())
    }

    /// Create a provider reading custom keys.
    pub fn with_keys(props: P, keys: PropertyKeys) -> Self {
        Self { props, keys }
    }

    fn channel(&self, key: &str) -> u8 {
        let value = self.props.get_i32_or(key, 0).value;
        value.clamp(0, i32::from(u8::MAX)) as u8
    }
}

impl<P: PropertySource> ScreenColorProvider for PropertyColorProvider<P> {
    fn request_update(&self) {
        let pid = self.props.get_i32_or(&self.keys.pid, 0).value;
        if pid == 0 {
            return;
        }
        if let Err(e) = send_refresh_signal(pid) {
            debug!("screen color refresh not requested: {}", e);
        }
    }

    fn read_last(&self) -> ScreenColor {
        let color = ScreenColor::new(
            self.channel(&self.keys.red),
            self.channel(&self.keys.green),
            self.channel(&self.keys.blue),
        );
        trace!("Screen Color Above Sensor: {}, {}, {}", color.r, color.g, color.b);
        color
    }
}

// =============================================================================
// Sysfs Backlight
// =============================================================================

/// Backlight level read from a sysfs `brightness` file on every call.
#[derive(Debug, Clone)]
pub struct SysfsBacklight {
    path: PathBuf,
}

impl SysfsBacklight {
    /// Read the level from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BrightnessSource for SysfsBacklight {
    fn brightness(&self) -> i32 {
        read_int_or(&self.path, 0).value
    }
}
