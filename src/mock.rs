//! Mock collaborators for testing.

use crate::screen::{BrightnessSource, PropertySource, ScreenColor, ScreenColorProvider};
use std::collections::HashMap;
use std::sync::Mutex;

/// A scripted screen: fixed color and backlight level.
///
/// Stands in for both the color process and the backlight driver so code
/// depending on [`ScreenColorProvider`] and [`BrightnessSource`] can be
/// tested without signals or sysfs.
///
/// # Example
///
/// ```
/// use als_correction::{BrightnessSource, MockScreen, ScreenColor, ScreenColorProvider};
///
/// let screen = MockScreen::new(ScreenColor::new(255, 0, 0), 128);
/// screen.request_update();
/// assert_eq!(screen.read_last().r, 255);
/// assert_eq!(screen.brightness(), 128);
/// assert_eq!(screen.update_requests(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockScreen {
    state: Mutex<MockScreenState>,
}

#[derive(Debug, Default)]
struct MockScreenState {
    color: ScreenColor,
    brightness: i32,
    update_requests: u32,
}

impl MockScreen {
    /// Create a screen showing `color` at `brightness`.
    pub fn new(color: ScreenColor, brightness: i32) -> Self {
        Self {
            state: Mutex::new(MockScreenState {
                color,
                brightness,
                update_requests: 0,
            }),
        }
    }

    /// Change the published color.
    pub fn set_color(&self, color: ScreenColor) {
        self.state.lock().unwrap().color = color;
    }

    /// Change the backlight level.
    pub fn set_brightness(&self, brightness: i32) {
        self.state.lock().unwrap().brightness = brightness;
    }

    /// How many times a fresh color was requested.
    pub fn update_requests(&self) -> u32 {
        self.state.lock().unwrap().update_requests
    }
}

impl ScreenColorProvider for MockScreen {
    fn request_update(&self) {
        self.state.lock().unwrap().update_requests += 1;
    }

    fn read_last(&self) -> ScreenColor {
        self.state.lock().unwrap().color
    }
}

impl BrightnessSource for MockScreen {
    fn brightness(&self) -> i32 {
        self.state.lock().unwrap().brightness
    }
}

/// An in-memory property store.
#[derive(Debug, Default)]
pub struct MockProperties {
    values: Mutex<HashMap<String, String>>,
}

impl MockProperties {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }

    /// Unset `key`.
    pub fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

impl PropertySource for MockProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}
