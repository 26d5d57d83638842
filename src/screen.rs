//! Collaborator interfaces: screen color, backlight level and properties.

use crate::reader::ReadValue;
use std::sync::Arc;

/// Color rendered in the screen region above the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenColor {
    /// Red intensity.
    pub r: u8,
    /// Green intensity.
    pub g: u8,
    /// Blue intensity.
    pub b: u8,
}

impl ScreenColor {
    /// Create a color from its channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Smallest channel, the common-mode (white) part of the color.
    pub fn min(&self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    /// Mean intensity as a fraction of 255, with the channel sum
    /// integer-divided by three first.
    pub fn avg(&self) -> f32 {
        let sum = u32::from(self.r) + u32::from(self.g) + u32::from(self.b);
        (sum / 3) as f32 / 255.0
    }
}

/// Source of the screen color above the sensor.
///
/// The color is computed by another process. [`request_update`] asks for a
/// fresh computation without waiting for it, so [`read_last`] called right
/// after may still return the previous result.
///
/// [`request_update`]: ScreenColorProvider::request_update
/// [`read_last`]: ScreenColorProvider::read_last
pub trait ScreenColorProvider: Send + Sync {
    /// Ask for a new color computation. Must not block or fail.
    fn request_update(&self);

    /// The most recently published color.
    fn read_last(&self) -> ScreenColor;
}

/// Source of the current backlight level.
pub trait BrightnessSource: Send + Sync {
    /// Current level in `0..=max_brightness`, 0 when unknown.
    fn brightness(&self) -> i32;
}

/// Key-value system properties.
pub trait PropertySource: Send + Sync {
    /// Raw value of `key`, `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Value of `key` as an integer, falling back to `default` when unset or
    /// not a number. See [`parse_property_int`] for the accepted forms.
    fn get_i32_or(&self, key: &str, default: i32) -> ReadValue<i32> {
        match self.get(key).as_deref().and_then(parse_property_int) {
            Some(value) => ReadValue::read(value),
            None => ReadValue::default_value(default),
        }
    }
}

/// Parse an integer property value.
///
/// Leading whitespace and a sign are allowed, then a decimal number, a
/// `0x`-prefixed hex number or a `0`-prefixed octal number. Anything after
/// the digits, trailing whitespace included, rejects the value, as does a
/// value outside the `i32` range.
///
/// # Example
///
/// ```
/// use als_correction::parse_property_int;
///
/// assert_eq!(parse_property_int("0x1f"), Some(31));
/// assert_eq!(parse_property_int("017"), Some(15));
/// assert_eq!(parse_property_int("42 "), None);
/// ```
pub fn parse_property_int(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (radix, digits) = match rest.as_bytes() {
        [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit() => (16, &rest[2..]),
        [b'0', _, ..] => (8, &rest[1..]),
        _ => (10, rest),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

impl<T: ScreenColorProvider + ?Sized> ScreenColorProvider for Arc<T> {
    fn request_update(&self) {
        (**self).request_update()
    }

    fn read_last(&self) -> ScreenColor {
        (**self).read_last()
    }
}

impl<T: BrightnessSource + ?Sized> BrightnessSource for Arc<T> {
    fn brightness(&self) -> i32 {
        (**self).brightness()
    }
}

impl<T: PropertySource + ?Sized> PropertySource for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_min_and_avg() {
        let color = ScreenColor::new(200, 40, 90);
        assert_eq!(color.min(), 40);
        // (200 + 40 + 90) / 3 = 110 after integer division
        approx::assert_relative_eq!(color.avg(), 110.0 / 255.0);

        assert_eq!(ScreenColor::default().min(), 0);
        assert_eq!(ScreenColor::new(255, 255, 255).avg(), 1.0);
    }

    #[test]
    fn test_parse_property_int_forms() {
        assert_eq!(parse_property_int("255"), Some(255));
        assert_eq!(parse_property_int("  -12"), Some(-12));
        assert_eq!(parse_property_int("+7"), Some(7));
        assert_eq!(parse_property_int("0"), Some(0));
        assert_eq!(parse_property_int("0x1f"), Some(31));
        assert_eq!(parse_property_int("0XFF"), Some(255));
        assert_eq!(parse_property_int("-0x10"), Some(-16));
        assert_eq!(parse_property_int("010"), Some(8));
        assert_eq!(parse_property_int("-2147483648"), Some(i32::MIN));
    }

    #[test]
    fn test_parse_property_int_rejects_trailing_and_bad_digits() {
        assert_eq!(parse_property_int(""), None);
        assert_eq!(parse_property_int("-"), None);
        assert_eq!(parse_property_int("12 "), None);
        assert_eq!(parse_property_int("12\n"), None);
        assert_eq!(parse_property_int("12abc"), None);
        assert_eq!(parse_property_int("08"), None);
        assert_eq!(parse_property_int("0x"), None);
        assert_eq!(parse_property_int("0xg"), None);
        assert_eq!(parse_property_int("--1"), None);
        assert_eq!(parse_property_int("-+1"), None);
        assert_eq!(parse_property_int("2147483648"), None);
    }

    #[test]
    fn test_get_i32_or_follows_property_rules() {
        let props = crate::mock::MockProperties::new();
        props.set("hex", "0x1f");
        props.set("padded", "5 ");

        assert_eq!(props.get_i32_or("hex", 0), ReadValue::read(31));
        assert_eq!(props.get_i32_or("padded", 3), ReadValue::default_value(3));
        assert_eq!(props.get_i32_or("unset", 3), ReadValue::default_value(3));
    }

    #[test]
    fn test_avg_truncates_before_scaling() {
        // 1 + 1 + 0 = 2, 2 / 3 == 0
        assert_eq!(ScreenColor::new(1, 1, 0).avg(), 0.0);
    }
}
