use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color with components in `0.0..=1.0`, in sRGB space as authored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned when a `#RRGGBB` / `#RRGGBBAA` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #RRGGBB or #RRGGBBAA")]
pub struct ColorParseError(pub String);

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError(s.to_string()))
        };
        let a = if digits.len() == 8 { byte(6)? } else { 1.0 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Multiply the color channels (not alpha) by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::rgba(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels converted from sRGB to linear, for upload to an sRGB render target.
    pub fn to_linear_array(self) -> [f32; 4] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b), self.a]
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))?;
        if self.a < 1.0 {
            write!(f, "{:02X}", byte(self.a))?;
        }
        Ok(())
    }
}

/// Size of a 2D drawing surface in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(f32::EPSILON)
    }

    /// Whether `(x, y)` lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Spatial transform: position, Euler rotation (XYZ order, radians), scale.
///
/// Rotation is kept as Euler angles because sketches accumulate spin about a
/// single axis every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local matrix `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_color() {
        let c = Color::parse("#DD0C97").unwrap();
        assert!((c.r - 221.0 / 255.0).abs() < 1e-6);
        assert!((c.g - 12.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 151.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
        assert_eq!(c, Color::from_hex(0xDD0C97));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("zzzzzz").is_err());
        assert!(Color::parse("").is_err());
    }

    #[test]
    fn display_round_trips() {
        let c = Color::from_hex(0xFFCCAA);
        assert_eq!(c.to_string(), "#FFCCAA");
        assert_eq!(Color::parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::WHITE.to_linear_array(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_linear_array(), [0.0, 0.0, 0.0, 1.0]);
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear_array();
        assert!(mid[0] > 0.2 && mid[0] < 0.22);
    }

    #[test]
    fn scale_leaves_alpha() {
        let c = Color::rgba(1.0, 0.5, 0.0, 1.0).scale(0.8);
        assert_eq!(c.to_array(), [0.8, 0.4, 0.0, 1.0]);
    }

    #[test]
    fn canvas_contains_edges() {
        let size = CanvasSize::new(600.0, 300.0);
        assert!(size.contains(0.0, 0.0));
        assert!(size.contains(600.0, 300.0));
        assert!(!size.contains(600.1, 10.0));
        assert!(!size.contains(10.0, -0.1));
        assert_eq!(size.aspect(), 2.0);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_rotation_about_y() {
        let t = Transform::default().with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn transform_applies_translation_last() {
        let t = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, std::f32::consts::PI, 0.0),
            scale: Vec3::splat(2.0),
        };
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
