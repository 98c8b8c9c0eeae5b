//! Spatial and color types

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +X)
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalized copy; the zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// The vector rotated 90° counter-clockwise
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Float RGBA color.
///
/// Channels are nominally in `[0, 1]` but nothing here clamps them: the same
/// type carries per-second deltas, which are routinely negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color4 {
    pub const WHITE: Self = Self {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Pack into RGBA8 with red in the lowest byte, clamping each channel to `[0, 1]`.
    pub fn to_rgba8(&self) -> u32 {
        let r = channel_to_u8(self.red) as u32;
        let g = channel_to_u8(self.green) as u32;
        let b = channel_to_u8(self.blue) as u32;
        let a = channel_to_u8(self.alpha) as u32;
        r | (g << 8) | (b << 16) | (a << 24)
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for Color4 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(
            self.red + other.red,
            self.green + other.green,
            self.blue + other.blue,
            self.alpha + other.alpha,
        )
    }
}

impl AddAssign for Color4 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Color4 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(
            self.red - other.red,
            self.green - other.green,
            self.blue - other.blue,
            self.alpha - other.alpha,
        )
    }
}

impl Mul<f32> for Color4 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(
            self.red * scalar,
            self.green * scalar,
            self.blue * scalar,
            self.alpha * scalar,
        )
    }
}

impl Div<f32> for Color4 {
    type Output = Self;
    fn div(self, scalar: f32) -> Self {
        Self::new(
            self.red / scalar,
            self.green / scalar,
            self.blue / scalar,
            self.alpha / scalar,
        )
    }
}

fn channel_to_u8(value: f32) -> u8 {
    // NaN clamps to 0
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (v * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(4.0, 6.0);

        assert_eq!(v1 + v2, Vec2::new(5.0, 8.0));
        assert_eq!(v2 - v1, Vec2::new(3.0, 4.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!((v2 - v1).length(), 5.0);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_perpendicular() {
        let p = Vec2::new(1.0, 0.0).perpendicular();
        assert_eq!(p, Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::new(3.0, -2.0).perpendicular(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_color_pack_clamps() {
        assert_eq!(Color4::WHITE.to_rgba8(), 0xFFFF_FFFF);
        assert_eq!(Color4::new(2.0, -1.0, 0.0, 1.0).to_rgba8(), 0xFF00_00FF);
        let half = Color4::new(0.5, 0.5, 0.5, 0.5).to_rgba8();
        assert_eq!(half & 0xFF, 128);
    }

    #[test]
    fn test_color_arithmetic() {
        let c = Color4::new(1.0, 0.5, 0.0, 1.0) - Color4::new(0.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color4::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(c * 2.0, Color4::new(2.0, 0.0, 0.0, 1.0));
    }
}
