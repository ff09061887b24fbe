use serde::{Deserialize, Serialize};

pub use glam::DVec3 as Vec3;

/// Simulated seconds per engine tick.
pub const TICK_SECONDS: f64 = 1.0 / 50.0;

/// Euler rotation in degrees, engine convention (yaw around Z, pitch around Y, roll around X).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation around the vertical axis.
    pub yaw: f64,
    /// Rotation around the lateral axis.
    pub pitch: f64,
    /// Rotation around the forward axis.
    pub roll: f64,
}

impl Rotator {
    /// Build a rotator from `(yaw, pitch, roll)` degrees.
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Bitwise equality on all three angles.
    ///
    /// Unlike `==` this distinguishes `0.0` from `-0.0` and treats identical NaN payloads as equal,
    /// which is what frame replay comparisons need.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.yaw.to_bits() == other.yaw.to_bits()
            && self.pitch.to_bits() == other.pitch.to_bits()
            && self.roll.to_bits() == other.roll.to_bits()
    }
}

/// Location + rotation of an actor at one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space location.
    pub location: Vec3,
    /// World-space rotation.
    pub rotation: Rotator,
}

impl Transform {
    /// Build a transform.
    pub fn new(location: Vec3, rotation: Rotator) -> Self {
        Self { location, rotation }
    }

    /// Bitwise equality on location and rotation.
    pub fn bit_eq(&self, other: &Self) -> bool {
        vec3_bit_eq(self.location, other.location) && self.rotation.bit_eq(&other.rotation)
    }
}

/// Bitwise equality on the three components of a vector.
pub fn vec3_bit_eq(a: Vec3, b: Vec3) -> bool {
    a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits() && a.z.to_bits() == b.z.to_bits()
}

/// Output image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 288,
            height: 288,
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = crate::foundation::error::PhysclipError;

    /// Parse `<width>x<height>`, e.g. `288x288`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || {
            crate::foundation::error::PhysclipError::validation(format!(
                "resolution is not in <width>x<height> format: '{s}'"
            ))
        };
        let (w, h) = s.trim().split_once('x').ok_or_else(bad)?;
        let width: u32 = w.parse().map_err(|_| bad())?;
        let height: u32 = h.parse().map_err(|_| bad())?;
        if width == 0 || height == 0 {
            return Err(bad());
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
