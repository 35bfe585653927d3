//! Tuning-plane coordinates
//!
//! x is the weather axis (storm at -1, sun at +1), y is the mood axis
//! (void at -1, manic at +1).

use serde::{Deserialize, Serialize};

/// A point on the tuning plane, always within [-1, 1] on both axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
}

impl Coordinates {
    /// The centre of the plane
    pub const ORIGIN: Coordinates = Coordinates { x: 0.0, y: 0.0 };

    /// Build clamped coordinates, or `None` if either component is not finite
    pub fn new(x: f32, y: f32) -> Option<Self> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        })
    }

    /// Normalize a position inside a surface of `width` x `height`
    ///
    /// `left`/`top` locate the surface's top-left corner in the same
    /// space as `pos`; y grows downward on input and is inverted so that
    /// up is positive.
    pub fn from_surface(
        pos: (f32, f32),
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let x = ((pos.0 - left) / width) * 2.0 - 1.0;
        let y = -(((pos.1 - top) / height) * 2.0 - 1.0);
        Self::new(x, y)
    }

    /// Distance from the origin
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_and_rejects_non_finite() {
        let c = Coordinates::new(1.7, -3.0).unwrap();
        assert_eq!(c, Coordinates { x: 1.0, y: -1.0 });
        assert!(Coordinates::new(f32::NAN, 0.0).is_none());
        assert!(Coordinates::new(0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_from_surface_inverts_y() {
        let top_left = Coordinates::from_surface((0.0, 0.0), 0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(top_left, Coordinates { x: -1.0, y: 1.0 });

        let centre = Coordinates::from_surface((400.0, 300.0), 0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(centre, Coordinates::ORIGIN);

        let outside = Coordinates::from_surface((900.0, 700.0), 0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(outside, Coordinates { x: 1.0, y: -1.0 });
    }

    #[test]
    fn test_from_surface_rejects_empty_surface() {
        assert!(Coordinates::from_surface((1.0, 1.0), 0.0, 0.0, 0.0, 600.0).is_none());
    }
}
