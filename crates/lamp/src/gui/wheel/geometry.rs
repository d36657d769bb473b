use super::{FULL_TURN, MAX_VIEW_EXTENT};
use crate::config::WheelStyle;
use palette::{FromColor, Hsva, RgbHue, Srgba};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` seen from `center`, in `(-PI, PI]`, screen coordinates.
    pub fn angle_from(self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }

    /// Rotates `self` around `center` by `radians` (clockwise on screen).
    pub fn rotated_around(self, center: Point, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        let (dx, dy) = (self.x - center.x, self.y - center.y);
        Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Finite, non-negative and no larger than [`MAX_VIEW_EXTENT`] on either side.
    pub fn is_renderable(&self) -> bool {
        [self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && (0.0..=MAX_VIEW_EXTENT).contains(v))
    }
}

/// A hue/saturation/brightness triple, every component in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelColor {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl WheelColor {
    pub fn to_hsva(self) -> Hsva<palette::encoding::Srgb, f64> {
        Hsva::new(
            RgbHue::from_degrees(self.hue * 360.0),
            self.saturation,
            self.brightness,
            1.0,
        )
    }

    pub fn to_srgba(self) -> Srgba<f64> {
        Srgba::from_color(self.to_hsva())
    }
}

/// Color of the swatch sitting at `angle` on the ring at `distance`.
pub fn color_at(angle: f64, distance: f64, brightness: f64) -> WheelColor {
    WheelColor {
        hue: (angle / FULL_TURN).rem_euclid(1.0),
        saturation: distance.clamp(0.0, 1.0),
        brightness,
    }
}

/// Style-dependent layout math for one wheel.
#[derive(Debug, Clone, Copy)]
pub struct WheelGeometry<'a> {
    style: &'a WheelStyle,
}

impl<'a> WheelGeometry<'a> {
    pub fn new(style: &'a WheelStyle) -> Self {
        Self { style }
    }

    pub fn outer_radius(&self, size: Size) -> f64 {
        size.width.min(size.height) / 2.0 - self.style.padding
    }

    /// Swatches grow linearly towards the rim, but never below the minimum size.
    /// The exact center gets its own radius.
    pub fn dot_radius(&self, distance: f64) -> f64 {
        if distance == 0.0 {
            return self.style.center_radius;
        }
        self.style
            .min_circle_radius
            .max(self.style.max_circle_radius * distance)
    }

    /// Angles at which swatches of `dot_radius` are placed on a ring of `ring_radius`.
    pub fn ring_angular_positions(&self, dot_radius: f64, ring_radius: f64) -> Vec<f64> {
        let count = swatch_count(dot_radius, ring_radius, self.style.density);
        if count == 1 {
            return vec![0.0];
        }
        let step = FULL_TURN / (count - 1) as f64;
        (0..count).map(|i| i as f64 * step).collect()
    }

    /// Where a swatch at `angle` on the ring at `distance` lands on screen.
    pub fn position(&self, center: Point, outer_radius: f64, angle: f64, distance: f64) -> Point {
        let shifted = angle + self.shift(distance);
        let radius = (outer_radius - self.style.padding) * distance;
        Point::new(
            center.x + radius * (-shifted).cos(),
            center.y + radius * (-shifted).sin(),
        )
    }

    /// Per-ring twist in radians.
    pub fn shift(&self, distance: f64) -> f64 {
        (self.style.shift_degree * distance).to_radians()
    }
}

fn swatch_count(dot_radius: f64, ring_radius: f64, density: f64) -> usize {
    if 2.0 * dot_radius > ring_radius {
        return 1;
    }
    let fitting = (density * std::f64::consts::PI / (2.0 * dot_radius / ring_radius).asin()).floor();
    if !fitting.is_finite() || fitting < 1.0 {
        return 1;
    }
    fitting as usize
}
