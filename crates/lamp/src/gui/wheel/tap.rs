use super::geometry::{Point, WheelColor, WheelGeometry, color_at};
use super::{FULL_TURN, NORMALIZED_RADIUS};
use crate::config::WheelStyle;

/// Distance from `point` to `center`, where 1 is the wheel's outer radius.
pub fn normalized_distance(point: Point, center: Point, radius: f64) -> f64 {
    point.distance_to(center) / radius
}

/// Undoes the ring twist so the angle matches the swatch drawn under `point`.
pub fn corrected_angle(point: Point, center: Point, distance: f64, style: &WheelStyle) -> f64 {
    let raw = point.angle_from(center).rem_euclid(FULL_TURN);
    let shift = WheelGeometry::new(style).shift(distance);
    (FULL_TURN - (raw + shift)).rem_euclid(FULL_TURN)
}

/// Resolves a tap in wheel space to the color under it. Taps off the wheel yield `None`.
pub fn select(
    tap: Point,
    center: Point,
    radius: f64,
    style: &WheelStyle,
    brightness: f64,
) -> Option<WheelColor> {
    if radius.is_nan() || radius <= 0.0 {
        return None;
    }
    let distance = normalized_distance(tap, center, radius);
    if distance > NORMALIZED_RADIUS {
        return None;
    }
    let angle = corrected_angle(tap, center, distance, style);
    Some(color_at(angle, distance, brightness))
}
