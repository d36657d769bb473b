//! Vector description of the wheel: concentric rings of colored swatches.
//!
//! The scene is a pure function of style, view size and brightness, so a
//! host can cache it and compare it cheaply. Rotation is not part of the
//! scene; hosts apply it as a transform around [`WheelScene::center`].

use super::MIN_RING_STEP;
use super::geometry::{Point, Size, WheelColor, WheelGeometry, color_at};
use crate::config::WheelStyle;
use serde::Serialize;

/// One filled and stroked circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Swatch {
    pub center: Point,
    pub radius: f64,
    /// Stroke width, equal to the radius so neighbouring swatches bleed together slightly.
    pub line_width: f64,
    pub color: WheelColor,
    /// Index of the ring, counted from the rim. The center swatch has the highest index.
    pub ring: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelScene {
    pub size: Size,
    pub center: Point,
    pub outer_radius: f64,
    pub brightness: f64,
    pub style: WheelStyle,
    pub swatches: Vec<Swatch>,
}

impl WheelScene {
    pub fn ring_count(&self) -> usize {
        self.swatches.last().map_or(0, |s| s.ring + 1)
    }

    pub fn center_swatch(&self) -> Option<&Swatch> {
        self.swatches.last()
    }

    /// Lays the rings out from the rim inwards and finishes with the center swatch.
    pub fn render(style: &WheelStyle, size: Size, brightness: f64) -> Self {
        let geometry = WheelGeometry::new(style);
        let center = size.center();
        let outer_radius = geometry.outer_radius(size);
        let mut swatches = Vec::new();
        let mut ring = 0;

        if outer_radius.is_finite() && outer_radius > 0.0 {
            let mut inner_radius = outer_radius;
            let mut prev_dot_radius = geometry.dot_radius(1.0);

            loop {
                let distance = inner_radius / outer_radius;
                let dot_radius = geometry.dot_radius(distance);

                swatches.extend(
                    geometry
                        .ring_angular_positions(dot_radius, inner_radius)
                        .into_iter()
                        .map(|angle| Swatch {
                            center: geometry.position(center, outer_radius, angle, distance),
                            radius: dot_radius,
                            line_width: dot_radius,
                            color: color_at(angle, distance, brightness),
                            ring,
                        }),
                );
                ring += 1;

                let step = prev_dot_radius + 2.0 * dot_radius + style.inner_padding;
                let next = inner_radius - step.max(MIN_RING_STEP);
                // the step can vanish below the precision of a huge radius
                if next >= inner_radius {
                    log::warn!("Ring step lost at radius {}, stopping", inner_radius);
                    break;
                }
                inner_radius = next;
                prev_dot_radius = dot_radius;

                if inner_radius <= 2.0 * style.center_radius + dot_radius {
                    break;
                }
            }
        }

        let center_radius = geometry.dot_radius(0.0);
        swatches.push(Swatch {
            center: geometry.position(center, outer_radius, 0.0, 0.0),
            radius: center_radius,
            line_width: center_radius,
            color: color_at(0.0, 0.0, brightness),
            ring,
        });

        log::debug!(
            "Rendered wheel: {} rings, {} swatches, brightness {:.3}",
            ring + 1,
            swatches.len(),
            brightness
        );

        Self {
            size,
            center,
            outer_radius,
            brightness,
            style: *style,
            swatches,
        }
    }
}
