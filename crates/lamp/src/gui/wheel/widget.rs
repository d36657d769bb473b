use super::NORMALIZED_RADIUS;
use super::animation::AnimationId;
use super::delegate::WheelDelegate;
use super::geometry::{Point, Size, WheelColor, WheelGeometry};
use super::rotation::{GesturePhase, Phase, RotationAction, RotationController};
use super::scene::WheelScene;
use super::tap;
use crate::config::{Config, MotionConfig, WheelStyle};
use serde::Serialize;

/// Read-only snapshot handed to delegates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelStatus {
    /// Model brightness, already at its resting value while a release animates.
    pub brightness: f64,
    /// Rotation currently on screen.
    pub rotation: f64,
    pub phase: Phase,
}

/// The color wheel: owns style, size, rotation state and the cached scene,
/// and reports selections and brightness changes to its delegate.
///
/// All points are in host coordinates, where the drawn wheel is rotated by
/// [`ColorWheel::rotation`] around [`ColorWheel::center`].
pub struct ColorWheel {
    style: WheelStyle,
    size: Size,
    controller: RotationController,
    delegate: Option<Box<dyn WheelDelegate>>,
    cache: Option<WheelScene>,
}

impl ColorWheel {
    pub fn new(config: &Config, size: Size, brightness: f64) -> Self {
        let mut controller = RotationController::new(config.motion, brightness);
        controller.set_center(size.center());
        Self {
            style: config.style,
            size,
            controller,
            delegate: None,
            cache: None,
        }
    }

    pub fn with_delegate(mut self, delegate: impl WheelDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    pub fn style(&self) -> &WheelStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: WheelStyle) {
        self.style = style;
        self.cache = None;
    }

    pub fn update_style(&mut self, f: impl FnOnce(&mut WheelStyle)) {
        f(&mut self.style);
        self.cache = None;
    }

    pub fn set_motion(&mut self, motion: MotionConfig) {
        self.controller.set_motion(motion);
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.set_style(config.style);
        self.set_motion(config.motion);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.controller.set_center(size.center());
        self.cache = None;
    }

    pub fn center(&self) -> Point {
        self.size.center()
    }

    pub fn outer_radius(&self) -> f64 {
        WheelGeometry::new(&self.style).outer_radius(self.size)
    }

    pub fn brightness(&self) -> f64 {
        self.controller.brightness()
    }

    /// Jumps to `brightness` without notifying the delegate.
    pub fn set_brightness(&mut self, brightness: f64) {
        self.controller.set_brightness(brightness);
    }

    pub fn rotation(&self) -> f64 {
        self.controller.presentation().rotation
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    pub fn status(&self) -> WheelStatus {
        WheelStatus {
            brightness: self.controller.brightness(),
            rotation: self.rotation(),
            phase: self.controller.phase(),
        }
    }

    /// Whether a gesture starting with `touches` belongs to the wheel.
    pub fn should_begin(&self, touches: &[Point]) -> bool {
        let radius = self.outer_radius();
        if touches.is_empty() || radius.is_nan() || radius <= 0.0 {
            return false;
        }
        let center = self.center();
        touches
            .iter()
            .all(|t| tap::normalized_distance(*t, center, radius) <= NORMALIZED_RADIUS)
    }

    /// Maps a host point into the unrotated space the scene is laid out in.
    pub fn to_local(&self, point: Point) -> Point {
        point.rotated_around(self.center(), -self.rotation())
    }

    pub fn handle_pan(&mut self, phase: GesturePhase, location: Point, time: f64) -> bool {
        let action = self.controller.pan(phase, location, time);
        self.apply(action)
    }

    pub fn handle_rotation(&mut self, phase: GesturePhase, delta: f64, time: f64) -> bool {
        let action = self.controller.rotate(phase, delta, time);
        self.apply(action)
    }

    /// Resolves a tap and reports the color, if it landed on the wheel.
    pub fn tap(&mut self, point: Point) -> Option<WheelColor> {
        let local = self.to_local(point);
        let color = tap::select(
            local,
            self.center(),
            self.outer_radius(),
            &self.style,
            self.controller.brightness(),
        )?;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.color_selected(color);
        }
        Some(color)
    }

    /// Advances animations by `dt` seconds. Returns whether the wheel needs a redraw.
    pub fn tick(&mut self, dt: f64) -> bool {
        let action = self.controller.tick(dt);
        self.apply(action)
    }

    /// Completion reported by a host-driven animation.
    pub fn animation_finished(&mut self, id: AnimationId) -> bool {
        let action = self.controller.animation_finished(id);
        self.apply(action)
    }

    /// The scene for the brightness currently on screen, rendered on demand.
    pub fn scene(&mut self) -> &WheelScene {
        let brightness = self.controller.presentation().brightness;
        if self
            .cache
            .as_ref()
            .is_some_and(|scene| scene.brightness != brightness)
        {
            self.cache = None;
        }
        self.cache
            .get_or_insert_with(|| WheelScene::render(&self.style, self.size, brightness))
    }

    fn apply(&mut self, action: RotationAction) -> bool {
        if action.brightness_changed {
            let status = self.status();
            if let Some(delegate) = self.delegate.as_mut() {
                delegate.brightness_changed(&status);
            }
        }
        action.should_redraw
    }
}

impl std::fmt::Debug for ColorWheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorWheel")
            .field("style", &self.style)
            .field("size", &self.size)
            .field("status", &self.status())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
