//! Gesture-driven rotation of the wheel and the brightness it maps to.
//!
//! Two input channels feed the same reducer: a one-finger pan, delivered as
//! touch locations around the wheel center, and a two-finger rotation,
//! delivered as incremental angles. While dragging, the accumulated arc is
//! rubber-banded past its bounds. On release the controller either lets the
//! wheel coast to a stop, springs it back into range, or leaves it in place.
//!
//! ```text
//!   Idle ──began──> Dragging ──ended/cancelled──> Releasing
//!                                                  │  ├─> Decelerating ─┐
//!                                                  │  ├─> SnappingBack ─┤ settled
//!                                                  │  └─> Idle          │
//!   Idle <──────────────── (out of range? SnappingBack) <───────────────┘
//! ```

use super::animation::{AnimationDriver, AnimationId, Curve, Presentation};
use super::geometry::Point;
use super::{
    DAMPING_BOUND, DISTANCE_FOLD_STEP, FULL_TURN, HISTORY_LEN, OVERSHOOT_LIMIT,
    VELOCITY_TIME_SCALE,
};
use crate::config::MotionConfig;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    Releasing,
    Decelerating,
    SnappingBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RotationDirection {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }

    pub fn of_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Clockwise
        } else if delta < 0.0 {
            Self::CounterClockwise
        } else {
            Self::None
        }
    }

    /// Direction of travel between two `atan2` angles. A jump across the
    /// `±PI` seam counts as continuing in the direction of the jump.
    pub fn between(new_angle: f64, old_angle: f64) -> Self {
        if new_angle < 0.0 && old_angle > 0.0 && new_angle.abs() > FRAC_PI_2 {
            Self::Clockwise
        } else if new_angle > 0.0 && old_angle < 0.0 && new_angle.abs() > FRAC_PI_2 {
            Self::CounterClockwise
        } else if new_angle > old_angle {
            Self::Clockwise
        } else if new_angle < old_angle {
            Self::CounterClockwise
        } else {
            Self::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GestureSource {
    Pan,
    Rotation,
}

/// Signed arc travelled between two pan angles.
pub fn angle_delta(new_angle: f64, old_angle: f64) -> f64 {
    (new_angle.abs() - old_angle.abs()).abs() * RotationDirection::between(new_angle, old_angle).sign()
}

/// Rubber band: past either bound the wheel follows with diminishing
/// returns and never more than [`DAMPING_BOUND`] beyond it.
pub fn dampened(arc: f64) -> f64 {
    if arc < 0.0 {
        let progress = (arc.abs() / OVERSHOOT_LIMIT).clamp(0.0, 1.0);
        -(progress.sqrt() * FRAC_PI_2).sin() * DAMPING_BOUND
    } else if arc > FULL_TURN {
        let progress = ((arc - FULL_TURN) / OVERSHOOT_LIMIT).clamp(0.0, 1.0);
        FULL_TURN + (progress.sqrt() * FRAC_PI_2).sin() * DAMPING_BOUND
    } else {
        arc
    }
}

pub fn is_in_range(arc: f64) -> bool {
    (0.0..=FULL_TURN).contains(&arc)
}

/// How far the wheel coasts when released at `velocity`.
/// Distances of half a turn or more are folded back below `PI`.
pub fn stopping_distance(velocity: f64, deceleration: f64) -> f64 {
    let mut distance = velocity.powi(2) / (2.0 * deceleration);
    if !distance.is_finite() {
        return 0.0;
    }
    if distance >= PI {
        distance -= ((distance - PI) / DISTANCE_FOLD_STEP).floor() * DISTANCE_FOLD_STEP;
    }
    while distance >= PI {
        distance -= DISTANCE_FOLD_STEP;
    }
    distance
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleasePlan {
    SnapBack { target: f64 },
    Decelerate { target: f64 },
    Settle,
}

/// Decides what happens when the finger lifts with the wheel at `arc`.
pub fn release_plan(arc: f64, velocity: f64, motion: &MotionConfig) -> ReleasePlan {
    if !is_in_range(arc) {
        let target = if arc < 0.0 { 0.0 } else { FULL_TURN };
        return ReleasePlan::SnapBack { target };
    }
    if velocity.abs() > motion.min_speed_threshold {
        let distance = stopping_distance(velocity, motion.deceleration);
        let target = (arc + distance * velocity.signum()).clamp(0.0, FULL_TURN);
        return ReleasePlan::Decelerate { target };
    }
    ReleasePlan::Settle
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    delta: f64,
    time: f64,
}

/// The last few unsigned angle deltas of a gesture, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    samples: [Option<Sample>; HISTORY_LEN],
}

impl SampleHistory {
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_LEN];
    }

    pub fn push(&mut self, delta: f64, time: f64) {
        self.samples.rotate_left(1);
        self.samples[HISTORY_LEN - 1] = Some(Sample {
            delta: delta.abs(),
            time,
        });
    }

    /// Unsigned speed over the window, capped at `max_speed`.
    pub fn speed(&self, max_speed: f64) -> f64 {
        let mut samples = self.samples.iter().flatten();
        let Some(first) = samples.next() else {
            return 0.0;
        };
        let (distance, last) = samples.fold((first.delta, first), |(sum, _), s| (sum + s.delta, s));
        let elapsed = (last.time - first.time) * VELOCITY_TIME_SCALE;
        if elapsed.is_nan() || elapsed <= 0.0 {
            return 0.0;
        }
        (distance / elapsed).min(max_speed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationAction {
    pub should_redraw: bool,
    pub brightness_changed: bool,
}

impl RotationAction {
    pub fn new(should_redraw: bool, brightness_changed: bool) -> Self {
        Self {
            should_redraw,
            brightness_changed,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self::new(
            self.should_redraw || other.should_redraw,
            self.brightness_changed || other.brightness_changed,
        )
    }
}

#[derive(Debug)]
pub struct RotationController {
    motion: MotionConfig,
    phase: Phase,
    source: Option<GestureSource>,
    /// Channel refused at its began because the other one was dragging.
    ignored: Option<GestureSource>,
    /// Accumulated, undamped rotation.
    arc: f64,
    brightness: f64,
    presentation: Presentation,
    center: Point,
    last_angle: f64,
    last_direction: RotationDirection,
    history: SampleHistory,
    driver: AnimationDriver,
    pending: Option<AnimationId>,
}

impl RotationController {
    pub fn new(motion: MotionConfig, brightness: f64) -> Self {
        let brightness = brightness.clamp(0.0, 1.0);
        let arc = brightness * FULL_TURN;
        Self {
            motion,
            phase: Phase::Idle,
            source: None,
            ignored: None,
            arc,
            brightness,
            presentation: Presentation::new(arc, brightness),
            center: Point::default(),
            last_angle: FULL_TURN,
            last_direction: RotationDirection::None,
            history: SampleHistory::default(),
            driver: AnimationDriver::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn arc(&self) -> f64 {
        self.arc
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    pub fn pending_animation(&self) -> Option<AnimationId> {
        self.pending
    }

    pub fn set_motion(&mut self, motion: MotionConfig) {
        self.motion = motion;
    }

    /// Wheel center in the coordinate space pan locations are reported in.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Jumps straight to `brightness`, dropping any running animation.
    pub fn set_brightness(&mut self, brightness: f64) -> RotationAction {
        let brightness = brightness.clamp(0.0, 1.0);
        self.driver.cancel();
        self.pending = None;
        self.brightness = brightness;
        self.arc = brightness * FULL_TURN;
        self.presentation = Presentation::new(self.arc, brightness);
        if self.phase != Phase::Dragging {
            self.set_phase(Phase::Idle);
        }
        RotationAction::new(true, false)
    }

    pub fn pan(&mut self, phase: GesturePhase, location: Point, time: f64) -> RotationAction {
        let angle = location.angle_from(self.center);
        if phase == GesturePhase::Began {
            if self.begin(GestureSource::Pan, time) {
                self.last_angle = angle;
            }
            return RotationAction::default();
        }
        if !self.accepts(GestureSource::Pan, phase) {
            return RotationAction::default();
        }

        let delta = angle_delta(angle, self.last_angle);
        match phase {
            GesturePhase::Changed => {
                let action = self.drag(delta, time);
                self.last_direction = RotationDirection::between(angle, self.last_angle);
                self.last_angle = angle;
                action
            }
            GesturePhase::Ended => {
                self.history.push(delta, time);
                self.arc += delta;
                self.release()
            }
            GesturePhase::Cancelled => {
                self.history.push(delta, time);
                self.release()
            }
            GesturePhase::Began => unreachable!(),
        }
    }

    pub fn rotate(&mut self, phase: GesturePhase, delta: f64, time: f64) -> RotationAction {
        if phase == GesturePhase::Began {
            self.begin(GestureSource::Rotation, time);
            return RotationAction::default();
        }
        if !self.accepts(GestureSource::Rotation, phase) {
            return RotationAction::default();
        }

        match phase {
            GesturePhase::Changed => {
                let action = self.drag(delta, time);
                self.last_direction = RotationDirection::of_delta(delta);
                action
            }
            GesturePhase::Ended => {
                self.history.push(delta, time);
                self.arc += delta;
                self.release()
            }
            GesturePhase::Cancelled => {
                self.history.push(delta, time);
                self.release()
            }
            GesturePhase::Began => unreachable!(),
        }
    }

    /// Advances the running animation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> RotationAction {
        let Some(frame) = self.driver.tick(dt) else {
            return RotationAction::default();
        };
        self.presentation = frame.presentation;
        let action = RotationAction::new(true, false);
        if frame.settled {
            action.merge(self.animation_finished(frame.id))
        } else {
            action
        }
    }

    /// Completion of animation `id`. Completions of superseded animations are ignored.
    pub fn animation_finished(&mut self, id: AnimationId) -> RotationAction {
        if self.pending != Some(id) {
            log::debug!("Ignoring stale completion of animation {}", id);
            return RotationAction::default();
        }
        self.pending = None;
        if self.driver.current_id() == Some(id) {
            self.driver.cancel();
        }
        self.presentation = Presentation::new(self.arc, self.brightness);
        self.set_phase(Phase::Idle);

        if is_in_range(self.arc) {
            return RotationAction::new(true, false);
        }
        let target = if self.arc < 0.0 { 0.0 } else { FULL_TURN };
        self.snap_back(target)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Wheel rotation {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn begin(&mut self, source: GestureSource, time: f64) -> bool {
        if self.phase == Phase::Dragging && self.source.is_some_and(|s| s != source) {
            log::debug!("Ignoring {} gesture while another gesture is dragging", source);
            self.ignored = Some(source);
            return false;
        }
        if self.ignored == Some(source) {
            self.ignored = None;
        }
        if let Some(id) = self.driver.cancel() {
            log::debug!("Animation {} interrupted by {} gesture", id, source);
        }
        self.pending = None;
        self.source = Some(source);
        self.history.reset();
        self.history.push(0.0, time);
        self.last_direction = RotationDirection::None;
        self.set_phase(Phase::Dragging);
        true
    }

    fn accepts(&mut self, source: GestureSource, phase: GesturePhase) -> bool {
        if self.phase == Phase::Dragging && self.source == Some(source) {
            return true;
        }
        if self.ignored == Some(source) {
            if matches!(phase, GesturePhase::Ended | GesturePhase::Cancelled) {
                self.ignored = None;
            }
            log::debug!("Dropping {} of ignored {} gesture", phase, source);
            return false;
        }
        debug_assert!(
            self.source == Some(source),
            "{source} gesture {phase} without began"
        );
        log::warn!("Dropping {} gesture {} without began", source, phase);
        false
    }

    fn drag(&mut self, delta: f64, time: f64) -> RotationAction {
        self.history.push(delta, time);
        self.arc += delta;

        let damped = dampened(self.arc);
        self.presentation.rotation = damped;
        let brightness = damped / FULL_TURN;
        if !(0.0..=1.0).contains(&brightness) {
            return RotationAction::new(true, false);
        }
        self.brightness = brightness;
        self.presentation.brightness = brightness;
        RotationAction::new(true, true)
    }

    fn release(&mut self) -> RotationAction {
        self.set_phase(Phase::Releasing);
        self.source = None;
        let velocity =
            self.history.speed(self.motion.max_rotation_speed) * self.last_direction.sign();

        match release_plan(self.arc, velocity, &self.motion) {
            ReleasePlan::SnapBack { target } => self.snap_back(target),
            ReleasePlan::Decelerate { target } => {
                log::debug!("Coasting at {:.3} from {:.3} to {:.3}", velocity, self.arc, target);
                let from = self.presentation;
                let changed = self.settle_model(target);
                let to = Presentation::new(self.arc, self.brightness);
                self.pending = Some(self.driver.start(Curve::ease_out(&self.motion), from, to));
                self.set_phase(Phase::Decelerating);
                RotationAction::new(true, changed)
            }
            ReleasePlan::Settle => {
                self.set_phase(Phase::Idle);
                RotationAction::default()
            }
        }
    }

    fn snap_back(&mut self, target: f64) -> RotationAction {
        log::debug!("Snapping back from {:.3} to {:.3}", self.arc, target);
        let changed = self.settle_model(target);
        let from = Presentation::new(self.presentation.rotation, self.brightness);
        let to = Presentation::new(self.arc, self.brightness);
        self.presentation.brightness = self.brightness;
        self.pending = Some(self.driver.start(Curve::spring(&self.motion), from, to));
        self.set_phase(Phase::SnappingBack);
        RotationAction::new(true, changed)
    }

    /// Moves the model to its resting value ahead of the animation.
    fn settle_model(&mut self, arc: f64) -> bool {
        let brightness = arc / FULL_TURN;
        let changed = brightness != self.brightness;
        self.arc = arc;
        self.brightness = brightness;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;
    const FRAME: f64 = 1.0 / 60.0;

    fn on_circle(angle: f64) -> Point {
        Point::new(100.0 * angle.cos(), 100.0 * angle.sin())
    }

    fn settle(controller: &mut RotationController) {
        for _ in 0..1000 {
            if !controller.is_animating() {
                return;
            }
            controller.tick(FRAME);
        }
        panic!("animation never settled");
    }

    #[test]
    fn test_direction_heuristic() {
        assert_eq!(RotationDirection::between(0.2, 0.1), RotationDirection::Clockwise);
        assert_eq!(RotationDirection::between(0.1, 0.2), RotationDirection::CounterClockwise);
        // crossing the seam at ±PI
        assert_eq!(RotationDirection::between(-3.0, 3.0), RotationDirection::Clockwise);
        assert_eq!(RotationDirection::between(3.0, -3.0), RotationDirection::CounterClockwise);
        // crossing zero is an ordinary move
        assert_eq!(RotationDirection::between(-0.1, 0.1), RotationDirection::CounterClockwise);
        assert_eq!(RotationDirection::between(0.1, -0.1), RotationDirection::Clockwise);
        assert_eq!(RotationDirection::between(1.0, 1.0), RotationDirection::None);
    }

    #[test]
    fn test_angle_delta_is_signed_by_direction() {
        assert!((angle_delta(0.5, 0.2) - 0.3).abs() < EPSILON);
        assert!((angle_delta(0.2, 0.5) + 0.3).abs() < EPSILON);
        assert!((angle_delta(-0.5, -0.2) + 0.3).abs() < EPSILON);
        assert_eq!(angle_delta(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_dampened_is_bounded_and_continuous() {
        assert_eq!(dampened(1.0), 1.0);
        assert_eq!(dampened(0.0), 0.0);
        assert_eq!(dampened(FULL_TURN), FULL_TURN);
        assert!((dampened(-PI) + PI / 8.0).abs() < EPSILON);
        assert!((dampened(-100.0) + PI / 8.0).abs() < EPSILON);
        assert!((dampened(3.0 * PI) - (FULL_TURN + PI / 8.0)).abs() < EPSILON);
        assert!((dampened(100.0) - (FULL_TURN + PI / 8.0)).abs() < EPSILON);
        assert!(dampened(-1e-9).abs() < 1e-3);
        assert!((dampened(FULL_TURN + 1e-9) - FULL_TURN).abs() < 1e-3);

        let mut prev = dampened(-4.0);
        for step in 1..=200 {
            let value = dampened(-4.0 + step as f64 * 0.07);
            assert!(value >= prev, "not monotonic at step {step}");
            prev = value;
        }
    }

    #[test]
    fn test_release_plan_decelerates_to_exact_target() {
        let motion = MotionConfig::default();
        let plan = release_plan(1.5 * PI, 0.5, &motion);
        // 0.5^2 / (2 * 0.1) = 1.25, below PI so nothing is folded
        assert_eq!(plan, ReleasePlan::Decelerate { target: 1.5 * PI + 1.25 });
        match plan {
            ReleasePlan::Decelerate { target } => {
                assert!((target - 5.962_388_980_384_69).abs() < 1e-12)
            }
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[test]
    fn test_release_plan_clamps_and_snaps() {
        let motion = MotionConfig::default();
        assert_eq!(
            release_plan(6.0, 0.7, &motion),
            ReleasePlan::Decelerate { target: FULL_TURN }
        );
        assert_eq!(
            release_plan(0.2, -0.7, &motion),
            ReleasePlan::Decelerate { target: 0.0 }
        );
        assert_eq!(
            release_plan(3.0 * PI, 0.0, &motion),
            ReleasePlan::SnapBack { target: FULL_TURN }
        );
        assert_eq!(
            release_plan(-0.3, 0.7, &motion),
            ReleasePlan::SnapBack { target: 0.0 }
        );
        assert_eq!(release_plan(2.0, 0.05, &motion), ReleasePlan::Settle);
        assert_eq!(release_plan(2.0, -0.06, &motion), ReleasePlan::Settle);
    }

    #[test]
    fn test_stopping_distance_folds_below_half_turn() {
        // 1.0^2 / 0.2 = 5.0 -> minus PI/8 until below PI
        let distance = stopping_distance(1.0, 0.1);
        assert!(distance < PI);
        assert!(distance >= PI - DISTANCE_FOLD_STEP);
        let folds = ((5.0 - distance) / DISTANCE_FOLD_STEP).round();
        assert!((5.0 - folds * DISTANCE_FOLD_STEP - distance).abs() < 1e-9);

        assert!(stopping_distance(1e12, 0.1) < PI);
        assert_eq!(stopping_distance(f64::INFINITY, 0.1), 0.0);
    }

    #[test]
    fn test_history_speed() {
        let mut history = SampleHistory::default();
        assert_eq!(history.speed(0.7), 0.0);
        history.push(0.0, 1.0);
        assert_eq!(history.speed(0.7), 0.0);
        history.push(-0.02, 1.5);
        history.push(0.02, 2.0);
        // 0.04 / (1.0 * 10)
        assert!((history.speed(0.7) - 0.004).abs() < EPSILON);

        history.push(5.0, 2.01);
        // window is now the last three samples: 5.04 / 5.1, capped
        assert_eq!(history.speed(0.7), 0.7);
        assert!((history.speed(2.0) - 5.04 / 5.1).abs() < 1e-9);

        history.reset();
        history.push(0.3, 4.0);
        history.push(0.3, 4.0);
        assert_eq!(history.speed(0.7), 0.0);
    }

    #[test]
    fn test_pan_drag_maps_arc_to_brightness() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(0.0), 0.0);
        assert_eq!(controller.phase(), Phase::Dragging);

        let action = controller.pan(GesturePhase::Changed, on_circle(0.4), 1.0);
        assert_eq!(action, RotationAction::new(true, true));
        assert!((controller.arc() - (PI + 0.4)).abs() < EPSILON);
        assert!((controller.brightness() - (PI + 0.4) / FULL_TURN).abs() < EPSILON);
        assert_eq!(controller.presentation().rotation, controller.arc());

        controller.pan(GesturePhase::Changed, on_circle(0.1), 2.0);
        assert!((controller.arc() - (PI + 0.1)).abs() < EPSILON);
    }

    #[test]
    fn test_pan_across_seam_keeps_direction() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(3.0), 0.0);
        controller.pan(GesturePhase::Changed, on_circle(3.1), 1.0);
        controller.pan(GesturePhase::Changed, on_circle(-3.1), 2.0);
        controller.pan(GesturePhase::Changed, on_circle(-3.0), 3.0);
        assert!(controller.arc() > PI, "arc went backwards: {}", controller.arc());
    }

    #[test]
    fn test_overshoot_is_damped_without_brightness_change() {
        let mut controller = RotationController::new(MotionConfig::default(), 1.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        let action = controller.rotate(GesturePhase::Changed, 0.5, 0.1);
        assert_eq!(action, RotationAction::new(true, false));
        assert_eq!(controller.brightness(), 1.0);
        assert!(controller.presentation().rotation > FULL_TURN);
        assert!(controller.presentation().rotation < FULL_TURN + DAMPING_BOUND);
        assert!((controller.arc() - (FULL_TURN + 0.5)).abs() < EPSILON);
    }

    #[test]
    fn test_overshoot_to_three_pi_snaps_back_to_full_turn() {
        let mut controller = RotationController::new(MotionConfig::default(), 1.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        controller.rotate(GesturePhase::Changed, PI / 2.0, 0.1);
        controller.rotate(GesturePhase::Changed, PI / 2.0, 0.2);
        assert!((controller.arc() - 3.0 * PI).abs() < EPSILON);

        // finger rests before lifting, so the release is slow
        controller.rotate(GesturePhase::Ended, 0.0, 10.0);
        assert_eq!(controller.phase(), Phase::SnappingBack);
        assert_eq!(controller.arc(), FULL_TURN);
        assert_eq!(controller.brightness(), 1.0);
        assert!(controller.presentation().rotation > FULL_TURN);

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.brightness(), 1.0);
        assert_eq!(controller.presentation().rotation, FULL_TURN);
    }

    #[test]
    fn test_undershoot_snaps_back_to_zero() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.05);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        controller.rotate(GesturePhase::Changed, -1.0, 0.1);
        assert!(controller.presentation().rotation < 0.0);
        let action = controller.rotate(GesturePhase::Cancelled, 0.0, 0.2);
        assert_eq!(controller.phase(), Phase::SnappingBack);
        assert!(action.brightness_changed);
        assert_eq!(controller.brightness(), 0.0);
        settle(&mut controller);
        assert_eq!(controller.presentation(), Presentation::new(0.0, 0.0));
    }

    #[test]
    fn test_fast_release_coasts_to_target() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(0.0), 0.0);
        controller.pan(GesturePhase::Changed, on_circle(0.1), 0.01);
        controller.pan(GesturePhase::Changed, on_circle(0.2), 0.02);
        let on_screen = controller.presentation().rotation;
        let action = controller.pan(GesturePhase::Ended, on_circle(0.3), 0.03);

        // speed capped at 0.7 -> 0.49 / 0.2 = 2.45
        let expected = PI + 0.3 + 2.45;
        assert_eq!(controller.phase(), Phase::Decelerating);
        assert!(action.brightness_changed);
        assert!((controller.arc() - expected).abs() < 1e-9);
        assert!((controller.brightness() - expected / FULL_TURN).abs() < 1e-9);
        assert_eq!(controller.presentation().rotation, on_screen);

        controller.tick(FRAME);
        let midway = controller.presentation();
        assert!(midway.rotation > on_screen && midway.rotation < expected);
        assert!(midway.brightness < controller.brightness());

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!((controller.presentation().rotation - expected).abs() < 1e-9);
    }

    #[test]
    fn test_slow_release_settles_in_place() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(0.0), 0.0);
        controller.pan(GesturePhase::Changed, on_circle(0.05), 1.0);
        controller.pan(GesturePhase::Changed, on_circle(0.1), 2.0);
        let arc = controller.arc();
        let action = controller.pan(GesturePhase::Ended, on_circle(0.1), 3.0);
        assert_eq!(action, RotationAction::default());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(!controller.is_animating());
        assert_eq!(controller.arc(), arc);
    }

    #[test]
    fn test_new_gesture_supersedes_animation_and_ignores_stale_completion() {
        let mut controller = RotationController::new(MotionConfig::default(), 1.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        controller.rotate(GesturePhase::Changed, 1.0, 0.1);
        controller.rotate(GesturePhase::Ended, 0.0, 0.2);
        let stale = controller.pending_animation().unwrap();
        controller.tick(FRAME);

        controller.pan(GesturePhase::Began, on_circle(0.0), 1.0);
        assert_eq!(controller.phase(), Phase::Dragging);
        assert!(!controller.is_animating());

        let action = controller.animation_finished(stale);
        assert_eq!(action, RotationAction::default());
        assert_eq!(controller.phase(), Phase::Dragging);
    }

    #[test]
    fn test_second_channel_is_ignored_while_dragging() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(0.0), 0.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.1);
        let action = controller.rotate(GesturePhase::Changed, 1.0, 0.2);
        assert_eq!(action, RotationAction::default());
        assert_eq!(controller.arc(), PI);

        controller.pan(GesturePhase::Changed, on_circle(0.2), 0.3);
        assert!((controller.arc() - (PI + 0.2)).abs() < EPSILON);
    }

    #[test]
    fn test_set_brightness_resets_arc_and_cancels_animation() {
        let mut controller = RotationController::new(MotionConfig::default(), 1.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        controller.rotate(GesturePhase::Changed, 1.0, 0.1);
        controller.rotate(GesturePhase::Ended, 0.0, 0.2);
        assert!(controller.is_animating());

        controller.set_brightness(1.7);
        assert_eq!(controller.brightness(), 1.0);
        assert_eq!(controller.arc(), FULL_TURN);
        assert!(!controller.is_animating());
        assert_eq!(controller.phase(), Phase::Idle);

        controller.set_brightness(0.25);
        assert_eq!(controller.arc(), PI / 2.0);
        assert_eq!(controller.presentation(), Presentation::new(PI / 2.0, 0.25));
    }

    #[test]
    fn test_ignored_channel_stays_ignored_after_other_gesture_ends() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.pan(GesturePhase::Began, on_circle(0.0), 0.0);
        controller.rotate(GesturePhase::Began, 0.0, 0.1);
        controller.pan(GesturePhase::Ended, on_circle(0.0), 5.0);
        assert_eq!(controller.phase(), Phase::Idle);

        let action = controller.rotate(GesturePhase::Changed, 0.2, 5.1);
        assert_eq!(action, RotationAction::default());
        assert_eq!(controller.arc(), PI);
        controller.rotate(GesturePhase::Ended, 0.0, 5.2);
        assert_eq!(controller.phase(), Phase::Idle);

        controller.rotate(GesturePhase::Began, 0.0, 6.0);
        controller.rotate(GesturePhase::Changed, 0.2, 7.0);
        assert!((controller.arc() - (PI + 0.2)).abs() < EPSILON);
    }

    #[test]
    fn test_completion_out_of_range_snaps_back_again() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.rotate(GesturePhase::Began, 0.0, 0.0);
        controller.rotate(GesturePhase::Changed, 0.1, 0.01);
        controller.rotate(GesturePhase::Ended, 0.1, 0.02);
        assert_eq!(controller.phase(), Phase::Decelerating);
        let finished = controller.pending_animation().unwrap();

        controller.arc = FULL_TURN + 0.5;
        let action = controller.animation_finished(finished);
        assert!(action.should_redraw);
        assert_eq!(controller.phase(), Phase::SnappingBack);
        assert_eq!(controller.arc(), FULL_TURN);
        assert_eq!(controller.brightness(), 1.0);
        let snap = controller.pending_animation().unwrap();
        assert_ne!(snap, finished);

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.presentation().rotation, FULL_TURN);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "without began")]
    fn test_change_without_begin_is_a_programming_error() {
        let mut controller = RotationController::new(MotionConfig::default(), 0.5);
        controller.rotate(GesturePhase::Changed, 0.3, 0.0);
    }
}
