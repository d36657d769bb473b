use crate::events::InputEvent;
use crate::gui::wheel::{ColorWheel, GesturePhase, GestureSource, Point};

/// Feeds host input into the wheel, one gesture at a time.
///
/// Gestures that start off the wheel, or while another gesture is in
/// progress, are dropped together with all of their later samples.
#[derive(Debug)]
pub struct Host {
    wheel: ColorWheel,
    active: Option<GestureSource>,
    rejected: Vec<GestureSource>,
}

impl Host {
    pub fn new(wheel: ColorWheel) -> Self {
        Self {
            wheel,
            active: None,
            rejected: Vec::new(),
        }
    }

    pub fn wheel(&self) -> &ColorWheel {
        &self.wheel
    }

    pub fn wheel_mut(&mut self) -> &mut ColorWheel {
        &mut self.wheel
    }

    /// Returns whether the wheel needs a redraw.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Pan { phase, time, x, y } => {
                let location = Point::new(x, y);
                if !self.admit(GestureSource::Pan, phase, &[location]) {
                    return false;
                }
                self.wheel.handle_pan(phase, location, time)
            }
            InputEvent::Rotation {
                phase,
                time,
                delta,
                touches,
            } => {
                if !self.admit(GestureSource::Rotation, phase, &touches) {
                    return false;
                }
                self.wheel.handle_rotation(phase, delta, time)
            }
            InputEvent::Tap { x, y } => {
                self.wheel.tap(Point::new(x, y));
                false
            }
            InputEvent::Brightness { value } => {
                self.wheel.set_brightness(value);
                true
            }
        }
    }

    fn admit(&mut self, source: GestureSource, phase: GesturePhase, touches: &[Point]) -> bool {
        let ending = matches!(phase, GesturePhase::Ended | GesturePhase::Cancelled);

        if phase == GesturePhase::Began {
            self.rejected.retain(|s| *s != source);
            if let Some(active) = self.active {
                log::debug!("Ignoring {} gesture during {} gesture", source, active);
                self.rejected.push(source);
                return false;
            }
            if !self.wheel.should_begin(touches) {
                log::debug!("{} gesture started off the wheel at {:?}", source, touches);
                self.rejected.push(source);
                return false;
            }
            self.active = Some(source);
            return true;
        }

        if self.active == Some(source) {
            if ending {
                self.active = None;
            }
            return true;
        }
        if self.rejected.contains(&source) {
            if ending {
                self.rejected.retain(|s| *s != source);
            }
            log::debug!("Dropping {} of rejected {} gesture", phase, source);
            return false;
        }
        log::warn!("Dropping {} {} without a matching began", source, phase);
        false
    }
}
