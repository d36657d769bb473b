use super::geometry::WheelColor;
use super::widget::WheelStatus;
use async_channel::Sender;
use serde::Serialize;
use std::io::Write;

/// What the wheel reports to whoever owns the lamp connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WheelEvent {
    ColorSelected { color: WheelColor },
    BrightnessChanged { brightness: f64 },
}

pub trait WheelDelegate {
    fn color_selected(&mut self, color: WheelColor);
    fn brightness_changed(&mut self, status: &WheelStatus);
}

#[derive(Debug, Default)]
pub struct LogDelegate;

impl WheelDelegate for LogDelegate {
    fn color_selected(&mut self, color: WheelColor) {
        log::info!(
            "Color selected: hue {:.3} saturation {:.3} brightness {:.3}",
            color.hue,
            color.saturation,
            color.brightness
        );
    }

    fn brightness_changed(&mut self, status: &WheelStatus) {
        log::info!("Brightness changed to {:.3} ({})", status.brightness, status.phase);
    }
}

/// Writes one JSON object per event.
#[derive(Debug)]
pub struct JsonLinesDelegate<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesDelegate<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &WheelEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn emit(&mut self, event: WheelEvent) {
        if let Err(e) = self.write_event(&event) {
            log::error!("Failed to write wheel event: {}", e);
        }
    }
}

impl<W: Write> WheelDelegate for JsonLinesDelegate<W> {
    fn color_selected(&mut self, color: WheelColor) {
        self.emit(WheelEvent::ColorSelected { color });
    }

    fn brightness_changed(&mut self, status: &WheelStatus) {
        self.emit(WheelEvent::BrightnessChanged {
            brightness: status.brightness,
        });
    }
}

/// Forwards events to an async consumer. Events are dropped when the channel is full or closed.
#[derive(Debug, Clone)]
pub struct ChannelDelegate {
    tx: Sender<WheelEvent>,
}

impl ChannelDelegate {
    pub fn new(tx: Sender<WheelEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: WheelEvent) {
        if let Err(e) = self.tx.try_send(event) {
            log::warn!("Dropping wheel event: {}", e);
        }
    }
}

impl WheelDelegate for ChannelDelegate {
    fn color_selected(&mut self, color: WheelColor) {
        self.send(WheelEvent::ColorSelected { color });
    }

    fn brightness_changed(&mut self, status: &WheelStatus) {
        self.send(WheelEvent::BrightnessChanged {
            brightness: status.brightness,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::wheel::rotation::Phase;

    fn status(brightness: f64) -> WheelStatus {
        WheelStatus {
            brightness,
            rotation: 0.0,
            phase: Phase::Dragging,
        }
    }

    #[test]
    fn test_json_lines_delegate_writes_one_line_per_event() {
        let mut delegate = JsonLinesDelegate::new(Vec::new());
        delegate.color_selected(WheelColor {
            hue: 0.5,
            saturation: 0.25,
            brightness: 1.0,
        });
        delegate.brightness_changed(&status(0.75));

        let out = String::from_utf8(delegate.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "color_selected");
        assert_eq!(first["color"]["hue"], 0.5);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "brightness_changed");
        assert_eq!(second["brightness"], 0.75);
    }

    #[test]
    fn test_log_delegate_drives_a_wheel() {
        use crate::config::Config;
        use crate::gui::wheel::{ColorWheel, GesturePhase, Point, Size};

        let mut wheel = ColorWheel::new(&Config::default(), Size::new(300.0, 300.0), 0.5)
            .with_delegate(LogDelegate);
        assert!(wheel.tap(Point::new(150.0, 150.0)).is_some());
        wheel.handle_rotation(GesturePhase::Began, 0.0, 0.0);
        assert!(wheel.handle_rotation(GesturePhase::Changed, 0.3, 1.0));
        assert!(wheel.brightness() > 0.5);
    }

    #[test]
    fn test_channel_delegate_forwards_and_survives_closed_channel() {
        let (tx, rx) = async_channel::bounded(4);
        let mut delegate = ChannelDelegate::new(tx);
        delegate.brightness_changed(&status(0.1));
        assert_eq!(
            rx.try_recv().unwrap(),
            WheelEvent::BrightnessChanged { brightness: 0.1 }
        );

        drop(rx);
        delegate.brightness_changed(&status(0.2));
    }
}
