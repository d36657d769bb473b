use crate::gui::wheel::{GesturePhase, Point};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Input(InputEvent),
    /// Seconds since the previous frame.
    Frame(f64),
    ConfigReload,
    Quit,
}

/// One line of host input. Times are in seconds, positions in view points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Pan {
        phase: GesturePhase,
        time: f64,
        x: f64,
        y: f64,
    },
    Rotation {
        phase: GesturePhase,
        time: f64,
        #[serde(default)]
        delta: f64,
        /// Both finger positions, required on `began`.
        #[serde(default)]
        touches: Vec<Point>,
    },
    Tap {
        x: f64,
        y: f64,
    },
    Brightness {
        value: f64,
    },
}
