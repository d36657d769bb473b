use std::f64::consts::PI;

pub mod animation;
pub mod delegate;
pub mod geometry;
pub mod rotation;
pub mod scene;
pub mod tap;
#[cfg(feature = "cairo")]
pub mod view;
pub mod widget;

pub use animation::{AnimationDriver, AnimationFrame, AnimationId, Curve};
pub use delegate::{ChannelDelegate, JsonLinesDelegate, LogDelegate, WheelDelegate, WheelEvent};
pub use geometry::{Point, Size, WheelColor};
pub use rotation::{
    GesturePhase, GestureSource, Phase, ReleasePlan, RotationAction, RotationController,
    RotationDirection,
};
pub use scene::{Swatch, WheelScene};
#[cfg(feature = "cairo")]
pub use view::{RenderError, draw, write_png};
pub use widget::{ColorWheel, WheelStatus};

pub const FULL_TURN: f64 = 2.0 * PI;
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;
pub const NORMALIZED_RADIUS: f64 = 1.0; // taps and touches beyond this are off the wheel
pub const MIN_RING_STEP: f64 = 0.5; // keeps the ring loop moving with degenerate padding
pub const MAX_VIEW_EXTENT: f64 = 16384.0; // largest view side the host accepts, in points
pub const OVERSHOOT_LIMIT: f64 = PI; // undamped excursion at which the rubber band is fully stretched
pub const DAMPING_BOUND: f64 = PI / 8.0; // furthest the wheel visibly travels past a bound
pub const DISTANCE_FOLD_STEP: f64 = PI / 8.0; // stopping distance is reduced by this until below PI
pub const HISTORY_LEN: usize = 3;
pub const VELOCITY_TIME_SCALE: f64 = 10.0;
pub const SPRING_SETTLE_TOLERANCE: f64 = 1e-3; // fraction of the initial offset considered at rest
