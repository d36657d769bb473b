//! Tick-driven interpolation of the wheel's on-screen rotation and brightness.
//!
//! The host calls [`AnimationDriver::tick`] once per display frame. Every
//! animation produces frames in temporal order and ends with exactly one
//! frame whose `settled` flag is set. Starting a new animation replaces the
//! running one, which then never settles.

use super::SPRING_SETTLE_TOLERANCE;
use crate::config::MotionConfig;
use derive_more::{Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("#{_0}")]
pub struct AnimationId(u64);

/// What is currently on screen, as opposed to the authoritative model values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub rotation: f64,
    pub brightness: f64,
}

impl Presentation {
    pub fn new(rotation: f64, brightness: f64) -> Self {
        Self {
            rotation,
            brightness,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Fast start, gentle stop.
    EaseOut { duration: f64 },
    /// Damped harmonic oscillator released at rest.
    Spring(Spring),
}

impl Curve {
    pub fn ease_out(motion: &MotionConfig) -> Self {
        Self::EaseOut {
            duration: motion.animation_duration,
        }
    }

    pub fn spring(motion: &MotionConfig) -> Self {
        Self::Spring(Spring {
            mass: motion.spring_mass,
            damping: motion.spring_damping,
            stiffness: motion.spring_stiffness,
        })
    }

    pub fn duration(&self) -> f64 {
        match self {
            Self::EaseOut { duration } => *duration,
            Self::Spring(spring) => spring.settling_duration(),
        }
    }

    /// Fraction of the way from start to target after `t` seconds.
    /// Springs overshoot, so this may leave `0..=1`.
    pub fn progress(&self, t: f64) -> f64 {
        match self {
            Self::EaseOut { duration } => {
                if *duration <= 0.0 {
                    return 1.0;
                }
                let x = (t / duration).clamp(0.0, 1.0);
                1.0 - (1.0 - x).powi(3)
            }
            Self::Spring(spring) => 1.0 - spring.remaining(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub mass: f64,
    pub damping: f64,
    pub stiffness: f64,
}

impl Spring {
    fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Displacement left after `t` seconds, as a fraction of the initial displacement.
    pub fn remaining(&self, t: f64) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() < 1e-9 {
            (-omega * t).exp() * (1.0 + omega * t)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let s1 = -omega * (zeta - root);
            let s2 = -omega * (zeta + root);
            (s2 * (s1 * t).exp() - s1 * (s2 * t).exp()) / (s2 - s1)
        }
    }

    /// Time until the slowest mode has decayed below the settle tolerance.
    pub fn settling_duration(&self) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();
        let decay_rate = if zeta <= 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        if !(decay_rate.is_finite() && decay_rate > 0.0) {
            return 0.0;
        }
        (1.0 / SPRING_SETTLE_TOLERANCE).ln() / decay_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub id: AnimationId,
    pub presentation: Presentation,
    pub settled: bool,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    id: AnimationId,
    curve: Curve,
    duration: f64,
    elapsed: f64,
    from: Presentation,
    to: Presentation,
}

impl Animation {
    fn sample(&self) -> Presentation {
        let p = self.curve.progress(self.elapsed);
        Presentation::new(
            self.from.rotation + (self.to.rotation - self.from.rotation) * p,
            self.from.brightness + (self.to.brightness - self.from.brightness) * p,
        )
    }
}

#[derive(Debug, Default)]
pub struct AnimationDriver {
    active: Option<Animation>,
    next_id: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating from `from` to `to`, superseding any running animation.
    pub fn start(&mut self, curve: Curve, from: Presentation, to: Presentation) -> AnimationId {
        self.next_id += 1;
        let id = AnimationId(self.next_id);
        if let Some(old) = self.active.take() {
            log::debug!("Animation {} superseded by {}", old.id, id);
        }
        self.active = Some(Animation {
            id,
            curve,
            duration: curve.duration(),
            elapsed: 0.0,
            from,
            to,
        });
        id
    }

    /// Drops the running animation without a settled frame.
    pub fn cancel(&mut self) -> Option<AnimationId> {
        self.active.take().map(|a| a.id)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_id(&self) -> Option<AnimationId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn tick(&mut self, dt: f64) -> Option<AnimationFrame> {
        let animation = self.active.as_mut()?;
        if dt.is_finite() && dt > 0.0 {
            animation.elapsed += dt;
        }

        if animation.elapsed >= animation.duration {
            let frame = AnimationFrame {
                id: animation.id,
                presentation: animation.to,
                settled: true,
            };
            self.active = None;
            return Some(frame);
        }

        Some(AnimationFrame {
            id: animation.id,
            presentation: animation.sample(),
            settled: false,
        })
    }
}
