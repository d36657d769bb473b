use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout parameters of the wheel. All lengths are in points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelStyle {
    /// Gap between the view border and the outermost ring.
    pub padding: f64,
    /// Radius of the single swatch in the middle of the wheel.
    pub center_radius: f64,
    pub min_circle_radius: f64,
    pub max_circle_radius: f64,
    /// Gap between two neighbouring rings.
    pub inner_padding: f64,
    /// Degrees each ring is rotated per unit of normalized distance.
    /// Zero lines the swatches up radially; anything else gives the flower look.
    pub shift_degree: f64,
    /// How tightly swatches are packed along a ring.
    pub density: f64,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            padding: 12.0,
            center_radius: 4.0,
            min_circle_radius: 1.0,
            max_circle_radius: 6.0,
            inner_padding: 2.0,
            shift_degree: 40.0,
            density: 0.8,
        }
    }
}

impl WheelStyle {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("padding", self.padding),
            ("center_radius", self.center_radius),
            ("min_circle_radius", self.min_circle_radius),
            ("max_circle_radius", self.max_circle_radius),
            ("inner_padding", self.inner_padding),
            ("density", self.density),
        ];
        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "style.{name} must be a finite non-negative number, got {value}"
            )));
        }
        if !self.shift_degree.is_finite() {
            return Err(ConfigError::Invalid("style.shift_degree must be finite".into()));
        }
        Ok(())
    }
}

/// Tuning of the rotation physics.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Upper bound of the release velocity (rad per sample-time unit).
    pub max_rotation_speed: f64,
    /// Releases slower than this settle in place.
    pub min_speed_threshold: f64,
    pub deceleration: f64,
    /// Seconds the decelerating animation takes.
    pub animation_duration: f64,
    pub spring_mass: f64,
    pub spring_damping: f64,
    pub spring_stiffness: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_rotation_speed: 0.7,
            min_speed_threshold: 0.06,
            deceleration: 0.1,
            animation_duration: 0.5,
            spring_mass: 1.0,
            spring_damping: 20.0,
            spring_stiffness: 1000.0,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_rotation_speed", self.max_rotation_speed),
            ("deceleration", self.deceleration),
            ("animation_duration", self.animation_duration),
            ("spring_mass", self.spring_mass),
            ("spring_damping", self.spring_damping),
            ("spring_stiffness", self.spring_stiffness),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "motion.{name} must be a finite positive number, got {value}"
            )));
        }
        if !self.min_speed_threshold.is_finite() || self.min_speed_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "motion.min_speed_threshold must be a finite non-negative number, got {}",
                self.min_speed_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub style: WheelStyle,
    #[serde(default)]
    pub motion: MotionConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.style.validate()?;
        self.motion.validate()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "lamp", "lamp").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("LAMP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
