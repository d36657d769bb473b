use anyhow::Context;
use clap::{Parser, Subcommand};
use lamp::config;
use lamp::events::AppEvent;
use lamp::gui::wheel::{
    ColorWheel, DEFAULT_BRIGHTNESS, JsonLinesDelegate, LogDelegate, MAX_VIEW_EXTENT, Size,
    WheelScene,
};
use lamp::sys::host::Host;
use lamp::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lamp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Read gesture events as JSON lines on stdin and print wheel events on stdout
    Run {
        #[arg(long, default_value_t = 300.0)]
        width: f64,
        #[arg(long, default_value_t = 300.0)]
        height: f64,
        #[arg(long, default_value_t = DEFAULT_BRIGHTNESS)]
        brightness: f64,
        /// Report wheel events through the logger instead of stdout
        #[arg(long)]
        log_events: bool,
    },
    /// Print the wheel scene as JSON, or paint it to a PNG
    Render {
        #[arg(long, default_value_t = 300.0)]
        width: f64,
        #[arg(long, default_value_t = 300.0)]
        height: f64,
        #[arg(long, default_value_t = DEFAULT_BRIGHTNESS)]
        brightness: f64,
        #[arg(long)]
        png: Option<PathBuf>,
    },
    /// Write the default config file if there is none yet
    InitConfig,
}

fn run(size: Size, brightness: f64, log_events: bool) -> anyhow::Result<()> {
    ensure_renderable(size)?;
    let config = config::load_or_default();
    let wheel = ColorWheel::new(&config, size, brightness);
    let wheel = if log_events {
        wheel.with_delegate(LogDelegate)
    } else {
        wheel.with_delegate(JsonLinesDelegate::new(std::io::stdout()))
    };
    let mut host = Host::new(wheel);

    let (tx, rx) = async_channel::bounded(64);
    runtime::start_background_services(tx).context("Failed to start background services")?;

    let mut closing = false;
    while let Ok(event) = rx.recv_blocking() {
        match event {
            AppEvent::Input(input) => {
                host.handle(input);
            }
            AppEvent::Frame(dt) => {
                host.wheel_mut().tick(dt);
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(config) => {
                    log::info!("Config reloaded");
                    host.wheel_mut().apply_config(&config);
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppEvent::Quit => closing = true,
        }
        if closing && !host.wheel().is_animating() {
            break;
        }
    }

    log::info!("Wheel at rest: {:?}", host.wheel().status());
    Ok(())
}

fn ensure_renderable(size: Size) -> anyhow::Result<()> {
    anyhow::ensure!(
        size.is_renderable(),
        "View size {}x{} must be finite and within 0..={}",
        size.width,
        size.height,
        MAX_VIEW_EXTENT
    );
    Ok(())
}

fn render(size: Size, brightness: f64, png: Option<PathBuf>) -> anyhow::Result<()> {
    ensure_renderable(size)?;
    let config = config::load_or_default();
    let scene = WheelScene::render(&config.style, size, brightness.clamp(0.0, 1.0));

    let Some(path) = png else {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &scene)?;
        println!();
        return Ok(());
    };

    #[cfg(feature = "cairo")]
    return lamp::gui::wheel::write_png(&scene, 0.0, &path).map_err(Into::into);

    #[cfg(not(feature = "cairo"))]
    anyhow::bail!(
        "Cannot write {}: lamp was built without the `cairo` feature",
        path.display()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Run {
            width,
            height,
            brightness,
            log_events,
        } => run(Size::new(width, height), brightness, log_events),
        Commands::Render {
            width,
            height,
            brightness,
            png,
        } => render(Size::new(width, height), brightness, png),
        Commands::InitConfig => {
            let path = config::write_default_config().context("Failed to write config")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
