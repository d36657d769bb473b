use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::{Instant, MissedTickBehavior};

pub const FRAME_RATE: f64 = 60.0;

async fn run_frame_ticker(tx: Sender<AppEvent>) {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / FRAME_RATE));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        let now = interval.tick().await;
        let dt = now.duration_since(last).as_secs_f64();
        last = now;
        if tx.send(AppEvent::Frame(dt)).await.is_err() {
            break;
        }
    }
}

/// Runs stdin input, frame ticks and the config watcher on a background thread.
pub fn start_background_services(tx: Sender<AppEvent>) -> std::io::Result<()> {
    let rt = Runtime::new()?;

    thread::spawn(move || {
        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::input::run_stdin_reader(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    run_frame_ticker(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
    Ok(())
}
