use crate::events::{AppEvent, InputEvent};
use async_channel::Sender;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, number: usize) -> Result<Option<InputEvent>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| InputError::Malformed {
            line: number,
            source,
        })
}

/// Forwards events read from `reader` until EOF, then asks the host to quit.
pub async fn forward_events<R>(reader: R, tx: Sender<AppEvent>) -> Result<(), InputError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut number = 0;

    while let Some(line) = lines.next_line().await? {
        number += 1;
        match parse_line(&line, number) {
            Ok(Some(event)) => {
                if tx.send(AppEvent::Input(event)).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Skipping input {}", e),
        }
    }

    log::debug!("Input closed after {} lines", number);
    let _ = tx.send(AppEvent::Quit).await;
    Ok(())
}

pub async fn run_stdin_reader(tx: Sender<AppEvent>) {
    let reader = BufReader::new(tokio::io::stdin());
    if let Err(e) = forward_events(reader, tx.clone()).await {
        log::error!("{}", e);
        let _ = tx.send(AppEvent::Quit).await;
    }
}
