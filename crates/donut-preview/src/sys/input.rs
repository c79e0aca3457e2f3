use crate::events::PreviewEvent;
use async_channel::Sender;
use donut::chart::{HoverTarget, Viewport};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

const TARGET_USAGE: &str = "enter|leave|click arc|legend <index>";
const RESIZE_USAGE: &str = "resize <width> [height]";

fn parse_target<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<HoverTarget, CommandError> {
    let usage = || CommandError::Usage(TARGET_USAGE);
    let kind = args.next().ok_or_else(usage)?;
    let index = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(usage)?;

    match kind {
        "arc" | "a" => Ok(HoverTarget::Arc(index)),
        "legend" | "l" => Ok(HoverTarget::Legend(index)),
        _ => Err(usage()),
    }
}

fn parse_resize<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<Viewport, CommandError> {
    let mut dimension = |required: bool| match args.next() {
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or(CommandError::Usage(RESIZE_USAGE)),
        None if required => Err(CommandError::Usage(RESIZE_USAGE)),
        None => Ok(0.0),
    };
    let width = dimension(true)?;
    let height = dimension(false)?;
    Ok(Viewport::new(width, height))
}

/// Parses one line of the interactive protocol. Blank lines and `#` comments
/// yield nothing.
pub fn parse_command(line: &str) -> Result<Option<PreviewEvent>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();

    let event = match command {
        "enter" => PreviewEvent::Enter(parse_target(words)?),
        "leave" => PreviewEvent::Leave(parse_target(words)?),
        "click" => PreviewEvent::Click(parse_target(words)?),
        "resize" => PreviewEvent::Resize(parse_resize(words)?),
        "reload" => PreviewEvent::ConfigReload,
        "quit" | "exit" => PreviewEvent::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(event))
}

pub async fn run_input_reader(tx: Sender<PreviewEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Some(event)) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{}", e),
            },
            Ok(None) => {
                let _ = tx.send(PreviewEvent::Quit).await;
                break;
            }
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}
