//! Line-oriented console commands for the headless binary.

use std::time::{Duration, Instant};

use super::AppCommand;
use crate::gestures::PointerInput;
use crate::utils::{AppError, Result};

/// Gap between the two synthetic taps of `doubletap`
const SYNTHETIC_TAP_GAP: Duration = Duration::from_millis(100);

pub const HELP: &str = "\
commands:
  list                      show categories and videos
  open <category> <index>   open a video in the full player
  related <index>           open a related video
  play                      toggle play/pause
  skip <secs>               skip by seconds (negative goes back)
  fwd | back10              skip forward / backward by the configured step
  seek <fraction>           jump to a fraction of the duration
  drag <from_y> <to_y>      vertical drag on the player surface
  tap <x> <width>           single tap on the player surface
  doubletap <x> <width>     two quick taps on the player surface
  cancel | now | replay     countdown controls
  restore | close           mini player controls
  back                      leave the player
  reload                    rebuild the player from the saved session
  status                    show the current view
  events                    show recently published events
  quit";

/// A parsed console line
#[derive(Debug)]
pub enum ConsoleInput {
    Send(Vec<AppCommand>),
    Status,
    Events,
    List,
    Help,
    Empty,
}

pub fn parse_command(line: &str) -> Result<ConsoleInput> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ConsoleInput::Empty);
    };
    let args: Vec<&str> = words.collect();

    let single = |command: AppCommand| -> Result<ConsoleInput> {
        Ok(ConsoleInput::Send(vec![command]))
    };

    match (verb, args.as_slice()) {
        ("help" | "?", []) => Ok(ConsoleInput::Help),
        ("list" | "ls", []) => Ok(ConsoleInput::List),
        ("status", []) => Ok(ConsoleInput::Status),
        ("events", []) => Ok(ConsoleInput::Events),
        ("quit" | "exit", []) => single(AppCommand::Quit),
        ("open", [category, index]) => single(AppCommand::OpenAt {
            category: category.to_string(),
            index: parse_arg(index, "index")?,
        }),
        ("related", [index]) => single(AppCommand::PlayRelated(parse_arg(index, "index")?)),
        ("play" | "pause", []) => single(AppCommand::TogglePlayPause),
        ("skip", [secs]) => single(AppCommand::Skip(parse_arg(secs, "seconds")?)),
        ("fwd", []) => single(AppCommand::SkipForward),
        ("back10", []) => single(AppCommand::SkipBackward),
        ("seek", [fraction]) => single(AppCommand::SeekFraction(parse_arg(fraction, "fraction")?)),
        ("drag", [from, to]) => {
            let from: f64 = parse_arg(from, "from_y")?;
            let to: f64 = parse_arg(to, "to_y")?;
            Ok(ConsoleInput::Send(vec![
                AppCommand::Pointer(PointerInput::Down { x: 0.0, y: from }),
                AppCommand::Pointer(PointerInput::Move { x: 0.0, y: to }),
                AppCommand::Pointer(PointerInput::Up { x: 0.0, y: to }),
            ]))
        }
        ("tap", [x, width]) => single(AppCommand::Pointer(PointerInput::Tap {
            x: parse_arg(x, "x")?,
            surface_width: parse_arg(width, "width")?,
            at: Instant::now(),
        })),
        ("doubletap", [x, width]) => {
            let x: f64 = parse_arg(x, "x")?;
            let surface_width: f64 = parse_arg(width, "width")?;
            let first = Instant::now();
            Ok(ConsoleInput::Send(
                [first, first + SYNTHETIC_TAP_GAP]
                    .into_iter()
                    .map(|at| {
                        AppCommand::Pointer(PointerInput::Tap {
                            x,
                            surface_width,
                            at,
                        })
                    })
                    .collect(),
            ))
        }
        ("cancel", []) => single(AppCommand::CancelCountdown),
        ("now", []) => single(AppCommand::PlayNow),
        ("replay", []) => single(AppCommand::Replay),
        ("restore", []) => single(AppCommand::RestoreMini),
        ("close", []) => single(AppCommand::CloseMini),
        ("back", []) => single(AppCommand::LeavePlayer),
        ("reload", []) => single(AppCommand::RestoreRoute),
        _ => Err(AppError::InvalidCommand(line.trim().to_string())),
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::InvalidCommand(format!("bad {}: {}", name, raw)))
}
