/// Line-oriented transport commands read from stdin
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Next,
    Previous,
    TogglePlayPause,
    Seek(f64),
    Volume(f64),
    ToggleMute,
    /// Select a queue position (0-based)
    Select(usize),
    Remove(usize),
    Status,
    Queue,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{0}'")]
    InvalidArgument(String),
}

pub const HELP: &str = "\
commands:
  n, next            next track (wraps)
  b, prev            previous track (wraps)
  p, pause, play     toggle play/pause
  seek <0-1>         seek to fraction
  vol <0-1>          set volume
  m, mute            toggle mute
  sel <index>        select queue position
  rm <index>         remove queue position
  s, status          show session state
  q, queue           list queue
  quit               exit";

impl FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Err(InputError::Unknown(String::new()));
        };
        let argument = parts.next();

        match command.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "b" | "prev" | "previous" => Ok(Self::Previous),
            "p" | "pause" | "play" => Ok(Self::TogglePlayPause),
            "seek" => parse_arg(argument, "seek", "a fraction").map(Self::Seek),
            "vol" | "volume" => parse_arg(argument, "vol", "a level").map(Self::Volume),
            "m" | "mute" => Ok(Self::ToggleMute),
            "sel" | "select" => parse_arg(argument, "sel", "an index").map(Self::Select),
            "rm" | "remove" => parse_arg(argument, "rm", "an index").map(Self::Remove),
            "s" | "status" => Ok(Self::Status),
            "q" | "queue" => Ok(Self::Queue),
            "h" | "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(InputError::Unknown(other.to_string())),
        }
    }
}

fn parse_arg<T: FromStr>(
    argument: Option<&str>,
    command: &'static str,
    expected: &'static str,
) -> Result<T, InputError> {
    let argument = argument.ok_or(InputError::MissingArgument { command, expected })?;
    argument
        .parse()
        .map_err(|_| InputError::InvalidArgument(argument.to_string()))
}
