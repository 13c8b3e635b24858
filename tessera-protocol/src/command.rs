//! Command parsing
//!
//! One line, one command. Verbs compare case-insensitively (the original
//! host tooling sends a mix); arguments keep their case. `TEXT:` takes
//! the rest of the line verbatim, colons included.

use heapless::String;

/// Longest accepted `TEXT:` payload
pub const MAX_TEXT_LEN: usize = 96;

/// Rendering modes selectable over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Host drives the screen with TEXT/CLEAR commands
    Manual,
    /// Built-in demo cycle
    Demo,
    /// Clock face
    Clock,
    /// Uploaded animation playback
    Custom,
    /// Self-playing snake
    Game,
}

impl Mode {
    /// Canonical wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Manual => "MANUAL",
            Mode::Demo => "DEMO",
            Mode::Clock => "CLOCK",
            Mode::Custom => "CUSTOM",
            Mode::Game => "GAME",
        }
    }

    /// Parse a mode argument, any case
    pub fn from_arg(arg: &str) -> Option<Self> {
        if arg.eq_ignore_ascii_case("MANUAL") {
            Some(Mode::Manual)
        } else if arg.eq_ignore_ascii_case("DEMO") {
            Some(Mode::Demo)
        } else if arg.eq_ignore_ascii_case("CLOCK") {
            Some(Mode::Clock)
        } else if arg.eq_ignore_ascii_case("CUSTOM") {
            Some(Mode::Custom)
        } else if arg.eq_ignore_ascii_case("GAME") {
            Some(Mode::Game)
        } else {
            None
        }
    }
}

/// A parsed host command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Show a text string centered on screen
    Text(String<MAX_TEXT_LEN>),
    /// Set backlight level
    Brightness(u8),
    /// Clear the screen
    Clear,
    /// Switch rendering mode
    Mode(Mode),
    /// Set the clock to a wall time
    SetTime { hour: u8, minute: u8, second: u8 },
    /// Set the clock from epoch seconds
    SetEpoch(u32),
    /// Report controller status
    Status,
    /// Put the panel to sleep
    Sleep,
    /// Wake the panel
    Wakeup,
    /// Reset the controller
    Restart,
}

/// Why a line did not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Blank line; skip silently, no error response
    Empty,
    /// Verb not recognized
    UnknownCommand,
    /// `TEXT:` with nothing after the colon
    EmptyText,
    /// `TEXT:` payload exceeds [`MAX_TEXT_LEN`]
    TextTooLong,
    /// Brightness argument not a number in 0-255
    InvalidBrightness,
    /// Mode argument not recognized
    UnknownMode,
    /// SETTIME argument neither HH:MM:SS nor epoch seconds
    InvalidTime,
}

impl CommandError {
    /// Reason string for the `ERROR:` response line
    pub fn reason(&self) -> &'static str {
        match self {
            CommandError::Empty => "Empty command",
            CommandError::UnknownCommand => "Unknown command",
            CommandError::EmptyText => "Empty text",
            CommandError::TextTooLong => "Text too long",
            CommandError::InvalidBrightness => "Brightness must be 0-255",
            CommandError::UnknownMode => "Unknown mode",
            CommandError::InvalidTime => "Invalid time",
        }
    }
}

impl Command {
    /// Parse one line into a command
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        if let Some(arg) = split_verb(line, "TEXT:") {
            let arg = arg.trim();
            if arg.is_empty() {
                return Err(CommandError::EmptyText);
            }
            let mut text = String::new();
            text.push_str(arg).map_err(|_| CommandError::TextTooLong)?;
            return Ok(Command::Text(text));
        }

        if let Some(arg) = split_verb(line, "BRIGHTNESS:") {
            let value = arg
                .trim()
                .parse::<u8>()
                .map_err(|_| CommandError::InvalidBrightness)?;
            return Ok(Command::Brightness(value));
        }

        if let Some(arg) = split_verb(line, "MODE:") {
            let mode = Mode::from_arg(arg.trim()).ok_or(CommandError::UnknownMode)?;
            return Ok(Command::Mode(mode));
        }

        if let Some(arg) = split_verb(line, "SETTIME:") {
            return parse_time(arg.trim());
        }

        if line.eq_ignore_ascii_case("CLEAR") {
            return Ok(Command::Clear);
        }
        if line.eq_ignore_ascii_case("STATUS") || line.eq_ignore_ascii_case("GET_STATUS") {
            return Ok(Command::Status);
        }
        if line.eq_ignore_ascii_case("SLEEP") {
            return Ok(Command::Sleep);
        }
        if line.eq_ignore_ascii_case("WAKEUP") || line.eq_ignore_ascii_case("WAKE") {
            return Ok(Command::Wakeup);
        }
        if line.eq_ignore_ascii_case("RESTART") || line.eq_ignore_ascii_case("REBOOT") {
            return Ok(Command::Restart);
        }

        Err(CommandError::UnknownCommand)
    }
}

/// Case-insensitive verb prefix match; returns the remainder after it
fn split_verb<'a>(line: &'a str, verb: &str) -> Option<&'a str> {
    let n = verb.len();
    let bytes = line.as_bytes();
    if bytes.len() >= n && bytes[..n].eq_ignore_ascii_case(verb.as_bytes()) {
        // The verb is pure ASCII, so n is always a char boundary
        line.get(n..)
    } else {
        None
    }
}

fn parse_time(arg: &str) -> Result<Command, CommandError> {
    if arg.contains(':') {
        let mut parts = arg.split(':');
        let hour = parse_time_part(parts.next())?;
        let minute = parse_time_part(parts.next())?;
        let second = parse_time_part(parts.next())?;
        if parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
            return Err(CommandError::InvalidTime);
        }
        Ok(Command::SetTime {
            hour,
            minute,
            second,
        })
    } else {
        let epoch = arg.parse::<u32>().map_err(|_| CommandError::InvalidTime)?;
        Ok(Command::SetEpoch(epoch))
    }
}

fn parse_time_part(part: Option<&str>) -> Result<u8, CommandError> {
    part.ok_or(CommandError::InvalidTime)?
        .parse::<u8>()
        .map_err(|_| CommandError::InvalidTime)
}
