//! Response formatting
//!
//! Every executed command gets exactly one reply line, `OK:<detail>` or
//! `ERROR:<reason>`. The line itself carries no terminator; the transport
//! appends CRLF when it writes the line out.

use core::fmt::Write;

use heapless::String;

use crate::command::{CommandError, Mode};

/// Longest reply line, terminator excluded
pub const MAX_RESPONSE_LEN: usize = 64;

/// A formatted reply line
pub type ResponseLine = String<MAX_RESPONSE_LEN>;

/// Outcome of a command, ready to format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    TextDisplayed,
    BrightnessSet(u8),
    ScreenCleared,
    ModeSet(Mode),
    TimeSet,
    Sleeping,
    Awake,
    Restarting,
    Error(&'static str),
}

impl Response {
    /// Format the reply line
    pub fn to_line(&self) -> ResponseLine {
        let mut line = ResponseLine::new();
        // Every variant fits MAX_RESPONSE_LEN, so the write cannot truncate
        let _ = match self {
            Response::TextDisplayed => write!(line, "OK:Text displayed"),
            Response::BrightnessSet(value) => write!(line, "OK:Brightness set to {}", value),
            Response::ScreenCleared => write!(line, "OK:Screen cleared"),
            Response::ModeSet(mode) => write!(line, "OK:Mode set to {}", mode.as_str()),
            Response::TimeSet => write!(line, "OK:Time set"),
            Response::Sleeping => write!(line, "OK:Display sleeping"),
            Response::Awake => write!(line, "OK:Display awake"),
            Response::Restarting => write!(line, "OK:Restarting..."),
            Response::Error(reason) => write!(line, "ERROR:{}", reason),
        };
        line
    }
}

impl From<CommandError> for Response {
    /// Map a parse failure to its error reply. Callers skip
    /// [`CommandError::Empty`] before converting; blank lines get no reply.
    fn from(err: CommandError) -> Self {
        Response::Error(err.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_lines() {
        assert_eq!(Response::TextDisplayed.to_line().as_str(), "OK:Text displayed");
        assert_eq!(
            Response::BrightnessSet(128).to_line().as_str(),
            "OK:Brightness set to 128"
        );
        assert_eq!(Response::ScreenCleared.to_line().as_str(), "OK:Screen cleared");
        assert_eq!(
            Response::ModeSet(Mode::Clock).to_line().as_str(),
            "OK:Mode set to CLOCK"
        );
        assert_eq!(Response::TimeSet.to_line().as_str(), "OK:Time set");
        assert_eq!(Response::Sleeping.to_line().as_str(), "OK:Display sleeping");
        assert_eq!(Response::Awake.to_line().as_str(), "OK:Display awake");
        assert_eq!(Response::Restarting.to_line().as_str(), "OK:Restarting...");
    }

    #[test]
    fn test_error_line() {
        assert_eq!(
            Response::Error("Unknown command").to_line().as_str(),
            "ERROR:Unknown command"
        );
    }

    #[test]
    fn test_from_command_error() {
        let resp = Response::from(CommandError::UnknownMode);
        assert_eq!(resp.to_line().as_str(), "ERROR:Unknown mode");
        let resp = Response::from(CommandError::InvalidTime);
        assert_eq!(resp.to_line().as_str(), "ERROR:Invalid time");
    }
}
