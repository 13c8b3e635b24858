//! Serial command protocol for the Tessera display controller
//!
//! The host drives the controller with newline-delimited ASCII lines over
//! the serial link:
//!
//! ```text
//! TEXT:Hello world\n
//! BRIGHTNESS:128\n
//! MODE:CLOCK\n
//! STATUS\n
//! ```
//!
//! Every line is answered with a single `OK:...` or `ERROR:...` line
//! (STATUS answers with a JSON object). Verbs are case-insensitive;
//! arguments keep their case. The controller stays a "dumb peripheral" -
//! it renders what it is told and never initiates traffic.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;
pub mod status;

pub use command::{Command, CommandError, Mode, MAX_TEXT_LEN};
pub use line::{LineBuffer, LineError, Line, MAX_LINE_LEN};
pub use response::{Response, ResponseLine, MAX_RESPONSE_LEN};
pub use status::{StatusReport, MAX_STATUS_LEN};
