//! Inter-task communication channels
//!
//! Static embassy-sync channels connecting the serial tasks to the
//! controller. The command channel carries parsed commands from the RX
//! task; the response channel carries pending replies the other way, and
//! the TX task formats them into wire lines on its side of the seam.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use tessera_protocol::{Command, Response, StatusReport};

/// Channel capacity for parsed host commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for pending replies
const RESPONSE_CHANNEL_SIZE: usize = 4;

/// One reply awaiting transmit
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Command acknowledgement or error line
    Line(Response),
    /// Status snapshot, sent as one bare JSON line
    Status(StatusReport),
}

/// Parsed commands from the host, RX task to controller
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Replies from the controller (and parse errors straight from the RX task)
pub static RESPONSE_CHANNEL: Channel<CriticalSectionRawMutex, Reply, RESPONSE_CHANNEL_SIZE> =
    Channel::new();
