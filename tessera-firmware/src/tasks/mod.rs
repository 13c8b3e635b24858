//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod command_rx;
pub mod controller;
pub mod response_tx;
pub mod tick;

pub use command_rx::command_rx_task;
pub use controller::{controller_task, Panel};
pub use response_tx::response_tx_task;
pub use tick::tick_task;
