//! Status report
//!
//! `STATUS` replies with one bare JSON object, no `OK:` prefix. Keys are
//! fixed and emitted in a stable order so host-side parsers can stay dumb.

use core::fmt::Write;

use heapless::String;

use crate::command::Mode;

/// Longest status JSON line
pub const MAX_STATUS_LEN: usize = 128;

/// Snapshot of controller state for the `STATUS` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Active rendering mode
    pub mode: Mode,
    /// Seconds since boot
    pub uptime_secs: u32,
    /// Free heap bytes
    pub free_heap: u32,
    /// Completed flushes since boot
    pub flush_count: u32,
    /// Duration of the most recent flush, microseconds
    pub last_flush_micros: u32,
}

impl StatusReport {
    /// Format the report as one JSON line
    pub fn to_json(&self) -> String<MAX_STATUS_LEN> {
        let mut json = String::new();
        // Worst case is well under MAX_STATUS_LEN; the write cannot truncate
        let _ = write!(
            json,
            "{{\"mode\":\"{}\",\"uptime\":{},\"heap\":{},\"flushCount\":{},\"lastFlushUs\":{}}}",
            self.mode.as_str(),
            self.uptime_secs,
            self.free_heap,
            self.flush_count,
            self.last_flush_micros,
        );
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_json_shape() {
        let report = StatusReport {
            mode: Mode::Demo,
            uptime_secs: 42,
            free_heap: 131072,
            flush_count: 7,
            last_flush_micros: 12345,
        };
        assert_eq!(
            report.to_json().as_str(),
            "{\"mode\":\"DEMO\",\"uptime\":42,\"heap\":131072,\"flushCount\":7,\"lastFlushUs\":12345}"
        );
    }

    #[test]
    fn test_status_json_max_values_fit() {
        let report = StatusReport {
            mode: Mode::Manual,
            uptime_secs: u32::MAX,
            free_heap: u32::MAX,
            flush_count: u32::MAX,
            last_flush_micros: u32::MAX,
        };
        let json = report.to_json();
        assert!(json.len() < MAX_STATUS_LEN);
        assert!(json.as_str().ends_with('}'));
    }
}
