//! Clock face renderer
//!
//! Wall time is held as plain hour/minute/second plus a date, advanced one
//! second at a time from the monotonic millisecond clock. The epoch setter
//! uses a deliberately simplified civil conversion: years are 365 days from
//! 2000, months are 30 days. Good enough for a desk display, exact calendars
//! are out of scope.

use core::fmt::Write;

use heapless::String;
use tessera_gfx::{FlushEngine, Rgb565};

use crate::draw::Draw;

const SECONDS_PER_DAY: u32 = 86_400;

/// HH:MM:SS clock with a date line
pub struct ClockFace {
    hour: u8,
    minute: u8,
    second: u8,
    year: u16,
    month: u8,
    day: u8,
    time_set: bool,
    last_second_ms: u32,
}

impl ClockFace {
    pub fn new() -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            year: 2025,
            month: 1,
            day: 1,
            time_set: false,
            last_second_ms: 0,
        }
    }

    /// Set wall time; out-of-range components wrap into range
    pub fn set_time(&mut self, hour: u8, minute: u8, second: u8, now_ms: u32) {
        self.hour = hour % 24;
        self.minute = minute % 60;
        self.second = second % 60;
        self.time_set = true;
        self.last_second_ms = now_ms;
    }

    /// Set time and date from epoch seconds (simplified conversion)
    pub fn set_epoch(&mut self, epoch_secs: u32, now_ms: u32) {
        let seconds = epoch_secs % SECONDS_PER_DAY;
        self.hour = ((seconds / 3600) % 24) as u8;
        self.minute = ((seconds % 3600) / 60) as u8;
        self.second = (seconds % 60) as u8;

        let days = epoch_secs / SECONDS_PER_DAY;
        self.year = (2000 + days / 365) as u16;
        let day_of_year = days % 365;
        self.month = (day_of_year / 30 + 1) as u8;
        self.day = (day_of_year % 30 + 1) as u8;

        self.time_set = true;
        self.last_second_ms = now_ms;
    }

    pub fn is_time_set(&self) -> bool {
        self.time_set
    }

    pub fn get_time(&self) -> (u8, u8, u8) {
        (self.hour, self.minute, self.second)
    }

    pub fn get_date(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }

    /// Draw the full face, or the setup hint when no time is set
    ///
    /// Called on mode entry and after a time change. Always needs a flush.
    pub fn show(&mut self, engine: &mut FlushEngine, now_ms: u32) {
        if self.time_set {
            self.draw_face(engine, now_ms);
            self.last_second_ms = now_ms;
        } else {
            self.draw_hint(engine);
        }
    }

    /// Advance the time and redraw when the displayed second changed
    ///
    /// Returns true when the face was redrawn and needs a flush.
    pub fn tick(&mut self, engine: &mut FlushEngine, now_ms: u32) -> bool {
        if !self.time_set {
            return false;
        }
        let mut advanced = false;
        while now_ms.wrapping_sub(self.last_second_ms) >= 1000 {
            self.advance_second();
            self.last_second_ms = self.last_second_ms.wrapping_add(1000);
            advanced = true;
        }
        if advanced {
            self.draw_face(engine, now_ms);
        }
        advanced
    }

    fn advance_second(&mut self) {
        self.second += 1;
        if self.second >= 60 {
            self.second = 0;
            self.minute += 1;
            if self.minute >= 60 {
                self.minute = 0;
                self.hour += 1;
                if self.hour >= 24 {
                    // the date does not roll over
                    self.hour = 0;
                }
            }
        }
    }

    fn draw_face(&self, engine: &mut FlushEngine, now_ms: u32) {
        engine.clear(Rgb565::BLACK);

        let mut date: String<16> = String::new();
        let _ = write!(date, "{:04}-{:02}-{:02}", self.year, self.month, self.day);
        engine.draw_text_centered(30, &date, Rgb565::CYAN, 1);

        let mut time: String<16> = String::new();
        let _ = write!(time, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second);
        engine.draw_text_centered(100, &time, Rgb565::WHITE, 3);

        engine.draw_text_centered(160, "Clock Mode", Rgb565::GREEN, 1);

        engine.draw_line(40, 80, 200, 80, Rgb565::BLUE);
        engine.draw_line(40, 145, 200, 145, Rgb565::BLUE);

        let mut uptime: String<32> = String::new();
        let _ = write!(uptime, "Uptime: {}s", now_ms / 1000);
        engine.draw_text_centered(200, &uptime, Rgb565::MAGENTA, 1);
    }

    fn draw_hint(&self, engine: &mut FlushEngine) {
        engine.clear(Rgb565::BLACK);
        engine.draw_text_centered(60, "Clock Mode", Rgb565::YELLOW, 2);
        engine.draw_text_centered(100, "Time not set", Rgb565::RED, 1);
        engine.draw_text_centered(130, "Use SETTIME command", Rgb565::WHITE, 1);
        engine.draw_text_centered(150, "Format: SETTIME:HH:MM:SS", Rgb565::CYAN, 1);
    }
}

impl Default for ClockFace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_gfx::{BufferMode, PixelSink};

    /// Discards transfers; only used to drain dirty state
    struct NullSink;

    impl PixelSink for NullSink {
        type Error = core::convert::Infallible;

        fn set_window(&mut self, _: u16, _: u16, _: u16, _: u16) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write_pixels(&mut self, _: &[Rgb565]) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn engine() -> FlushEngine {
        let mut engine = FlushEngine::new(240, 240);
        engine
            .begin_buffering(BufferMode::Single)
            .expect("allocation");
        // Entering buffered mode marks everything dirty; start the test clean
        engine.flush(&mut NullSink).unwrap();
        engine
    }

    fn any_pixel_in_band(e: &FlushEngine, y0: i16, y1: i16, color: Rgb565) -> bool {
        for y in y0..y1 {
            for x in 0..240 {
                if e.get_pixel(x, y) == Some(color) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn test_set_time_wraps_components() {
        let mut clock = ClockFace::new();
        clock.set_time(25, 61, 61, 0);
        assert_eq!(clock.get_time(), (1, 1, 1));
        assert!(clock.is_time_set());
    }

    #[test]
    fn test_set_epoch_zero() {
        let mut clock = ClockFace::new();
        clock.set_epoch(0, 0);
        assert_eq!(clock.get_time(), (0, 0, 0));
        assert_eq!(clock.get_date(), (2000, 1, 1));
    }

    #[test]
    fn test_set_epoch_day_two() {
        let mut clock = ClockFace::new();
        // one day plus 01:01:01
        clock.set_epoch(86_400 + 3661, 0);
        assert_eq!(clock.get_time(), (1, 1, 1));
        assert_eq!(clock.get_date(), (2000, 1, 2));
    }

    #[test]
    fn test_set_epoch_year_advance() {
        let mut clock = ClockFace::new();
        // 365 days exactly: simplified calendar rolls to the next year
        clock.set_epoch(365 * SECONDS_PER_DAY, 0);
        assert_eq!(clock.get_date(), (2001, 1, 1));
    }

    #[test]
    fn test_tick_advances_once_per_second() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        clock.set_time(12, 0, 0, 1000);
        assert!(!clock.tick(&mut e, 1500));
        assert!(clock.tick(&mut e, 2000));
        assert_eq!(clock.get_time(), (12, 0, 1));
    }

    #[test]
    fn test_tick_catches_up_missed_seconds() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        clock.set_time(12, 0, 58, 0);
        assert!(clock.tick(&mut e, 3500));
        assert_eq!(clock.get_time(), (12, 1, 1));
    }

    #[test]
    fn test_midnight_rollover_keeps_date() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        clock.set_time(23, 59, 59, 0);
        let date = clock.get_date();
        assert!(clock.tick(&mut e, 1000));
        assert_eq!(clock.get_time(), (0, 0, 0));
        assert_eq!(clock.get_date(), date);
    }

    #[test]
    fn test_tick_without_time_does_nothing() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        assert!(!clock.tick(&mut e, 10_000));
        assert!(!e.is_dirty());
    }

    #[test]
    fn test_show_draws_hint_until_time_set() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        clock.show(&mut e, 0);
        // "Clock Mode" headline in yellow near the top
        assert!(any_pixel_in_band(&e, 60, 76, Rgb565::YELLOW));
        assert!(!any_pixel_in_band(&e, 100, 124, Rgb565::WHITE));
    }

    #[test]
    fn test_show_draws_face_once_set() {
        let mut e = engine();
        let mut clock = ClockFace::new();
        clock.set_time(12, 34, 56, 0);
        clock.show(&mut e, 5000);
        // big white time digits in the middle band
        assert!(any_pixel_in_band(&e, 100, 124, Rgb565::WHITE));
        // separator lines
        assert_eq!(e.get_pixel(100, 80), Some(Rgb565::BLUE));
        assert_eq!(e.get_pixel(100, 145), Some(Rgb565::BLUE));
    }
}
