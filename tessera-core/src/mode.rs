//! UI mode state
//!
//! Tracks which renderer owns the screen and whether the panel is asleep.
//! Any mode is reachable from any other; the controller re-enters the
//! renderer on every switch, so switching to the current mode redraws it.

use tessera_protocol::Mode;

/// Current mode plus the sleep gate
pub struct UiState {
    mode: Mode,
    sleeping: bool,
}

impl UiState {
    pub fn new(initial: Mode) -> Self {
        Self {
            mode: initial,
            sleeping: false,
        }
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// While asleep, renderer ticks are dropped; commands still run
    pub fn ticks_enabled(&self) -> bool {
        !self.sleeping
    }

    /// Switch mode, returning the one it replaced
    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        core::mem::replace(&mut self.mode, mode)
    }

    /// Returns true when the panel was awake before
    pub fn sleep(&mut self) -> bool {
        !core::mem::replace(&mut self.sleeping, true)
    }

    /// Returns true when the panel was asleep before
    pub fn wake(&mut self) -> bool {
        core::mem::replace(&mut self.sleeping, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = UiState::new(Mode::Demo);
        assert_eq!(state.get_mode(), Mode::Demo);
        assert!(!state.is_sleeping());
        assert!(state.ticks_enabled());
    }

    #[test]
    fn test_set_mode_returns_previous() {
        let mut state = UiState::new(Mode::Demo);
        assert_eq!(state.set_mode(Mode::Clock), Mode::Demo);
        assert_eq!(state.get_mode(), Mode::Clock);
        // re-entering the same mode is allowed
        assert_eq!(state.set_mode(Mode::Clock), Mode::Clock);
    }

    #[test]
    fn test_sleep_wake_edges() {
        let mut state = UiState::new(Mode::Manual);
        assert!(state.sleep());
        assert!(!state.sleep());
        assert!(!state.ticks_enabled());
        assert!(state.wake());
        assert!(!state.wake());
        assert!(state.ticks_enabled());
    }

    #[test]
    fn test_mode_survives_sleep() {
        let mut state = UiState::new(Mode::Game);
        state.sleep();
        assert_eq!(state.get_mode(), Mode::Game);
        state.wake();
        assert_eq!(state.get_mode(), Mode::Game);
    }
}
