//! Session clock - whole seconds of play time

/// Elapsed play time, advanced only by explicit ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionClock {
    elapsed_seconds: u32,
    running: bool,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by one second if running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }

    pub fn formatted(&self) -> String {
        format_clock(self.elapsed_seconds)
    }
}

/// Format seconds as `MM:SS`.
///
/// Minutes keep counting past 59 (`61:05`), matching the in-game HUD.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_clock_ignores_ticks() {
        let mut clock = SessionClock::new();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed_seconds(), 0);

        clock.start();
        assert!(clock.tick());
        assert!(clock.tick());
        clock.stop();
        assert!(!clock.tick());
        assert_eq!(clock.elapsed_seconds(), 2);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3665), "61:05");
    }
}
