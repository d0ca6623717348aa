/// Count-up clock advanced in whole seconds by an external 1 Hz tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    elapsed: u64,
    running: bool,
    alarm: u64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a timer from persisted values
    pub fn restore(elapsed: u64, running: bool, alarm: u64) -> Self {
        Self {
            elapsed,
            running,
            alarm,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.running = false;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed += 1;
        }
    }

    /// 0 disables the alarm
    pub fn set_alarm(&mut self, seconds: u64) {
        self.alarm = seconds;
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alarm(&self) -> u64 {
        self.alarm
    }

    /// Display-only flag; the timer keeps counting past the alarm.
    pub fn alarm_exceeded(&self) -> bool {
        self.alarm > 0 && self.elapsed >= self.alarm
    }
}

/// Render seconds as MM:SS. Minutes are not wrapped at the hour.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_only_advances_while_running() {
        let mut timer = Timer::new();
        timer.tick();
        assert_eq!(timer.elapsed(), 0);

        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(timer.elapsed(), 2);

        timer.pause();
        timer.tick();
        assert_eq!(timer.elapsed(), 2);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut timer = Timer::new();
        timer.start();
        timer.start();
        assert!(timer.is_running());

        timer.pause();
        timer.pause();
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_zeroes_and_stops() {
        let mut timer = Timer::new();
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.elapsed(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_keeps_alarm() {
        let mut timer = Timer::new();
        timer.set_alarm(30);
        timer.reset();
        assert_eq!(timer.alarm(), 30);
    }

    #[test]
    fn alarm_disabled_at_zero() {
        let mut timer = Timer::new();
        timer.start();
        timer.tick();
        assert!(!timer.alarm_exceeded());
    }

    #[test]
    fn alarm_exceeded_at_threshold_and_timer_keeps_running() {
        let mut timer = Timer::new();
        timer.set_alarm(2);
        timer.start();
        timer.tick();
        assert!(!timer.alarm_exceeded());
        timer.tick();
        assert!(timer.alarm_exceeded());
        timer.tick();
        assert!(timer.alarm_exceeded());
        assert!(timer.is_running());
        assert_eq!(timer.elapsed(), 3);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(90), "01:30");
        assert_eq!(format_clock(3600), "60:00");
    }
}
