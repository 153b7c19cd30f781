//! Stopwatch for timing a run with the selected persona.

use chrono::{DateTime, Utc};

use crate::error::{RouletteError, RouletteResult};

/// A pausable stopwatch counting whole seconds.
///
/// Every operation takes the current time explicitly so callers decide
/// which clock drives it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    base_seconds: u64,
    running_since: Option<DateTime<Utc>>,
    started: bool,
}

impl Stopwatch {
    /// A stopped stopwatch at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from zero.
    pub fn start(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        if self.is_running() {
            return Err(RouletteError::TimerAlreadyRunning);
        }
        self.base_seconds = 0;
        self.running_since = Some(now);
        self.started = true;
        Ok(())
    }

    /// Stop counting, keeping the elapsed time.
    pub fn pause(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        let since = self.running_since.take().ok_or(RouletteError::TimerNotRunning)?;
        self.base_seconds += seconds_between(since, now);
        Ok(())
    }

    /// Continue counting from the paused time. A stopwatch that was never
    /// started starts from zero.
    pub fn resume(&mut self, now: DateTime<Utc>) -> RouletteResult<()> {
        if !self.started {
            return self.start(now);
        }
        if self.is_running() {
            return Err(RouletteError::TimerAlreadyRunning);
        }
        self.running_since = Some(now);
        Ok(())
    }

    /// Stop and clear.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the stopwatch is counting.
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Whether the stopwatch has been started since the last reset.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whole seconds counted as of `now`.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .running_since
            .map(|since| seconds_between(since, now))
            .unwrap_or(0);
        self.base_seconds + running
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

/// Render seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn counts_while_running() {
        let mut sw = Stopwatch::new();
        sw.start(t(0)).unwrap();
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_seconds(t(42)), 42);
    }

    #[test]
    fn pause_and_resume_accumulate() {
        let mut sw = Stopwatch::new();
        sw.start(t(0)).unwrap();
        sw.pause(t(10)).unwrap();
        assert_eq!(sw.elapsed_seconds(t(500)), 10);
        sw.resume(t(600)).unwrap();
        assert_eq!(sw.elapsed_seconds(t(605)), 15);
    }

    #[test]
    fn resume_without_start_starts() {
        let mut sw = Stopwatch::new();
        sw.resume(t(5)).unwrap();
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_seconds(t(8)), 3);
    }

    #[test]
    fn invalid_operations() {
        let mut sw = Stopwatch::new();
        assert!(matches!(sw.pause(t(0)), Err(RouletteError::TimerNotRunning)));
        sw.start(t(0)).unwrap();
        assert!(matches!(
            sw.start(t(1)),
            Err(RouletteError::TimerAlreadyRunning)
        ));
        assert!(matches!(
            sw.resume(t(1)),
            Err(RouletteError::TimerAlreadyRunning)
        ));
    }

    #[test]
    fn reset_clears() {
        let mut sw = Stopwatch::new();
        sw.start(t(0)).unwrap();
        sw.pause(t(30)).unwrap();
        sw.reset();
        assert!(!sw.is_started());
        assert_eq!(sw.elapsed_seconds(t(100)), 0);
    }

    #[test]
    fn clock_going_backwards_counts_zero() {
        let mut sw = Stopwatch::new();
        sw.start(t(100)).unwrap();
        assert_eq!(sw.elapsed_seconds(t(50)), 0);
    }

    #[test]
    fn hms_format() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(75), "00:01:15");
        assert_eq!(format_hms(3 * 3600 + 5), "03:00:05");
        assert_eq!(format_hms(100 * 3600), "100:00:00");
    }
}
