//! Simulated clock - fixed hours-per-tick time advancement.
//!
//! One call to [`SimClock::advance`] moves simulated time forward by a
//! configured number of hours. Outpost and ship handlers key off the
//! hour of day (clearing at 0, listing at 6, ship bids at 12, outpost
//! bids at 18) and off the weekly boundary (day-of-week 0 at hour 0);
//! the engine walks every hour a tick covers, so no `hours_per_tick`
//! value skips a phase.

use serde::{Deserialize, Serialize};

/// Simulated hours in a day and days in a week.
pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_WEEK: u64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimClock {
    /// Total simulated hours elapsed since world creation.
    total_hours: u64,
    /// Hours advanced per tick.
    hours_per_tick: u64,
}

impl SimClock {
    pub fn new(hours_per_tick: u64) -> Self {
        Self {
            total_hours: 0,
            hours_per_tick: hours_per_tick.max(1),
        }
    }

    /// Advance by one tick's worth of hours.
    pub fn advance(&mut self) {
        self.total_hours += self.hours_per_tick;
    }

    pub fn total_hours(&self) -> u64 {
        self.total_hours
    }

    pub fn hours_per_tick(&self) -> u64 {
        self.hours_per_tick
    }

    /// Hour of the simulated day (0-23).
    pub fn hour(&self) -> u64 {
        self.total_hours % HOURS_PER_DAY
    }

    /// Days elapsed since world creation.
    pub fn day(&self) -> u64 {
        self.total_hours / HOURS_PER_DAY
    }

    /// Day of the simulated week (0-6; 0 is the weekly market reset).
    pub fn day_of_week(&self) -> u64 {
        self.day() % DAYS_PER_WEEK
    }

    /// Whether this instant is the weekly boundary (hour 0 of day 0).
    pub fn is_week_start(&self) -> bool {
        self.hour() == 0 && self.day_of_week() == 0
    }

    /// Restore a clock from a snapshot.
    pub fn restore(total_hours: u64, hours_per_tick: u64) -> Self {
        Self {
            total_hours,
            hours_per_tick: hours_per_tick.max(1),
        }
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_wraps_daily() {
        let mut clock = SimClock::new(1);
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.hour(), 1);
        assert_eq!(clock.day(), 1);
    }

    #[test]
    fn test_week_boundary() {
        let mut clock = SimClock::new(1);
        assert!(clock.is_week_start()); // hour 0, day 0
        for _ in 0..(HOURS_PER_DAY * DAYS_PER_WEEK) {
            clock.advance();
        }
        assert!(clock.is_week_start());
        clock.advance();
        assert!(!clock.is_week_start());
    }

    #[test]
    fn test_multi_hour_ticks() {
        let mut clock = SimClock::new(6);
        clock.advance();
        assert_eq!(clock.hour(), 6);
        clock.advance();
        clock.advance();
        assert_eq!(clock.hour(), 18);
    }

    #[test]
    fn test_zero_step_clamped() {
        let clock = SimClock::new(0);
        assert_eq!(clock.hours_per_tick(), 1);
    }
}
