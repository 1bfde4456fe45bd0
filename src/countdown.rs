//! Countdown arithmetic and the per-tick state machine.
//!
//! The widget recomputes remaining time from the wall clock against a fixed
//! target instant on every tick; nothing here decrements a counter, so timer
//! callback jitter never accumulates into drift. The reducer in [`Countdown`]
//! is deliberately DOM-free: it reports *what* the days box should do
//! (attach / detach / keep) and leaves the mutation to the caller, which keeps
//! the monotonicity properties testable without a document.

// ============================================================================
// Time Constants
// ============================================================================

pub const MS_PER_SECOND: i64 = 1000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

// ============================================================================
// Time Split
// ============================================================================

/// Remaining time broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeParts {
    pub fn zero() -> Self {
        TimeParts {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Total remaining milliseconds these parts represent (sub-second
    /// remainder is floored away, matching the display).
    pub fn total_ms(&self) -> i64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }
}

/// Split remaining milliseconds into days/hours/minutes/seconds by floor
/// division. A literal countdown, not a rounded one: 1999 ms reads as 1 s.
pub fn split_remaining(remaining_ms: i64) -> TimeParts {
    let remaining_ms = remaining_ms.max(0);
    TimeParts {
        days: remaining_ms / MS_PER_DAY,
        hours: (remaining_ms % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND,
    }
}

/// Zero-padded two-digit rendering of a unit value.
pub fn pad2(value: i64) -> String {
    format!("{:02}", value)
}

// ============================================================================
// Tick Reducer
// ============================================================================

/// What the caller should do with the days box this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysBox {
    /// Insert at the front of the countdown row (it is not attached).
    Attach,
    /// Remove from the row (it is attached and days reached zero).
    Detach,
    /// Leave as-is.
    Keep,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running: show these values and apply the days-box action.
    Display { parts: TimeParts, days_box: DaysBox },
    /// Terminal: cancel the interval, force "00" displays, tear down.
    Expired,
}

/// Countdown state for one bar: RUNNING until remaining drops below zero,
/// then EXPIRED forever.
#[derive(Debug, Clone)]
pub struct Countdown {
    target_ms: i64,
    days_attached: bool,
    expired: bool,
}

impl Countdown {
    /// `target_ms` is the expiry instant in epoch milliseconds. The days box
    /// starts attached because the row is built with all four unit boxes; the
    /// first tick detaches it when the deadline is under a day away.
    pub fn new(target_ms: i64) -> Self {
        Countdown {
            target_ms,
            days_attached: true,
            expired: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance by one tick at wall-clock `now_ms`. Idempotent with respect to
    /// the days box: Attach is only emitted when the box is detached and
    /// Detach only when attached, no matter how often this is called.
    pub fn tick(&mut self, now_ms: i64) -> Tick {
        if self.expired {
            return Tick::Expired;
        }

        let remaining = self.target_ms - now_ms;
        if remaining < 0 {
            self.expired = true;
            return Tick::Expired;
        }

        let parts = split_remaining(remaining);
        let days_box = if parts.days > 0 {
            if self.days_attached {
                DaysBox::Keep
            } else {
                self.days_attached = true;
                DaysBox::Attach
            }
        } else if self.days_attached {
            self.days_attached = false;
            DaysBox::Detach
        } else {
            DaysBox::Keep
        };

        Tick::Display { parts, days_box }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_one_of_each_unit() {
        // 90_061_000 ms = 1d 1h 1m 1s exactly.
        let parts = split_remaining(90_061_000);
        assert_eq!(
            parts,
            TimeParts {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(parts.total_ms(), 90_061_000);
    }

    #[test]
    fn split_floors_instead_of_rounding() {
        assert_eq!(split_remaining(1_999).seconds, 1);
        assert_eq!(split_remaining(999), TimeParts::zero());
        assert_eq!(split_remaining(MS_PER_DAY - 1).days, 0);
        assert_eq!(split_remaining(MS_PER_DAY - 1).hours, 23);
    }

    #[test]
    fn negative_remaining_clamps_to_zero() {
        assert_eq!(split_remaining(-5_000), TimeParts::zero());
    }

    #[test]
    fn pads_to_two_digits() {
        assert_eq!(pad2(0), "00");
        assert_eq!(pad2(7), "07");
        assert_eq!(pad2(59), "59");
        assert_eq!(pad2(123), "123");
    }

    #[test]
    fn example_scenario_first_two_ticks() {
        // Bar created with expiresAt = now + 90_061_000 ms.
        let mut cd = Countdown::new(90_061_000);
        match cd.tick(0) {
            Tick::Display { parts, days_box } => {
                assert_eq!((parts.days, parts.hours, parts.minutes, parts.seconds), (1, 1, 1, 1));
                assert_eq!(days_box, DaysBox::Keep);
            }
            Tick::Expired => panic!("should still be running"),
        }
        match cd.tick(1_000) {
            Tick::Display { parts, .. } => {
                assert_eq!((parts.days, parts.hours, parts.minutes, parts.seconds), (1, 1, 1, 0));
            }
            Tick::Expired => panic!("should still be running"),
        }
    }

    #[test]
    fn remaining_strictly_decreases_until_expiry() {
        let mut cd = Countdown::new(5_500);
        let mut previous = i64::MAX;
        let mut now = 0;
        loop {
            match cd.tick(now) {
                Tick::Display { parts, .. } => {
                    let total = parts.total_ms();
                    assert!(total < previous, "remaining must strictly decrease");
                    previous = total;
                }
                Tick::Expired => break,
            }
            now += 1_000;
        }
        // 5500, 4500, ... 500, then -500 expires.
        assert_eq!(now, 6_000);
    }

    #[test]
    fn days_box_detaches_once_and_never_returns() {
        // Target just over one day out; ticks cross the one-day boundary.
        let mut cd = Countdown::new(MS_PER_DAY + 1_500);
        let mut detaches = 0;
        let mut attaches_after_detach = 0;
        let mut seen_detach = false;
        let mut now = 0;
        loop {
            match cd.tick(now) {
                Tick::Display { days_box, .. } => match days_box {
                    DaysBox::Detach => {
                        detaches += 1;
                        seen_detach = true;
                    }
                    DaysBox::Attach if seen_detach => attaches_after_detach += 1,
                    _ => {}
                },
                Tick::Expired => break,
            }
            now += 1_000;
        }
        assert_eq!(detaches, 1);
        assert_eq!(attaches_after_detach, 0);
    }

    #[test]
    fn detach_happens_on_first_sub_day_tick() {
        let mut cd = Countdown::new(MS_PER_DAY + 500);
        // First tick: just over a day left, box stays.
        assert!(matches!(
            cd.tick(0),
            Tick::Display { days_box: DaysBox::Keep, parts } if parts.days == 1
        ));
        // Second tick: under a day, box is detached exactly now.
        assert!(matches!(
            cd.tick(1_000),
            Tick::Display { days_box: DaysBox::Detach, parts } if parts.days == 0
        ));
        // Third tick: already detached, nothing to do.
        assert!(matches!(
            cd.tick(2_000),
            Tick::Display { days_box: DaysBox::Keep, .. }
        ));
    }

    #[test]
    fn zero_remaining_still_displays() {
        // remaining == 0 renders "00"s; only remaining < 0 expires. The
        // fetch-time gate (expiry at or before now) is checked elsewhere.
        let mut cd = Countdown::new(1_000);
        assert!(matches!(
            cd.tick(1_000),
            Tick::Display { parts, .. } if parts == TimeParts::zero()
        ));
        assert_eq!(cd.tick(2_000), Tick::Expired);
    }

    #[test]
    fn expired_is_terminal_and_idempotent() {
        let mut cd = Countdown::new(0);
        assert_eq!(cd.tick(1), Tick::Expired);
        assert!(cd.is_expired());
        // Further ticks, even with an earlier clock, stay expired.
        assert_eq!(cd.tick(0), Tick::Expired);
        assert_eq!(cd.tick(999), Tick::Expired);
    }
}
