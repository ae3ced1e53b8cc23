use std::time::Duration;

/// Length of one countdown step.
pub const TICK: Duration = Duration::from_secs(1);

/// Returned by the tick that brings a countdown to zero. It is produced once
/// per `start`, never again until the countdown is restarted.
#[must_use = "an expired countdown must end the play phase"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expired;

/// How close the countdown is to running out, relative to its full length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Danger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Inactive,
    Running { carry: Duration },
}

/// Whole-second countdown owned by a play session.
///
/// The countdown never schedules anything on its own: the owner feeds it
/// elapsed time, so cancelling it (or dropping it) is all it takes to make
/// sure no expiry reaches a session that has already been torn down.
#[derive(Clone, Debug)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    state: State,
}

impl Countdown {
    /// An inactive countdown showing its full duration.
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: State::Inactive,
        }
    }

    /// Arms the countdown with a fresh duration. Any previous run is discarded.
    pub fn start(&mut self, duration_secs: u32) {
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.state = State::Running {
            carry: Duration::ZERO,
        };
    }

    pub fn cancel(&mut self) {
        self.state = State::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.remaining_secs
    }

    /// Consumes exactly one second.
    pub fn tick(&mut self) -> Option<Expired> {
        if !self.is_active() {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = State::Inactive;
            Some(Expired)
        } else {
            None
        }
    }

    /// Feeds wall-clock time; sub-second remainders are carried to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Expired> {
        let State::Running { carry } = self.state else {
            return None;
        };

        let mut carry = carry + elapsed;
        while carry >= TICK {
            carry -= TICK;
            if let Some(expired) = self.tick() {
                return Some(expired);
            }
        }
        self.state = State::Running { carry };
        None
    }

    /// Fraction of the full duration still left, in `0.0..=1.0`.
    pub fn fraction_remaining(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.duration_secs as f64
    }

    pub fn urgency(&self) -> Urgency {
        let percentage = self.fraction_remaining() * 100.0;
        if percentage < 10.0 {
            Urgency::Danger
        } else if percentage < 30.0 {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_countdown_is_inactive_and_full() {
        let countdown = Countdown::new(30);
        assert!(!countdown.is_active());
        assert_eq!(countdown.seconds_remaining(), 30);
    }

    #[test]
    fn inactive_countdown_ignores_ticks() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.advance(Duration::from_secs(10)), None);
        assert_eq!(countdown.seconds_remaining(), 3);
    }

    #[test]
    fn expires_exactly_once_for_every_duration() {
        for duration in 1..=60 {
            let mut countdown = Countdown::new(duration);
            countdown.start(duration);

            let mut expiries = 0;
            for _ in 0..duration {
                if countdown.tick().is_some() {
                    expiries += 1;
                }
            }
            assert_eq!(expiries, 1, "duration {duration}");
            assert_eq!(countdown.seconds_remaining(), 0);
            assert!(!countdown.is_active());

            // Extra ticks neither go negative nor re-fire
            for _ in 0..5 {
                assert_eq!(countdown.tick(), None);
            }
            assert_eq!(countdown.seconds_remaining(), 0);
        }
    }

    #[test]
    fn cancelled_countdown_never_expires() {
        let mut countdown = Countdown::new(5);
        countdown.start(5);
        assert_eq!(countdown.tick(), None);
        countdown.cancel();

        for _ in 0..10 {
            assert_eq!(countdown.tick(), None);
        }
        assert_eq!(countdown.advance(Duration::from_secs(60)), None);
        assert_eq!(countdown.seconds_remaining(), 4);
    }

    #[test]
    fn advance_carries_sub_second_remainders() {
        let mut countdown = Countdown::new(3);
        countdown.start(3);

        assert_eq!(countdown.advance(Duration::from_millis(600)), None);
        assert_eq!(countdown.seconds_remaining(), 3);
        assert_eq!(countdown.advance(Duration::from_millis(600)), None);
        assert_eq!(countdown.seconds_remaining(), 2);
        assert_eq!(countdown.advance(Duration::from_millis(2_000)), Some(Expired));
        assert_eq!(countdown.seconds_remaining(), 0);
    }

    #[test]
    fn advance_stops_at_expiry_even_with_time_to_spare() {
        let mut countdown = Countdown::new(2);
        countdown.start(2);
        assert_eq!(countdown.advance(Duration::from_secs(30)), Some(Expired));
        assert_eq!(countdown.advance(Duration::from_secs(30)), None);
    }

    #[test]
    fn restart_rearms_with_fresh_duration() {
        let mut countdown = Countdown::new(2);
        countdown.start(2);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.tick(), Some(Expired));

        countdown.start(2);
        assert!(countdown.is_active());
        assert_eq!(countdown.seconds_remaining(), 2);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.tick(), Some(Expired));
    }

    #[test]
    fn zero_length_countdown_expires_on_first_tick() {
        let mut countdown = Countdown::new(0);
        countdown.start(0);
        assert_eq!(countdown.tick(), Some(Expired));
        assert_eq!(countdown.tick(), None);
    }

    #[test]
    fn urgency_thresholds() {
        let mut countdown = Countdown::new(100);
        countdown.start(100);
        assert_eq!(countdown.urgency(), Urgency::Calm);

        for _ in 0..71 {
            let _ = countdown.tick();
        }
        assert_eq!(countdown.seconds_remaining(), 29);
        assert_eq!(countdown.urgency(), Urgency::Warning);

        for _ in 0..20 {
            let _ = countdown.tick();
        }
        assert_eq!(countdown.seconds_remaining(), 9);
        assert_eq!(countdown.urgency(), Urgency::Danger);
    }
}
