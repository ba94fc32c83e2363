//! Wall-clock throttle for climb detection.

/// Default detection interval: ten ticks of a 60 Hz loop.
pub const DEFAULT_TRACE_INTERVAL: f32 = 10.0 / 60.0;

/// Time accumulator that gates climb detection to a fixed wall-clock
/// interval, decoupling probe cadence from frame rate.
///
/// The clock starts ready, so the first tick after spawn qualifies. A pass
/// is granted before the tick's own delta accrues, mirroring a counter that
/// is checked before it increments.
#[derive(Debug, Clone)]
pub struct TraceClock {
    interval: f32,
    accumulated: f32,
}

impl TraceClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: interval,
        }
    }

    /// Advances the clock by `dt` seconds and reports whether this tick
    /// qualifies for a detection pass. A long stall banks at most one
    /// interval, so it yields a single catch-up pass rather than a burst.
    pub fn tick(&mut self, dt: f32) -> bool {
        // Small slack so accumulated float error cannot push a pass one
        // frame late at steady tick rates.
        const SLACK: f32 = 1e-4;

        let fire = self.accumulated + SLACK >= self.interval;
        if fire {
            self.accumulated -= self.interval;
        }
        self.accumulated = (self.accumulated + dt).min(self.interval);
        fire
    }
}

impl Default for TraceClock {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT_60HZ: f32 = 1.0 / 60.0;

    #[test]
    fn first_tick_qualifies() {
        let mut clock = TraceClock::default();
        assert!(clock.tick(DT_60HZ));
    }

    #[test]
    fn fires_every_tenth_tick_at_fixed_rate() {
        let mut clock = TraceClock::default();
        let mut fired = Vec::new();
        for i in 0..31 {
            if clock.tick(DT_60HZ) {
                fired.push(i);
            }
        }
        assert_eq!(fired, vec![0, 10, 20, 30]);
    }

    #[test]
    fn cadence_is_stable_across_frame_rates() {
        // 120 Hz ticks: twice as many frames per qualifying pass.
        let mut clock = TraceClock::default();
        let mut count = 0;
        for _ in 0..240 {
            if clock.tick(1.0 / 120.0) {
                count += 1;
            }
        }
        // Two seconds of wall clock at a 1/6 s interval, within float
        // accumulation slack.
        assert!((12..=13).contains(&count), "fired {count} times");
    }

    #[test]
    fn long_stall_yields_one_catch_up_pass() {
        let mut clock = TraceClock::default();
        assert!(clock.tick(DT_60HZ));
        // The stall banks at most one interval...
        clock.tick(2.0);
        // ...granted on the next tick, once.
        assert!(clock.tick(DT_60HZ));
        assert!(!clock.tick(DT_60HZ));
    }
}
