//! # Repeat Timer
//!
//! Drives held arrow buttons: one fire after the initial delay, then one
//! per repeat interval until released.
//!
//! ```text
//!   start()        initial elapsed        repeat elapsed
//!  Idle ──────▶ Pending ───────────▶ Repeating ──┐
//!   ▲                                    ▲       │
//!   └──────────── stop() ────────────────┴───────┘
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Repeat intervals, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    /// Delay before the first repeat.
    pub initial_ms: u64,
    /// Delay between later repeats.
    pub repeat_ms: u64,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            initial_ms: 250,
            repeat_ms: 50,
        }
    }
}

impl RepeatConfig {
    fn initial(self) -> Duration {
        Duration::from_millis(self.initial_ms.max(1))
    }

    fn repeat(self) -> Duration {
        Duration::from_millis(self.repeat_ms.max(1))
    }
}

/// Timer state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerState {
    /// Not running.
    #[default]
    Idle,
    /// Waiting out the initial delay.
    Pending {
        /// Time since start.
        elapsed: Duration,
    },
    /// Firing at the repeat interval.
    Repeating {
        /// Time since the last fire.
        elapsed: Duration,
    },
}

/// A two-speed repeat timer advanced by frame time.
#[derive(Clone, Copy, Debug, Default)]
pub struct RepeatTimer {
    config: RepeatConfig,
    state: TimerState,
}

impl RepeatTimer {
    /// Creates an idle timer.
    #[must_use]
    pub fn new(config: RepeatConfig) -> Self {
        Self {
            config,
            state: TimerState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Whether the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !matches!(self.state, TimerState::Idle)
    }

    /// Starts the timer from the initial delay. Does nothing if running.
    pub fn start(&mut self) {
        if !self.is_running() {
            self.state = TimerState::Pending {
                elapsed: Duration::ZERO,
            };
        }
    }

    /// Stops the timer.
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Puts a running timer back on the initial delay.
    pub fn reset_interval(&mut self) {
        if self.is_running() {
            self.state = TimerState::Pending {
                elapsed: Duration::ZERO,
            };
        }
    }

    /// Advances the timer and returns how many times it fired.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        let mut fires = 0;
        let mut state = self.state;
        let mut budget = delta;
        loop {
            match state {
                TimerState::Idle => break,
                TimerState::Pending { elapsed } => {
                    let total = elapsed + budget;
                    if total < self.config.initial() {
                        state = TimerState::Pending { elapsed: total };
                        break;
                    }
                    fires += 1;
                    budget = total - self.config.initial();
                    state = TimerState::Repeating {
                        elapsed: Duration::ZERO,
                    };
                }
                TimerState::Repeating { elapsed } => {
                    let total = elapsed + budget;
                    let interval = self.config.repeat();
                    let whole = total.as_nanos() / interval.as_nanos();
                    fires += u32::try_from(whole).unwrap_or(u32::MAX);
                    let remainder = total.as_nanos() % interval.as_nanos();
                    state = TimerState::Repeating {
                        elapsed: Duration::from_nanos(u64::try_from(remainder).unwrap_or(0)),
                    };
                    break;
                }
            }
        }
        self.state = state;
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_idle_never_fires() {
        let mut timer = RepeatTimer::new(RepeatConfig::default());
        assert_eq!(timer.tick(ms(1000)), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_initial_then_repeating() {
        let mut timer = RepeatTimer::new(RepeatConfig::default());
        timer.start();
        assert_eq!(timer.tick(ms(200)), 0);
        assert_eq!(timer.tick(ms(49)), 0);
        assert_eq!(timer.tick(ms(1)), 1);
        assert!(matches!(timer.state(), TimerState::Repeating { .. }));
        assert_eq!(timer.tick(ms(49)), 0);
        assert_eq!(timer.tick(ms(1)), 1);
        assert_eq!(timer.tick(ms(125)), 2);
        assert_eq!(timer.tick(ms(25)), 1);
    }

    #[test]
    fn test_one_long_frame() {
        let mut timer = RepeatTimer::new(RepeatConfig::default());
        timer.start();
        // 250 for the first fire, then 3 x 50
        assert_eq!(timer.tick(ms(410)), 4);
    }

    #[test]
    fn test_stop_and_reset() {
        let mut timer = RepeatTimer::new(RepeatConfig::default());
        timer.start();
        timer.tick(ms(300));
        timer.reset_interval();
        assert_eq!(
            timer.state(),
            TimerState::Pending {
                elapsed: Duration::ZERO
            }
        );
        assert_eq!(timer.tick(ms(100)), 0);
        timer.stop();
        timer.reset_interval();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_start_while_running_keeps_progress() {
        let mut timer = RepeatTimer::new(RepeatConfig::default());
        timer.start();
        timer.tick(ms(200));
        timer.start();
        assert_eq!(timer.tick(ms(50)), 1);
    }

    #[test]
    fn test_config_from_toml() {
        let config: RepeatConfig = toml::from_str("repeat_ms = 40").unwrap();
        assert_eq!(
            config,
            RepeatConfig {
                initial_ms: 250,
                repeat_ms: 40
            }
        );
    }
}
