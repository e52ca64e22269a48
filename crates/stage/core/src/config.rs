//! Stage tuning: named defaults and the runtime-tunable configuration.
use std::time::Duration;

use rand::Rng;

/// Uniform delay window in milliseconds, sampled from `[min_ms, max_ms)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Samples a delay. A degenerate window yields `min_ms`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..self.max_ms))
    }
}

/// Stage tuning constants and runtime-tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageConfig {
    /// Attack hits every live actor whose anchor is within this distance.
    pub strike_radius: f32,
    /// Delay from the first dying frame to removal from the population.
    /// Intentionally independent of the death clip length.
    pub removal_grace_ms: u64,
    /// Delay from removal to the replacement spawn.
    pub respawn_delay: DelayRange,
    /// Cap on each autonomous behavior.
    pub behavior_duration: DelayRange,
    pub initial_population: usize,
    /// Rate of the built-in refresh source when the shell has no vsync.
    pub refresh_hz: f64,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl StageConfig {
    pub const DEFAULT_STRIKE_RADIUS: f32 = 80.0;
    pub const DEFAULT_REMOVAL_GRACE_MS: u64 = 1_500;
    pub const DEFAULT_RESPAWN_DELAY_MS: DelayRange = DelayRange::new(10_000, 40_000);
    pub const DEFAULT_BEHAVIOR_DURATION_MS: DelayRange = DelayRange::new(1_000, 4_000);
    pub const DEFAULT_INITIAL_POPULATION: usize = 30;
    pub const DEFAULT_REFRESH_HZ: f64 = 60.0;
    /// Shortest refresh period the built-in source will run at.
    pub const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(1);

    pub fn new() -> Self {
        Self {
            strike_radius: Self::DEFAULT_STRIKE_RADIUS,
            removal_grace_ms: Self::DEFAULT_REMOVAL_GRACE_MS,
            respawn_delay: Self::DEFAULT_RESPAWN_DELAY_MS,
            behavior_duration: Self::DEFAULT_BEHAVIOR_DURATION_MS,
            initial_population: Self::DEFAULT_INITIAL_POPULATION,
            refresh_hz: Self::DEFAULT_REFRESH_HZ,
            command_buffer_size: 256,
            event_buffer_size: 256,
        }
    }

    pub const fn removal_grace(&self) -> Duration {
        Duration::from_millis(self.removal_grace_ms)
    }

    /// Period between refreshes of the built-in refresh source.
    ///
    /// Rates below 1 Hz run at 1 Hz, a non-finite rate falls back to the
    /// default, and the period never drops under [`Self::MIN_REFRESH_PERIOD`].
    pub fn refresh_period(&self) -> Duration {
        let hz = if self.refresh_hz.is_finite() {
            self.refresh_hz.max(1.0)
        } else {
            Self::DEFAULT_REFRESH_HZ
        };
        Duration::from_secs_f64(1.0 / hz).max(Self::MIN_REFRESH_PERIOD)
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_in_half_open_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = DelayRange::new(1_000, 4_000);
        for _ in 0..500 {
            let delay = range.sample(&mut rng);
            assert!(delay >= Duration::from_millis(1_000));
            assert!(delay < Duration::from_millis(4_000));
        }
    }

    #[test]
    fn degenerate_window_is_fixed() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            DelayRange::new(250, 250).sample(&mut rng),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn defaults_match_named_constants() {
        let config = StageConfig::default();
        assert_eq!(config.strike_radius, 80.0);
        assert_eq!(config.removal_grace(), Duration::from_millis(1_500));
        assert_eq!(config.respawn_delay, DelayRange::new(10_000, 40_000));
        assert_eq!(config.behavior_duration, DelayRange::new(1_000, 4_000));
    }

    #[test]
    fn refresh_period_is_never_zero() {
        let mut config = StageConfig::default();
        for hz in [1e10, f64::MAX, f64::INFINITY, f64::NAN, 0.0, -5.0] {
            config.refresh_hz = hz;
            let period = config.refresh_period();
            assert!(period >= StageConfig::MIN_REFRESH_PERIOD, "{hz} Hz gave {period:?}");
            assert!(period <= Duration::from_secs(1), "{hz} Hz gave {period:?}");
        }

        config.refresh_hz = 4.0;
        assert_eq!(config.refresh_period(), Duration::from_millis(250));
    }
}
