//! # Runner configuration.
//!
//! Provides [`RunnerConfig`] settings shared by the built-in runners.
//!
//! Config is used in two ways:
//! 1. **Blocking runner**: `SyncRunner::new(config)` reads `verbose`/`skip`.
//! 2. **Embedded runner**: `EmbeddedRunner::new(handle, config)` reads `bus_capacity`.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`RunnerConfig::bus_capacity_clamped`]

/// Configuration for the built-in runners.
///
/// ## Field semantics
/// - `verbose`: print `"<description> <pct> %"` progress lines on the console
/// - `skip`: keep the final `100 %` line instead of erasing it
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over sentinel checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Write progress to the console on a single rewritable line.
    pub verbose: bool,

    /// On completion, print the `100 %` line with a newline instead of blanking it.
    pub skip: bool,

    /// Capacity of the broadcast channel used by the embedded runner.
    ///
    /// Receivers lagging more than `bus_capacity` events observe `Lagged`.
    pub bus_capacity: usize,
}

impl RunnerConfig {
    /// Returns a copy with `verbose` and `skip` replaced.
    #[inline]
    pub fn with_output(mut self, verbose: bool, skip: bool) -> Self {
        self.verbose = verbose;
        self.skip = skip;
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RunnerConfig {
    /// Default configuration:
    ///
    /// - `verbose = true`
    /// - `skip = false` (final line is erased)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            verbose: true,
            skip: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_console_runner() {
        let cfg = RunnerConfig::default();
        assert!(cfg.verbose);
        assert!(!cfg.skip);
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cfg = RunnerConfig {
            bus_capacity: 0,
            ..RunnerConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_with_output_keeps_capacity() {
        let cfg = RunnerConfig::default().with_output(false, true);
        assert!(!cfg.verbose);
        assert!(cfg.skip);
        assert_eq!(cfg.bus_capacity, 1024);
    }
}
