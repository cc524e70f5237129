//! Write pacing.

use std::time::Duration;
use tracing::info;

/// Pause after every write unless overridden.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

/// Extra pause taken every [`DEFAULT_COOLDOWN_EVERY`] writes.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Number of writes between cool-downs.
pub const DEFAULT_COOLDOWN_EVERY: u32 = 25;

/// Spaces out writes so that secondary (abuse) rate limits are never hit.
///
/// Each write is followed by `pause`; every `cooldown_every` writes an extra
/// `cooldown` is taken on top.
#[derive(Debug, Clone)]
pub struct Pacer {
    pause: Duration,
    cooldown: Duration,
    cooldown_every: u32,
    writes: u32,
}

impl Pacer {
    /// Creates a pacer with the given per-write pause and default cool-down.
    #[must_use]
    pub fn new(pause: Duration) -> Self {
        Self::with_cooldown(pause, DEFAULT_COOLDOWN, DEFAULT_COOLDOWN_EVERY)
    }

    /// Creates a pacer with explicit cool-down settings.
    #[must_use]
    pub fn with_cooldown(pause: Duration, cooldown: Duration, cooldown_every: u32) -> Self {
        Self {
            pause,
            cooldown,
            cooldown_every: cooldown_every.max(1),
            writes: 0,
        }
    }

    /// A pacer that never sleeps.
    #[must_use]
    pub fn immediate() -> Self {
        Self::with_cooldown(Duration::ZERO, Duration::ZERO, DEFAULT_COOLDOWN_EVERY)
    }

    /// Number of writes recorded so far.
    #[must_use]
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Records one write and sleeps accordingly.
    ///
    /// Returns `true` if a cool-down was taken.
    pub async fn after_write(&mut self) -> bool {
        self.writes += 1;

        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }

        if self.writes % self.cooldown_every != 0 {
            return false;
        }

        info!(
            writes = self.writes,
            cooldown_secs = self.cooldown.as_secs(),
            "Cooling down"
        );
        if !self.cooldown.is_zero() {
            tokio::time::sleep(self.cooldown).await;
        }
        true
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PAUSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cooldown_every_nth_write() {
        let mut pacer = Pacer::immediate();
        let mut cooldowns = Vec::new();

        for _ in 0..50 {
            if pacer.after_write().await {
                cooldowns.push(pacer.writes());
            }
        }

        assert_eq!(cooldowns, vec![25, 50]);
        assert_eq!(pacer.writes(), 50);
    }

    #[tokio::test]
    async fn zero_interval_is_clamped() {
        let mut pacer = Pacer::with_cooldown(Duration::ZERO, Duration::ZERO, 0);
        assert!(pacer.after_write().await);
    }

    #[test]
    fn default_pause_is_five_seconds() {
        let pacer = Pacer::default();
        assert_eq!(pacer.pause, Duration::from_secs(5));
        assert_eq!(pacer.cooldown, Duration::from_secs(60));
        assert_eq!(pacer.cooldown_every, 25);
    }
}
