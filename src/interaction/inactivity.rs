use std::time::{Duration, Instant};

use crate::tour::{Phase, TourContext};

/// Watches a paused tour and asks for a resume once the visitor has walked away.
///
/// Reads the last interaction time and pause start from the [`TourContext`]; the
/// scheduler records both, the tour's own scrolling and overlays never touch them.
#[derive(Debug, Clone, Copy)]
pub struct InactivityMonitor {
    timeout: Duration,
    poll_interval: Duration,
}

impl InactivityMonitor {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    /// True when the tour has been paused, untouched, for longer than the timeout.
    pub fn should_resume(&self, ctx: &TourContext, now: Instant) -> bool {
        if ctx.phase() != Phase::Paused {
            return false;
        }
        let Some(paused_at) = ctx.paused_at() else {
            return false;
        };
        let quiet_since = paused_at.max(ctx.last_interaction_at());
        now.saturating_duration_since(quiet_since) > self.timeout
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::tour::{Phase, TourContext};

    use super::InactivityMonitor;

    const TIMEOUT: Duration = Duration::from_secs(120);
    const POLL: Duration = Duration::from_secs(10);

    fn paused_context(at: Instant) -> TourContext {
        let mut ctx = TourContext::new(at);
        ctx.phase = Phase::Paused;
        ctx.paused_at = Some(at);
        ctx
    }

    #[test]
    fn resumes_only_after_timeout_of_continuous_pause() {
        let t0 = Instant::now();
        let monitor = InactivityMonitor::new(TIMEOUT, POLL);
        let ctx = paused_context(t0);

        assert!(!monitor.should_resume(&ctx, t0 + Duration::from_secs(120)));
        assert!(monitor.should_resume(&ctx, t0 + Duration::from_secs(121)));
    }

    #[test]
    fn any_interaction_resets_the_clock() {
        let t0 = Instant::now();
        let monitor = InactivityMonitor::new(TIMEOUT, POLL);
        let mut ctx = paused_context(t0);
        ctx.last_interaction_at = t0 + Duration::from_secs(100);

        assert!(!monitor.should_resume(&ctx, t0 + Duration::from_secs(130)));
        assert!(monitor.should_resume(&ctx, t0 + Duration::from_secs(221)));
    }

    #[test]
    fn interaction_before_pause_does_not_shorten_the_wait() {
        let t0 = Instant::now();
        let monitor = InactivityMonitor::new(TIMEOUT, POLL);
        let paused_at = t0 + Duration::from_secs(300);
        let mut ctx = paused_context(paused_at);
        ctx.last_interaction_at = t0;

        assert!(!monitor.should_resume(&ctx, paused_at + Duration::from_secs(60)));
    }

    #[test]
    fn only_paused_phase_resumes() {
        let t0 = Instant::now();
        let monitor = InactivityMonitor::new(TIMEOUT, POLL);
        let mut ctx = paused_context(t0);
        for phase in [Phase::Running, Phase::Stopped, Phase::Idle, Phase::Finale] {
            ctx.phase = phase;
            assert!(!monitor.should_resume(&ctx, t0 + Duration::from_secs(1_000)));
        }
    }
}
