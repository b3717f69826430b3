use std::time::{Duration, Instant};

use super::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub start_offset: f64,
    pub end_offset: f64,
    pub duration: Duration,
    pub easing: Easing,
    pub started_at: Instant,
}

impl ScrollAnimation {
    pub fn new(start_offset: f64, end_offset: f64, duration: Duration, started_at: Instant) -> Self {
        Self {
            start_offset,
            end_offset,
            duration,
            easing: Easing::EaseInOutQuad,
            started_at,
        }
    }

    pub fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn offset_at(&self, now: Instant) -> f64 {
        let eased = self.easing.apply(self.progress_at(now));
        self.start_offset + (self.end_offset - self.start_offset) * eased
    }

    pub fn ends_at(&self) -> Instant {
        self.started_at + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTick {
    Idle,
    Frame { offset: f64 },
    Completed { token: u64, offset: f64 },
}

#[derive(Debug)]
struct ActiveScroll {
    token: u64,
    animation: ScrollAnimation,
}

/// Owns at most one in-flight scroll animation.
#[derive(Debug)]
pub struct ScrollAnimator {
    active: Option<ActiveScroll>,
    frame_interval: Duration,
    canceled: usize,
}

impl ScrollAnimator {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            active: None,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            canceled: 0,
        }
    }

    /// Starts `animation`, tagged with `token`. Returns the token of a replaced animation.
    pub fn animate_to(&mut self, animation: ScrollAnimation, token: u64) -> Option<u64> {
        let replaced = self.cancel();
        self.active = Some(ActiveScroll { token, animation });
        replaced
    }

    /// Drops the in-flight animation without completing it.
    pub fn cancel(&mut self) -> Option<u64> {
        let canceled = self.active.take().map(|active| active.token);
        if canceled.is_some() {
            self.canceled = self.canceled.saturating_add(1);
        }
        canceled
    }

    pub fn tick(&mut self, now: Instant) -> ScrollTick {
        let Some(active) = self.active.as_ref() else {
            return ScrollTick::Idle;
        };
        let offset = active.animation.offset_at(now);
        if active.animation.progress_at(now) >= 1.0 {
            let token = active.token;
            self.active = None;
            return ScrollTick::Completed { token, offset };
        }
        ScrollTick::Frame { offset }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_token(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.token)
    }

    pub fn next_frame_at(&self, now: Instant) -> Option<Instant> {
        let active = self.active.as_ref()?;
        Some((now + self.frame_interval).min(active.animation.ends_at().max(now)))
    }

    pub fn canceled(&self) -> usize {
        self.canceled
    }
}

/// Distance-proportional duration, clamped so short hops aren't instant and long ones don't drag.
pub fn distance_scroll_duration(
    distance_px: f64,
    ms_per_px: f64,
    floor: Duration,
    ceiling: Duration,
) -> Duration {
    let ceiling = ceiling.max(floor);
    let raw_ms = (distance_px.abs() * ms_per_px).max(0.0);
    if !raw_ms.is_finite() {
        return ceiling;
    }
    Duration::from_secs_f64(raw_ms / 1000.0).clamp(floor, ceiling)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ScrollAnimation, ScrollAnimator, ScrollTick, distance_scroll_duration};

    #[test]
    fn tick_interpolates_then_completes_with_token() {
        let t0 = Instant::now();
        let mut animator = ScrollAnimator::new(Duration::from_millis(16));
        animator.animate_to(
            ScrollAnimation::new(0.0, 100.0, Duration::from_millis(1_000), t0),
            7,
        );

        match animator.tick(t0 + Duration::from_millis(250)) {
            ScrollTick::Frame { offset } => assert!((offset - 12.5).abs() < 1e-6),
            other => panic!("expected frame, got {other:?}"),
        }
        match animator.tick(t0 + Duration::from_millis(500)) {
            ScrollTick::Frame { offset } => assert!((offset - 50.0).abs() < 1e-6),
            other => panic!("expected frame, got {other:?}"),
        }
        assert_eq!(
            animator.tick(t0 + Duration::from_millis(1_000)),
            ScrollTick::Completed {
                token: 7,
                offset: 100.0
            }
        );
        assert_eq!(animator.tick(t0 + Duration::from_millis(1_100)), ScrollTick::Idle);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let t0 = Instant::now();
        let mut animator = ScrollAnimator::new(Duration::from_millis(16));
        animator.animate_to(ScrollAnimation::new(40.0, 10.0, Duration::ZERO, t0), 1);
        assert_eq!(
            animator.tick(t0),
            ScrollTick::Completed {
                token: 1,
                offset: 10.0
            }
        );
    }

    #[test]
    fn new_request_cancels_in_flight_animation_without_completion() {
        let t0 = Instant::now();
        let mut animator = ScrollAnimator::new(Duration::from_millis(16));
        animator.animate_to(ScrollAnimation::new(0.0, 100.0, Duration::from_secs(4), t0), 1);
        let replaced =
            animator.animate_to(ScrollAnimation::new(0.0, 50.0, Duration::from_secs(1), t0), 2);
        assert_eq!(replaced, Some(1));
        assert_eq!(animator.canceled(), 1);
        assert_eq!(animator.active_token(), Some(2));

        assert_eq!(animator.cancel(), Some(2));
        assert!(!animator.is_animating());
        assert_eq!(animator.tick(t0 + Duration::from_secs(5)), ScrollTick::Idle);
    }

    #[test]
    fn next_frame_never_overshoots_animation_end() {
        let t0 = Instant::now();
        let mut animator = ScrollAnimator::new(Duration::from_millis(16));
        assert_eq!(animator.next_frame_at(t0), None);
        animator.animate_to(
            ScrollAnimation::new(0.0, 10.0, Duration::from_millis(10), t0),
            3,
        );
        assert_eq!(animator.next_frame_at(t0), Some(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn distance_duration_is_proportional_and_clamped() {
        let floor = Duration::from_secs(3);
        let ceiling = Duration::from_secs(6);
        assert_eq!(distance_scroll_duration(2_000.0, 2.0, floor, ceiling), Duration::from_secs(4));
        assert_eq!(distance_scroll_duration(10.0, 2.0, floor, ceiling), floor);
        assert_eq!(distance_scroll_duration(-90_000.0, 2.0, floor, ceiling), ceiling);
        assert_eq!(distance_scroll_duration(f64::INFINITY, 2.0, floor, ceiling), ceiling);
    }
}
