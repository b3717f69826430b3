use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::event::TourEvent;
use crate::presenter::PresentationAdapter;
use crate::scroll::distance_scroll_duration;

use super::context::{Continuation, FinaleStage, Phase};
use super::scheduler::TourScheduler;

impl TourScheduler {
    /// Number of summary items the finale walks through.
    pub fn finale_highlight_count(&self) -> usize {
        self.registry
            .finale()
            .map_or(0, |finale| finale.content.tags.len())
            .min(self.tour.finale_highlight_count)
    }

    /// Scroll to the bottom, hold, walk the summary items, return to the top, go home.
    pub(crate) fn begin_finale(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        self.ctx.current_index = self.registry.finale_index();
        self.set_phase(Phase::Finale);
        info!("finale started");

        let start = adapter.scroll_offset();
        let bottom = adapter.max_scroll_offset().max(0.0);
        let duration = distance_scroll_duration(
            bottom - start,
            self.scroll.scroll_ms_per_px,
            Duration::from_millis(self.scroll.finale_scroll_min_ms),
            Duration::from_millis(self.scroll.finale_scroll_max_ms),
        );
        let then = Continuation::Finale(FinaleStage::Hold);
        if !self.arm_scroll(start, bottom, duration, now, then) {
            self.run_finale_stage(FinaleStage::Hold, adapter, now);
        }
    }

    pub(crate) fn run_finale_stage(
        &mut self,
        stage: FinaleStage,
        adapter: &mut dyn PresentationAdapter,
        now: Instant,
    ) {
        if self.ctx.phase != Phase::Finale {
            return;
        }
        match stage {
            FinaleStage::Hold => {
                let next = Continuation::Finale(FinaleStage::Highlight(0));
                self.arm_timer(self.tour.finale_hold(), now, next);
            }
            FinaleStage::Highlight(item) if item < self.finale_highlight_count() => {
                let label = self
                    .registry
                    .finale()
                    .and_then(|finale| finale.content.tags.get(item))
                    .cloned()
                    .unwrap_or_default();
                adapter.render_finale_highlight(item, &label);
                self.push_event(TourEvent::FinaleItemHighlighted { item });
                let next = Continuation::Finale(FinaleStage::Highlight(item + 1));
                self.arm_timer(self.tour.finale_highlight_dwell(), now, next);
            }
            FinaleStage::Highlight(_) => {
                adapter.clear_highlights();
                self.run_finale_stage(FinaleStage::ReturnToTop, adapter, now);
            }
            FinaleStage::ReturnToTop => {
                let start = adapter.scroll_offset();
                let then = Continuation::Finale(FinaleStage::Complete);
                if !self.arm_scroll(start, 0.0, self.scroll.return_scroll(), now, then) {
                    self.run_finale_stage(FinaleStage::Complete, adapter, now);
                }
            }
            FinaleStage::Complete => self.complete(adapter),
        }
    }

    fn complete(&mut self, adapter: &mut dyn PresentationAdapter) {
        self.cancel_pending();
        self.set_phase(Phase::Idle);
        info!(route = %self.home_route, "tour complete");
        let route = self.home_route.clone();
        match adapter.navigate_to(&route) {
            Ok(()) => self.push_event(TourEvent::Navigated { route }),
            Err(err) => {
                warn!(%route, error = %err, "navigation after tour failed");
                self.push_event(TourEvent::NavigationFailed { route });
            }
        }
    }

    /// Drops the finale mid-flight. No navigation happens.
    pub(crate) fn abort_finale(&mut self, adapter: &mut dyn PresentationAdapter, to: Phase) {
        self.cancel_pending();
        self.ctx.bump_epoch();
        adapter.clear_highlights();
        self.push_event(TourEvent::FinaleAborted);
        self.set_phase(to);
        info!(phase = %to, "finale aborted");
    }
}
