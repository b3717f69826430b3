use tracing::info;

use crate::error::{AppError, AppResult};
use crate::presenter::{PresentationAdapter, TourStatus};
use crate::tour::{Catalog, TargetRef, TourStep};

use super::layout::PageLayout;

const HEADLESS_WIDTH: u16 = 100;
const HEADLESS_VIEWPORT: u16 = 30;

/// A page with no screen. Every visible effect of the tour is written to the log.
pub struct HeadlessPage {
    layout: PageLayout,
    viewport_height: u16,
    offset: f64,
    last_status: Option<TourStatus>,
    visits: Vec<String>,
}

impl HeadlessPage {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            layout: PageLayout::build(catalog, HEADLESS_WIDTH),
            viewport_height: HEADLESS_VIEWPORT,
            offset: 0.0,
            last_status: None,
            visits: Vec::new(),
        }
    }

    /// Routes navigated to, oldest first.
    pub fn visits(&self) -> &[String] {
        &self.visits
    }
}

impl PresentationAdapter for HeadlessPage {
    fn render_hotspot_overlay(&mut self, step: &TourStep) {
        info!(
            title = %step.content.title,
            features = step.content.tags.len(),
            offset = self.offset,
            "hotspot overlay shown"
        );
    }

    fn clear_hotspot_overlay(&mut self) {
        info!("hotspot overlay cleared");
    }

    fn render_workflow_highlight(&mut self, step: &TourStep) {
        info!(
            title = %step.content.title,
            tags = ?step.content.tags,
            "workflow stage highlighted"
        );
    }

    fn render_finale_highlight(&mut self, item: usize, label: &str) {
        info!(item, %label, "advantage highlighted");
    }

    fn clear_highlights(&mut self) {
        info!("highlights cleared");
    }

    fn locate(&self, target: &TargetRef) -> Option<f64> {
        self.layout.locate(target, self.viewport_height)
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn max_scroll_offset(&self) -> f64 {
        f64::from(self.layout.max_scroll(self.viewport_height))
    }

    fn navigate_to(&mut self, route: &str) -> AppResult<()> {
        if route.is_empty() {
            return Err(AppError::navigation(
                route,
                AppError::invalid_argument("empty route"),
            ));
        }
        info!(%route, "navigated");
        self.visits.push(route.to_string());
        Ok(())
    }

    fn present(&mut self, status: &TourStatus) -> AppResult<()> {
        let changed = self
            .last_status
            .as_ref()
            .is_none_or(|last| last.phase != status.phase || last.current_index != status.current_index);
        if changed {
            info!(
                phase = %status.phase,
                step = status.current_index,
                of = status.step_count,
                label = status.step_label.as_deref().unwrap_or("-"),
                "tour status"
            );
            self.last_status = Some(status.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::presenter::PresentationAdapter;
    use crate::tour::catalog::{Catalog, SCANNER_SECTION};
    use crate::tour::TargetRef;

    use super::HeadlessPage;

    #[test]
    fn headless_page_locates_catalog_sections() {
        let page = HeadlessPage::new(&Catalog::builtin());
        assert!(page.locate(&TargetRef::section(SCANNER_SECTION)).is_some());
        assert!(page.locate(&TargetRef::section("missing")).is_none());
        assert!(page.max_scroll_offset() > 0.0);
    }

    #[test]
    fn headless_navigation_is_recorded() {
        let mut page = HeadlessPage::new(&Catalog::builtin());
        page.navigate_to("/").expect("navigation should succeed");
        let err = page.navigate_to("").expect_err("empty route is refused");
        assert!(matches!(err, AppError::Navigation { .. }));
        assert_eq!(page.visits(), ["/"]);
    }
}
