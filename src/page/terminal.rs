use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::widgets::Paragraph;
use tracing::{debug, warn};

use crate::engine::TerminalSurface;
use crate::error::{AppError, AppResult};
use crate::event::{InteractionKind, TourCommand};
use crate::presenter::{HostInput, PresentationAdapter, TourStatus};
use crate::tour::{Catalog, StepKind, TargetRef, TourStep};
use crate::ui::{
    OverlayOrigin, OverlayView, draw_chrome, draw_highlight_banner, draw_step_overlay,
    split_layout,
};

use super::document::{Emphasis, render_document};
use super::layout::{HitTarget, PageLayout};

/// Rows reserved below the page for the status line.
const STATUS_ROWS: u16 = 1;

/// The product page drawn in a terminal. Implements [`PresentationAdapter`] for the tour.
pub struct TerminalPage<S> {
    surface: S,
    catalog: Catalog,
    layout: PageLayout,
    viewport_height: u16,
    offset: f64,
    overlay: Option<OverlayView>,
    emphasis: Emphasis,
    banner: Option<String>,
    route: String,
    home_route: String,
}

impl<S: TerminalSurface> TerminalPage<S> {
    pub fn new(surface: S, catalog: Catalog, home_route: impl Into<String>) -> AppResult<Self> {
        let size = surface
            .size()
            .map_err(|err| AppError::io_with_context(err, "read terminal size"))?;
        let layout = PageLayout::build(&catalog, size.width);
        let home_route = home_route.into();
        Ok(Self {
            surface,
            catalog,
            layout,
            viewport_height: size.height.saturating_sub(STATUS_ROWS),
            offset: 0.0,
            overlay: None,
            emphasis: Emphasis::default(),
            banner: None,
            route: home_route.clone(),
            home_route,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn overlay(&self) -> Option<&OverlayView> {
        self.overlay.as_ref()
    }

    fn sync_geometry(&mut self) -> AppResult<()> {
        let size = self
            .surface
            .size()
            .map_err(|err| AppError::io_with_context(err, "read terminal size"))?;
        if size.width != self.layout.width() {
            self.layout = PageLayout::build(&self.catalog, size.width);
        }
        self.viewport_height = size.height.saturating_sub(STATUS_ROWS);
        self.offset = self.offset.clamp(0.0, self.max_scroll_offset());
        Ok(())
    }

    fn scroll_row(&self) -> u16 {
        self.offset.max(0.0).round() as u16
    }

    fn scroll_by(&mut self, rows: f64) {
        self.offset = (self.offset + rows).clamp(0.0, self.max_scroll_offset());
    }

    fn open_visitor_overlay(&mut self, target: HitTarget) -> InteractionKind {
        let (view, kind) = match target {
            HitTarget::Hotspot(index) => {
                let hotspot = &self.catalog.hotspots[index];
                let view = OverlayView {
                    title: hotspot.name.clone(),
                    body: hotspot.description.clone(),
                    bullets: hotspot.features.clone(),
                    origin: OverlayOrigin::Visitor,
                };
                (view, InteractionKind::HotspotClick)
            }
            HitTarget::Card(index) => {
                let stage = &self.catalog.workflow[index];
                let view = OverlayView {
                    title: stage.title.clone(),
                    body: format!("{} {}", stage.description, stage.detail),
                    bullets: stage.tags.clone(),
                    origin: OverlayOrigin::Visitor,
                };
                (view, InteractionKind::CardClick)
            }
        };
        debug!(title = %view.title, "visitor opened overlay");
        self.overlay = Some(view);
        kind
    }

    fn visitor_overlay_open(&self) -> bool {
        self.overlay
            .as_ref()
            .is_some_and(|view| view.origin == OverlayOrigin::Visitor)
    }

    fn close_visitor_overlay(&mut self) -> InteractionKind {
        self.overlay = None;
        InteractionKind::OverlayClose
    }

    fn handle_key(&mut self, key: KeyEvent) -> HostInput {
        if key.kind != KeyEventKind::Press {
            return HostInput::default();
        }
        let mut input = HostInput {
            interaction: Some(InteractionKind::KeyPress),
            ..HostInput::default()
        };
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.quit = true;
            }
            KeyCode::Char('q') => input.quit = true,
            KeyCode::Esc if self.visitor_overlay_open() => {
                input.interaction = Some(self.close_visitor_overlay());
            }
            KeyCode::Char('s') => input.command = Some(TourCommand::Start),
            KeyCode::Char('p') => input.command = Some(TourCommand::Pause),
            KeyCode::Char('c') => input.command = Some(TourCommand::Resume),
            KeyCode::Char('x') => input.command = Some(TourCommand::Stop),
            KeyCode::Char('r') => input.command = Some(TourCommand::Restart),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1.0),
            KeyCode::PageDown => self.scroll_by(f64::from(self.viewport_height)),
            KeyCode::PageUp => self.scroll_by(-f64::from(self.viewport_height)),
            _ => {}
        }
        input
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> HostInput {
        let interaction = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.visitor_overlay_open() => {
                self.close_visitor_overlay()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let row = if mouse.row < self.viewport_height {
                    Some(mouse.row.saturating_add(self.scroll_row()))
                } else {
                    None
                };
                match row.and_then(|row| self.layout.hit_test(mouse.column, row)) {
                    Some(target) => self.open_visitor_overlay(target),
                    None => InteractionKind::Touch,
                }
            }
            MouseEventKind::ScrollDown => {
                self.scroll_by(3.0);
                InteractionKind::Touch
            }
            MouseEventKind::ScrollUp => {
                self.scroll_by(-3.0);
                InteractionKind::Touch
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => InteractionKind::PointerMove,
            _ => return HostInput::default(),
        };
        HostInput {
            interaction: Some(interaction),
            ..HostInput::default()
        }
    }
}

impl<S: TerminalSurface> PresentationAdapter for TerminalPage<S> {
    fn render_hotspot_overlay(&mut self, step: &TourStep) {
        self.emphasis.hotspot = self
            .catalog
            .hotspots
            .iter()
            .position(|hotspot| hotspot.id == step.entry_id());
        self.overlay = Some(OverlayView {
            title: step.content.title.clone(),
            body: step.content.body.clone(),
            bullets: step.content.tags.clone(),
            origin: OverlayOrigin::Tour,
        });
    }

    fn clear_hotspot_overlay(&mut self) {
        self.emphasis.hotspot = None;
        self.overlay = None;
    }

    fn render_workflow_highlight(&mut self, step: &TourStep) {
        if step.kind != StepKind::WorkflowReveal {
            return;
        }
        self.emphasis.card = self
            .catalog
            .workflow
            .iter()
            .position(|stage| stage.id == step.entry_id());
    }

    fn render_finale_highlight(&mut self, item: usize, label: &str) {
        self.emphasis.card = None;
        self.emphasis.advantage = Some(item);
        self.banner = Some(label.to_string());
    }

    fn clear_highlights(&mut self) {
        self.emphasis = Emphasis::default();
        self.banner = None;
    }

    fn locate(&self, target: &TargetRef) -> Option<f64> {
        self.layout.locate(target, self.viewport_height)
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_scroll_offset());
    }

    fn max_scroll_offset(&self) -> f64 {
        f64::from(self.layout.max_scroll(self.viewport_height))
    }

    fn navigate_to(&mut self, route: &str) -> AppResult<()> {
        if !route.starts_with('/') {
            warn!(%route, "refusing to navigate to a relative route");
            return Err(AppError::navigation(
                route,
                AppError::invalid_argument("route must be absolute"),
            ));
        }
        self.route = route.to_string();
        if self.route == self.home_route {
            self.offset = 0.0;
            self.emphasis = Emphasis::default();
        }
        Ok(())
    }

    fn handle_input(&mut self, event: &Event) -> HostInput {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            _ => HostInput::default(),
        }
    }

    fn present(&mut self, status: &TourStatus) -> AppResult<()> {
        self.sync_geometry()?;
        let lines = render_document(&self.catalog, &self.layout, self.emphasis);
        let scroll_row = self.scroll_row();
        let overlay = self.overlay.as_ref();
        let banner = self.banner.as_deref();
        let route = self.route.as_str();

        self.surface
            .draw(|frame| {
                let ui = split_layout(frame.area());
                frame.render_widget(Paragraph::new(lines).scroll((scroll_row, 0)), ui.page);
                if let Some(label) = banner {
                    draw_highlight_banner(frame, ui.page, label);
                }
                if let Some(view) = overlay {
                    draw_step_overlay(frame, ui.page, view);
                }
                draw_chrome(frame, ui.status, status, route);
            })
            .map_err(|err| AppError::io_with_context(err, "draw tour page"))
    }
}
