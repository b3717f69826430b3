use std::convert::Infallible;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Size;

use crate::config::{Config, TourConfig};
use crate::engine::{TerminalSurface, TourEngine};
use crate::error::AppError;
use crate::event::{InteractionEvent, InteractionKind, TourCommand};
use crate::presenter::{HostInput, PresentationAdapter, TourStatus};
use crate::tour::{Catalog, Phase, StepRegistry, TourStep};
use crate::ui::OverlayOrigin;

use super::{PageLayout, TerminalPage};

struct TestTerminalSurface {
    terminal: Terminal<TestBackend>,
}

impl TestTerminalSurface {
    fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = infallible_to_io(Terminal::new(TestBackend::new(width, height)))?;
        Ok(Self { terminal })
    }

    fn screen(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }
}

impl TerminalSurface for TestTerminalSurface {
    fn size(&self) -> io::Result<Size> {
        infallible_to_io(self.terminal.size())
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        infallible_to_io(self.terminal.draw(render)).map(|_| ())
    }
}

fn infallible_to_io<T>(result: Result<T, Infallible>) -> io::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match err {},
    }
}

fn page() -> TerminalPage<TestTerminalSurface> {
    let surface = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    TerminalPage::new(surface, Catalog::builtin(), "/").expect("page should build")
}

fn steps() -> Vec<TourStep> {
    StepRegistry::build(&Catalog::builtin(), &TourConfig::default())
        .steps()
        .to_vec()
}

fn status(phase: Phase) -> TourStatus {
    TourStatus {
        phase,
        current_index: 0,
        step_count: 8,
        step_label: Some("Touchscreen Interface".to_string()),
        manual_override: false,
    }
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn present_draws_page_and_status_line() {
    let mut page = page();
    page.present(&status(Phase::Running))
        .expect("present should draw");

    let screen = page.surface().screen();
    assert!(screen.iter().any(|row| row.contains("HISTOLOG® SCANNER")));
    assert!(screen[23].contains("RUNNING"));
    assert!(screen[23].contains("step 1/8 Touchscreen Interface"));
}

#[test]
fn tour_overlay_is_drawn_until_cleared() {
    let mut page = page();
    let steps = steps();
    page.render_hotspot_overlay(&steps[0]);
    page.present(&status(Phase::Running))
        .expect("present should draw");
    assert!(
        page.surface()
            .screen()
            .iter()
            .any(|row| row.contains("Touchscreen Interface") && row.contains('┌'))
    );
    assert_eq!(
        page.overlay().map(|view| view.origin),
        Some(OverlayOrigin::Tour)
    );

    page.clear_hotspot_overlay();
    assert!(page.overlay().is_none());
}

#[test]
fn clicking_a_marker_opens_a_visitor_overlay_and_next_click_closes_it() {
    let mut page = page();
    page.present(&status(Phase::Running))
        .expect("present should draw");
    let steps = steps();
    let point = page
        .locate(&steps[0].target)
        .expect("hotspot target should resolve");
    assert!(point >= 0.0);

    let (column, row) = PageLayout::build(&Catalog::builtin(), 80)
        .marker(0)
        .expect("first marker");
    let input = page.handle_input(&click(column, row));
    assert_eq!(input.interaction, Some(InteractionKind::HotspotClick));
    assert_eq!(
        page.overlay().map(|view| view.origin),
        Some(OverlayOrigin::Visitor)
    );

    let input = page.handle_input(&click(0, 0));
    assert_eq!(input.interaction, Some(InteractionKind::OverlayClose));
    assert!(page.overlay().is_none());
}

#[test]
fn clicking_empty_page_is_a_plain_touch() {
    let mut page = page();
    let input = page.handle_input(&click(0, 0));
    assert_eq!(
        input,
        HostInput {
            interaction: Some(InteractionKind::Touch),
            ..HostInput::default()
        }
    );
    assert!(page.overlay().is_none());
}

#[test]
fn keys_map_to_tour_controls() {
    let mut page = page();
    let cases = [
        ('s', TourCommand::Start),
        ('p', TourCommand::Pause),
        ('c', TourCommand::Resume),
        ('x', TourCommand::Stop),
        ('r', TourCommand::Restart),
    ];
    for (ch, command) in cases {
        let input = page.handle_input(&key(KeyCode::Char(ch)));
        assert_eq!(input.command, Some(command), "key {ch}");
        assert_eq!(input.interaction, Some(InteractionKind::KeyPress));
    }
    assert!(page.handle_input(&key(KeyCode::Char('q'))).quit);
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(page.handle_input(&ctrl_c).quit);
}

#[test]
fn escape_closes_only_a_visitor_overlay() {
    let mut page = page();
    let steps = steps();
    page.render_hotspot_overlay(&steps[0]);
    let input = page.handle_input(&key(KeyCode::Esc));
    assert_eq!(input.interaction, Some(InteractionKind::KeyPress));
    assert!(page.overlay().is_some());
}

#[test]
fn scroll_offset_is_clamped_and_home_navigation_returns_to_top() {
    let mut page = page();
    page.set_scroll_offset(10_000.0);
    assert_eq!(page.scroll_offset(), page.max_scroll_offset());
    assert!(page.max_scroll_offset() > 0.0);

    page.navigate_to("/").expect("home navigation should succeed");
    assert_eq!(page.scroll_offset(), 0.0);
    assert_eq!(page.route(), "/");
    let err = page
        .navigate_to("pricing")
        .expect_err("relative routes are refused");
    assert!(matches!(err, AppError::Navigation { ref route, .. } if route == "pricing"));
    assert_eq!(page.route(), "/");
}

#[test]
fn marker_click_during_preroll_leaves_later_steps_scrolling() {
    let mut page = page();
    page.present(&status(Phase::Starting))
        .expect("present should draw");
    let config = Config::default();
    let origin = Instant::now();
    let registry = StepRegistry::build(&Catalog::builtin(), &config.tour);
    let mut engine = TourEngine::new(registry, &config, origin);
    engine.handle_command(TourCommand::Start, &mut page, origin);

    let (column, row) = PageLayout::build(&Catalog::builtin(), 80)
        .marker(0)
        .expect("first marker");
    let clicked_at = origin + Duration::from_secs(1);
    let kind = page
        .handle_input(&click(column, row))
        .interaction
        .expect("marker click is an interaction");
    engine.handle_interaction(InteractionEvent::new(kind, clicked_at), &mut page, clicked_at);
    assert_eq!(engine.phase(), Phase::Starting);
    assert!(!engine.manual_override());

    let mut now = clicked_at;
    let mut offsets = Vec::new();
    let mut animated = false;
    for _ in 0..100_000 {
        engine.poll(&mut page, now);
        if engine.phase() == Phase::Finale {
            break;
        }
        animated |= engine.scheduler().is_animating();
        offsets.push(page.scroll_offset());
        now = engine.next_wakeup(now).expect("running tour always has a wakeup");
    }
    offsets.dedup();

    assert_eq!(engine.phase(), Phase::Finale);
    assert!(!engine.manual_override());
    assert!(animated);
    assert!(offsets.len() > 2, "{offsets:?}");
}
