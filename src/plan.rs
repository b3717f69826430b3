use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::Config;
use crate::engine::TourEngine;
use crate::event::{TourCommand, TourEvent};
use crate::page::HeadlessPage;
use crate::tour::{Catalog, Phase, StepId, StepKind, StepRegistry, dwell_for};

/// Upper bound on simulated wakeups; a finished tour needs a few thousand.
const MAX_WAKEUPS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStep {
    pub index: usize,
    pub id: StepId,
    pub kind: StepKind,
    pub label: String,
    pub shown_at_ms: u64,
    pub dwell_ms: u64,
}

/// Timeline of an untouched tour run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourPlan {
    pub steps: Vec<PlannedStep>,
    pub skipped: Vec<StepId>,
    pub finale_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub home_route: String,
}

/// Runs the tour against a headless page on a simulated clock and records when each step shows.
pub fn plan_tour(catalog: &Catalog, config: &Config) -> TourPlan {
    let registry = StepRegistry::build(catalog, &config.tour);
    let origin = Instant::now();
    let mut engine = TourEngine::new(registry.clone(), config, origin);
    let mut page = HeadlessPage::new(catalog);
    let mut plan = TourPlan {
        steps: Vec::new(),
        skipped: Vec::new(),
        finale_at_ms: None,
        completed_at_ms: None,
        home_route: config.page.home_route.clone(),
    };

    let elapsed_ms = |now: Instant| millis(now.duration_since(origin));
    let mut now = origin;
    engine.handle_command(TourCommand::Start, &mut page, now);
    for _ in 0..MAX_WAKEUPS {
        engine.poll(&mut page, now);
        for event in engine.drain_events() {
            match event {
                TourEvent::StepShown { index, id } => {
                    let Some(step) = registry.get(index) else {
                        continue;
                    };
                    plan.steps.push(PlannedStep {
                        index,
                        id,
                        kind: step.kind,
                        label: step.label().to_string(),
                        shown_at_ms: elapsed_ms(now),
                        dwell_ms: millis(dwell_for(step, &config.tour)),
                    });
                }
                TourEvent::StepSkipped { id, .. } => plan.skipped.push(id),
                TourEvent::PhaseChanged {
                    to: Phase::Finale, ..
                } => plan.finale_at_ms = Some(elapsed_ms(now)),
                TourEvent::Navigated { .. } | TourEvent::NavigationFailed { .. } => {
                    plan.completed_at_ms = Some(elapsed_ms(now));
                }
                _ => {}
            }
        }
        match engine.next_wakeup(now) {
            Some(next) => now = next.max(now),
            None => break,
        }
    }
    plan
}

impl TourPlan {
    /// Human-readable table, one line per step.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = writeln!(
                out,
                "{:>8}  #{:<2} {:<9} {:<28} dwell {:>5} ms",
                format_clock(step.shown_at_ms),
                step.index,
                step.kind.as_str(),
                step.label,
                step.dwell_ms
            );
        }
        for id in &self.skipped {
            let _ = writeln!(out, "{:>8}  skipped {id}", "-");
        }
        if let Some(at) = self.finale_at_ms {
            let _ = writeln!(out, "{:>8}  finale", format_clock(at));
        }
        match self.completed_at_ms {
            Some(at) => {
                let _ = writeln!(out, "{:>8}  navigate {}", format_clock(at), self.home_route);
            }
            None => out.push_str("tour did not complete\n"),
        }
        out
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn format_clock(ms: u64) -> String {
    format!("{}:{:02}.{}", ms / 60_000, (ms / 1_000) % 60, (ms % 1_000) / 100)
}
