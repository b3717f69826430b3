use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::TourConfig;

use super::step::{StepKind, TourStep};

const MS_PER_TEN_GRAPHEMES: u64 = 100;
const MS_PER_TAG: u64 = 1_000;

/// How long a step stays on screen before the tour moves on.
pub fn dwell_for(step: &TourStep, config: &TourConfig) -> Duration {
    match step.kind {
        StepKind::Hotspot => step.base_dwell,
        StepKind::WorkflowReveal => workflow_dwell(step, config),
        StepKind::Finale => Duration::ZERO,
    }
}

/// `clamp(base + len/10*100 + tags*1000, min, max)`, with length in grapheme clusters.
pub fn workflow_dwell(step: &TourStep, config: &TourConfig) -> Duration {
    let content_len = step.content.body.graphemes(true).count() as u64;
    let tag_count = step.content.tags.len() as u64;
    let base_ms = u64::try_from(step.base_dwell.as_millis()).unwrap_or(u64::MAX);
    let raw_ms = base_ms
        .saturating_add((content_len / 10).saturating_mul(MS_PER_TEN_GRAPHEMES))
        .saturating_add(tag_count.saturating_mul(MS_PER_TAG));
    let max_ms = config.workflow_max_dwell_ms.max(config.workflow_min_dwell_ms);
    Duration::from_millis(raw_ms.clamp(config.workflow_min_dwell_ms, max_ms))
}
