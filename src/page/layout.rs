use crate::tour::TargetRef;
use crate::tour::catalog::{ADVANTAGES_SECTION, Catalog, SCANNER_SECTION, WORKFLOW_SECTION};

pub(crate) const HERO_SECTION: &str = "hero";
pub(crate) const FOOTER_SECTION: &str = "footer";

const HERO_HEIGHT: u16 = 6;
const SECTION_HEADER_HEIGHT: u16 = 2;
pub(crate) const DIAGRAM_HEIGHT: u16 = 14;
pub(crate) const CARD_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 3;
/// Left and right margin of the diagram box.
pub(crate) const DIAGRAM_MARGIN: u16 = 4;

/// A section of the page, in document rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub id: &'static str,
    pub top: u16,
    pub height: u16,
}

impl SectionSpan {
    pub fn contains(&self, row: u16) -> bool {
        row >= self.top && row < self.top + self.height
    }

    /// First row below the section title.
    pub fn body_top(&self) -> u16 {
        self.top + SECTION_HEADER_HEIGHT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Hotspot(usize),
    Card(usize),
}

/// Row geometry of the product page for a given terminal width.
///
/// The page is one tall document: hero, scanner diagram, workflow cards, advantages, footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    width: u16,
    sections: Vec<SectionSpan>,
    markers: Vec<(u16, u16)>,
    card_count: usize,
    total_height: u16,
}

impl PageLayout {
    pub fn build(catalog: &Catalog, width: u16) -> Self {
        let card_count = catalog.workflow.len();
        let heights = [
            (HERO_SECTION, HERO_HEIGHT),
            (SCANNER_SECTION, SECTION_HEADER_HEIGHT + DIAGRAM_HEIGHT + 1),
            (
                WORKFLOW_SECTION,
                SECTION_HEADER_HEIGHT + CARD_HEIGHT.saturating_mul(card_count as u16),
            ),
            (
                ADVANTAGES_SECTION,
                SECTION_HEADER_HEIGHT + (catalog.finale.highlights.len() as u16) + 1,
            ),
            (FOOTER_SECTION, FOOTER_HEIGHT),
        ];

        let mut sections = Vec::with_capacity(heights.len());
        let mut top = 0u16;
        for (id, height) in heights {
            sections.push(SectionSpan { id, top, height });
            top = top.saturating_add(height);
        }

        let mut layout = Self {
            width,
            sections,
            markers: Vec::new(),
            card_count,
            total_height: top,
        };
        layout.markers = catalog
            .hotspots
            .iter()
            .map(|hotspot| layout.diagram_cell(hotspot.x, hotspot.y))
            .collect();
        layout
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn total_height(&self) -> u16 {
        self.total_height
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionSpan> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Largest scroll offset that still fills a viewport of `viewport_height` rows.
    pub fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.total_height.saturating_sub(viewport_height)
    }

    /// `(column, row)` of a point given in percent of the diagram box.
    pub fn diagram_cell(&self, x: f32, y: f32) -> (u16, u16) {
        let inner_width = self.width.saturating_sub(DIAGRAM_MARGIN * 2 + 2).max(1);
        let column = DIAGRAM_MARGIN
            + 1
            + scale_percent(x, inner_width.saturating_sub(1));
        let scanner_top = self
            .section(SCANNER_SECTION)
            .map_or(0, SectionSpan::body_top);
        let row = scanner_top + 1 + scale_percent(y, DIAGRAM_HEIGHT.saturating_sub(3));
        (column, row)
    }

    pub fn marker(&self, index: usize) -> Option<(u16, u16)> {
        self.markers.get(index).copied()
    }

    pub fn markers(&self) -> &[(u16, u16)] {
        &self.markers
    }

    pub fn card_top(&self, index: usize) -> Option<u16> {
        if index >= self.card_count {
            return None;
        }
        let workflow = self.section(WORKFLOW_SECTION)?;
        Some(workflow.body_top() + CARD_HEIGHT * index as u16)
    }

    /// Scroll offset that brings `target` into a viewport of `viewport_height` rows.
    ///
    /// Sections are aligned to the top; diagram points are centered.
    pub fn locate(&self, target: &TargetRef, viewport_height: u16) -> Option<f64> {
        let section = self.section(target.section_id())?;
        let row = match target {
            TargetRef::Section { .. } => section.top,
            TargetRef::DiagramPoint { x, y, .. } => {
                let (_, row) = self.diagram_cell(*x, *y);
                row.saturating_sub(viewport_height / 2)
            }
        };
        Some(f64::from(row))
    }

    /// What sits at document cell `(column, row)`.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        let marker = self.markers.iter().position(|&(marker_col, marker_row)| {
            row == marker_row
                && column.saturating_add(1) >= marker_col
                && column <= marker_col.saturating_add(1)
        });
        if let Some(index) = marker {
            return Some(HitTarget::Hotspot(index));
        }

        (0..self.card_count).find_map(|index| {
            let top = self.card_top(index)?;
            (row >= top && row < top + CARD_HEIGHT - 1).then_some(HitTarget::Card(index))
        })
    }
}

fn scale_percent(percent: f32, span: u16) -> u16 {
    let fraction = (percent.clamp(0.0, 100.0) / 100.0) as f64;
    (fraction * f64::from(span)).round() as u16
}
