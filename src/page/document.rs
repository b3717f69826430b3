use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tour::catalog::{ADVANTAGES_SECTION, Catalog, SCANNER_SECTION, WORKFLOW_SECTION};
use crate::ui::wrap_text;

use super::layout::{
    CARD_HEIGHT, DIAGRAM_HEIGHT, DIAGRAM_MARGIN, FOOTER_SECTION, HERO_SECTION, PageLayout,
    SectionSpan,
};

/// Which page elements the tour currently draws attention to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Emphasis {
    pub(crate) hotspot: Option<usize>,
    pub(crate) card: Option<usize>,
    pub(crate) advantage: Option<usize>,
}

/// Renders the whole page; one line per document row of `layout`.
pub(crate) fn render_document(
    catalog: &Catalog,
    layout: &PageLayout,
    emphasis: Emphasis,
) -> Vec<Line<'static>> {
    let width = usize::from(layout.width());
    let mut lines = Vec::with_capacity(usize::from(layout.total_height()));
    for section in layout.sections() {
        let mut rows = match section.id {
            HERO_SECTION => hero_rows(catalog, width),
            SCANNER_SECTION => scanner_rows(layout, emphasis, width),
            WORKFLOW_SECTION => workflow_rows(catalog, emphasis, width),
            ADVANTAGES_SECTION => advantage_rows(catalog, emphasis),
            FOOTER_SECTION => footer_rows(catalog),
            _ => Vec::new(),
        };
        fit_rows(&mut rows, section);
        lines.extend(rows);
    }
    lines
}

fn fit_rows(rows: &mut Vec<Line<'static>>, section: &SectionSpan) {
    rows.resize(usize::from(section.height), Line::default());
}

fn heading(title: &str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ]
}

fn hero_rows(catalog: &Catalog, width: usize) -> Vec<Line<'static>> {
    let rule = "═".repeat(width.saturating_sub(4));
    vec![
        Line::default(),
        Line::from(format!("  {rule}")),
        Line::from(Span::styled(
            format!("  {}", catalog.title.to_uppercase()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Intraoperative specimen imaging, step by step.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(format!("  {rule}")),
        Line::default(),
    ]
}

fn scanner_rows(layout: &PageLayout, emphasis: Emphasis, width: usize) -> Vec<Line<'static>> {
    let mut rows: Vec<Line<'static>> = heading("The scanner").into();
    let Some(section) = layout.section(SCANNER_SECTION) else {
        return rows;
    };
    let body_top = section.body_top();
    let left = usize::from(DIAGRAM_MARGIN);
    let right = width.saturating_sub(left + 1).max(left + 1);

    for offset in 0..DIAGRAM_HEIGHT {
        let row = body_top + offset;
        let mut cells: Vec<char> = vec![' '; width.max(right + 1)];
        let (edge, fill) = if offset == 0 {
            (('┌', '┐'), '─')
        } else if offset == DIAGRAM_HEIGHT - 1 {
            (('└', '┘'), '─')
        } else {
            (('│', '│'), ' ')
        };
        cells[left] = edge.0;
        cells[right] = edge.1;
        for cell in cells.iter_mut().take(right).skip(left + 1) {
            *cell = fill;
        }

        let markers: Vec<(usize, usize)> = layout
            .markers()
            .iter()
            .enumerate()
            .filter(|(_, (_, marker_row))| *marker_row == row)
            .map(|(index, (column, _))| (index, usize::from(*column)))
            .collect();
        rows.push(diagram_line(cells, &markers, emphasis.hotspot));
    }
    rows
}

fn diagram_line(cells: Vec<char>, markers: &[(usize, usize)], active: Option<usize>) -> Line<'static> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    for (column, ch) in cells.into_iter().enumerate() {
        let Some(&(index, _)) = markers.iter().find(|(_, at)| *at == column) else {
            plain.push(ch);
            continue;
        };
        if !plain.is_empty() {
            spans.push(Span::raw(std::mem::take(&mut plain)));
        }
        let style = if active == Some(index) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };
        let label = char::from_digit((index as u32 + 1) % 10, 10).unwrap_or('*');
        spans.push(Span::styled(label.to_string(), style));
    }
    if !plain.is_empty() {
        spans.push(Span::raw(plain));
    }
    Line::from(spans)
}

fn workflow_rows(catalog: &Catalog, emphasis: Emphasis, width: usize) -> Vec<Line<'static>> {
    let mut rows: Vec<Line<'static>> = heading("How it works").into();
    let text_width = width.saturating_sub(8);
    for (index, stage) in catalog.workflow.iter().enumerate() {
        let active = emphasis.card == Some(index);
        let title_style = if active {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let marker = if active { "▶ " } else { "  " };
        let mut title = vec![
            Span::raw(format!("  {marker}")),
            Span::styled(format!("{}. {}", index + 1, stage.title), title_style),
        ];
        if !stage.time.is_empty() {
            title.push(Span::styled(
                format!("  ({})", stage.time),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let description = wrap_text(&stage.description, text_width)
            .into_iter()
            .next()
            .unwrap_or_default();
        let tags = stage
            .tags
            .iter()
            .map(|tag| format!("[{tag}]"))
            .collect::<Vec<_>>()
            .join(" ");
        let mut card = vec![
            Line::from(title),
            Line::from(format!("      {description}")),
            Line::from(Span::styled(
                format!("      {tags}"),
                Style::default().fg(Color::Magenta),
            )),
            Line::default(),
            Line::default(),
        ];
        card.truncate(usize::from(CARD_HEIGHT));
        rows.extend(card);
    }
    rows
}

fn advantage_rows(catalog: &Catalog, emphasis: Emphasis) -> Vec<Line<'static>> {
    let mut rows: Vec<Line<'static>> = heading(&catalog.finale.title).into();
    for (index, highlight) in catalog.finale.highlights.iter().enumerate() {
        let line = if emphasis.advantage == Some(index) {
            Line::from(Span::styled(
                format!("  ★ {highlight}"),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ))
        } else {
            Line::from(format!("  ✓ {highlight}"))
        };
        rows.push(line);
    }
    rows
}

fn footer_rows(catalog: &Catalog) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {} | contact sales for a demo", catalog.title),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ]
}
