//! Heat-map rendering.
//!
//! ┌ prngscope ─────────────────────────────────────┐
//! ├ Binary Sequence LCG ─────┬ Binary Sequence Mer…┤
//! │ ████  ██████  ██         │ ██  ████    ██████   │
//! │ ██████    ████████       │ ████  ██  ██  ████   │
//! ├ 8x8 · 62 bits · 2 pad ───┴ 9x9 · 80 bits · 1 pad┤
//! │  q / Esc: quit                                  │
//! └─────────────────────────────────────────────────┘

use super::app::{App, Panel};
use prngscope_core::HeatmapGrid;
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(5),    // grids
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0]);
    draw_panels(f, rows[1], app);
    draw_keys(f, rows[2]);
}

fn draw_title(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" prngscope ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                " bit density, 1 = dark ",
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    f.render_widget(block, area);
}

fn draw_panels(f: &mut Frame, area: Rect, app: &App) {
    let panels = app.panels();
    if panels.is_empty() {
        return;
    }
    let share = 100 / panels.len() as u16;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(share); panels.len()])
        .split(area);
    for (panel, col) in panels.iter().zip(cols.iter()) {
        draw_panel(f, *col, panel);
    }
}

fn draw_panel(f: &mut Frame, area: Rect, panel: &Panel) {
    let grid = &panel.grid;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", panel.title),
            Style::default().bold(),
        ))
        .title_bottom(Span::styled(
            format!(
                " {side}x{side} · {} bits · {} pad ",
                grid.cells().len() - grid.padding(),
                grid.padding(),
                side = grid.side()
            ),
            Style::default().fg(Color::DarkGray),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if grid.side() == 0 {
        f.render_widget(
            Paragraph::new("empty stream").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }
    let lines = grid_lines(grid, inner.width as usize, inner.height as usize);
    f.render_widget(Paragraph::new(lines), inner);
}

/// Grey level for a density in `[0, 1]`; 0 is white and 1 is black.
fn grey(density: f64) -> Color {
    let level = (255.0 * (1.0 - density.clamp(0.0, 1.0))).round() as u8;
    Color::Rgb(level, level, level)
}

/// Square block of lines fitting `width x height` cells. Each grid column is
/// two characters wide so the map stays roughly square.
fn grid_lines(grid: &HeatmapGrid, width: usize, height: usize) -> Vec<Line<'static>> {
    let n = height.min(width / 2);
    grid.downsample(n, n)
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|d| Span::styled("██", Style::default().fg(grey(d))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(vec![
        Span::styled("  q", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" / "),
        Span::styled("Esc", Style::default().bold().fg(Color::Cyan)),
        Span::styled(": quit", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(keys), area);
}
