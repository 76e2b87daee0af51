//! TUI rendering using ratatui.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use accordion_core::chart::{GanttData, GanttNode};
use accordion_core::schedule::calendar::add_days;

use super::app::{App, InputMode, Level, Panel, View};

const LABEL_WIDTH: u16 = 30;

/// Render the current view.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.current_view {
        View::Planner => render_planner(f, app, chunks[0]),
        View::Help => render_help(f, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

fn render_planner(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(6)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_selector(f, app, top[0]);
    render_assets(f, app, top[1]);
    render_timeline(f, app, rows[1]);
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn render_selector(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Selector;
    let block = panel_block(" Add Asset (Enter) ".to_string(), focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(34),
            Constraint::Percentage(38),
        ])
        .split(inner);

    let levels = [
        (Level::Category, "Category", app.categories(), app.selected_category),
        (Level::Platform, "Platform", app.platforms(), app.selected_platform),
        (Level::Asset, "Asset", app.assets(), app.selected_asset),
    ];

    for ((level, title, items, selected), col) in levels.into_iter().zip(columns.iter()) {
        let active = focused && app.level == level;
        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(items.iter().enumerate().map(|(i, item)| {
            let style = match (i == selected, active) {
                (true, true) => Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::Gray),
            };
            Line::from(Span::styled(format!(" {item}"), style))
        }));
        f.render_widget(Paragraph::new(lines), *col);
    }
}

fn render_assets(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Assets;
    let header_cells = ["Asset", "Platform", "Category", "Date"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = app.selected_assets().iter().enumerate().map(|(i, asset)| {
        let date_cell = match &app.input_mode {
            InputMode::EditingDate { id, buffer } if *id == asset.id => Cell::from(Span::styled(
                format!("{buffer}_"),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            )),
            _ => match asset.anchor_date {
                Some(d) => Cell::from(d.to_string()),
                None => Cell::from(Span::styled("-", Style::default().fg(Color::DarkGray))),
            },
        };

        let style = if focused && i == app.selected_row {
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(asset.asset_name.clone()),
            Cell::from(asset.platform.clone()),
            Cell::from(asset.category.clone()),
            date_cell,
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(panel_block(
        format!(" Assets ({}) ", app.selected_assets().len()),
        focused,
    ));

    f.render_widget(table, area);
}

fn render_timeline(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Timeline;
    let title = match &app.campaign_name {
        Some(name) => format!(" Timeline: {name} "),
        None => " Timeline ".to_string(),
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let state = app.store.state();
    if !state.timeline_visible {
        let hint = Paragraph::new("Set dates on your assets, then press g to generate the timeline.")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, inner);
        return;
    }

    let banner_height = if state.conflicts.is_empty() {
        0
    } else {
        state.conflicts.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(banner_height), Constraint::Min(1)])
        .split(inner);

    if !state.conflicts.is_empty() {
        let mut lines = vec![Line::from(Span::styled(
            "Scheduling conflicts",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(state.conflicts.iter().map(|c| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", c.asset_label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(c.message.clone()),
            ])
        }));
        let banner = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(banner, chunks[0]);
    }

    f.render_widget(Paragraph::new(gantt_lines(app.gantt(), chunks[1].width)), chunks[1]);
}

/// Horizontal extent of the chart: first start date and last end date.
fn chart_range(data: &GanttData) -> Option<(NaiveDate, NaiveDate)> {
    let spans: Vec<(NaiveDate, NaiveDate)> = data
        .task_nodes()
        .filter_map(|n| {
            let start = n.start_date?;
            let days = i64::from(n.duration.unwrap_or(1).max(1));
            Some((start, add_days(start, days - 1)?))
        })
        .collect();
    let first = spans.iter().map(|s| s.0).min()?;
    let last = spans.iter().map(|s| s.1).max()?;
    Some((first, last))
}

/// One line per chart node, with task bars scaled to fit `width`.
pub fn gantt_lines(data: &GanttData, width: u16) -> Vec<Line<'static>> {
    if data.data.is_empty() {
        return vec![Line::from(Span::styled(
            "No assets selected.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let label_width = usize::from(LABEL_WIDTH);
    let bar_width = usize::from(width.saturating_sub(LABEL_WIDTH + 1)).max(1);
    let range = chart_range(data);
    let days_per_col = range
        .map(|(first, last)| {
            let total = usize::try_from((last - first).num_days() + 1).unwrap_or(usize::MAX);
            total.div_ceil(bar_width).max(1)
        })
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(data.data.len() + 1);
    if let Some((first, last)) = range {
        lines.push(Line::from(Span::styled(
            format!("{:<label_width$} {first} .. {last} ({days_per_col} day/col)", ""),
            Style::default().fg(Color::DarkGray),
        )));
    }

    for node in &data.data {
        lines.push(gantt_line(node, range, days_per_col, label_width));
    }
    lines
}

fn gantt_line(
    node: &GanttNode,
    range: Option<(NaiveDate, NaiveDate)>,
    days_per_col: usize,
    label_width: usize,
) -> Line<'static> {
    if node.is_project() {
        return Line::from(Span::styled(
            truncate(&node.text, label_width),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let label = format!("{:<label_width$}", truncate(&format!("  {}", node.text), label_width));
    let (Some((first, _)), Some(start)) = (range, node.start_date) else {
        return Line::from(label);
    };

    let offset = (start - first).num_days().max(0) as usize / days_per_col;
    let duration = node.duration.unwrap_or(1).max(1) as usize;
    let len = duration.div_ceil(days_per_col).max(1);

    Line::from(vec![
        Span::raw(label),
        Span::raw(" ".repeat(offset + 1)),
        Span::styled("█".repeat(len), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" {start}"),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = |s: &'static str| {
        Line::from(Span::styled(
            s,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let text = vec![
        Line::from(""),
        heading("  Navigation"),
        Line::from("    Tab         Cycle panels (selector / assets / timeline)"),
        Line::from("    j/Down      Move down"),
        Line::from("    k/Up        Move up"),
        Line::from("    h/l         Selector: previous / next level"),
        Line::from("    Esc/q       Back / Quit"),
        Line::from(""),
        heading("  Assets"),
        Line::from("    Enter/a     Selector: add the chosen asset"),
        Line::from("    Enter/d     Assets: edit date (YYYY-MM-DD, empty clears)"),
        Line::from("    x/Delete    Assets: remove asset"),
        Line::from(""),
        heading("  Timeline"),
        Line::from("    g           Generate timeline"),
        Line::from("    m           Toggle anchor mode"),
        Line::from("    e           Export to spreadsheet"),
        Line::from(""),
        heading("  Other"),
        Line::from("    ?           Show this help"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let view_name = match (&app.current_view, &app.input_mode) {
        (View::Help, _) => "Help",
        (_, InputMode::EditingDate { .. }) => "Edit Date",
        (View::Planner, InputMode::Normal) => "Planner",
    };

    let state = app.store.state();
    let conflicts = state.conflicts.len();
    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw(format!("  {}  today {}  ", app.store.mode(), app.store.today())),
        if conflicts > 0 {
            Span::styled(
                format!("{conflicts} conflict(s)"),
                Style::default().fg(Color::Red),
            )
        } else {
            Span::styled("no conflicts", Style::default().fg(Color::DarkGray))
        },
        Span::raw("  "),
        Span::styled(status_msg.to_string(), Style::default().fg(Color::Green)),
        Span::raw("  g:generate  e:export  q:quit  ?:help"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accordion_core::chart::build_gantt_data;
    use accordion_test_utils::{date, full_page, store};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn empty_chart_has_placeholder() {
        let lines = gantt_lines(&GanttData::default(), 80);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "No assets selected.");
    }

    #[test]
    fn bars_are_offset_by_start_day() {
        let mut store = store();
        let id = store.add_asset(full_page());
        store.set_anchor_date(id, Some(date(2026, 10, 19)));
        let data = build_gantt_data(&store.generate_schedule().selected_assets).unwrap();

        // Wide enough for one column per day.
        let lines = gantt_lines(&data, 120);
        // Range header, project row, four task rows.
        assert_eq!(lines.len(), 6);
        assert_eq!(line_text(&lines[1]), "Full Page (Daily Mail)");

        let brief = line_text(&lines[2]);
        let content = line_text(&lines[3]);
        assert!(brief.contains("███"), "{brief}");
        assert!(content.contains("█████"), "{content}");
        let brief_bar = brief.find('█').unwrap();
        let content_bar = content.find('█').unwrap();
        assert!(content_bar > brief_bar);
    }

    #[test]
    fn narrow_chart_scales_days() {
        let mut store = store();
        let id = store.add_asset(full_page());
        store.set_anchor_date(id, Some(date(2026, 10, 19)));
        let data = build_gantt_data(&store.generate_schedule().selected_assets).unwrap();

        // 11-day span into 5 columns: 3 days per column.
        let lines = gantt_lines(&data, LABEL_WIDTH + 1 + 5);
        assert!(line_text(&lines[0]).contains("(3 day/col)"));
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long asset name", 10), "a very ...");
    }
}
