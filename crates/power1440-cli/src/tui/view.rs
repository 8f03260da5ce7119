use power1440_core::chart::value_label;
use power1440_core::Zone;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, Focus};
use super::pie::{to_color, PieChart};

const FOCUSED_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_BORDER_COLOR: Color = Color::DarkGray;
const TAGLINE: &str = "Own your minutes, own your life";

fn panel(title: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        FOCUSED_BORDER_COLOR
    } else {
        INACTIVE_BORDER_COLOR
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "1440 Power System™",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(body[0]);

    render_zone_inputs(frame, left[0], app);
    render_task_form(frame, left[1], app);
    render_task_list(frame, left[2], app);
    render_readouts(frame, left[3], app);
    render_chart(frame, body[1], app);
    render_footer(frame, layout[2], app);

    if let Some(notice) = &app.notice {
        render_notice(frame, notice);
    }
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(FOCUSED_BORDER_COLOR)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::raw(label),
        Span::styled(format!(" {value}{cursor} "), value_style),
    ])
}

fn render_zone_inputs(frame: &mut Frame, area: Rect, app: &App) {
    let focused_zone = match app.focus {
        Focus::Zone(zone) => Some(zone),
        _ => None,
    };
    let labels = ["Sleep (minutes):      ", "Livelihood (minutes): ", "OnTime (minutes):     "];
    let lines: Vec<Line> = Zone::ALL
        .iter()
        .zip(labels)
        .map(|(zone, label)| field_line(label, app.zone_input(*zone), focused_zone == Some(*zone)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(panel("Allocation", focused_zone.is_some())),
        area,
    );
}

fn render_task_form(frame: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.focus, Focus::TaskName | Focus::TaskDuration);
    let lines = vec![
        field_line("Task name: ", &app.name_input, app.focus == Focus::TaskName),
        field_line("Duration:  ", &app.duration_input, app.focus == Focus::TaskDuration),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(panel("Add Task (Enter)", focused)),
        area,
    );
}

fn render_task_list(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::TaskList;
    let items: Vec<ListItem> = app
        .planner
        .tasks()
        .iter()
        .map(|task| ListItem::new(format!("{} - {} min", task.name, task.duration)))
        .collect();
    let list = List::new(items)
        .block(panel("On-Time Tasks  [r] reset  [x] remove", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused && !app.planner.tasks().is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_readouts(frame: &mut Frame, area: Rect, app: &App) {
    let remaining = app.planner.remaining_on_time();
    let remaining_style = if remaining < 0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let today = app
        .planner
        .remaining_minutes_today()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "--".to_string());
    let lines = vec![
        Line::from(Span::styled(
            format!("Remaining On-Time: {remaining} minutes"),
            remaining_style,
        )),
        Line::from(Span::styled(
            format!("Minutes remaining today: {today}"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Today", false)), area);
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let segments = app.planner.segments();
    let legend_height = if app.show_legend { 6 } else { 0 };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(legend_height)])
        .split(area);

    frame.render_widget(
        PieChart::new(&segments, value_label).block(panel("Day", false)),
        parts[0],
    );

    if app.show_legend {
        let lines: Vec<Line> = segments
            .iter()
            .map(|seg| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(to_color(seg.color))),
                    Span::raw(format!("{:<20} {:>5}", seg.label, seg.minutes)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(panel("Legend", false)), parts[1]);
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = "Tab/Shift-Tab move  Enter apply  ↑/↓ ±5 min  Esc quit";
    let status = app.status.as_deref().unwrap_or(TAGLINE);
    let lines = vec![
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(status, Style::default().fg(Color::Cyan))),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_notice(frame: &mut Frame, notice: &str) {
    let area = centered_rect(52, 6, frame.area());
    frame.render_widget(Clear, area);
    let body = vec![
        Line::from(notice),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title("Notice"),
            ),
        area,
    );
}
