use crate::app::{App, Phase, ViewId};
use pitchsight_domain::services::validation::FormField;
use pitchsight_domain::services::zone_map::{heat_color, CellView, CornerPos, ZonePlacement};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(8),
            ]
            .as_ref(),
        )
        .split(size);

    draw_top_banner(frame, outer[0], app);

    match app.active_view {
        ViewId::Predict => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(30), Constraint::Length(38)].as_ref())
                .split(outer[1]);
            draw_heatmap(frame, body[0], app);
            draw_side_panel(frame, body[1], app);
        }
        ViewId::History => draw_history(frame, outer[1], app),
    }

    draw_logs(frame, outer[2], app);

    if app.phase == Phase::Editing {
        draw_form_modal(frame, size, app);
    }
}

fn draw_top_banner(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match app.phase {
        Phase::Submitting => (
            format!("PREDICTING {}", SPINNER_FRAMES[app.spinner]),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Phase::Failed => (
            "PREDICTION FAILED".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        _ => (String::new(), Style::default()),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center),
        area,
    );
}

/// Terminal cells have no alpha channel, so the rgba alpha is folded into
/// the color by scaling each channel toward black.
fn cell_background(intensity: f64) -> Color {
    let (red, green, blue, alpha) = heat_color(intensity);
    Color::Rgb(
        (red as f64 * alpha) as u8,
        (green as f64 * alpha) as u8,
        (blue as f64 * alpha) as u8,
    )
}

fn draw_zone_cell(frame: &mut Frame, area: Rect, cell: &CellView) {
    let mut block = Block::default().borders(Borders::ALL);
    if cell.is_predicted {
        block = block.border_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    }
    let style = Style::default().bg(cell_background(cell.color_intensity));
    let text = vec![
        Line::from(Span::styled(
            format!("{}", cell.display_label),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{:.1}%", cell.probability * 100.0)),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(style)
            .block(block),
        area,
    );
}

fn draw_heatmap(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title("Strike Zone (catcher's view)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(view) = &app.view else {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from("No prediction yet."),
                Line::from("Press e or Enter to edit the game situation."),
            ])
            .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    // Three grid rows plus a strip for the corner wedges below.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ]
            .as_ref(),
        )
        .split(inner);

    let grid_rows: Vec<_> = (0..3)
        .map(|r| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(
                    [
                        Constraint::Ratio(1, 3),
                        Constraint::Ratio(1, 3),
                        Constraint::Ratio(1, 3),
                    ]
                    .as_ref(),
                )
                .split(rows[r])
        })
        .collect();

    let corner_strip = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ]
            .as_ref(),
        )
        .split(rows[3]);

    for cell in &view.cells {
        let target = match cell.placement {
            ZonePlacement::Grid { row, col } => grid_rows[row as usize][col as usize],
            ZonePlacement::Corner(pos) => {
                let idx = match pos {
                    CornerPos::TopLeft => 0,
                    CornerPos::TopRight => 1,
                    CornerPos::BottomLeft => 2,
                    CornerPos::BottomRight => 3,
                };
                corner_strip[idx]
            }
        };
        draw_zone_cell(frame, target, cell);
    }
}

fn draw_side_panel(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(6)].as_ref())
        .split(area);

    draw_game_state(frame, chunks[0], app);
    draw_top_pitches(frame, chunks[1], app);
}

fn draw_game_state(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.committed_state;
    let mut lines = vec![
        Line::from(format!("inning:      {}", state.inning)),
        Line::from(format!(
            "count:       {}-{}  outs: {}",
            state.balls, state.strikes, state.outs_when_up
        )),
        Line::from(format!(
            "score:       bat {} / field {}",
            state.batting_score, state.fielding_score
        )),
        Line::from(format!("batter:      {}", state.stand.label())),
        Line::from(""),
        Line::from("e edit  s save  h history  q quit"),
    ];
    if let Some(err) = &app.last_error {
        lines.push(Line::from(Span::styled(
            format!("error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(info) = &app.info_message {
        lines.push(Line::from(Span::styled(
            format!("info: {info}"),
            Style::default().fg(Color::Green),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().title("Game Situation").borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_top_pitches(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = match &app.view {
        Some(view) => view
            .top_pitches
            .iter()
            .map(|pitch| {
                let style = if pitch.rank == 1 {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "{}. {:<16} {:>5.1}%",
                        pitch.rank,
                        pitch.label,
                        pitch.probability * 100.0
                    ),
                    style,
                )))
            })
            .collect(),
        None => vec![ListItem::new(Line::from("no prediction yet"))],
    };

    frame.render_widget(
        List::new(items).block(Block::default().title("Likely Pitches").borders(Borders::ALL)),
        area,
    );
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = if app.history_loading {
        vec![ListItem::new(Line::from("loading..."))]
    } else if app.history.is_empty() {
        vec![ListItem::new(Line::from(
            "no saved pitches (g refreshes, Esc goes back)",
        ))]
    } else {
        app.history
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let state = &record.state;
                let mut style = Style::default();
                if idx == app.history_selected {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                }
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "#{:<5} inning {:>2}  count {}-{}  outs {}  score {}-{}  {}",
                        record.id,
                        state.inning,
                        state.balls,
                        state.strikes,
                        state.outs_when_up,
                        state.batting_score,
                        state.fielding_score,
                        state.stand.label()
                    ),
                    style,
                )))
            })
            .collect()
    };

    frame.render_widget(
        List::new(items).block(
            Block::default()
                .title("Pitch History (e edit, d delete, g refresh)")
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn draw_form_modal(frame: &mut Frame, size: Rect, app: &App) {
    let area = centered_rect(44, 13, size);
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let input = app.form.input(field);
        let marker = if field == app.form.selected { ">" } else { " " };
        let mut style = Style::default();
        if field == app.form.selected {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        let mut spans = vec![Span::styled(
            format!("{marker} {:<12} {}", field.label(), input.value),
            style,
        )];
        if let Some(err) = app.form.errors.get(&field) {
            spans.push(Span::styled(
                format!("  {err}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Tab/↓ next  ↑ prev  Enter submit  Esc cancel"));

    let title = match app.form.editing_record {
        Some(id) => format!("Edit Pitch #{id}"),
        None => "Game Situation".to_string(),
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn centered_rect(width: u16, height: u16, size: Rect) -> Rect {
    let width = width.min(size.width);
    let height = height.min(size.height);
    Rect {
        x: size.x + (size.width.saturating_sub(width)) / 2,
        y: size.y + (size.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn draw_logs(frame: &mut Frame, area: Rect, app: &App) {
    let lines = app.logs.lock().snapshot();
    let visible = area.height.saturating_sub(2) as usize;
    let end = lines.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible);
    let shown: Vec<Line> = lines[start..end]
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect();

    frame.render_widget(
        Paragraph::new(shown).block(
            Block::default()
                .title("Logs (PgUp/PgDn scroll)")
                .borders(Borders::ALL),
        ),
        area,
    );
}
