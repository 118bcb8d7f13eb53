//! Rendering of a [`Snapshot`].
//!
//! Stateless: every frame is drawn from the snapshot and the user config
//! alone, so the renderer can never disagree with the state machine.

use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Tabs},
};

use crate::config::{Theme, UserConfig};

use super::machine::{InteractionState, Snapshot};

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub running: Color,
    pub gauge: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                running: Color::Green,
                gauge: Color::Magenta,
            },
            Theme::Light => Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                running: Color::Green,
                gauge: Color::Blue,
            },
        }
    }
}

/// Fraction of the productivity cap covered by `elapsed`, clamped to 1.
pub fn productivity_ratio(elapsed: Duration, max_hours: u8) -> f64 {
    let cap = f64::from(max_hours.max(1)) * 3600.0;
    (elapsed.as_secs_f64() / cap).clamp(0.0, 1.0)
}

/// Whether the running indicator is lit this frame.
fn indicator_lit(snapshot: &Snapshot, animations: bool) -> bool {
    snapshot.running && (!animations || snapshot.elapsed.as_secs() % 2 == 0)
}

/// Task color names are whatever the user typed; unknown ones render plain.
fn task_color(name: &str, fallback: Color) -> Color {
    name.parse::<Color>().unwrap_or(fallback)
}

/// Draw one frame.
pub fn render(frame: &mut Frame, snapshot: &Snapshot, config: &UserConfig) {
    let palette = Palette::for_theme(config.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Task tabs
            Constraint::Min(6),    // Timer
            Constraint::Length(3), // Input or confirmation
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], snapshot, &palette);
    render_timer(frame, chunks[1], snapshot, config, &palette);
    render_prompt(frame, chunks[2], snapshot, &palette);

    if let Some(status) = &snapshot.status {
        let line = Paragraph::new(format!(" {}", status.display()))
            .style(Style::default().fg(status.level.color()));
        frame.render_widget(line, chunks[3]);
    }

    let help =
        Paragraph::new(format!(" {}", snapshot.help)).style(Style::default().fg(palette.muted));
    frame.render_widget(help, chunks[4]);
}

fn render_tabs(frame: &mut Frame, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tasks ")
        .border_style(Style::default().fg(palette.muted));

    if snapshot.tabs.is_empty() {
        let empty = Paragraph::new(" No tasks yet")
            .style(Style::default().fg(palette.muted))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let titles: Vec<Line> = snapshot
        .tabs
        .iter()
        .map(|tab| {
            Line::from(Span::styled(
                tab.name.clone(),
                Style::default().fg(task_color(&tab.color, palette.text)),
            ))
        })
        .collect();
    let selected = snapshot.tabs.iter().position(|tab| tab.active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .divider(Span::styled("│", Style::default().fg(palette.muted)));
    frame.render_widget(tabs, area);
}

fn render_timer(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    config: &UserConfig,
    palette: &Palette,
) {
    let title = match snapshot.timer_label.as_str() {
        "" => " Timer ".to_string(),
        label => format!(" {} ", label),
    };
    let border_color = if snapshot.running {
        palette.running
    } else {
        palette.muted
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Elapsed
            Constraint::Length(1), // Gauge
        ])
        .split(inner);

    let indicator = if indicator_lit(snapshot, config.enable_animations) {
        Span::styled("● ", Style::default().fg(palette.running))
    } else {
        Span::raw("  ")
    };
    let elapsed = Paragraph::new(Line::from(vec![
        indicator,
        Span::styled(
            snapshot.elapsed_display(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(elapsed, rows[0]);

    let ratio = productivity_ratio(snapshot.elapsed, config.max_productivity_hours);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.gauge))
        .ratio(ratio)
        .label(format!(
            "{:.0}% of {}h",
            ratio * 100.0,
            config.max_productivity_hours
        ));
    frame.render_widget(gauge, rows[1]);
}

fn render_prompt(frame: &mut Frame, area: Rect, snapshot: &Snapshot, palette: &Palette) {
    let widget = match (snapshot.state, &snapshot.input, snapshot.prompt) {
        (InteractionState::Typing, Some(input), _) => Paragraph::new(format!(" {}▏", input))
            .style(Style::default().fg(palette.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" New task ")
                    .border_style(Style::default().fg(palette.accent)),
            ),
        (InteractionState::Confirming, _, Some(prompt)) => {
            Paragraph::new(format!(" {}", prompt))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Confirm ")
                        .border_style(Style::default().fg(Color::Yellow)),
                )
        }
        _ => return,
    };
    frame.render_widget(widget, area);
}
