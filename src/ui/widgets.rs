//! Custom TUI widgets

use super::ThemeColors;
use crate::shortcuts::Shortcut;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The elapsed time, large and centered
pub struct TimerPanel<'a> {
    caption: &'a str,
    running: bool,
    colors: ThemeColors,
}

impl<'a> TimerPanel<'a> {
    pub fn new(caption: &'a str, running: bool, colors: ThemeColors) -> Self {
        Self {
            caption,
            running,
            colors,
        }
    }
}

impl<'a> Widget for TimerPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Stopwatch ")
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);

        let color = if self.running {
            self.colors.running
        } else {
            self.colors.stopped
        };

        // Vertically center the single line
        let y = inner.y + inner.height.saturating_sub(1) / 2;
        let line_area = Rect::new(inner.x, y, inner.width, inner.height.min(1));

        Paragraph::new(Line::from(Span::styled(
            self.caption,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(line_area, buf);
    }
}

/// Usage lines for the global chords and local keys
pub struct HelpPanel {
    colors: ThemeColors,
}

impl HelpPanel {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(self.colors.dim));

        let inner = block.inner(area);
        block.render(area, buf);

        let key = Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(self.colors.fg);

        let lines = [
            (Shortcut::Toggle.name(), " to toggle start"),
            (Shortcut::Reset.name(), " to reset"),
            ("Space / r", " toggle / reset (focused only)"),
            ("q / Esc", " to quit"),
        ];

        for (i, (keys, action)) in lines.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(format!(" {}", keys), key),
                Span::styled(*action, text),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    backend: &'a str,
    events: u64,
    overflows: u64,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a str, backend: &'a str, events: u64, colors: ThemeColors) -> Self {
        Self {
            state,
            backend,
            events,
            overflows: 0,
            message: None,
            colors,
        }
    }

    pub fn overflows(mut self, overflows: u64) -> Self {
        self.overflows = overflows;
        self
    }

    pub fn message(mut self, msg: Option<&'a str>) -> Self {
        self.message = msg;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(self.colors.dim);
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.state),
                Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("| {} ", self.backend), dim),
            Span::styled(format!("| Events: {} ", self.events), dim),
        ];

        if self.overflows > 0 {
            spans.push(Span::styled(
                format!("| Overflows: {} ", self.overflows),
                Style::default().fg(self.colors.warning),
            ));
        }

        if let Some(msg) = self.message {
            spans.push(Span::styled(
                format!("| {}", msg),
                Style::default().fg(self.colors.fg),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
