use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::lesson::engine::LessonEngine;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Top bar: lesson title plus compact session stats.
pub struct LessonHeader<'a> {
    engine: &'a LessonEngine,
    paused: bool,
    theme: &'a Theme,
}

impl<'a> LessonHeader<'a> {
    pub fn new(engine: &'a LessonEngine, paused: bool, theme: &'a Theme) -> Self {
        Self {
            engine,
            paused,
            theme,
        }
    }
}

impl Widget for LessonHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let e = self.engine;

        let mut spans = vec![
            Span::styled(
                format!(" {} ", e.title()),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}/{} ", e.current_index() + 1, e.screens().len()),
                Style::default().fg(colors.text_pending()),
            ),
        ];
        if e.mistakes().is_in_mistake_loop() || e.is_review_mode() {
            spans.push(Span::styled(" REVIEW ", Style::default().fg(colors.streak())));
        }
        spans.push(Span::styled(
            format!(" 🔥 {} ", e.streak()),
            Style::default().fg(colors.streak()),
        ));
        spans.push(Span::styled(
            format!(" ⭐ {} XP ", e.xp_gained()),
            Style::default().fg(colors.xp()),
        ));
        let clock = format_clock(e.timer().elapsed_secs());
        spans.push(Span::styled(
            if self.paused {
                format!(" ⏸ {clock} ")
            } else {
                format!(" ⏱ {clock} ")
            },
            Style::default().fg(colors.header_fg()),
        ));

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }
}

/// Side panel on wide terminals.
pub struct SessionSidebar<'a> {
    engine: &'a LessonEngine,
    theme: &'a Theme,
}

impl<'a> SessionSidebar<'a> {
    pub fn new(engine: &'a LessonEngine, theme: &'a Theme) -> Self {
        Self { engine, theme }
    }
}

impl Widget for SessionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let e = self.engine;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let review_from = e.screens().iter().position(|s| s.is_retry);
        ProgressBar::new(e.current_index(), e.screens().len(), review_from, self.theme)
            .render(rows[0], buf);

        let label = Style::default().fg(colors.text_pending());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        let stat = |name: &str, v: String| {
            Line::from(vec![
                Span::styled(format!(" {name:<10}"), label),
                Span::styled(v, value),
            ])
        };

        let lines = vec![
            stat("Streak", e.streak().to_string()),
            stat("XP", e.xp_gained().to_string()),
            stat("Time", format_clock(e.timer().elapsed_secs())),
            stat("Mistakes", e.mistakes().session_mistakes().len().to_string()),
            stat("To review", e.mistakes().retry_queue().len().to_string()),
        ];

        let block = Block::bordered()
            .title(" Session ")
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines).block(block).render(rows[1], buf);
    }
}
