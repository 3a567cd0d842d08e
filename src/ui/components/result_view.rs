use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::lesson::mistakes::MistakeRecord;
use crate::store::schema::{LessonResult, ProfileData};
use crate::ui::components::session_panel::format_clock;
use crate::ui::theme::Theme;

pub struct ResultView<'a> {
    pub result: &'a LessonResult,
    pub mistakes: &'a [MistakeRecord],
    pub profile: &'a ProfileData,
    pub theme: &'a Theme,
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let r = self.result;

        let heading = if r.review {
            "Review finished"
        } else {
            "Lesson complete!"
        };
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(r.title.clone(), Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("⭐ +{} XP", r.xp), Style::default().fg(colors.xp())),
                Span::raw("    "),
                Span::styled(
                    format!("🔥 streak {}", r.streak),
                    Style::default().fg(colors.streak()),
                ),
                Span::raw("    "),
                Span::styled(
                    format!("⏱ {}", format_clock(r.elapsed_secs)),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "Total {} XP · {} lesson(s) · {} day streak",
                    self.profile.total_xp, self.profile.lessons_completed, self.profile.streak_days
                ),
                Style::default().fg(colors.text_pending()),
            )),
            Line::from(""),
        ];

        if self.mistakes.is_empty() {
            lines.push(Line::from(Span::styled(
                "No mistakes. Flawless!",
                Style::default().fg(colors.text_correct()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("Mistakes this session ({}):", self.mistakes.len()),
                Style::default().fg(colors.text_incorrect()),
            )));
            for m in self.mistakes {
                lines.push(Line::from(Span::styled(
                    format!("  [{}] {}", m.question_type, m.context),
                    Style::default().fg(colors.fg()),
                )));
            }
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
