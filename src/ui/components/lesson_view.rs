use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::lesson::engine::{Status, XP_PER_CORRECT};
use crate::lesson::input::AnswerInput;
use crate::lesson::plan::{FlipcardMode, InputMode, LessonScreen, WidgetKind};
use crate::ui::theme::{Theme, ThemeColors};

const BLANK: &str = "__";

pub struct LessonView<'a> {
    screen: &'a LessonScreen,
    answer: &'a AnswerInput,
    status: Status,
    theme: &'a Theme,
}

impl<'a> LessonView<'a> {
    pub fn new(
        screen: &'a LessonScreen,
        answer: &'a AnswerInput,
        status: Status,
        theme: &'a Theme,
    ) -> Self {
        Self {
            screen,
            answer,
            status,
            theme,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();
        for widget in &self.screen.widgets {
            self.widget_lines(&widget.kind, colors, &mut lines);
            lines.push(Line::from(""));
        }
        self.feedback_lines(colors, &mut lines);
        lines
    }

    fn widget_lines(&self, kind: &WidgetKind, colors: &ThemeColors, out: &mut Vec<Line<'static>>) {
        let plain = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_pending());
        let code = Style::default().fg(colors.code_fg());
        let bold_accent = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        match kind {
            WidgetKind::Dialogue { speaker, text } => out.push(Line::from(vec![
                Span::styled(format!("{speaker}: "), bold_accent),
                Span::styled(text.clone(), plain),
            ])),
            WidgetKind::Callout { title, text } => {
                if let Some(title) = title {
                    out.push(Line::from(Span::styled(
                        format!("▌ {title}"),
                        Style::default()
                            .fg(colors.streak())
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                out.push(Line::from(Span::styled(format!("▌ {text}"), plain)));
            }
            WidgetKind::Flipcard { front, back, mode } => {
                out.push(Line::from(Span::styled(front.clone(), bold_accent)));
                let revealed = match (mode, self.answer) {
                    (FlipcardMode::Learn, _) => true,
                    (FlipcardMode::Assessment, AnswerInput::Flip { flipped, .. }) => *flipped,
                    (FlipcardMode::Assessment, _) => true,
                };
                if revealed {
                    out.push(Line::from(Span::styled(format!("  ↳ {back}"), plain)));
                } else {
                    out.push(Line::from(Span::styled("  [Space] flip the card", dim)));
                }
            }
            WidgetKind::InteractiveCode {
                code: source,
                annotations,
                ..
            } => {
                out.extend(source.lines().map(|l| Line::from(Span::styled(format!("  {l}"), code))));
                out.extend(
                    annotations
                        .iter()
                        .map(|a| Line::from(Span::styled(format!("  • {a}"), dim))),
                );
            }
            WidgetKind::Code { code: source, .. } => {
                out.extend(source.lines().map(|l| Line::from(Span::styled(format!("  {l}"), code))));
            }
            WidgetKind::StepsList { items, interactive } => {
                if *interactive && matches!(self.answer, AnswerInput::Arrange { .. }) {
                    out.push(Line::from(Span::styled("Put the steps in order:", bold_accent)));
                    self.arrange_lines(colors, out);
                } else {
                    out.extend(
                        items
                            .iter()
                            .enumerate()
                            .map(|(i, s)| Line::from(Span::styled(format!("  {}. {s}", i + 1), plain))),
                    );
                }
            }
            WidgetKind::Parsons { prompt, .. } => {
                let prompt = prompt.clone().unwrap_or_else(|| "Arrange the lines:".to_string());
                out.push(Line::from(Span::styled(prompt, bold_accent)));
                self.arrange_lines(colors, out);
            }
            WidgetKind::FillIn { code: source, .. } => self.fill_in_lines(source, colors, out),
            WidgetKind::Quiz {
                question,
                options,
                correct_index,
                explanation,
            } => {
                out.push(Line::from(Span::styled(question.clone(), bold_accent)));
                let selected = match self.answer {
                    AnswerInput::Choice { selected, .. } => *selected,
                    _ => None,
                };
                for (i, option) in options.iter().enumerate() {
                    let marker = if selected == Some(i) { ">" } else { " " };
                    let style = match self.status {
                        Status::Idle if selected == Some(i) => bold_accent,
                        Status::Idle => plain,
                        _ if i == *correct_index => Style::default().fg(colors.text_correct()),
                        _ if selected == Some(i) => Style::default().fg(colors.text_incorrect()),
                        _ => dim,
                    };
                    out.push(Line::from(Span::styled(
                        format!(" {marker} [{}] {option}", i + 1),
                        style,
                    )));
                }
                if self.status == Status::Wrong
                    && let Some(explanation) = explanation
                {
                    out.push(Line::from(Span::styled(format!("  {explanation}"), dim)));
                }
            }
            WidgetKind::Leetcode {
                title,
                description,
                starter_code,
            } => {
                out.push(Line::from(Span::styled(title.clone(), bold_accent)));
                out.push(Line::from(Span::styled(description.clone(), plain)));
                if let Some(starter) = starter_code {
                    out.extend(
                        starter
                            .lines()
                            .map(|l| Line::from(Span::styled(format!("  {l}"), code))),
                    );
                }
                let verdict = match self.answer {
                    AnswerInput::Verdict(Some(true)) => "You marked this solved",
                    AnswerInput::Verdict(Some(false)) => "You marked this unsolved",
                    _ => "[y] solved   [n] not yet",
                };
                out.push(Line::from(Span::styled(verdict, dim)));
            }
        }
    }

    fn arrange_lines(&self, colors: &ThemeColors, out: &mut Vec<Line<'static>>) {
        let AnswerInput::Arrange { pool, placed } = self.answer else {
            return;
        };
        let code = Style::default().fg(colors.code_fg());
        let dim = Style::default().fg(colors.text_pending());
        for line in placed {
            out.push(Line::from(Span::styled(format!("  │ {line}"), code)));
        }
        if !pool.is_empty() {
            out.push(Line::from(Span::styled("  Pick next:", dim)));
            for (i, line) in pool.iter().enumerate() {
                out.push(Line::from(Span::styled(
                    format!("   [{}] {}", i + 1, line.trim()),
                    Style::default().fg(colors.fg()),
                )));
            }
        }
    }

    fn fill_in_lines(&self, source: &str, colors: &ThemeColors, out: &mut Vec<Line<'static>>) {
        let code = Style::default().fg(colors.code_fg());
        let (values, options, mode, focus) = match self.answer {
            AnswerInput::Blanks {
                values,
                options,
                mode,
                focus,
            } => (values.as_slice(), options.as_slice(), *mode, *focus),
            _ => (&[][..], &[][..], InputMode::Type, 0),
        };

        let mut blank = 0;
        for source_line in source.lines() {
            let mut spans = vec![Span::styled("  ", code)];
            let mut parts = source_line.split(BLANK).peekable();
            while let Some(part) = parts.next() {
                spans.push(Span::styled(part.to_string(), code));
                if parts.peek().is_some() {
                    let value = values.get(blank).map(String::as_str).unwrap_or_default();
                    let shown = if value.is_empty() { "____" } else { value };
                    let style = if blank == focus && self.status == Status::Idle {
                        Style::default()
                            .fg(colors.bg())
                            .bg(colors.accent())
                    } else {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::UNDERLINED)
                    };
                    spans.push(Span::styled(shown.to_string(), style));
                    blank += 1;
                }
            }
            out.push(Line::from(spans));
        }

        if mode == InputMode::Select && !options.is_empty() {
            let bank = options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("[{}] {o}", i + 1))
                .collect::<Vec<_>>()
                .join("   ");
            out.push(Line::from(Span::styled(
                format!("  {bank}"),
                Style::default().fg(colors.fg()),
            )));
        }
    }

    fn feedback_lines(&self, colors: &ThemeColors, out: &mut Vec<Line<'static>>) {
        let line = match self.status {
            Status::Idle => return,
            Status::Correct => Span::styled(
                format!("✔ Correct! +{XP_PER_CORRECT} XP"),
                Style::default()
                    .fg(colors.text_correct())
                    .add_modifier(Modifier::BOLD),
            ),
            Status::Wrong => Span::styled(
                "✘ Not quite. It's saved for review.",
                Style::default()
                    .fg(colors.text_incorrect())
                    .add_modifier(Modifier::BOLD),
            ),
        };
        out.push(Line::from(line));
    }
}

impl Widget for LessonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let title = match (&self.screen.header, self.screen.is_retry) {
            (Some(h), _) => format!(" {h} "),
            (None, true) => " Review ".to_string(),
            (None, false) => String::new(),
        };
        let border = if self.screen.is_retry {
            colors.streak()
        } else {
            colors.border_focused()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
