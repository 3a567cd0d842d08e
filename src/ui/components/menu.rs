use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

/// Lesson picker: one entry per bundled lesson, then mistake review.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
    lessons: Vec<String>,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme, lessons: Vec<String>) -> Self {
        let mut items: Vec<MenuItem> = lessons
            .iter()
            .enumerate()
            .map(|(i, name)| MenuItem {
                key: (i + 1).to_string(),
                label: title_case(name),
                description: format!("Lesson {}", i + 1),
            })
            .collect();
        items.push(MenuItem {
            key: "r".to_string(),
            label: "Review mistakes".to_string(),
            description: "Nothing to review yet".to_string(),
        });
        Self {
            items,
            selected: 0,
            theme,
            lessons,
        }
    }

    pub fn set_review_count(&mut self, count: usize) {
        if let Some(review) = self.items.last_mut() {
            review.description = match count {
                0 => "Nothing to review yet".to_string(),
                1 => "1 saved mistake".to_string(),
                n => format!("{n} saved mistakes"),
            };
        }
    }

    /// The bundled lesson under the cursor, or None on the review entry.
    pub fn selected_lesson(&self) -> Option<&str> {
        self.lessons.get(self.selected).map(String::as_str)
    }

    pub fn select_review(&mut self) {
        self.selected = self.items.len() - 1;
    }

    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = index;
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Menu<'_> {
    /// First item to draw so the cursor stays visible in `rows` rows of two
    /// lines each.
    fn scroll_offset(&self, rows: usize) -> usize {
        let rows = rows.max(1);
        (self.selected + 1).saturating_sub(rows)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" algolingo ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [tagline, list] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .areas(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Algorithms, one small step at a time",
                Style::default().fg(colors.fg()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(tagline, buf);

        let review_index = self.items.len() - 1;
        let offset = self.scroll_offset(list.height as usize / 2);
        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate().skip(offset) {
            let selected = i == self.selected;
            let base = if i == review_index {
                colors.streak()
            } else {
                colors.fg()
            };
            let label_style = if selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(base)
            };
            let cursor = if selected { "▸" } else { " " };
            lines.push(Line::from(Span::styled(
                format!(" {cursor} [{}] {}", item.key, item.label),
                label_style,
            )));
            lines.push(Line::from(Span::styled(
                format!("       {}", item.description),
                Style::default().fg(colors.text_pending()),
            )));
        }
        Paragraph::new(lines).render(list, buf);
    }
}
