use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Lesson progress, with retry screens drawn in the streak colour.
pub struct ProgressBar<'a> {
    pub done: usize,
    pub total: usize,
    /// Index of the first spliced retry screen, if any.
    pub review_from: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(done: usize, total: usize, review_from: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            done: done.min(total),
            total,
            review_from,
            theme,
        }
    }

    fn ratio_of(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width as f64;
        let filled = (self.ratio_of(self.done) * width) as u16;
        let review_start = self
            .review_from
            .map(|i| (self.ratio_of(i) * width) as u16)
            .unwrap_or(inner.width);

        for offset in 0..inner.width {
            let bar = if offset >= review_start {
                colors.streak()
            } else {
                colors.bar_filled()
            };
            let style = if offset < filled {
                Style::default().fg(colors.bg()).bg(bar)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(inner.x + offset, inner.y)].set_style(style);
        }

        let label = format!("{}/{}", self.done, self.total);
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_is_clamped_to_total() {
        let theme = Theme::default();
        let bar = ProgressBar::new(9, 4, None, &theme);
        assert_eq!(bar.done, 4);
        assert!((bar.ratio_of(bar.done) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_renders_label() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(1, 4, Some(3), &theme).render(area, &mut buf);
        let row: String = (0..20).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("1/4"));
    }
}
