use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SIDEBAR_MIN_WIDTH: u16 = 100;
const SIDEBAR_WIDTH: u16 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    /// Lesson area plus session sidebar.
    Wide,
    Narrow,
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= SIDEBAR_MIN_WIDTH {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }
}

/// Screen regions for a running lesson.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    /// `footer_height` is the number of rows the caller needs below the
    /// lesson (notice plus packed key hints).
    pub fn new(area: Rect, footer_height: u16) -> Self {
        let tier = LayoutTier::from_area(area);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let (main, sidebar) = match tier {
            LayoutTier::Wide => {
                let [main, side] = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(40), Constraint::Length(SIDEBAR_WIDTH)])
                    .areas(body);
                (main, Some(side))
            }
            LayoutTier::Narrow => (body, None),
        };

        Self {
            header,
            main,
            sidebar,
            footer,
            tier,
        }
    }
}

/// A box centered in `area`, never smaller than a readable popup unless the
/// terminal itself is smaller.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 56;
    const MIN_HEIGHT: u16 = 14;

    let w = (area.width.saturating_mul(percent_x.min(100)) / 100)
        .max(MIN_WIDTH)
        .min(area.width);
    let h = (area.height.saturating_mul(percent_y.min(100)) / 100)
        .max(MIN_HEIGHT)
        .min(area.height);

    Rect::new(
        area.x.saturating_add(area.width.saturating_sub(w) / 2),
        area.y.saturating_add(area.height.saturating_sub(h) / 2),
        w,
        h,
    )
}

/// Greedily pack key hints into lines no wider than `width`. A hint longer
/// than `width` still gets a line of its own.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    const INDENT: &str = "  ";
    const GAP: &str = "  ";

    let mut lines: Vec<String> = Vec::new();
    if width == 0 {
        return lines;
    }
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        match lines.last_mut() {
            Some(line) if line.chars().count() + GAP.len() + hint.chars().count() <= width => {
                line.push_str(GAP);
                line.push_str(hint);
            }
            _ => lines.push(format!("{INDENT}{hint}")),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_only_when_wide() {
        let wide = AppLayout::new(Rect::new(0, 0, 120, 40), 2);
        assert_eq!(wide.tier, LayoutTier::Wide);
        assert_eq!(wide.sidebar.map(|s| s.width), Some(SIDEBAR_WIDTH));
        assert!(AppLayout::new(Rect::new(0, 0, 80, 40), 2).sidebar.is_none());
    }

    #[test]
    fn test_footer_gets_requested_rows() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 40), 4);
        assert_eq!(layout.footer.height, 4);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.main.height, 33);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let small = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(50, 50, small), small);

        let big = Rect::new(0, 0, 200, 60);
        let r = centered_rect(50, 50, big);
        assert_eq!((r.width, r.height), (100, 30));
        assert_eq!((r.x, r.y), (50, 15));
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Enter] Check", "[Esc] Quit", "[1-9] Pick"], 30);
        assert_eq!(lines, ["  [Enter] Check  [Esc] Quit", "  [1-9] Pick"]);
        assert!(pack_hint_lines(&["[Enter] Check"], 0).is_empty());
    }
}
