use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application.
    /// Width allows sidebar (18) + main (20) inside the outer border;
    /// height covers title border, one content line and the status line.
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 10;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        // Inner area accounts for the outer border, 1 char on each side.
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested_width = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = (inner_area.width * 40) / 100;
            // Main area keeps at least 20 columns.
            requested_width
                .max(18)
                .min(max_width)
                .min(inner_area.width.saturating_sub(20))
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Content (sidebar + main)
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[0]);

        Self {
            inner_area,
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            status_area: vertical[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_sidebar_gives_main_full_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 24), 22, true);
        assert_eq!(layout.sidebar_area.width, 0);
        assert_eq!(layout.main_area.width, layout.inner_area.width);
    }

    #[test]
    fn undersized_terminal_is_padded_to_minimums() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 4), 22, false);
        assert!(layout.inner_area.width >= Layout::MIN_WIDTH);
        assert!(layout.main_area.width >= 20);
    }
}
