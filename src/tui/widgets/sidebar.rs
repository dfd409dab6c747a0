use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::state::Page;
use crate::tui::app::FocusArea;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_sidebar(
    f: &mut Frame,
    area: Rect,
    current_page: Page,
    cursor: usize,
    focus: FocusArea,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let accent = parse_color(&theme.accent);

    let mut lines = Vec::with_capacity(Page::ALL.len());
    for (index, page) in Page::ALL.iter().enumerate() {
        let is_cursor = focus == FocusArea::Sidebar && index == cursor;
        let is_current = *page == current_page;
        let marker = if is_current { "› " } else { "  " };
        let style = if is_cursor {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else if is_current {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).bg(bg)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, page.label()),
            style,
        )));
    }

    let border_style = if focus == FocusArea::Sidebar {
        Style::default().fg(accent)
    } else {
        Style::default().fg(fg)
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(border_style),
    );
    f.render_widget(paragraph, area);
}
