use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::tui::app::{App, Row};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_buy(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let Row::Category(id) = row else {
                return ListItem::new(String::new());
            };
            match app.state.marketplace.iter().find(|c| c.id == *id) {
                Some(category) => ListItem::new(format!(
                    " {}: {}",
                    category.title, category.description
                )),
                None => ListItem::new(String::new()),
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title("Buy")
                .title_style(Style::default().fg(fg).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(fg))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    f.render_stateful_widget(list, area, &mut app.ui.list_state);
}
