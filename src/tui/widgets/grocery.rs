use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::tui::app::{App, Row};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_grocery(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let Row::Grocery(id) = row else {
                return ListItem::new(String::new());
            };
            match app.state.grocery_list.iter().find(|i| i.id == *id) {
                Some(item) => {
                    let mark = if item.checked { "x" } else { " " };
                    let line = format!(" [{}] {}", mark, item.name);
                    if item.checked {
                        ListItem::new(line)
                            .style(Style::default().add_modifier(Modifier::CROSSED_OUT))
                    } else {
                        ListItem::new(line)
                    }
                }
                None => ListItem::new(String::new()),
            }
        })
        .collect();

    let title = format!("Grocery List ({})", app.state.grocery_list.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title(title)
                .title_style(Style::default().fg(fg).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(fg))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    f.render_stateful_widget(list, area, &mut app.ui.list_state);
}
