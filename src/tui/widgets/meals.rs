use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::tui::app::{App, Row};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_meals(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let day = app.state.meal_plan.selected_day;
    let meals = app.state.meal_plan.day(day).clone();

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let Row::Meal(slot) = row else {
                return ListItem::new(String::new());
            };
            let value = meals.slot(*slot);
            let value = if value.is_empty() { "-" } else { value };
            ListItem::new(format!(" {:<10} {}", slot.label(), value))
        })
        .collect();

    let title = format!("Meal Plan  ◀ {} ▶", day.label());
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
