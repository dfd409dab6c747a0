use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::tui::app::{App, Row};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

pub fn render_pantry(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let accent = parse_color(&theme.accent);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| match row {
            Row::TagHeader(tag) => {
                let collapsed = app.state.collapsed_tags.contains(tag);
                let arrow = if collapsed { "▸" } else { "▾" };
                let count = app.state.pantry.iter().filter(|i| i.tag == *tag).count();
                ListItem::new(format!("{} {} ({})", arrow, tag, count))
                    .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            }
            Row::Pantry(id) => match app.state.pantry.iter().find(|i| i.id == *id) {
                Some(item) => {
                    if app.state.pantry_show_all {
                        ListItem::new(format!(" {}  [{}]", item.name, item.tag))
                    } else {
                        ListItem::new(format!("   {}", item.name))
                    }
                }
                None => ListItem::new(String::new()),
            },
            _ => ListItem::new(String::new()),
        })
        .collect();

    let mode = if app.state.pantry_show_all {
        "all items"
    } else {
        "by category"
    };
    let title = format!("Pantry ({}, {})", app.state.pantry.len(), mode);
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

    if app.state.editing_pantry_item_id.is_some() {
        render_tag_picker(f, area, app);
    }
}

/// Tag picker for the pantry item being re-categorized.
fn render_tag_picker(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let item_name = app
        .state
        .editing_pantry_item_id
        .and_then(|id| app.state.pantry.iter().find(|i| i.id == id))
        .map(|i| i.name.clone())
        .unwrap_or_default();

    let popup = popup_area(area, 50, 60);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (index, tag) in app.state.pantry_tags.iter().enumerate() {
        let selected = index == app.ui.tag_picker_index;
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg).bg(bg)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, tag), style)));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Category for \"{}\"", item_name))
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);
}
