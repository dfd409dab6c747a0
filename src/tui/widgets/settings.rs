use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::tui::app::{App, Row, SettingRow};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_settings(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let Row::Setting(setting) = row else {
                return ListItem::new(String::new());
            };
            let line = match setting {
                SettingRow::Theme => format!(" Theme: {}", app.config.current_theme),
                SettingRow::LoadsheddingArea => {
                    let area = app
                        .state
                        .settings
                        .loadshedding
                        .area
                        .as_deref()
                        .unwrap_or("not set");
                    format!(" Loadshedding area: {}", area)
                }
                SettingRow::LoadsheddingNotifications => {
                    let on = if app.state.settings.loadshedding.notifications {
                        "on"
                    } else {
                        "off"
                    };
                    format!(" Loadshedding notifications: {}", on)
                }
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title("Settings")
                .title_style(Style::default().fg(fg).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(fg))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    f.render_stateful_widget(list, area, &mut app.ui.list_state);
}
