use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::state::CodeKind;
use crate::tui::app::{App, Row};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_rewards(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let Row::Card(id) = row else {
                return ListItem::new(String::new());
            };
            match app.state.rewards_cards.iter().find(|c| c.id == *id) {
                Some(card) => {
                    let star = if card.is_favorite { "★" } else { " " };
                    let kind = match card.kind {
                        CodeKind::Barcode => "barcode",
                        CodeKind::Qrcode => "QR",
                    };
                    ListItem::new(format!(" {} {}  ({})", star, card.name, kind))
                }
                None => ListItem::new(String::new()),
            }
        })
        .collect();

    let title = format!("Rewards Cards ({})", app.state.rewards_cards.len());
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
