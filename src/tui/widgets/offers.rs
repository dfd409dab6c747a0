use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::state::MarketCategory;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;

pub fn render_offers(f: &mut Frame, area: Rect, category: Option<&MarketCategory>, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let popup = popup_area(area, 70, 70);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    let title = match category {
        Some(category) => {
            for offer in &category.offers {
                lines.push(Line::from(Span::styled(
                    format!("  {}", offer.name),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::raw(format!("    {}", offer.deal)));
                lines.push(Line::raw(""));
            }
            if category.offers.is_empty() {
                lines.push(Line::raw("  No offers available right now."));
            }
            category.title.clone()
        }
        None => {
            lines.push(Line::raw("  Category not found."));
            "Offers".to_string()
        }
    };
    lines.push(Line::raw("  Esc to close"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);
}
