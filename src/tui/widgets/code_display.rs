use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::state::RewardsCard;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;

/// Full-card code display. The glyph lines were generated when the modal
/// opened; this only lays them out.
pub fn render_code_display(
    f: &mut Frame,
    area: Rect,
    card: Option<&RewardsCard>,
    lines: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let popup = popup_area(area, 70, 80);
    f.render_widget(Clear, popup);

    let title = card.map(|c| c.name.as_str()).unwrap_or("Card");
    let mut text: Vec<Line> = vec![Line::raw("")];
    text.extend(lines.iter().map(|l| Line::raw(l.clone())));
    text.push(Line::raw(""));
    text.push(Line::raw("Esc to close"));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, popup);
}
