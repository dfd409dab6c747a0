use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::state::GeyserRoutine;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    routine: Option<&GeyserRoutine>,
    selection: usize,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 50, 35);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::raw("Delete this routine?"));
    lines.push(Line::raw(""));
    if let Some(routine) = routine {
        lines.push(Line::raw(format!("{}  {}", routine.time, routine.days)));
        lines.push(Line::raw(""));
    }

    for (index, option) in ["Delete", "Cancel"].iter().enumerate() {
        let selected = index == selection;
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg).bg(bg)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw("↑↓ to choose, Enter to confirm, Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Delete routine")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, popup);
}
