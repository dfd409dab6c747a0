use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::{ReceiptStage, ReceiptState};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

/// Receipt import modal. The first stage asks for a file path (or a
/// clipboard paste), the second shows the extracted item names before they
/// land in the pantry.
pub fn render_receipt(f: &mut Frame, area: Rect, receipt: &ReceiptState, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 60, 60);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    match receipt.stage {
        ReceiptStage::EnterPath => {
            lines.push(Line::raw("  Path to a receipt text file:"));
            lines.push(Line::from(Span::styled(
                format!("  > {}_", receipt.path_input.value()),
                Style::default().fg(accent),
            )));
            lines.push(Line::raw(""));
            if receipt.progress > 0 {
                lines.push(Line::raw(format!("  Reading... {}%", receipt.progress)));
                lines.push(Line::raw(""));
            }
            lines.push(Line::raw("  Enter: read file  Ctrl+v: paste text  Esc: cancel"));
        }
        ReceiptStage::Review => {
            let chosen = receipt.selected.iter().filter(|s| **s).count();
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} item(s) found, {} selected",
                    receipt.items.len(),
                    chosen
                ),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::raw(""));
            for (index, item) in receipt.items.iter().enumerate() {
                let keep = receipt.selected.get(index).copied().unwrap_or(true);
                let mark = if keep { "x" } else { " " };
                let text = format!("  [{}] {}", mark, item);
                let style = if index == receipt.cursor {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else {
                    Style::default().fg(fg)
                };
                lines.push(Line::from(Span::styled(text, style)));
            }
            lines.push(Line::raw(""));
            lines.push(Line::raw(
                "  Space: include/exclude  Enter: add selected  Esc: cancel",
            ));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Import receipt")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);
}
