use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// One-line status bar: an active status message takes priority over the
/// key hints, which are fitted to the available width.
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    let max_width = area.width as usize;
    let (content, style) = if let Some(msg) = message {
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            truncate(msg, max_width),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (fit_hints(key_hints, max_width), Style::default().fg(fg).bg(bg))
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Join as many hints as fit; an ellipsis marks the cutoff.
fn fit_hints(hints: &[String], max_width: usize) -> String {
    let separator = " | ";
    let mut out = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let added = if i == 0 {
            hint.chars().count()
        } else {
            separator.chars().count() + hint.chars().count()
        };
        if out.chars().count() + added > max_width {
            if !out.is_empty() && out.chars().count() + 3 <= max_width {
                out.push_str("...");
            }
            break;
        }
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(hint);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_are_cut_at_width() {
        let hints = vec!["q: quit".to_string(), "F1: help".to_string(), "n: add".to_string()];
        let fitted = fit_hints(&hints, 22);
        assert!(fitted.chars().count() <= 22);
        assert!(fitted.starts_with("q: quit"));
        assert!(fitted.ends_with("..."));
    }

    #[test]
    fn short_hint_lists_keep_everything() {
        let hints = vec!["q: quit".to_string()];
        assert_eq!(fit_hints(&hints, 80), "q: quit");
    }
}
