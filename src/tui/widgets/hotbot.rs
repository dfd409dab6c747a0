use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::state::{DAY_ABBREVS, Geyser, HeatMode};
use crate::tui::app::{HotBotState, HotBotTab, WizardField};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::wizard::{ROUTINE_TYPES, RoutineWizard, WizardStep};

/// Water-heater device modal: Status, Routines and Savings tabs, with the
/// three-step routine wizard layered over the Routines tab.
pub fn render_hotbot(
    f: &mut Frame,
    area: Rect,
    geyser: &Geyser,
    hotbot: &HotBotState,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 70, 70);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();

    // Tab strip.
    let mut tab_spans: Vec<Span> = Vec::new();
    for (i, tab) in HotBotTab::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw("  "));
        }
        let style = if *tab == hotbot.tab {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg)
        };
        tab_spans.push(Span::styled(tab.label(), style));
    }
    lines.push(Line::from(tab_spans));
    lines.push(Line::raw(""));

    if let Some(ref wizard) = hotbot.wizard {
        render_wizard_lines(&mut lines, wizard, hotbot, fg, accent, highlight_fg, highlight_bg);
    } else {
        match hotbot.tab {
            HotBotTab::Status => {
                lines.push(Line::raw(format!("  Temperature   {}°C", geyser.temperature)));
                lines.push(Line::raw(format!("  Status        {}", geyser.status)));
                let solar = if geyser.solar_mode { "on" } else { "off" };
                lines.push(Line::raw(format!("  Solar mode    {}  (s to toggle)", solar)));
            }
            HotBotTab::Routines => {
                if geyser.routines.is_empty() {
                    lines.push(Line::raw("  No routines yet. Press n to add one."));
                }
                for (index, routine) in geyser.routines.iter().enumerate() {
                    let mark = if routine.active { "●" } else { "○" };
                    let text = format!(
                        " {} {}  {}  {}",
                        mark,
                        routine.time,
                        routine.days,
                        routine.mode.label()
                    );
                    let style = if index == hotbot.selection {
                        Style::default().fg(highlight_fg).bg(highlight_bg)
                    } else {
                        Style::default().fg(fg)
                    };
                    lines.push(Line::from(Span::styled(text, style)));
                }
                lines.push(Line::raw(""));
                lines.push(Line::raw("  n: add  e: edit  Space: on/off  d: delete"));
            }
            HotBotTab::Savings => {
                let savings = &geyser.savings;
                lines.push(Line::raw(format!("  Total saved       R{:.0}", savings.total)));
                lines.push(Line::raw(format!(
                    "  This month        {:.2} kWh",
                    savings.month_kwh
                )));
                lines.push(Line::raw(format!(
                    "  This month        R{:.0}",
                    savings.month_money
                )));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("HotBot")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);
}

fn render_wizard_lines(
    lines: &mut Vec<Line<'static>>,
    wizard: &RoutineWizard,
    hotbot: &HotBotState,
    fg: ratatui::style::Color,
    accent: ratatui::style::Color,
    highlight_fg: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
) {
    let step = wizard.step;
    let heading = if wizard.is_editing() {
        "Edit routine"
    } else {
        "New routine"
    };
    let step_number = match step {
        WizardStep::ChooseType => 1,
        WizardStep::Schedule => 2,
        WizardStep::ChooseMode => 3,
    };
    lines.push(Line::from(Span::styled(
        format!("  {} (step {} of 3)", heading, step_number),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw(""));

    match step {
        WizardStep::ChooseType => {
            for (index, routine_type) in ROUTINE_TYPES.iter().enumerate() {
                let selected = index == hotbot.type_selection;
                let prefix = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else {
                    Style::default().fg(fg)
                };
                lines.push(Line::from(Span::styled(
                    format!("  {}{} routine", prefix, routine_type),
                    style,
                )));
            }
            lines.push(Line::raw(""));
            lines.push(Line::raw("  Enter: next  Esc: cancel"));
        }
        WizardStep::Schedule => {
            let field_style = |field: WizardField| {
                if hotbot.field == field {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else {
                    Style::default().fg(fg)
                }
            };
            lines.push(Line::from(vec![
                Span::raw("  Start  "),
                Span::styled(
                    format!("[{}]", hotbot.start_input.value()),
                    field_style(WizardField::Start),
                ),
                Span::raw("   End  "),
                Span::styled(
                    format!("[{}]", hotbot.end_input.value()),
                    field_style(WizardField::End),
                ),
            ]));
            lines.push(Line::raw(""));

            let mut day_spans: Vec<Span> = vec![Span::raw("  ")];
            for (index, day) in DAY_ABBREVS.iter().enumerate() {
                let chosen = wizard.draft.days.iter().any(|d| d == day);
                let mark = if chosen { "■" } else { "□" };
                let under_cursor =
                    hotbot.field == WizardField::Days && index == hotbot.day_cursor;
                let style = if under_cursor {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else if chosen {
                    Style::default().fg(accent)
                } else {
                    Style::default().fg(fg)
                };
                day_spans.push(Span::styled(format!("{} {} ", mark, day), style));
            }
            lines.push(Line::from(day_spans));
            lines.push(Line::raw(""));
            lines.push(Line::raw(
                "  Tab: next field  Space: toggle day  Enter: next  Esc: back",
            ));
        }
        WizardStep::ChooseMode => {
            for (index, mode) in [HeatMode::HeatOnce, HeatMode::KeepWarm].iter().enumerate() {
                let selected = index == hotbot.mode_selection;
                let prefix = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default().fg(highlight_fg).bg(highlight_bg)
                } else {
                    Style::default().fg(fg)
                };
                lines.push(Line::from(Span::styled(
                    format!("  {}{}", prefix, mode.label()),
                    style,
                )));
            }
            lines.push(Line::raw(""));
            lines.push(Line::raw("  Enter: save  Esc: back"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wizard_lines_render_from_a_borrowed_wizard() {
        let mut hotbot = HotBotState::new();
        hotbot.wizard = Some(RoutineWizard::add());
        hotbot.sync_from_wizard();
        let wizard = hotbot.wizard.clone().unwrap();

        let mut lines: Vec<Line> = Vec::new();
        render_wizard_lines(
            &mut lines,
            &wizard,
            &hotbot,
            Color::White,
            Color::Yellow,
            Color::Black,
            Color::Yellow,
        );

        assert!(line_text(&lines[0]).contains("New routine (step 1 of 3)"));
        assert!(
            lines
                .iter()
                .any(|line| line_text(line).contains("Enter: next"))
        );
    }
}
