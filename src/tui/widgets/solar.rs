use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::state::{Solar, Timeframe};
use crate::tui::app::{SolarState, SolarTab};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;

/// Solar inverter modal: live status plus historical insights per
/// timeframe, with the chart drawn as horizontal block bars.
pub fn render_solar(f: &mut Frame, area: Rect, solar: &Solar, view: &SolarState, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let popup = popup_area(area, 74, 80);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();

    let mut tab_spans: Vec<Span> = Vec::new();
    for (i, tab) in [SolarTab::Status, SolarTab::Insights].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw("  "));
        }
        let style = if *tab == view.tab {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg)
        };
        tab_spans.push(Span::styled(tab.label(), style));
    }
    lines.push(Line::from(tab_spans));
    lines.push(Line::raw(""));

    match view.tab {
        SolarTab::Status => {
            lines.push(Line::raw(format!("  Battery       {}%", solar.battery_percent)));
            lines.push(Line::raw(format!("  From solar    {:.2} kW", solar.from_solar)));
            lines.push(Line::raw(format!("  To home       {:.2} kW", solar.to_home)));
            lines.push(Line::raw(format!("  To battery    {:.2} kW", solar.to_battery)));
            lines.push(Line::raw(format!("  From grid     {:.2} kW", solar.from_grid)));
        }
        SolarTab::Insights => {
            let mut frame_spans: Vec<Span> = vec![Span::raw("  ")];
            for (i, timeframe) in Timeframe::ALL.iter().enumerate() {
                if i > 0 {
                    frame_spans.push(Span::raw(" "));
                }
                let style = if *timeframe == view.timeframe {
                    Style::default().fg(accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(fg)
                };
                frame_spans.push(Span::styled(format!("[{}]", timeframe.label()), style));
            }
            lines.push(Line::from(frame_spans));
            lines.push(Line::raw(""));

            let insight = solar.insights.get(view.timeframe);
            lines.push(Line::raw(format!("  {}", insight.date_range)));
            lines.push(Line::raw(format!(
                "  Energy used   {:.1} kWh  ({}% solar, {}% grid)",
                insight.energy_used, insight.solar_percent, insight.grid_percent
            )));
            lines.push(Line::raw(format!(
                "  From solar {:.1}  To grid {:.1}  From grid {:.1}",
                insight.from_solar, insight.to_grid, insight.from_grid
            )));
            lines.push(Line::raw(format!("  Impact        {}%", insight.impact)));
            lines.push(Line::raw(""));

            let max = insight
                .chart
                .iter()
                .map(|b| b.home + b.battery)
                .fold(0.0_f64, f64::max)
                .max(f64::EPSILON);
            for bar in &insight.chart {
                let width = 30.0;
                let home_cells = ((bar.home / max) * width).round() as usize;
                let battery_cells = ((bar.battery / max) * width).round() as usize;
                lines.push(Line::from(vec![
                    Span::raw(format!("  {:>4} ", bar.label)),
                    Span::styled("█".repeat(home_cells), Style::default().fg(accent)),
                    Span::styled("▒".repeat(battery_cells), Style::default().fg(fg)),
                    Span::raw(format!(" {:.1}", bar.home + bar.battery)),
                ]));
            }
            lines.push(Line::raw(""));
            lines.push(Line::raw("  █ home  ▒ battery   Tab/1-4: timeframe"));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Solar")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);
}
