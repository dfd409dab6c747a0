use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let popup = popup_area(area, 60, 70);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(paragraph, popup);
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let key = format_key_binding_for_display;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {}: Move selection\n",
        key(&kb.list_up),
        key(&kb.list_down)
    ));
    text.push_str("  Tab: Switch between sidebar and page\n");
    text.push_str(&format!("  {}: Open / activate\n", key(&kb.select)));
    text.push_str(&format!(
        "  {} / {}: Previous / next day (meal plan)\n",
        key(&kb.tab_left),
        key(&kb.tab_right)
    ));
    text.push_str("  Esc: Back to home\n\n");

    text.push_str("Lists:\n");
    text.push_str(&format!("  {}: New item\n", key(&kb.new)));
    text.push_str(&format!("  {}: Edit item\n", key(&kb.edit)));
    text.push_str(&format!("  {}: Delete item\n", key(&kb.delete)));
    text.push_str(&format!(
        "  {}: Toggle checked / done\n",
        key(&kb.toggle_done)
    ));
    text.push_str("\n");

    text.push_str("Pantry:\n");
    text.push_str("  g: New category\n");
    text.push_str(&format!("  {}: Move item to grocery list\n", key(&kb.move_item)));
    text.push_str(&format!("  {}: Show all items flat\n", key(&kb.show_all)));
    text.push_str(&format!("  {}: Import from receipt\n", key(&kb.import_receipt)));
    text.push_str("\n");

    text.push_str("Rewards cards:\n");
    text.push_str(&format!("  {}: Scan a card code\n", key(&kb.scan)));
    text.push_str(&format!("  {}: Mark as favorite\n", key(&kb.favorite)));
    text.push_str("\n");

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Settings\n", key(&kb.settings)));
    text.push_str(&format!("  {}: Toggle sidebar\n", key(&kb.toggle_sidebar)));

    text
}
