pub mod buy;
pub mod code_display;
pub mod color;
pub mod confirm_delete;
pub mod grocery;
pub mod help;
pub mod home;
pub mod hotbot;
pub mod input;
pub mod meals;
pub mod offers;
pub mod pantry;
pub mod receipt;
pub mod rewards;
pub mod settings;
pub mod sidebar;
pub mod solar;
pub mod status_bar;
pub mod todo;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered popup rect taking the given percentages of the parent area.
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
