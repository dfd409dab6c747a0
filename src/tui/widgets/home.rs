use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::state::MealSlot;
use crate::tui::app::{App, Row, Tile};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Dashboard tiles: the meal of the moment, the two simulated devices and
/// shortcuts into the list pages.
pub fn render_home(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| ListItem::new(tile_line(app, row)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title("Home")
                .title_style(Style::default().fg(fg).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(fg))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    f.render_stateful_widget(list, area, &mut app.ui.list_state);
}

fn tile_line(app: &App, row: &Row) -> String {
    let Row::Tile(tile) = row else {
        return String::new();
    };
    let state = &app.state;
    match tile {
        Tile::Meals => {
            let slot = App::current_meal_slot();
            let day = state.meal_plan.selected_day;
            let meal = state.meal_plan.day(day).slot(slot);
            let meal = if meal.is_empty() { "Nothing planned" } else { meal };
            let snacks = state.meal_plan.day(day).slot(MealSlot::Snacks);
            if snacks.is_empty() {
                format!(" {}: {}", slot.label(), meal)
            } else {
                format!(" {}: {} (snacks: {})", slot.label(), meal, snacks)
            }
        }
        Tile::HotBot => {
            let geyser = &state.geyser;
            let solar = if geyser.solar_mode { ", solar mode" } else { "" };
            format!(
                " HotBot: {}°C, {}{}",
                geyser.temperature, geyser.status, solar
            )
        }
        Tile::Solar => {
            format!(
                " Solar: battery {}%, {:.2} kW to home",
                state.solar.battery_percent, state.solar.to_home
            )
        }
        Tile::Grocery => {
            let open = state.grocery_list.iter().filter(|i| !i.checked).count();
            format!(" Grocery List: {} to buy", open)
        }
        Tile::Pantry => format!(" Pantry: {} items", state.pantry.len()),
        Tile::Todo => {
            let open = state.todos.iter().filter(|t| !t.checked).count();
            format!(" To-Do List: {} open", open)
        }
        Tile::Rewards => match state.favorite_card() {
            Some(card) => format!(" Rewards Cards: {} pinned", card.name),
            None => format!(" Rewards Cards: {} cards", state.rewards_cards.len()),
        },
        Tile::Buy => " Buy: deals and services".to_string(),
    }
}
