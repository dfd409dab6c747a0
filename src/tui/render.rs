use ratatui::Frame;
use ratatui::layout::{Alignment, Position};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::state::Page;
use crate::tui::app::{App, Modal, SidebarState};
use crate::tui::Layout;
use crate::tui::widgets::{
    buy::render_buy,
    code_display::render_code_display,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    grocery::render_grocery,
    help::render_help,
    home::render_home,
    hotbot::render_hotbot,
    meals::render_meals,
    offers::render_offers,
    pantry::render_pantry,
    popup_area,
    receipt::render_receipt,
    rewards::render_rewards,
    settings::render_settings,
    sidebar::render_sidebar,
    solar::render_solar,
    status_bar::render_status_bar,
    todo::render_todo,
};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Domify")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(outer, f.area());

    if app.ui.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        render_sidebar(
            f,
            layout.sidebar_area,
            app.state.current_page,
            app.ui.sidebar_index,
            app.ui.focus,
            &app.config,
        );
    }

    match app.state.current_page {
        Page::Home => render_home(f, layout.main_area, app),
        Page::Grocery => render_grocery(f, layout.main_area, app),
        Page::Pantry => render_pantry(f, layout.main_area, app),
        Page::Todo => render_todo(f, layout.main_area, app),
        Page::Rewards => render_rewards(f, layout.main_area, app),
        Page::Buy => render_buy(f, layout.main_area, app),
        Page::Meals => render_meals(f, layout.main_area, app),
        Page::Settings => render_settings(f, layout.main_area, app),
    }

    if let Some((target, input)) = &app.input {
        let title = target.title();
        let value = input.value();
        let cursor = input.cursor();
        render_input_popup(f, app, title, &value, cursor);
    }

    // Modals draw over the page content.
    match &app.modal {
        Some(Modal::Help) => render_help(f, f.area(), &app.config),
        Some(Modal::HotBot(hotbot)) => {
            render_hotbot(f, f.area(), &app.state.geyser, hotbot, &app.config);
        }
        Some(Modal::Solar(view)) => {
            render_solar(f, f.area(), &app.state.solar, view, &app.config);
        }
        Some(Modal::CodeDisplay { card_id, lines }) => {
            let card = app.state.rewards_cards.iter().find(|c| c.id == *card_id);
            render_code_display(f, f.area(), card, lines, &app.config);
        }
        Some(Modal::Offers { category_id }) => {
            let category = app.state.marketplace.iter().find(|c| &c.id == category_id);
            render_offers(f, f.area(), category, &app.config);
        }
        Some(Modal::ConfirmDeleteRoutine { routine_id, selection }) => {
            let routine = app.state.geyser.routines.iter().find(|r| r.id == *routine_id);
            render_confirm_delete(f, f.area(), routine, *selection, &app.config);
        }
        Some(Modal::Receipt(receipt)) => render_receipt(f, f.area(), receipt, &app.config),
        None => {}
    }

    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &app.key_hints(),
        &app.config,
    );
}

fn render_input_popup(f: &mut Frame, app: &App, title: &str, value: &str, cursor: usize) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let popup = popup_area(f.area(), 50, 20);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(format!(" {}", value))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(accent))
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(paragraph, popup);

    // Place the terminal cursor after the character the edit cursor sits on.
    let x = popup.x + 2 + cursor as u16;
    let y = popup.y + 1;
    if x < popup.x + popup.width.saturating_sub(1) {
        f.set_cursor_position(Position::new(x, y));
    }
}
