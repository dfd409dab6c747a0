use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::receipt::parse_receipt_text;
use crate::state::{DAY_ABBREVS, CodeKind, HeatMode, Page, Timeframe, UNCATEGORIZED, TagOutcome};
use crate::capture::{CaptureError, PlainTextRecognizer, TextRecognizer};
use crate::tui::app::{
    App, FocusArea, HotBotState, HotBotTab, InputTarget, Modal, ReceiptStage, ReceiptState,
    Refresh, Row, SettingRow, SidebarState, SolarState, SolarTab, Tile, WizardField,
};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::input::Input;
use crate::utils::{binding_matches, has_primary_modifier};
use crate::wizard::{ROUTINE_TYPES, RoutineWizard, WizardStep};

/// Guard that ensures terminal state is restored even on panic.
/// A terminal left in raw mode or the alternate screen is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors are ignored here; this is already the cleanup path.
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the
    // error lands in the normal terminal.
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        // A running scanner session delivers at most one decode.
        if app.scanner.is_running() {
            if let Some(code) = app.scanner.poll() {
                app.pending_card_code = Some(code);
                app.input = Some((InputTarget::CardName, Input::new()));
                app.set_status_message("Code captured. Name the card to save it.");
            }
        }

        let terminal_size = terminal.size()?;
        let terminal_rect = ratatui::layout::Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only Press events; Release would double-fire on Windows.
                    if key_event.kind == KeyEventKind::Press
                        && handle_key_event(&mut app, key_event)?
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    // The scanner holds its device until explicitly released.
    app.scanner.stop();

    guard.restore()?;
    Ok(())
}

pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.modal.is_some() {
        handle_modal_key(app, key_event)?;
        return Ok(false);
    }
    if app.input.is_some() {
        handle_input_key(app, key_event)?;
        return Ok(false);
    }
    handle_view_key(app, key_event)
}

fn handle_view_key(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if binding_matches(&kb.quit, &key_event) {
        return Ok(true);
    }
    if binding_matches(&kb.help, &key_event) {
        app.modal = Some(Modal::Help);
        return Ok(false);
    }
    if binding_matches(&kb.settings, &key_event) {
        app.navigate(Page::Settings)?;
        return Ok(false);
    }
    if binding_matches(&kb.toggle_sidebar, &key_event) {
        app.ui.sidebar_state = match app.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
        if app.ui.sidebar_state == SidebarState::Collapsed {
            app.ui.focus = FocusArea::Main;
        }
        return Ok(false);
    }
    if key_event.code == KeyCode::Tab && app.ui.sidebar_state == SidebarState::Expanded {
        app.ui.focus = match app.ui.focus {
            FocusArea::Sidebar => FocusArea::Main,
            FocusArea::Main => FocusArea::Sidebar,
        };
        return Ok(false);
    }

    if app.ui.focus == FocusArea::Sidebar {
        return handle_sidebar_key(app, key_event);
    }

    // Esc backs out to the home page from anywhere.
    if key_event.code == KeyCode::Esc && app.state.current_page != Page::Home {
        app.navigate(Page::Home)?;
        return Ok(false);
    }

    if key_event.code == KeyCode::Up || binding_matches(&kb.list_up, &key_event) {
        app.select_up();
        return Ok(false);
    }
    if key_event.code == KeyCode::Down || binding_matches(&kb.list_down, &key_event) {
        app.select_down();
        return Ok(false);
    }

    match app.state.current_page {
        Page::Home => handle_home_key(app, key_event)?,
        Page::Grocery => handle_grocery_key(app, key_event)?,
        Page::Pantry => handle_pantry_key(app, key_event)?,
        Page::Todo => handle_todo_key(app, key_event)?,
        Page::Rewards => handle_rewards_key(app, key_event)?,
        Page::Buy => handle_buy_key(app, key_event)?,
        Page::Meals => handle_meals_key(app, key_event)?,
        Page::Settings => handle_settings_key(app, key_event)?,
    }
    Ok(false)
}

fn handle_sidebar_key(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();
    match key_event.code {
        KeyCode::Up => {
            app.ui.sidebar_index = app.ui.sidebar_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.ui.sidebar_index + 1 < Page::ALL.len() {
                app.ui.sidebar_index += 1;
            }
        }
        KeyCode::Esc => {
            app.ui.focus = FocusArea::Main;
        }
        _ if binding_matches(&kb.list_up, &key_event) => {
            app.ui.sidebar_index = app.ui.sidebar_index.saturating_sub(1);
        }
        _ if binding_matches(&kb.list_down, &key_event) => {
            if app.ui.sidebar_index + 1 < Page::ALL.len() {
                app.ui.sidebar_index += 1;
            }
        }
        _ if binding_matches(&kb.select, &key_event) => {
            app.navigate(Page::ALL[app.ui.sidebar_index])?;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_home_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if !binding_matches(&kb.select, &key_event) {
        return Ok(());
    }
    let Some(Row::Tile(tile)) = app.selected_row() else {
        return Ok(());
    };
    match tile {
        Tile::Meals => app.navigate(Page::Meals)?,
        Tile::Grocery => app.navigate(Page::Grocery)?,
        Tile::Pantry => app.navigate(Page::Pantry)?,
        Tile::Todo => app.navigate(Page::Todo)?,
        Tile::Rewards => app.navigate(Page::Rewards)?,
        Tile::Buy => app.navigate(Page::Buy)?,
        Tile::HotBot => {
            app.modal = Some(Modal::HotBot(HotBotState::new()));
        }
        Tile::Solar => {
            app.modal = Some(Modal::Solar(SolarState {
                tab: SolarTab::Status,
                timeframe: Timeframe::Day,
            }));
        }
    }
    Ok(())
}

fn handle_grocery_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.new, &key_event) {
        app.input = Some((InputTarget::NewGrocery, Input::new()));
    } else if binding_matches(&kb.toggle_done, &key_event) {
        if let Some(Row::Grocery(id)) = app.selected_row() {
            // Check-off flips in place; any pantry promotion becomes
            // visible when that page next rebuilds.
            app.state.toggle_grocery(id);
            app.refresh(Refresh::Patch)?;
        }
    } else if binding_matches(&kb.delete, &key_event) {
        if let Some(Row::Grocery(id)) = app.selected_row() {
            app.state.remove_grocery(id);
            app.refresh(Refresh::Full)?;
        }
    } else if binding_matches(&kb.import_receipt, &key_event) {
        app.modal = Some(Modal::Receipt(ReceiptState::new()));
    }
    Ok(())
}

fn handle_pantry_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();

    // An open tag picker captures navigation until closed.
    if let Some(item_id) = app.state.editing_pantry_item_id {
        match key_event.code {
            KeyCode::Up => {
                app.ui.tag_picker_index = app.ui.tag_picker_index.saturating_sub(1);
            }
            KeyCode::Down => {
                if app.ui.tag_picker_index + 1 < app.state.pantry_tags.len() {
                    app.ui.tag_picker_index += 1;
                }
            }
            KeyCode::Enter => {
                let tag = app.state.pantry_tags[app.ui.tag_picker_index].clone();
                app.state.set_pantry_tag(item_id, &tag);
                app.state.editing_pantry_item_id = None;
                app.refresh(Refresh::Full)?;
            }
            KeyCode::Esc => {
                app.state.editing_pantry_item_id = None;
                app.refresh(Refresh::Full)?;
            }
            _ => {}
        }
        return Ok(());
    }

    if binding_matches(&kb.new, &key_event) {
        app.input = Some((InputTarget::NewPantryItem, Input::new()));
    } else if key_event.code == KeyCode::Char('g') && !has_primary_modifier(key_event.modifiers) {
        app.input = Some((InputTarget::NewPantryTag, Input::new()));
    } else if binding_matches(&kb.edit, &key_event) {
        if let Some(Row::Pantry(id)) = app.selected_row() {
            let current_tag = app
                .state
                .pantry
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.tag.clone())
                .unwrap_or_default();
            app.ui.tag_picker_index = app
                .state
                .pantry_tags
                .iter()
                .position(|t| *t == current_tag)
                .unwrap_or(0);
            app.state.editing_pantry_item_id = Some(id);
            app.refresh(Refresh::Patch)?;
        }
    } else if binding_matches(&kb.move_item, &key_event) {
        if let Some(Row::Pantry(id)) = app.selected_row() {
            app.state.move_pantry_to_grocery(id);
            app.refresh(Refresh::Full)?;
        }
    } else if binding_matches(&kb.delete, &key_event) {
        if let Some(Row::Pantry(id)) = app.selected_row() {
            app.state.remove_pantry(id);
            app.refresh(Refresh::Full)?;
        }
    } else if binding_matches(&kb.show_all, &key_event) {
        app.state.pantry_show_all = !app.state.pantry_show_all;
        app.refresh(Refresh::Full)?;
    } else if binding_matches(&kb.select, &key_event) {
        if let Some(Row::TagHeader(tag)) = app.selected_row() {
            app.state.toggle_collapsed_tag(&tag);
            app.refresh(Refresh::Full)?;
        }
    } else if binding_matches(&kb.import_receipt, &key_event) {
        app.modal = Some(Modal::Receipt(ReceiptState::new()));
    }
    Ok(())
}

fn handle_todo_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.new, &key_event) {
        app.input = Some((InputTarget::NewTodo, Input::new()));
    } else if binding_matches(&kb.toggle_done, &key_event) {
        if let Some(Row::Todo(id)) = app.selected_row() {
            app.state.toggle_todo(id);
            app.refresh(Refresh::Patch)?;
        }
    } else if binding_matches(&kb.delete, &key_event) {
        if let Some(Row::Todo(id)) = app.selected_row() {
            app.state.remove_todo(id);
            app.refresh(Refresh::Full)?;
        }
    }
    Ok(())
}

fn handle_rewards_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.new, &key_event) {
        app.pending_card_code = None;
        app.input = Some((InputTarget::CardName, Input::new()));
    } else if binding_matches(&kb.scan, &key_event) {
        match app.scanner.start() {
            Ok(()) => app.set_status_message("Scanning..."),
            Err(e) => app.set_status_message(format!("{}", e)),
        }
    } else if binding_matches(&kb.favorite, &key_event) {
        if let Some(Row::Card(id)) = app.selected_row() {
            app.state.set_favorite(id);
            app.refresh(Refresh::Patch)?;
        }
    } else if binding_matches(&kb.select, &key_event) {
        if let Some(Row::Card(id)) = app.selected_row() {
            app.open_code_display(id);
        }
    } else if binding_matches(&kb.delete, &key_event) {
        if let Some(Row::Card(id)) = app.selected_row() {
            app.state.remove_card(id);
            app.refresh(Refresh::Full)?;
        }
    }
    Ok(())
}

fn handle_buy_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.select, &key_event) {
        if let Some(Row::Category(category_id)) = app.selected_row() {
            app.modal = Some(Modal::Offers { category_id });
        }
    }
    Ok(())
}

fn handle_meals_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if binding_matches(&kb.tab_left, &key_event) {
        app.state.meal_plan.selected_day = app.state.meal_plan.selected_day.prev();
        app.refresh(Refresh::Full)?;
    } else if binding_matches(&kb.tab_right, &key_event) {
        app.state.meal_plan.selected_day = app.state.meal_plan.selected_day.next();
        app.refresh(Refresh::Full)?;
    } else if binding_matches(&kb.select, &key_event) || binding_matches(&kb.edit, &key_event) {
        if let Some(Row::Meal(slot)) = app.selected_row() {
            let day = app.state.meal_plan.selected_day;
            let current = app.state.meal_plan.day(day).slot(slot).to_string();
            app.input = Some((InputTarget::Meal(slot), Input::from_str(&current)));
        }
    }
    Ok(())
}

fn handle_settings_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    let activate =
        binding_matches(&kb.select, &key_event) || binding_matches(&kb.toggle_done, &key_event);
    if !activate {
        return Ok(());
    }
    match app.selected_row() {
        Some(Row::Setting(SettingRow::Theme)) => {
            let themes = app.config.get_available_themes();
            if let Some(pos) = themes.iter().position(|t| *t == app.config.current_theme) {
                let next = themes[(pos + 1) % themes.len()].clone();
                app.config.set_theme(&next)?;
            } else if let Some(first) = themes.first() {
                let first = first.clone();
                app.config.set_theme(&first)?;
            }
            let profile = app.profile;
            app.config.save_with_profile(profile)?;
        }
        Some(Row::Setting(SettingRow::LoadsheddingArea)) => {
            let current = app.state.settings.loadshedding.area.clone().unwrap_or_default();
            app.input = Some((InputTarget::LoadsheddingArea, Input::from_str(&current)));
        }
        Some(Row::Setting(SettingRow::LoadsheddingNotifications)) => {
            app.state.settings.loadshedding.notifications =
                !app.state.settings.loadshedding.notifications;
            app.refresh(Refresh::Patch)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_input_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let Some((target, mut input)) = app.input.take() else {
        return Ok(());
    };

    match key_event.code {
        KeyCode::Esc => {
            app.pending_card_name = None;
            app.pending_card_code = None;
            return Ok(());
        }
        KeyCode::Enter => {
            return commit_input(app, target, input.value());
        }
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => {
            input.insert_char(c);
        }
        _ => {}
    }

    app.input = Some((target, input));
    Ok(())
}

fn commit_input(app: &mut App, target: InputTarget, value: String) -> Result<(), TuiError> {
    match target {
        InputTarget::NewGrocery => {
            if app.state.add_grocery(&value) {
                app.refresh(Refresh::Full)?;
            }
        }
        InputTarget::NewTodo => {
            if app.state.add_todo(&value) {
                app.refresh(Refresh::Full)?;
            }
        }
        InputTarget::NewPantryItem => {
            let tag = app
                .state
                .last_used_pantry_tag
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            if app.state.add_pantry_item(&value, &tag) {
                app.refresh(Refresh::Full)?;
            }
        }
        InputTarget::NewPantryTag => match app.state.add_pantry_tag(&value) {
            TagOutcome::Added => {
                app.refresh(Refresh::Full)?;
            }
            TagOutcome::Duplicate => {
                app.set_status_message(format!("Category \"{}\" already exists", value.trim()));
            }
            TagOutcome::Empty => {
                app.set_status_message("Category name cannot be empty");
            }
        },
        InputTarget::CardName => {
            if value.trim().is_empty() {
                app.set_status_message("Card name cannot be empty");
                app.input = Some((InputTarget::CardName, Input::from_str(&value)));
                return Ok(());
            }
            if let Some(code) = app.pending_card_code.take() {
                // Scanned flow: the code arrived first.
                if app.state.add_card(&value, &code, code_kind_for(&code)) {
                    app.refresh(Refresh::Full)?;
                    app.set_status_message("Card saved");
                }
            } else {
                app.pending_card_name = Some(value);
                app.input = Some((InputTarget::CardCode, Input::new()));
            }
        }
        InputTarget::CardCode => {
            let Some(name) = app.pending_card_name.take() else {
                return Ok(());
            };
            if app.state.add_card(&name, &value, code_kind_for(&value)) {
                app.refresh(Refresh::Full)?;
            } else {
                app.set_status_message("Card number cannot be empty");
                app.pending_card_name = Some(name);
                app.input = Some((InputTarget::CardCode, Input::from_str(&value)));
            }
        }
        InputTarget::Meal(slot) => {
            // Meal edits keep the row structure; the snapshot still lands.
            let day = app.state.meal_plan.selected_day;
            *app.state.meal_plan.day_mut(day).slot_mut(slot) = value.trim().to_string();
            app.refresh(Refresh::Patch)?;
        }
        InputTarget::LoadsheddingArea => {
            let trimmed = value.trim();
            app.state.settings.loadshedding.area = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
            app.refresh(Refresh::Patch)?;
        }
    }
    Ok(())
}

/// URL payloads display as QR grids, plain numbers as barcodes.
fn code_kind_for(code: &str) -> CodeKind {
    if code.trim_start().starts_with("http") {
        CodeKind::Qrcode
    } else {
        CodeKind::Barcode
    }
}

fn handle_modal_key(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let Some(modal) = app.modal.take() else {
        return Ok(());
    };
    match modal {
        Modal::Help => {
            let kb = app.config.key_bindings.clone();
            let closes = key_event.code == KeyCode::Esc
                || binding_matches(&kb.help, &key_event)
                || binding_matches(&kb.quit, &key_event);
            if !closes {
                app.modal = Some(Modal::Help);
            }
        }
        Modal::Offers { category_id } => {
            if key_event.code != KeyCode::Esc {
                app.modal = Some(Modal::Offers { category_id });
            }
        }
        Modal::CodeDisplay { card_id, lines } => {
            if key_event.code != KeyCode::Esc && key_event.code != KeyCode::Enter {
                app.modal = Some(Modal::CodeDisplay { card_id, lines });
            }
        }
        Modal::ConfirmDeleteRoutine {
            routine_id,
            selection,
        } => {
            handle_confirm_delete_key(app, key_event, routine_id, selection)?;
        }
        Modal::Solar(solar) => {
            handle_solar_key(app, key_event, solar);
        }
        Modal::HotBot(hotbot) => {
            handle_hotbot_key(app, key_event, hotbot)?;
        }
        Modal::Receipt(receipt) => {
            handle_receipt_key(app, key_event, receipt)?;
        }
    }
    Ok(())
}

fn handle_confirm_delete_key(
    app: &mut App,
    key_event: KeyEvent,
    routine_id: i64,
    mut selection: usize,
) -> Result<(), TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down => {
            selection = 1 - selection;
            app.modal = Some(Modal::ConfirmDeleteRoutine {
                routine_id,
                selection,
            });
        }
        KeyCode::Enter => {
            if selection == 0 {
                app.state.remove_routine(routine_id);
                app.refresh(Refresh::Full)?;
                app.set_status_message("Routine deleted");
            }
            let mut hotbot = HotBotState::new();
            hotbot.tab = HotBotTab::Routines;
            app.modal = Some(Modal::HotBot(hotbot));
        }
        KeyCode::Esc => {
            let mut hotbot = HotBotState::new();
            hotbot.tab = HotBotTab::Routines;
            app.modal = Some(Modal::HotBot(hotbot));
        }
        _ => {
            app.modal = Some(Modal::ConfirmDeleteRoutine {
                routine_id,
                selection,
            });
        }
    }
    Ok(())
}

fn handle_solar_key(app: &mut App, key_event: KeyEvent, mut solar: SolarState) {
    match key_event.code {
        KeyCode::Esc => return,
        KeyCode::Left | KeyCode::Right => {
            solar.tab = match solar.tab {
                SolarTab::Status => SolarTab::Insights,
                SolarTab::Insights => SolarTab::Status,
            };
        }
        KeyCode::Tab if solar.tab == SolarTab::Insights => {
            let pos = Timeframe::ALL
                .iter()
                .position(|t| *t == solar.timeframe)
                .unwrap_or(0);
            solar.timeframe = Timeframe::ALL[(pos + 1) % Timeframe::ALL.len()];
        }
        KeyCode::Char(c @ '1'..='4') if solar.tab == SolarTab::Insights => {
            let index = (c as usize) - ('1' as usize);
            solar.timeframe = Timeframe::ALL[index];
        }
        _ => {}
    }
    app.modal = Some(Modal::Solar(solar));
}

fn handle_hotbot_key(
    app: &mut App,
    key_event: KeyEvent,
    mut hotbot: HotBotState,
) -> Result<(), TuiError> {
    if hotbot.wizard.is_some() {
        return handle_wizard_key(app, key_event, hotbot);
    }

    let routines_len = app.state.geyser.routines.len();
    match key_event.code {
        KeyCode::Esc => return Ok(()),
        KeyCode::Left => {
            let pos = HotBotTab::ALL.iter().position(|t| *t == hotbot.tab).unwrap_or(0);
            hotbot.tab = HotBotTab::ALL[(pos + HotBotTab::ALL.len() - 1) % HotBotTab::ALL.len()];
        }
        KeyCode::Right => {
            let pos = HotBotTab::ALL.iter().position(|t| *t == hotbot.tab).unwrap_or(0);
            hotbot.tab = HotBotTab::ALL[(pos + 1) % HotBotTab::ALL.len()];
        }
        KeyCode::Char('s') if hotbot.tab == HotBotTab::Status => {
            app.state.geyser.solar_mode = !app.state.geyser.solar_mode;
            app.refresh(Refresh::Patch)?;
        }
        KeyCode::Up if hotbot.tab == HotBotTab::Routines => {
            hotbot.selection = hotbot.selection.saturating_sub(1);
        }
        KeyCode::Down if hotbot.tab == HotBotTab::Routines => {
            if hotbot.selection + 1 < routines_len {
                hotbot.selection += 1;
            }
        }
        KeyCode::Char(' ') if hotbot.tab == HotBotTab::Routines => {
            if let Some(routine) = app.state.geyser.routines.get(hotbot.selection) {
                let id = routine.id;
                app.state.toggle_routine(id);
                app.refresh(Refresh::Patch)?;
            }
        }
        KeyCode::Char('n') if hotbot.tab == HotBotTab::Routines => {
            hotbot.wizard = Some(RoutineWizard::add());
            hotbot.sync_from_wizard();
        }
        KeyCode::Char('e') if hotbot.tab == HotBotTab::Routines => {
            if let Some(routine) = app.state.geyser.routines.get(hotbot.selection) {
                hotbot.wizard = Some(RoutineWizard::edit(routine));
                hotbot.sync_from_wizard();
            }
        }
        KeyCode::Char('d') if hotbot.tab == HotBotTab::Routines => {
            if let Some(routine) = app.state.geyser.routines.get(hotbot.selection) {
                // Destructive, so the modal defaults to Cancel.
                app.modal = Some(Modal::ConfirmDeleteRoutine {
                    routine_id: routine.id,
                    selection: 1,
                });
                return Ok(());
            }
        }
        _ => {}
    }
    app.modal = Some(Modal::HotBot(hotbot));
    Ok(())
}

fn handle_wizard_key(
    app: &mut App,
    key_event: KeyEvent,
    mut hotbot: HotBotState,
) -> Result<(), TuiError> {
    let Some(mut wizard) = hotbot.wizard.take() else {
        app.modal = Some(Modal::HotBot(hotbot));
        return Ok(());
    };

    if key_event.code == KeyCode::Esc {
        // Back one step; from step 1 the wizard closes without committing.
        if wizard.step == WizardStep::Schedule {
            wizard.capture_times(&hotbot.start_input.value(), &hotbot.end_input.value());
        }
        if wizard.back() {
            hotbot.wizard = Some(wizard);
        }
        app.modal = Some(Modal::HotBot(hotbot));
        return Ok(());
    }

    match wizard.step {
        WizardStep::ChooseType => match key_event.code {
            KeyCode::Up => {
                hotbot.type_selection = hotbot.type_selection.saturating_sub(1);
            }
            KeyCode::Down => {
                if hotbot.type_selection + 1 < ROUTINE_TYPES.len() {
                    hotbot.type_selection += 1;
                }
            }
            KeyCode::Enter => {
                wizard.choose_type(ROUTINE_TYPES[hotbot.type_selection]);
            }
            _ => {}
        },
        WizardStep::Schedule => match key_event.code {
            KeyCode::Tab => {
                hotbot.field = match hotbot.field {
                    WizardField::Start => WizardField::End,
                    WizardField::End => WizardField::Days,
                    WizardField::Days => WizardField::Start,
                };
            }
            KeyCode::Left if hotbot.field == WizardField::Days => {
                hotbot.day_cursor = hotbot.day_cursor.saturating_sub(1);
            }
            KeyCode::Right if hotbot.field == WizardField::Days => {
                if hotbot.day_cursor + 1 < DAY_ABBREVS.len() {
                    hotbot.day_cursor += 1;
                }
            }
            KeyCode::Char(' ') if hotbot.field == WizardField::Days => {
                // The time inputs are sampled on every day toggle, same as
                // on Next, so a later commit never sees stale times.
                wizard.capture_times(&hotbot.start_input.value(), &hotbot.end_input.value());
                wizard.toggle_day(DAY_ABBREVS[hotbot.day_cursor]);
            }
            KeyCode::Enter => {
                wizard.capture_times(&hotbot.start_input.value(), &hotbot.end_input.value());
                wizard.next();
            }
            KeyCode::Backspace => match hotbot.field {
                WizardField::Start => hotbot.start_input.backspace(),
                WizardField::End => hotbot.end_input.backspace(),
                WizardField::Days => {}
            },
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => match hotbot.field {
                WizardField::Start => hotbot.start_input.insert_char(c),
                WizardField::End => hotbot.end_input.insert_char(c),
                WizardField::Days => {}
            },
            _ => {}
        },
        WizardStep::ChooseMode => match key_event.code {
            KeyCode::Up | KeyCode::Down => {
                hotbot.mode_selection = 1 - hotbot.mode_selection.min(1);
            }
            KeyCode::Enter => {
                let mode = if hotbot.mode_selection == 0 {
                    HeatMode::HeatOnce
                } else {
                    HeatMode::KeepWarm
                };
                wizard.choose_mode(mode);
                wizard.commit(&mut app.state);
                app.refresh(Refresh::Full)?;
                app.set_status_message("Routine saved");
                hotbot.tab = HotBotTab::Routines;
                app.modal = Some(Modal::HotBot(hotbot));
                return Ok(());
            }
            _ => {}
        },
    }

    hotbot.wizard = Some(wizard);
    app.modal = Some(Modal::HotBot(hotbot));
    Ok(())
}

fn handle_receipt_key(
    app: &mut App,
    key_event: KeyEvent,
    mut receipt: ReceiptState,
) -> Result<(), TuiError> {
    match receipt.stage {
        ReceiptStage::EnterPath => match key_event.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Enter => {
                let path = receipt.path_input.value();
                match std::fs::read(path.trim()) {
                    Ok(bytes) => {
                        let mut progress = 0u8;
                        // Unrecognizable content reviews as an empty
                        // receipt, not an error.
                        let items = match PlainTextRecognizer
                            .recognize(&bytes, &mut |p| progress = p)
                        {
                            Ok(text) => parse_receipt_text(&text),
                            Err(_) => Vec::new(),
                        };
                        receipt.progress = progress;
                        receipt.review(items);
                    }
                    Err(e) => {
                        app.set_status_message(format!("Cannot read receipt: {}", e));
                    }
                }
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Char('v') if has_primary_modifier(key_event.modifiers) => {
                match clipboard_text() {
                    Ok(text) => {
                        receipt.progress = 100;
                        receipt.review(parse_receipt_text(&text));
                    }
                    Err(e) => {
                        app.set_status_message(format!("Clipboard unavailable: {}", e));
                    }
                }
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Backspace => {
                receipt.path_input.backspace();
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Left => {
                receipt.path_input.move_left();
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Right => {
                receipt.path_input.move_right();
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Char(c) => {
                receipt.path_input.insert_char(c);
                app.modal = Some(Modal::Receipt(receipt));
            }
            _ => {
                app.modal = Some(Modal::Receipt(receipt));
            }
        },
        ReceiptStage::Review => match key_event.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Up => {
                receipt.cursor = receipt.cursor.saturating_sub(1);
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Down => {
                if receipt.cursor + 1 < receipt.items.len() {
                    receipt.cursor += 1;
                }
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Char(' ') => {
                receipt.toggle_selected();
                app.modal = Some(Modal::Receipt(receipt));
            }
            KeyCode::Enter => {
                let chosen = receipt.selected_items();
                let added = app.state.import_pantry_items(&chosen);
                app.refresh(Refresh::Full)?;
                app.set_status_message(format!(
                    "Imported {} of {} items",
                    added,
                    chosen.len()
                ));
            }
            _ => {
                app.modal = Some(Modal::Receipt(receipt));
            }
        },
    }
    Ok(())
}

fn clipboard_text() -> Result<String, CaptureError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| CaptureError::ClipboardError(e.to_string()))?;
    clipboard
        .get_text()
        .map_err(|e| CaptureError::ClipboardError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::store::Store;
    use crate::tui::app::App;
    use crate::utils::Profile;
    use crossterm::event::KeyModifiers;

    fn test_app() -> App {
        let store = Store::open_in_memory().unwrap();
        App::new(Config::default(), store, Profile::Dev).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn receipt_review_imports_only_selected_items() {
        let mut app = test_app();
        let mut receipt = ReceiptState::new();
        receipt.review(vec![
            "Milk".to_string(),
            "Bread".to_string(),
            "Eggs".to_string(),
        ]);
        app.modal = Some(Modal::Receipt(receipt));

        // Exclude the second item, then import the rest.
        handle_key_event(&mut app, key(KeyCode::Down)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();

        let names: Vec<&str> = app.state.pantry.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Eggs"]);
        assert!(app.modal.is_none());
        assert_eq!(
            app.status.message.as_deref(),
            Some("Imported 2 of 2 items")
        );
    }

    #[test]
    fn receipt_review_toggle_is_reversible() {
        let mut app = test_app();
        let mut receipt = ReceiptState::new();
        receipt.review(vec!["Milk".to_string()]);
        app.modal = Some(Modal::Receipt(receipt));

        handle_key_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_key_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.state.pantry.len(), 1);
    }

    #[test]
    fn unrecognizable_receipt_reviews_as_empty_list() {
        let path = std::env::temp_dir().join("domify-test-unrecognizable-receipt.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let mut app = test_app();
        let mut receipt = ReceiptState::new();
        receipt.path_input = Input::from_str(&path.to_string_lossy());
        app.modal = Some(Modal::Receipt(receipt));

        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();

        match app.modal {
            Some(Modal::Receipt(ref receipt)) => {
                assert_eq!(receipt.stage, ReceiptStage::Review);
                assert!(receipt.items.is_empty());
            }
            _ => panic!("receipt modal should advance to review"),
        }
        assert!(app.status.message.is_none());

        std::fs::remove_file(&path).ok();
    }
}
