use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::capture::{CodeScanner, StubScanner, render_code_lines};
use crate::state::{AppState, Day, MealSlot, Page, Timeframe};
use crate::store::Store;
use crate::tui::error::TuiError;
use crate::tui::widgets::input::Input;
use crate::utils::{Profile, format_key_binding_for_display};
use crate::wizard::RoutineWizard;
use crate::Config;

/// Status messages auto-clear after this long.
pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

/// How much of the visible tree a mutation invalidates. `Full` rebuilds the
/// derived row list and re-clamps the selection; `Patch` keeps the row
/// structure and lets the next draw pick up the changed values. Both paths
/// persist the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Full,
    Patch,
}

/// One selectable row in the main panel. Rows reference state by id, never
/// by index, so they survive list mutations until the next full refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Tile(Tile),
    Grocery(i64),
    TagHeader(String),
    Pantry(i64),
    Todo(i64),
    Card(i64),
    Category(String),
    Meal(MealSlot),
    Setting(SettingRow),
}

/// Dashboard tiles on the home page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Meals,
    HotBot,
    Solar,
    Grocery,
    Pantry,
    Todo,
    Rewards,
    Buy,
}

impl Tile {
    pub const ALL: [Tile; 8] = [
        Tile::Meals,
        Tile::HotBot,
        Tile::Solar,
        Tile::Grocery,
        Tile::Pantry,
        Tile::Todo,
        Tile::Rewards,
        Tile::Buy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingRow {
    Theme,
    LoadsheddingArea,
    LoadsheddingNotifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Sidebar,
    Main,
}

/// Where typed characters go while an inline input is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    NewGrocery,
    NewTodo,
    NewPantryItem,
    NewPantryTag,
    CardName,
    CardCode,
    Meal(MealSlot),
    LoadsheddingArea,
}

impl InputTarget {
    pub fn title(self) -> &'static str {
        match self {
            InputTarget::NewGrocery => "New grocery item",
            InputTarget::NewTodo => "New to-do",
            InputTarget::NewPantryItem => "New pantry item",
            InputTarget::NewPantryTag => "New category",
            InputTarget::CardName => "Card name",
            InputTarget::CardCode => "Card number",
            InputTarget::Meal(slot) => match slot {
                MealSlot::Breakfast => "Breakfast",
                MealSlot::Lunch => "Lunch",
                MealSlot::Dinner => "Dinner",
                MealSlot::Snacks => "Snacks",
            },
            InputTarget::LoadsheddingArea => "Loadshedding area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotBotTab {
    Status,
    Routines,
    Savings,
}

impl HotBotTab {
    pub const ALL: [HotBotTab; 3] = [HotBotTab::Status, HotBotTab::Routines, HotBotTab::Savings];

    pub fn label(self) -> &'static str {
        match self {
            HotBotTab::Status => "Status",
            HotBotTab::Routines => "Routines",
            HotBotTab::Savings => "Savings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarTab {
    Status,
    Insights,
}

impl SolarTab {
    pub fn label(self) -> &'static str {
        match self {
            SolarTab::Status => "Status",
            SolarTab::Insights => "Insights",
        }
    }
}

/// Which schedule-step control has focus inside the routine wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardField {
    Start,
    End,
    Days,
}

#[derive(Debug, Clone)]
pub struct HotBotState {
    pub tab: HotBotTab,
    pub selection: usize,
    pub wizard: Option<RoutineWizard>,
    pub type_selection: usize,
    pub mode_selection: usize,
    pub field: WizardField,
    pub start_input: Input,
    pub end_input: Input,
    pub day_cursor: usize,
}

impl HotBotState {
    pub fn new() -> Self {
        Self {
            tab: HotBotTab::Status,
            selection: 0,
            wizard: None,
            type_selection: 0,
            mode_selection: 0,
            field: WizardField::Start,
            start_input: Input::new(),
            end_input: Input::new(),
            day_cursor: 0,
        }
    }

    /// Reset the step-local controls from the wizard draft when a wizard
    /// opens (the edit flow seeds the inputs with the existing times).
    pub fn sync_from_wizard(&mut self) {
        if let Some(ref wizard) = self.wizard {
            self.start_input = Input::from_str(&wizard.draft.start_time);
            self.end_input = Input::from_str(&wizard.draft.end_time);
        }
        self.type_selection = 0;
        self.mode_selection = 0;
        self.field = WizardField::Start;
        self.day_cursor = 0;
    }
}

#[derive(Debug, Clone)]
pub struct SolarState {
    pub tab: SolarTab,
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStage {
    EnterPath,
    Review,
}

#[derive(Debug, Clone)]
pub struct ReceiptState {
    pub stage: ReceiptStage,
    pub path_input: Input,
    pub progress: u8,
    pub items: Vec<String>,
    /// Per-item include flags for the review stage, parallel to `items`.
    pub selected: Vec<bool>,
    pub cursor: usize,
}

impl ReceiptState {
    pub fn new() -> Self {
        Self {
            stage: ReceiptStage::EnterPath,
            path_input: Input::new(),
            progress: 0,
            items: Vec::new(),
            selected: Vec::new(),
            cursor: 0,
        }
    }

    /// Move to the review stage with every parsed item selected. A failed
    /// or empty extraction reviews as an empty list rather than an error.
    pub fn review(&mut self, items: Vec<String>) {
        self.selected = vec![true; items.len()];
        self.items = items;
        self.cursor = 0;
        self.stage = ReceiptStage::Review;
    }

    pub fn toggle_selected(&mut self) {
        if let Some(flag) = self.selected.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    pub fn selected_items(&self) -> Vec<String> {
        self.items
            .iter()
            .zip(&self.selected)
            .filter(|(_, keep)| **keep)
            .map(|(item, _)| item.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum Modal {
    Help,
    HotBot(HotBotState),
    Solar(SolarState),
    CodeDisplay { card_id: i64, lines: Vec<String> },
    Offers { category_id: String },
    ConfirmDeleteRoutine { routine_id: i64, selection: usize },
    Receipt(ReceiptState),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_state: SidebarState,
    pub focus: FocusArea,
    pub sidebar_index: usize,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Tag picker cursor while a pantry item's tag is being edited.
    pub tag_picker_index: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_state: SidebarState::Expanded,
            focus: FocusArea::Main,
            sidebar_index: 0,
            selected_index: 0,
            list_state: ListState::default(),
            tag_picker_index: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub profile: Profile,
    pub store: Store,
    pub state: AppState,

    /// Derived row list for the current page, rebuilt on full refresh.
    pub rows: Vec<Row>,

    pub ui: UiState,
    pub status: StatusState,
    pub modal: Option<Modal>,
    pub input: Option<(InputTarget, Input)>,
    pub pending_card_name: Option<String>,
    pub pending_card_code: Option<String>,
    pub scanner: Box<dyn CodeScanner>,
}

impl App {
    pub fn new(config: Config, store: Store, profile: Profile) -> Result<Self, TuiError> {
        let state = store.load_or_default(Day::today())?;
        // Persist the migrated shape immediately so a crash before the
        // first mutation still leaves a current-schema snapshot.
        store.save(&state)?;

        let mut app = Self {
            config,
            profile,
            store,
            state,
            rows: Vec::new(),
            ui: UiState::default(),
            status: StatusState::default(),
            modal: None,
            input: None,
            pending_card_name: None,
            pending_card_code: None,
            scanner: Box::new(StubScanner::new(vec!["6001087378543".to_string()])),
        };
        app.rebuild_rows();
        app.sync_sidebar_index();
        app.ui.list_state.select(if app.rows.is_empty() { None } else { Some(0) });
        Ok(app)
    }

    /// Apply a mutation's refresh level and persist the state.
    pub fn refresh(&mut self, level: Refresh) -> Result<(), TuiError> {
        if level == Refresh::Full {
            self.rebuild_rows();
            self.clamp_selection();
        }
        self.store.save(&self.state)?;
        Ok(())
    }

    /// Rebuild the derived row list for the current page from state.
    pub fn rebuild_rows(&mut self) {
        self.rows.clear();
        match self.state.current_page {
            Page::Home => {
                self.rows.extend(Tile::ALL.iter().map(|t| Row::Tile(*t)));
            }
            Page::Grocery => {
                self.rows
                    .extend(self.state.grocery_list.iter().map(|i| Row::Grocery(i.id)));
            }
            Page::Pantry => {
                if self.state.pantry_show_all {
                    self.rows
                        .extend(self.state.pantry.iter().map(|i| Row::Pantry(i.id)));
                } else {
                    for tag in self.state.pantry_tags.clone() {
                        let items: Vec<i64> = self
                            .state
                            .pantry
                            .iter()
                            .filter(|i| i.tag == tag)
                            .map(|i| i.id)
                            .collect();
                        if items.is_empty() {
                            continue;
                        }
                        self.rows.push(Row::TagHeader(tag.clone()));
                        if !self.state.collapsed_tags.contains(&tag) {
                            self.rows.extend(items.into_iter().map(Row::Pantry));
                        }
                    }
                }
            }
            Page::Todo => {
                self.rows.extend(self.state.todos.iter().map(|t| Row::Todo(t.id)));
            }
            Page::Rewards => {
                self.rows
                    .extend(self.state.rewards_cards.iter().map(|c| Row::Card(c.id)));
            }
            Page::Buy => {
                self.rows.extend(
                    self.state
                        .marketplace
                        .iter()
                        .map(|c| Row::Category(c.id.clone())),
                );
            }
            Page::Meals => {
                self.rows.extend(MealSlot::ALL.iter().map(|s| Row::Meal(*s)));
            }
            Page::Settings => {
                self.rows.push(Row::Setting(SettingRow::Theme));
                self.rows.push(Row::Setting(SettingRow::LoadsheddingArea));
                self.rows
                    .push(Row::Setting(SettingRow::LoadsheddingNotifications));
            }
        }
    }

    /// Keep the selection inside the rebuilt row list.
    pub fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            if self.ui.selected_index >= self.rows.len() {
                self.ui.selected_index = self.rows.len() - 1;
            }
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.rows.get(self.ui.selected_index).cloned()
    }

    pub fn select_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
        }
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn select_down(&mut self) {
        if !self.rows.is_empty() && self.ui.selected_index + 1 < self.rows.len() {
            self.ui.selected_index += 1;
        }
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn navigate(&mut self, page: Page) -> Result<(), TuiError> {
        self.state.current_page = page;
        self.ui.selected_index = 0;
        self.ui.focus = FocusArea::Main;
        self.sync_sidebar_index();
        self.refresh(Refresh::Full)
    }

    fn sync_sidebar_index(&mut self) {
        self.ui.sidebar_index = Page::ALL
            .iter()
            .position(|p| *p == self.state.current_page)
            .unwrap_or(0);
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }

    /// Open the code display modal for a card. Glyph lines are generated
    /// once here; a generation failure becomes a status message and the
    /// modal stays closed.
    pub fn open_code_display(&mut self, card_id: i64) {
        let Some(card) = self.state.rewards_cards.iter().find(|c| c.id == card_id) else {
            return;
        };
        match render_code_lines(&card.barcode, card.kind) {
            Ok(lines) => {
                self.modal = Some(Modal::CodeDisplay { card_id, lines });
            }
            Err(e) => {
                self.set_status_message(format!("Cannot display code: {}", e));
            }
        }
    }

    /// The meal the home tile shows, picked by wall-clock time: breakfast
    /// until 10:30, lunch until 14:00, dinner after.
    pub fn current_meal_slot() -> MealSlot {
        use chrono::Timelike;
        let now = chrono::Local::now();
        let minutes = now.hour() * 60 + now.minute();
        if minutes < 10 * 60 + 30 {
            MealSlot::Breakfast
        } else if minutes < 14 * 60 {
            MealSlot::Lunch
        } else {
            MealSlot::Dinner
        }
    }

    /// Key hints for the status bar, per page.
    pub fn key_hints(&self) -> Vec<String> {
        let kb = &self.config.key_bindings;
        let hint = |key: &str, action: &str| {
            format!("{}: {}", format_key_binding_for_display(key), action)
        };
        let mut hints = vec![hint(&kb.quit, "quit"), hint(&kb.help, "help")];
        match self.state.current_page {
            Page::Home => {
                hints.push(hint(&kb.select, "open"));
            }
            Page::Grocery => {
                hints.push(hint(&kb.new, "add"));
                hints.push(hint(&kb.toggle_done, "check"));
                hints.push(hint(&kb.delete, "delete"));
            }
            Page::Pantry => {
                hints.push(hint(&kb.new, "add"));
                hints.push(hint("g", "new category"));
                hints.push(hint(&kb.edit, "re-tag"));
                hints.push(hint(&kb.move_item, "to grocery"));
                hints.push(hint(&kb.show_all, "show all"));
                hints.push(hint(&kb.import_receipt, "receipt"));
            }
            Page::Todo => {
                hints.push(hint(&kb.new, "add"));
                hints.push(hint(&kb.toggle_done, "done"));
                hints.push(hint(&kb.delete, "delete"));
            }
            Page::Rewards => {
                hints.push(hint(&kb.new, "add"));
                hints.push(hint(&kb.scan, "scan"));
                hints.push(hint(&kb.favorite, "favorite"));
                hints.push(hint(&kb.select, "show code"));
            }
            Page::Buy => {
                hints.push(hint(&kb.select, "offers"));
            }
            Page::Meals => {
                hints.push(hint(&kb.tab_left, "prev day"));
                hints.push(hint(&kb.tab_right, "next day"));
                hints.push(hint(&kb.select, "edit meal"));
            }
            Page::Settings => {
                hints.push(hint(&kb.select, "change"));
            }
        }
        hints
    }
}
