use chrono::{Datelike, Local};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Tag assigned to pantry items that were never categorized explicitly.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Day buttons in the routine wizard, Monday-first like the device app.
pub const DAY_ABBREVS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Grocery,
    Pantry,
    Todo,
    Rewards,
    Buy,
    Meals,
    Settings,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::Grocery,
        Page::Pantry,
        Page::Todo,
        Page::Rewards,
        Page::Buy,
        Page::Meals,
        Page::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Grocery => "Grocery List",
            Page::Pantry => "Pantry",
            Page::Todo => "To-Do List",
            Page::Rewards => "Rewards Cards",
            Page::Buy => "Buy",
            Page::Meals => "Meal Plan",
            Page::Settings => "Settings",
        }
    }
}

// Unknown page values in an old or hand-edited snapshot fall back to the
// home page instead of making the whole snapshot unparsable. Any value
// shape is consumed, not just strings.
impl<'de> Deserialize<'de> for Page {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("home") => Page::Home,
            Some("grocery") => Page::Grocery,
            Some("pantry") => Page::Pantry,
            Some("todo") => Page::Todo,
            Some("rewards") => Page::Rewards,
            Some("buy") => Page::Buy,
            Some("meals") => Page::Meals,
            Some("settings") => Page::Settings,
            _ => Page::Home,
        })
    }
}

/// Weekday in the planner's fixed week order (Sunday first, matching
/// the order day-of-week indexes are reported in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const WEEK: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Day::Sunday => "sunday",
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        }
    }

    fn index(self) -> usize {
        Self::WEEK.iter().position(|d| *d == self).unwrap_or(0)
    }

    pub fn next(self) -> Day {
        Self::WEEK[(self.index() + 1) % 7]
    }

    pub fn prev(self) -> Day {
        Self::WEEK[(self.index() + 6) % 7]
    }

    /// The real current weekday in local time.
    pub fn today() -> Day {
        match Local::now().weekday() {
            chrono::Weekday::Sun => Day::Sunday,
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
        }
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        // Stale values are harmless: load recomputes the selected day anyway.
        Ok(Day::WEEK
            .into_iter()
            .find(|d| Some(d.label()) == value.as_str())
            .unwrap_or(Day::Sunday))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    #[default]
    Barcode,
    Qrcode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatMode {
    #[default]
    #[serde(rename = "Heat once")]
    HeatOnce,
    #[serde(rename = "Keep warm")]
    KeepWarm,
}

impl HeatMode {
    pub fn label(self) -> &'static str {
        match self {
            HeatMode::HeatOnce => "Heat once",
            HeatMode::KeepWarm => "Keep warm",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_tag")]
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsCard {
    pub id: i64,
    pub name: String,
    pub barcode: String,
    #[serde(default)]
    pub kind: CodeKind,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealDay {
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
    // Introduced after the first release; old snapshots fill it empty.
    #[serde(default)]
    pub snacks: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snacks => "Snacks",
        }
    }
}

impl MealDay {
    pub fn slot(&self, slot: MealSlot) -> &str {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut String {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default = "default_selected_day")]
    pub selected_day: Day,
    #[serde(default)]
    pub sunday: MealDay,
    #[serde(default)]
    pub monday: MealDay,
    #[serde(default)]
    pub tuesday: MealDay,
    #[serde(default)]
    pub wednesday: MealDay,
    #[serde(default)]
    pub thursday: MealDay,
    #[serde(default)]
    pub friday: MealDay,
    #[serde(default)]
    pub saturday: MealDay,
}

impl MealPlan {
    pub fn day(&self, day: Day) -> &MealDay {
        match day {
            Day::Sunday => &self.sunday,
            Day::Monday => &self.monday,
            Day::Tuesday => &self.tuesday,
            Day::Wednesday => &self.wednesday,
            Day::Thursday => &self.thursday,
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
        }
    }

    pub fn day_mut(&mut self, day: Day) -> &mut MealDay {
        match day {
            Day::Sunday => &mut self.sunday,
            Day::Monday => &mut self.monday,
            Day::Tuesday => &mut self.tuesday,
            Day::Wednesday => &mut self.wednesday,
            Day::Thursday => &mut self.thursday,
            Day::Friday => &mut self.friday,
            Day::Saturday => &mut self.saturday,
        }
    }
}

impl Default for MealPlan {
    fn default() -> Self {
        Self {
            selected_day: default_selected_day(),
            sunday: MealDay::default(),
            monday: MealDay::default(),
            tuesday: MealDay::default(),
            wednesday: MealDay::default(),
            thursday: MealDay::default(),
            friday: MealDay::default(),
            saturday: MealDay::default(),
        }
    }
}

/// A committed water-heater routine. `time` and `days` keep the display
/// layout they are persisted in ("HH:MM - HH:MM", "Mon, Wed"); the wizard
/// draft works on the decomposed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeyserRoutine {
    pub id: i64,
    pub time: String,
    pub days: String,
    pub mode: HeatMode,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeyserSavings {
    pub total: f64,
    pub month_kwh: f64,
    pub month_money: f64,
}

impl Default for GeyserSavings {
    fn default() -> Self {
        Self {
            total: 3552.0,
            month_kwh: 21.28,
            month_money: 101.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geyser {
    #[serde(default = "default_geyser_temperature")]
    pub temperature: i64,
    #[serde(default = "default_geyser_status")]
    pub status: String,
    #[serde(default)]
    pub routines: Vec<GeyserRoutine>,
    #[serde(default)]
    pub savings: GeyserSavings,
    #[serde(default)]
    pub solar_mode: bool,
}

impl Default for Geyser {
    fn default() -> Self {
        Self {
            temperature: default_geyser_temperature(),
            status: default_geyser_status(),
            routines: Vec::new(),
            savings: GeyserSavings::default(),
            solar_mode: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub home: f64,
    pub battery: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolarInsight {
    pub date_range: String,
    pub energy_used: f64,
    pub solar_percent: u8,
    pub grid_percent: u8,
    pub from_solar: f64,
    pub to_grid: f64,
    pub from_grid: f64,
    pub impact: u8,
    #[serde(default)]
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Day => "1d",
            Timeframe::Week => "7d",
            Timeframe::Month => "4w",
            Timeframe::Year => "1y",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarInsights {
    pub day: SolarInsight,
    pub week: SolarInsight,
    pub month: SolarInsight,
    pub year: SolarInsight,
}

impl SolarInsights {
    pub fn get(&self, timeframe: Timeframe) -> &SolarInsight {
        match timeframe {
            Timeframe::Day => &self.day,
            Timeframe::Week => &self.week,
            Timeframe::Month => &self.month,
            Timeframe::Year => &self.year,
        }
    }
}

impl Default for SolarInsights {
    fn default() -> Self {
        let bars = |labels: &[&str], values: &[(f64, f64)]| {
            labels
                .iter()
                .zip(values)
                .map(|(label, (home, battery))| ChartBar {
                    label: (*label).to_string(),
                    home: *home,
                    battery: *battery,
                })
                .collect::<Vec<_>>()
        };
        Self {
            day: SolarInsight {
                date_range: "Today".to_string(),
                energy_used: 14.2,
                solar_percent: 78,
                grid_percent: 22,
                from_solar: 11.1,
                to_grid: 1.4,
                from_grid: 3.1,
                impact: 82,
                chart: bars(
                    &["06", "09", "12", "15", "18", "21"],
                    &[(0.4, 0.2), (1.1, 0.9), (1.8, 1.4), (1.6, 1.0), (2.2, 0.3), (1.3, 0.0)],
                ),
            },
            week: SolarInsight {
                date_range: "This week".to_string(),
                energy_used: 96.4,
                solar_percent: 71,
                grid_percent: 29,
                from_solar: 68.4,
                to_grid: 9.8,
                from_grid: 28.0,
                impact: 77,
                chart: bars(
                    &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
                    &[
                        (9.8, 3.2),
                        (10.4, 2.8),
                        (8.9, 3.5),
                        (11.2, 2.1),
                        (9.5, 3.0),
                        (12.8, 1.9),
                        (11.4, 2.4),
                    ],
                ),
            },
            month: SolarInsight {
                date_range: "Last 4 weeks".to_string(),
                energy_used: 402.7,
                solar_percent: 69,
                grid_percent: 31,
                from_solar: 277.9,
                to_grid: 41.3,
                from_grid: 124.8,
                impact: 74,
                chart: bars(
                    &["W1", "W2", "W3", "W4"],
                    &[(71.2, 24.5), (69.8, 26.1), (74.4, 22.9), (62.5, 25.3)],
                ),
            },
            year: SolarInsight {
                date_range: "Last 12 months".to_string(),
                energy_used: 4890.0,
                solar_percent: 64,
                grid_percent: 36,
                from_solar: 3129.6,
                to_grid: 512.4,
                from_grid: 1760.4,
                impact: 70,
                chart: bars(
                    &["Q1", "Q2", "Q3", "Q4"],
                    &[(880.0, 310.0), (790.0, 290.0), (940.0, 260.0), (920.0, 300.0)],
                ),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solar {
    pub battery_percent: u8,
    pub to_home: f64,
    pub to_battery: f64,
    pub from_solar: f64,
    pub from_grid: f64,
    #[serde(default)]
    pub insights: SolarInsights,
}

impl Default for Solar {
    fn default() -> Self {
        Self {
            battery_percent: 76,
            to_home: 0.46,
            to_battery: 2.29,
            from_solar: 2.8,
            from_grid: 0.02,
            insights: SolarInsights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub deal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadshedding {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub notifications: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub loadshedding: Loadshedding,
}

/// The single root aggregate. One writer (the TUI controller), serialized
/// wholesale to the snapshot store. Top-level fields missing from an older
/// snapshot fill from the defaults below (shallow merge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default = "default_page")]
    pub current_page: Page,
    #[serde(default)]
    pub grocery_list: Vec<GroceryItem>,
    #[serde(default)]
    pub pantry: Vec<PantryItem>,
    #[serde(default = "default_pantry_tags")]
    pub pantry_tags: Vec<String>,
    #[serde(default)]
    pub pantry_show_all: bool,
    #[serde(default)]
    pub collapsed_tags: Vec<String>,
    #[serde(default)]
    pub editing_pantry_item_id: Option<i64>,
    #[serde(default)]
    pub last_used_pantry_tag: Option<String>,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    #[serde(default)]
    pub rewards_cards: Vec<RewardsCard>,
    #[serde(default)]
    pub meal_plan: MealPlan,
    #[serde(default = "default_marketplace")]
    pub marketplace: Vec<MarketCategory>,
    #[serde(default)]
    pub geyser: Geyser,
    #[serde(default)]
    pub solar: Solar,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_page: default_page(),
            grocery_list: Vec::new(),
            pantry: Vec::new(),
            pantry_tags: default_pantry_tags(),
            pantry_show_all: false,
            collapsed_tags: Vec::new(),
            editing_pantry_item_id: None,
            last_used_pantry_tag: None,
            todos: Vec::new(),
            rewards_cards: Vec::new(),
            meal_plan: MealPlan::default(),
            marketplace: default_marketplace(),
            geyser: Geyser::default(),
            solar: Solar::default(),
            settings: Settings::default(),
        }
    }
}

fn default_page() -> Page {
    Page::Home
}

fn default_selected_day() -> Day {
    Day::today()
}

fn default_tag() -> String {
    UNCATEGORIZED.to_string()
}

fn default_true() -> bool {
    true
}

fn default_geyser_temperature() -> i64 {
    48
}

fn default_geyser_status() -> String {
    "Active".to_string()
}

pub fn default_pantry_tags() -> Vec<String> {
    vec![
        UNCATEGORIZED.to_string(),
        "Canned Goods".to_string(),
        "Spices".to_string(),
        "Cleaning".to_string(),
    ]
}

fn default_marketplace() -> Vec<MarketCategory> {
    let offer = |name: &str, deal: &str| Offer {
        name: name.to_string(),
        deal: deal.to_string(),
    };
    vec![
        MarketCategory {
            id: "insurance".to_string(),
            title: "Home Insurance".to_string(),
            description: "Protect your home and belongings with trusted insurance partners."
                .to_string(),
            offers: vec![
                offer("Outsurance", "Get a R500 voucher on signup."),
                offer("Santam", "10% off your first year premium."),
            ],
        },
        MarketCategory {
            id: "internet".to_string(),
            title: "WiFi & Fibre".to_string(),
            description: "Get connected with fast and reliable internet packages.".to_string(),
            offers: vec![
                offer("MTN Fibre", "First month free on 24-month contracts."),
                offer("Telkom", "Free installation worth R1500."),
            ],
        },
        MarketCategory {
            id: "security".to_string(),
            title: "Home Security".to_string(),
            description: "Keep your family safe with state-of-the-art alarm systems.".to_string(),
            offers: vec![
                offer("ADT Security", "Free outdoor camera with every new installation."),
                offer("Chubb", "3 months free armed response."),
            ],
        },
    ]
}

/// Reconcile a loaded snapshot against the current schema. Idempotent:
/// running it twice is the same as once. `today` is passed in so tests can
/// pin the planner day.
pub fn migrate(state: &mut AppState, today: Day) {
    // Drop case-insensitive duplicates within the snapshot's own tag list
    // (first occurrence wins), then append default tags it is missing.
    let mut tags: Vec<String> = Vec::with_capacity(state.pantry_tags.len());
    for tag in state.pantry_tags.drain(..) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    for tag in default_pantry_tags() {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    state.pantry_tags = tags;

    // Every pantry item must carry a tag that exists in the tag set.
    for item in &mut state.pantry {
        let known = state.pantry_tags.iter().any(|t| *t == item.tag);
        if item.tag.trim().is_empty() || !known {
            item.tag = UNCATEGORIZED.to_string();
        }
    }

    // Transient edit state never survives a load.
    state.editing_pantry_item_id = None;

    // The planner always opens on today, whatever was persisted.
    state.meal_plan.selected_day = today;
}

/// Generate an id for a new item. Ids are creation timestamps; the max+1
/// clamp keeps them unique when two items land in the same millisecond.
pub fn fresh_id(state: &AppState) -> i64 {
    let ts = chrono::Utc::now().timestamp_millis();
    let max = state
        .grocery_list
        .iter()
        .map(|i| i.id)
        .chain(state.pantry.iter().map(|i| i.id))
        .chain(state.todos.iter().map(|i| i.id))
        .chain(state.rewards_cards.iter().map(|c| c.id))
        .chain(state.geyser.routines.iter().map(|r| r.id))
        .fold(0, i64::max);
    ts.max(max + 1)
}

/// Result of trying to add a pantry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Added,
    Duplicate,
    Empty,
}

impl AppState {
    pub fn has_grocery_named(&self, name: &str) -> bool {
        self.grocery_list
            .iter()
            .any(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn has_pantry_named(&self, name: &str) -> bool {
        self.pantry.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn add_grocery(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let id = fresh_id(self);
        self.grocery_list.push(GroceryItem {
            id,
            name: name.to_string(),
            checked: false,
        });
        true
    }

    /// Flip a grocery item's checked flag. Checking an item stocks the
    /// pantry with a same-named item unless one already exists
    /// (case-insensitive).
    pub fn toggle_grocery(&mut self, id: i64) -> bool {
        let Some(item) = self.grocery_list.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.checked = !item.checked;
        let name = item.name.clone();
        let now_checked = item.checked;
        if now_checked && !self.has_pantry_named(&name) {
            let id = fresh_id(self);
            self.pantry.push(PantryItem {
                id,
                name,
                tag: UNCATEGORIZED.to_string(),
            });
        }
        true
    }

    pub fn remove_grocery(&mut self, id: i64) {
        self.grocery_list.retain(|i| i.id != id);
    }

    pub fn add_pantry_item(&mut self, name: &str, tag: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let id = fresh_id(self);
        self.pantry.push(PantryItem {
            id,
            name: name.to_string(),
            tag: tag.to_string(),
        });
        self.last_used_pantry_tag = Some(tag.to_string());
        true
    }

    pub fn add_pantry_tag(&mut self, name: &str) -> TagOutcome {
        let name = name.trim();
        if name.is_empty() {
            return TagOutcome::Empty;
        }
        if self.pantry_tags.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            return TagOutcome::Duplicate;
        }
        self.pantry_tags.push(name.to_string());
        TagOutcome::Added
    }

    pub fn set_pantry_tag(&mut self, id: i64, tag: &str) -> bool {
        match self.pantry.iter_mut().find(|p| p.id == id) {
            Some(item) => {
                item.tag = tag.to_string();
                true
            }
            None => false,
        }
    }

    /// Move a pantry item back onto the grocery list. The pantry entry is
    /// always removed; the grocery insert is skipped when a same-named item
    /// (case-insensitive) is already on the list.
    pub fn move_pantry_to_grocery(&mut self, id: i64) -> bool {
        let Some(item) = self.pantry.iter().find(|p| p.id == id).cloned() else {
            return false;
        };
        if !self.has_grocery_named(&item.name) {
            let id = fresh_id(self);
            self.grocery_list.push(GroceryItem {
                id,
                name: item.name,
                checked: false,
            });
        }
        self.pantry.retain(|p| p.id != id);
        true
    }

    pub fn remove_pantry(&mut self, id: i64) {
        self.pantry.retain(|p| p.id != id);
    }

    pub fn toggle_collapsed_tag(&mut self, tag: &str) {
        if let Some(pos) = self.collapsed_tags.iter().position(|t| t == tag) {
            self.collapsed_tags.remove(pos);
        } else {
            self.collapsed_tags.push(tag.to_string());
        }
    }

    /// Bulk-add receipt items into the pantry, silently skipping names
    /// already present (case-insensitive). Returns how many were added.
    pub fn import_pantry_items(&mut self, names: &[String]) -> usize {
        let mut added = 0;
        for name in names {
            let name = name.trim();
            if name.is_empty() || self.has_pantry_named(name) {
                continue;
            }
            let id = fresh_id(self);
            self.pantry.push(PantryItem {
                id,
                name: name.to_string(),
                tag: UNCATEGORIZED.to_string(),
            });
            added += 1;
        }
        added
    }

    pub fn add_todo(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let id = fresh_id(self);
        self.todos.push(TodoItem {
            id,
            text: text.to_string(),
            checked: false,
        });
        true
    }

    pub fn toggle_todo(&mut self, id: i64) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.checked = !todo.checked;
                true
            }
            None => false,
        }
    }

    pub fn remove_todo(&mut self, id: i64) {
        self.todos.retain(|t| t.id != id);
    }

    pub fn add_card(&mut self, name: &str, barcode: &str, kind: CodeKind) -> bool {
        let name = name.trim();
        let barcode = barcode.trim();
        if name.is_empty() || barcode.is_empty() {
            return false;
        }
        let id = fresh_id(self);
        self.rewards_cards.push(RewardsCard {
            id,
            name: name.to_string(),
            barcode: barcode.to_string(),
            kind,
            is_favorite: false,
        });
        true
    }

    /// Toggle the favorite flag on one card and clear it everywhere else,
    /// so at most one card is ever the favorite.
    pub fn set_favorite(&mut self, id: i64) {
        for card in &mut self.rewards_cards {
            card.is_favorite = if card.id == id {
                !card.is_favorite
            } else {
                false
            };
        }
    }

    pub fn remove_card(&mut self, id: i64) {
        self.rewards_cards.retain(|c| c.id != id);
    }

    pub fn favorite_card(&self) -> Option<&RewardsCard> {
        self.rewards_cards.iter().find(|c| c.is_favorite)
    }

    pub fn remove_routine(&mut self, id: i64) {
        self.geyser.routines.retain(|r| r.id != id);
    }

    pub fn toggle_routine(&mut self, id: i64) -> bool {
        match self.geyser.routines.iter_mut().find(|r| r.id == id) {
            Some(routine) => {
                routine.active = !routine.active;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_tags(tags: &[&str]) -> AppState {
        AppState {
            pantry_tags: tags.iter().map(|t| t.to_string()).collect(),
            ..AppState::default()
        }
    }

    #[test]
    fn migrate_is_idempotent() {
        let mut state = AppState {
            pantry_tags: vec!["Baking".to_string(), "spices".to_string()],
            pantry: vec![PantryItem {
                id: 1,
                name: "Flour".to_string(),
                tag: String::new(),
            }],
            editing_pantry_item_id: Some(1),
            ..AppState::default()
        };
        migrate(&mut state, Day::Wednesday);
        let once = serde_json::to_string(&state).unwrap();
        migrate(&mut state, Day::Wednesday);
        let twice = serde_json::to_string(&state).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn migrate_unions_tags_preserving_snapshot_order() {
        let mut state = state_with_tags(&["Baking", "Uncategorized"]);
        migrate(&mut state, Day::Monday);
        assert_eq!(
            state.pantry_tags,
            vec!["Baking", "Uncategorized", "Canned Goods", "Spices", "Cleaning"]
        );
    }

    #[test]
    fn migrate_rejects_case_insensitive_tag_duplicates() {
        let mut state = state_with_tags(&["spices", "SPICES", "Cleaning"]);
        migrate(&mut state, Day::Monday);
        // The snapshot's casing survives; the default "Spices" is not
        // appended a second time.
        assert_eq!(
            state.pantry_tags,
            vec!["spices", "Cleaning", "Uncategorized", "Canned Goods"]
        );
        for (i, a) in state.pantry_tags.iter().enumerate() {
            for b in &state.pantry_tags[i + 1..] {
                assert!(!a.eq_ignore_ascii_case(b), "{a} ~ {b}");
            }
        }
    }

    #[test]
    fn migrate_assigns_uncategorized_to_unknown_tags() {
        let mut state = AppState {
            pantry: vec![
                PantryItem {
                    id: 1,
                    name: "Beans".to_string(),
                    tag: "Nonexistent".to_string(),
                },
                PantryItem {
                    id: 2,
                    name: "Salt".to_string(),
                    tag: "Spices".to_string(),
                },
            ],
            ..AppState::default()
        };
        migrate(&mut state, Day::Monday);
        assert_eq!(state.pantry[0].tag, UNCATEGORIZED);
        assert_eq!(state.pantry[1].tag, "Spices");
    }

    #[test]
    fn migrate_resets_transient_state_and_selected_day() {
        let mut state = AppState {
            editing_pantry_item_id: Some(42),
            ..AppState::default()
        };
        state.meal_plan.selected_day = Day::Friday;
        migrate(&mut state, Day::Tuesday);
        assert_eq!(state.editing_pantry_item_id, None);
        assert_eq!(state.meal_plan.selected_day, Day::Tuesday);
    }

    #[test]
    fn unknown_page_falls_back_to_home() {
        let page: Page = serde_json::from_str("\"garage\"").unwrap();
        assert_eq!(page, Page::Home);
        let page: Page = serde_json::from_str("\"pantry\"").unwrap();
        assert_eq!(page, Page::Pantry);
    }

    #[test]
    fn non_string_page_or_day_degrades_only_that_field() {
        // A hand-edited snapshot with the wrong value type must not take
        // the rest of the snapshot down with it.
        let page: Page = serde_json::from_str("5").unwrap();
        assert_eq!(page, Page::Home);
        let day: Day = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(day, Day::Sunday);

        let state: AppState = serde_json::from_str(
            r#"{"current_page":5,"grocery_list":[{"id":1,"name":"Milk"}]}"#,
        )
        .unwrap();
        assert_eq!(state.current_page, Page::Home);
        assert_eq!(state.grocery_list[0].name, "Milk");
    }

    #[test]
    fn meal_day_missing_slots_fill_empty() {
        let day: MealDay =
            serde_json::from_str(r#"{"breakfast":"Oats","lunch":"Wrap","dinner":"Stew"}"#).unwrap();
        assert_eq!(day.breakfast, "Oats");
        assert_eq!(day.snacks, "");
    }

    #[test]
    fn checking_grocery_promotes_to_pantry_once() {
        let mut state = AppState::default();
        assert!(state.add_grocery("Milk"));
        let id = state.grocery_list[0].id;
        state.toggle_grocery(id);
        assert_eq!(state.pantry.len(), 1);
        assert_eq!(state.pantry[0].name, "Milk");
        assert_eq!(state.pantry[0].tag, UNCATEGORIZED);
        // Unchecking and re-checking must not duplicate the pantry entry.
        state.toggle_grocery(id);
        state.toggle_grocery(id);
        assert_eq!(state.pantry.len(), 1);
    }

    #[test]
    fn promotion_skips_case_insensitive_match() {
        let mut state = AppState::default();
        state.add_pantry_item("MILK", UNCATEGORIZED);
        state.add_grocery("milk");
        let id = state.grocery_list[0].id;
        state.toggle_grocery(id);
        assert_eq!(state.pantry.len(), 1);
    }

    #[test]
    fn pantry_move_round_trip() {
        let mut state = AppState::default();
        state.add_grocery("Milk");
        let gid = state.grocery_list[0].id;
        state.toggle_grocery(gid);
        state.remove_grocery(gid);
        let pid = state.pantry[0].id;
        state.move_pantry_to_grocery(pid);
        assert!(state.pantry.is_empty());
        assert_eq!(state.grocery_list.len(), 1);
        assert_eq!(state.grocery_list[0].name, "Milk");
        assert!(!state.grocery_list[0].checked);
    }

    #[test]
    fn pantry_move_removes_even_when_grocery_has_match() {
        let mut state = AppState::default();
        state.add_pantry_item("Milk", UNCATEGORIZED);
        state.add_grocery("milk");
        let pid = state.pantry[0].id;
        state.move_pantry_to_grocery(pid);
        assert!(state.pantry.is_empty());
        assert_eq!(state.grocery_list.len(), 1);
    }

    #[test]
    fn favorite_is_exclusive() {
        let mut state = AppState::default();
        state.add_card("Clicks", "123", CodeKind::Barcode);
        state.add_card("PnP", "456", CodeKind::Qrcode);
        let a = state.rewards_cards[0].id;
        let b = state.rewards_cards[1].id;
        state.set_favorite(a);
        state.set_favorite(b);
        let favorites = state.rewards_cards.iter().filter(|c| c.is_favorite).count();
        assert_eq!(favorites, 1);
        assert!(state.rewards_cards[1].is_favorite);
        // Toggling the favorite off leaves no favorite at all.
        state.set_favorite(b);
        assert!(state.favorite_card().is_none());
    }

    #[test]
    fn tag_insert_outcomes() {
        let mut state = AppState::default();
        assert_eq!(state.add_pantry_tag("Baking"), TagOutcome::Added);
        assert_eq!(state.add_pantry_tag("baking"), TagOutcome::Duplicate);
        assert_eq!(state.add_pantry_tag("   "), TagOutcome::Empty);
    }

    #[test]
    fn weekday_cycles_modulo_seven() {
        assert_eq!(Day::Saturday.next(), Day::Sunday);
        assert_eq!(Day::Sunday.prev(), Day::Saturday);
        let mut day = Day::Wednesday;
        for _ in 0..7 {
            day = day.next();
        }
        assert_eq!(day, Day::Wednesday);
    }

    #[test]
    fn import_skips_existing_pantry_names() {
        let mut state = AppState::default();
        state.add_pantry_item("Milk", UNCATEGORIZED);
        let added = state.import_pantry_items(&[
            "MILK".to_string(),
            "Bread".to_string(),
            "  ".to_string(),
        ]);
        assert_eq!(added, 1);
        assert_eq!(state.pantry.len(), 2);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let mut state = AppState::default();
        for _ in 0..5 {
            state.add_grocery("x");
        }
        let mut ids: Vec<i64> = state.grocery_list.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
