use crate::state::{AppState, GeyserRoutine, HeatMode, fresh_id};

/// Wizard steps, in order. Step 1 has no backward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    ChooseType,
    Schedule,
    ChooseMode,
}

/// Routine labels offered on the first wizard step.
pub const ROUTINE_TYPES: [&str; 3] = ["morning", "afternoon", "evening"];

/// Uncommitted routine data. `id` is `None` until an existing routine is
/// being edited; nothing touches the routine list before [`RoutineWizard::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDraft {
    pub id: Option<i64>,
    pub routine_type: String,
    pub start_time: String,
    pub end_time: String,
    /// Days in the order they were toggled on, not weekday order.
    pub days: Vec<String>,
    pub mode: HeatMode,
}

impl Default for RoutineDraft {
    fn default() -> Self {
        Self {
            id: None,
            routine_type: String::new(),
            start_time: "06:00".to_string(),
            end_time: "08:00".to_string(),
            days: Vec::new(),
            mode: HeatMode::HeatOnce,
        }
    }
}

/// Three-step add/edit flow for water-heater routines. Holds only draft
/// state; the committed routine reaches the geyser list on save alone.
#[derive(Debug, Clone)]
pub struct RoutineWizard {
    pub step: WizardStep,
    pub draft: RoutineDraft,
}

impl RoutineWizard {
    /// Start the wizard for a brand-new routine.
    pub fn add() -> Self {
        Self {
            step: WizardStep::ChooseType,
            draft: RoutineDraft::default(),
        }
    }

    /// Start the wizard seeded from an existing routine, entering at the
    /// schedule step the way the edit flow always has.
    pub fn edit(routine: &GeyserRoutine) -> Self {
        let (start, end) = match routine.time.split_once(" - ") {
            Some((start, end)) => (start.to_string(), end.to_string()),
            None => ("06:00".to_string(), "08:00".to_string()),
        };
        let days = if routine.days == "No days selected" {
            Vec::new()
        } else {
            routine.days.split(", ").map(|d| d.to_string()).collect()
        };
        Self {
            step: WizardStep::Schedule,
            draft: RoutineDraft {
                id: Some(routine.id),
                routine_type: String::new(),
                start_time: start,
                end_time: end,
                days,
                mode: routine.mode,
            },
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.id.is_some()
    }

    /// Step 1: picking a type advances straight to the schedule step.
    pub fn choose_type(&mut self, routine_type: &str) {
        self.draft.routine_type = routine_type.to_string();
        self.step = WizardStep::Schedule;
    }

    /// Step 2: toggle a day in/out of the selection, preserving toggle order.
    pub fn toggle_day(&mut self, day: &str) {
        if let Some(pos) = self.draft.days.iter().position(|d| d == day) {
            self.draft.days.remove(pos);
        } else {
            self.draft.days.push(day.to_string());
        }
    }

    /// Pull the current values out of the time inputs. The inputs are not
    /// watched continuously, so this runs on every day toggle and on Next.
    pub fn capture_times(&mut self, start: &str, end: &str) {
        self.draft.start_time = start.to_string();
        self.draft.end_time = end.to_string();
    }

    /// Step 3: picking a mode makes Save available.
    pub fn choose_mode(&mut self, mode: HeatMode) {
        self.draft.mode = mode;
    }

    /// Advance one step. Returns false from the last step, where the only
    /// forward transition is the save.
    pub fn next(&mut self) -> bool {
        match self.step {
            WizardStep::ChooseType => {
                self.step = WizardStep::Schedule;
                true
            }
            WizardStep::Schedule => {
                self.step = WizardStep::ChooseMode;
                true
            }
            WizardStep::ChooseMode => false,
        }
    }

    /// Go back one step; a no-op on step 1.
    pub fn back(&mut self) -> bool {
        match self.step {
            WizardStep::ChooseType => false,
            WizardStep::Schedule => {
                self.step = WizardStep::ChooseType;
                true
            }
            WizardStep::ChooseMode => {
                self.step = WizardStep::Schedule;
                true
            }
        }
    }

    /// Commit the draft into the routine list. An existing id replaces the
    /// routine in place (keeping its list position); otherwise the routine
    /// is appended under a fresh id. Saving always reactivates the routine.
    /// Empty day selections and equal start/end times are accepted as-is.
    pub fn commit(&self, state: &mut AppState) -> i64 {
        let draft = &self.draft;
        let id = draft.id.unwrap_or_else(|| fresh_id(state));
        let routine = GeyserRoutine {
            id,
            time: format!("{} - {}", draft.start_time, draft.end_time),
            days: if draft.days.is_empty() {
                "No days selected".to_string()
            } else {
                draft.days.join(", ")
            },
            mode: draft.mode,
            active: true,
        };
        match state.geyser.routines.iter().position(|r| r.id == id) {
            Some(pos) => state.geyser.routines[pos] = routine,
            None => state.geyser.routines.push(routine),
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn full_pass_commits_a_fresh_routine() {
        let mut state = AppState::default();
        let mut wizard = RoutineWizard::add();
        assert_eq!(wizard.step, WizardStep::ChooseType);

        wizard.choose_type("morning");
        assert_eq!(wizard.step, WizardStep::Schedule);
        wizard.capture_times("06:00", "08:00");
        wizard.toggle_day("Mon");
        wizard.toggle_day("Wed");
        assert!(wizard.next());
        wizard.choose_mode(HeatMode::HeatOnce);
        assert!(!wizard.next());

        let id = wizard.commit(&mut state);
        let routine = &state.geyser.routines[0];
        assert_eq!(routine.id, id);
        assert_eq!(routine.time, "06:00 - 08:00");
        assert_eq!(routine.days, "Mon, Wed");
        assert_eq!(routine.mode, HeatMode::HeatOnce);
        assert!(routine.active);
    }

    #[test]
    fn empty_day_selection_commits_placeholder() {
        let mut state = AppState::default();
        let mut wizard = RoutineWizard::add();
        wizard.choose_type("evening");
        wizard.next();
        wizard.commit(&mut state);
        assert_eq!(state.geyser.routines[0].days, "No days selected");
    }

    #[test]
    fn day_toggle_preserves_click_order() {
        let mut wizard = RoutineWizard::add();
        wizard.choose_type("morning");
        wizard.toggle_day("Fri");
        wizard.toggle_day("Mon");
        wizard.toggle_day("Wed");
        wizard.toggle_day("Mon"); // toggled back off
        assert_eq!(wizard.draft.days, vec!["Fri", "Wed"]);
    }

    #[test]
    fn edit_decomposes_time_and_days_and_replaces_in_place() {
        let mut state = AppState::default();
        state.geyser.routines = vec![
            GeyserRoutine {
                id: 10,
                time: "05:00 - 06:00".to_string(),
                days: "Tue".to_string(),
                mode: HeatMode::HeatOnce,
                active: false,
            },
            GeyserRoutine {
                id: 20,
                time: "18:00 - 20:00".to_string(),
                days: "Sat, Sun".to_string(),
                mode: HeatMode::KeepWarm,
                active: true,
            },
        ];

        let mut wizard = RoutineWizard::edit(&state.geyser.routines[0]);
        assert_eq!(wizard.step, WizardStep::Schedule);
        assert_eq!(wizard.draft.start_time, "05:00");
        assert_eq!(wizard.draft.end_time, "06:00");
        assert_eq!(wizard.draft.days, vec!["Tue"]);

        wizard.capture_times("05:30", "06:30");
        wizard.toggle_day("Thu");
        wizard.next();
        wizard.choose_mode(HeatMode::KeepWarm);
        let id = wizard.commit(&mut state);

        assert_eq!(id, 10);
        assert_eq!(state.geyser.routines.len(), 2);
        // Position preserved, content replaced, routine re-activated.
        assert_eq!(state.geyser.routines[0].id, 10);
        assert_eq!(state.geyser.routines[0].time, "05:30 - 06:30");
        assert_eq!(state.geyser.routines[0].days, "Tue, Thu");
        assert!(state.geyser.routines[0].active);
        assert_eq!(state.geyser.routines[1].id, 20);
    }

    #[test]
    fn edit_of_no_days_routine_starts_empty() {
        let routine = GeyserRoutine {
            id: 1,
            time: "06:00 - 08:00".to_string(),
            days: "No days selected".to_string(),
            mode: HeatMode::HeatOnce,
            active: true,
        };
        let wizard = RoutineWizard::edit(&routine);
        assert!(wizard.draft.days.is_empty());
    }

    #[test]
    fn no_back_from_step_one() {
        let mut wizard = RoutineWizard::add();
        assert!(!wizard.back());
        assert_eq!(wizard.step, WizardStep::ChooseType);
        wizard.choose_type("morning");
        wizard.next();
        assert!(wizard.back());
        assert_eq!(wizard.step, WizardStep::Schedule);
        assert!(wizard.back());
        assert_eq!(wizard.step, WizardStep::ChooseType);
    }

    #[test]
    fn identical_start_and_end_times_are_accepted() {
        let mut state = AppState::default();
        let mut wizard = RoutineWizard::add();
        wizard.choose_type("morning");
        wizard.capture_times("06:00", "06:00");
        wizard.next();
        wizard.commit(&mut state);
        assert_eq!(state.geyser.routines[0].time, "06:00 - 06:00");
    }
}
