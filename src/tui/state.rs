// File: ./src/tui/state.rs
// Manages the application state for the TUI.
use crate::controller::{DashboardController, TreeRow};
use crate::loader::Dataset;
use crate::model::ConferenceInstance;
use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Focus {
    Sidebar,
    Main,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Searching,
}

pub struct AppState {
    // Data
    pub controller: DashboardController,
    pub conferences: Vec<ConferenceInstance>,
    pub tree: Vec<TreeRow>,
    /// The shared instant every card counts down from.
    pub now: DateTime<Utc>,

    // UI State
    pub list_state: ListState,
    pub tree_state: ListState,
    pub active_focus: Focus,
    pub mode: InputMode,
    pub message: String,
    pub show_full_help: bool,

    // Settings
    pub preferred_taxonomy: Option<String>,
    pub hide_next_tier: bool,
    pub urgent_days: i64,

    // Input Buffers
    pub input_buffer: String,
    pub cursor_position: usize,
}

impl AppState {
    pub fn new(now: DateTime<Utc>) -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));
        let mut t_state = ListState::default();
        t_state.select(Some(0));

        Self {
            controller: DashboardController::new(),
            conferences: vec![],
            tree: vec![],
            now,
            list_state: l_state,
            tree_state: t_state,
            active_focus: Focus::Main,
            mode: InputMode::Normal,
            message: "Loading...".to_string(),
            show_full_help: false,
            preferred_taxonomy: None,
            hide_next_tier: false,
            urgent_days: 7,
            input_buffer: String::new(),
            cursor_position: 0,
        }
    }

    pub fn loading(&self) -> bool {
        self.controller.is_loading()
    }

    pub fn apply_dataset(&mut self, dataset: Dataset) {
        let now = self.now;
        let preferred = self.preferred_taxonomy.clone();
        self.controller
            .apply_dataset(dataset, preferred.as_deref(), now);
        let list = self.controller.set_hide_next_tier(self.hide_next_tier, now);
        self.show(list);
        self.message = format!(
            "{} shown, {} upcoming | {}",
            self.conferences.len(),
            self.controller.store().upcoming_count(now),
            self.controller.taxonomy_names().join(", ")
        );
    }

    /// Moves the shared clock. Countdown strings derive from `now` at draw time.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Installs a freshly computed display list and rebuilds the visible tree.
    pub fn show(&mut self, list: Vec<ConferenceInstance>) {
        self.conferences = list;
        self.tree = self.controller.tree_rows();
        clamp_selection(&mut self.list_state, self.conferences.len());
        clamp_selection(&mut self.tree_state, self.tree.len());
    }

    pub fn refresh_filtered_view(&mut self) {
        let list = self.controller.displayed(self.now);
        self.show(list);
    }

    pub fn get_selected_conference(&self) -> Option<&ConferenceInstance> {
        self.list_state
            .selected()
            .and_then(|idx| self.conferences.get(idx))
    }

    pub fn get_selected_row(&self) -> Option<&TreeRow> {
        self.tree_state.selected().and_then(|idx| self.tree.get(idx))
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        // Safe insertion for UTF-8 strings
        let byte_index = self
            .input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len());

        self.input_buffer.insert(byte_index, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }

    // --- NAVIGATION ---
    fn focused(&mut self) -> (&mut ListState, usize) {
        match self.active_focus {
            Focus::Main => (&mut self.list_state, self.conferences.len()),
            Focus::Sidebar => (&mut self.tree_state, self.tree.len()),
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn jump_forward(&mut self, step: usize) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0);
        state.select(Some((current + step).min(len - 1)));
    }

    pub fn jump_backward(&mut self, step: usize) {
        let (state, len) = self.focused();
        if len == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0);
        state.select(Some(current.saturating_sub(step)));
    }

    pub fn toggle_focus(&mut self) {
        self.active_focus = match self.active_focus {
            Focus::Main => Focus::Sidebar,
            Focus::Sidebar => Focus::Main,
        }
    }
}

fn clamp_selection(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let current = state.selected().unwrap_or(0);
        state.select(Some(current.min(len - 1)));
    }
}
