// File: src/tui/handlers.rs
// Handles keyboard input and loader events for the TUI.
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, Focus, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Status(s) => state.message = s,
        AppEvent::LoadFailed(s) => {
            // Stays in the loading state with no retry. The loader has already logged it.
            log::debug!("Dashboard left loading after failure: {}", s);
        }
        AppEvent::DataLoaded(dataset) => state.apply_dataset(dataset),
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state.mode {
        InputMode::Searching => {
            handle_search_key(key, state);
            None
        }
        InputMode::Normal => handle_normal_key(key, state),
    }
}

fn handle_search_key(key: KeyEvent, state: &mut AppState) {
    let now = state.now;
    match key.code {
        KeyCode::Enter => {
            state.mode = InputMode::Normal;
            state.reset_input();
        }
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
            state.reset_input();
            let list = state.controller.set_search_query("", now);
            state.show(list);
        }
        KeyCode::Char(c) => {
            state.enter_char(c);
            let list = state.controller.set_search_query(&state.input_buffer, now);
            state.show(list);
        }
        KeyCode::Backspace => {
            state.delete_char();
            let list = state.controller.set_search_query(&state.input_buffer, now);
            state.show(list);
        }
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        _ => {}
    }
}

fn handle_normal_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    if state.show_full_help {
        // Any key closes the help overlay
        state.show_full_help = false;
        return match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    let now = state.now;
    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('?') => state.show_full_help = true,
        KeyCode::Tab => state.toggle_focus(),
        KeyCode::Down | KeyCode::Char('j') => state.next(),
        KeyCode::Up | KeyCode::Char('k') => state.previous(),
        KeyCode::PageDown => state.jump_forward(10),
        KeyCode::PageUp => state.jump_backward(10),
        KeyCode::Char('/') => {
            state.mode = InputMode::Searching;
            state.input_buffer = state.controller.search_query().to_string();
            state.cursor_position = state.input_buffer.chars().count();
        }
        _ if state.loading() => {}
        KeyCode::Char('*') => {
            let list = state.controller.toggle_all(now);
            state.show(list);
        }
        KeyCode::Char('t') => {
            let list = state.controller.cycle_taxonomy(now);
            state.tree_state.select(Some(0));
            state.show(list);
            if let Some(name) = state.controller.taxonomy_name() {
                state.message = format!("Taxonomy: {}", name);
            }
        }
        KeyCode::Char('n') => {
            state.hide_next_tier = !state.hide_next_tier;
            let list = state.controller.set_hide_next_tier(state.hide_next_tier, now);
            state.show(list);
            state.message = if state.hide_next_tier {
                "Hiding next-tier conferences".to_string()
            } else {
                "Showing next-tier conferences".to_string()
            };
        }
        KeyCode::Char(' ') if state.active_focus == Focus::Sidebar => {
            if let Some(row) = state.get_selected_row().cloned() {
                let list = state.controller.toggle_row(&row, now);
                state.show(list);
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')
            if state.active_focus == Focus::Sidebar =>
        {
            if let Some(row) = state.get_selected_row().cloned() {
                // Enter toggles, Right only opens
                let expand = key.code != KeyCode::Enter || row.expanded != Some(true);
                state.controller.set_row_expanded(&row, expand);
                state.refresh_filtered_view();
            }
        }
        KeyCode::Left | KeyCode::Char('h') if state.active_focus == Focus::Sidebar => {
            if let Some(row) = state.get_selected_row().cloned() {
                if row.expanded == Some(true) {
                    state.controller.set_row_expanded(&row, false);
                } else if let Some(parent_idx) = parent_row_index(state, row.depth) {
                    // Collapsing a leaf or closed node jumps to its parent row
                    state.tree_state.select(Some(parent_idx));
                }
                state.refresh_filtered_view();
            }
        }
        _ => {}
    }
    None
}

/// Index of the closest row above the selection with a smaller depth.
fn parent_row_index(state: &AppState, depth: usize) -> Option<usize> {
    let selected = state.tree_state.selected()?;
    if depth == 0 {
        return None;
    }
    state.tree[..selected]
        .iter()
        .rposition(|r| r.depth < depth)
}
