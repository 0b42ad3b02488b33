// Defines actions and events for TUI interaction and state updates.
use crate::loader::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    DataLoaded(Dataset),
    LoadFailed(String),
    Status(String),
}
