// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod network;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::AppContext;
use crate::loader::DatasetSources;
use crate::logging::{self, LogTarget};
use crate::system::{ClockMessage, spawn_clock_actor};
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};
use tokio::sync::mpsc;

pub async fn run(ctx: &dyn AppContext, cfg: Config, sources: DatasetSources) -> Result<()> {
    // --- 1. LOGGING ---
    let log_path = ctx.get_log_path()?;
    logging::init_logging(cfg.log_level, LogTarget::File(log_path.clone()))?;
    logging::install_panic_hook(&log_path);

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = AppState::new(chrono::Utc::now());
    app_state.preferred_taxonomy = cfg.default_taxonomy.clone();
    app_state.hide_next_tier = cfg.hide_next_tier;
    app_state.urgent_days = cfg.urgent_days;

    // --- 4. BACKGROUND ACTORS ---
    let (event_tx, mut event_rx) = mpsc::channel(10);
    tokio::spawn(network::run_loader_actor(sources, event_tx));
    let mut clock_rx = spawn_clock_actor(Duration::from_millis(cfg.tick_interval_ms));

    // --- 5. UI LOOP ---
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| draw(f, &mut app_state)) {
            break Err(e.into());
        }

        // A. Loader Events
        if let Ok(event) = event_rx.try_recv() {
            handlers::handle_app_event(&mut app_state, event);
        }

        // B. Clock
        while let Ok(ClockMessage::Tick(now)) = clock_rx.try_recv() {
            app_state.tick(now);
        }

        // C. Input Events
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => break Err(e.into()),
        }
        let event = match event::read() {
            Ok(ev) => ev,
            Err(e) => break Err(e.into()),
        };
        match event {
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app_state.next(),
                MouseEventKind::ScrollUp => app_state.previous(),
                _ => {}
            },
            Event::Key(key) => {
                // Filter out KeyRelease events to prevent double input on Windows
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }
                if let Some(Action::Quit) = handlers::handle_key_event(key, &mut app_state) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    // --- 6. CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    log::info!("Dashboard closed");
    result
}
