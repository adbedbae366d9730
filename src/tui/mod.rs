// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal user interface for the ticket browser.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                  │
//! │  (tickets, selection, compose buffer, flags, last error)    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//! ┌─────────────────┐ ┌─────────────┐ ┌─────────────────┐
//! │     Events      │ │     UI      │ │     Runner      │
//! │  (Keyboard/Term)│ │  (Render)   │ │  (API commands) │
//! └─────────────────┘ └─────────────┘ └─────────────────┘
//! ```
//!
//! Key presses and command results flow through the single-threaded
//! update loop; each [`app::Command`] runs as a spawned task performing
//! one API call and reporting back with one [`app::AppEvent`].

pub mod app;
pub mod events;
pub mod ui;

pub use app::{App, AppEvent, Command, Runner};
pub use events::{Event, EventHandler};

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::api::ApiClient;

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(io::Error::other(
            "No TTY available. deskhand requires an interactive terminal.",
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the application against the given client.
pub async fn run(client: Arc<ApiClient>) -> io::Result<()> {
    let mut terminal = init_terminal()?;
    let result = run_loop(&mut terminal, client).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    client: Arc<ApiClient>,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner = Runner::new(client, tx);
    let mut events = EventHandler::new(120);

    let (mut app, startup) = App::new();
    runner.dispatch(startup);

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, &app))?;

        // Merge any completed command results before blocking on input.
        while let Ok(event) = rx.try_recv() {
            let commands = app.apply(event);
            runner.dispatch(commands);
        }

        tokio::select! {
            Some(event) = events.next() => match event {
                Event::Key(key) => {
                    let commands = app.handle_key(key);
                    runner.dispatch(commands);
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            },
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
    }

    Ok(())
}
