// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Application state and update logic.
//!
//! The controller is a single-threaded message loop: key presses and
//! command results are merged into [`App`] by synchronous methods that
//! return the follow-up [`Command`]s to dispatch. The [`Runner`] executes
//! each command as a spawned task performing exactly one API call and
//! sending exactly one [`AppEvent`] back on the channel. State is never
//! mutated off the loop; the tasks only touch the shared `ApiClient`.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::warn;

use crate::api::ApiClient;
use crate::domain::{Followup, Ticket, TicketActor};

/// An asynchronous unit of work: one network call, one result event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    FetchTickets,
    FetchProfile,
    FetchActors(i64),
    FetchFollowups(i64),
    CreateFollowup { ticket_id: i64, content: String },
    Assign { ticket_id: i64, entity_id: i64 },
}

/// Typed result message delivered back into the update loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    LoggedIn,
    ProfileLoaded(i64),
    TicketsLoaded(Vec<Ticket>),
    ActorsLoaded {
        ticket_id: i64,
        actors: Vec<TicketActor>,
    },
    FollowupsLoaded {
        ticket_id: i64,
        followups: Vec<Followup>,
    },
    FollowupCreated {
        ticket_id: i64,
    },
    Assigned {
        ticket_id: i64,
    },
    /// Fatal failure: displayed full screen, session over.
    Failed(String),
}

/// All UI/business state, owned by the update loop.
pub struct App {
    /// Loaded ticket list (empty until the first fetch resolves).
    pub tickets: Vec<Ticket>,
    /// Selection cursor in the list view.
    pub list_index: usize,
    /// Currently opened ticket, a detached copy of the list entry.
    pub selected: Option<Ticket>,
    /// Scroll offset in the detail view.
    pub detail_scroll: u16,
    /// Reply-composition buffer.
    pub input: String,
    /// Cursor position in the compose buffer (byte offset).
    pub cursor_pos: usize,
    /// True while the compose overlay is open; navigation keys are
    /// suspended until it closes.
    pub composing: bool,
    /// True from startup until the ticket list arrives.
    pub loading: bool,
    /// Re-entrancy guard for detail refresh and assignment.
    pub refreshing: bool,
    /// Authenticated user id, set once the profile fetch resolves.
    pub user_id: Option<i64>,
    /// Fatal error; only the most recent one is retained.
    pub error: Option<String>,
    /// Transient informational message shown in the footer.
    pub notice: Option<String>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Set when the user asks to quit.
    pub should_quit: bool,
}

impl App {
    /// Create the initial state and the startup command.
    pub fn new() -> (Self, Vec<Command>) {
        let app = Self {
            tickets: Vec::new(),
            list_index: 0,
            selected: None,
            detail_scroll: 0,
            input: String::new(),
            cursor_pos: 0,
            composing: false,
            loading: true,
            refreshing: false,
            user_id: None,
            error: None,
            notice: None,
            spinner_frame: 0,
            should_quit: false,
        };
        (app, vec![Command::Login])
    }

    /// Advance the spinner animation.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Merge a command result into the state, returning follow-up
    /// commands. Stale actor/followup results for a ticket that is no
    /// longer selected are discarded.
    pub fn apply(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::LoggedIn => {
                // List and profile load independently; order-insensitive.
                vec![Command::FetchTickets, Command::FetchProfile]
            }
            AppEvent::ProfileLoaded(user_id) => {
                self.user_id = Some(user_id);
                Vec::new()
            }
            AppEvent::TicketsLoaded(tickets) => {
                self.loading = false;
                self.tickets = tickets;
                if self.list_index >= self.tickets.len() {
                    self.list_index = self.tickets.len().saturating_sub(1);
                }
                Vec::new()
            }
            AppEvent::ActorsLoaded { ticket_id, actors } => {
                if let Some(ticket) = self.selected_with_id(ticket_id) {
                    ticket.actors = Some(actors);
                }
                Vec::new()
            }
            AppEvent::FollowupsLoaded {
                ticket_id,
                mut followups,
            } => {
                if self.selected_with_id(ticket_id).is_some() {
                    self.refreshing = false;
                }
                if let Some(ticket) = self.selected_with_id(ticket_id) {
                    // Newest first, whatever order the endpoint returned.
                    followups.sort_by(|a, b| b.id.cmp(&a.id));
                    ticket.followups = Some(followups);
                }
                Vec::new()
            }
            AppEvent::FollowupCreated { ticket_id } => {
                if self.selected_with_id(ticket_id).is_some() {
                    vec![Command::FetchFollowups(ticket_id)]
                } else {
                    Vec::new()
                }
            }
            AppEvent::Assigned { ticket_id } => {
                self.refreshing = false;
                if self.selected_with_id(ticket_id).is_some() {
                    // Reload the team so the technician pane shows the
                    // assignment immediately.
                    vec![Command::FetchActors(ticket_id)]
                } else {
                    Vec::new()
                }
            }
            AppEvent::Failed(message) => {
                self.error = Some(message);
                self.loading = false;
                self.refreshing = false;
                Vec::new()
            }
        }
    }

    /// Handle a key press, returning the commands to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // The transient notice lives until the next key press.
        self.notice = None;

        if self.composing {
            return self.handle_compose_key(key);
        }
        self.handle_normal_key(key)
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.composing = false;
                self.input.clear();
                self.cursor_pos = 0;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.submit_reply();
            }
            KeyCode::Enter => {
                self.input.insert(self.cursor_pos, '\n');
                self.cursor_pos += 1;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
            }
            KeyCode::Backspace => {
                if let Some((offset, _)) = self.input[..self.cursor_pos].char_indices().last() {
                    self.input.remove(offset);
                    self.cursor_pos = offset;
                }
            }
            KeyCode::Delete => {
                if self.cursor_pos < self.input.len() {
                    self.input.remove(self.cursor_pos);
                }
            }
            KeyCode::Left => {
                if let Some((offset, _)) = self.input[..self.cursor_pos].char_indices().last() {
                    self.cursor_pos = offset;
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.input[self.cursor_pos..].chars().next() {
                    self.cursor_pos += c.len_utf8();
                }
            }
            _ => {}
        }
        Vec::new()
    }

    /// Submit the composed reply. An empty buffer is a no-op: no command,
    /// no mode change.
    fn submit_reply(&mut self) -> Vec<Command> {
        let Some(ticket_id) = self.selected.as_ref().map(|t| t.id) else {
            return Vec::new();
        };
        let content = self.input.trim().to_string();
        if content.is_empty() {
            return Vec::new();
        }

        self.composing = false;
        self.input.clear();
        self.cursor_pos = 0;
        vec![Command::CreateFollowup { ticket_id, content }]
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.selected.is_some() {
                    self.selected = None;
                    self.detail_scroll = 0;
                    self.refreshing = false;
                }
            }
            KeyCode::Enter => {
                if self.selected.is_none() && !self.loading {
                    return self.open_selected_ticket();
                }
            }
            KeyCode::Char('r') => {
                if self.selected.is_some() {
                    self.composing = true;
                }
            }
            KeyCode::Char('u') => {
                // Guard against a second in-flight refresh.
                if let Some(ticket) = &self.selected {
                    if !self.refreshing {
                        self.refreshing = true;
                        return vec![Command::FetchFollowups(ticket.id)];
                    }
                }
            }
            KeyCode::Char('a') => {
                if let Some(ticket) = &self.selected {
                    match self.user_id {
                        Some(_) => {
                            self.refreshing = true;
                            return vec![Command::Assign {
                                ticket_id: ticket.id,
                                entity_id: ticket.entity.id,
                            }];
                        }
                        None => {
                            self.notice =
                                Some("Still loading your user profile, try again".to_string());
                        }
                    }
                }
            }
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::PageUp => self.move_up(10),
            KeyCode::PageDown => self.move_down(10),
            _ => {}
        }
        Vec::new()
    }

    /// Open the ticket under the cursor: detach a copy, drop any stale
    /// lazily-loaded data, and fetch actors and followups concurrently.
    fn open_selected_ticket(&mut self) -> Vec<Command> {
        let Some(ticket) = self.tickets.get(self.list_index) else {
            return Vec::new();
        };
        let mut ticket = ticket.clone();
        ticket.actors = None;
        ticket.followups = None;
        let id = ticket.id;
        self.selected = Some(ticket);
        self.detail_scroll = 0;
        vec![Command::FetchActors(id), Command::FetchFollowups(id)]
    }

    fn selected_with_id(&mut self, ticket_id: i64) -> Option<&mut Ticket> {
        self.selected.as_mut().filter(|t| t.id == ticket_id)
    }

    fn move_up(&mut self, step: usize) {
        if self.selected.is_some() {
            self.detail_scroll = self.detail_scroll.saturating_sub(step as u16);
        } else {
            self.list_index = self.list_index.saturating_sub(step);
        }
    }

    fn move_down(&mut self, step: usize) {
        if self.selected.is_some() {
            self.detail_scroll = self.detail_scroll.saturating_add(step as u16);
        } else if !self.tickets.is_empty() {
            self.list_index = (self.list_index + step).min(self.tickets.len() - 1);
        }
    }
}

/// Executes commands as spawned tasks reporting back on the channel.
pub struct Runner {
    client: Arc<ApiClient>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Runner {
    pub fn new(client: Arc<ApiClient>, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { client, tx }
    }

    /// Spawn one task per command. Each task sends exactly one event;
    /// a dropped receiver just means the loop already exited.
    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            let client = Arc::clone(&self.client);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let event = execute(&client, command).await;
                let _ = tx.send(event);
            });
        }
    }
}

/// Perform the network call behind a command and translate the outcome.
///
/// Actor and followup fetch failures degrade to an empty result so the
/// detail panes show "no data" instead of blocking navigation; the other
/// operations fail the session.
pub async fn execute(client: &ApiClient, command: Command) -> AppEvent {
    match command {
        Command::Login => match client.login().await {
            Ok(()) => AppEvent::LoggedIn,
            Err(e) => AppEvent::Failed(e.to_string()),
        },
        Command::FetchTickets => match client.list_tickets().await {
            Ok(tickets) => AppEvent::TicketsLoaded(tickets),
            Err(e) => AppEvent::Failed(e.to_string()),
        },
        Command::FetchProfile => match client.fetch_my_id().await {
            Ok(user_id) => AppEvent::ProfileLoaded(user_id),
            Err(e) => AppEvent::Failed(e.to_string()),
        },
        Command::FetchActors(ticket_id) => {
            let actors = match client.ticket_actors(ticket_id).await {
                Ok(actors) => actors,
                Err(e) => {
                    warn!(ticket_id, error = %e, "actor fetch failed, showing empty team");
                    Vec::new()
                }
            };
            AppEvent::ActorsLoaded { ticket_id, actors }
        }
        Command::FetchFollowups(ticket_id) => {
            let followups = match client.ticket_followups(ticket_id).await {
                Ok(followups) => followups,
                Err(e) => {
                    warn!(ticket_id, error = %e, "followup fetch failed, showing empty history");
                    Vec::new()
                }
            };
            AppEvent::FollowupsLoaded {
                ticket_id,
                followups,
            }
        }
        Command::CreateFollowup { ticket_id, content } => {
            match client.create_followup(ticket_id, &content).await {
                Ok(()) => AppEvent::FollowupCreated { ticket_id },
                Err(e) => AppEvent::Failed(e.to_string()),
            }
        }
        Command::Assign {
            ticket_id,
            entity_id,
        } => match client.assign_to_me(ticket_id, entity_id).await {
            Ok(()) => AppEvent::Assigned { ticket_id },
            Err(e) => AppEvent::Failed(e.to_string()),
        },
    }
}
