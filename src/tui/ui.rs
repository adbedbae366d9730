// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! UI rendering for the ticket browser.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::Ticket;

use super::app::App;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the whole screen for the current state.
pub fn draw(f: &mut Frame, app: &App) {
    if let Some(error) = &app.error {
        draw_error(f, error);
        return;
    }

    if app.loading {
        draw_connecting(f, app);
        return;
    }

    match &app.selected {
        Some(ticket) => draw_detail(f, app, ticket),
        None => draw_list(f, app),
    }
}

/// Full-screen fatal error view; the session is over.
fn draw_error(f: &mut Frame, error: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  ✗ Error",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("  {}", error)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press q or Ctrl+C to quit.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), f.area());
}

/// Startup screen while authenticating and loading the ticket list.
fn draw_connecting(f: &mut Frame, app: &App) {
    let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let line = Line::from(vec![
        Span::styled(
            format!("  {} ", frame),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("Connecting to GLPI..."),
    ]);
    f.render_widget(Paragraph::new(vec![Line::from(""), line]), f.area());
}

/// Ticket list view with a one-line footer.
fn draw_list(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let items: Vec<ListItem> = app.tickets.iter().map(ticket_line).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" GLPI Tickets ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    if !app.tickets.is_empty() {
        state.select(Some(app.list_index));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let footer = if app.tickets.is_empty() {
        "No tickets. [q] Quit"
    } else {
        "[Enter] Open  [↑/↓] Navigate  [q] Quit"
    };
    draw_footer(f, chunks[1], footer, app.notice.as_deref());
}

fn ticket_line(ticket: &Ticket) -> ListItem<'_> {
    let (status, color) = ticket.status_label();
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("[{}]", status),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" #{} ", ticket.id)),
        Span::styled(
            ticket.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} · {}", ticket.priority_label(), ticket.formatted_date()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

/// Detail view: header, actors, description, followup history, footer,
/// and the compose overlay when a reply is being written.
fn draw_detail(f: &mut Frame, app: &App, ticket: &Ticket) {
    let constraints = if app.composing {
        vec![
            Constraint::Min(3),
            Constraint::Length(7),
            Constraint::Length(1),
        ]
    } else {
        vec![Constraint::Min(3), Constraint::Length(1)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let body = Paragraph::new(detail_lines(ticket, chunks[0].width))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" #{} {} ", ticket.id, ticket.name))
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(body, chunks[0]);

    if app.composing {
        draw_compose(f, app, ticket, chunks[1]);
        draw_footer(f, chunks[2], "Ctrl+S: Send  Esc: Cancel", None);
    } else {
        let footer = if app.refreshing {
            "Updating history..."
        } else {
            "[r] Reply  [u] Refresh  [a] Assign to me  [Esc] Back"
        };
        draw_footer(f, chunks[1], footer, app.notice.as_deref());
    }
}

/// Build the scrollable body of the detail view.
pub fn detail_lines(ticket: &Ticket, width: u16) -> Vec<Line<'static>> {
    let info = Style::default().fg(Color::DarkGray);
    let divider = "─".repeat(width.saturating_sub(2) as usize);

    let mut lines = vec![Line::from(Span::styled(
        format!("Opened: {}", ticket.formatted_date()),
        info,
    ))];

    // Actors pane: distinguish "not fetched yet" from "fetched, empty".
    match &ticket.actors {
        None => lines.push(Line::from(Span::styled("Loading team...", info))),
        Some(_) => {
            lines.push(Line::from(vec![
                Span::raw("Requester: "),
                Span::styled(
                    ticket.requesters(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::raw("Technician: "),
                Span::styled(
                    ticket.technicians(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }

    lines.push(Line::from(Span::styled(divider.clone(), info)));
    for line in ticket.clean_content().lines() {
        lines.push(Line::from(line.to_string()));
    }

    lines.push(Line::from(""));
    match &ticket.followups {
        None => lines.push(Line::from(Span::styled("Loading history...", info))),
        Some(followups) if followups.is_empty() => {
            lines.push(Line::from(Span::styled("No followups recorded.", info)));
        }
        Some(followups) => {
            lines.push(Line::from(Span::styled(
                " Followups ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            for followup in followups {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(
                        followup.user.name.clone(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", followup.formatted_date()), info),
                ]));
                for line in followup.clean_content().lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
        }
    }

    lines
}

/// Reply-composition box under the detail view.
fn draw_compose(f: &mut Frame, app: &App, ticket: &Ticket, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" Reply to #{} ", ticket.id));

    let text = if app.input.is_empty() {
        Paragraph::new(Span::styled(
            "Type your reply...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.input.as_str())
    };
    f.render_widget(text.block(block).wrap(Wrap { trim: false }), area);
}

fn draw_footer(f: &mut Frame, area: Rect, hint: &str, notice: Option<&str>) {
    let line = match notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            format!(" {}", hint),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Followup, TicketEntity, TicketStatus};

    fn ticket() -> Ticket {
        Ticket {
            id: 42,
            name: "Printer on fire".to_string(),
            content: "<p>please help</p>".to_string(),
            date: "2024-01-30 10:00:00".to_string(),
            status: TicketStatus {
                id: 1,
                name: String::new(),
            },
            priority: 4,
            entity: TicketEntity::default(),
            actors: None,
            followups: None,
        }
    }

    fn rendered(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_detail_shows_loading_panes_before_fetch() {
        let text = rendered(&detail_lines(&ticket(), 80));
        assert!(text.contains("Loading team..."));
        assert!(text.contains("Loading history..."));
    }

    #[test]
    fn test_detail_distinguishes_empty_from_unfetched() {
        let mut ticket = ticket();
        ticket.actors = Some(Vec::new());
        ticket.followups = Some(Vec::new());
        let text = rendered(&detail_lines(&ticket, 80));
        assert!(text.contains("Requester: N/A"));
        assert!(text.contains("Technician: Unassigned"));
        assert!(text.contains("No followups recorded."));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn test_detail_renders_followups_in_given_order() {
        let mut ticket = ticket();
        let followups: Vec<Followup> = serde_json::from_str(
            r#"[
                {"id": 2, "content": "<p>newer</p>", "user": {"id": 1, "name": "Ana"}},
                {"id": 1, "content": "<p>older</p>", "user": {"id": 2, "name": "Bruno"}}
            ]"#,
        )
        .unwrap();
        ticket.followups = Some(followups);
        let text = rendered(&detail_lines(&ticket, 80));
        let newer = text.find("newer").unwrap();
        let older = text.find("older").unwrap();
        assert!(newer < older, "rendering preserves the controller's order");
    }

    #[test]
    fn test_detail_strips_html_from_description() {
        let text = rendered(&detail_lines(&ticket(), 80));
        assert!(text.contains("please help"));
        assert!(!text.contains("<p>"));
    }
}
