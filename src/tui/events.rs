// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal event handling.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::interval;

/// Terminal events.
#[derive(Debug, Clone)]
pub enum Event {
    /// A tick event for spinner animation.
    Tick,
    /// A key press event.
    Key(KeyEvent),
    /// Terminal resize event.
    Resize(u16, u16),
}

/// Event handler that polls for terminal events on a background task.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate in milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        tokio::spawn(async move {
            let mut ticker = interval(tick_rate);

            loop {
                let event = tokio::select! {
                    _ = ticker.tick() => Event::Tick,
                    event = poll_event() => event,
                };

                if tx_clone.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, if available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Poll for a crossterm event.
async fn poll_event() -> Event {
    // Short poll timeout so the tokio task stays responsive.
    loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(event) = event::read() {
                match event {
                    // Windows terminals emit Release events too; act on press only.
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        return Event::Key(key)
                    }
                    CrosstermEvent::Resize(w, h) => return Event::Resize(w, h),
                    _ => continue,
                }
            }
        }
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let tick = Event::Tick;
        assert!(matches!(tick, Event::Tick));

        let resize = Event::Resize(80, 24);
        if let Event::Resize(w, h) = resize {
            assert_eq!(w, 80);
            assert_eq!(h, 24);
        }
    }
}
