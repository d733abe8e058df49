//! Terminal input and the refresh cadence, merged into one ordered stream
//! for the UI loop.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A key press. Releases and repeats never reach the app.
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Time to pick up the collector's latest snapshot.
    Refresh,
    /// The screen changed underneath us and must be repainted.
    Redraw,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// Reads the real terminal and emits `Refresh` every `refresh_every`.
    pub fn new(refresh_every: Duration) -> Self {
        Self::with_input(EventStream::new(), refresh_every)
    }

    /// The first `Refresh` arrives one period after start, since the app
    /// collects synchronously before its first frame. A stalled loop gets one
    /// refresh when it wakes, not a burst.
    pub fn with_input<S>(input: S, refresh_every: Duration) -> Self
    where
        S: Stream<Item = io::Result<CrosstermEvent>> + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut input = input;
            let mut refresh = time::interval_at(Instant::now() + refresh_every, refresh_every);
            refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    next = input.next() => match next {
                        Some(Ok(raw)) => match translate(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(err)) => {
                            warn!(%err, "terminal input failed");
                            break;
                        }
                        None => {
                            debug!("terminal input closed");
                            break;
                        }
                    },
                    _ = refresh.tick() => Event::Refresh,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    /// `None` once input has ended; the UI loop should stop.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(_, _) => Some(Event::Redraw),
        // Coming back to the terminal is a good moment for fresh numbers.
        CrosstermEvent::FocusGained => Some(Event::Refresh),
        _ => None,
    }
}
