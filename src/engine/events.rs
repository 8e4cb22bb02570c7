use std::sync::Mutex;

use async_channel::{Receiver, Sender, TrySendError};

use crate::entities::{AuthoringSession, Coordinate, Place, RatingDraft, RouteEstimate, TravelMode};

const EVENT_BUFFER: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient, dismissible message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Located(Coordinate),
    AddressResolved(String),
    Notice(Notice),
    SuggestionsChanged(Vec<Place>),
    /// One mode's duration, published as soon as that mode's fetch resolves.
    DurationResolved { mode: TravelMode, seconds: f64 },
    EstimatePublished {
        selected: TravelMode,
        estimate: RouteEstimate,
    },
    AuthoringChanged(Option<AuthoringSession>),
    CommunityRoutesChanged(usize),
    RatingChanged(Option<RatingDraft>),
    ConnectivityChanged(bool),
}

struct Subscriber {
    tx: Sender<Event>,
    /// Kept so a full buffer can shed its oldest event.
    rx: Receiver<Event>,
}

#[derive(Default)]
struct Subscribers {
    list: Vec<Subscriber>,
    closed: bool,
}

/// Fan-out of engine events: every subscriber gets its own buffer and sees every event
/// published after it subscribed. Publishing never blocks; a full buffer drops its
/// oldest event to make room.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Subscribers>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.subscribers.lock().map(|s| s.list.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("subscribers", &count)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = async_channel::bounded(EVENT_BUFFER);

        match self.subscribers.lock() {
            Ok(mut subscribers) if !subscribers.closed => {
                subscribers.list.push(Subscriber {
                    tx,
                    rx: rx.clone(),
                });
            }
            _ => {
                tx.close();
            }
        }

        rx
    }

    pub fn publish(&self, event: Event) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };

        // only our own receiver left: the subscriber went away
        subscribers.list.retain(|s| s.tx.receiver_count() > 1);

        for subscriber in &subscribers.list {
            let mut event = event.clone();
            loop {
                match subscriber.tx.try_send(event) {
                    Ok(()) => break,
                    Err(TrySendError::Full(rejected)) => {
                        if let Ok(dropped) = subscriber.rx.try_recv() {
                            tracing::debug!("event buffer full, dropping {:?}", dropped);
                        }
                        event = rejected;
                    }
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        }
    }

    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => tracing::info!("notice: {}", message),
            NoticeLevel::Warning | NoticeLevel::Error => tracing::warn!("notice: {}", message),
        }

        self.publish(Event::Notice(Notice { level, message }));
    }

    /// Ends every subscription; receivers drain what is buffered and then see the close.
    pub fn close(&self) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.closed = true;
            for subscriber in subscribers.list.drain(..) {
                subscriber.tx.close();
            }
        }
    }
}
