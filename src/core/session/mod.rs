//! One conversation: the transcript plus the request and reveal in flight.
//!
//! The session is the only mutator of its state. Background work (the
//! outbound request, reveal ticks) reports back through a channel as
//! [`SessionEvent`]s, and the owner feeds them in with
//! [`ConversationSession::next_update`] or
//! [`ConversationSession::drain_events`]. Events carry the id of the request
//! or reveal that produced them; anything from a superseded id is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ChatTransport, TransportError};
use crate::core::message::{Message, MessageId, Role};
use crate::core::reveal::{RevealController, RevealEvent};
use crate::core::scheduler::{Scheduler, TickHandle};


/// Assistant message shown when the chat service cannot be reached.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't reach the chat service. Please try again.";

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum SessionEvent {
    ReplyReceived {
        request_id: u64,
        result: Result<String, TransportError>,
    },
    RevealTick {
        reveal_id: u64,
    },
}

/// What the presentation layer needs to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The in-progress reveal text.
    Streaming(String),
    MessageAppended(Message),
    /// The outbound request failed; carries a one-line summary of the cause.
    RequestFailed(String),
}

pub struct ConversationSession {
    transport: Arc<dyn ChatTransport>,
    scheduler: Arc<dyn Scheduler>,
    tick_interval: Duration,

    messages: Vec<Message>,
    next_message_id: u64,

    pending: bool,
    request_id: u64,
    request_cancel: Option<CancellationToken>,

    reveal: RevealController,
    reveal_id: u64,
    reveal_timer: Option<TickHandle>,

    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl ConversationSession {
    pub fn new(transport: Arc<dyn ChatTransport>, scheduler: Arc<dyn Scheduler>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport,
            scheduler,
            tick_interval: DEFAULT_TICK_INTERVAL,
            messages: Vec::new(),
            next_message_id: 0,
            pending: false,
            request_id: 0,
            request_cancel: None,
            reveal: RevealController::new(),
            reveal_id: 0,
            reveal_timer: None,
            tx,
            rx,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Waiting on the chat service; no partial content exists yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// A reply is being revealed.
    pub fn is_streaming(&self) -> bool {
        self.reveal.is_active()
    }

    pub fn is_busy(&self) -> bool {
        self.is_pending() || self.is_streaming()
    }

    /// Text revealed so far, empty unless streaming.
    pub fn streaming_text(&self) -> &str {
        self.reveal.emitted_prefix()
    }

    /// Append the user's message and send it. Ignored (returns `false`) for
    /// blank input or while a request or reveal is in flight.
    pub fn submit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.is_busy() {
            debug!(
                pending = self.pending,
                streaming = self.is_streaming(),
                "Submit ignored while busy"
            );
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }

        self.append(Role::User, text.clone());
        self.pending = true;
        self.request_id += 1;

        let request_id = self.request_id;
        let token = CancellationToken::new();
        self.request_cancel = Some(token.clone());
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        info!(request_id, chars = text.len(), "Sending chat request");

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(request_id, "Chat request abandoned");
                }
                result = transport.send(&text) => {
                    if tx.send(SessionEvent::ReplyReceived { request_id, result }).is_err() {
                        debug!(request_id, "Session gone; reply dropped");
                    }
                }
            }
        });
        true
    }

    /// Stop the running reveal. Whatever had been revealed becomes the
    /// assistant message; if nothing had, the reply is dropped. No-op when
    /// not streaming.
    pub fn cancel(&mut self) -> Vec<SessionUpdate> {
        if !self.is_streaming() {
            return Vec::new();
        }
        self.reveal_timer = None;

        match self.reveal.cancel() {
            Ok(Some(prefix)) => {
                info!(reveal_id = self.reveal_id, chars = prefix.len(), "Reveal cancelled");
                let message = self.append(Role::Assistant, prefix);
                vec![SessionUpdate::MessageAppended(message)]
            }
            Ok(None) => {
                info!(reveal_id = self.reveal_id, "Reveal cancelled before any text");
                Vec::new()
            }
            Err(err) => {
                debug!(error = %err, "Cancel ignored");
                Vec::new()
            }
        }
    }

    /// Start over with an empty transcript. Any request or reveal in flight
    /// is abandoned.
    pub fn reset(&mut self) {
        self.abandon_request();
        self.reveal_timer = None;
        self.reveal = RevealController::new();
        self.messages.clear();
        self.pending = false;
        self.request_id += 1;
        self.reveal_id += 1;
        info!("Conversation reset");
    }

    /// Wait for the next background event and apply it.
    pub async fn next_update(&mut self) -> Vec<SessionUpdate> {
        match self.rx.recv().await {
            Some(event) => self.handle_event(event),
            None => Vec::new(),
        }
    }

    /// Apply every event already queued, without waiting.
    pub fn drain_events(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            updates.extend(self.handle_event(event));
        }
        updates
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<SessionUpdate> {
        match event {
            SessionEvent::ReplyReceived { request_id, result } => {
                if request_id != self.request_id || !self.pending {
                    debug!(request_id, current = self.request_id, "Stale reply dropped");
                    return Vec::new();
                }
                self.pending = false;
                self.request_cancel = None;
                match result {
                    Ok(reply) => self.begin_reveal(reply),
                    Err(err) => self.fail_request(&err),
                }
            }
            SessionEvent::RevealTick { reveal_id } => {
                if reveal_id != self.reveal_id {
                    return Vec::new();
                }
                self.advance_reveal()
            }
        }
    }

    fn begin_reveal(&mut self, reply: String) -> Vec<SessionUpdate> {
        if let Err(err) = self.reveal.start(reply) {
            warn!(error = %err, "Reply dropped");
            return Vec::new();
        }
        self.reveal_id += 1;
        let reveal_id = self.reveal_id;
        let tx = self.tx.clone();
        self.reveal_timer = Some(self.scheduler.schedule(
            self.tick_interval,
            Box::new(move || {
                if tx.send(SessionEvent::RevealTick { reveal_id }).is_err() {
                    debug!(reveal_id, "Session gone; tick dropped");
                }
            }),
        ));
        debug!(
            reveal_id,
            words = self.reveal.state().map_or(0, |state| state.word_count()),
            "Reveal started"
        );
        Vec::new()
    }

    fn advance_reveal(&mut self) -> Vec<SessionUpdate> {
        match self.reveal.tick() {
            Some(RevealEvent::Progress(prefix)) => vec![SessionUpdate::Streaming(prefix)],
            Some(RevealEvent::Completed(text)) => {
                self.reveal_timer = None;
                debug!(reveal_id = self.reveal_id, "Reveal completed");
                let message = self.append(Role::Assistant, text);
                vec![SessionUpdate::MessageAppended(message)]
            }
            None => Vec::new(),
        }
    }

    fn fail_request(&mut self, err: &TransportError) -> Vec<SessionUpdate> {
        let summary = err.summary();
        warn!(request_id = self.request_id, error = %summary, "Chat request failed");
        let message = self.append(Role::Assistant, TRANSPORT_FAILURE_MESSAGE);
        vec![
            SessionUpdate::RequestFailed(summary),
            SessionUpdate::MessageAppended(message),
        ]
    }

    fn append(&mut self, role: Role, content: impl Into<String>) -> Message {
        self.next_message_id += 1;
        let message = Message::new(MessageId(self.next_message_id), role, content);
        self.messages.push(message.clone());
        message
    }

    fn abandon_request(&mut self) {
        if let Some(token) = self.request_cancel.take() {
            token.cancel();
        }
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        self.abandon_request();
    }
}
