use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{ChatTransport, TransportError};
use crate::core::scheduler::ManualScheduler;
use crate::core::session::ConversationSession;

pub const TEST_TICK: Duration = Duration::from_millis(40);

/// Answers requests from a queue of canned results.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    received: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            ..Self::default()
        }
    }

    /// Hold every request until the returned `Notify` is signalled once per
    /// request.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().expect("received lock").clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .expect("received lock")
            .push(message.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}

pub fn create_test_session(transport: Arc<ScriptedTransport>) -> (ConversationSession, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let session = ConversationSession::new(transport, Arc::new(scheduler.clone()))
        .with_tick_interval(TEST_TICK);
    (session, scheduler)
}
