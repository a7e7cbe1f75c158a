//! Conversation session.
//!
//! The session owns the activation flag, the history, the current resource
//! id, and the set of in-flight requests. It is mutated only by its owner.
//! Backend calls run as spawned tasks that never touch session state; they
//! post a [`SessionEvent`] to the session inbox, and the owner feeds those
//! back through [`Session::handle_event`] (or [`Session::settle`]).
//!
//! Replies are applied in completion order, which need not match submission
//! order when several requests are in flight.

mod display;
mod message;
mod task;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use display::{DisplayBody, DisplayEntry, DisplayLog, DisplaySink, DisplayState};
pub use message::{ConversationHistory, Message, MessageId, Sender};
pub use task::{PendingRequest, RequestId, RequestSeq, SessionEvent};

use crate::config::Config;
use crate::host::HostMessage;
use crate::markup::{Markup, MarkupRenderer, Render};
use crate::navigation::resource_id_from_location;
use crate::transport::{ChatRequest, Transport, TransportError};

/// Shown while a reply is pending.
pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Shown when an exchange fails for any reason.
pub const APOLOGY_TEXT: &str = "Sorry, there was an error processing your request.";

/// Session behaviour knobs, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Greeting shown on first activation (none when `None`).
    pub greeting: Option<String>,
    /// Append the apology for a failed exchange to history.
    pub record_failed_exchanges: bool,
    /// Query parameter carrying the resource id.
    pub resource_param: String,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        let greeting = config.greeting.trim();
        Self {
            greeting: (!greeting.is_empty()).then(|| greeting.to_string()),
            record_failed_exchanges: config.record_failed_exchanges,
            resource_param: config.resource_param.clone(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct Session {
    options: SessionOptions,
    active: bool,
    /// Whether the widget has been shown at least once.
    surfaced: bool,
    location: Option<String>,
    resource_id: Option<String>,
    history: ConversationHistory,
    pending: HashMap<RequestId, PendingRequest>,
    seq: RequestSeq,
    transport: Arc<dyn Transport>,
    renderer: Box<dyn Render>,
    sink: Box<dyn DisplaySink>,
    inbox_tx: mpsc::UnboundedSender<SessionEvent>,
    inbox_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Session {
    pub fn new(
        options: SessionOptions,
        transport: Arc<dyn Transport>,
        sink: Box<dyn DisplaySink>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            options,
            active: false,
            surfaced: false,
            location: None,
            resource_id: None,
            history: ConversationHistory::new(),
            pending: HashMap::new(),
            seq: RequestSeq::default(),
            transport,
            renderer: Box::new(MarkupRenderer),
            sink,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Replaces the reply renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Render>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn external_resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Shows the widget. The first activation also shows the greeting.
    pub fn activate(&mut self) {
        if !self.surfaced {
            self.surfaced = true;
            if let Some(greeting) = self.options.greeting.clone() {
                self.show(Message::bot(greeting), None);
            }
        }
        self.sink.set_visible(true);
        if !self.active {
            debug!("session activated");
            self.active = true;
        }
    }

    /// Hides the widget and abandons every in-flight request.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        debug!(pending = self.pending.len(), "session deactivated");
        self.active = false;
        self.sink.set_visible(false);
        self.cancel_pending();
    }

    pub fn toggle(&mut self) {
        if self.active {
            self.deactivate();
        } else {
            self.activate();
        }
    }

    pub fn handle_host_message(&mut self, message: HostMessage) {
        match message {
            HostMessage::ToggleChat => self.toggle(),
            HostMessage::Unknown => debug!("ignoring unknown host message"),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigation-change notification. Returns true when the location changed.
    pub fn navigate(&mut self, location: &str) -> bool {
        if self.location.as_deref() == Some(location) {
            return false;
        }
        self.resource_id = resource_id_from_location(location, &self.options.resource_param);
        self.location = Some(location.to_string());
        debug!(resource_id = ?self.resource_id, "location changed");
        true
    }

    // ========================================================================
    // Messaging
    // ========================================================================

    /// Records and dispatches a user message.
    ///
    /// Whitespace-only input, and any input while the widget is hidden, is
    /// ignored and returns `None`. Must be called from within a tokio runtime.
    pub fn send_user_message(&mut self, text: &str) -> Option<RequestId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !self.active {
            debug!("ignoring message sent while inactive");
            return None;
        }

        let user = Message::user(text);
        self.history.push(user.clone());
        self.show(user, None);

        let placeholder = Message::placeholder(PLACEHOLDER_TEXT);
        let placeholder_id = placeholder.id;
        self.show(placeholder, None);

        let request = ChatRequest {
            message: text.to_string(),
            video_id: self.resource_id.clone(),
            history: self.history.to_wire(),
        };

        let id = self.seq.next_id();
        let cancel = CancellationToken::new();
        self.pending.insert(
            id,
            PendingRequest {
                placeholder: placeholder_id,
                cancel: cancel.clone(),
            },
        );
        debug!(request = id.0, video_id = ?request.video_id, "dispatching chat request");

        let reply = self.transport.send_chat(request);
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                result = reply => {
                    let _ = tx.send(SessionEvent::ReplyCompleted { id, result });
                }
            }
        });

        Some(id)
    }

    /// Waits for the next inbox event.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.inbox_rx.recv().await
    }

    /// Returns an inbox event if one is ready.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.inbox_rx.try_recv().ok()
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ReplyCompleted { id, result } => self.complete_request(id, result),
        }
    }

    /// Processes inbox events until no request is in flight.
    pub async fn settle(&mut self) {
        while !self.pending.is_empty() {
            let Some(event) = self.next_event().await else {
                break;
            };
            self.handle_event(event);
        }
    }

    fn complete_request(&mut self, id: RequestId, result: Result<String, TransportError>) {
        let Some(pending) = self.pending.remove(&id) else {
            warn!(request = id.0, "discarding completion for a request no longer pending");
            return;
        };
        self.sink.remove(pending.placeholder);

        match result {
            Ok(reply) => {
                debug!(request = id.0, "reply received");
                let markup = self.renderer.render(&reply);
                let message = Message::bot(reply);
                self.history.push(message.clone());
                self.show(message, Some(markup));
            }
            Err(err) => {
                warn!(request = id.0, kind = %err.kind, error = %err, "chat request failed");
                let message = Message::bot(APOLOGY_TEXT);
                if self.options.record_failed_exchanges {
                    self.history.push(message.clone());
                }
                self.show(message, None);
            }
        }
    }

    fn cancel_pending(&mut self) {
        for (id, pending) in self.pending.drain() {
            debug!(request = id.0, "cancelling request");
            pending.cancel.cancel();
            self.sink.remove(pending.placeholder);
        }
    }

    fn show(&mut self, message: Message, markup: Option<Markup>) {
        let body = match markup {
            Some(markup) => DisplayBody::Markup(markup),
            None => DisplayBody::Text(message.text),
        };
        self.sink.append(DisplayEntry {
            id: message.id,
            sender: message.sender,
            body,
            is_placeholder: message.is_placeholder,
        });
    }
}
