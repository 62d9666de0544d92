//! Cross-window messenger
//!
//! A [`WindowMessenger`] owns one child window opened through a
//! [`WindowHost`] and exchanges [`Envelope`]s with it:
//!
//! - outgoing events are posted to the child targeting the child's origin
//! - incoming messages reach the [`MessageSink`] handed to the host, which
//!   drops anything whose origin differs from the popup URL's origin and
//!   dispatches the rest to the listeners registered for the event tag
//!
//! ## Example
//!
//! ```rust
//! use siws_wallet_popup::messenger::{MemoryWindowHost, WindowMessenger};
//! use serde_json::json;
//!
//! let host = MemoryWindowHost::new();
//! let messenger = WindowMessenger::create(&host, "https://proxy.example.com/signin", "").unwrap();
//! messenger.on("pong", |data| println!("got {data}"));
//! messenger.send_event("ping", &json!({ "n": 1 })).unwrap();
//!
//! let window = host.last_window().unwrap();
//! assert_eq!(window.sent()[0].event, "ping");
//! ```

mod memory;

pub use memory::{MemoryWindowHandle, MemoryWindowHost, Responder};

use crate::error::{ProxyError, Result};
use crate::message::Envelope;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};
use url::Url;

/// Callback registered for one event tag
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle to an opened child window
pub trait ChildWindow {
    /// Post a serialized envelope; delivery is best effort
    fn post_message(&self, message: &str, target_origin: &str) -> Result<()>;

    fn is_closed(&self) -> bool;

    fn close(&self);
}

/// Something that can open child windows (the browser, or a test double)
pub trait WindowHost {
    /// Open `url` and route the child's messages into `sink`
    fn open(&self, url: &str, features: &str, sink: MessageSink) -> Result<Box<dyn ChildWindow>>;
}

impl<H: WindowHost + ?Sized> WindowHost for &H {
    fn open(&self, url: &str, features: &str, sink: MessageSink) -> Result<Box<dyn ChildWindow>> {
        (**self).open(url, features, sink)
    }
}

impl<H: WindowHost + ?Sized> WindowHost for Arc<H> {
    fn open(&self, url: &str, features: &str, sink: MessageSink) -> Result<Box<dyn ChildWindow>> {
        (**self).open(url, features, sink)
    }
}

/// Message received from a window
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub origin: String,
    /// Raw JSON text of the envelope
    pub data: String,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
        }
    }
}

struct SinkInner {
    expected_origin: String,
    listeners: DashMap<String, Vec<Listener>>,
    disposed: AtomicBool,
}

/// Listener registry shared between a messenger and its window host
#[derive(Clone)]
pub struct MessageSink {
    inner: Arc<SinkInner>,
}

impl MessageSink {
    pub fn new(expected_origin: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SinkInner {
                expected_origin: expected_origin.into(),
                listeners: DashMap::new(),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn expected_origin(&self) -> &str {
        &self.inner.expected_origin
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.listeners.get(event).map_or(0, |l| l.len())
    }

    fn subscribe(&self, event: &str, listener: Listener) {
        self.inner
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::Release);
        self.inner.listeners.clear();
    }

    /// Route one inbound message; returns how many listeners ran
    pub fn dispatch(&self, message: InboundMessage) -> usize {
        if self.is_disposed() {
            return 0;
        }

        if message.origin != self.inner.expected_origin {
            warn!(
                origin = %message.origin,
                expected = %self.inner.expected_origin,
                "Dropping message from unexpected origin"
            );
            return 0;
        }

        let envelope: Envelope = match serde_json::from_str(&message.data) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "Ignoring message that is not an event envelope");
                return 0;
            }
        };

        // clone out so listeners may register or dispose without deadlocking
        let listeners = match self.inner.listeners.get(&envelope.event) {
            Some(listeners) => listeners.clone(),
            None => return 0,
        };

        for listener in &listeners {
            listener(&envelope.data);
        }
        listeners.len()
    }
}

impl fmt::Debug for MessageSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSink")
            .field("expected_origin", &self.inner.expected_origin)
            .field("events", &self.inner.listeners.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Serialized origin of a URL (`scheme://host[:port]`)
pub fn origin_of(url: &str) -> Result<String> {
    Ok(Url::parse(url)?.origin().ascii_serialization())
}

/// Messenger bound to one child window
pub struct WindowMessenger {
    child_window: Option<Box<dyn ChildWindow>>,
    sink: MessageSink,
    url: String,
}

impl WindowMessenger {
    /// Open `url` through `host` and bind a messenger to it
    pub fn create(host: &dyn WindowHost, url: &str, features: &str) -> Result<Self> {
        let origin = origin_of(url)?;
        let sink = MessageSink::new(origin);

        let child_window = host.open(url, features, sink.clone()).inspect_err(|e| {
            error!(url, error = %e, "Failed to create window messenger");
        })?;

        debug!(url, "Window messenger created");
        Ok(Self {
            child_window: Some(child_window),
            sink,
            url: url.to_string(),
        })
    }

    /// Register a listener for `event`; each matching message invokes it once
    pub fn on<F>(&self, event: &str, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.sink.subscribe(event, Arc::new(callback));
    }

    /// Post `{event, data: payload}` to the child window
    pub fn send_event<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<()> {
        let window = self.child_window.as_ref().ok_or(ProxyError::Disposed)?;
        let envelope = Envelope::new(event, serde_json::to_value(payload)?);
        let message = serde_json::to_string(&envelope)?;
        window.post_message(&message, self.sink.expected_origin())
    }

    pub fn child_window(&self) -> Option<&dyn ChildWindow> {
        self.child_window.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn origin(&self) -> &str {
        self.sink.expected_origin()
    }

    pub fn is_disposed(&self) -> bool {
        self.sink.is_disposed()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.sink.listener_count(event)
    }

    /// Close the window if still open, remove all listeners, release the handle
    pub fn dispose(&mut self) {
        if let Some(window) = self.child_window.take() {
            if !window.is_closed() {
                window.close();
            }
        }
        self.sink.dispose();
    }
}

impl fmt::Debug for WindowMessenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowMessenger")
            .field("url", &self.url)
            .field("has_window", &self.child_window.is_some())
            .field("sink", &self.sink)
            .finish()
    }
}
