//! In-memory window host
//!
//! Opens simulated child windows. A scripted [`Responder`] plays the wallet
//! proxy page: every envelope posted to a window is passed to it and the
//! envelopes it returns are delivered back from the window's origin.

use super::{ChildWindow, InboundMessage, MessageSink, WindowHost, origin_of};
use crate::error::{ProxyError, Result};
use crate::message::Envelope;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Scripted child page
pub type Responder = Arc<dyn Fn(&Envelope) -> Vec<Envelope> + Send + Sync>;

#[derive(Default)]
struct HostState {
    blocked: AtomicBool,
    responder: Mutex<Option<Responder>>,
    windows: Mutex<Vec<MemoryWindowHandle>>,
}

/// In-memory [`WindowHost`] for tests and simulations
#[derive(Clone, Default)]
pub struct MemoryWindowHost {
    state: Arc<HostState>,
}

impl MemoryWindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every `open`, as a popup blocker would
    pub fn blocking_popups(self) -> Self {
        self.state.blocked.store(true, Ordering::SeqCst);
        self
    }

    /// Script the child page
    pub fn with_responder<F>(self, responder: F) -> Self
    where
        F: Fn(&Envelope) -> Vec<Envelope> + Send + Sync + 'static,
    {
        *self.state.responder.lock() = Some(Arc::new(responder));
        self
    }

    /// All windows opened so far
    pub fn windows(&self) -> Vec<MemoryWindowHandle> {
        self.state.windows.lock().clone()
    }

    pub fn last_window(&self) -> Option<MemoryWindowHandle> {
        self.state.windows.lock().last().cloned()
    }
}

impl WindowHost for MemoryWindowHost {
    fn open(&self, url: &str, features: &str, sink: MessageSink) -> Result<Box<dyn ChildWindow>> {
        if self.state.blocked.load(Ordering::SeqCst) {
            return Err(ProxyError::WindowOpen("popup blocked".into()));
        }

        let handle = MemoryWindowHandle {
            state: Arc::new(WindowState {
                url: url.to_string(),
                features: features.to_string(),
                origin: origin_of(url)?,
                closed: AtomicBool::new(false),
                sent: Mutex::new(Vec::new()),
                sink,
            }),
        };
        self.state.windows.lock().push(handle.clone());

        Ok(Box::new(MemoryWindow {
            handle,
            responder: self.state.responder.lock().clone(),
        }))
    }
}

struct WindowState {
    url: String,
    features: String,
    origin: String,
    closed: AtomicBool,
    sent: Mutex<Vec<Envelope>>,
    sink: MessageSink,
}

/// Test-side view of a simulated window
#[derive(Clone)]
pub struct MemoryWindowHandle {
    state: Arc<WindowState>,
}

impl MemoryWindowHandle {
    pub fn url(&self) -> &str {
        &self.state.url
    }

    pub fn features(&self) -> &str {
        &self.state.features
    }

    pub fn origin(&self) -> &str {
        &self.state.origin
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Close the window, as the user would
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }

    /// Envelopes the parent posted to this window
    pub fn sent(&self) -> Vec<Envelope> {
        self.state.sent.lock().clone()
    }

    /// Whether the parent's messenger for this window was disposed
    pub fn is_disposed(&self) -> bool {
        self.state.sink.is_disposed()
    }

    /// Post an envelope to the parent from this window's origin
    pub fn reply(&self, envelope: &Envelope) -> usize {
        match serde_json::to_string(envelope) {
            Ok(data) => self.inject(&self.state.origin, data),
            Err(_) => 0,
        }
    }

    /// Post raw message data to the parent from an arbitrary origin
    pub fn inject(&self, origin: &str, data: impl Into<String>) -> usize {
        self.state.sink.dispatch(InboundMessage::new(origin, data))
    }
}

struct MemoryWindow {
    handle: MemoryWindowHandle,
    responder: Option<Responder>,
}

impl ChildWindow for MemoryWindow {
    fn post_message(&self, message: &str, target_origin: &str) -> Result<()> {
        if self.handle.is_closed() {
            debug!(url = self.handle.url(), "Message to closed window dropped");
            return Ok(());
        }
        if target_origin != "*" && target_origin != self.handle.origin() {
            debug!(target_origin, "Message for another origin dropped");
            return Ok(());
        }

        let envelope: Envelope = serde_json::from_str(message)?;
        self.handle.state.sent.lock().push(envelope.clone());

        if let Some(responder) = &self.responder {
            for reply in responder(&envelope) {
                self.handle.reply(&reply);
            }
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    fn close(&self) {
        self.handle.close();
    }
}
