//! Browser window host and timer

use crate::error::js_error_message;
use futures_util::future::LocalBoxFuture;
use siws_wallet_popup::{ChildWindow, InboundMessage, MessageSink, ProxyError, Timer, WindowHost};
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, Window};

type PopupResult<T> = std::result::Result<T, ProxyError>;

/// Opens popups with `window.open` and listens for their `message` events
#[derive(Debug, Clone)]
pub struct BrowserWindowHost {
    window: Window,
}

impl BrowserWindowHost {
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl WindowHost for BrowserWindowHost {
    fn open(&self, url: &str, features: &str, sink: MessageSink) -> PopupResult<Box<dyn ChildWindow>> {
        let child = self
            .window
            .open_with_url_and_target_and_features(url, "_blank", features)
            .map_err(|e| ProxyError::WindowOpen(js_error_message(&e)))?
            .ok_or_else(|| ProxyError::WindowOpen("popup blocked".into()))?;

        let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let data = event.data();
            let data = match data.as_string() {
                Some(text) => text,
                None => match js_sys::JSON::stringify(&data) {
                    Ok(text) => String::from(text),
                    Err(_) => return,
                },
            };
            sink.dispatch(InboundMessage::new(event.origin(), data));
        });

        if let Err(e) = self
            .window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
        {
            let _ = child.close();
            return Err(ProxyError::Transport(js_error_message(&e)));
        }

        Ok(Box::new(BrowserWindow {
            parent: self.window.clone(),
            child,
            listener,
        }))
    }
}

/// Popup opened by [`BrowserWindowHost`]
///
/// Dropping it unregisters the parent's `message` listener.
struct BrowserWindow {
    parent: Window,
    child: Window,
    listener: Closure<dyn FnMut(MessageEvent)>,
}

impl ChildWindow for BrowserWindow {
    fn post_message(&self, message: &str, target_origin: &str) -> PopupResult<()> {
        let value = js_sys::JSON::parse(message)
            .map_err(|e| ProxyError::Serialization(js_error_message(&e)))?;
        self.child
            .post_message(&value, target_origin)
            .map_err(|e| ProxyError::Transport(js_error_message(&e)))
    }

    fn is_closed(&self) -> bool {
        self.child.closed().unwrap_or(true)
    }

    fn close(&self) {
        let _ = self.child.close();
    }
}

impl Drop for BrowserWindow {
    fn drop(&mut self) {
        let _ = self
            .parent
            .remove_event_listener_with_callback("message", self.listener.as_ref().unchecked_ref());
        debug!("Popup message listener removed");
    }
}

/// `setTimeout`-backed timer
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }
}
