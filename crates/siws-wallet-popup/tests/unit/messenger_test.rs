//! Unit tests for the window messenger
//!
//! These tests verify:
//! - Opening through a host and posting to the child's origin
//! - Listener fan-out and event tag matching
//! - Origin filtering of inbound messages
//! - Disposal semantics

use crate::support::{PROXY_ORIGIN, PROXY_URL};
use parking_lot::Mutex;
use serde_json::json;
use siws_wallet_popup::{
    Envelope, MemoryWindowHost, ProxyError, WindowFeatures, WindowMessenger, signin_url,
};
use std::sync::Arc;

fn popup_url() -> String {
    signin_url(PROXY_URL, "ws://localhost:9944")
}

#[test]
fn test_create_opens_child_window() {
    let host = MemoryWindowHost::new();
    let features = WindowFeatures::default().to_string();

    let messenger = WindowMessenger::create(&host, &popup_url(), &features).unwrap();

    let window = host.last_window().unwrap();
    assert_eq!(window.url(), popup_url());
    assert_eq!(window.features(), "width=600, height=800 screenX=400 screenY=100");
    assert_eq!(messenger.origin(), PROXY_ORIGIN);
    assert!(!messenger.is_disposed());
}

#[test]
fn test_create_rejects_invalid_url() {
    let host = MemoryWindowHost::new();
    let err = WindowMessenger::create(&host, "proxy/signin", "").unwrap_err();
    assert!(matches!(err, ProxyError::InvalidUrl(_)));
    assert!(host.windows().is_empty());
}

#[test]
fn test_send_event_posts_envelope() {
    let host = MemoryWindowHost::new();
    let messenger = WindowMessenger::create(&host, &popup_url(), "").unwrap();

    messenger.send_event("signinPayload", &json!({ "providerId": "1" })).unwrap();

    assert_eq!(
        host.last_window().unwrap().sent(),
        vec![Envelope::new("signinPayload", json!({ "providerId": "1" }))]
    );
}

#[test]
fn test_listeners_only_see_their_event() {
    let host = MemoryWindowHost::new();
    let messenger = WindowMessenger::create(&host, &popup_url(), "").unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    for name in ["a", "b"] {
        let log = log.clone();
        messenger.on(name, move |data| log.lock().push((name, data.clone())));
    }

    let window = host.last_window().unwrap();
    window.reply(&Envelope::new("b", json!(2)));
    window.reply(&Envelope::new("c", json!(3)));
    window.reply(&Envelope::new("a", json!(1)));

    assert_eq!(*log.lock(), vec![("b", json!(2)), ("a", json!(1))]);
    assert_eq!(messenger.listener_count("a"), 1);
    assert_eq!(messenger.listener_count("c"), 0);
}

#[test]
fn test_foreign_origin_is_ignored() {
    let host = MemoryWindowHost::new();
    let messenger = WindowMessenger::create(&host, &popup_url(), "").unwrap();
    let hits = Arc::new(Mutex::new(0));
    let counter = hits.clone();
    messenger.on("WalletProxyResponseMessage", move |_| *counter.lock() += 1);

    let window = host.last_window().unwrap();
    let forged = json!({ "event": "WalletProxyResponseMessage", "data": { "detail": {} } });

    assert_eq!(window.inject("https://evil.example", forged.to_string()), 0);
    assert_eq!(window.inject("http://proxy.example.com", forged.to_string()), 0);
    assert_eq!(window.inject(PROXY_ORIGIN, forged.to_string()), 1);
    assert_eq!(*hits.lock(), 1);
}

#[test]
fn test_dispose_closes_window_and_removes_listeners() {
    let host = MemoryWindowHost::new();
    let mut messenger = WindowMessenger::create(&host, &popup_url(), "").unwrap();
    messenger.on("a", |_| panic!("listener must not run after dispose"));

    messenger.dispose();

    let window = host.last_window().unwrap();
    assert!(window.is_disposed());
    assert!(window.is_closed());
    assert_eq!(window.reply(&Envelope::new("a", json!(null))), 0);
    assert_eq!(
        messenger.send_event("a", &json!(null)).unwrap_err(),
        ProxyError::Disposed
    );
}
