//! Integration tests for the popup sign-in transaction
//!
//! A [`MemoryWindowHost`] plays the wallet proxy page. Time is paused so the
//! popup-closed poll advances instantly.

use crate::support::{CountingTimer, PROXY_ORIGIN, RPC_URL, answer_signin, config, response};
use serde_json::json;
use siws_wallet_popup::{
    Envelope, MemoryWindowHost, Message, PopupSignIn, ProxyError, TokioTimer, WalletProxyResponse,
    signin_url,
};
use std::time::Duration;

// ============================================================================
// Successful sign-in
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_signin_resolves_with_detail() {
    let host = MemoryWindowHost::new().with_responder(answer_signin(json!({ "ok": true })));
    let timer = CountingTimer::default();
    let mut session = PopupSignIn::new(host.clone(), timer.clone(), config());

    let payload = session.get_login_or_registration_payload().await.unwrap();

    assert_eq!(payload, WalletProxyResponse(json!({ "ok": true })));

    let window = host.last_window().unwrap();
    assert!(window.is_closed());
    assert!(window.is_disposed());
    assert!(session.messenger().is_none());
    assert_eq!(timer.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_signin_sends_configured_request() {
    let host = MemoryWindowHost::new().with_responder(answer_signin(json!({})));
    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config());

    session.get_login_or_registration_payload().await.unwrap();

    let window = host.last_window().unwrap();
    assert_eq!(window.url(), signin_url("https://proxy.example.com", RPC_URL));
    assert_eq!(
        window.url(),
        "https://proxy.example.com/signin?frequencyRpcUrl=ws%3A%2F%2Flocalhost%3A9944"
    );
    assert_eq!(
        window.sent(),
        vec![Envelope::new(
            "signinPayload",
            json!({
                "providerId": "42",
                "requiredSchemas": [{ "name": "broadcast", "version": 2 }],
                "siwsOptions": { "expiresInMsecs": 60000 }
            })
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_late_response_after_several_polls() {
    let host = MemoryWindowHost::new();
    let timer = CountingTimer::default();
    let mut session = PopupSignIn::new(host.clone(), timer.clone(), config());

    let proxy = async {
        tokio::time::sleep(Duration::from_millis(1_700)).await;
        host.last_window().unwrap().reply(&response(json!({ "signedUp": true })));
    };

    let (result, ()) = tokio::join!(session.get_login_or_registration_payload(), proxy);

    assert_eq!(result.unwrap().into_inner(), json!({ "signedUp": true }));
    assert!(timer.started() >= 3);
    assert_eq!(timer.active(), 0);
    assert!(host.last_window().unwrap().is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_forged_response_is_ignored() {
    let host = MemoryWindowHost::new();
    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config());

    let proxy = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let window = host.last_window().unwrap();
        let forged = serde_json::to_string(&response(json!({ "forged": true }))).unwrap();
        assert_eq!(window.inject("https://evil.example", forged), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(window.origin(), PROXY_ORIGIN);
        window.reply(&response(json!({ "genuine": true })));
    };

    let (result, ()) = tokio::join!(session.get_login_or_registration_payload(), proxy);

    assert_eq!(result.unwrap().into_inner(), json!({ "genuine": true }));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_popup_blocked() {
    let host = MemoryWindowHost::new().blocking_popups();
    let timer = CountingTimer::default();
    let mut session = PopupSignIn::new(host.clone(), timer.clone(), config());

    let err = session.get_login_or_registration_payload().await.unwrap_err();

    assert_eq!(err, ProxyError::WindowOpen("popup blocked".into()));
    assert!(err.is_retryable());
    assert_eq!(timer.started(), 0);
    assert_eq!(timer.active(), 0);
    assert!(session.messenger().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_user_closes_popup() {
    let host = MemoryWindowHost::new();
    let timer = CountingTimer::default();
    let mut session = PopupSignIn::new(host.clone(), timer.clone(), config());

    let user = async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        host.last_window().unwrap().close();
    };

    let (result, ()) = tokio::join!(session.get_login_or_registration_payload(), user);

    let err = result.unwrap_err();
    assert_eq!(err, ProxyError::Cancelled);
    assert!(err.is_user_cancelled());
    assert_eq!(timer.active(), 0);
    assert!(host.last_window().unwrap().is_disposed());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_response_is_rejected() {
    let host = MemoryWindowHost::new().with_responder(|envelope| {
        if envelope.is(Message::SigninPayload) {
            vec![Envelope::new(
                Message::WalletProxyResponseMessage.as_str(),
                json!({ "unexpected": 1 }),
            )]
        } else {
            Vec::new()
        }
    });
    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config());

    let err = session.get_login_or_registration_payload().await.unwrap_err();

    assert!(matches!(err, ProxyError::Serialization(_)));
    assert!(host.last_window().unwrap().is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_transaction_cleans_up() {
    let host = MemoryWindowHost::new();
    let timer = CountingTimer::default();
    let mut session = PopupSignIn::new(host.clone(), timer.clone(), config());

    let outcome = tokio::time::timeout(
        Duration::from_secs(3),
        session.get_login_or_registration_payload(),
    )
    .await;

    assert!(outcome.is_err());
    let window = host.last_window().unwrap();
    assert!(window.is_closed());
    assert!(window.is_disposed());
    assert_eq!(timer.active(), 0);
    assert!(session.messenger().is_none());
}

// ============================================================================
// Session reuse
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_session_runs_sequential_signins() {
    let host = MemoryWindowHost::new().with_responder(answer_signin(json!({ "ok": true })));
    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config());

    session.get_login_or_registration_payload().await.unwrap();
    session.get_login_or_registration_payload().await.unwrap();

    let windows = host.windows();
    assert_eq!(windows.len(), 2);
    assert!(windows.iter().all(|w| w.is_closed() && w.is_disposed()));
}

#[test]
fn test_render_popup_replaces_active_messenger() {
    let host = MemoryWindowHost::new();
    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config());

    session.render_popup("https://a.example", RPC_URL).unwrap();
    session.render_popup("https://b.example", RPC_URL).unwrap();

    let windows = host.windows();
    assert!(windows[0].is_closed() && windows[0].is_disposed());
    assert!(!windows[1].is_closed());
    assert_eq!(session.messenger().unwrap().origin(), "https://b.example");

    drop(session);
    assert!(windows[1].is_closed());
}
