//! Unit tests for the extension connector
//!
//! These tests verify:
//! - Registry lookup and hook selection
//! - Failure classification with the upstream cause preserved
//! - The Talisman liveness probe
//! - Account filtering and raw signing

use siws_wallet_core::extension::{ConnectStrategy, HookStyle, MemoryWallet};
use siws_wallet_core::wrap::{to_hex, wrap_bytes};
use siws_wallet_core::{
    ConnectionState, Error, ExtensionConnector, ExtensionErrorKind, InjectedAccount,
    WalletProvider,
};
use std::error::Error as _;

const APP_NAME: &str = "SIWS Test App";
const ADDRESS: &str = "5Dc96kiTPTfZHmq6yTFSqejJzfUNfQQjneNesRWf9MDppJsd";

fn connector_with(wallets: impl IntoIterator<Item = MemoryWallet>) -> ExtensionConnector {
    ExtensionConnector::new(Some(MemoryWallet::registry(wallets)), APP_NAME).unwrap()
}

fn sample_accounts() -> Vec<InjectedAccount> {
    vec![
        InjectedAccount::new("5Alice").with_type("sr25519"),
        InjectedAccount::new("0xEth1").with_type("ethereum"),
        InjectedAccount::new("5Bob"),
        InjectedAccount::new("5Charlie").with_type("ed25519"),
        InjectedAccount::new("0xEth2").with_type("ethereum"),
    ]
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_missing_registry() {
    let result = ExtensionConnector::new(None, APP_NAME);
    assert!(matches!(result, Err(Error::NoInjectedRegistry)));
}

#[test]
fn test_new_connector_is_disconnected() {
    let connector = connector_with([MemoryWallet::enableable("polkadot-js")]);
    assert_eq!(connector.state(), ConnectionState::Disconnected);
    assert!(connector.injected_extension().is_none());
    assert_eq!(connector.app_name(), APP_NAME);
    assert_eq!(
        connector.available_wallets().collect::<Vec<_>>(),
        vec!["polkadot-js"]
    );
}

// ============================================================================
// Connect
// ============================================================================

#[tokio::test]
async fn test_connect_unknown_extension() {
    let wallet = MemoryWallet::enableable("polkadot-js");
    let connector = connector_with([wallet.clone()]);

    let err = connector.connect("does-not-exist").await.unwrap_err();

    assert_eq!(err.extension_kind(), Some(ExtensionErrorKind::NoExtension));
    assert_eq!(err.to_string(), "Wallet extension does-not-exist not found");
    assert_eq!(wallet.hook_calls(), 0);
    assert_eq!(connector.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_via_connect_hook() {
    let wallet = MemoryWallet::connectable("subwallet-js").with_version("1.2.3");
    let connector = connector_with([wallet.clone()]);

    let extension = connector.connect("subwallet-js").await.unwrap();

    assert_eq!(extension.name, "subwallet-js");
    assert_eq!(extension.version, "1.2.3");
    assert_eq!(wallet.hook_calls(), 1);
    assert_eq!(connector.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_connect_via_enable_hook_wraps_result() {
    let wallet = MemoryWallet::enableable("polkadot-js").with_version("0.44.1");
    let connector = connector_with([wallet.clone()]);

    let extension = connector.connect("polkadot-js").await.unwrap();

    assert_eq!(extension.name, "polkadot-js");
    assert_eq!(extension.version, "0.44.1");
    assert!(extension.can_sign());
    // no probe for ordinary extensions
    assert_eq!(wallet.account_calls(), 0);
}

#[tokio::test]
async fn test_enable_without_version_uses_empty_string() {
    let connector = connector_with([MemoryWallet::enableable("polkadot-js")]);
    let extension = connector.connect("polkadot-js").await.unwrap();
    assert_eq!(extension.version, "");
}

#[tokio::test]
async fn test_connect_without_hooks() {
    let wallet = MemoryWallet::new("metamask", HookStyle::Neither);
    let connector = connector_with([wallet]);

    let err = connector.connect("metamask").await.unwrap_err();

    assert!(matches!(err, Error::NoConnectHook));
    assert_eq!(err.extension_kind(), None);
}

#[test]
fn test_strategy_prefers_connect() {
    let connect = MemoryWallet::connectable("a");
    let enable = MemoryWallet::enableable("b");
    let neither = MemoryWallet::new("c", HookStyle::Neither);

    assert_eq!(
        ConnectStrategy::resolve(&connect as &dyn WalletProvider)
            .unwrap()
            .name(),
        "connect"
    );
    assert_eq!(
        ConnectStrategy::resolve(&enable as &dyn WalletProvider)
            .unwrap()
            .name(),
        "enable"
    );
    assert!(ConnectStrategy::resolve(&neither as &dyn WalletProvider).is_none());
}

#[tokio::test]
async fn test_enable_not_auth_is_unauthorized() {
    let wallet = MemoryWallet::enableable("polkadot-js").failing_handshake("not_auth");
    let connector = connector_with([wallet]);

    let err = connector.connect("polkadot-js").await.unwrap_err();

    assert_eq!(err.extension_kind(), Some(ExtensionErrorKind::Unauthorized));
    let cause = err.source().expect("cause is preserved");
    assert_eq!(cause.to_string(), "not_auth");
    assert_eq!(connector.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_failures_are_classified() {
    let cases = [
        ("Request is pending", ExtensionErrorKind::PendingAuth),
        (
            "The source has not been authorized yet",
            ExtensionErrorKind::PendingAuth,
        ),
        ("Origin not allowed", ExtensionErrorKind::Unauthorized),
        (
            "No SubWallet wallet accounts found",
            ExtensionErrorKind::NoAccountsAuthorized,
        ),
        ("Something exploded", ExtensionErrorKind::Unknown),
    ];

    for (message, expected) in cases {
        let connector = connector_with([MemoryWallet::connectable("subwallet-js").failing_handshake(message)]);
        let err = connector.connect("subwallet-js").await.unwrap_err();
        assert_eq!(err.extension_kind(), Some(expected), "{message}");
        assert_eq!(err.to_string(), message);
    }
}

#[tokio::test]
async fn test_talisman_probe_surfaces_rejection() {
    let wallet = MemoryWallet::enableable("talisman")
        .failing_accounts("The source https://app is not allowed to interact with this extension");
    let connector = connector_with([wallet.clone()]);

    let err = connector.connect("talisman").await.unwrap_err();

    assert_eq!(err.extension_kind(), Some(ExtensionErrorKind::Unauthorized));
    assert_eq!(wallet.account_calls(), 1);
    assert!(connector.injected_extension().is_none());
}

#[tokio::test]
async fn test_talisman_probe_success() {
    let wallet = MemoryWallet::enableable("talisman").with_accounts(sample_accounts());
    let connector = connector_with([wallet.clone()]);

    connector.connect("talisman").await.unwrap();

    assert_eq!(wallet.account_calls(), 1);
    assert_eq!(connector.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_failed_reconnect_keeps_previous_extension() {
    let good = MemoryWallet::enableable("polkadot-js");
    let bad = MemoryWallet::enableable("subwallet-js").failing_handshake("pending");
    let connector = connector_with([good, bad]);

    connector.connect("polkadot-js").await.unwrap();
    assert!(connector.connect("subwallet-js").await.is_err());

    assert_eq!(connector.injected_extension().unwrap().name, "polkadot-js");
    assert_eq!(connector.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_successful_reconnect_replaces_extension() {
    let connector = connector_with([
        MemoryWallet::enableable("polkadot-js"),
        MemoryWallet::connectable("subwallet-js"),
    ]);

    connector.connect("polkadot-js").await.unwrap();
    connector.connect("subwallet-js").await.unwrap();

    assert_eq!(connector.injected_extension().unwrap().name, "subwallet-js");
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_get_accounts_requires_connection() {
    let wallet = MemoryWallet::enableable("polkadot-js").with_accounts(sample_accounts());
    let connector = connector_with([wallet.clone()]);

    let err = connector.get_accounts().await.unwrap_err();

    assert!(matches!(err, Error::NotConnected));
    assert_eq!(wallet.account_calls(), 0);
    assert_eq!(wallet.hook_calls(), 0);
}

#[tokio::test]
async fn test_get_accounts_filters_ethereum_in_order() {
    let wallet = MemoryWallet::enableable("polkadot-js").with_accounts(sample_accounts());
    let connector = connector_with([wallet]);
    connector.connect("polkadot-js").await.unwrap();

    let accounts = connector.get_accounts().await.unwrap();

    let addresses: Vec<_> = accounts.iter().map(|a| a.address.as_str()).collect();
    assert_eq!(addresses, vec!["5Alice", "5Bob", "5Charlie"]);
}

#[tokio::test]
async fn test_get_accounts_failure_is_wrapped() {
    let wallet = MemoryWallet::enableable("polkadot-js").failing_accounts("port closed");
    let connector = connector_with([wallet]);
    connector.connect("polkadot-js").await.unwrap();

    let err = connector.get_accounts().await.unwrap_err();

    assert!(matches!(err, Error::AccountsRequest(_)));
    assert_eq!(err.to_string(), "Failed to request accounts");
    assert_eq!(err.source().unwrap().to_string(), "port closed");
}

// ============================================================================
// Signing
// ============================================================================

#[tokio::test]
async fn test_sign_requires_signer() {
    let connector = connector_with([MemoryWallet::enableable("polkadot-js").without_signer()]);

    // not connected yet
    assert!(matches!(
        connector.sign_message("hello", ADDRESS).await,
        Err(Error::SignerUnavailable)
    ));

    connector.connect("polkadot-js").await.unwrap();

    assert!(matches!(
        connector.sign_message("hello", ADDRESS).await,
        Err(Error::SignerUnavailable)
    ));
    assert!(matches!(
        connector.sign_message_with_wrapped_bytes(b"hello", ADDRESS).await,
        Err(Error::SignerUnavailable)
    ));
}

#[tokio::test]
async fn test_sign_wrapped_bytes_payload() {
    let wallet = MemoryWallet::enableable("polkadot-js");
    let connector = connector_with([wallet.clone()]);
    connector.connect("polkadot-js").await.unwrap();

    let signature = connector
        .sign_message_with_wrapped_bytes(b"sign in please", ADDRESS)
        .await
        .unwrap();

    let signed = wallet.signed_payloads();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].address, ADDRESS);
    assert_eq!(signed[0].data, to_hex(&wrap_bytes(b"sign in please")));
    assert_eq!(
        serde_json::to_value(&signed[0]).unwrap()["type"],
        serde_json::json!("bytes")
    );
    assert!(signature.starts_with("0x"));
}

#[tokio::test]
async fn test_sign_plain_message_is_untransformed() {
    let wallet = MemoryWallet::connectable("subwallet-js");
    let connector = connector_with([wallet.clone()]);
    connector.connect("subwallet-js").await.unwrap();

    connector.sign_message("hello world", ADDRESS).await.unwrap();

    assert_eq!(wallet.signed_payloads()[0].data, "hello world");
}

#[tokio::test]
async fn test_sign_failure_keeps_cause() {
    let connector =
        connector_with([MemoryWallet::enableable("polkadot-js").failing_signing("Cancelled")]);
    connector.connect("polkadot-js").await.unwrap();

    let err = connector.sign_message("hello", ADDRESS).await.unwrap_err();

    assert!(matches!(err, Error::Signing(_)));
    assert_eq!(err.source().unwrap().to_string(), "Cancelled");
}
