//! Popup sign-in session
//!
//! [`PopupSignIn`] drives one sign-in transaction against the wallet proxy:
//!
//! ```text
//! App ──open──► Proxy popup
//!  │  ──signinPayload──►  │
//!  │                      ▼
//!  │               user signs in
//!  │  ◄──WalletProxyResponseMessage──
//!  ▼
//! { detail } ──► caller
//! ```
//!
//! While the response is awaited the session polls whether the popup was
//! closed and rejects with [`ProxyError::Cancelled`] if it was. The popup is
//! closed and the messenger disposed on every exit path.

use crate::config::{PollInterval, SignInConfig, WindowFeatures};
use crate::error::{ProxyError, Result};
use crate::message::{Message, SignInRequest, WalletProxyResponse, WalletProxyResponseEvent};
use crate::messenger::{WindowHost, WindowMessenger};
use crate::timer::Timer;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument};
use url::form_urlencoded;

/// Path of the sign-in page on the proxy site
pub const SIGNIN_PATH: &str = "/signin";

/// Build `{src}/signin?frequencyRpcUrl={urlencoded(rpc_url)}`
pub fn signin_url(src: &str, rpc_url: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("frequencyRpcUrl", rpc_url)
        .finish();
    format!("{src}{SIGNIN_PATH}?{query}")
}

/// One caller-owned sign-in session
pub struct PopupSignIn<H, T> {
    host: H,
    timer: T,
    config: SignInConfig,
    features: WindowFeatures,
    poll_interval: PollInterval,
    messenger: Option<WindowMessenger>,
}

impl<H: WindowHost, T: Timer> PopupSignIn<H, T> {
    pub fn new(host: H, timer: T, config: SignInConfig) -> Self {
        Self {
            host,
            timer,
            config,
            features: WindowFeatures::default(),
            poll_interval: PollInterval::default(),
            messenger: None,
        }
    }

    pub fn with_window_features(mut self, features: WindowFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_poll_interval(mut self, interval: impl Into<PollInterval>) -> Self {
        self.poll_interval = interval.into();
        self
    }

    pub fn config(&self) -> &SignInConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The active messenger, if a popup is open
    pub fn messenger(&self) -> Option<&WindowMessenger> {
        self.messenger.as_ref()
    }

    /// Open the proxy sign-in page and make its messenger the active one
    ///
    /// A previously active messenger is torn down first.
    pub fn render_popup(&mut self, src: &str, rpc_url: &str) -> Result<()> {
        teardown(&mut self.messenger);

        let url = signin_url(src, rpc_url);
        let messenger = WindowMessenger::create(&self.host, &url, &self.features.to_string())
            .inspect_err(|e| error!(error = %e, "Unable to render sign-in popup"))?;

        self.messenger = Some(messenger);
        Ok(())
    }

    /// Run one sign-in transaction and return the proxy's `detail`
    #[instrument(skip(self), fields(provider_id = %self.config.provider_id))]
    pub async fn get_login_or_registration_payload(&mut self) -> Result<WalletProxyResponse> {
        let request = self.config.signin_request();
        let proxy_url = self.config.proxy_url.clone();
        let rpc_url = self.config.frequency_rpc_url.clone();

        self.render_popup(&proxy_url, &rpc_url)?;

        let interval = self.poll_interval;
        let session = ActiveSession {
            slot: &mut self.messenger,
        };
        let messenger = session.slot.as_ref().ok_or(ProxyError::NoActivePopup)?;

        let result = exchange(messenger, &self.timer, interval, &request).await;
        drop(session);
        result
    }
}

/// Close the popup if still open and dispose the messenger
fn teardown(slot: &mut Option<WindowMessenger>) {
    if let Some(mut messenger) = slot.take() {
        messenger.dispose();
        debug!(url = messenger.url(), "Sign-in popup torn down");
    }
}

/// Tears the active messenger down when the transaction ends, however it ends
struct ActiveSession<'a> {
    slot: &'a mut Option<WindowMessenger>,
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        teardown(self.slot);
    }
}

async fn exchange<T: Timer>(
    messenger: &WindowMessenger,
    timer: &T,
    interval: PollInterval,
    request: &SignInRequest,
) -> Result<WalletProxyResponse> {
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));

    // listen before sending so a synchronous reply is not lost
    messenger.on(Message::WalletProxyResponseMessage.as_str(), move |data| {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send(serde_json::from_value::<WalletProxyResponseEvent>(data.clone()));
        }
    });
    messenger.send_event(Message::SigninPayload.as_str(), request)?;

    tokio::select! {
        biased;

        response = rx => {
            let event = response.map_err(|_| ProxyError::ResponseChannelClosed)??;
            info!("Received wallet proxy response");
            Ok(event.detail)
        }
        () = wait_until_closed(messenger, timer, interval) => {
            info!("Sign-in popup closed by user");
            Err(ProxyError::Cancelled)
        }
    }
}

async fn wait_until_closed<T: Timer>(messenger: &WindowMessenger, timer: &T, interval: PollInterval) {
    loop {
        timer.sleep(interval.as_duration()).await;
        match messenger.child_window() {
            Some(window) if !window.is_closed() => continue,
            _ => return,
        }
    }
}

impl<H, T> Drop for PopupSignIn<H, T> {
    fn drop(&mut self) {
        teardown(&mut self.messenger);
    }
}
