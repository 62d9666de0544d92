//! Catalog of supported wallet extensions

use serde::Serialize;

/// Where to get a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    /// Browser or app store (`chrome`, `firefox`, `apple`, `android`)
    pub platform: &'static str,
    pub url: &'static str,
}

/// A wallet extension the sign-in page knows how to present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownWallet {
    pub display_name: &'static str,
    /// Key under which the extension registers itself in the injected registry
    pub injected_name: &'static str,
    pub browser_downloads: &'static [DownloadLink],
    pub app_downloads: &'static [DownloadLink],
}

impl KnownWallet {
    /// Download link for a browser, if the wallet ships one
    pub fn browser_download(&self, browser: &str) -> Option<&'static str> {
        find_link(self.browser_downloads, browser)
    }

    /// Download link for a mobile platform, if the wallet ships one
    pub fn app_download(&self, platform: &str) -> Option<&'static str> {
        find_link(self.app_downloads, platform)
    }
}

fn find_link(links: &'static [DownloadLink], platform: &str) -> Option<&'static str> {
    links
        .iter()
        .find(|link| link.platform.eq_ignore_ascii_case(platform))
        .map(|link| link.url)
}

pub const KNOWN_WALLETS: &[KnownWallet] = &[
    KnownWallet {
        display_name: "Polkadot",
        injected_name: "polkadot-js",
        browser_downloads: &[
            DownloadLink {
                platform: "chrome",
                url: "https://chrome.google.com/webstore/detail/polkadot%7Bjs%7D-extension/mopnmbcafieddcagagdcbnhejhlodfdd",
            },
            DownloadLink {
                platform: "firefox",
                url: "https://addons.mozilla.org/en-US/firefox/addon/polkadot-js-extension/",
            },
        ],
        app_downloads: &[],
    },
    KnownWallet {
        display_name: "Talisman",
        injected_name: "talisman",
        browser_downloads: &[DownloadLink {
            platform: "chrome",
            url: "https://chrome.google.com/webstore/detail/talisman-polkadot-and-eth/fijngjgcjhjmmpcmkeiomlglpeiijkld",
        }],
        app_downloads: &[],
    },
    KnownWallet {
        display_name: "SubWallet",
        injected_name: "subwallet-js",
        browser_downloads: &[DownloadLink {
            platform: "chrome",
            url: "https://chrome.google.com/webstore/detail/subwallet-polkadot-wallet/onhogfjeacnfoofkfgppdlbmlmnplgbn",
        }],
        app_downloads: &[
            DownloadLink {
                platform: "apple",
                url: "https://apps.apple.com/us/app/subwallet-polkadot-wallet/id1633050285",
            },
            DownloadLink {
                platform: "android",
                url: "https://play.google.com/store/apps/details?id=app.subwallet.mobile",
            },
        ],
    },
    KnownWallet {
        display_name: "MetaMask",
        injected_name: "metamask",
        browser_downloads: &[DownloadLink {
            platform: "chrome",
            url: "https://chrome.google.com/webstore/detail/metamask/nkbihfbeogaeaoehlefnkodbefgpgknn",
        }],
        app_downloads: &[
            DownloadLink {
                platform: "apple",
                url: "https://apps.apple.com/us/app/metamask-blockchain-wallet/id1438144202",
            },
            DownloadLink {
                platform: "android",
                url: "https://play.google.com/store/apps/details?id=io.metamask",
            },
        ],
    },
];

/// Look a wallet up by its injected name
pub fn find_known_wallet(injected_name: &str) -> Option<&'static KnownWallet> {
    KNOWN_WALLETS
        .iter()
        .find(|wallet| wallet.injected_name == injected_name)
}

/// Human-readable name for an injected wallet, falling back to the key itself
pub fn display_name(injected_name: &str) -> &str {
    find_known_wallet(injected_name).map_or(injected_name, |wallet| wallet.display_name)
}
