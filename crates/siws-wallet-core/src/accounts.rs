//! Accounts merged across several connected extensions
//!
//! The same key is often imported into more than one wallet. The index keeps
//! one entry per address and records every wallet that exposes it.

use crate::types::InjectedAccount;
use std::collections::{BTreeMap, BTreeSet};

/// Account together with the wallets providing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountWithWallets {
    /// First-seen account details
    pub account: InjectedAccount,
    /// Names of the wallets exposing this address
    pub wallets: BTreeSet<String>,
}

/// Address -> account index
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    accounts: BTreeMap<String, AccountWithWallets>,
}

impl AccountIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the accounts exposed by one wallet
    pub fn insert_wallet<'a>(
        &mut self,
        wallet: &str,
        accounts: impl IntoIterator<Item = &'a InjectedAccount>,
    ) {
        for account in accounts {
            self.accounts
                .entry(account.address.clone())
                .or_insert_with(|| AccountWithWallets {
                    account: account.clone(),
                    wallets: BTreeSet::new(),
                })
                .wallets
                .insert(wallet.to_string());
        }
    }

    pub fn get(&self, address: &str) -> Option<&AccountWithWallets> {
        self.accounts.get(address)
    }

    /// Wallets that expose `address`
    pub fn wallets_for(&self, address: &str) -> impl Iterator<Item = &str> {
        self.accounts
            .get(address)
            .into_iter()
            .flat_map(|entry| entry.wallets.iter().map(String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountWithWallets> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl<'a, S, I> FromIterator<(S, I)> for AccountIndex
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a InjectedAccount>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut index = AccountIndex::new();
        for (wallet, accounts) in iter {
            index.insert_wallet(wallet.as_ref(), accounts);
        }
        index
    }
}
