//! Wallet session.
//!
//! Holds the accounts shared by a connected wallet and the selected index.
//! Consumers either pull (`current_account`) or `subscribe` for a
//! `watch::Receiver` that flags every change to the session data. Updates
//! that leave the session unchanged are not sent.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::types::ArbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl WalletAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: None,
        }
    }
}

/// Point-in-time view of the session, as seen by subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub accounts: Vec<WalletAccount>,
    pub selected: usize,
}

impl SessionSnapshot {
    /// Address at the selected index, if any.
    pub fn current_account(&self) -> Option<&str> {
        self.accounts
            .get(self.selected)
            .map(|a| a.address.as_str())
            .filter(|a| !a.is_empty())
    }
}

pub struct WalletSession {
    tx: watch::Sender<SessionSnapshot>,
}

impl Default for WalletSession {
    fn default() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with `accounts`, first account selected.
    pub fn with_accounts(accounts: Vec<WalletAccount>) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot {
            accounts,
            selected: 0,
        });
        Self { tx }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Active account address; `None` when no wallet is connected or the
    /// selected index is out of range.
    pub fn current_account(&self) -> Option<String> {
        self.tx.borrow().current_account().map(str::to_string)
    }

    pub fn all_accounts(&self) -> Vec<WalletAccount> {
        self.tx.borrow().accounts.clone()
    }

    pub fn is_connected(&self) -> bool {
        !self.tx.borrow().accounts.is_empty()
    }

    /// Replace the account list, as reported by the wallet.
    pub fn update_accounts(&self, accounts: Vec<WalletAccount>) {
        let count = accounts.len();
        let sent = self.tx.send_if_modified(|state| {
            if state.accounts == accounts {
                return false;
            }
            state.accounts = accounts;
            true
        });
        if sent {
            info!(accounts = count, "Wallet accounts updated");
            self.log_change();
        }
    }

    /// Select the account at `index`.
    pub fn select(&self, index: usize) -> Result<(), ArbError> {
        let mut result = Ok(());
        let sent = self.tx.send_if_modified(|state| {
            if index >= state.accounts.len() {
                result = Err(ArbError::AccountIndex {
                    index,
                    available: state.accounts.len(),
                });
                return false;
            }
            if state.selected == index {
                return false;
            }
            state.selected = index;
            true
        });
        if sent {
            self.log_change();
        }
        result
    }

    /// Drop all accounts and reset the selection.
    pub fn disconnect(&self) {
        let sent = self.tx.send_if_modified(|state| {
            let cleared = SessionSnapshot::default();
            if *state == cleared {
                return false;
            }
            *state = cleared;
            true
        });
        if sent {
            info!("Wallet disconnected");
            self.log_change();
        }
    }

    /// Receiver marked changed once for every session change made after
    /// this call. Dropping it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn log_change(&self) {
        debug!(subscribers = self.tx.receiver_count(), "Wallet session changed");
    }
}
