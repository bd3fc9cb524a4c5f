/* This file is part of FundForward (https://fundforward.app)
 *
 * Copyright (C) 2023-2026 FundForward contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! The session ties together the user's wallet account and the handle of
//! the bound contract. View-model functions take a [`Session`] by reference
//! and route every contract interaction through [`Session::read`] and
//! [`Session::write`], which apply the call timeout and classify failures.
use std::{sync::Arc, time::Duration};

use log::{debug, error, info};
use smol::lock::RwLock;
use tinyjson::JsonValue;

use crate::{
    amount::Amount,
    contract::{ContractHandlePtr, TxReceipt},
    system::{timeout, Publisher, PublisherPtr, Subscription},
    wallet::WalletConnectorPtr,
    Error, Result,
};

/// Default time allowed for a single external call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection lifecycle of a [`Session`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Connecting,
    Connected,
    Disconnected,
}

/// Changes published to session subscribers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The wallet authorized an account
    Connected(String),
    /// The wallet switched to another account
    AccountChanged(String),
    /// A contract handle was bound, carrying the contract address
    HandleBound(String),
    /// The wallet went away
    Disconnected,
}

struct Binding {
    state: SessionState,
    address: Option<String>,
    handle: Option<ContractHandlePtr>,
}

pub type SessionPtr = Arc<Session>;

pub struct Session {
    wallet: WalletConnectorPtr,
    binding: RwLock<Binding>,
    publisher: PublisherPtr<SessionEvent>,
    call_timeout: Duration,
}

impl Session {
    /// Create a new session in the `Uninitialized` state.
    pub fn new(wallet: WalletConnectorPtr, call_timeout: Duration) -> SessionPtr {
        Arc::new(Self {
            wallet,
            binding: RwLock::new(Binding {
                state: SessionState::Uninitialized,
                address: None,
                handle: None,
            }),
            publisher: Publisher::new(),
            call_timeout,
        })
    }

    pub async fn state(&self) -> SessionState {
        self.binding.read().await.state
    }

    pub async fn address(&self) -> Option<String> {
        self.binding.read().await.address.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state().await == SessionState::Connected
    }

    /// The bound contract handle, or `None` until [`Session::bind`] ran.
    pub async fn handle(&self) -> Option<ContractHandlePtr> {
        self.binding.read().await.handle.clone()
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Subscribe to session changes.
    pub async fn subscribe(&self) -> Subscription<SessionEvent> {
        self.publisher.clone().subscribe().await
    }

    /// Request authorization from the wallet and return the resolved account.
    pub async fn connect(&self) -> Result<String> {
        self.binding.write().await.state = SessionState::Connecting;
        debug!(target: "session::connect", "Requesting wallet authorization");

        let res = match timeout(self.call_timeout, self.wallet.connect()).await {
            Ok(Ok(address)) => Ok(address),
            Ok(Err(Error::ConnectionError(e))) => Err(Error::ConnectionError(e)),
            Ok(Err(e)) => Err(Error::ConnectionError(e.to_string())),
            Err(_) => Err(Error::TimeoutError("wallet.connect".to_string())),
        };

        let mut binding = self.binding.write().await;
        match res {
            Ok(address) => {
                binding.state = SessionState::Connected;
                binding.address = Some(address.clone());
                drop(binding);

                info!(target: "session::connect", "Connected as {}", address);
                self.publisher.notify(SessionEvent::Connected(address.clone())).await;
                Ok(address)
            }
            Err(e) => {
                binding.state = SessionState::Disconnected;
                binding.address = None;
                drop(binding);

                error!(target: "session::connect", "Wallet connection failed: {}", e);
                Err(e)
            }
        }
    }

    /// Bind the contract handle that reads and writes go through.
    pub async fn bind(&self, handle: ContractHandlePtr) {
        let contract = handle.address().to_string();
        self.binding.write().await.handle = Some(handle);

        info!(target: "session::bind", "Bound contract {}", contract);
        self.publisher.notify(SessionEvent::HandleBound(contract)).await;
    }

    /// Apply an account change reported by the wallet. `None` means the
    /// wallet disconnected.
    pub async fn set_account(&self, account: Option<String>) {
        let Some(account) = account else { return self.disconnect().await };

        let mut binding = self.binding.write().await;
        let event = if binding.state == SessionState::Connected {
            if binding.address.as_deref() == Some(account.as_str()) {
                return
            }
            SessionEvent::AccountChanged(account.clone())
        } else {
            SessionEvent::Connected(account.clone())
        };

        binding.state = SessionState::Connected;
        binding.address = Some(account);
        drop(binding);

        info!(target: "session::set_account", "{:?}", event);
        self.publisher.notify(event).await;
    }

    /// Drop the connected account. The contract handle stays bound, so
    /// reads keep working.
    pub async fn disconnect(&self) {
        let mut binding = self.binding.write().await;
        binding.state = SessionState::Disconnected;
        binding.address = None;
        drop(binding);

        info!(target: "session::disconnect", "Wallet disconnected");
        self.publisher.notify(SessionEvent::Disconnected).await;
    }

    /// Perform a read-only contract call.
    pub async fn read(&self, method: &str, args: Vec<JsonValue>) -> Result<JsonValue> {
        let Some(handle) = self.handle().await else { return Err(Error::ContractNotBound) };

        debug!(target: "session::read", "{} {:?}", method, args);
        match timeout(self.call_timeout, handle.call(method, args)).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(Error::FetchError(method.to_string(), e.to_string())),
            Err(_) => Err(Error::TimeoutError(method.to_string())),
        }
    }

    /// Submit a transaction from the connected account.
    pub async fn write(
        &self,
        method: &str,
        args: Vec<JsonValue>,
        value: Option<Amount>,
    ) -> Result<TxReceipt> {
        let (address, handle) = {
            let binding = self.binding.read().await;
            let Some(handle) = binding.handle.clone() else { return Err(Error::ContractNotBound) };
            let (SessionState::Connected, Some(address)) = (binding.state, binding.address.clone())
            else {
                return Err(Error::SessionNotConnected)
            };
            (address, handle)
        };

        debug!(target: "session::write", "{} {:?} value={:?}", method, args, value);
        match timeout(self.call_timeout, handle.send(&address, method, args, value)).await {
            Ok(Ok(v)) => Ok(TxReceipt::from_reply(v)),
            Ok(Err(e)) => Err(Error::TransactionError(method.to_string(), e.to_string())),
            Err(_) => Err(Error::TimeoutError(method.to_string())),
        }
    }
}
