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

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

pub type WalletConnectorPtr = Arc<dyn WalletConnector>;

/// Capability to request authorization from the user's wallet.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Ask the wallet for an account. Resolves to the account address, or
    /// fails when the user rejects or no wallet is reachable.
    async fn connect(&self) -> Result<String>;
}

#[cfg(feature = "rpc")]
pub use rpc_wallet::RpcWallet;

#[cfg(feature = "rpc")]
mod rpc_wallet {
    use std::sync::Arc;

    use async_trait::async_trait;
    use log::info;

    use super::WalletConnector;
    use crate::{
        rpc::{client::RpcClient, jsonrpc::JsonRequest, util::JsonArray},
        Error, Result,
    };

    /// Wallet held by the gateway node, reached with `wallet.request_accounts`.
    pub struct RpcWallet {
        rpc_client: Arc<RpcClient>,
    }

    impl RpcWallet {
        pub fn new(rpc_client: Arc<RpcClient>) -> Self {
            Self { rpc_client }
        }
    }

    #[async_trait]
    impl WalletConnector for RpcWallet {
        async fn connect(&self) -> Result<String> {
            let req = JsonRequest::new("wallet.request_accounts", JsonArray(vec![]));
            let rep = match self.rpc_client.request(req).await {
                Ok(v) => v,
                Err(e) => return Err(Error::ConnectionError(e.to_string())),
            };

            let account = rep
                .get::<Vec<tinyjson::JsonValue>>()
                .and_then(|accounts| accounts.first())
                .and_then(|a| a.get::<String>());

            match account {
                Some(a) => {
                    info!(target: "wallet::connect", "Wallet authorized account {}", a);
                    Ok(a.clone())
                }
                None => Err(Error::ConnectionError("No wallet account available".to_string())),
            }
        }
    }
}
