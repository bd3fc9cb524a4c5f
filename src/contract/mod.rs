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
use tinyjson::JsonValue;

use crate::{amount::Amount, rpc::util::field, Result};

#[cfg(feature = "rpc")]
/// Contract handle backed by a JSON-RPC gateway
pub mod rpc;
#[cfg(feature = "rpc")]
pub use rpc::RpcContract;

// Contract method names
pub const CREATE_CAMPAIGN: &str = "createCampaign";
pub const GET_CAMPAIGNS: &str = "getCampaigns";
pub const DONATE_TO_CAMPAIGN: &str = "donateToCampaign";
pub const GET_DONATORS: &str = "getDonators";
pub const CREATE_PROPOSAL: &str = "createProposal";
pub const GET_PROPOSALS: &str = "getProposals";
pub const VOTE: &str = "vote";
pub const CLOSE_PROPOSAL: &str = "closeProposal";
pub const GET_PROPOSAL_RESULT: &str = "getProposalResult";

// Membership lock
pub const GET_HAS_VALID_KEY: &str = "getHasValidKey";

pub type ContractHandlePtr = Arc<dyn ContractHandle>;

/// Capability to invoke methods on a deployed contract.
///
/// Arguments are positional. Implementations do not interpret results,
/// they hand back whatever structured data the contract returned.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// On-chain address of the bound contract
    fn address(&self) -> &str;

    /// Read-only call
    async fn call(&self, method: &str, args: Vec<JsonValue>) -> Result<JsonValue>;

    /// State-changing transaction sent from `from`, optionally attaching
    /// `value` base units.
    async fn send(
        &self,
        from: &str,
        method: &str,
        args: Vec<JsonValue>,
        value: Option<Amount>,
    ) -> Result<JsonValue>;
}

/// Outcome of a submitted transaction as reported by the contract layer.
#[derive(Clone, Debug)]
pub struct TxReceipt {
    /// Transaction hash, when the reply carried one
    pub tx_hash: Option<String>,
    /// The raw reply
    pub raw: JsonValue,
}

impl TxReceipt {
    /// Accepts a bare hash string or an object with a `transactionHash`
    /// or `hash` member. Any other reply is kept raw without a hash.
    pub fn from_reply(reply: JsonValue) -> Self {
        let tx_hash = match reply.get::<String>() {
            Some(h) => Some(h.clone()),
            None => field(&reply, "transactionHash")
                .or_else(|| field(&reply, "hash"))
                .and_then(|h| h.get::<String>())
                .cloned(),
        };

        Self { tx_hash, raw: reply }
    }
}
