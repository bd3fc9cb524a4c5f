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
use log::debug;
use tinyjson::JsonValue;

use super::ContractHandle;
use crate::{
    amount::Amount,
    rpc::{
        client::RpcClient,
        jsonrpc::JsonRequest,
        util::{json_str, JsonArray, JsonNull},
    },
    Result,
};

/// [`ContractHandle`] that forwards calls to a gateway node, which encodes
/// them against the contract ABI and signs transactions with the wallet it
/// holds.
pub struct RpcContract {
    rpc_client: Arc<RpcClient>,
    address: String,
}

impl RpcContract {
    pub fn new(rpc_client: Arc<RpcClient>, address: &str) -> Self {
        Self { rpc_client, address: address.to_string() }
    }
}

#[async_trait]
impl ContractHandle for RpcContract {
    fn address(&self) -> &str {
        &self.address
    }

    async fn call(&self, method: &str, args: Vec<JsonValue>) -> Result<JsonValue> {
        debug!(target: "contract::rpc", "call {}.{}", self.address, method);
        let params = JsonArray(vec![json_str(&self.address), json_str(method), JsonArray(args)]);
        self.rpc_client.request(JsonRequest::new("contract.call", params)).await
    }

    async fn send(
        &self,
        from: &str,
        method: &str,
        args: Vec<JsonValue>,
        value: Option<Amount>,
    ) -> Result<JsonValue> {
        debug!(target: "contract::rpc", "send {}.{} from {}", self.address, method, from);
        let value = match value {
            Some(v) => v.to_json(),
            None => JsonNull,
        };

        let params = JsonArray(vec![
            json_str(&self.address),
            json_str(from),
            json_str(method),
            JsonArray(args),
            value,
        ]);
        self.rpc_client.request(JsonRequest::new("contract.send", params)).await
    }
}
