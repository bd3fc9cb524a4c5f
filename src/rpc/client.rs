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

//! JSON-RPC client-side implementation over HTTP.
use log::{debug, error};
use tinyjson::JsonValue;
use url::Url;

use super::jsonrpc::{JsonRequest, JsonResult};
use crate::{error::RpcError, Error, Result};

/// JSON-RPC client talking to a gateway node over HTTP POST.
pub struct RpcClient {
    endpoint: Url,
    client: surf::Client,
}

impl RpcClient {
    /// Instantiate a new JSON-RPC client for the given endpoint URL.
    pub fn new(endpoint: Url) -> Result<Self> {
        match endpoint.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::UnsupportedTransport(scheme.to_string())),
        }

        Ok(Self { endpoint, client: surf::Client::new() })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send a given JSON-RPC request and return the `result` member of the
    /// reply. JSON-RPC error objects become [`Error::JsonRpcError`].
    pub async fn request(&self, req: JsonRequest) -> Result<JsonValue> {
        let req_id = req.id;
        let body = req.stringify()?;
        debug!(target: "rpc::client", "--> {}", body);

        let mut rep = match self
            .client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(v) => v,
            Err(e) => {
                error!(target: "rpc::client", "JSON-RPC request to {} failed: {}", self.endpoint, e);
                return Err(Error::NetworkOperationFailed(e.to_string()))
            }
        };

        let rep_body = rep.body_string().await?;
        debug!(target: "rpc::client", "<-- {}", rep_body);

        let value: JsonValue = rep_body.parse()?;
        match JsonResult::try_from_value(&value)? {
            JsonResult::Response(r) => {
                if r.id != req_id {
                    return Err(RpcError::IdMismatch(req_id, r.id).into())
                }

                Ok(r.result)
            }
            JsonResult::Error(e) => {
                if e.id != req_id {
                    return Err(RpcError::IdMismatch(req_id, e.id).into())
                }

                Err(Error::JsonRpcError(format!("{} ({})", e.error.message, e.error.code)))
            }
        }
    }
}
