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

//! JSON-RPC 2.0 object definitions
use std::collections::HashMap;

use rand::{rngs::OsRng, Rng};
use tinyjson::JsonValue;

use crate::{error::RpcError, Result};

/// Wrapping enum around the JSON-RPC reply object types
#[derive(Clone, Debug)]
pub enum JsonResult {
    Response(JsonResponse),
    Error(JsonError),
}

impl JsonResult {
    pub fn try_from_value(value: &JsonValue) -> Result<Self> {
        if let Ok(response) = JsonResponse::try_from(value) {
            return Ok(Self::Response(response))
        }

        if let Ok(error) = JsonError::try_from(value) {
            return Ok(Self::Error(error))
        }

        Err(RpcError::InvalidJson("Invalid JSON Result".to_string()).into())
    }
}

/// Check the `jsonrpc` and `id` members shared by every reply object and
/// hand back the object map.
fn reply_map<'a>(
    value: &'a JsonValue,
    kind: &str,
) -> std::result::Result<(&'a HashMap<String, JsonValue>, u16), RpcError> {
    let Some(map) = value.get::<HashMap<String, JsonValue>>() else {
        return Err(RpcError::InvalidJson("JSON is not an Object".to_string()))
    };

    if map.get("jsonrpc") != Some(&JsonValue::String("2.0".to_string())) {
        return Err(RpcError::InvalidJson(format!(
            "{kind} does not contain valid \"jsonrpc\" field"
        )))
    }

    let Some(id) = map.get("id").and_then(|v| v.get::<f64>()) else {
        return Err(RpcError::InvalidJson(format!("{kind} does not contain valid \"id\" field")))
    };

    Ok((map, *id as u16))
}

/// A JSON-RPC request object
#[derive(Clone, Debug)]
pub struct JsonRequest {
    /// JSON-RPC version
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: u16,
    /// Request method
    pub method: String,
    /// Request parameters
    pub params: JsonValue,
}

impl JsonRequest {
    /// Create a new [`JsonRequest`] object with the given method and parameters.
    /// The request ID is chosen randomly.
    pub fn new(method: &str, params: JsonValue) -> Self {
        assert!(params.is_object() || params.is_array());
        Self { jsonrpc: "2.0", id: OsRng.gen(), method: method.to_string(), params }
    }

    /// Convert the object into a JSON string
    pub fn stringify(&self) -> Result<String> {
        let v: JsonValue = self.into();
        Ok(v.stringify()?)
    }
}

impl From<&JsonRequest> for JsonValue {
    fn from(req: &JsonRequest) -> JsonValue {
        JsonValue::Object(HashMap::from([
            ("jsonrpc".to_string(), JsonValue::String(req.jsonrpc.to_string())),
            ("id".to_string(), JsonValue::Number(req.id.into())),
            ("method".to_string(), JsonValue::String(req.method.clone())),
            ("params".to_string(), req.params.clone()),
        ]))
    }
}

/// A JSON-RPC response object
#[derive(Clone, Debug)]
pub struct JsonResponse {
    /// JSON-RPC version
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: u16,
    /// Response result
    pub result: JsonValue,
}

impl TryFrom<&JsonValue> for JsonResponse {
    type Error = RpcError;

    fn try_from(value: &JsonValue) -> std::result::Result<Self, Self::Error> {
        let (map, id) = reply_map(value, "Response")?;

        let Some(result) = map.get("result") else {
            return Err(RpcError::InvalidJson(
                "Response does not contain valid \"result\" field".to_string(),
            ))
        };

        Ok(Self { jsonrpc: "2.0", id, result: result.clone() })
    }
}

/// A JSON-RPC error object
#[derive(Clone, Debug)]
pub struct JsonError {
    /// JSON-RPC version
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: u16,
    /// JSON-RPC error (code and message)
    pub error: JsonErrorVal,
}

/// A JSON-RPC error value (code and message)
#[derive(Clone, Debug)]
pub struct JsonErrorVal {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl TryFrom<&JsonValue> for JsonError {
    type Error = RpcError;

    fn try_from(value: &JsonValue) -> std::result::Result<Self, Self::Error> {
        let (map, id) = reply_map(value, "Error")?;

        let Some(error) = map.get("error").and_then(|e| e.get::<HashMap<String, JsonValue>>())
        else {
            return Err(RpcError::InvalidJson(
                "Error does not contain valid \"error\" field".to_string(),
            ))
        };

        let Some(code) = error.get("code").and_then(|c| c.get::<f64>()) else {
            return Err(RpcError::InvalidJson(
                "Error does not contain valid \"error.code\" field".to_string(),
            ))
        };

        let Some(message) = error.get("message").and_then(|m| m.get::<String>()) else {
            return Err(RpcError::InvalidJson(
                "Error does not contain valid \"error.message\" field".to_string(),
            ))
        };

        Ok(Self {
            jsonrpc: "2.0",
            id,
            error: JsonErrorVal { code: *code as i32, message: message.clone() },
        })
    }
}
