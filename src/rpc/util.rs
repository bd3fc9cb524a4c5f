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

use std::{collections::HashMap, str::FromStr};

use num_bigint::BigUint;
pub use tinyjson::JsonValue::{
    self, Array as JsonArray, Boolean as JsonBool, Null as JsonNull, Number as JsonNum,
    Object as JsonObj, String as JsonStr,
};

use crate::{Error, Result};

/// Largest integer a JSON number (f64) carries without loss.
const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

// helper functions
pub fn json_map<const N: usize>(vals: [(&str, JsonValue); N]) -> JsonValue {
    JsonObj(HashMap::from(vals.map(|(k, v)| (k.to_string(), v))))
}

pub fn json_str(val: &str) -> JsonValue {
    JsonStr(val.to_string())
}

/// Encode an unsigned integer for the wire: JSON numbers lose precision
/// past 2^53, so integers always travel as decimal strings.
pub fn json_uint(val: &BigUint) -> JsonValue {
    JsonStr(val.to_str_radix(10))
}

/// Fetch a member of a JSON object. Absent members and `null` both yield `None`.
pub fn field<'a>(value: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    value.get::<HashMap<String, JsonValue>>()?.get(key).filter(|v| !v.is_null())
}

/// Fetch a required string member of a JSON object.
pub fn string_field(value: &JsonValue, key: &str) -> Result<String> {
    match field(value, key).and_then(|v| v.get::<String>()) {
        Some(s) => Ok(s.clone()),
        None => Err(Error::UnexpectedResponse(format!("missing string field \"{key}\""))),
    }
}

/// Fetch a required unsigned integer member of a JSON object.
pub fn uint_field(value: &JsonValue, key: &str) -> Result<BigUint> {
    match field(value, key) {
        Some(v) => parse_uint(v),
        None => Err(Error::UnexpectedResponse(format!("missing integer field \"{key}\""))),
    }
}

/// Borrow a JSON array or fail with an unexpected-response error.
pub fn as_array<'a>(value: &'a JsonValue, what: &str) -> Result<&'a Vec<JsonValue>> {
    match value.get::<Vec<JsonValue>>() {
        Some(a) => Ok(a),
        None => Err(Error::UnexpectedResponse(format!("{what} is not an array"))),
    }
}

/// Decode an unsigned integer the way contract gateways tend to encode it:
/// a JSON number, a decimal string, a `0x` hex string, or a serialized
/// `{"type": "BigNumber", "hex": "0x.."}` object.
pub fn parse_uint(value: &JsonValue) -> Result<BigUint> {
    match value {
        JsonNum(n) => {
            if *n < 0.0 || n.fract() != 0.0 || *n > MAX_SAFE_INTEGER {
                return Err(Error::UnexpectedResponse(format!("{n} is not a safe unsigned integer")))
            }
            Ok(BigUint::from(*n as u64))
        }
        JsonStr(s) => parse_uint_str(s),
        JsonObj(map) => match map.get("hex").and_then(|h| h.get::<String>()) {
            Some(hex) => parse_uint_str(hex),
            None => Err(Error::UnexpectedResponse("integer object has no \"hex\" member".into())),
        },
        _ => Err(Error::UnexpectedResponse(format!("{value:?} is not an unsigned integer"))),
    }
}

fn parse_uint_str(s: &str) -> Result<BigUint> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return Ok(BigUint::default())
        }

        return match BigUint::parse_bytes(hex.as_bytes(), 16) {
            Some(v) => Ok(v),
            None => Err(Error::UnexpectedResponse(format!("invalid hex integer \"{s}\""))),
        }
    }

    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnexpectedResponse(format!("invalid decimal integer \"{s}\"")))
    }

    Ok(BigUint::from_str(s)?)
}

/// Decode an unsigned integer that must fit into `u64`.
pub fn parse_u64(value: &JsonValue) -> Result<u64> {
    let v = parse_uint(value)?;
    match u64::try_from(&v) {
        Ok(v) => Ok(v),
        Err(_) => Err(Error::UnexpectedResponse(format!("{v} does not fit into u64"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint(&JsonNum(42.0)).unwrap(), BigUint::from(42u64));
        assert_eq!(parse_uint(&json_str("1000000000000000000000")).unwrap().to_string(), "1000000000000000000000");
        assert_eq!(parse_uint(&json_str("0x0de0b6b3a7640000")).unwrap(), BigUint::from(10u64.pow(18)));
        assert_eq!(parse_uint(&json_str("0x")).unwrap(), BigUint::default());

        let bn = json_map([("type", json_str("BigNumber")), ("hex", json_str("0x2a"))]);
        assert_eq!(parse_uint(&bn).unwrap(), BigUint::from(42u64));

        assert!(parse_uint(&JsonNum(-1.0)).is_err());
        assert!(parse_uint(&JsonNum(1.5)).is_err());
        assert!(parse_uint(&JsonNum(1e20)).is_err());
        assert!(parse_uint(&json_str("12abc")).is_err());
        assert!(parse_uint(&json_str("0xzz")).is_err());
        assert!(parse_uint(&JsonBool(true)).is_err());
    }

    #[test]
    fn test_fields() {
        let obj = json_map([
            ("title", json_str("Fund X")),
            ("target", json_str("0x64")),
            ("gone", JsonNull),
        ]);

        assert_eq!(string_field(&obj, "title").unwrap(), "Fund X");
        assert_eq!(uint_field(&obj, "target").unwrap(), BigUint::from(100u64));
        assert!(field(&obj, "gone").is_none());
        assert!(field(&obj, "missing").is_none());
        assert!(string_field(&obj, "target").is_err());
        assert!(field(&JsonArray(vec![]), "title").is_none());
        assert!(parse_u64(&json_str("18446744073709551616")).is_err());
    }
}
