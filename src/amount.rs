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

use std::{fmt, str::FromStr};

use num_bigint::BigUint;
use tinyjson::JsonValue;

use crate::{
    rpc::util::{json_uint, parse_uint},
    util::parse::{decode_base10, encode_base10},
    Result,
};

/// Fractional digits between a base unit and one whole coin.
pub const BALANCE_BASE10_DECIMALS: usize = 18;

/// A monetary amount held as an integer count of ledger base units.
///
/// Decimal strings convert exactly in both directions as long as they carry
/// at most [`BALANCE_BASE10_DECIMALS`] fractional digits; anything finer is
/// rejected rather than rounded.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn from_base_units(units: BigUint) -> Self {
        Self(units)
    }

    pub fn base_units(&self) -> &BigUint {
        &self.0
    }

    /// Parse a human decimal string such as `"0.25"`.
    pub fn from_decimal(s: &str) -> Result<Self> {
        Ok(Self(decode_base10(s, BALANCE_BASE10_DECIMALS, true)?))
    }

    /// Render as a trimmed decimal string such as `"0.25"`.
    pub fn to_decimal(&self) -> String {
        encode_base10(&self.0, BALANCE_BASE10_DECIMALS)
    }

    /// Decode a contract integer field.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        Ok(Self(parse_uint(value)?))
    }

    /// Encode for the wire as a base-unit decimal string.
    pub fn to_json(&self) -> JsonValue {
        json_uint(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }
}

impl FromStr for Amount {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_decimal(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
