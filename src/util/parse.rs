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

use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::One;

use crate::{Error, Result};

/// Parse a base-10 decimal string into an integer scaled by
/// `10^decimal_places`.
///
/// With `strict`, any non-zero digit beyond `decimal_places` is an error.
/// Otherwise the value is rounded up to the next base unit.
pub fn decode_base10(amount: &str, decimal_places: usize, strict: bool) -> Result<BigUint> {
    let amount = amount.trim();
    if !amount.is_ascii() {
        return Err(Error::ParseFailed("Found non-digits"))
    }
    let mut s: Vec<char> = amount.chars().collect();

    // Get rid of the decimal point:
    let point: usize = if let Some(p) = s.iter().position(|c| *c == '.') {
        s.remove(p);
        p
    } else {
        s.len()
    };

    if s.is_empty() {
        return Err(Error::ParseFailed("Empty amount"))
    }

    // Only digits should remain
    for i in &s {
        if !i.is_ascii_digit() {
            return Err(Error::ParseFailed("Found non-digits"))
        }
    }

    // Add digits to the end if there are too few:
    let actual_places = s.len() - point;
    if actual_places < decimal_places {
        s.extend(vec!['0'; decimal_places - actual_places])
    }

    // Remove digits from the end if there are too many:
    let mut round = false;
    if actual_places > decimal_places {
        let end = point + decimal_places;
        for i in &s[end..s.len()] {
            if *i != '0' {
                round = true;
                break
            }
        }
        s.truncate(end);
    }

    if strict && round {
        return Err(Error::ParseFailed("Would end up rounding while strict"))
    }

    // Inputs like ".5" with no decimal places truncate to nothing
    if s.is_empty() {
        s.push('0');
    }

    let number = BigUint::from_str(&String::from_iter(&s))?;

    if round {
        return Ok(number + BigUint::one())
    }

    Ok(number)
}

/// Render an integer scaled by `10^decimal_places` as a decimal string,
/// with trailing fractional zeros removed.
pub fn encode_base10(amount: &BigUint, decimal_places: usize) -> String {
    let digits = amount.to_str_radix(10);
    let width = 1 + decimal_places;

    let mut s: Vec<char> = Vec::with_capacity(width.max(digits.len()) + 1);
    if digits.len() < width {
        s.extend(vec!['0'; width - digits.len()]);
    }
    s.extend(digits.chars());
    s.insert(s.len() - decimal_places, '.');

    String::from_iter(&s).trim_end_matches('0').trim_end_matches('.').to_string()
}
