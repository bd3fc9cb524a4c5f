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

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{Error, Result};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Convert a form deadline into unix milliseconds.
///
/// Accepted inputs are `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DDTHH:MM`
/// (UTC) and full RFC 3339 timestamps.
pub fn deadline_to_millis(deadline: &str) -> Result<u64> {
    let deadline = deadline.trim();

    let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(deadline) {
        dt.timestamp_millis()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(deadline, "%Y-%m-%dT%H:%M") {
        dt.and_utc().timestamp_millis()
    } else {
        let date = NaiveDate::parse_from_str(deadline, "%Y-%m-%d")?;
        let Some(dt) = date.and_hms_opt(0, 0, 0) else {
            return Err(Error::DateParseError(format!("Invalid midnight for {date}")))
        };
        dt.and_utc().timestamp_millis()
    };

    if millis < 0 {
        return Err(Error::DateParseError(format!("Deadline {deadline} is before the unix epoch")))
    }

    Ok(millis as u64)
}

/// Render unix milliseconds as a `YYYY-MM-DD` date.
pub fn millis_to_date(millis: u64) -> String {
    match DateTime::from_timestamp_millis(millis as i64) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "invalid".to_string(),
    }
}

/// Whole days remaining until `deadline`, rounded up, or 0 once it passed.
pub fn days_left(deadline: u64, now: u64) -> u64 {
    deadline.saturating_sub(now).div_ceil(MILLIS_PER_DAY)
}

/// Current unix time in milliseconds.
pub fn now_millis() -> Result<u64> {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => Ok(d.as_millis() as u64),
        Err(e) => Err(Error::Custom(format!("System clock went backwards: {e}"))),
    }
}
