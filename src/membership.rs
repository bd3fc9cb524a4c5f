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

use std::time::Duration;

use log::{debug, warn};

use crate::{
    contract::{ContractHandle, GET_HAS_VALID_KEY},
    rpc::util::json_str,
    system::timeout,
    Error, Result,
};

/// A membership lock contract on a given network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipLock {
    pub address: String,
    pub network: u64,
}

/// Ask a lock contract whether `account` holds a valid membership key.
pub async fn has_valid_key(
    lock: &dyn ContractHandle,
    account: &str,
    call_timeout: Duration,
) -> Result<bool> {
    let rep = match timeout(call_timeout, lock.call(GET_HAS_VALID_KEY, vec![json_str(account)])).await
    {
        Ok(Ok(v)) => v,
        Ok(Err(e)) => return Err(Error::FetchError(GET_HAS_VALID_KEY.to_string(), e.to_string())),
        Err(_) => return Err(Error::TimeoutError(GET_HAS_VALID_KEY.to_string())),
    };

    debug!(target: "membership::has_valid_key", "{} on lock {}: {:?}", account, lock.address(), rep);
    match rep.get::<bool>() {
        Some(v) => Ok(*v),
        None => Err(Error::UnexpectedResponse(format!("{GET_HAS_VALID_KEY} returned {rep:?}"))),
    }
}

/// Refuse `account` unless it holds a valid key on `lock`. `handle` must be
/// bound to the lock contract.
pub async fn require_valid_key(
    handle: &dyn ContractHandle,
    lock: &MembershipLock,
    account: &str,
    call_timeout: Duration,
) -> Result<()> {
    if has_valid_key(handle, account, call_timeout).await? {
        return Ok(())
    }

    warn!(target: "membership::require_valid_key", "{} has no key on {}", account, lock.address);
    Err(Error::MembershipRequired(account.to_string(), lock.address.clone(), lock.network))
}
