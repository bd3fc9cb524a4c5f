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

//! Client-side view-models for the FundForward crowdfunding and
//! governance contract. The contract itself is external; this crate
//! connects a wallet, binds a contract handle, and turns form input and
//! contract replies into typed records.

pub mod error;
pub use error::{Error, ErrorKind, Result, RpcError};

/// Exact fixed-point amounts in ledger base units
pub mod amount;

/// Contract capability and its JSON-RPC implementation
pub mod contract;

/// Wallet connector capability
pub mod wallet;

/// Session state: connected account and bound contract handle
pub mod session;

/// Campaign view-model
pub mod campaign;

/// Proposal view-model
pub mod proposal;

/// Membership lock checks
pub mod membership;

/// Presentation state and notifications
pub mod view;

/// JSON-RPC objects and client
pub mod rpc;

/// Async system utilities
pub mod system;

/// Parsing, time, path and CLI helpers
pub mod util;

/// Build a CLI description string from the package metadata
#[macro_export]
macro_rules! cli_desc {
    () => {{
        let commitish = match option_env!("COMMITISH") {
            Some(c) => c.get(..7).unwrap_or(c),
            None => "",
        };

        let desc = format!(
            "{} {}\n{}{}\n{}",
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
            if commitish.is_empty() { "" } else { "Commit: " },
            commitish,
            env!("CARGO_PKG_DESCRIPTION").to_string(),
        );

        Box::leak(desc.into_boxed_str()) as &'static str
    }};
}
