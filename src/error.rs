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

// Hello developer. Please add your error to the according subsection
// that is commented, or make a new subsection. Keep it clean.

/// Main result type used throughout the codebase.
pub type Result<T> = std::result::Result<T, Error>;

/// General library errors used throughout the codebase.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    // ==============
    // Parsing errors
    // ==============
    #[error("Parse failed: {0}")]
    ParseFailed(&'static str),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error(transparent)]
    ParseBigIntError(#[from] num_bigint::ParseBigIntError),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error("Date parse failed: {0}")]
    DateParseError(String),

    #[error(transparent)]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("JSON generate error: {0}")]
    JsonGenerateError(String),

    // ======================
    // Session-related errors
    // ======================
    #[error("Wallet connection failed: {0}")]
    ConnectionError(String),

    #[error("Session has no connected account")]
    SessionNotConnected,

    #[error("No contract handle is bound to the session")]
    ContractNotBound,

    // =======================
    // Contract-related errors
    // =======================
    #[error("Transaction `{0}` failed: {1}")]
    TransactionError(String, String),

    #[error("Failed to close proposal {0}, you might not be the creator: {1}")]
    CloseProposalRejected(u64, String),

    #[error("Fetching `{0}` failed: {1}")]
    FetchError(String, String),

    #[error("Contract call `{0}` timed out")]
    TimeoutError(String),

    #[error("Contract data inconsistency: {0}")]
    DataInconsistencyError(String),

    #[error("Invalid state: {0}")]
    InvalidStateError(String),

    #[error("A vote on proposal {0} is already in flight")]
    VoteInFlight(u64),

    #[error("Unexpected contract response: {0}")]
    UnexpectedResponse(String),

    #[error("Account {0} holds no valid membership key for lock {1} on network {2}")]
    MembershipRequired(String, String, u64),

    // ======================
    // Network-related errors
    // ======================
    #[error("Unsupported network transport: {0}")]
    UnsupportedTransport(String),

    #[error("Network operation failed: {0}")]
    NetworkOperationFailed(String),

    #[error("JSON-RPC error: {0}")]
    JsonRpcError(String),

    #[error(transparent)]
    RpcError(#[from] RpcError),

    // ====================
    // Miscellaneous errors
    // ====================
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),

    #[error("SetLogger (log crate) failed: {0}")]
    SetLoggerError(String),

    #[error("No config file detected")]
    ConfigNotFound,

    #[error("Invalid config file detected")]
    ConfigInvalid,

    #[error("{0}")]
    Custom(String),
}

/// Coarse error classes the presentation layer branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wallet unavailable or authorization rejected
    Connection,
    /// A create/vote/close/donate submission failed
    Transaction,
    /// A read call failed
    Fetch,
    /// An external call stalled past the session timeout
    Timeout,
    /// The contract returned internally inconsistent data
    DataInconsistency,
    /// The action is not valid for the current client-observed state
    InvalidState,
    /// Anything else (parsing, configuration, IO)
    Other,
}

impl Error {
    /// Classify this error into an [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionError(_) | Self::SessionNotConnected => ErrorKind::Connection,
            Self::TransactionError(..) | Self::CloseProposalRejected(..) => ErrorKind::Transaction,
            Self::FetchError(..) | Self::ContractNotBound | Self::UnexpectedResponse(_) => {
                ErrorKind::Fetch
            }
            Self::TimeoutError(_) => ErrorKind::Timeout,
            Self::DataInconsistencyError(_) => ErrorKind::DataInconsistency,
            Self::InvalidStateError(_) | Self::VoteInFlight(_) | Self::MembershipRequired(..) => {
                ErrorKind::InvalidState
            }
            _ => ErrorKind::Other,
        }
    }
}

/// JSON-RPC object errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Request ID mismatch: sent {0}, got {1}")]
    IdMismatch(u16, u16),

    #[error("Unexpected JSON-RPC reply")]
    UnexpectedReply,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.kind())
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Self::SetLoggerError(err.to_string())
    }
}

impl From<tinyjson::JsonParseError> for Error {
    fn from(err: tinyjson::JsonParseError) -> Self {
        Self::JsonParseError(err.to_string())
    }
}

impl From<tinyjson::JsonGenerateError> for Error {
    fn from(err: tinyjson::JsonGenerateError) -> Self {
        Self::JsonGenerateError(err.to_string())
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Self::DateParseError(err.to_string())
    }
}

#[cfg(feature = "rpc")]
impl From<surf::Error> for Error {
    fn from(err: surf::Error) -> Self {
        Self::NetworkOperationFailed(err.to_string())
    }
}
