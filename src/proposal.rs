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

use log::{error, info};
use tinyjson::JsonValue;

use crate::{
    contract::{
        TxReceipt, CLOSE_PROPOSAL, CREATE_PROPOSAL, GET_PROPOSALS, GET_PROPOSAL_RESULT, VOTE,
    },
    rpc::util::{as_array, field, json_str, parse_u64, string_field, JsonNum},
    session::Session,
    Error, Result,
};

/// A governance proposal as observed from the contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub description: String,
    pub votes_for: u64,
    pub votes_against: u64,
    /// Whether the current account voted, when the contract reports it
    pub voted: Option<bool>,
    pub open: bool,
    /// Position in the contract's proposal list
    pub index: u64,
}

impl Proposal {
    fn from_json(value: &JsonValue, index: u64) -> Result<Self> {
        // Older contract versions omit the tallies entirely
        let count = |key: &str| -> Result<u64> {
            match field(value, key) {
                Some(v) => parse_u64(v),
                None => Ok(0),
            }
        };

        let Some(open) = field(value, "open").and_then(|o| o.get::<bool>()) else {
            return Err(Error::UnexpectedResponse("missing boolean field \"open\"".into()))
        };

        Ok(Self {
            description: string_field(value, "description")?,
            votes_for: count("votesFor")?,
            votes_against: count("votesAgainst")?,
            voted: field(value, "voted").and_then(|v| v.get::<bool>()).copied(),
            open: *open,
            index,
        })
    }
}

/// A ballot option
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteChoice {
    For,
    Against,
    Abstain,
}

impl VoteChoice {
    /// Value the contract expects for this option
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::For => "yes",
            Self::Against => "no",
            Self::Abstain => "abstain",
        }
    }
}

impl FromStr for VoteChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "for" | "yes" => Ok(Self::For),
            "against" | "no" => Ok(Self::Against),
            "abstain" => Ok(Self::Abstain),
            _ => Err(Error::ParseFailed("Vote must be one of: for, against, abstain")),
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::For => "for",
            Self::Against => "against",
            Self::Abstain => "abstain",
        };
        write!(f, "{}", s)
    }
}

/// Final tally of a closed proposal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProposalResult {
    pub votes_for: u64,
    pub votes_against: u64,
    pub votes_abstain: u64,
}

impl fmt::Display for ProposalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Yes: {} No: {} Abstain: {}",
            self.votes_for, self.votes_against, self.votes_abstain
        )
    }
}

/// Submit a new proposal with the given description.
pub async fn create_proposal(session: &Session, description: &str) -> Result<TxReceipt> {
    match session.write(CREATE_PROPOSAL, vec![json_str(description)], None).await {
        Ok(rep) => {
            info!(target: "proposal::create_proposal", "Proposal created: {:?}", rep.tx_hash);
            Ok(rep)
        }
        Err(e) => {
            error!(target: "proposal::create_proposal", "Failed to create proposal: {}", e);
            Err(e)
        }
    }
}

/// Fetch every proposal from the contract, in storage order.
pub async fn list_proposals(session: &Session) -> Result<Vec<Proposal>> {
    let rep = session.read(GET_PROPOSALS, vec![]).await?;

    let mut proposals = vec![];
    for (i, p) in as_array(&rep, "proposal list")?.iter().enumerate() {
        proposals.push(Proposal::from_json(p, i as u64)?);
    }

    Ok(proposals)
}

/// Cast a vote on the proposal at `index`.
///
/// Nothing is counted locally. The tally only changes in what a later
/// [`list_proposals`] returns.
pub async fn vote(session: &Session, index: u64, choice: VoteChoice) -> Result<TxReceipt> {
    let args = vec![JsonNum(index as f64), json_str(choice.as_wire())];

    match session.write(VOTE, args, None).await {
        Ok(rep) => {
            info!(target: "proposal::vote", "Voted {} on proposal {}", choice, index);
            Ok(rep)
        }
        Err(e) => {
            error!(target: "proposal::vote", "Failed to vote on proposal {}: {}", index, e);
            Err(e)
        }
    }
}

/// Close the proposal at `index`.
///
/// The contract does not say why a close was refused. The usual cause is
/// that the caller did not create the proposal, so a refusal is reported as
/// [`Error::CloseProposalRejected`], which carries that hint.
pub async fn close_proposal(session: &Session, index: u64) -> Result<TxReceipt> {
    match session.write(CLOSE_PROPOSAL, vec![JsonNum(index as f64)], None).await {
        Ok(rep) => {
            info!(target: "proposal::close_proposal", "Closed proposal {}", index);
            Ok(rep)
        }
        Err(Error::TransactionError(_, reason)) => {
            let e = Error::CloseProposalRejected(index, reason);
            error!(target: "proposal::close_proposal", "{}", e);
            Err(e)
        }
        Err(e) => {
            error!(target: "proposal::close_proposal", "Failed to close proposal {}: {}", index, e);
            Err(e)
        }
    }
}

/// Fetch the final tally of the proposal at `index`.
///
/// Results only exist for closed proposals. An unknown or still open
/// proposal is refused with [`Error::InvalidStateError`] before the contract
/// is asked.
pub async fn get_proposal_result(session: &Session, index: u64) -> Result<ProposalResult> {
    let proposals = list_proposals(session).await?;

    let Some(proposal) = proposals.iter().find(|p| p.index == index) else {
        return Err(Error::InvalidStateError(format!("proposal {index} does not exist")))
    };

    if proposal.open {
        return Err(Error::InvalidStateError(format!("proposal {index} is still open")))
    }

    let rep = session.read(GET_PROPOSAL_RESULT, vec![JsonNum(index as f64)]).await?;
    let tally = as_array(&rep, "proposal result")?;
    if tally.len() < 3 {
        return Err(Error::UnexpectedResponse(format!(
            "proposal result has {} members, expected 3",
            tally.len()
        )))
    }

    Ok(ProposalResult {
        votes_for: parse_u64(&tally[0])?,
        votes_against: parse_u64(&tally[1])?,
        votes_abstain: parse_u64(&tally[2])?,
    })
}
