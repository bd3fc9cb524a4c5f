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

//! In-memory contract and wallet used by the integration tests. The mock
//! keeps typed records and behaves like the deployed contract: it tallies
//! votes, refuses closes from non-creators and tracks donations.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use num_bigint::BigUint;
use tinyjson::JsonValue;

use fundforward::{
    amount::Amount,
    contract::ContractHandle,
    rpc::util::{json_map, json_str, json_uint, parse_u64, JsonArray, JsonBool, JsonNum},
    session::{Session, SessionPtr},
    wallet::WalletConnector,
    Error, Result,
};

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const CONTRACT: &str = "0xe78b6EEfEB2Dd1a2525F72464Bf74f2f9Fb2999f";

pub struct MockCampaign {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub target: BigUint,
    pub deadline: u64,
    pub collected: BigUint,
    pub image: String,
    pub donors: Vec<String>,
    pub amounts: Vec<BigUint>,
}

pub struct MockProposal {
    pub creator: String,
    pub description: String,
    /// for, against, abstain
    pub votes: [u64; 3],
    pub voters: HashSet<String>,
    pub open: bool,
    /// Render without tally fields, like older contract versions
    pub legacy: bool,
}

#[derive(Default)]
pub struct MockState {
    pub campaigns: Vec<MockCampaign>,
    pub proposals: Vec<MockProposal>,
    /// Every `send` as (from, method, args, value)
    pub sends: Vec<(String, String, Vec<JsonValue>, Option<Amount>)>,
    /// Every `call` method name
    pub calls: Vec<String>,
    /// Methods that never resolve
    pub hang: HashSet<String>,
    /// Replace the `getDonators` reply for a campaign
    pub donators_override: HashMap<u64, JsonValue>,
    /// Accounts holding a membership key
    pub members: HashSet<String>,
}

pub struct MockContract {
    pub state: Mutex<MockState>,
    /// When set, `vote` waits for a message on this channel first
    pub vote_gate: Mutex<Option<smol::channel::Receiver<()>>>,
}

fn revert(reason: &str) -> Error {
    Error::JsonRpcError(format!("execution reverted: {reason} (-32000)"))
}

fn arg_index(args: &[JsonValue]) -> Result<usize> {
    match args.first() {
        Some(v) => Ok(parse_u64(v)? as usize),
        None => Err(revert("missing index")),
    }
}

impl MockContract {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { state: Mutex::new(MockState::default()), vote_gate: Mutex::new(None) })
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn add_campaign(&self, owner: &str, title: &str, target: u64, collected: u64) {
        self.state().campaigns.push(MockCampaign {
            owner: owner.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            target: BigUint::from(target),
            deadline: 1709251200000,
            collected: BigUint::from(collected),
            image: format!("https://img.example/{title}.png"),
            donors: vec![],
            amounts: vec![],
        });
    }

    /// Seed a campaign with exact base-unit values.
    pub fn add_campaign_units(&self, owner: &str, title: &str, target: BigUint, collected: BigUint) {
        self.add_campaign(owner, title, 0, 0);
        let mut state = self.state();
        if let Some(c) = state.campaigns.last_mut() {
            c.target = target;
            c.collected = collected;
        }
    }

    pub fn add_proposal(&self, creator: &str, description: &str, open: bool, legacy: bool) {
        self.state().proposals.push(MockProposal {
            creator: creator.to_string(),
            description: description.to_string(),
            votes: [0; 3],
            voters: HashSet::new(),
            open,
            legacy,
        });
    }

    pub fn sends_of(&self, method: &str) -> usize {
        self.state().sends.iter().filter(|s| s.1 == method).count()
    }

    pub fn calls_of(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|c| c.as_str() == method).count()
    }

    fn render_campaigns(state: &MockState) -> JsonValue {
        JsonArray(
            state
                .campaigns
                .iter()
                .map(|c| {
                    json_map([
                        ("owner", json_str(&c.owner)),
                        ("title", json_str(&c.title)),
                        ("description", json_str(&c.description)),
                        // Mix of encodings the gateway may produce
                        ("target", json_str(&format!("0x{}", c.target.to_str_radix(16)))),
                        ("deadline", JsonNum(c.deadline as f64)),
                        ("amountCollected", json_uint(&c.collected)),
                        ("image", json_str(&c.image)),
                    ])
                })
                .collect(),
        )
    }

    fn render_proposals(state: &MockState) -> JsonValue {
        JsonArray(
            state
                .proposals
                .iter()
                .map(|p| {
                    if p.legacy {
                        return json_map([
                            ("description", json_str(&p.description)),
                            ("open", JsonBool(p.open)),
                        ])
                    }
                    json_map([
                        ("description", json_str(&p.description)),
                        ("votesFor", JsonNum(p.votes[0] as f64)),
                        ("votesAgainst", JsonNum(p.votes[1] as f64)),
                        ("voted", JsonBool(!p.voters.is_empty())),
                        ("open", JsonBool(p.open)),
                    ])
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ContractHandle for MockContract {
    fn address(&self) -> &str {
        CONTRACT
    }

    async fn call(&self, method: &str, args: Vec<JsonValue>) -> Result<JsonValue> {
        let hang = {
            let mut state = self.state();
            state.calls.push(method.to_string());
            state.hang.contains(method)
        };
        if hang {
            smol::future::pending::<()>().await;
        }

        let state = self.state();
        match method {
            "getCampaigns" => Ok(Self::render_campaigns(&state)),
            "getProposals" => Ok(Self::render_proposals(&state)),
            "getDonators" => {
                let i = arg_index(&args)?;
                if let Some(rep) = state.donators_override.get(&(i as u64)) {
                    return Ok(rep.clone())
                }
                let Some(c) = state.campaigns.get(i) else { return Err(revert("no campaign")) };
                Ok(JsonArray(vec![
                    JsonArray(c.donors.iter().map(|d| json_str(d)).collect()),
                    JsonArray(c.amounts.iter().map(json_uint).collect()),
                ]))
            }
            "getHasValidKey" => {
                let account = args.first().and_then(|a| a.get::<String>()).cloned().unwrap_or_default();
                Ok(JsonBool(state.members.contains(&account)))
            }
            "getProposalResult" => {
                let i = arg_index(&args)?;
                let Some(p) = state.proposals.get(i) else { return Err(revert("no proposal")) };
                Ok(JsonArray(p.votes.iter().map(|v| JsonNum(*v as f64)).collect()))
            }
            _ => Err(Error::JsonRpcError("method not found (-32601)".to_string())),
        }
    }

    async fn send(
        &self,
        from: &str,
        method: &str,
        args: Vec<JsonValue>,
        value: Option<Amount>,
    ) -> Result<JsonValue> {
        let hang = {
            let mut state = self.state();
            state.sends.push((from.to_string(), method.to_string(), args.clone(), value.clone()));
            state.hang.contains(method)
        };
        if hang {
            smol::future::pending::<()>().await;
        }

        if method == "vote" {
            let gate = self.vote_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                let _ = gate.recv().await;
            }
        }

        let mut state = self.state();
        let tx_hash = format!("0x{:064x}", state.sends.len());
        match method {
            "createCampaign" => {
                let s = |i: usize| args[i].get::<String>().cloned().unwrap_or_default();
                let target = fundforward::rpc::util::parse_uint(&args[3])?;
                let deadline = parse_u64(&args[4])?;
                state.campaigns.push(MockCampaign {
                    owner: s(0),
                    title: s(1),
                    description: s(2),
                    target,
                    deadline,
                    collected: BigUint::default(),
                    image: s(5),
                    donors: vec![],
                    amounts: vec![],
                });
            }
            "donateToCampaign" => {
                let i = arg_index(&args)?;
                let Some(value) = value else { return Err(revert("no value")) };
                let Some(c) = state.campaigns.get_mut(i) else { return Err(revert("no campaign")) };
                c.collected += value.base_units();
                c.donors.push(from.to_string());
                c.amounts.push(value.base_units().clone());
            }
            "createProposal" => {
                let description = args[0].get::<String>().cloned().unwrap_or_default();
                state.proposals.push(MockProposal {
                    creator: from.to_string(),
                    description,
                    votes: [0; 3],
                    voters: HashSet::new(),
                    open: true,
                    legacy: false,
                });
            }
            "vote" => {
                let i = arg_index(&args)?;
                let choice = args[1].get::<String>().cloned().unwrap_or_default();
                let Some(p) = state.proposals.get_mut(i) else { return Err(revert("no proposal")) };
                if !p.open {
                    return Err(revert("proposal closed"))
                }
                match choice.as_str() {
                    "yes" => p.votes[0] += 1,
                    "no" => p.votes[1] += 1,
                    "abstain" => p.votes[2] += 1,
                    _ => return Err(revert("bad vote")),
                }
                p.voters.insert(from.to_string());
            }
            "closeProposal" => {
                let i = arg_index(&args)?;
                let Some(p) = state.proposals.get_mut(i) else { return Err(revert("no proposal")) };
                if p.creator != from || !p.open {
                    return Err(revert("not allowed"))
                }
                p.open = false;
            }
            _ => return Err(Error::JsonRpcError("method not found (-32601)".to_string())),
        }

        Ok(json_map([("transactionHash", json_str(&tx_hash)), ("status", JsonNum(1.0))]))
    }
}

/// Wallet that resolves to a fixed account, or rejects when `None`.
pub struct MockWallet {
    pub account: Option<String>,
    pub hang: bool,
}

#[async_trait]
impl WalletConnector for MockWallet {
    async fn connect(&self) -> Result<String> {
        if self.hang {
            smol::future::pending::<()>().await;
        }

        match &self.account {
            Some(a) => Ok(a.clone()),
            None => Err(Error::ConnectionError("User rejected the request".to_string())),
        }
    }
}

pub fn wallet(account: Option<&str>) -> Arc<MockWallet> {
    Arc::new(MockWallet { account: account.map(str::to_string), hang: false })
}

/// A session connected as `account` with `contract` bound.
pub async fn connected_session(account: &str, contract: Arc<MockContract>) -> SessionPtr {
    let session = Session::new(wallet(Some(account)), Duration::from_secs(5));
    session.bind(contract).await;
    session.connect().await.unwrap();
    session
}
