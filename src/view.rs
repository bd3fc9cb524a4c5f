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

//! Presentation state behind the campaign and voting screens.
//!
//! Pages keep the last fetched lists, a loading flag and the selection.
//! Every action reports its outcome through one [`Notifier`], success and
//! failure alike, and mutating actions re-fetch the list afterwards since
//! the contract offers no change feed.
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;

use crate::{
    campaign::{self, Campaign, CampaignForm, Donation},
    contract::TxReceipt,
    proposal::{self, Proposal, ProposalResult, VoteChoice},
    session::SessionPtr,
    system::{Publisher, PublisherPtr, Subscription},
    Error, ErrorKind, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

pub type NotifierPtr = Arc<Notifier>;

/// Single channel for user-facing outcome messages
pub struct Notifier {
    publisher: PublisherPtr<Notification>,
}

impl Notifier {
    pub fn new() -> NotifierPtr {
        Arc::new(Self { publisher: Publisher::new() })
    }

    pub async fn subscribe(&self) -> Subscription<Notification> {
        self.publisher.clone().subscribe().await
    }

    pub async fn notify(&self, level: NotificationLevel, message: String) {
        debug!(target: "view::notify", "[{:?}] {}", level, message);
        self.publisher.notify(Notification { level, message }).await;
    }

    pub async fn success(&self, message: String) {
        self.notify(NotificationLevel::Success, message).await
    }

    /// Report an error. Errors the user can act on (a refused close, an
    /// action invalid in the current state) are warnings, the rest errors.
    pub async fn error(&self, err: &Error) {
        let level = match (err, err.kind()) {
            (Error::CloseProposalRejected(..), _) => NotificationLevel::Warning,
            (_, ErrorKind::InvalidState) => NotificationLevel::Warning,
            _ => NotificationLevel::Error,
        };
        self.notify(level, err.to_string()).await
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Default)]
struct VotingState {
    proposals: Vec<Proposal>,
    loading: bool,
    selected: Option<u64>,
    votes_in_flight: HashSet<u64>,
}

/// Marks a proposal's vote control as disabled until dropped.
struct VoteGuard<'a> {
    state: &'a Mutex<VotingState>,
    index: u64,
}

impl Drop for VoteGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).votes_in_flight.remove(&self.index);
    }
}

/// State of the proposal list and voting controls
pub struct VotingPage {
    session: SessionPtr,
    notifier: NotifierPtr,
    state: Mutex<VotingState>,
}

impl VotingPage {
    pub fn new(session: SessionPtr, notifier: NotifierPtr) -> Self {
        Self { session, notifier, state: Mutex::new(VotingState::default()) }
    }

    pub fn proposals(&self) -> Vec<Proposal> {
        lock(&self.state).proposals.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn selected(&self) -> Option<u64> {
        lock(&self.state).selected
    }

    /// Select a fetched proposal to vote on.
    pub fn select(&self, index: u64) -> Result<Proposal> {
        let mut state = lock(&self.state);
        let Some(proposal) = state.proposals.iter().find(|p| p.index == index).cloned() else {
            return Err(Error::InvalidStateError(format!("proposal {index} is not listed")))
        };
        state.selected = Some(index);
        Ok(proposal)
    }

    /// Whether the vote control for `index` is enabled: the proposal is
    /// listed as open and no vote on it is in flight.
    pub fn can_vote(&self, index: u64) -> bool {
        let state = lock(&self.state);
        !state.votes_in_flight.contains(&index) &&
            state.proposals.iter().any(|p| p.index == index && p.open)
    }

    /// Re-fetch the proposal list.
    pub async fn refresh(&self) -> Result<()> {
        lock(&self.state).loading = true;
        let res = proposal::list_proposals(&self.session).await;

        let res = {
            let mut state = lock(&self.state);
            state.loading = false;
            res.map(|proposals| state.proposals = proposals)
        };

        if let Err(e) = &res {
            self.notifier.error(e).await;
        }
        res
    }

    pub async fn create_proposal(&self, description: &str) -> Result<TxReceipt> {
        match proposal::create_proposal(&self.session, description).await {
            Ok(rep) => {
                self.notifier.success(format!("Proposal \"{description}\" created")).await;
                let _ = self.refresh().await;
                Ok(rep)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }

    /// Vote on the proposal at `index`. While the vote is in flight the
    /// control is disabled and a second submission is refused without
    /// reaching the contract.
    pub async fn submit_vote(&self, index: u64, choice: VoteChoice) -> Result<TxReceipt> {
        let guard = {
            let mut state = lock(&self.state);
            if state.votes_in_flight.insert(index) {
                Some(VoteGuard { state: &self.state, index })
            } else {
                None
            }
        };

        let Some(guard) = guard else {
            let e = Error::VoteInFlight(index);
            self.notifier.error(&e).await;
            return Err(e)
        };

        let res = proposal::vote(&self.session, index, choice).await;
        drop(guard);

        match res {
            Ok(rep) => {
                self.notifier.success(format!("Voted {choice} on proposal {index}")).await;
                let _ = self.refresh().await;
                Ok(rep)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }

    pub async fn close(&self, index: u64) -> Result<TxReceipt> {
        match proposal::close_proposal(&self.session, index).await {
            Ok(rep) => {
                self.notifier.success(format!("Proposal {index} closed")).await;
                let _ = self.refresh().await;
                Ok(rep)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }

    /// Fetch and announce the final tally of a closed proposal.
    pub async fn show_result(&self, index: u64) -> Result<ProposalResult> {
        match proposal::get_proposal_result(&self.session, index).await {
            Ok(result) => {
                self.notifier.success(result.to_string()).await;
                Ok(result)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }
}

#[derive(Default)]
struct CampaignState {
    campaigns: Vec<Campaign>,
    loading: bool,
}

/// State of the campaign list screens
pub struct CampaignPage {
    session: SessionPtr,
    notifier: NotifierPtr,
    state: Mutex<CampaignState>,
}

impl CampaignPage {
    pub fn new(session: SessionPtr, notifier: NotifierPtr) -> Self {
        Self { session, notifier, state: Mutex::new(CampaignState::default()) }
    }

    pub fn campaigns(&self) -> Vec<Campaign> {
        lock(&self.state).campaigns.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    async fn load<F>(&self, fetch: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<Vec<Campaign>>>,
    {
        lock(&self.state).loading = true;
        let res = fetch.await;

        let res = {
            let mut state = lock(&self.state);
            state.loading = false;
            res.map(|campaigns| state.campaigns = campaigns)
        };

        if let Err(e) = &res {
            self.notifier.error(e).await;
        }
        res
    }

    /// Re-fetch all campaigns.
    pub async fn refresh(&self) -> Result<()> {
        self.load(campaign::list_campaigns(&self.session)).await
    }

    /// Re-fetch the campaigns owned by the connected account.
    pub async fn refresh_mine(&self) -> Result<()> {
        self.load(campaign::list_user_campaigns(&self.session)).await
    }

    pub async fn publish(&self, form: &CampaignForm) -> Result<TxReceipt> {
        match campaign::create_campaign(&self.session, form).await {
            Ok(rep) => {
                self.notifier.success(format!("Campaign \"{}\" created", form.title)).await;
                let _ = self.refresh().await;
                Ok(rep)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }

    /// Donate and re-fetch, so the list shows the new collected amount.
    pub async fn donate(&self, index: u64, amount: &str) -> Result<TxReceipt> {
        match campaign::donate(&self.session, index, amount).await {
            Ok(rep) => {
                self.notifier.success(format!("Donated {amount} to campaign {index}")).await;
                let _ = self.refresh().await;
                Ok(rep)
            }
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }

    pub async fn donations(&self, index: u64) -> Result<Vec<Donation>> {
        match campaign::list_donations(&self.session, index).await {
            Ok(d) => Ok(d),
            Err(e) => {
                self.notifier.error(&e).await;
                Err(e)
            }
        }
    }
}
