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

use fundforward::{
    campaign::CampaignForm,
    session::Session,
    proposal::VoteChoice,
    view::{CampaignPage, NotificationLevel, Notifier, VotingPage},
    Error,
};

mod common;
use common::*;

#[test]
fn second_vote_is_refused_while_first_is_pending() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let (release, gate) = smol::channel::unbounded();
        *contract.vote_gate.lock().unwrap() = Some(gate);

        let session = connected_session(BOB, contract.clone()).await;
        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;
        let page = VotingPage::new(session, notifier);

        page.refresh().await.unwrap();
        assert!(page.can_vote(0));

        let first = page.submit_vote(0, VoteChoice::For);
        let second = async {
            while contract.sends_of("vote") == 0 {
                smol::future::yield_now().await;
            }
            assert!(!page.can_vote(0));

            let err = page.submit_vote(0, VoteChoice::Against).await.unwrap_err();
            assert!(matches!(err, Error::VoteInFlight(0)));

            release.send(()).await.unwrap();
        };

        let (first, ()) = smol::future::zip(first, second).await;
        assert!(first.is_ok());

        // Only the first submission reached the contract
        assert_eq!(contract.sends_of("vote"), 1);
        assert!(page.can_vote(0));
        assert_eq!(page.proposals()[0].votes_for, 1);

        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Warning);
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Success);
    });
}

#[test]
fn failed_vote_reenables_control() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        contract.add_proposal(ALICE, "q", true, false);
        let session = connected_session(BOB, contract.clone()).await;
        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;
        let page = VotingPage::new(session, notifier);
        page.refresh().await.unwrap();

        // Close q behind the page's back, the listed state is stale
        contract.state().proposals[1].open = false;
        assert!(page.can_vote(1));
        assert!(page.submit_vote(1, VoteChoice::For).await.is_err());
        assert!(page.can_vote(1));

        let note = notes.receive().await.unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
    });
}

#[test]
fn votes_on_different_proposals_are_independent() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        contract.add_proposal(ALICE, "q", true, false);
        let (release, gate) = smol::channel::unbounded();
        *contract.vote_gate.lock().unwrap() = Some(gate);

        let session = connected_session(BOB, contract.clone()).await;
        let page = VotingPage::new(session, Notifier::new());
        page.refresh().await.unwrap();

        let first = page.submit_vote(0, VoteChoice::For);
        let second = async {
            while contract.sends_of("vote") == 0 {
                smol::future::yield_now().await;
            }
            assert!(!page.can_vote(0));
            assert!(page.can_vote(1));
            release.send(()).await.unwrap();
            release.send(()).await.unwrap();
            page.submit_vote(1, VoteChoice::Against).await
        };

        let (a, b) = smol::future::zip(first, second).await;
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(contract.sends_of("vote"), 2);
    });
}

#[test]
fn select_and_close() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(BOB, contract.clone()).await;
        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;
        let page = VotingPage::new(session, notifier);

        assert!(page.select(0).is_err());
        page.refresh().await.unwrap();
        assert_eq!(page.select(0).unwrap().description, "p");
        assert_eq!(page.selected(), Some(0));

        // Bob did not create the proposal
        assert!(matches!(page.close(0).await, Err(Error::CloseProposalRejected(0, _))));
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Warning);

        assert!(page.show_result(0).await.is_err());
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Warning);
        assert_eq!(contract.calls_of("getProposalResult"), 0);
    });
}

#[test]
fn create_proposal_refreshes_list() {
    smol::block_on(async {
        let contract = MockContract::new();
        let session = connected_session(ALICE, contract.clone()).await;
        let page = VotingPage::new(session, Notifier::new());

        page.create_proposal("Buy a pump").await.unwrap();
        assert_eq!(page.proposals().len(), 1);
        assert!(!page.is_loading());

        page.close(0).await.unwrap();
        assert!(!page.can_vote(0));

        let result = page.show_result(0).await.unwrap();
        assert_eq!(result.to_string(), "Yes: 0 No: 0 Abstain: 0");
    });
}

#[test]
fn campaign_page_flow() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_campaign(BOB, "Bob's", 10, 0);
        let session = connected_session(ALICE, contract.clone()).await;
        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;
        let page = CampaignPage::new(session, notifier);

        let form = CampaignForm {
            title: "Alice's".to_string(),
            target: "2".to_string(),
            deadline: "2030-01-01T12:00".to_string(),
            ..Default::default()
        };
        page.publish(&form).await.unwrap();
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Success);
        // Publishing re-fetches, the new campaign is listed right away
        assert_eq!(page.campaigns().len(), 2);
        assert_eq!(contract.calls_of("getCampaigns"), 1);

        page.refresh_mine().await.unwrap();
        let mine = page.campaigns();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Alice's");
        assert_eq!(mine[0].index, 1);

        page.donate(0, "0.5").await.unwrap();
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Success);
        // Donation re-fetches the full list
        assert_eq!(page.campaigns()[0].amount_collected.to_decimal(), "0.5");

        assert_eq!(page.donations(0).await.unwrap().len(), 1);

        assert!(page.donate(0, "lots").await.is_err());
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Error);
    });
}

#[test]
fn failed_refresh_is_notified() {
    smol::block_on(async {
        let session = Session::new(wallet(None), Duration::from_secs(5));
        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;
        let page = CampaignPage::new(session, notifier);

        // Nothing bound yet
        assert!(page.refresh().await.is_err());
        assert!(!page.is_loading());
        assert_eq!(notes.receive().await.unwrap().level, NotificationLevel::Error);
    });
}
