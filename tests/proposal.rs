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


use fundforward::{
    proposal::{self, VoteChoice},
    Error, ErrorKind,
};

mod common;
use common::*;

#[test]
fn proposal_lifecycle() {
    smol::block_on(async {
        let contract = MockContract::new();
        let alice = connected_session(ALICE, contract.clone()).await;
        let bob = connected_session(BOB, contract.clone()).await;

        proposal::create_proposal(&alice, "Fund the well").await.unwrap();
        let proposals = proposal::list_proposals(&alice).await.unwrap();
        assert_eq!(proposals.len(), 1);
        assert!(proposals[0].open);
        assert_eq!(proposals[0].votes_for, 0);

        proposal::vote(&alice, 0, VoteChoice::For).await.unwrap();
        proposal::vote(&bob, 0, VoteChoice::Against).await.unwrap();
        proposal::vote(&bob, 0, VoteChoice::Abstain).await.unwrap();

        let p = &proposal::list_proposals(&bob).await.unwrap()[0];
        assert_eq!((p.votes_for, p.votes_against), (1, 1));
        assert_eq!(p.voted, Some(true));

        proposal::close_proposal(&alice, 0).await.unwrap();
        let result = proposal::get_proposal_result(&bob, 0).await.unwrap();
        assert_eq!((result.votes_for, result.votes_against, result.votes_abstain), (1, 1, 1));
        assert_eq!(result.to_string(), "Yes: 1 No: 1 Abstain: 1");
    });
}

#[test]
fn votes_use_contract_wire_values() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(BOB, contract.clone()).await;

        proposal::vote(&session, 0, VoteChoice::Abstain).await.unwrap();
        let state = contract.state();
        assert_eq!(state.sends[0].2[1].get::<String>().unwrap(), "abstain");
    });
}

#[test]
fn vote_does_not_touch_listed_tallies() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(BOB, contract.clone()).await;

        let before = proposal::list_proposals(&session).await.unwrap();
        proposal::vote(&session, 0, VoteChoice::For).await.unwrap();
        assert_eq!(before[0].votes_for, 0);

        let after = proposal::list_proposals(&session).await.unwrap();
        assert_eq!(after[0].votes_for, 1);
    });
}

#[test]
fn missing_tallies_default_to_zero() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "legacy", true, true);
        let session = connected_session(BOB, contract.clone()).await;

        let p = &proposal::list_proposals(&session).await.unwrap()[0];
        assert_eq!((p.votes_for, p.votes_against), (0, 0));
        assert_eq!(p.voted, None);
        assert_eq!(p.description, "legacy");
    });
}

#[test]
fn close_by_non_creator_is_rejected() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(BOB, contract.clone()).await;

        let err = proposal::close_proposal(&session, 0).await.unwrap_err();
        assert!(matches!(err, Error::CloseProposalRejected(0, _)));
        assert_eq!(err.kind(), ErrorKind::Transaction);
        assert!(proposal::list_proposals(&session).await.unwrap()[0].open);
    });
}

#[test]
fn closing_twice_is_rejected() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(ALICE, contract.clone()).await;

        proposal::close_proposal(&session, 0).await.unwrap();
        let err = proposal::close_proposal(&session, 0).await.unwrap_err();
        assert!(matches!(err, Error::CloseProposalRejected(0, _)));
    });
}

#[test]
fn result_of_open_proposal_is_not_requested() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", true, false);
        let session = connected_session(BOB, contract.clone()).await;

        let err = proposal::get_proposal_result(&session, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let err = proposal::get_proposal_result(&session, 5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        assert_eq!(contract.calls_of("getProposalResult"), 0);
    });
}

#[test]
fn vote_on_closed_proposal_fails() {
    smol::block_on(async {
        let contract = MockContract::new();
        contract.add_proposal(ALICE, "p", false, false);
        let session = connected_session(BOB, contract.clone()).await;

        let err = proposal::vote(&session, 0, VoteChoice::For).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transaction);
    });
}
