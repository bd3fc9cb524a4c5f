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

use log::{error, info, warn};
use tinyjson::JsonValue;

use crate::{
    amount::Amount,
    contract::{TxReceipt, CREATE_CAMPAIGN, DONATE_TO_CAMPAIGN, GET_CAMPAIGNS, GET_DONATORS},
    rpc::util::{as_array, field, json_str, parse_u64, string_field, uint_field, JsonNum},
    session::Session,
    util::time::deadline_to_millis,
    Error, Result,
};

/// A fundraising campaign as stored by the contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub target: Amount,
    /// Unix milliseconds
    pub deadline: u64,
    pub amount_collected: Amount,
    /// Image URI
    pub image: String,
    /// Position in the contract's campaign list
    pub index: u64,
}

impl Campaign {
    fn from_json(value: &JsonValue, index: u64) -> Result<Self> {
        Ok(Self {
            owner: string_field(value, "owner")?,
            title: string_field(value, "title")?,
            description: string_field(value, "description")?,
            target: Amount::from_base_units(uint_field(value, "target")?),
            deadline: match field(value, "deadline") {
                Some(d) => parse_u64(d)?,
                None => return Err(Error::UnexpectedResponse("missing \"deadline\"".into())),
            },
            amount_collected: Amount::from_base_units(uint_field(value, "amountCollected")?),
            image: string_field(value, "image")?,
            index,
        })
    }
}

/// User input for a new campaign
#[derive(Clone, Debug, Default)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    /// Decimal target such as `"2.5"`
    pub target: String,
    /// Date or date-time, see [`deadline_to_millis`]
    pub deadline: String,
    /// Image URI
    pub image: String,
}

/// A single donation to a campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Donation {
    pub donor: String,
    pub amount: Amount,
}

/// Submit a new campaign owned by the connected account.
///
/// Field contents are left to the contract to validate; only the target
/// amount and deadline have to convert.
pub async fn create_campaign(session: &Session, form: &CampaignForm) -> Result<TxReceipt> {
    let Some(owner) = session.address().await else { return Err(Error::SessionNotConnected) };

    let target = Amount::from_decimal(&form.target)?;
    let deadline = deadline_to_millis(&form.deadline)?;

    let args = vec![
        json_str(&owner),
        json_str(&form.title),
        json_str(&form.description),
        target.to_json(),
        JsonNum(deadline as f64),
        json_str(&form.image),
    ];

    match session.write(CREATE_CAMPAIGN, args, None).await {
        Ok(rep) => {
            info!(target: "campaign::create_campaign", "Campaign \"{}\" created: {:?}", form.title, rep.tx_hash);
            Ok(rep)
        }
        Err(e) => {
            error!(target: "campaign::create_campaign", "Failed to create campaign: {}", e);
            Err(e)
        }
    }
}

/// Fetch every campaign from the contract, in storage order.
pub async fn list_campaigns(session: &Session) -> Result<Vec<Campaign>> {
    let rep = session.read(GET_CAMPAIGNS, vec![]).await?;

    let mut campaigns = vec![];
    for (i, c) in as_array(&rep, "campaign list")?.iter().enumerate() {
        campaigns.push(Campaign::from_json(c, i as u64)?);
    }

    Ok(campaigns)
}

/// Fetch the campaigns owned by `owner`. The contract has no owner index,
/// so this pulls the full list every time.
pub async fn list_campaigns_by_owner(session: &Session, owner: &str) -> Result<Vec<Campaign>> {
    let campaigns = list_campaigns(session).await?;
    Ok(campaigns.into_iter().filter(|c| c.owner == owner).collect())
}

/// Fetch the campaigns owned by the connected account.
pub async fn list_user_campaigns(session: &Session) -> Result<Vec<Campaign>> {
    let Some(owner) = session.address().await else { return Err(Error::SessionNotConnected) };
    list_campaigns_by_owner(session, &owner).await
}

/// Donate `amount` (decimal) to the campaign at `index`.
///
/// The donation travels as the transaction value. Nothing is cached, so
/// callers re-fetch to observe the new `amount_collected`.
pub async fn donate(session: &Session, index: u64, amount: &str) -> Result<TxReceipt> {
    let value = Amount::from_decimal(amount)?;

    match session.write(DONATE_TO_CAMPAIGN, vec![JsonNum(index as f64)], Some(value.clone())).await
    {
        Ok(rep) => {
            info!(target: "campaign::donate", "Donated {} to campaign {}", value, index);
            Ok(rep)
        }
        Err(e) => {
            error!(target: "campaign::donate", "Failed to donate to campaign {}: {}", index, e);
            Err(e)
        }
    }
}

/// Fetch the raw `(donors, amounts)` pair for a campaign.
async fn fetch_donators(session: &Session, index: u64) -> Result<(Vec<String>, Vec<Amount>)> {
    let rep = session.read(GET_DONATORS, vec![JsonNum(index as f64)]).await?;
    let pair = as_array(&rep, "donators reply")?;
    if pair.len() != 2 {
        return Err(Error::UnexpectedResponse(format!(
            "donators reply has {} members, expected 2",
            pair.len()
        )))
    }

    let mut donors = vec![];
    for d in as_array(&pair[0], "donor list")? {
        match d.get::<String>() {
            Some(d) => donors.push(d.clone()),
            None => return Err(Error::UnexpectedResponse("donor is not a string".into())),
        }
    }

    let mut amounts = vec![];
    for a in as_array(&pair[1], "donation list")? {
        amounts.push(Amount::from_json(a)?);
    }

    Ok((donors, amounts))
}

/// Fetch the donations to the campaign at `index`, pairing donors and
/// amounts by position. Unequal sequences are truncated to the shorter one.
pub async fn list_donations(session: &Session, index: u64) -> Result<Vec<Donation>> {
    let (donors, amounts) = fetch_donators(session, index).await?;

    if donors.len() != amounts.len() {
        warn!(
            target: "campaign::list_donations",
            "Campaign {} returned {} donors but {} amounts, truncating",
            index, donors.len(), amounts.len(),
        );
    }

    Ok(donors.into_iter().zip(amounts).map(|(donor, amount)| Donation { donor, amount }).collect())
}

/// Like [`list_donations`], but unequal sequences are an error.
pub async fn list_donations_checked(session: &Session, index: u64) -> Result<Vec<Donation>> {
    let (donors, amounts) = fetch_donators(session, index).await?;

    if donors.len() != amounts.len() {
        return Err(Error::DataInconsistencyError(format!(
            "campaign {} returned {} donors but {} amounts",
            index,
            donors.len(),
            amounts.len()
        )))
    }

    Ok(donors.into_iter().zip(amounts).map(|(donor, amount)| Donation { donor, amount }).collect())
}
