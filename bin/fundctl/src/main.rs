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


use std::{fs, process::exit, str::FromStr, sync::Arc, time::Duration};

use log::{debug, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use structopt_toml::{serde::Deserialize, structopt::StructOpt, StructOptToml};
use url::Url;

use fundforward::{
    campaign::{self, CampaignForm},
    cli_desc,
    contract::{RpcContract, TxReceipt},
    membership::{require_valid_key, MembershipLock},
    proposal::VoteChoice,
    rpc::client::RpcClient,
    session::{Session, SessionPtr},
    system::Subscription,
    util::{
        cli::{get_log_config, get_log_level, spawn_config},
        path::{expand_path, get_config_path},
        time::now_millis,
    },
    view::{CampaignPage, Notification, Notifier, VotingPage},
    wallet::RpcWallet,
    Error, Result,
};

/// Table and notification printing
mod view;
use view::{print_campaigns, print_donations, print_notification, print_proposals};

const CONFIG_FILE: &str = "fundctl_config.toml";
const CONFIG_FILE_CONTENTS: &str = include_str!("../fundctl_config.toml");

#[derive(Clone, Debug, Deserialize, StructOpt, StructOptToml)]
#[serde(default)]
#[structopt(name = "fundctl", about = cli_desc!())]
struct Args {
    #[structopt(short, long)]
    /// Configuration file to use
    config: Option<String>,

    #[structopt(short, long, default_value = "http://127.0.0.1:8545")]
    /// Gateway JSON-RPC endpoint
    endpoint: Url,

    #[structopt(long, default_value = "0xe78b6EEfEB2Dd1a2525F72464Bf74f2f9Fb2999f")]
    /// FundForward contract address
    contract: String,

    #[structopt(long, default_value = "30")]
    /// Seconds allowed for a single wallet or contract call
    call_timeout: u64,

    #[structopt(long)]
    /// Membership lock contract gating transactions
    membership_lock: Option<String>,

    #[structopt(long, default_value = "5")]
    /// Chain ID of the membership lock
    membership_network: u64,

    #[structopt(subcommand)]
    /// Sub command to execute
    command: Option<Subcmd>,

    #[structopt(short, long)]
    /// Set log file to ouput into
    log: Option<String>,

    #[structopt(short, parse(from_occurrences))]
    /// Increase verbosity (-vvv supported)
    verbose: u8,
}

#[derive(Clone, Debug, Deserialize, StructOpt)]
enum Subcmd {
    /// Authorize an account with the wallet and print it
    Connect,

    /// Crowdfunding campaigns
    Campaign {
        #[structopt(subcommand)]
        command: CampaignSubcmd,
    },

    /// Governance proposals
    Proposal {
        #[structopt(subcommand)]
        command: ProposalSubcmd,
    },
}

#[derive(Clone, Debug, Deserialize, StructOpt)]
enum CampaignSubcmd {
    /// Publish a new campaign owned by the connected account
    Create {
        /// Campaign title
        title: String,

        /// Target amount, in whole coins (e.g. 1.5)
        target: String,

        /// Deadline, as YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339
        deadline: String,

        #[structopt(short, long, default_value = "")]
        /// Campaign description
        description: String,

        #[structopt(short, long, default_value = "")]
        /// Image URI
        image: String,
    },

    /// List all campaigns
    List,

    /// List the campaigns owned by the connected account
    Mine,

    /// List the campaigns owned by an address
    Owner { owner: String },

    /// Donate to a campaign
    Donate {
        /// Campaign index
        index: u64,

        /// Amount, in whole coins
        amount: String,
    },

    /// List the donations to a campaign
    Donations {
        /// Campaign index
        index: u64,

        #[structopt(long)]
        /// Fail instead of truncating when donors and amounts disagree
        strict: bool,
    },
}

#[derive(Clone, Debug, Deserialize, StructOpt)]
enum ProposalSubcmd {
    /// Submit a new proposal
    Create { description: String },

    /// List all proposals
    List,

    /// Vote on an open proposal
    Vote {
        /// Proposal index
        index: u64,

        /// One of: for, against, abstain
        choice: String,
    },

    /// Close a proposal you created
    Close { index: u64 },

    /// Show the final tally of a closed proposal
    Result { index: u64 },
}

impl Subcmd {
    /// Whether the command submits a transaction or needs the account
    fn needs_account(&self) -> bool {
        match self {
            Self::Connect => true,
            Self::Campaign { command } => !matches!(
                command,
                CampaignSubcmd::List |
                    CampaignSubcmd::Owner { .. } |
                    CampaignSubcmd::Donations { .. }
            ),
            Self::Proposal { command } => !matches!(
                command,
                ProposalSubcmd::List | ProposalSubcmd::Result { .. }
            ),
        }
    }
}

/// CLI-util structure
struct Fundctl {
    /// Session over the gateway wallet and contract
    session: SessionPtr,
    /// User-facing outcome messages
    notifier: Arc<Notifier>,
    /// Notification subscription drained after each command
    notes: Subscription<Notification>,
    /// Gateway JSON-RPC client
    rpc_client: Arc<RpcClient>,
}

impl Fundctl {
    async fn new(endpoint: Url, contract: &str, call_timeout: Duration) -> Result<Self> {
        let rpc_client = Arc::new(RpcClient::new(endpoint)?);

        let wallet = Arc::new(RpcWallet::new(rpc_client.clone()));
        let session = Session::new(wallet, call_timeout);
        session.bind(Arc::new(RpcContract::new(rpc_client.clone(), contract))).await;

        let notifier = Notifier::new();
        let notes = notifier.subscribe().await;

        Ok(Self { session, notifier, notes, rpc_client })
    }

    /// Connect the wallet, then check the membership lock if one is set.
    async fn connect(&self, lock: Option<MembershipLock>) -> Result<String> {
        let address = self.report(self.session.connect().await).await?;

        let Some(lock) = lock else { return Ok(address) };

        debug!(target: "fundctl", "Checking membership on {} (chain {})", lock.address, lock.network);
        let handle = RpcContract::new(self.rpc_client.clone(), &lock.address);
        let res = require_valid_key(&handle, &lock, &address, self.session.call_timeout()).await;
        self.report(res).await?;

        Ok(address)
    }

    /// Notify a failure that did not pass through a page action.
    async fn report<T>(&self, res: Result<T>) -> Result<T> {
        if let Err(e) = &res {
            self.notifier.error(e).await;
        }
        res
    }

    /// Print and clear pending notifications.
    fn flush(&self) {
        while let Some(note) = self.notes.try_receive() {
            print_notification(&note);
        }
    }
}

fn print_receipt(rep: &TxReceipt) {
    match &rep.tx_hash {
        Some(h) => println!("Transaction: {h}"),
        None => println!("Transaction submitted"),
    }
}

async fn campaign_cmd(fundctl: &Fundctl, command: CampaignSubcmd) -> Result<()> {
    let page = CampaignPage::new(fundctl.session.clone(), fundctl.notifier.clone());

    match command {
        CampaignSubcmd::Create { title, target, deadline, description, image } => {
            let form = CampaignForm { title, description, target, deadline, image };
            print_receipt(&page.publish(&form).await?);
        }

        CampaignSubcmd::List => {
            page.refresh().await?;
            print_campaigns(&page.campaigns(), fundctl.report(now_millis()).await?);
        }

        CampaignSubcmd::Mine => {
            page.refresh_mine().await?;
            print_campaigns(&page.campaigns(), fundctl.report(now_millis()).await?);
        }

        CampaignSubcmd::Owner { owner } => {
            let res = campaign::list_campaigns_by_owner(&fundctl.session, &owner).await;
            let campaigns = fundctl.report(res).await?;
            print_campaigns(&campaigns, fundctl.report(now_millis()).await?);
        }

        CampaignSubcmd::Donate { index, amount } => {
            print_receipt(&page.donate(index, &amount).await?);
            if let Some(c) = page.campaigns().iter().find(|c| c.index == index) {
                println!("Collected: {} / {}", c.amount_collected, c.target);
            }
        }

        CampaignSubcmd::Donations { index, strict } => {
            let donations = if strict {
                let res = campaign::list_donations_checked(&fundctl.session, index).await;
                fundctl.report(res).await?
            } else {
                page.donations(index).await?
            };
            print_donations(&donations);
        }
    }

    Ok(())
}

async fn proposal_cmd(fundctl: &Fundctl, command: ProposalSubcmd) -> Result<()> {
    let page = VotingPage::new(fundctl.session.clone(), fundctl.notifier.clone());

    match command {
        ProposalSubcmd::Create { description } => {
            print_receipt(&page.create_proposal(&description).await?);
        }

        ProposalSubcmd::List => {
            page.refresh().await?;
            print_proposals(&page.proposals());
        }

        ProposalSubcmd::Vote { index, choice } => {
            let choice = fundctl.report(VoteChoice::from_str(&choice)).await?;
            page.refresh().await?;
            fundctl.report(page.select(index)).await?;
            if !page.can_vote(index) {
                let e = Error::InvalidStateError(format!("proposal {index} is closed"));
                return fundctl.report(Err(e)).await
            }
            print_receipt(&page.submit_vote(index, choice).await?);
        }

        ProposalSubcmd::Close { index } => {
            print_receipt(&page.close(index).await?);
        }

        ProposalSubcmd::Result { index } => {
            page.show_result(index).await?;
        }
    }

    Ok(())
}

async fn realmain(args: Args) -> Result<()> {
    let Some(command) = args.command else {
        eprintln!("Error: No subcommand given");
        eprintln!("Run with \"-h\" to see the usage.");
        exit(2);
    };

    let fundctl = Fundctl::new(
        args.endpoint.clone(),
        &args.contract,
        Duration::from_secs(args.call_timeout),
    )
    .await?;
    info!(target: "fundctl", "Using gateway {}", fundctl.rpc_client.endpoint());

    if command.needs_account() {
        let lock = args
            .membership_lock
            .map(|address| MembershipLock { address, network: args.membership_network });

        let res = fundctl.connect(lock).await;
        fundctl.flush();
        let Ok(address) = res else {
            // Already reported through the notifier
            exit(1);
        };

        if let Subcmd::Connect = command {
            println!("{address}");
            return Ok(())
        }
    }

    let res = match command {
        Subcmd::Connect => Ok(()),
        Subcmd::Campaign { command } => campaign_cmd(&fundctl, command).await,
        Subcmd::Proposal { command } => proposal_cmd(&fundctl, command).await,
    };

    fundctl.flush();
    if res.is_err() {
        exit(1);
    }

    Ok(())
}

fn main() -> Result<()> {
    // Locate the config file first, then parse again with its contents
    let args = Args::from_args_with_toml("").map_err(|_| Error::ConfigInvalid)?;
    let cfg_path = get_config_path(args.config, CONFIG_FILE)?;
    spawn_config(&cfg_path, CONFIG_FILE_CONTENTS.as_bytes())?;

    let args = match Args::from_args_with_toml(&fs::read_to_string(&cfg_path)?) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error parsing the config file {cfg_path:?}: {e}");
            return Err(Error::ConfigInvalid)
        }
    };

    let log_level = get_log_level(args.verbose.into());
    let log_config = get_log_config(args.verbose.into());
    match &args.log {
        Some(path) => {
            let path = expand_path(path)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            WriteLogger::init(log_level, log_config, fs::File::create(path)?)?;
        }
        None => TermLogger::init(log_level, log_config, TerminalMode::Mixed, ColorChoice::Auto)?,
    }

    smol::block_on(realmain(args))
}
